// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::LoopmapError;
use crate::prevalence::AMINO_ACIDS;

const CONFIG_FILE_NAME: &str = ".loopmapconfig";

// Every key is optional; the defaults are those of the EF-hand loop analysis this tool was first
// written for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopmapConfig {
    pub sheet: String,
    pub column: String,
    pub gap_threshold: usize,
    pub loops: Vec<usize>,
    pub alphabet: String,
    pub figure_size: (f64, f64),
    pub dpi: u32,
    pub output_stem: PathBuf,
    pub titles: Vec<String>,
    pub subtitle: String,
    pub colormap: Vec<String>,
    pub font_file: String,
    pub bold_font_file: String,
    pub fallback_fonts: Vec<PathBuf>,
}

impl Default for LoopmapConfig {
    fn default() -> Self {
        LoopmapConfig {
            sheet: String::from("mpnn_results"),
            column: String::from("seq"),
            gap_threshold: 3,
            loops: vec![0, 1],
            alphabet: String::from(AMINO_ACIDS),
            figure_size: (14.0, 8.0),
            dpi: 300,
            output_stem: PathBuf::from("peptide_heatmap_compact"),
            titles: vec![
                String::from("EF Hand 2 (Loop 1)"),
                String::from("EF Hand 3 (Loop 2)"),
            ],
            subtitle: String::from("Amino Acid Prevalence (%)"),
            // matplotlib's YlOrBr
            colormap: [
                "#ffffe5", "#fff7bc", "#fee391", "#fec44f", "#fe9929", "#ec7014", "#cc4c02",
                "#993404", "#662506",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            font_file: String::from("Roboto-Regular.ttf"),
            bold_font_file: String::from("Roboto-Bold.ttf"),
            fallback_fonts: [
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "/Library/Fonts/Arial.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

impl LoopmapConfig {
    pub fn from_file(path: &Path) -> Result<Self, LoopmapError> {
        let text = fs::read_to_string(path).map_err(|e| {
            LoopmapError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: LoopmapConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoopmapError> {
        if self.loops.len() != 2 {
            return Err(LoopmapError::Config(format!(
                "exactly two loops are plotted, got {} group indices",
                self.loops.len()
            )));
        }
        if self.titles.len() != 2 {
            return Err(LoopmapError::Config(format!(
                "need one title per loop, got {}",
                self.titles.len()
            )));
        }
        if self.alphabet.is_empty() || !self.alphabet.is_ascii() {
            return Err(LoopmapError::Config(String::from(
                "alphabet must be a non-empty string of single-byte symbols",
            )));
        }
        if self.colormap.len() < 2 {
            return Err(LoopmapError::Config(String::from(
                "colormap needs at least two colour stops",
            )));
        }
        let (w, h) = self.figure_size;
        if !(w > 0.0 && h > 0.0) || self.dpi == 0 {
            return Err(LoopmapError::Config(String::from(
                "figure size and dpi must be positive",
            )));
        }
        Ok(())
    }

    pub fn png_path(&self) -> PathBuf {
        self.output_path("png")
    }

    pub fn svg_path(&self) -> PathBuf {
        self.output_path("svg")
    }

    // Appends the extension, so a dotted stem such as `run.v2` keeps its suffix.
    fn output_path(&self, extension: &str) -> PathBuf {
        let mut name = self.output_stem.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

// Looks in $HOME, then in the current directory.
pub fn find_loopmap_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

pub fn load_config(explicit: Option<&Path>) -> Result<LoopmapConfig, LoopmapError> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => find_loopmap_config(),
    };
    match path {
        Some(p) => {
            info!("Reading configuration from {}", p.display());
            LoopmapConfig::from_file(&p)
        }
        None => Ok(LoopmapConfig::default()),
    }
}
