// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use plotters::style::{register_font, FontStyle};

use crate::config::LoopmapConfig;
use crate::errors::LoopmapError;

// All text is drawn with this family; whichever file is chosen gets registered under it.
pub const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub struct FontChoice {
    pub regular: PathBuf,
    pub bold: Option<PathBuf>,
    pub preferred: bool,
}

// Directories searched for the preferred font: next to the executable, then the working directory.
pub fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    dirs
}

// Bold faces that usually sit next to a regular one: DejaVuSans-Bold.ttf,
// LiberationSans-Bold.ttf, Arial Bold.ttf, arialbd.ttf.
fn bold_sibling(regular: &Path) -> Option<PathBuf> {
    let stem = regular.file_stem()?.to_str()?;
    let ext = regular.extension().and_then(|e| e.to_str()).unwrap_or("ttf");
    let base = stem.strip_suffix("-Regular").unwrap_or(stem);
    [
        format!("{}-Bold", base),
        format!("{} Bold", base),
        format!("{}bd", base),
    ]
    .iter()
    .map(|name| regular.with_file_name(format!("{}.{}", name, ext)))
    .find(|p| p.is_file())
}

pub fn resolve_font(config: &LoopmapConfig, search_dirs: &[PathBuf]) -> Option<FontChoice> {
    for dir in search_dirs {
        let regular = dir.join(&config.font_file);
        if regular.is_file() {
            let bold = Some(dir.join(&config.bold_font_file)).filter(|p| p.is_file());
            return Some(FontChoice {
                regular,
                bold,
                preferred: true,
            });
        }
    }
    debug!("{} not found in {:?}", config.font_file, search_dirs);
    config
        .fallback_fonts
        .iter()
        .find(|p| p.is_file())
        .map(|p| FontChoice {
            regular: p.clone(),
            bold: bold_sibling(p),
            preferred: false,
        })
}

fn load_static(path: &Path) -> Result<&'static [u8], LoopmapError> {
    let bytes = fs::read(path)
        .map_err(|e| LoopmapError::Font(format!("cannot read {}: {}", path.display(), e)))?;
    // plotters keeps registered fonts for the life of the process.
    Ok(Box::leak(bytes.into_boxed_slice()))
}

/// Registers the display font with plotters. Without a bold face the regular one stands in for
/// titles.
pub fn register_display_font(config: &LoopmapConfig) -> Result<FontChoice, LoopmapError> {
    let choice = resolve_font(config, &font_search_dirs()).ok_or_else(|| {
        LoopmapError::Font(format!(
            "neither {} nor any fallback font was found",
            config.font_file
        ))
    })?;
    let regular = load_static(&choice.regular)?;
    let bold = match &choice.bold {
        Some(path) => load_static(path)?,
        None => regular,
    };
    register_font(FONT_FAMILY, FontStyle::Normal, regular)
        .map_err(|_| LoopmapError::Font(format!("invalid font {}", choice.regular.display())))?;
    register_font(FONT_FAMILY, FontStyle::Bold, bold)
        .map_err(|_| LoopmapError::Font(String::from("invalid bold font")))?;
    if choice.preferred {
        info!("Using font {}", choice.regular.display());
    } else {
        info!(
            "{} not found, falling back to {}",
            config.font_file,
            choice.regular.display()
        );
    }
    Ok(choice)
}
