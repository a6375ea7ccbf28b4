// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use loopmap::{
    config::LoopmapConfig,
    fonts::register_display_font,
    runner::load_sequences,
    seq::InputFormat,
};
use std::path::Path;

#[allow(dead_code)]
pub fn fixture_sequences(path: &str) -> Vec<String> {
    let format = InputFormat::from_path(Path::new(path)).expect("fixture extension");
    load_sequences(Path::new(path), format, &LoopmapConfig::default()).expect("read fixture")
}

// Drawing needs a font; hosts without one skip the rendering tests.
#[allow(dead_code)]
pub fn font_available(config: &LoopmapConfig) -> bool {
    match register_display_font(config) {
        Ok(_) => true,
        Err(e) => {
            eprintln!("skipping render test: {}", e);
            false
        }
    }
}

// Small figure so tests stay fast.
#[allow(dead_code)]
pub fn small_config(stem: &Path) -> LoopmapConfig {
    LoopmapConfig {
        figure_size: (7.0, 4.0),
        dpi: 72,
        output_stem: stem.to_path_buf(),
        ..LoopmapConfig::default()
    }
}
