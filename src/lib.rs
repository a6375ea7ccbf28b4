// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

pub mod analysis;
pub mod config;
pub mod errors;
pub mod fonts;
pub mod heatmap;
pub mod prevalence;
pub mod profile;
pub mod runner;
pub mod seq;

use crate::errors::LoopmapError;

pub fn run() -> Result<(), LoopmapError> {
    runner::run()
}
