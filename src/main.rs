// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::process::ExitCode;

use log::info;

fn main() -> ExitCode {
    env_logger::init();
    info!("Starting log");
    match loopmap::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
