// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::process::Command;

#[test]
fn test_fatal_error_is_reported_in_words() {
    let output = Command::new(env!("CARGO_BIN_EXE_loopmap"))
        .args(["data/variants.csv", "--info", "-g", "11"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Insufficient variable regions found: 1 group(s), need at least 2"));
    assert!(!stderr.contains("InsufficientRegions {"));
}

#[test]
fn test_info_run_succeeds() {
    let output = Command::new(env!("CARGO_BIN_EXE_loopmap"))
        .args(["data/variants.fas", "--info"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Loop 1: positions 3-6\nLoop 2: positions 17-20\n"));
}
