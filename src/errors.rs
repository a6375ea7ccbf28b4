// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{error, fmt, io};

#[derive(Debug)]
pub enum LoopmapError {
    Io(io::Error),
    Format(String),
    Spreadsheet(String),
    Csv(csv::Error),
    MissingColumn(String),
    EmptyInput,
    InsufficientRegions { found: usize, needed: usize },
    Config(String),
    Font(String),
    Render(String),
}

// These allow conversion to LoopmapError, required for main() to return Result<()> and for '?' to
// work.

impl From<io::Error> for LoopmapError {
    fn from(e: io::Error) -> Self {
        LoopmapError::Io(e)
    }
}

impl From<csv::Error> for LoopmapError {
    fn from(e: csv::Error) -> Self {
        LoopmapError::Csv(e)
    }
}

impl From<calamine::Error> for LoopmapError {
    fn from(e: calamine::Error) -> Self {
        LoopmapError::Spreadsheet(e.to_string())
    }
}

impl From<serde_json::Error> for LoopmapError {
    fn from(e: serde_json::Error) -> Self {
        LoopmapError::Config(e.to_string())
    }
}

impl fmt::Display for LoopmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopmapError::Io(e) => write!(f, "I/O error: {}", e),
            LoopmapError::Format(msg) => write!(f, "Format error: {}", msg),
            LoopmapError::Spreadsheet(msg) => write!(f, "Spreadsheet error: {}", msg),
            LoopmapError::Csv(e) => write!(f, "CSV error: {}", e),
            LoopmapError::MissingColumn(name) => write!(f, "No column named '{}'", name),
            LoopmapError::EmptyInput => write!(f, "No sequences found"),
            LoopmapError::InsufficientRegions { found, needed } => write!(
                f,
                "Insufficient variable regions found: {} group(s), need at least {}",
                found, needed
            ),
            LoopmapError::Config(msg) => write!(f, "Configuration error: {}", msg),
            LoopmapError::Font(msg) => write!(f, "Font error: {}", msg),
            LoopmapError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl error::Error for LoopmapError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            LoopmapError::Io(e) => Some(e),
            LoopmapError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_readable() {
        let e = LoopmapError::InsufficientRegions {
            found: 1,
            needed: 2,
        };
        assert_eq!(
            e.to_string(),
            "Insufficient variable regions found: 1 group(s), need at least 2"
        );
        assert_eq!(
            LoopmapError::MissingColumn(String::from("seq")).to_string(),
            "No column named 'seq'"
        );
    }
}
