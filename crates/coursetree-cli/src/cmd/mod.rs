//! Subcommand handlers. Each module owns its clap `Args` and a `run_*` entry
//! point taking the resolved [`OutputMode`](crate::output::OutputMode).

pub mod config;
pub mod roots;
pub mod substitute;
pub mod validation;

use std::io::Read;
use std::path::{Path, PathBuf};

use coursetree_core::error::ErrorCode;
use serde::de::DeserializeOwned;

/// Failures reading a command's input document.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input file not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl InputError {
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::InputNotFound,
            Self::Read { .. } => ErrorCode::InternalUnexpected,
            Self::Parse { .. } => ErrorCode::InputParseError,
        }
    }
}

/// Read `path` to a string; `-` reads stdin.
pub fn read_input(path: &Path) -> Result<String, InputError> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| InputError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(buf);
    }

    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON document from `path` (or stdin for `-`).
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InputError> {
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
