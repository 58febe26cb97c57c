// Mon Jan 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Out of bounds: address {0:#x} not inside module code")]
    OutOfBounds(u64),
    #[error("Binary parse error: {0}")]
    BinaryParseError(String),
    #[error("No executable section in {0}")]
    NoCodeSection(String),
}
