use thiserror::Error;

/// Errors surfaced while loading a ROM image into memory.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("ROM is {size} bytes but only {capacity} bytes of program memory are available")]
    Overflow { size: usize, capacity: usize },
    #[error("failed to read ROM: {0}")]
    Io(#[from] std::io::Error),
}
