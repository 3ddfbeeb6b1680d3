use thiserror::Error;

/// Decode failures are read failures: the record format itself has no
/// invalid encodings, and a trailing partial record is dropped rather
/// than reported.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read point cloud source: {0}")]
    Read(#[from] std::io::Error),
}
