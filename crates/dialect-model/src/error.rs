//! Error types for dialect-model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Model text could not be tokenized at all.
    ///
    /// Reserved at the API boundary: `detect` never surfaces this —
    /// untokenizable (binary/encrypted) payloads set the encrypted flag
    /// instead.
    #[error("model text not tokenizable: {0}")]
    ModelParse(String),

    /// A flagged construct the synthesizer cannot approximate.
    ///
    /// Currently never produced; reserved for future construct families.
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(String),

    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
