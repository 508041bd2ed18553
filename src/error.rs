//! Crate-level error type

use crate::annotate::AnnotatorError;
use crate::config::ConfigError;
use crate::nli::{NliError, TokenizerError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Annotator(#[from] AnnotatorError),

    #[error(transparent)]
    Nli(#[from] NliError),

    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
