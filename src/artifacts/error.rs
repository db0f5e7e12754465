use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::encoding::EncoderError;
use crate::model::ModelError;

/// Errors returned while loading the serving artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Cannot map an empty file.
    #[error("artifact file is empty: {path}")]
    EmptyFile { path: PathBuf },

    #[error("model file {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    #[error("invalid encoder registry {path}: {source}")]
    Encoders {
        path: PathBuf,
        #[source]
        source: EncoderError,
    },

    #[error("invalid reference dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },

    #[error("invalid model artifact {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    /// Model and feature column list disagree.
    #[error("model does not match feature columns: {0}")]
    Incompatible(#[source] ModelError),

    /// Strict join checking found attributes that do not depend on their key alone.
    #[error("reference dataset violates the first-row join assumption in {count} attribute(s)")]
    JoinViolations { count: usize },
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;
