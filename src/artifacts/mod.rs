//! Loads the four serving artifacts once at startup.
//!
//! Each file is memory-mapped read-only, fingerprinted with BLAKE3 and parsed. The result is a
//! [`RankingContext`] plus an [`ArtifactManifest`] describing exactly what was loaded, which
//! the readiness endpoint reports.

pub mod error;


pub use error::{ArtifactError, ArtifactResult};

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use memmap2::Mmap;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::ReferenceDataset;
use crate::encoding::EncoderRegistry;
use crate::model::{FeatureColumns, LightGbmModel, Predictor};
use crate::ranking::RankingContext;

/// Which artifact a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Model,
    Encoders,
    FeatureColumns,
    ReferenceData,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Model => "model",
            ArtifactKind::Encoders => "encoders",
            ArtifactKind::FeatureColumns => "feature_columns",
            ArtifactKind::ReferenceData => "reference_data",
        };
        f.write_str(name)
    }
}

/// Read-only memory map of one artifact file.
pub struct ArtifactFile {
    path: PathBuf,
    mmap: Mmap,
}

impl ArtifactFile {
    pub fn open(path: impl AsRef<Path>) -> ArtifactResult<Self> {
        let path = path.as_ref();
        let io_err = |source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len == 0 {
            return Err(ArtifactError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        // SAFETY: mapped read-only; artifacts are not rewritten while the server runs.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    pub fn fingerprint(&self, kind: ArtifactKind) -> ArtifactFingerprint {
        ArtifactFingerprint {
            kind,
            path: self.path.clone(),
            bytes: self.len() as u64,
            blake3: blake3::hash(self.as_bytes()).to_hex().to_string(),
        }
    }
}

impl fmt::Debug for ArtifactFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactFile")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFingerprint {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub bytes: u64,
    /// Hex-encoded BLAKE3 digest of the file contents.
    pub blake3: String,
}

/// What was loaded, and when.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactManifest {
    pub files: Vec<ArtifactFingerprint>,
    pub loaded_at: DateTime<Utc>,
    pub num_trees: Option<usize>,
    pub num_features: usize,
    pub reference_rows: usize,
    /// Attributes found not to depend on their key alone (see the dataset join assumption).
    pub join_violations: usize,
}

impl ArtifactManifest {
    pub fn fingerprint(&self, kind: ArtifactKind) -> Option<&ArtifactFingerprint> {
        self.files.iter().find(|f| f.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub context: RankingContext,
    pub manifest: ArtifactManifest,
}

/// Reads, validates and assembles every artifact named by `config`.
///
/// Blocking: call from `spawn_blocking` or before the runtime starts serving.
pub fn load(config: &Config) -> ArtifactResult<LoadedArtifacts> {
    let started = Instant::now();

    let model_file = ArtifactFile::open(config.model_path())?;
    let encoders_file = ArtifactFile::open(config.encoders_path())?;
    let columns_file = ArtifactFile::open(config.feature_columns_path())?;
    let dataset_file = ArtifactFile::open(config.dataset_path())?;

    let model = parse_model(&model_file, config.num_iteration)?;

    let encoders = EncoderRegistry::from_json_slice(encoders_file.as_bytes()).map_err(|source| {
        ArtifactError::Encoders {
            path: encoders_file.path().to_path_buf(),
            source,
        }
    })?;

    let feature_columns =
        FeatureColumns::from_json_slice(columns_file.as_bytes()).map_err(|source| {
            ArtifactError::Model {
                path: columns_file.path().to_path_buf(),
                source,
            }
        })?;

    let dataset = ReferenceDataset::from_json_slice(dataset_file.as_bytes()).map_err(|source| {
        ArtifactError::Dataset {
            path: dataset_file.path().to_path_buf(),
            source,
        }
    })?;

    let violations = dataset.join_violations();
    for violation in &violations {
        warn!(
            key_column = %violation.key_column,
            attribute = %violation.attribute,
            conflicting_keys = violation.conflicting_keys,
            example_key = violation.example_key,
            "Attribute varies within a key; ranking reads the key's first row"
        );
    }
    if config.strict_joins && !violations.is_empty() {
        return Err(ArtifactError::JoinViolations {
            count: violations.len(),
        });
    }

    let manifest = ArtifactManifest {
        files: vec![
            model_file.fingerprint(ArtifactKind::Model),
            encoders_file.fingerprint(ArtifactKind::Encoders),
            columns_file.fingerprint(ArtifactKind::FeatureColumns),
            dataset_file.fingerprint(ArtifactKind::ReferenceData),
        ],
        loaded_at: Utc::now(),
        num_trees: model.num_trees(),
        num_features: model.num_features(),
        reference_rows: dataset.num_rows(),
        join_violations: violations.len(),
    };

    let context = RankingContext::new(Arc::new(model), encoders, dataset, feature_columns)
        .map_err(ArtifactError::Incompatible)?;

    info!(
        trees = ?manifest.num_trees,
        features = manifest.num_features,
        rows = manifest.reference_rows,
        encoders = ?context.encoders().names(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Artifacts loaded"
    );

    Ok(LoadedArtifacts { context, manifest })
}

fn parse_model(
    file: &ArtifactFile,
    num_iteration: Option<usize>,
) -> ArtifactResult<LightGbmModel> {
    let text = std::str::from_utf8(file.as_bytes()).map_err(|_| ArtifactError::NotUtf8 {
        path: file.path().to_path_buf(),
    })?;

    LightGbmModel::from_text(text, num_iteration).map_err(|source| ArtifactError::Model {
        path: file.path().to_path_buf(),
        source,
    })
}
