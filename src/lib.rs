//! Outlet ranker library crate (used by the server binary and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`RankingContext`], [`Ranking`], [`RankedProduct`] - Per-postal-code ranking
//! - [`LoadedArtifacts`], [`ArtifactManifest`] - Artifact loading
//!
//! ## Model
//! - [`Predictor`] - Batch inference seam
//! - [`LightGbmModel`] - LightGBM booster loaded from a text model file
//! - [`FeatureColumns`] - Ordered model input layout
//!
//! ## Data
//! - [`EncoderRegistry`], [`LabelEncoder`] - Categorical label encoders
//! - [`ReferenceDataset`] - Historical encoded records
//!
//! ## Test/Mock Support
//! [`MockPredictor`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod artifacts;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod encoding;
pub mod gateway;
pub mod model;
pub mod ranking;

pub use artifacts::{
    ArtifactError, ArtifactFile, ArtifactFingerprint, ArtifactKind, ArtifactManifest,
    LoadedArtifacts, load as load_artifacts,
};
pub use config::{Config, ConfigError};
pub use dataset::{DatasetError, DependencyViolation, KeyIndex, ReferenceDataset};
pub use encoding::{EncoderError, EncoderRegistry, LabelEncoder};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
#[cfg(any(test, feature = "mock"))]
pub use model::MockPredictor;
pub use model::{FeatureColumns, LightGbmModel, ModelError, ModelText, Predictor};
pub use ranking::{
    PostalResolution, RankedProduct, Ranking, RankingContext, RankingError, resolve_postal_code,
};
