use std::sync::Arc;

use crate::artifacts::{ArtifactManifest, LoadedArtifacts};
use crate::ranking::RankingContext;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct HandlerState {
    /// Cheap to clone: the model and tables inside are already shared.
    pub context: RankingContext,

    pub manifest: Arc<ArtifactManifest>,

    /// Largest `top_k` a request may ask for.
    pub max_top_k: usize,
}

impl HandlerState {
    pub fn new(loaded: LoadedArtifacts, max_top_k: usize) -> Self {
        Self {
            context: loaded.context,
            manifest: Arc::new(loaded.manifest),
            max_top_k,
        }
    }
}
