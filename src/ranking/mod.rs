//! Per-postal-code product ranking.
//!
//! Given a postal code, every product in the reference dataset gets one feature row (outlet
//! attributes from the postal code's first reference row, product attributes from the
//! product's first row, mean imputation for everything else). All rows are scored in a single
//! [`Predictor::predict`](crate::model::Predictor::predict) call and sorted by predicted
//! potential, with mean historical sales as tie-breaker.
//!
//! # Unknown Postal Codes
//!
//! A postal code the encoder has never seen is not an error. The routine substitutes the
//! FIRST class of the postal code encoder (encoder order, not the busiest outlet), logs a
//! warning and reports [`PostalResolution::Fallback`] so callers can surface it.

pub mod context;
pub mod error;
pub mod ranker;
pub mod types;


pub use context::RankingContext;
pub use error::{RankingError, RankingResult};
pub use ranker::{rank, resolve_postal_code, sort_by_potential};
pub use types::{PostalResolution, RankedProduct, Ranking};
