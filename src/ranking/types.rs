use std::fmt;

/// How the requested postal code was mapped to an encoded outlet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalResolution {
    /// The postal code is a known encoder class.
    Known { code: usize },
    /// Unknown postal code; the encoder's first class was used instead.
    Fallback {
        requested: String,
        fallback: String,
        code: usize,
    },
}

impl PostalResolution {
    /// Encoded postal code used for scoring.
    pub fn code(&self) -> usize {
        match self {
            PostalResolution::Known { code } | PostalResolution::Fallback { code, .. } => *code,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PostalResolution::Fallback { .. })
    }

    /// Short status string for response headers and logs.
    pub fn status(&self) -> &'static str {
        match self {
            PostalResolution::Known { .. } => "ok",
            PostalResolution::Fallback { .. } => "fallback",
        }
    }
}

impl fmt::Display for PostalResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostalResolution::Known { code } => write!(f, "KNOWN (code: {code})"),
            PostalResolution::Fallback {
                requested,
                fallback,
                code,
            } => write!(f, "FALLBACK ({requested} -> {fallback}, code: {code})"),
        }
    }
}

/// One scored product.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProduct {
    /// Internal product code the model scored.
    pub product_code: i64,
    /// Decoded product identifier.
    pub product_id: String,
    /// Decoded name; `None` when no name encoder is loaded.
    pub product_name: Option<String>,
    /// Decoded category; `None` when no category encoder is loaded.
    pub category: Option<String>,
    pub predicted_potential: f64,
    /// Mean historical sales of the product, NaN when undefined.
    pub historical_sales: f64,
}

/// Ranking output for one request, best product first.
#[derive(Debug, Clone)]
pub struct Ranking {
    pub resolution: PostalResolution,
    pub products: Vec<RankedProduct>,
    /// Products that had joinable reference rows and were scored (before truncation).
    pub candidates: usize,
}

impl Ranking {
    pub fn empty(resolution: PostalResolution) -> Self {
        Self {
            resolution,
            products: Vec::new(),
            candidates: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
