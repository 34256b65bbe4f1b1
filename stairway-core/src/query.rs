//! Typed request records for the explore and nearby engines.
//!
//! Queries are ephemeral: the transport layer builds one per request,
//! validates it, hands it to an engine, and drops it.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BoundingBox, DestinationId, parse_destination_id};

/// Page size used when a request does not specify one.
pub const DEFAULT_N_RESULTS: usize = 12;

/// Errors raised when a query is malformed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A coordinate was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteCoordinate {
        /// Name of the offending query field.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A profile name was empty or whitespace.
    #[error("profile names must not be blank")]
    BlankProfile,
}

/// Parameters of an explore request.
///
/// # Examples
/// ```
/// use stairway_core::{DEFAULT_N_RESULTS, ExploreQuery};
///
/// let query = ExploreQuery {
///     country: Some("Italy".into()),
///     profiles: vec!["culture".into()],
///     ..ExploreQuery::default()
/// };
/// assert_eq!(query.offset, 0);
/// assert_eq!(query.n_results, DEFAULT_N_RESULTS);
/// assert!(query.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ExploreQuery {
    /// Determinism key for the popularity shuffle; drawn at random when
    /// absent.
    pub seed: Option<u64>,
    /// Index of the first result to return.
    pub offset: usize,
    /// Maximum number of results to return.
    pub n_results: usize,
    /// Case-insensitive exact country filter.
    pub country: Option<String>,
    /// Geographic filter, applied only when the country did not match.
    pub bbox: Option<BoundingBox>,
    /// Interest profiles; order is irrelevant.
    pub profiles: Vec<String>,
}

impl Default for ExploreQuery {
    fn default() -> Self {
        Self {
            seed: None,
            offset: 0,
            n_results: DEFAULT_N_RESULTS,
            country: None,
            bbox: None,
            profiles: Vec::new(),
        }
    }
}

impl ExploreQuery {
    /// Check the query before dispatching it to an engine.
    ///
    /// # Errors
    /// Returns [`QueryError::BlankProfile`] when a profile name is blank.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.profiles.iter().any(|name| name.trim().is_empty()) {
            return Err(QueryError::BlankProfile);
        }
        Ok(())
    }

    /// Country filter with surrounding whitespace removed; blank counts as
    /// absent.
    #[must_use]
    pub fn country_filter(&self) -> Option<&str> {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty())
    }
}

/// Parameters of a nearby request.
///
/// `place_id` is `None` when the caller supplied something that is not an
/// integer; engines answer such requests with an empty result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NearbyQuery {
    /// Reference destination.
    pub place_id: Option<DestinationId>,
    /// Maximum number of results to return.
    #[cfg_attr(feature = "serde", serde(default = "default_n_results"))]
    pub n_results: usize,
    /// Determinism key for the popularity re-sampling.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
}

#[cfg(feature = "serde")]
const fn default_n_results() -> usize {
    DEFAULT_N_RESULTS
}

impl NearbyQuery {
    /// Build a query around a known destination id.
    #[must_use]
    pub const fn new(place_id: DestinationId) -> Self {
        Self {
            place_id: Some(place_id),
            n_results: DEFAULT_N_RESULTS,
            seed: None,
        }
    }

    /// Build a query from a raw, possibly malformed, identifier.
    ///
    /// # Examples
    /// ```
    /// use stairway_core::NearbyQuery;
    ///
    /// assert_eq!(NearbyQuery::from_raw_id("17").place_id, Some(17));
    /// assert_eq!(NearbyQuery::from_raw_id("abc").place_id, None);
    /// ```
    #[must_use]
    pub fn from_raw_id(raw: &str) -> Self {
        Self {
            place_id: parse_destination_id(raw),
            n_results: DEFAULT_N_RESULTS,
            seed: None,
        }
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    /// Set the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
