//! Travel destinations and their popularity weights.
//!
//! A [`Destination`] is one row of the destination table. Besides its
//! identity and WGS84 position it carries `nr_tokens`, the length of the text
//! describing the place, from which the popularity sampling `weight` is
//! derived.

use geo::Coord;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of a destination.
pub type DestinationId = u64;

/// Exponent applied to `nr_tokens` when deriving the sampling weight.
pub const DEFAULT_POWER_FACTOR: f64 = 1.5;

/// A place that can be recommended to a traveller.
///
/// Coordinates are WGS84 degrees. `weight` is always recomputable from
/// `nr_tokens` via [`token_weight`]; `nr_tokens_norm` is the min-max
/// normalised token count over the whole prepared table.
///
/// # Examples
/// ```
/// use stairway_core::Destination;
///
/// # fn main() -> Result<(), stairway_core::DestinationError> {
/// let lisbon = Destination::new(7, "Lisbon", 38.72, -9.14)?
///     .with_country("Portugal")
///     .with_nr_tokens(100);
/// assert_eq!(lisbon.weight, 1000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Destination {
    /// Unique identifier.
    pub id: DestinationId,
    /// Identifier of the source page the destination was extracted from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wiki_id: u64,
    /// Display name.
    pub name: String,
    /// Country the destination belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub country: String,
    /// Editorial status of the source page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: String,
    /// Kind of place (city, region, park, ...).
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub kind: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Size of the text describing the place.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nr_tokens: u64,
    /// Popularity sampling weight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight: u64,
    /// `nr_tokens` normalised to `0.0..=1.0`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub nr_tokens_norm: f64,
}

/// Errors returned when a destination fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DestinationError {
    /// Latitude outside `-90.0..=90.0` or not finite.
    #[error("destination {id} has invalid latitude {lat}")]
    InvalidLatitude {
        /// Offending destination.
        id: DestinationId,
        /// Rejected value.
        lat: f64,
    },
    /// Longitude outside `-180.0..=180.0` or not finite.
    #[error("destination {id} has invalid longitude {lng}")]
    InvalidLongitude {
        /// Offending destination.
        id: DestinationId,
        /// Rejected value.
        lng: f64,
    },
    /// Normalised token count outside `0.0..=1.0` or not finite.
    #[error("destination {id} has invalid normalised token count {value}")]
    InvalidTokenNorm {
        /// Offending destination.
        id: DestinationId,
        /// Rejected value.
        value: f64,
    },
}

impl Destination {
    /// Validate coordinates and construct a destination with empty metadata.
    ///
    /// # Errors
    /// Returns [`DestinationError`] when either coordinate is out of range.
    pub fn new(
        id: DestinationId,
        name: impl Into<String>,
        lat: f64,
        lng: f64,
    ) -> Result<Self, DestinationError> {
        let destination = Self {
            id,
            wiki_id: 0,
            name: name.into(),
            country: String::new(),
            status: String::new(),
            kind: String::new(),
            lat,
            lng,
            nr_tokens: 0,
            weight: 0,
            nr_tokens_norm: 0.0,
        };
        destination.validate()?;
        Ok(destination)
    }

    /// Check the invariants of a destination, e.g. after deserialising it.
    ///
    /// # Errors
    /// Returns [`DestinationError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), DestinationError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(DestinationError::InvalidLatitude {
                id: self.id,
                lat: self.lat,
            });
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(DestinationError::InvalidLongitude {
                id: self.id,
                lng: self.lng,
            });
        }
        if !self.nr_tokens_norm.is_finite() || !(0.0..=1.0).contains(&self.nr_tokens_norm) {
            return Err(DestinationError::InvalidTokenNorm {
                id: self.id,
                value: self.nr_tokens_norm,
            });
        }
        Ok(())
    }

    /// Position as a `geo` coordinate (`x = lng`, `y = lat`).
    #[must_use]
    pub const fn location(&self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }

    /// Popularity weight as a float, for the weighted samplers.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "relative sampling weights tolerate rounding above 2^53"
    )]
    pub const fn sampling_weight(&self) -> f64 {
        self.weight as f64
    }

    /// Set the source page identifier.
    #[must_use]
    pub const fn with_wiki_id(mut self, wiki_id: u64) -> Self {
        self.wiki_id = wiki_id;
        self
    }

    /// Set the country.
    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the editorial status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Set the kind of place.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Set the token count and derive the sampling weight from it.
    #[must_use]
    pub fn with_nr_tokens(mut self, nr_tokens: u64) -> Self {
        self.nr_tokens = nr_tokens;
        self.weight = token_weight(nr_tokens, DEFAULT_POWER_FACTOR);
        self
    }

    /// Set the normalised token count, clamped into `0.0..=1.0`.
    #[must_use]
    pub const fn with_nr_tokens_norm(mut self, nr_tokens_norm: f64) -> Self {
        self.nr_tokens_norm = if nr_tokens_norm.is_finite() {
            nr_tokens_norm.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }
}

/// Derive the popularity sampling weight `trunc(nr_tokens ^ power_factor)`.
///
/// The fractional part is discarded, matching the integer weights the
/// historical data set was published with. Non-finite results saturate.
///
/// # Examples
/// ```
/// use stairway_core::{DEFAULT_POWER_FACTOR, token_weight};
///
/// assert_eq!(token_weight(4, DEFAULT_POWER_FACTOR), 8);
/// assert_eq!(token_weight(10, DEFAULT_POWER_FACTOR), 31);
/// assert_eq!(token_weight(0, DEFAULT_POWER_FACTOR), 0);
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "weights are non-negative and truncation is the documented rounding"
)]
pub fn token_weight(nr_tokens: u64, power_factor: f64) -> u64 {
    let raw = (nr_tokens as f64).powf(power_factor);
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    // `as` saturates at u64::MAX for out-of-range floats.
    raw.trunc() as u64
}

/// Parse a raw identifier, treating anything that is not an integer as absent.
///
/// # Examples
/// ```
/// use stairway_core::parse_destination_id;
///
/// assert_eq!(parse_destination_id("42"), Some(42));
/// assert_eq!(parse_destination_id(" 42 "), Some(42));
/// assert_eq!(parse_destination_id("forty-two"), None);
/// ```
#[must_use]
pub fn parse_destination_id(raw: &str) -> Option<DestinationId> {
    raw.trim().parse().ok()
}
