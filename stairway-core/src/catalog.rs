//! The immutable snapshot of all tables served by the engines.
//!
//! A [`Catalog`] is built once at startup by a [`CatalogProvider`] and then
//! only ever read. Engines borrow it; callers share it across threads with
//! `Arc<Catalog>`. Replacing the data means building a new catalog.

use std::collections::HashMap;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    Destination, DestinationError, DestinationId, FeatureProfileMap, FeatureTable,
    FeatureTableError,
};

/// Destinations, feature scores, and profile membership loaded together.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "CatalogParts", into = "CatalogParts")
)]
pub struct Catalog {
    destinations: Vec<Destination>,
    index: HashMap<DestinationId, usize>,
    features: FeatureTable,
    profiles: FeatureProfileMap,
}

/// Serialised shape of a [`Catalog`]; the id index is rebuilt on load.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct CatalogParts {
    destinations: Vec<Destination>,
    features: FeatureTable,
    profiles: FeatureProfileMap,
}

/// Errors raised when the tables violate the catalog invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// A destination row failed validation.
    #[error(transparent)]
    Destination(#[from] DestinationError),
    /// The feature table failed validation.
    #[error(transparent)]
    FeatureTable(#[from] FeatureTableError),
    /// Two destinations share an identifier.
    #[error("destination id {id} appears more than once")]
    DuplicateId {
        /// Repeated identifier.
        id: DestinationId,
    },
    /// The feature table references a destination that does not exist.
    #[error("feature scores reference unknown destination {id}")]
    UnknownFeatureDestination {
        /// Identifier missing from the destination table.
        id: DestinationId,
    },
}

impl Catalog {
    /// Validate the tables and build the id index.
    ///
    /// Destinations keep their input order; every ordering the engines
    /// produce starts from it.
    ///
    /// # Errors
    /// Returns [`CatalogError`] for invalid rows, duplicate identifiers, or
    /// feature rows that reference unknown destinations.
    pub fn new(
        destinations: Vec<Destination>,
        features: FeatureTable,
        profiles: FeatureProfileMap,
    ) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(destinations.len());
        for (position, destination) in destinations.iter().enumerate() {
            destination.validate()?;
            if index.insert(destination.id, position).is_some() {
                return Err(CatalogError::DuplicateId { id: destination.id });
            }
        }
        features.validate()?;
        if let Some(id) = features
            .destination_ids()
            .find(|id| !index.contains_key(id))
        {
            return Err(CatalogError::UnknownFeatureDestination { id });
        }
        log::debug!(
            "catalog holds {} destinations, {} feature rows over {} features",
            destinations.len(),
            features.len(),
            features.features().len()
        );
        Ok(Self {
            destinations,
            index,
            features,
            profiles,
        })
    }

    /// All destinations in table order.
    #[must_use]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Look up a destination by identifier.
    #[must_use]
    pub fn get(&self, id: DestinationId) -> Option<&Destination> {
        self.index
            .get(&id)
            .and_then(|position| self.destinations.get(*position))
    }

    /// Report whether a destination exists.
    #[must_use]
    pub fn contains(&self, id: DestinationId) -> bool {
        self.index.contains_key(&id)
    }

    /// Feature scores.
    #[must_use]
    pub const fn features(&self) -> &FeatureTable {
        &self.features
    }

    /// Feature-to-profile membership.
    #[must_use]
    pub const fn profiles(&self) -> &FeatureProfileMap {
        &self.profiles
    }

    /// Number of destinations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.destinations.len()
    }

    /// Report whether the catalog holds no destinations.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl TryFrom<CatalogParts> for Catalog {
    type Error = CatalogError;

    fn try_from(parts: CatalogParts) -> Result<Self, Self::Error> {
        Self::new(parts.destinations, parts.features, parts.profiles)
    }
}

impl From<Catalog> for CatalogParts {
    fn from(catalog: Catalog) -> Self {
        Self {
            destinations: catalog.destinations,
            features: catalog.features,
            profiles: catalog.profiles,
        }
    }
}

/// Source of a fully loaded [`Catalog`].
///
/// Providers run once at process start. A failure is fatal for the caller:
/// there is no partially loaded catalog.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
/// use stairway_core::{Catalog, CatalogProvider, FeatureProfileMap, FeatureTable};
///
/// struct EmptyProvider;
///
/// impl CatalogProvider for EmptyProvider {
///     type Error = stairway_core::CatalogError;
///
///     fn load(&self) -> Result<Catalog, Self::Error> {
///         Catalog::new(Vec::new(), FeatureTable::default(), FeatureProfileMap::new())
///     }
/// }
///
/// let catalog = EmptyProvider.load().expect("empty catalog is valid");
/// assert!(catalog.is_empty());
/// ```
pub trait CatalogProvider {
    /// Error raised when the tables cannot be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate every table.
    ///
    /// # Errors
    /// Implementations return [`CatalogProvider::Error`] when a table is
    /// missing, unreadable, or violates the catalog invariants.
    fn load(&self) -> Result<Catalog, Self::Error>;
}
