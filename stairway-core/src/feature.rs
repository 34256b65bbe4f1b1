//! Per-destination feature scores and feature-to-profile membership.
//!
//! The [`FeatureTable`] is a dense, column-ordered score matrix: the order
//! in which features are declared is the tie-break order whenever two
//! features share a score. Absent `(destination, feature)` pairs score `0.0`.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::DestinationId;

/// Dense table of feature scores keyed by destination.
///
/// # Examples
/// ```
/// use stairway_core::FeatureTable;
///
/// # fn main() -> Result<(), stairway_core::FeatureTableError> {
/// let table = FeatureTable::new(vec!["hiking".into(), "museums".into()])?
///     .with_row(1, vec![0.8, 0.1])?;
/// assert_eq!(table.score(1, "hiking"), 0.8);
/// assert_eq!(table.score(2, "hiking"), 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureTable {
    features: Vec<String>,
    rows: HashMap<DestinationId, Vec<f64>>,
}

/// Errors raised while building a [`FeatureTable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureTableError {
    /// The same feature name was declared twice.
    #[error("feature `{name}` is declared more than once")]
    DuplicateFeature {
        /// Repeated feature name.
        name: String,
    },
    /// A row did not provide one score per declared feature.
    #[error("scores for destination {id} have {found} values, expected {expected}")]
    RowLength {
        /// Destination owning the row.
        id: DestinationId,
        /// Number of declared features.
        expected: usize,
        /// Number of scores supplied.
        found: usize,
    },
    /// A score was NaN or infinite.
    #[error("score for destination {id} and feature `{feature}` is not finite")]
    NonFiniteScore {
        /// Destination owning the row.
        id: DestinationId,
        /// Feature holding the bad value.
        feature: String,
    },
}

impl FeatureTable {
    /// Create an empty table with the given feature columns.
    ///
    /// # Errors
    /// Returns [`FeatureTableError::DuplicateFeature`] for repeated names.
    pub fn new(features: Vec<String>) -> Result<Self, FeatureTableError> {
        let mut seen = BTreeSet::new();
        for name in &features {
            if !seen.insert(name.as_str()) {
                return Err(FeatureTableError::DuplicateFeature { name: name.clone() });
            }
        }
        Ok(Self {
            features,
            rows: HashMap::new(),
        })
    }

    /// Insert or replace the scores of a destination.
    ///
    /// # Errors
    /// Returns [`FeatureTableError`] when the row length does not match the
    /// declared features or contains a non-finite score.
    pub fn insert_row(
        &mut self,
        id: DestinationId,
        scores: Vec<f64>,
    ) -> Result<(), FeatureTableError> {
        self.check_row(id, &scores)?;
        self.rows.insert(id, scores);
        Ok(())
    }

    /// Chaining variant of [`FeatureTable::insert_row`].
    ///
    /// # Errors
    /// Propagates [`FeatureTable::insert_row`] failures.
    pub fn with_row(
        mut self,
        id: DestinationId,
        scores: Vec<f64>,
    ) -> Result<Self, FeatureTableError> {
        self.insert_row(id, scores)?;
        Ok(self)
    }

    /// Re-check every row, e.g. after deserialising the table.
    ///
    /// # Errors
    /// Returns the first [`FeatureTableError`] found.
    pub fn validate(&self) -> Result<(), FeatureTableError> {
        Self::new(self.features.clone())?;
        self.rows
            .iter()
            .try_for_each(|(id, scores)| self.check_row(*id, scores))
    }

    fn check_row(&self, id: DestinationId, scores: &[f64]) -> Result<(), FeatureTableError> {
        if scores.len() != self.features.len() {
            return Err(FeatureTableError::RowLength {
                id,
                expected: self.features.len(),
                found: scores.len(),
            });
        }
        if let Some((feature, _)) = self
            .features
            .iter()
            .zip(scores)
            .find(|(_, score)| !score.is_finite())
        {
            return Err(FeatureTableError::NonFiniteScore {
                id,
                feature: feature.clone(),
            });
        }
        Ok(())
    }

    /// Feature names in declaration order.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Scores of a destination aligned with [`FeatureTable::features`].
    #[must_use]
    pub fn row(&self, id: DestinationId) -> Option<&[f64]> {
        self.rows.get(&id).map(Vec::as_slice)
    }

    /// Score of a single `(destination, feature)` pair; `0.0` when absent.
    #[must_use]
    pub fn score(&self, id: DestinationId, feature: &str) -> f64 {
        let Some(column) = self.features.iter().position(|name| name == feature) else {
            return 0.0;
        };
        self.row(id)
            .and_then(|scores| scores.get(column))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterate over `(feature, score)` pairs of a destination in declaration
    /// order. Empty when the destination has no row.
    pub fn scores_of(&self, id: DestinationId) -> impl Iterator<Item = (&str, f64)> + '_ {
        let scores = self.row(id).unwrap_or_default();
        self.features
            .iter()
            .map(String::as_str)
            .zip(scores.iter().copied())
    }

    /// Drop the score rows of destinations rejected by `keep`.
    pub fn retain_destinations<F>(&mut self, mut keep: F)
    where
        F: FnMut(DestinationId) -> bool,
    {
        self.rows.retain(|id, _| keep(*id));
    }

    /// Destinations that have a score row.
    pub fn destination_ids(&self) -> impl Iterator<Item = DestinationId> + '_ {
        self.rows.keys().copied()
    }

    /// Number of destinations with a score row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Report whether no destination has scores.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Many-to-many membership of features in interest profiles.
///
/// # Examples
/// ```
/// use stairway_core::FeatureProfileMap;
///
/// let map = FeatureProfileMap::new()
///     .with_membership("hiking", "nature")
///     .with_membership("hiking", "sport");
/// assert!(map.belongs_to("hiking", "nature"));
/// assert!(!map.belongs_to("hiking", "culture"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureProfileMap {
    memberships: BTreeMap<String, BTreeSet<String>>,
}

impl FeatureProfileMap {
    /// Construct an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `feature` belongs to `profile`.
    pub fn insert(&mut self, feature: impl Into<String>, profile: impl Into<String>) {
        self.memberships
            .entry(feature.into())
            .or_default()
            .insert(profile.into());
    }

    /// Chaining variant of [`FeatureProfileMap::insert`].
    #[must_use]
    pub fn with_membership(
        mut self,
        feature: impl Into<String>,
        profile: impl Into<String>,
    ) -> Self {
        self.insert(feature, profile);
        self
    }

    /// Report whether `feature` belongs to `profile`.
    #[must_use]
    pub fn belongs_to(&self, feature: &str, profile: &str) -> bool {
        self.memberships
            .get(feature)
            .is_some_and(|profiles| profiles.contains(profile))
    }

    /// Iterate over `(feature, profiles)` pairs in feature name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.memberships
            .iter()
            .map(|(feature, profiles)| (feature.as_str(), profiles))
    }

    /// Number of features with at least one declared membership.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    /// Report whether no membership is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }
}
