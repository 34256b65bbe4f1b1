//! Select the most relevant feature labels for a destination.
//!
//! Features are ranked by score, descending. Ties keep declaration order
//! because every sort here is stable. When interest profiles are requested,
//! features belonging to those profiles are listed first and the remaining
//! slots are filled from the other features.

use std::collections::BTreeSet;

use crate::{DestinationId, FeatureProfileMap, FeatureTable};

/// How many features to return and how relevant they must be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSelection {
    /// Maximum number of labels returned.
    pub top_x: usize,
    /// Scores must be strictly greater than this value.
    pub min_threshold: f64,
}

impl Default for FeatureSelection {
    fn default() -> Self {
        Self {
            top_x: 5,
            min_threshold: 0.1,
        }
    }
}

/// Return up to `top_x` feature names scoring above `min_threshold`,
/// highest score first.
///
/// # Examples
/// ```
/// use stairway_core::{FeatureSelection, FeatureTable, select_top_features};
///
/// # fn main() -> Result<(), stairway_core::FeatureTableError> {
/// let table = FeatureTable::new(vec!["f1".into(), "f2".into(), "f3".into()])?
///     .with_row(1, vec![0.9, 0.05, 0.5])?;
/// let selection = FeatureSelection { top_x: 2, min_threshold: 0.1 };
/// assert_eq!(select_top_features(1, &table, selection), vec!["f1", "f3"]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn select_top_features(
    id: DestinationId,
    features: &FeatureTable,
    selection: FeatureSelection,
) -> Vec<String> {
    select_top_features_where(id, features, selection, |_| true)
}

fn select_top_features_where<P>(
    id: DestinationId,
    features: &FeatureTable,
    selection: FeatureSelection,
    include: P,
) -> Vec<String>
where
    P: Fn(&str) -> bool,
{
    let mut candidates: Vec<(&str, f64)> = features
        .scores_of(id)
        .filter(|&(name, score)| include(name) && score > selection.min_threshold)
        .collect();
    candidates.sort_by(|(_, left), (_, right)| right.total_cmp(left));
    candidates
        .into_iter()
        .take(selection.top_x)
        .map(|(name, _)| name.to_owned())
        .collect()
}

/// Features that belong to at least one of the requested profiles.
///
/// An empty profile list selects nothing.
///
/// # Examples
/// ```
/// use stairway_core::{FeatureProfileMap, select_in_scope_features};
///
/// let map = FeatureProfileMap::new()
///     .with_membership("hiking", "nature")
///     .with_membership("museums", "culture");
/// let scope = select_in_scope_features(&["nature".to_owned()], &map);
/// assert!(scope.contains("hiking"));
/// assert!(!scope.contains("museums"));
/// ```
#[must_use]
pub fn select_in_scope_features(
    profiles: &[String],
    profile_map: &FeatureProfileMap,
) -> BTreeSet<String> {
    profile_map
        .iter()
        .filter(|(_, members)| profiles.iter().any(|profile| members.contains(profile)))
        .map(|(feature, _)| feature.to_owned())
        .collect()
}

/// Return up to `top_x` features, preferring those in the requested
/// profiles.
///
/// In-scope features are ranked first; if fewer than `top_x` qualify, the
/// list is padded with the best out-of-scope features. With no profiles this
/// is exactly [`select_top_features`].
#[must_use]
pub fn select_features_with_profiles(
    id: DestinationId,
    profiles: &[String],
    features: &FeatureTable,
    profile_map: &FeatureProfileMap,
    selection: FeatureSelection,
) -> Vec<String> {
    let in_scope = select_in_scope_features(profiles, profile_map);
    let mut selected =
        select_top_features_where(id, features, selection, |name| in_scope.contains(name));
    let remaining = selection.top_x.saturating_sub(selected.len());
    if remaining > 0 {
        let fill = FeatureSelection {
            top_x: remaining,
            ..selection
        };
        let rest = select_top_features_where(id, features, fill, |name| !in_scope.contains(name));
        selected.extend(rest);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn table() -> FeatureTable {
        FeatureTable::new(vec![
            "hiking".into(),
            "beach".into(),
            "museums".into(),
            "nightlife".into(),
            "castles".into(),
        ])
        .expect("valid columns")
        .with_row(1, vec![0.4, 0.9, 0.6, 0.05, 0.6])
        .expect("valid row")
    }

    #[fixture]
    fn profile_map() -> FeatureProfileMap {
        FeatureProfileMap::new()
            .with_membership("hiking", "nature")
            .with_membership("beach", "nature")
            .with_membership("museums", "culture")
            .with_membership("castles", "culture")
    }

    #[rstest]
    fn ties_keep_declaration_order(table: FeatureTable) {
        let selected = select_top_features(1, &table, FeatureSelection::default());
        assert_eq!(selected, vec!["beach", "museums", "castles", "hiking"]);
    }

    #[rstest]
    fn threshold_is_strict(table: FeatureTable) {
        let selection = FeatureSelection {
            top_x: 5,
            min_threshold: 0.6,
        };
        assert_eq!(select_top_features(1, &table, selection), vec!["beach"]);
    }

    #[rstest]
    fn unknown_destination_has_no_features(table: FeatureTable) {
        assert!(select_top_features(42, &table, FeatureSelection::default()).is_empty());
    }

    #[rstest]
    fn empty_profiles_select_empty_scope(profile_map: FeatureProfileMap) {
        assert!(select_in_scope_features(&[], &profile_map).is_empty());
    }

    #[rstest]
    fn scope_is_union_of_profiles(profile_map: FeatureProfileMap) {
        let scope = select_in_scope_features(&["nature".into(), "culture".into()], &profile_map);
        assert_eq!(scope.len(), 4);
    }

    #[rstest]
    fn in_scope_features_come_first(table: FeatureTable, profile_map: FeatureProfileMap) {
        let selection = FeatureSelection {
            top_x: 3,
            min_threshold: 0.1,
        };
        let selected =
            select_features_with_profiles(1, &["culture".into()], &table, &profile_map, selection);
        assert_eq!(selected, vec!["museums", "castles", "beach"]);
    }

    #[rstest]
    fn padding_never_repeats_features(table: FeatureTable, profile_map: FeatureProfileMap) {
        let selected = select_features_with_profiles(
            1,
            &["nature".into()],
            &table,
            &profile_map,
            FeatureSelection::default(),
        );
        assert_eq!(selected, vec!["beach", "hiking", "museums", "castles"]);
    }

    #[rstest]
    fn no_profiles_matches_unrestricted(table: FeatureTable, profile_map: FeatureProfileMap) {
        let selection = FeatureSelection::default();
        assert_eq!(
            select_features_with_profiles(1, &[], &table, &profile_map, selection),
            select_top_features(1, &table, selection)
        );
    }

    #[rstest]
    fn zero_top_x_selects_nothing(table: FeatureTable, profile_map: FeatureProfileMap) {
        let selection = FeatureSelection {
            top_x: 0,
            min_threshold: 0.1,
        };
        let selected =
            select_features_with_profiles(1, &["nature".into()], &table, &profile_map, selection);
        assert!(selected.is_empty());
    }
}
