//! Single-destination lookup.

use crate::{
    Catalog, DestinationId, DestinationRecord, FeatureSelection, pick_uniform, resolve_seed,
    select_features_with_profiles,
};

/// Fetch one destination, or a random one, with features attached.
#[derive(Debug, Clone, Copy)]
pub struct DestinationLookup<'c> {
    catalog: &'c Catalog,
    selection: FeatureSelection,
}

impl<'c> DestinationLookup<'c> {
    /// Create a lookup with the default feature selection.
    #[must_use]
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            selection: FeatureSelection::default(),
        }
    }

    /// Override how features are attached to the record.
    #[must_use]
    pub const fn with_selection(mut self, selection: FeatureSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Return the destination with `id`, or a uniformly random destination
    /// when `id` is `None`.
    ///
    /// Returns `None` for an unknown id or an empty catalog. `seed` only
    /// affects the random pick.
    ///
    /// # Examples
    /// ```
    /// use stairway_core::{Catalog, Destination, DestinationLookup};
    /// use stairway_core::{FeatureProfileMap, FeatureTable};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let catalog = Catalog::new(
    ///     vec![Destination::new(5, "Ghent", 51.05, 3.72)?],
    ///     FeatureTable::default(),
    ///     FeatureProfileMap::new(),
    /// )?;
    /// let lookup = DestinationLookup::new(&catalog);
    /// assert_eq!(lookup.lookup(Some(5), &[], None).map(|r| r.destination.id), Some(5));
    /// assert!(lookup.lookup(Some(6), &[], None).is_none());
    /// assert_eq!(lookup.lookup(None, &[], Some(1)).map(|r| r.destination.id), Some(5));
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn lookup(
        &self,
        id: Option<DestinationId>,
        profiles: &[String],
        seed: Option<u64>,
    ) -> Option<DestinationRecord> {
        let destination = id.map_or_else(
            || pick_uniform(self.catalog.destinations(), resolve_seed(seed)),
            |wanted| self.catalog.get(wanted),
        )?;
        Some(DestinationRecord {
            destination: destination.clone(),
            features: select_features_with_profiles(
                destination.id,
                profiles,
                self.catalog.features(),
                self.catalog.profiles(),
                self.selection,
            ),
        })
    }
}
