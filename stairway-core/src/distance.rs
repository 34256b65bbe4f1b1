//! Great-circle distances between destinations.

use geo::Coord;

use crate::{Destination, DestinationId};

/// Mean Earth radius used by [`haversine_km`], in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two WGS84 positions given in
/// degrees (`x = lng`, `y = lat`).
///
/// # Examples
/// ```
/// use geo::Coord;
/// use stairway_core::haversine_km;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let one_degree_east = Coord { x: 1.0, y: 0.0 };
/// let km = haversine_km(origin, one_degree_east);
/// assert!((km - 111.195).abs() < 0.001);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine is trigonometric arithmetic"
)]
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let lat1 = from.y.to_radians();
    let lat2 = to.y.to_radians();
    let half_dlat = (lat2 - lat1) / 2.0;
    let half_dlng = (to.x.to_radians() - from.x.to_radians()) / 2.0;
    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlng.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// A destination paired with its distance to a reference place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRanked<'a> {
    /// Candidate destination.
    pub destination: &'a Destination,
    /// Great-circle distance to the reference place in kilometres.
    pub distance_km: f64,
}

/// Order every destination except `place_id` by distance to `place_id`,
/// nearest first.
///
/// Equidistant destinations keep table order. Returns `None` when
/// `place_id` is not in `destinations`.
///
/// # Examples
/// ```
/// use stairway_core::{Destination, sort_by_distance};
///
/// # fn main() -> Result<(), stairway_core::DestinationError> {
/// let table = vec![
///     Destination::new(1, "A", 0.0, 0.0)?,
///     Destination::new(2, "B", 0.0, 1.0)?,
///     Destination::new(3, "C", 10.0, 10.0)?,
/// ];
/// let ranked = sort_by_distance(&table, 1).expect("place exists");
/// let ids: Vec<u64> = ranked.iter().map(|r| r.destination.id).collect();
/// assert_eq!(ids, vec![2, 3]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn sort_by_distance(
    destinations: &[Destination],
    place_id: DestinationId,
) -> Option<Vec<DistanceRanked<'_>>> {
    let place = destinations.iter().find(|d| d.id == place_id)?.location();
    let mut ranked: Vec<DistanceRanked<'_>> = destinations
        .iter()
        .filter(|destination| destination.id != place_id)
        .map(|destination| DistanceRanked {
            destination,
            distance_km: haversine_km(destination.location(), place),
        })
        .collect();
    ranked.sort_by(|left, right| left.distance_km.total_cmp(&right.distance_km));
    Some(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::ops::RangeInclusive;

    fn at(id: DestinationId, lat: f64, lng: f64) -> Destination {
        Destination::new(id, format!("d{id}"), lat, lng).expect("valid destination")
    }

    #[rstest]
    // Amsterdam to Paris, then London to New York.
    #[case(Coord { x: 4.90, y: 52.37 }, Coord { x: 2.35, y: 48.86 }, 425.0..=435.0)]
    #[case(Coord { x: -0.13, y: 51.51 }, Coord { x: -74.01, y: 40.71 }, 5515.0..=5625.0)]
    fn matches_known_distances(
        #[case] from: Coord<f64>,
        #[case] to: Coord<f64>,
        #[case] expected_km: RangeInclusive<f64>,
    ) {
        let distance = haversine_km(from, to);
        assert!(expected_km.contains(&distance), "got {distance} km");
    }

    #[rstest]
    #[expect(clippy::float_arithmetic, reason = "difference of two distances")]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Coord { x: 10.0, y: 20.0 };
        let b = Coord { x: -30.0, y: -5.0 };
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-9);
        assert!(haversine_km(a, a).abs() < 1e-12);
    }

    #[rstest]
    #[expect(
        clippy::float_arithmetic,
        reason = "half circumference is pi times the radius"
    )]
    fn antipodes_are_half_circumference_apart() {
        let distance = haversine_km(Coord { x: 0.0, y: 0.0 }, Coord { x: 180.0, y: 0.0 });
        let expected = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance - expected).abs() < 1e-6);
    }

    #[rstest]
    fn excludes_reference_and_sorts_ascending() {
        let table = vec![
            at(1, 0.0, 0.0),
            at(2, 10.0, 10.0),
            at(3, 0.0, 1.0),
            at(4, 0.0, -2.0),
        ];
        let ranked = sort_by_distance(&table, 1).expect("place exists");
        let ids: Vec<DestinationId> = ranked.iter().map(|r| r.destination.id).collect();
        assert_eq!(ids, vec![3, 4, 2]);
        let distances: Vec<f64> = ranked.iter().map(|r| r.distance_km).collect();
        assert!(distances.is_sorted());
    }

    #[rstest]
    fn unknown_place_yields_none() {
        let table = vec![at(1, 0.0, 0.0)];
        assert!(sort_by_distance(&table, 2).is_none());
    }

    #[rstest]
    fn lone_place_has_no_neighbours() {
        let table = vec![at(1, 0.0, 0.0)];
        let ranked = sort_by_distance(&table, 1).expect("place exists");
        assert!(ranked.is_empty());
    }
}
