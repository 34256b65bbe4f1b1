//! Geographic bounding-box filtering.
//!
//! The box is half-open: the south and west edges are inside, the north and
//! east edges are not.
//!
//! Corners are taken literally. A box whose south-west corner lies north or
//! east of its north-east corner is not normalised and simply matches
//! nothing, and boxes crossing the antimeridian are not modelled.

use geo::Coord;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Destination, QueryError};

/// A latitude/longitude rectangle given by its north-east and south-west
/// corners (`x = lng`, `y = lat`).
///
/// # Examples
/// ```
/// use stairway_core::{BoundingBox, Destination};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bbox = BoundingBox::new(10.0, 10.0, 0.0, 0.0)?;
/// let inside = Destination::new(1, "Inside", 0.0, 0.0)?;
/// let on_north_edge = Destination::new(2, "Edge", 10.0, 5.0)?;
/// assert!(bbox.contains(&inside));
/// assert!(!bbox.contains(&on_north_edge));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    north_east: Coord<f64>,
    south_west: Coord<f64>,
}

impl BoundingBox {
    /// Build a box from its four corner values in degrees.
    ///
    /// # Errors
    /// Returns [`QueryError::NonFiniteCoordinate`] when a value is NaN or
    /// infinite. Out-of-order corners are accepted as given.
    pub fn new(ne_lat: f64, ne_lng: f64, sw_lat: f64, sw_lng: f64) -> Result<Self, QueryError> {
        for (field, value) in [
            ("ne_lat", ne_lat),
            ("ne_lng", ne_lng),
            ("sw_lat", sw_lat),
            ("sw_lng", sw_lng),
        ] {
            if !value.is_finite() {
                return Err(QueryError::NonFiniteCoordinate { field, value });
            }
        }
        Ok(Self {
            north_east: Coord {
                x: ne_lng,
                y: ne_lat,
            },
            south_west: Coord {
                x: sw_lng,
                y: sw_lat,
            },
        })
    }

    /// Build a box only when all four values are present.
    ///
    /// A partially specified box is treated as no box at all.
    ///
    /// # Errors
    /// Propagates [`BoundingBox::new`] failures for complete boxes.
    pub fn from_parts(
        ne_lat: Option<f64>,
        ne_lng: Option<f64>,
        sw_lat: Option<f64>,
        sw_lng: Option<f64>,
    ) -> Result<Option<Self>, QueryError> {
        match (ne_lat, ne_lng, sw_lat, sw_lng) {
            (Some(north), Some(east), Some(south), Some(west)) => {
                Self::new(north, east, south, west).map(Some)
            }
            (None, None, None, None) => Ok(None),
            _ => {
                log::debug!("ignoring partially specified bounding box");
                Ok(None)
            }
        }
    }

    /// North-east corner.
    #[must_use]
    pub const fn north_east(&self) -> Coord<f64> {
        self.north_east
    }

    /// South-west corner.
    #[must_use]
    pub const fn south_west(&self) -> Coord<f64> {
        self.south_west
    }

    /// Half-open containment: `sw_lat <= lat < ne_lat` and
    /// `sw_lng <= lng < ne_lng`.
    #[must_use]
    pub fn contains(&self, destination: &Destination) -> bool {
        let location = destination.location();
        (self.south_west.y..self.north_east.y).contains(&location.y)
            && (self.south_west.x..self.north_east.x).contains(&location.x)
    }
}

/// Keep the destinations that fall inside `bbox`, preserving their order.
///
/// An empty intersection yields an empty vector.
pub fn filter_on_geolocation<'a, I>(destinations: I, bbox: &BoundingBox) -> Vec<&'a Destination>
where
    I: IntoIterator<Item = &'a Destination>,
{
    destinations
        .into_iter()
        .filter(|destination| bbox.contains(destination))
        .collect()
}
