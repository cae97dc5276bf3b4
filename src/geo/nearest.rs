use crate::domain::Park;
use crate::geo::distance::{Coordinate, GeoError, haversine_km};
use std::collections::HashSet;

/// A park paired with its great-circle distance from the query origin.
#[derive(Debug, Clone, Copy)]
pub struct NearestPark<'a> {
    pub park: &'a Park,
    pub distance_km: f64,
}

/// Find the park nearest to `origin` by haversine distance.
///
/// Linear scan in input order; exact ties go to the earliest entry (strict
/// `<` comparison, the list is never sorted). `Ok(None)` for an empty list.
/// Errs only when a park carries a non-finite or out-of-range coordinate.
pub fn nearest<'a>(origin: Coordinate, parks: &'a [Park]) -> Result<Option<NearestPark<'a>>, GeoError> {
    let mut best: Option<NearestPark<'a>> = None;

    for park in parks {
        let location = Coordinate::new(park.lat, park.lon)?;
        let distance_km = haversine_km(origin, location);
        if best.is_none_or(|b| distance_km < b.distance_km) {
            best = Some(NearestPark { park, distance_km });
        }
    }

    Ok(best)
}

/// Find the nearest park whose id is not in `visited`.
///
/// Equivalent to [`nearest`] over the unvisited subset: `Ok(None)` when
/// every park has been visited (or the list is empty). Ids are matched
/// exactly, with no normalization.
pub fn nearest_unvisited<'a>(
    origin: Coordinate,
    parks: &'a [Park],
    visited: &HashSet<String>,
) -> Result<Option<NearestPark<'a>>, GeoError> {
    let mut best: Option<NearestPark<'a>> = None;

    for park in parks {
        // Validate every record, visited or not, so malformed data
        // surfaces regardless of the visited set's contents.
        let location = Coordinate::new(park.lat, park.lon)?;
        if visited.contains(&park.id) {
            continue;
        }
        let distance_km = haversine_km(origin, location);
        if best.is_none_or(|b| distance_km < b.distance_km) {
            best = Some(NearestPark { park, distance_km });
        }
    }

    Ok(best)
}
