pub mod distance;
pub mod locate;
pub mod nearest;

pub use distance::{Coordinate, EARTH_RADIUS_KM, GeoError, haversine_km};
pub use locate::{DEFAULT_ORIGIN, IpLocationProvider, LocateError, LocationProvider, request_location};
pub use nearest::{NearestPark, nearest, nearest_unvisited};
