//! Great-circle distance between measurement points and cell towers.
//!
//! Distances are geodesics on the WGS-84 ellipsoid, returned in kilometres.
//! Callers that feed the propagation models convert to metres with
//! [`distance_m`].

use geo::{Distance, Geodesic, Point};

/// Geodesic distance in kilometres between two `(lat, lon)` points given in
/// degrees.
///
/// The result does not depend on argument order and is exactly `0.0` for
/// identical points. Out-of-range coordinates are passed through to the
/// geodesic solver unchecked.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    // The inverse solver is not bit-for-bit symmetric, so always solve in
    // one canonical direction.
    let (a, b) = if (lat1, lon1) <= (lat2, lon2) {
        ((lat1, lon1), (lat2, lon2))
    } else {
        ((lat2, lon2), (lat1, lon1))
    };

    let origin = Point::new(a.1, a.0);
    let destination = Point::new(b.1, b.0);

    Geodesic::distance(origin, destination) / 1000.0
}

/// Same as [`distance_km`], scaled to metres.
pub fn distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    distance_km(lat1, lon1, lat2, lon2) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_points_are_zero() {
        assert_eq!(distance_km(45.5017, -73.5673, 45.5017, -73.5673), 0.0);
        assert_eq!(distance_m(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let ab = distance_km(45.5017, -73.5673, 45.5088, -73.5540);
        let ba = distance_km(45.5088, -73.5540, 45.5017, -73.5673);
        assert_eq!(ab, ba);
        assert!(ab > 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude_at_equator() {
        // Meridian arc from 0 to 1 degree on WGS-84 is about 110.574 km.
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert_relative_eq!(d, 110.574, epsilon = 0.01);
    }

    #[test]
    fn test_collinear_points_are_additive() {
        let ab = distance_km(10.0, 20.0, 10.5, 20.0);
        let bc = distance_km(10.5, 20.0, 11.0, 20.0);
        let ac = distance_km(10.0, 20.0, 11.0, 20.0);
        assert_relative_eq!(ab + bc, ac, max_relative = 1e-9);
    }

    #[test]
    fn test_metres_are_kilometres_times_thousand() {
        let km = distance_km(45.0, -73.0, 45.01, -73.01);
        let m = distance_m(45.0, -73.0, 45.01, -73.01);
        assert_eq!(m, km * 1000.0);
    }
}
