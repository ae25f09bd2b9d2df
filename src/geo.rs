//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::Serialize;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Haversine great-circle distance in kilometres on a spherical Earth.
    ///
    /// Symmetric in its arguments and never negative. Coincident points
    /// yield exactly `0.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use swap_locator::geo::GeoPoint;
    ///
    /// let a = GeoPoint::new(12.9716, 77.5946);
    /// let b = GeoPoint::new(12.9352, 77.6245);
    /// let d = a.distance_km(b);
    /// assert!((d - 5.18).abs() < 0.01);
    /// assert_eq!(d, b.distance_km(a));
    /// ```
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng * 0.5).sin().powi(2);
        // Rounding can push `a` a hair outside [0, 1] for antipodal points.
        let a = a.clamp(0.0, 1.0);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_are_zero_distance() {
        let p = GeoPoint::new(19.076, 72.8777);
        assert_eq!(p.distance_km(p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (GeoPoint::new(12.9716, 77.5946), GeoPoint::new(28.6139, 77.209)),
            (GeoPoint::new(-33.86, 151.21), GeoPoint::new(51.5, -0.12)),
            (GeoPoint::new(0.0, 179.9), GeoPoint::new(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            let ab = a.distance_km(b);
            let ba = b.distance_km(a);
            assert!(ab >= 0.0);
            assert!((ab - ba).abs() < 1e-9, "{a} -> {b}: {ab} vs {ba}");
        }
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = GeoPoint::new(0.0, 0.0).distance_km(GeoPoint::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let d = GeoPoint::new(0.0, 0.0).distance_km(GeoPoint::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn display_uses_four_decimals() {
        assert_eq!(GeoPoint::new(12.97161, 77.5946).to_string(), "(12.9716, 77.5946)");
    }
}
