//! Validation of raw rider input into ranking queries.

use serde::Deserialize;

use crate::error::QueryError;
use crate::geo::GeoPoint;

/// Smallest search radius a query may use.
pub const MIN_RADIUS_KM: f64 = 0.5;

/// Radius used when none is given.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Battery level used when none is given.
pub const DEFAULT_BATTERY_PCT: f64 = 50.0;

/// Built-in demo addresses. Stands in for a geocoder.
pub const DEMO_ADDRESSES: &[(&str, f64, f64)] = &[
    ("Bengaluru (Demo)", 12.9716, 77.5946),
    ("Mumbai (Demo)", 19.076, 72.8777),
    ("Delhi (Demo)", 28.6139, 77.209),
    ("Pune (Demo)", 18.5204, 73.8567),
    ("Hyderabad (Demo)", 17.385, 78.4867),
];

/// A validated list query, ready for [`crate::ranking::rank`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankQuery {
    pub origin: GeoPoint,
    /// Always within `[0, 100]`.
    pub battery_pct: f64,
    /// Always at least [`MIN_RADIUS_KM`].
    pub radius_km: f64,
}

impl RankQuery {
    /// Validates and clamps raw list-query parameters.
    ///
    /// Missing radius and battery fall back to [`DEFAULT_RADIUS_KM`] and
    /// [`DEFAULT_BATTERY_PCT`]. Battery is clamped to `[0, 100]` and radius
    /// to at least [`MIN_RADIUS_KM`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidParams`] if any value is missing (lat/lng)
    /// or not finite.
    pub fn parse(
        lat: Option<f64>,
        lng: Option<f64>,
        radius_km: Option<f64>,
        battery_pct: Option<f64>,
    ) -> Result<Self, QueryError> {
        let lat = finite(lat, "lat")?;
        let lng = finite(lng, "lng")?;
        let radius_km = finite(Some(radius_km.unwrap_or(DEFAULT_RADIUS_KM)), "radiusKm")?;
        let battery_pct = finite(Some(battery_pct.unwrap_or(DEFAULT_BATTERY_PCT)), "battery")?;

        Ok(Self {
            origin: GeoPoint::new(lat, lng),
            battery_pct: battery_pct.clamp(0.0, 100.0),
            radius_km: radius_km.max(MIN_RADIUS_KM),
        })
    }
}

/// Origin and battery for a single-station detail lookup.
///
/// Detail lookups treat the origin as optional: it is used only when
/// latitude, longitude and battery are all finite.
pub fn detail_origin(
    lat: Option<f64>,
    lng: Option<f64>,
    battery_pct: Option<f64>,
) -> Option<(GeoPoint, f64)> {
    let battery = battery_pct.unwrap_or(DEFAULT_BATTERY_PCT);
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() && battery.is_finite() => {
            Some((GeoPoint::new(lat, lng), battery.clamp(0.0, 100.0)))
        }
        _ => None,
    }
}

/// Resolves a demo address name to coordinates.
///
/// Matching ignores case and the ` (Demo)` suffix, so `"pune"` and
/// `"Pune (Demo)"` both resolve.
///
/// # Errors
///
/// Returns [`QueryError::UnknownAddress`] if the name is not in the table.
pub fn lookup_address(name: &str) -> Result<GeoPoint, QueryError> {
    let wanted = strip_demo_suffix(name.trim());
    DEMO_ADDRESSES
        .iter()
        .find(|(label, _, _)| strip_demo_suffix(label).eq_ignore_ascii_case(wanted))
        .map(|&(_, lat, lng)| GeoPoint::new(lat, lng))
        .ok_or_else(|| QueryError::UnknownAddress {
            name: name.to_string(),
            available: DEMO_ADDRESSES
                .iter()
                .map(|(label, _, _)| *label)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn strip_demo_suffix(s: &str) -> &str {
    s.strip_suffix(" (Demo)").unwrap_or(s)
}

fn finite(value: Option<f64>, name: &'static str) -> Result<f64, QueryError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(QueryError::InvalidParams(name)),
    }
}

/// Raw query-string parameters shared by the list and detail routes.
///
/// Values stay as strings so malformed numbers surface as
/// [`QueryError::InvalidParams`] rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct RawQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    #[serde(rename = "radiusKm")]
    pub radius_km: Option<String>,
    pub battery: Option<String>,
}

impl RawQuery {
    /// Validates the parameters as a list query.
    ///
    /// # Errors
    ///
    /// See [`RankQuery::parse`].
    pub fn rank_query(&self) -> Result<RankQuery, QueryError> {
        RankQuery::parse(
            number(&self.lat),
            number(&self.lng),
            number(&self.radius_km),
            number(&self.battery),
        )
    }

    /// Extracts the optional origin of a detail lookup.
    pub fn detail_origin(&self) -> Option<(GeoPoint, f64)> {
        detail_origin(number(&self.lat), number(&self.lng), number(&self.battery))
    }
}

/// Missing or empty values are `None`; anything unparseable becomes NaN.
fn number(raw: &Option<String>) -> Option<f64> {
    let raw = raw.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(raw.parse().unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_radius_and_battery() {
        let q = RankQuery::parse(Some(12.97), Some(77.59), None, None);
        assert_eq!(
            q,
            Ok(RankQuery {
                origin: GeoPoint::new(12.97, 77.59),
                battery_pct: 50.0,
                radius_km: 10.0,
            })
        );
    }

    #[test]
    fn battery_and_radius_are_clamped() {
        let q = RankQuery::parse(Some(0.0), Some(0.0), Some(-3.0), Some(140.0));
        let q = q.ok();
        assert_eq!(q.map(|q| q.radius_km), Some(MIN_RADIUS_KM));
        assert_eq!(q.map(|q| q.battery_pct), Some(100.0));
    }

    #[test]
    fn missing_or_non_finite_values_are_rejected() {
        assert_eq!(
            RankQuery::parse(None, Some(1.0), None, None),
            Err(QueryError::InvalidParams("lat"))
        );
        assert_eq!(
            RankQuery::parse(Some(1.0), Some(f64::NAN), None, None),
            Err(QueryError::InvalidParams("lng"))
        );
        assert_eq!(
            RankQuery::parse(Some(1.0), Some(1.0), Some(f64::INFINITY), None),
            Err(QueryError::InvalidParams("radiusKm"))
        );
    }

    #[test]
    fn detail_origin_requires_finite_lat_lng_battery() {
        assert!(detail_origin(None, Some(1.0), None).is_none());
        assert!(detail_origin(Some(1.0), Some(1.0), Some(f64::NAN)).is_none());
        assert_eq!(
            detail_origin(Some(1.0), Some(2.0), Some(-5.0)),
            Some((GeoPoint::new(1.0, 2.0), 0.0))
        );
    }

    #[test]
    fn detail_origin_drops_nan_and_infinite_text() {
        // Command-line flags go through `f64::from_str`, which accepts these.
        let nan: Option<f64> = "NaN".parse().ok();
        let inf: Option<f64> = "inf".parse().ok();
        assert!(nan.is_some_and(f64::is_nan));

        assert!(detail_origin(Some(12.9716), Some(77.5946), nan).is_none());
        assert!(detail_origin(nan, Some(77.59), None).is_none());
        assert!(detail_origin(Some(12.9716), inf, Some(80.0)).is_none());
        assert!(detail_origin(Some(12.9716), Some(77.5946), Some(f64::NEG_INFINITY)).is_none());
    }

    #[test]
    fn raw_query_treats_garbage_as_invalid() {
        let raw = RawQuery {
            lat: Some("12.97".to_string()),
            lng: Some("77.59".to_string()),
            radius_km: Some("wide".to_string()),
            battery: None,
        };
        assert_eq!(raw.rank_query(), Err(QueryError::InvalidParams("radiusKm")));

        let raw = RawQuery {
            radius_km: Some(String::new()),
            ..raw
        };
        assert_eq!(raw.rank_query().map(|q| q.radius_km), Ok(DEFAULT_RADIUS_KM));
    }

    #[test]
    fn raw_query_detail_origin_needs_both_coordinates() {
        let raw = RawQuery {
            lat: Some("12.97".to_string()),
            ..RawQuery::default()
        };
        assert!(raw.detail_origin().is_none());
    }

    #[test]
    fn address_lookup_is_forgiving() {
        assert_eq!(lookup_address("Pune (Demo)"), Ok(GeoPoint::new(18.5204, 73.8567)));
        assert_eq!(lookup_address("  mumbai "), Ok(GeoPoint::new(19.076, 72.8777)));
        let err = lookup_address("Atlantis");
        assert!(matches!(err, Err(QueryError::UnknownAddress { .. })));
    }
}
