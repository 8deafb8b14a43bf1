use serde::Serialize;

/// A single position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Hemisphere reference as embedded in camera GPS metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    /// Map an EXIF ref character to a hemisphere. Unrecognized characters
    /// fall back to North; callers are responsible for plausibility.
    pub fn from_ref(c: char) -> Self {
        match c {
            'S' => Self::South,
            'E' => Self::East,
            'W' => Self::West,
            _ => Self::North,
        }
    }
}

/// Convert a degrees/minutes/seconds triple into signed decimal degrees.
/// Pure and total; no bounds validation is performed.
pub fn to_decimal_degrees((degrees, minutes, seconds): (f64, f64, f64), hemisphere: Hemisphere) -> f64 {
    let dd = degrees + minutes / 60.0 + seconds / 3600.0;
    match hemisphere {
        Hemisphere::South | Hemisphere::West => -dd,
        Hemisphere::North | Hemisphere::East => dd,
    }
}

/// Smallest axis-aligned lat/lon rectangle containing a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingRegion {
    /// None for an empty slice; a single point yields a degenerate region.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let mut region = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        for pt in &points[1..] {
            region.min_lat = region.min_lat.min(pt.latitude);
            region.max_lat = region.max_lat.max(pt.latitude);
            region.min_lon = region.min_lon.min(pt.longitude);
            region.max_lon = region.max_lon.max(pt.longitude);
        }
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_south_negates() {
        let dd = to_decimal_degrees((10.0, 30.0, 0.0), Hemisphere::South);
        assert!((dd - -10.5).abs() < 1e-10);
    }

    #[test]
    fn test_dms_zero() {
        assert_eq!(to_decimal_degrees((0.0, 0.0, 0.0), Hemisphere::North), 0.0);
    }

    #[test]
    fn test_dms_seconds() {
        let dd = to_decimal_degrees((10.0, 0.0, 36.0), Hemisphere::East);
        assert!((dd - 10.01).abs() < 1e-10);
    }

    #[test]
    fn test_dms_west_flips_east() {
        let dms = (139.0, 41.0, 30.25);
        let east = to_decimal_degrees(dms, Hemisphere::East);
        let west = to_decimal_degrees(dms, Hemisphere::West);
        assert_eq!(east, -west);
        assert!(east > 0.0);
    }

    #[test]
    fn test_unknown_ref_is_north() {
        assert_eq!(Hemisphere::from_ref('X'), Hemisphere::North);
    }

    #[test]
    fn test_region_envelope() {
        let points = vec![
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(3.0, 4.0),
            GeoPoint::new(2.0, -1.0),
        ];
        let region = BoundingRegion::from_points(&points).unwrap();
        assert_eq!(region.min_lat, 1.0);
        assert_eq!(region.max_lat, 3.0);
        assert_eq!(region.min_lon, -1.0);
        assert_eq!(region.max_lon, 4.0);
    }

    #[test]
    fn test_region_empty() {
        assert!(BoundingRegion::from_points(&[]).is_none());
    }

    #[test]
    fn test_region_single_point() {
        let region = BoundingRegion::from_points(&[GeoPoint::new(5.0, 6.0)]).unwrap();
        assert_eq!(region.min_lat, region.max_lat);
        assert_eq!(region.min_lon, region.max_lon);
    }
}
