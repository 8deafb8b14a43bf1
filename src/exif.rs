use std::io::Cursor;

use exif::{In, Reader, Tag, Value};

use crate::coords::{GeoPoint, Hemisphere, to_decimal_degrees};

/// Directory selections may contain arbitrary file types; only files whose
/// MIME type indicates an image are fed to the extractor.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Extract the embedded camera GPS position from an image file's bytes.
///
/// Returns None for any file without a usable geotag: no EXIF container,
/// missing latitude/longitude tags, or unexpected tag value types. None is
/// never an error; such files are simply excluded from the marker set.
/// Absent hemisphere refs default to N for latitude and W for longitude.
pub fn extract_geotag(bytes: &[u8]) -> Option<GeoPoint> {
    let mut cursor = Cursor::new(bytes);
    let exif = Reader::new().read_from_container(&mut cursor).ok()?;

    let lat_dms = dms_field(&exif, Tag::GPSLatitude)?;
    let lon_dms = dms_field(&exif, Tag::GPSLongitude)?;
    let lat_ref = ref_field(&exif, Tag::GPSLatitudeRef).unwrap_or('N');
    let lon_ref = ref_field(&exif, Tag::GPSLongitudeRef).unwrap_or('W');

    Some(GeoPoint::new(
        to_decimal_degrees(lat_dms, Hemisphere::from_ref(lat_ref)),
        to_decimal_degrees(lon_dms, Hemisphere::from_ref(lon_ref)),
    ))
}

fn dms_field(exif: &exif::Exif, tag: Tag) -> Option<(f64, f64, f64)> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Rational(v) if v.len() >= 3 => {
            Some((v[0].to_f64(), v[1].to_f64(), v[2].to_f64()))
        }
        Value::SRational(v) if v.len() >= 3 => {
            Some((v[0].to_f64(), v[1].to_f64(), v[2].to_f64()))
        }
        _ => None,
    }
}

fn ref_field(exif: &exif::Exif, tag: Tag) -> Option<char> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(v) => v.first()?.first().map(|b| *b as char),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{gps_tiff, tiff_without_gps};
    use super::*;

    #[test]
    fn test_extract_north_west() {
        let bytes = gps_tiff((10, 0, 0), Some(b'N'), (20, 0, 0), Some(b'W'));
        let point = extract_geotag(&bytes).unwrap();
        assert!((point.latitude - 10.0).abs() < 1e-10);
        assert!((point.longitude - -20.0).abs() < 1e-10);
    }

    #[test]
    fn test_extract_south_east() {
        let bytes = gps_tiff((10, 30, 0), Some(b'S'), (20, 15, 0), Some(b'E'));
        let point = extract_geotag(&bytes).unwrap();
        assert!((point.latitude - -10.5).abs() < 1e-10);
        assert!((point.longitude - 20.25).abs() < 1e-10);
    }

    #[test]
    fn test_missing_refs_default_n_and_w() {
        let bytes = gps_tiff((10, 0, 0), None, (20, 0, 0), None);
        let point = extract_geotag(&bytes).unwrap();
        assert_eq!(point.latitude, 10.0);
        assert_eq!(point.longitude, -20.0);
    }

    #[test]
    fn test_no_gps_tags() {
        assert!(extract_geotag(&tiff_without_gps()).is_none());
    }

    #[test]
    fn test_garbage_bytes() {
        assert!(extract_geotag(b"definitely not an image").is_none());
        assert!(extract_geotag(&[]).is_none());
    }

    #[test]
    fn test_mime_gate() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/png"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime(""));
    }
}
