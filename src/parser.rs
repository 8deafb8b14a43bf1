use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::coords::GeoPoint;
use crate::error::GpxPhotoMapError;
use crate::types::{Track, Waypoint};

type Result<T> = std::result::Result<T, GpxPhotoMapError>;

/// Parse a track-log document into a single Track plus its named waypoints.
///
/// Only the first <trk> element is consumed; all of its <trkseg> points are
/// flattened in document order. Later tracks are skipped; the model supports
/// one active track per session. A document with no track, or a track with no
/// usable points, is an error and must leave the caller's state untouched.
pub fn parse_track_document(xml: &str) -> Result<(Track, Vec<Waypoint>)> {
    let mut reader = Reader::from_str(xml);
    let mut track: Option<Track> = None;
    let mut waypoints = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"trk" => {
                    if track.is_none() {
                        track = Some(parse_track(&mut reader)?);
                    } else {
                        reader
                            .read_to_end(e.name())
                            .map_err(GpxPhotoMapError::XmlParse)?;
                    }
                }
                b"wpt" => {
                    if let Some(wpt) = parse_waypoint(&e, &mut reader)? {
                        waypoints.push(wpt);
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"wpt" {
                    if let Ok(position) = parse_lat_lon(&e) {
                        waypoints.push(Waypoint::new(position, None, None));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxPhotoMapError::XmlParse(e)),
            _ => {}
        }
    }

    let track = track.ok_or(GpxPhotoMapError::MissingTrack)?;
    if track.points.is_empty() {
        return Err(GpxPhotoMapError::EmptyTrack);
    }
    Ok((track, waypoints))
}

/// Parse lat/lon attributes from a point element's start tag.
fn parse_lat_lon(e: &BytesStart<'_>) -> Result<GeoPoint> {
    let mut lat: Option<f64> = None;
    let mut lon: Option<f64> = None;

    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| GpxPhotoMapError::XmlParse(e.into()))?;
        let key = attr.key.local_name();
        let val = std::str::from_utf8(&attr.value).unwrap_or_default();
        match key.as_ref() {
            b"lat" => {
                lat = Some(val.parse::<f64>().map_err(|_| {
                    GpxPhotoMapError::InvalidAttribute {
                        element: "point",
                        attribute: "lat",
                        value: val.to_string(),
                    }
                })?);
            }
            b"lon" => {
                lon = Some(val.parse::<f64>().map_err(|_| {
                    GpxPhotoMapError::InvalidAttribute {
                        element: "point",
                        attribute: "lon",
                        value: val.to_string(),
                    }
                })?);
            }
            _ => {}
        }
    }

    let lat = lat.ok_or(GpxPhotoMapError::MissingAttribute {
        element: "point",
        attribute: "lat",
    })?;
    let lon = lon.ok_or(GpxPhotoMapError::MissingAttribute {
        element: "point",
        attribute: "lon",
    })?;

    Ok(GeoPoint::new(lat, lon))
}

/// Parse a top-level <wpt> element and its children.
/// Points with missing or invalid coordinates are skipped, not fatal.
fn parse_waypoint<'a>(
    start: &BytesStart<'a>,
    reader: &mut Reader<&'a [u8]>,
) -> Result<Option<Waypoint>> {
    let position = match parse_lat_lon(start) {
        Ok(position) => position,
        Err(_) => {
            reader
                .read_to_end(start.name())
                .map_err(GpxPhotoMapError::XmlParse)?;
            return Ok(None);
        }
    };

    let mut name: Option<String> = None;
    let mut time: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"name" => name = Some(read_text_owned(reader, &e)?),
                b"time" => time = Some(read_text_owned(reader, &e)?),
                _ => {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxPhotoMapError::XmlParse)?;
                }
            },
            Ok(Event::End(e)) if e.local_name().as_ref() == b"wpt" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxPhotoMapError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(Some(Waypoint::new(position, name, time)))
}

/// Parse a <trk> element, flattening every segment's points into one list.
fn parse_track(reader: &mut Reader<&[u8]>) -> Result<Track> {
    let mut track = Track::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"trkseg" {
                    parse_segment(reader, &mut track.points)?;
                } else {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxPhotoMapError::XmlParse)?;
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trk" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxPhotoMapError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(track)
}

/// Parse a <trkseg> element, appending its points in document order.
fn parse_segment(reader: &mut Reader<&[u8]>, points: &mut Vec<GeoPoint>) -> Result<()> {
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    let point = parse_lat_lon(&e);
                    // Children (ele, time, extensions) are not part of the track line.
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxPhotoMapError::XmlParse)?;
                    if let Ok(point) = point {
                        points.push(point);
                    }
                } else {
                    reader
                        .read_to_end(e.name())
                        .map_err(GpxPhotoMapError::XmlParse)?;
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"trkpt" {
                    if let Ok(point) = parse_lat_lon(&e) {
                        points.push(point);
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"trkseg" => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxPhotoMapError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(())
}

/// Read text content of an element as an owned String.
/// Handles regular text, CDATA sections, and entity references.
fn read_text_owned<'a>(
    reader: &mut Reader<&'a [u8]>,
    start: &BytesStart<'_>,
) -> Result<String> {
    let end_name = start.name().0.to_vec();
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::CData(e)) => {
                text.push_str(std::str::from_utf8(e.as_ref()).unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) => {
                if let Ok(Some(ch)) = e.resolve_char_ref() {
                    text.push(ch);
                } else {
                    // Predefined XML entities: amp, lt, gt, quot, apos
                    match std::str::from_utf8(e.as_ref()).unwrap_or_default() {
                        "amp" => text.push('&'),
                        "lt" => text.push('<'),
                        "gt" => text.push('>'),
                        "quot" => text.push('"'),
                        "apos" => text.push('\''),
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) if e.name().0 == end_name.as_slice() => break,
            Ok(Event::Eof) => break,
            Err(e) => return Err(GpxPhotoMapError::XmlParse(e)),
            _ => {}
        }
    }

    Ok(text)
}
