use std::num::ParseFloatError;
use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum GpxPhotoMapError {
    XmlParse(quick_xml::Error),
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },
    InvalidAttribute {
        element: &'static str,
        attribute: &'static str,
        value: String,
    },
    FloatParse(ParseFloatError),
    /// The document contains no <trk> element.
    MissingTrack,
    /// The first <trk> flattens to zero usable trackpoints.
    EmptyTrack,
    /// A marker name with no matching loaded asset.
    AssetNotFound { name: String },
}

impl std::fmt::Display for GpxPhotoMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XmlParse(e) => write!(f, "XML parse error: {e}"),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "Missing attribute '{attribute}' on <{element}>")
            }
            Self::InvalidAttribute {
                element,
                attribute,
                value,
            } => write!(
                f,
                "Invalid value '{value}' for attribute '{attribute}' on <{element}>"
            ),
            Self::FloatParse(e) => write!(f, "Float parse error: {e}"),
            Self::MissingTrack => write!(f, "Document contains no <trk> element"),
            Self::EmptyTrack => write!(f, "Track contains no trackpoints"),
            Self::AssetNotFound { name } => write!(f, "No image asset loaded for '{name}'"),
        }
    }
}

impl std::error::Error for GpxPhotoMapError {}

impl From<quick_xml::Error> for GpxPhotoMapError {
    fn from(e: quick_xml::Error) -> Self {
        Self::XmlParse(e)
    }
}

impl From<ParseFloatError> for GpxPhotoMapError {
    fn from(e: ParseFloatError) -> Self {
        Self::FloatParse(e)
    }
}

impl From<GpxPhotoMapError> for JsValue {
    fn from(e: GpxPhotoMapError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
