use alloc::{boxed::Box, string::String, string::ToString, vec::Vec};

use serde_json::Value;

use crate::{
    b64,
    error::Error,
    jose::jws::JwsObject,
    json::{JsonElement, JsonObject},
};

/// Payload of an unsecured, JWS or JWE object.
///
/// The variant records the representation the payload was created from;
/// every other view is derived on demand through UTF-8 text as the
/// interchange form. A view that cannot represent the content (for
/// example a JSON view of non-JSON text) yields `None` rather than an
/// error, since that is a normal outcome of polymorphic access.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Created from a JSON object
    Json(JsonObject),
    /// Created from a string
    Text(String),
    /// Created from a byte array
    Bytes(Vec<u8>),
    /// Created from Base64URL encoded data, kept in encoded form
    Base64Url(String),
    /// Created from a signed JWS object, for sign-then-encrypt nesting
    Nested(Box<JwsObject>),
}

impl Payload {
    /// Create a payload from a signed JWS object.
    ///
    /// Fails with a `State` error if the object is unsigned.
    pub fn nested(jws: JwsObject) -> Result<Self, Error> {
        if !jws.is_signed() {
            return Err(err_msg!(State, "The nested JWS object must be signed"));
        }
        Ok(Self::Nested(Box::new(jws)))
    }

    /// A string view of the payload, `None` when the content is not
    /// representable as UTF-8 text
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Json(json) => Some(json.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Bytes(bytes) => String::from_utf8(bytes.clone()).ok(),
            Self::Base64Url(encoded) => {
                let raw = b64::decode(encoded).ok()?;
                String::from_utf8(raw).ok()
            }
            Self::Nested(jws) => jws.serialize().ok(),
        }
    }

    /// A byte view of the payload
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Some(bytes.clone()),
            Self::Base64Url(encoded) => b64::decode(encoded).ok(),
            _ => self.to_text().map(String::into_bytes),
        }
    }

    /// A JSON object view of the payload, `None` when the content does
    /// not parse as a JSON object
    pub fn to_json(&self) -> Option<JsonObject> {
        if let Self::Json(json) = self {
            return Some(json.clone());
        }
        let text = self.to_text()?;
        let value: Value = serde_json::from_str(&text).ok()?;
        match JsonElement::from(&value) {
            JsonElement::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The Base64URL representation required for compact serialization
    pub fn to_base64url(&self) -> Option<String> {
        match self {
            Self::Base64Url(encoded) => Some(encoded.clone()),
            _ => self.to_bytes().map(b64::encode),
        }
    }

    /// A JWS object view of the payload, parsing text content as a
    /// compact serialization when needed
    pub fn to_jws(&self) -> Option<JwsObject> {
        match self {
            Self::Nested(jws) => Some((**jws).clone()),
            _ => JwsObject::parse(&self.to_text()?).ok(),
        }
    }
}

impl From<JsonObject> for Payload {
    fn from(json: JsonObject) -> Self {
        Self::Json(json)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.into())
    }
}
