use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::{String, ToString},
};

use serde_json::{Map, Value};

use crate::{
    b64,
    error::Error,
    jose::alg::{parse_algorithm, Algorithm},
    json::{JsonElement, JsonObject, ObjectBuilder, SortStrategy},
    jwk::PublicKeyParts,
};

/// Registered header parameter names
pub mod param {
    pub const ALGORITHM: &str = "alg";
    pub const TYPE: &str = "typ";
    pub const CONTENT_TYPE: &str = "cty";
    pub const CRITICAL: &str = "crit";
    pub const ENCRYPTION: &str = "enc";
    pub const KEY_ID: &str = "kid";
    pub const JWK: &str = "jwk";
}

/// The max allowed serialized length when parsing a JOSE header. 20K
/// chars accommodates headers carrying an X.509 chain in `x5c`.
pub const MAX_HEADER_LENGTH: usize = 20_000;

/// A JOSE protected header: the registered `alg`, `typ`, `cty` and
/// `crit` parameters plus arbitrary custom parameters.
///
/// A header parsed from an encoded form remembers the original
/// Base64URL text; [`Header::to_base64url`] returns those bytes
/// verbatim because signature verification runs over the exact encoded
/// header as received, not over a re-serialization.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    algorithm: Algorithm,
    typ: Option<String>,
    content_type: Option<String>,
    critical: Option<BTreeSet<String>>,
    custom: BTreeMap<String, JsonElement>,
    parsed_base64url: Option<String>,
}

impl Header {
    /// Start building a header from scratch
    pub fn builder(algorithm: Algorithm) -> HeaderBuilder {
        HeaderBuilder {
            algorithm,
            typ: None,
            content_type: None,
            critical: None,
            custom: BTreeMap::new(),
        }
    }

    /// Parse a header from a JSON object, dispatching on the algorithm
    /// type (`none`, JWS or JWE). `parsed_base64url` carries the
    /// original encoded form when the object came off the wire.
    pub fn from_json_object(
        json: &Map<String, Value>,
        parsed_base64url: Option<String>,
    ) -> Result<Self, Error> {
        let algorithm = parse_algorithm(json)?;
        let mut typ = None;
        let mut content_type = None;
        let mut critical = None;
        let mut custom = BTreeMap::new();
        for (name, value) in json {
            match name.as_str() {
                param::ALGORITHM => (),
                param::TYPE => typ = Some(expect_string(name, value)?),
                param::CONTENT_TYPE => content_type = Some(expect_string(name, value)?),
                param::CRITICAL => critical = Some(expect_string_set(name, value)?),
                _ => {
                    custom.insert(name.clone(), JsonElement::from(value));
                }
            }
        }
        Ok(Self {
            algorithm,
            typ,
            content_type,
            critical,
            custom,
            parsed_base64url,
        })
    }

    /// Parse a header from JSON object text
    pub fn from_json(text: &str, parsed_base64url: Option<String>) -> Result<Self, Error> {
        if text.len() > MAX_HEADER_LENGTH {
            return Err(err_msg!(
                Format,
                "Header exceeds maximum length of {} characters",
                MAX_HEADER_LENGTH
            ));
        }
        let value: Value =
            serde_json::from_str(text).map_err(err_map!(Format, "Invalid header JSON"))?;
        match value {
            Value::Object(map) => Self::from_json_object(&map, parsed_base64url),
            _ => Err(err_msg!(Format, "Header must be a JSON object")),
        }
    }

    /// Parse a header from its Base64URL encoded form, retaining the
    /// received text for verbatim re-encoding
    pub fn from_base64url(encoded: &str) -> Result<Self, Error> {
        let raw = b64::decode(encoded)?;
        let text = String::from_utf8(raw).map_err(err_map!(Format, "Header is not UTF-8"))?;
        Self::from_json(&text, Some(encoded.to_string()))
    }

    /// The algorithm (`alg`) parameter
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// The type (`typ`) parameter
    pub fn typ(&self) -> Option<&str> {
        self.typ.as_deref()
    }

    /// The content type (`cty`) parameter
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The critical parameter names (`crit`) parameter
    pub fn critical_params(&self) -> Option<&BTreeSet<String>> {
        self.critical.as_ref()
    }

    /// Look up a custom (non-registered) parameter
    pub fn custom_param(&self, name: &str) -> Option<&JsonElement> {
        self.custom.get(name)
    }

    /// The original encoded form, if this header was parsed
    pub fn parsed_base64url(&self) -> Option<&str> {
        self.parsed_base64url.as_deref()
    }

    /// The names of all included parameters, registered and custom
    pub fn included_params(&self) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.custom.keys().cloned().collect();
        names.insert(param::ALGORITHM.to_string());
        if self.typ.is_some() {
            names.insert(param::TYPE.to_string());
        }
        if self.content_type.is_some() {
            names.insert(param::CONTENT_TYPE.to_string());
        }
        if self.critical.as_ref().map_or(false, |c| !c.is_empty()) {
            names.insert(param::CRITICAL.to_string());
        }
        names
    }

    /// The canonical JSON object view: custom parameters merged with
    /// the registered ones, registered parameters winning on collision
    pub fn to_json(&self) -> JsonObject {
        let mut builder = ObjectBuilder::new();
        for (name, value) in &self.custom {
            builder.put(name.clone(), value.clone());
        }
        builder.put(param::ALGORITHM, self.algorithm.as_str());
        if let Some(typ) = &self.typ {
            builder.put(param::TYPE, typ.as_str());
        }
        if let Some(cty) = &self.content_type {
            builder.put(param::CONTENT_TYPE, cty.as_str());
        }
        if let Some(crit) = self.critical.as_ref().filter(|c| !c.is_empty()) {
            builder.put_array(param::CRITICAL, |a| {
                for name in crit {
                    a.add(name.as_str());
                }
            });
        }
        builder.build(SortStrategy::None)
    }

    /// The Base64URL encoded form: the original parsed text verbatim
    /// when available, otherwise the encoding of the canonical JSON
    pub fn to_base64url(&self) -> String {
        match &self.parsed_base64url {
            Some(parsed) => parsed.clone(),
            None => b64::encode(self.to_json().to_string()),
        }
    }

    /// Merge an unprotected header into the canonical JSON view.
    ///
    /// The protected and unprotected parameter name sets must be
    /// disjoint (RFC 7515 §7.2.1); overlap fails with a
    /// `HeaderConflict` error and no partial merge occurs.
    pub fn join(&self, unprotected: &UnprotectedHeader) -> Result<JsonObject, Error> {
        let included = self.included_params();
        for name in unprotected.included_params() {
            if included.contains(name) {
                return Err(err_msg!(
                    HeaderConflict,
                    "The parameters in the protected header and the unprotected header must be disjoint"
                ));
            }
        }
        let mut builder = ObjectBuilder::new();
        for (name, value) in self.to_json().iter() {
            builder.put(name, value.clone());
        }
        for (name, value) in unprotected.params.iter() {
            builder.put(name.clone(), value.clone());
        }
        Ok(builder.build(SortStrategy::None))
    }
}

fn expect_string(name: &str, value: &Value) -> Result<String, Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(err_msg!(Format, "Header \"{}\" must be a string", name)),
    }
}

fn expect_string_set(name: &str, value: &Value) -> Result<BTreeSet<String>, Error> {
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(err_msg!(Format, "Header \"{}\" must be an array", name)),
    };
    let mut set = BTreeSet::new();
    for item in items {
        set.insert(expect_string(name, item)?);
    }
    Ok(set)
}

/// Builder for a protected [`Header`] created from scratch
#[derive(Debug)]
pub struct HeaderBuilder {
    algorithm: Algorithm,
    typ: Option<String>,
    content_type: Option<String>,
    critical: Option<BTreeSet<String>>,
    custom: BTreeMap<String, JsonElement>,
}

impl HeaderBuilder {
    /// Set the type (`typ`) parameter
    pub fn typ(mut self, typ: impl Into<String>) -> Self {
        self.typ = Some(typ.into());
        self
    }

    /// Set the content type (`cty`) parameter
    pub fn content_type(mut self, cty: impl Into<String>) -> Self {
        self.content_type = Some(cty.into());
        self
    }

    /// Set the critical parameter names (`crit`) parameter
    pub fn critical_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set a custom (non-registered) parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonElement>) -> Self {
        self.custom.insert(name.into(), value.into());
        self
    }

    /// Set the key ID (`kid`) parameter
    pub fn key_id(self, kid: impl Into<String>) -> Self {
        let kid = kid.into();
        self.param(param::KEY_ID, kid)
    }

    /// Embed the public key (`jwk`) parameter
    pub fn jwk(self, key: &PublicKeyParts) -> Self {
        let jwk = key.to_jwk();
        self.param(param::JWK, jwk)
    }

    /// Finalize the header
    pub fn build(self) -> Header {
        Header {
            algorithm: self.algorithm,
            typ: self.typ,
            content_type: self.content_type,
            critical: self.critical,
            custom: self.custom,
            parsed_base64url: None,
        }
    }
}

/// An unprotected header for the JWS JSON serialization: a bag of
/// parameters carried outside the integrity-protected portion.
/// Immutable once built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnprotectedHeader {
    params: BTreeMap<String, JsonElement>,
}

impl UnprotectedHeader {
    /// Start building an unprotected header
    pub fn builder() -> UnprotectedHeaderBuilder {
        UnprotectedHeaderBuilder {
            params: BTreeMap::new(),
        }
    }

    /// Parse an unprotected header from a JSON object
    pub fn from_json_object(json: &Map<String, Value>) -> Self {
        let params = json
            .iter()
            .map(|(name, value)| (name.clone(), JsonElement::from(value)))
            .collect();
        Self { params }
    }

    /// Look up a parameter
    pub fn param(&self, name: &str) -> Option<&JsonElement> {
        self.params.get(name)
    }

    /// The key ID (`kid`) parameter, if set to a string value
    pub fn key_id(&self) -> Option<&str> {
        match self.params.get(param::KEY_ID) {
            Some(JsonElement::Primitive { is_string: true, content }) => Some(content),
            _ => None,
        }
    }

    /// The names of the included parameters
    pub fn included_params(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    /// A JSON object view of the parameters
    pub fn to_json(&self) -> JsonObject {
        let mut builder = ObjectBuilder::new();
        for (name, value) in &self.params {
            builder.put(name.clone(), value.clone());
        }
        builder.build(SortStrategy::None)
    }
}

/// Builder for an [`UnprotectedHeader`]
#[derive(Debug, Default)]
pub struct UnprotectedHeaderBuilder {
    params: BTreeMap<String, JsonElement>,
}

impl UnprotectedHeaderBuilder {
    /// Set the key ID (`kid`) parameter
    pub fn key_id(self, kid: impl Into<String>) -> Self {
        let kid = kid.into();
        self.param(param::KEY_ID, kid)
    }

    /// Set a parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<JsonElement>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Finalize the header
    pub fn build(self) -> UnprotectedHeader {
        UnprotectedHeader {
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::jose::alg::SignatureAlgorithm;

    fn rs256() -> Algorithm {
        Algorithm::Jws(SignatureAlgorithm::Rs256)
    }

    #[test]
    fn scratch_header_encoding() {
        let header = Header::builder(rs256()).build();
        assert_eq!(header.to_json().to_string(), r#"{"alg":"RS256"}"#);
        assert_eq!(header.to_base64url(), "eyJhbGciOiJSUzI1NiJ9");
    }

    #[test]
    fn registered_params_win_on_collision() {
        let header = Header::builder(rs256())
            .param("alg", "HS256")
            .param("ra-action", "GET")
            .typ("JWT")
            .build();
        let json = header.to_json();
        assert_eq!(json.get("alg"), Some(&JsonElement::from("RS256")));
        assert_eq!(json.get("ra-action"), Some(&JsonElement::from("GET")));
        assert_eq!(json.get("typ"), Some(&JsonElement::from("JWT")));
    }

    #[test]
    fn parsed_header_reencodes_verbatim() {
        // whitespace and member order must survive re-encoding
        let encoded = b64::encode("{\"typ\": \"JWT\" , \"alg\":\"RS256\"}");
        let header = Header::from_base64url(&encoded).unwrap();
        assert_eq!(header.to_base64url(), encoded);
        assert_eq!(header.typ(), Some("JWT"));
        assert_eq!(header.algorithm(), &rs256());
    }

    #[test]
    fn parse_dispatches_on_algorithm_type() {
        let plain = Header::from_json(r#"{"alg":"none"}"#, None).unwrap();
        assert_eq!(plain.algorithm(), &Algorithm::None);

        let jwe = Header::from_json(r#"{"alg":"RSA-OAEP-256","enc":"A256GCM"}"#, None).unwrap();
        assert!(matches!(jwe.algorithm(), Algorithm::Jwe(_)));
        // enc is carried as a custom parameter
        assert_eq!(jwe.custom_param("enc"), Some(&JsonElement::from("A256GCM")));

        let jws = Header::from_json(r#"{"alg":"ES256"}"#, None).unwrap();
        assert_eq!(jws.algorithm(), &Algorithm::Jws(SignatureAlgorithm::Es256));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert_eq!(
            Header::from_json(r#"{"typ":"JWT"}"#, None).unwrap_err().kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Header::from_json(r#"{"alg":"RS256","typ":17}"#, None)
                .unwrap_err()
                .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Header::from_json("[1,2]", None).unwrap_err().kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn join_disjoint() {
        let header = Header::builder(rs256()).typ("JWT").build();
        let unprotected = UnprotectedHeader::builder().key_id("key-1").build();
        let joined = header.join(&unprotected).unwrap();
        assert_eq!(joined.get("alg"), Some(&JsonElement::from("RS256")));
        assert_eq!(joined.get("kid"), Some(&JsonElement::from("key-1")));
    }

    #[test]
    fn join_conflict() {
        let header = Header::builder(rs256()).build();
        let unprotected = UnprotectedHeader::builder()
            .param("alg", "ES256")
            .build();
        assert_eq!(
            header.join(&unprotected).unwrap_err().kind(),
            ErrorKind::HeaderConflict
        );
        // the protected header is untouched
        assert_eq!(header.to_json().to_string(), r#"{"alg":"RS256"}"#);
    }

    #[test]
    fn crit_round_trip() {
        let header = Header::builder(rs256())
            .critical_params(["exp", "b64"])
            .param("b64", false)
            .build();
        let json = header.to_json().to_string();
        assert_eq!(json, r#"{"b64":false,"alg":"RS256","crit":["b64","exp"]}"#);
        let parsed = Header::from_json(&json, None).unwrap();
        assert_eq!(
            parsed.critical_params().map(|c| c.len()),
            Some(2)
        );
    }
}
