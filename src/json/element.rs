use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{self, Display, Formatter, Write};

/// Key ordering applied to an object when it is serialized.
///
/// Entries always keep their insertion order in memory; a strategy
/// other than `None` reorders them only in the serialized text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Insertion order
    #[default]
    None,
    /// Deterministic order by a hash of the key (FNV-1a)
    HashOrder,
    /// Keys ascending
    AlphabeticAscending,
    /// Keys descending
    AlphabeticDescending,
}

/// A single JSON element: a primitive, `null`, an array or an object.
///
/// `Display` prints the element as valid compact JSON, quoting and
/// escaping string primitives and recursing into nested structures.
#[derive(Clone, Debug, PartialEq)]
pub enum JsonElement {
    /// The `null` literal
    Null,
    /// A number, boolean or string value, carried as pre-rendered text.
    /// `is_string` records whether the value was constructed from a
    /// string and must be quoted: `42` and `"42"` are distinct values.
    Primitive {
        /// Serialize quoted and escaped
        is_string: bool,
        /// Content without quotes
        content: String,
    },
    /// An ordered sequence of elements
    Array(Vec<JsonElement>),
    /// Name-value pairs with an optional serialization-time ordering
    Object(JsonObject),
}

impl JsonElement {
    /// Create an unquoted primitive from pre-rendered text.
    ///
    /// The caller is responsible for the text being a valid JSON
    /// number or literal; strings should use the `From` conversions.
    pub fn unquoted(content: impl Into<String>) -> Self {
        Self::Primitive {
            is_string: false,
            content: content.into(),
        }
    }

    /// Access the element as an object
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Unquoted content for a primitive element, `"null"` for null
    pub fn as_content(&self) -> Option<&str> {
        match self {
            Self::Null => Some("null"),
            Self::Primitive { content, .. } => Some(content),
            _ => None,
        }
    }
}

impl From<bool> for JsonElement {
    fn from(value: bool) -> Self {
        Self::unquoted(if value { "true" } else { "false" })
    }
}

impl From<&str> for JsonElement {
    fn from(value: &str) -> Self {
        Self::Primitive {
            is_string: true,
            content: value.into(),
        }
    }
}

impl From<String> for JsonElement {
    fn from(value: String) -> Self {
        Self::Primitive {
            is_string: true,
            content: value,
        }
    }
}

impl From<JsonObject> for JsonElement {
    fn from(value: JsonObject) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<JsonElement>> for JsonElement {
    fn from(value: Vec<JsonElement>) -> Self {
        Self::Array(value)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(impl From<$t> for JsonElement {
            fn from(value: $t) -> Self {
                Self::unquoted(value.to_string())
            }
        })*
    };
}

impl_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl From<&serde_json::Value> for JsonElement {
    fn from(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::from(*b),
            Value::Number(n) => Self::unquoted(n.to_string()),
            Value::String(s) => Self::from(s.as_str()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            Value::Object(map) => {
                let entries = map
                    .iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect();
                Self::Object(JsonObject::new(entries, SortStrategy::None))
            }
        }
    }
}

impl Display for JsonElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Primitive { is_string, content } => {
                if *is_string {
                    write_quoted(f, content)
                } else {
                    f.write_str(content)
                }
            }
            Self::Array(items) => {
                f.write_char('[')?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_char(',')?;
                    }
                    Display::fmt(item, f)?;
                }
                f.write_char(']')
            }
            Self::Object(obj) => Display::fmt(obj, f),
        }
    }
}

/// A JSON object: name-value pairs in insertion order, with duplicate
/// keys collapsed last-write-wins at build time.
///
/// Equality compares the entries only; the sort strategy affects
/// nothing but the serialized text.
#[derive(Clone, Debug)]
pub struct JsonObject {
    entries: Vec<(String, JsonElement)>,
    sort: SortStrategy,
}

impl JsonObject {
    pub(crate) fn new(entries: Vec<(String, JsonElement)>, sort: SortStrategy) -> Self {
        Self { entries, sort }
    }

    /// The number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the object has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&JsonElement> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Whether the object contains the given key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonElement)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The ordering applied at serialization time
    pub fn sort_strategy(&self) -> SortStrategy {
        self.sort
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Display for JsonObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        match self.sort {
            SortStrategy::None => (),
            SortStrategy::HashOrder => {
                order.sort_by_key(|&i| fnv1a_64(self.entries[i].0.as_bytes()))
            }
            SortStrategy::AlphabeticAscending => {
                order.sort_by(|&a, &b| self.entries[a].0.cmp(&self.entries[b].0))
            }
            SortStrategy::AlphabeticDescending => {
                order.sort_by(|&a, &b| self.entries[b].0.cmp(&self.entries[a].0))
            }
        }
        f.write_char('{')?;
        for (pos, &idx) in order.iter().enumerate() {
            if pos > 0 {
                f.write_char(',')?;
            }
            let (key, value) = &self.entries[idx];
            write_quoted(f, key)?;
            f.write_char(':')?;
            Display::fmt(value, f)?;
        }
        f.write_char('}')
    }
}

/// Write a string quoted and escaped per JSON rules: `"` and `\` use
/// character escapes, the named control characters use their short
/// forms and the remaining `U+0000`..`U+001F` range uses `\uXXXX`.
fn write_quoted(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    let mut flushed = 0;
    for (idx, ch) in value.char_indices() {
        let escape = match ch {
            '"' => Some("\\\""),
            '\\' => Some("\\\\"),
            '\u{0008}' => Some("\\b"),
            '\t' => Some("\\t"),
            '\n' => Some("\\n"),
            '\u{000c}' => Some("\\f"),
            '\r' => Some("\\r"),
            ch if (ch as u32) < 0x20 => Some(""),
            _ => None,
        };
        if let Some(escape) = escape {
            f.write_str(&value[flushed..idx])?;
            if escape.is_empty() {
                write!(f, "\\u{:04x}", ch as u32)?;
            } else {
                f.write_str(escape)?;
            }
            flushed = idx + ch.len_utf8();
        }
    }
    f.write_str(&value[flushed..])?;
    f.write_char('"')
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}
