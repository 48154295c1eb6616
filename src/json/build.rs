use alloc::{string::String, vec::Vec};

use super::element::{JsonElement, JsonObject, SortStrategy};

/// Single-use accumulator for a [`JsonObject`].
///
/// Duplicate keys are last-write-wins: the replacement keeps the
/// original entry position, matching the builder contract that
/// insertion order is what serialization (absent a sort strategy)
/// reproduces.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    entries: Vec<(String, JsonElement)>,
}

impl ObjectBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`, returning the previous
    /// value if the key was already present.
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<JsonElement>,
    ) -> Option<JsonElement> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter().position(|(k, _)| *k == key) {
            Some(idx) => {
                let previous = core::mem::replace(&mut self.entries[idx], (key, value));
                Some(previous.1)
            }
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Insert or replace a `null` value for `key`
    pub fn put_null(&mut self, key: impl Into<String>) -> Option<JsonElement> {
        self.put(key, JsonElement::Null)
    }

    /// Add the object produced by `f` under `key`
    pub fn put_object(
        &mut self,
        key: impl Into<String>,
        sort: SortStrategy,
        f: impl FnOnce(&mut ObjectBuilder),
    ) -> Option<JsonElement> {
        self.put(key, build_object(sort, f))
    }

    /// Add the array produced by `f` under `key`
    pub fn put_array(
        &mut self,
        key: impl Into<String>,
        f: impl FnOnce(&mut ArrayBuilder),
    ) -> Option<JsonElement> {
        self.put(key, build_array(f))
    }

    /// Finalize the object with the given serialization-time ordering
    pub fn build(self, sort: SortStrategy) -> JsonObject {
        JsonObject::new(self.entries, sort)
    }
}

/// Single-use accumulator for a JSON array
#[derive(Debug, Default)]
pub struct ArrayBuilder {
    items: Vec<JsonElement>,
}

impl ArrayBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element. Always returns `true`.
    pub fn add(&mut self, value: impl Into<JsonElement>) -> bool {
        self.items.push(value.into());
        true
    }

    /// Append every element of the collection
    pub fn add_all<T: Into<JsonElement>>(&mut self, values: impl IntoIterator<Item = T>) -> bool {
        let before = self.items.len();
        self.items.extend(values.into_iter().map(Into::into));
        self.items.len() != before
    }

    /// Finalize the array. Arrays always keep insertion order.
    pub fn build(self) -> JsonElement {
        JsonElement::Array(self.items)
    }
}

/// Build a [`JsonObject`] by passing a builder to the given closure
pub fn build_object(sort: SortStrategy, f: impl FnOnce(&mut ObjectBuilder)) -> JsonObject {
    let mut builder = ObjectBuilder::new();
    f(&mut builder);
    builder.build(sort)
}

/// Build a [`JsonObject`] serialized with keys in ascending order
pub fn build_sorted_object(f: impl FnOnce(&mut ObjectBuilder)) -> JsonObject {
    build_object(SortStrategy::AlphabeticAscending, f)
}

/// Build a JSON array by passing a builder to the given closure
pub fn build_array(f: impl FnOnce(&mut ArrayBuilder)) -> JsonElement {
    let mut builder = ArrayBuilder::new();
    f(&mut builder);
    builder.build()
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn sorted_object() {
        let json = build_sorted_object(|b| {
            b.put("hi1", "h");
            b.put("hi", 2u8);
        });
        assert_eq!(json.to_string(), r#"{"hi":2,"hi1":"h"}"#);
    }

    #[test]
    fn put_replaces_in_place() {
        let mut builder = ObjectBuilder::new();
        assert_eq!(builder.put("a", 1u8), None);
        assert_eq!(builder.put("b", 2u8), None);
        assert_eq!(builder.put("a", 3u8), Some(JsonElement::from(1u8)));
        let obj = builder.build(SortStrategy::None);
        assert_eq!(obj.to_string(), r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn nested_structures() {
        let json = build_object(SortStrategy::None, |b| {
            b.put("flag", true);
            b.put_array("ints", |a| {
                for i in 1u8..=3 {
                    a.add(i);
                }
            });
            b.put_object("inner", SortStrategy::AlphabeticAscending, |o| {
                o.put("z", "last");
                o.put("a", "first");
            });
            b.put_null("none");
        });
        assert_eq!(
            json.to_string(),
            r#"{"flag":true,"ints":[1,2,3],"inner":{"a":"first","z":"last"},"none":null}"#
        );
    }

    #[test]
    fn serialization_is_repeatable() {
        let json = build_object(SortStrategy::AlphabeticAscending, |b| {
            b.put("crv", "P-256");
            b.put("kty", "EC");
        });
        assert_eq!(json.to_string(), json.to_string());
    }
}
