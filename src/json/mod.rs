//! Minimal deterministic JSON construction and serialization.
//!
//! JOSE headers and JWK thumbprint inputs must serialize to exact,
//! reproducible bytes; a general-purpose serializer with its own ideas
//! about member ordering is not usable here. This module builds JSON
//! object and array literals from primitive values and serializes them
//! to compact text, with an optional key ordering applied at
//! serialization time only. Parsing is out of scope and delegated to
//! `serde_json` where needed.

mod build;
mod element;

pub use self::build::{build_array, build_object, build_sorted_object, ArrayBuilder, ObjectBuilder};
pub use self::element::{JsonElement, JsonObject, SortStrategy};
