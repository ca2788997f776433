// =============================================================================
// CRATE-LEVEL QUALITY LINTS
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::must_use_candidate)] // Not all returned values need must_use
#![allow(clippy::return_self_not_must_use)] // Builder pattern returns Self by design
#![allow(clippy::cast_possible_truncation)] // Checked or saturating at call sites
#![allow(clippy::cast_precision_loss)] // Documented on the coercing accessors
#![allow(clippy::match_same_arms)] // Intentional for clarity
#![allow(clippy::items_after_statements)] // Const in functions for locality

//! fastjson - compact JSON value library optimized for fast
//! serialization
//!
//! # Overview
//!
//! A JSON document is a tree of [`Value`] handles: cheap to clone,
//! reference-counted, destroyed when the last handle drops. Small
//! strings live inline in the value, object keys keep insertion
//! order, and the serializer streams through an escape fast path into
//! either a cached per-value buffer or any [`Sink`] you provide.
//!
//! # Building and rendering
//!
//! ```
//! use fastjson::{arr, int, obj, str, Flags};
//!
//! let value = obj()
//!     .set("name", str("Alice"))
//!     .set("age", int(30))
//!     .set("tags", arr().push(str("rust")).push(str("json")));
//!
//! // Simple form: spaced presentation, cached buffer
//! assert_eq!(
//!     &*value.to_json_string(),
//!     r#"{ "name": "Alice", "age": 30, "tags": [ "rust", "json" ] }"#
//! );
//!
//! // Explicit flags: compact, pretty, tabs, trailing-zero trimming
//! let pretty = value.to_json_string_ext(Flags::PRETTY | Flags::SPACED);
//! assert!(pretty.contains('\n'));
//! ```
//!
//! # Parsing
//!
//! ```
//! let value = fastjson::parse(r#"{"abc":12,"foo":"bar"}"#).unwrap();
//! assert_eq!(value.get("abc").int64(), 12);
//! assert_eq!(value.get("foo").str(), "bar");
//! assert_eq!(value.get("missing").kind(), fastjson::Kind::Null);
//! ```
//!
//! # Custom serializers
//!
//! Any value can carry its own serializer, consulted wherever the
//! value appears in a document:
//!
//! ```
//! use fastjson::{int, obj, Sink};
//!
//! let price = int(1999);
//! price.set_serializer(Some(Box::new(|v, out, _, _| {
//!     out.write(format!("{}.{:02}", v.int64() / 100, v.int64() % 100).as_bytes())
//! })));
//! let doc = obj().set("price", price);
//! assert_eq!(&*doc.to_json_string(), r#"{ "price": 19.99 }"#);
//! ```
//!
//! # Threading
//!
//! [`Value`] is not `Send` or `Sync`; a value and its transitive
//! children belong to one thread. See the discussion on
//! [`Value`].

pub mod builder;
pub mod constants;
mod escape;
mod num;
mod parse;
mod printbuf;
mod ser;
mod to_json;
mod value;

pub use builder::{arr, bool, double_s, float, int, null, obj, str, string_bytes};
pub use num::parse_int64;
pub use parse::{parse, parse_bytes, ParseError};
pub use printbuf::{FnSink, PrintBuf, Sink};
pub use ser::{Flags, Rendered};
pub use to_json::ToJson;
pub use value::{Entries, Kind, SerializeFn, Value};

/// The crate version, as a `MAJOR.MINOR.PATCH` string.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================

#[cfg(test)]
mod api_contracts {
    use static_assertions::{assert_impl_all, assert_not_impl_any};

    // Value is a cheap handle: Clone + Debug + Default, but confined
    // to one thread.
    assert_impl_all!(crate::Value: Clone, std::fmt::Debug, Default);
    assert_not_impl_any!(crate::Value: Send, Sync);

    // Kind is a plain enum usable as a map key.
    assert_impl_all!(crate::Kind: Copy, Clone, std::fmt::Debug, PartialEq, Eq, std::hash::Hash);

    // Flags combine and compare by value.
    assert_impl_all!(crate::Flags: Copy, Clone, std::fmt::Debug, PartialEq, Eq, Default);

    // ParseError is comparable for test assertions and boxable as a
    // standard error.
    assert_impl_all!(
        crate::ParseError: Clone,
        std::fmt::Debug,
        PartialEq,
        Eq,
        std::error::Error
    );
}
