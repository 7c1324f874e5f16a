//! # scriptjson-core
//!
//! A lenient JSON decoder and a script-safe encoder for data that travels
//! between a server and browser-side JavaScript.
//!
//! Decoding accepts everything JSON does plus `//` and `/* */` comments and
//! the `undefined` literal (read as `null`). Integers are exact at any size;
//! `1e3` is the integer `1000`.
//!
//! Encoding produces compact JSON whose strings are also safe inside a
//! JavaScript string literal (U+2028/U+2029 and all control characters are
//! escaped). Two extension points let server-side objects cross over:
//! [`Renderable`] values are embedded as markup strings and
//! [`Transportable`] values as `(new ClassName(...))` constructor calls.
//!
//! ## Quick start
//!
//! ```rust
//! use scriptjson_core::{parse, serialize, Node, Value};
//!
//! // text → Value
//! let value = parse(r#"{"name": "Alice", /* id */ "scores": [95, 87.5]}"#).unwrap();
//! assert_eq!(value.get("name"), Some(&Value::from("Alice")));
//!
//! // Value → text
//! let text = serialize(&Node::from(&value)).unwrap();
//! assert_eq!(text, r#"{"name":"Alice","scores":[95,87.5]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`lexer`]: text → tokens
//! - [`decoder`]: tokens → [`Value`]
//! - [`escape`]: string escape codec shared by both directions
//! - [`encoder`]: [`Node`] → text, with cycle detection
//! - [`node`]: encoder input model and the capability traits
//! - [`types`]: the decoded [`Value`] tree
//! - [`limits`]: nesting and exponent limits
//! - [`error`]: error type for every failure

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod lexer;
pub mod limits;
pub mod node;
pub mod types;

pub use decoder::{parse, parse_bytes, parse_with_limits};
pub use encoder::{serialize, serialize_fields, serialize_value, Serializer};
pub use error::{Result, ScriptJsonError};
pub use limits::Limits;
pub use node::{AdapterRegistry, Constructor, Foreign, Node, Renderable, Transportable};
pub use types::Value;
