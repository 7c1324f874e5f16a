//! Serializer: converts a [`Node`] graph into script-safe text.
//!
//! Output is compact JSON (no whitespace) for the built-in shapes, with two
//! extensions for embedding in client-side script:
//!
//! - **Renderables** become a single quoted string holding their escaped
//!   markup, optionally inside an XHTML `<div>` (see
//!   [`Serializer::with_xhtml_wrapper`]);
//! - **Transportables** (and foreign values with a registered adapter)
//!   become `(new ClassName(arg0,arg1))`. This is JavaScript, not JSON;
//!   callers that need strict JSON must not pass them in.
//!
//! Strings are escaped with the rules in [`crate::escape`], which keep the
//! output valid inside a JavaScript string literal.
//!
//! # Cycles
//! The serializer tracks the identity of every list, object and
//! transportable on the current recursion path. Meeting one again before it
//! is finished is a cycle and fails with [`ScriptJsonError::Cycle`]. The same
//! container reached through two separate branches is not a cycle and is
//! written twice.
//!
//! # Example
//! ```
//! use scriptjson_core::{serialize, Constructor, Node};
//!
//! let widget = Constructor::new("App.Widget", vec![Node::from("w1"), Node::from(3)]);
//! let tree = Node::object([("title", Node::from("a\nb")), ("widget", Node::from(widget))]);
//! assert_eq!(
//!     serialize(&tree).unwrap(),
//!     r#"{"title":"a\nb","widget":(new App.Widget("w1",3))}"#
//! );
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;
use std::rc::Rc;

use log::{debug, trace};

use crate::error::{Result, ScriptJsonError};
use crate::escape::{escape_into, EscapingWriter};
use crate::limits::Limits;
use crate::node::{AdapterRegistry, Node, Transportable};
use crate::types::Value;

const XHTML_OPEN: &str = r#"<div xmlns="http://www.w3.org/1999/xhtml">"#;
const XHTML_CLOSE: &str = "</div>";

/// Serialize `node` with default settings and no adapter registry.
pub fn serialize(node: &Node) -> Result<String> {
    Serializer::new().serialize(node)
}

/// Serialize the given name/value pairs as the members of one object.
///
/// ```
/// use scriptjson_core::{serialize_fields, Node};
/// let text = serialize_fields([("id", Node::from(7)), ("ok", Node::from(true))]).unwrap();
/// assert_eq!(text, r#"{"id":7,"ok":true}"#);
/// ```
pub fn serialize_fields<K, I>(fields: I) -> Result<String>
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Node)>,
{
    Serializer::new().serialize_fields(fields)
}

/// Serialize a decoded [`Value`].
pub fn serialize_value(value: &Value) -> Result<String> {
    Serializer::new().serialize(&Node::from(value))
}

/// Configurable serializer. Holds no per-call state, so one instance can be
/// reused for many calls.
#[derive(Default)]
pub struct Serializer<'r> {
    registry: Option<&'r AdapterRegistry>,
    limits: Limits,
    xhtml_wrapper: bool,
}

impl<'r> Serializer<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `registry` for foreign values.
    pub fn with_registry(mut self, registry: &'r AdapterRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Wrap each renderable's markup in an XHTML-namespaced `<div>`, for
    /// clients that insert the string as one DOM node.
    ///
    /// ```
    /// use std::fmt;
    /// use scriptjson_core::{Node, Renderable, Serializer};
    ///
    /// struct Hello;
    /// impl Renderable for Hello {
    ///     fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
    ///         out.write_str("<b>hi</b>")
    ///     }
    /// }
    ///
    /// let text = Serializer::new().with_xhtml_wrapper().serialize(&Node::renderable(Hello)).unwrap();
    /// assert_eq!(text, r#""<div xmlns=\"http://www.w3.org/1999/xhtml\"><b>hi</b></div>""#);
    /// ```
    pub fn with_xhtml_wrapper(mut self) -> Self {
        self.xhtml_wrapper = true;
        self
    }

    pub fn serialize(&self, node: &Node) -> Result<String> {
        let mut writer = Writer {
            out: String::new(),
            path: HashSet::new(),
            depth: 0,
            max_depth: self.limits.max_depth,
            registry: self.registry,
            xhtml_wrapper: self.xhtml_wrapper,
        };
        writer.write(node)?;
        debug!("serialized {} into {} bytes", node.type_name(), writer.out.len());
        Ok(writer.out)
    }

    pub fn serialize_fields<K, I>(&self, fields: I) -> Result<String>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        self.serialize(&Node::object(fields))
    }
}

/// Per-call state: output buffer and the identities on the recursion path.
struct Writer<'r> {
    out: String,
    path: HashSet<usize>,
    depth: usize,
    max_depth: usize,
    registry: Option<&'r AdapterRegistry>,
    xhtml_wrapper: bool,
}

impl Writer<'_> {
    fn write(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Null => self.out.push_str("null"),
            Node::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Node::Integer(n) => self.out.push_str(&n.to_string()),
            Node::Float(x) => {
                let text = format_float(*x).ok_or_else(|| ScriptJsonError::Unsupported {
                    type_name: "float".to_string(),
                    repr: x.to_string(),
                })?;
                self.out.push_str(&text);
            }
            Node::String(s) => self.write_string(s),
            Node::Bytes(bytes) => {
                let s = std::str::from_utf8(bytes).map_err(|_| ScriptJsonError::Unsupported {
                    type_name: "bytes".to_string(),
                    repr: format!("{bytes:?}"),
                })?;
                self.write_string(s);
            }
            Node::List(list) => {
                let id = self.enter(Rc::as_ptr(list) as *const (), "list")?;
                self.out.push('[');
                for (i, item) in list.borrow().iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write(item)?;
                }
                self.out.push(']');
                self.leave(id);
            }
            Node::Object(object) => {
                let id = self.enter(Rc::as_ptr(object) as *const (), "object")?;
                self.out.push('{');
                for (i, (key, value)) in object.borrow().iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_string(key);
                    self.out.push(':');
                    self.write(value)?;
                }
                self.out.push('}');
                self.leave(id);
            }
            Node::Renderable(renderable) => {
                trace!("rendering markup into string");
                self.out.push('"');
                let mut markup = EscapingWriter::new(&mut self.out);
                let rendered = if self.xhtml_wrapper {
                    markup
                        .write_str(XHTML_OPEN)
                        .and_then(|()| renderable.render(&mut markup))
                        .and_then(|()| markup.write_str(XHTML_CLOSE))
                } else {
                    renderable.render(&mut markup)
                };
                rendered.map_err(|_| {
                    ScriptJsonError::Render("renderable failed to produce markup".to_string())
                })?;
                self.out.push('"');
            }
            Node::Transportable(transportable) => {
                let id = self.enter(Rc::as_ptr(transportable) as *const (), "transportable")?;
                self.write_constructor(&**transportable)?;
                self.leave(id);
            }
            Node::Foreign(foreign) => {
                let adapted = self.registry.and_then(|r| r.adapt(foreign.value()));
                let Some(constructor) = adapted else {
                    return Err(ScriptJsonError::Unsupported {
                        type_name: foreign.type_name.to_string(),
                        repr: foreign.repr.clone(),
                    });
                };
                trace!("adapted {} to {}", foreign.type_name, constructor.class_name);
                self.depth += 1;
                self.check_depth()?;
                self.write_constructor(&constructor)?;
                self.depth -= 1;
            }
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        escape_into(s, &mut self.out);
        self.out.push('"');
    }

    /// `(new ClassName(arg0,arg1,...))`
    fn write_constructor(&mut self, transportable: &dyn Transportable) -> Result<()> {
        let class_name = transportable.class_name();
        if !is_valid_class_name(class_name) {
            return Err(ScriptJsonError::Unsupported {
                type_name: "transportable".to_string(),
                repr: format!("class name {class_name:?}"),
            });
        }
        trace!("writing constructor call for {class_name}");
        self.out.push_str("(new ");
        self.out.push_str(class_name);
        self.out.push('(');
        for (i, arg) in transportable.initial_arguments().iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write(arg)?;
        }
        self.out.push_str("))");
        Ok(())
    }

    /// Push a container onto the recursion path. Fails if it is already there.
    fn enter(&mut self, ptr: *const (), kind: &'static str) -> Result<usize> {
        let id = ptr as usize;
        if !self.path.insert(id) {
            return Err(ScriptJsonError::Cycle { kind });
        }
        self.depth += 1;
        self.check_depth()?;
        Ok(id)
    }

    fn leave(&mut self, id: usize) {
        self.path.remove(&id);
        self.depth -= 1;
    }

    fn check_depth(&self) -> Result<()> {
        if self.depth > self.max_depth {
            return Err(ScriptJsonError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }
}

/// Format a float so that it reads back as a float: always with a `.`
/// (`1.0`, `1.5e-7`, `1.0e20`). Non-finite values have no literal.
fn format_float(x: f64) -> Option<String> {
    if !x.is_finite() {
        return None;
    }
    let s = format!("{x:?}");
    if s.contains('.') {
        return Some(s);
    }
    Some(match s.find('e') {
        Some(pos) => format!("{}.0{}", &s[..pos], &s[pos..]),
        None => format!("{s}.0"),
    })
}

/// Dotted JavaScript identifier path, e.g. `App.Live.Widget`.
fn is_valid_class_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
                _ => return false,
            }
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}
