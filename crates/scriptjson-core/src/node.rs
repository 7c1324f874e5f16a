//! Encoder input: built-in shapes plus the two extension capabilities.
//!
//! A [`Node`] differs from a decoded [`Value`] in three ways:
//!
//! - lists and objects sit behind shared handles, so one container may be
//!   referenced from several places (or from inside itself);
//! - it can hold a [`Renderable`] (markup that is embedded as a string) or a
//!   [`Transportable`] (emitted as a `new ClassName(...)` expression);
//! - it can hold an arbitrary foreign Rust value, which only encodes if an
//!   [`AdapterRegistry`] knows its type.

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;

use crate::types::Value;

/// Shared, mutable list handle. Identity (the `Rc` pointer) is what cycle
/// detection tracks.
pub type ListRef = Rc<RefCell<Vec<Node>>>;

/// Shared, mutable object handle.
pub type ObjectRef = Rc<RefCell<Vec<(String, Node)>>>;

/// Something that can flatten itself into markup text.
///
/// The encoder does not look at the markup; it escapes whatever is written
/// and emits it as one quoted string.
pub trait Renderable {
    fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// Something that is rebuilt on the client by calling a constructor.
pub trait Transportable {
    /// Name of the client-side class, emitted verbatim after `new`.
    fn class_name(&self) -> &str;

    /// Constructor arguments, each encoded recursively.
    fn initial_arguments(&self) -> Vec<Node>;
}

/// A ready-made [`Transportable`].
#[derive(Clone)]
pub struct Constructor {
    pub class_name: String,
    pub arguments: Vec<Node>,
}

impl Constructor {
    pub fn new(class_name: impl Into<String>, arguments: Vec<Node>) -> Self {
        Self {
            class_name: class_name.into(),
            arguments,
        }
    }
}

impl Transportable for Constructor {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn initial_arguments(&self) -> Vec<Node> {
        self.arguments.clone()
    }
}

/// A Rust value with no built-in encoding.
#[derive(Clone)]
pub struct Foreign {
    pub type_name: &'static str,
    pub repr: String,
    value: Rc<dyn Any>,
}

impl Foreign {
    pub fn new<T: Any + fmt::Debug>(value: T) -> Self {
        Self {
            type_name: type_name::<T>(),
            repr: format!("{value:?}"),
            value: Rc::new(value),
        }
    }

    pub fn value(&self) -> &dyn Any {
        self.value.as_ref()
    }
}

#[derive(Clone)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    /// UTF-8 text held as bytes.
    Bytes(Vec<u8>),
    List(ListRef),
    Object(ObjectRef),
    Renderable(Rc<dyn Renderable>),
    Transportable(Rc<dyn Transportable>),
    Foreign(Foreign),
}

impl Node {
    /// Wrap `items` in a fresh shared list.
    pub fn list(items: Vec<Node>) -> Self {
        Node::List(Rc::new(RefCell::new(items)))
    }

    /// Wrap `entries` in a fresh shared object.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Node::Object(Rc::new(RefCell::new(entries)))
    }

    pub fn renderable(r: impl Renderable + 'static) -> Self {
        Node::Renderable(Rc::new(r))
    }

    pub fn transportable(t: impl Transportable + 'static) -> Self {
        Node::Transportable(Rc::new(t))
    }

    pub fn foreign<T: Any + fmt::Debug>(value: T) -> Self {
        Node::Foreign(Foreign::new(value))
    }

    /// Type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Integer(_) => "integer",
            Node::Float(_) => "float",
            Node::String(_) => "string",
            Node::Bytes(_) => "bytes",
            Node::List(_) => "list",
            Node::Object(_) => "object",
            Node::Renderable(_) => "renderable",
            Node::Transportable(_) => "transportable",
            Node::Foreign(f) => f.type_name,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("Null"),
            Node::Bool(b) => write!(f, "Bool({b})"),
            Node::Integer(n) => write!(f, "Integer({n})"),
            Node::Float(x) => write!(f, "Float({x:?})"),
            Node::String(s) => write!(f, "String({s:?})"),
            Node::Bytes(b) => write!(f, "Bytes({b:?})"),
            Node::List(l) => write!(f, "List@{:p}", Rc::as_ptr(l)),
            Node::Object(o) => write!(f, "Object@{:p}", Rc::as_ptr(o)),
            Node::Renderable(_) => f.write_str("Renderable"),
            Node::Transportable(t) => write!(f, "Transportable({})", t.class_name()),
            Node::Foreign(x) => write!(f, "Foreign({}: {})", x.type_name, x.repr),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Integer(n) => Node::Integer(n.clone()),
            Value::Float(x) => Node::Float(*x),
            Value::String(s) => Node::String(s.clone()),
            Value::Array(items) => Node::list(items.iter().map(Node::from).collect()),
            Value::Object(entries) => {
                Node::object(entries.iter().map(|(k, v)| (k.clone(), Node::from(v))))
            }
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::from(&value)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Integer(n.into())
    }
}

impl From<BigInt> for Node {
    fn from(n: BigInt) -> Self {
        Node::Integer(n)
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Float(x)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::list(items)
    }
}

impl From<Constructor> for Node {
    fn from(c: Constructor) -> Self {
        Node::transportable(c)
    }
}

type Adapter = Box<dyn Fn(&dyn Any) -> Option<Constructor>>;

/// Maps Rust types to constructor-call encodings.
///
/// Lets types that cannot implement [`Transportable`] themselves (foreign
/// crates, plain data) still be sent to the client.
///
/// ```
/// use scriptjson_core::{AdapterRegistry, Constructor, Node, Serializer};
///
/// #[derive(Debug)]
/// struct Point(i64, i64);
///
/// let mut registry = AdapterRegistry::new();
/// registry.register(|p: &Point| Constructor::new("Geo.Point", vec![p.0.into(), p.1.into()]));
///
/// let text = Serializer::new().with_registry(&registry).serialize(&Node::foreign(Point(1, 2))).unwrap();
/// assert_eq!(text, "(new Geo.Point(1,2))");
/// ```
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<TypeId, Adapter>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `adapt` for values of type `T`, replacing any earlier one.
    pub fn register<T, F>(&mut self, adapt: F)
    where
        T: Any,
        F: Fn(&T) -> Constructor + 'static,
    {
        let adapter: Adapter = Box::new(move |any| any.downcast_ref::<T>().map(&adapt));
        self.adapters.insert(TypeId::of::<T>(), adapter);
    }

    /// Adapt `value` if an adapter for its concrete type is registered.
    pub fn adapt(&self, value: &dyn Any) -> Option<Constructor> {
        self.adapters.get(&value.type_id()).and_then(|adapt| adapt(value))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
