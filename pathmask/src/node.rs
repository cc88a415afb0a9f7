//! The dynamic value tree the sanitizer walks.
//!
//! `Node` models arbitrary nested data: primitives plus two composite kinds,
//! [`Array`] and [`Object`]. Composites are shared handles, so a tree can
//! contain the same array or object more than once, or even contain itself.
//! Identity is observable through [`Node::ptr_eq`], which is what lets the
//! walker reproduce shared and cyclic structure in its output.
//!
//! Cycles built out of these handles are reference cycles and are not
//! reclaimed when the last outside handle is dropped.

use std::{cell::RefCell, fmt, rc::Rc};

/// The runtime kind of a [`Node`].
///
/// Kinds key the type-keyed generator registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Lowercase name of the kind (`"number"`, `"object"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric leaf.
///
/// Integers keep their exact integer value, and numbers read as floats stay
/// floats, so a number that passes through a walk untouched serializes
/// exactly as it was read. A number built with [`Number::new`] has no
/// recorded representation and is written as an integer when it is integral.
#[derive(Clone, Copy)]
pub struct Number {
    value: f64,
    repr: Repr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Repr {
    Unspecified,
    Float,
    Signed(i64),
    Unsigned(u64),
}

impl Number {
    /// A number with no recorded representation.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            repr: Repr::Unspecified,
        }
    }

    /// A number that is always written as a float.
    pub fn float(value: f64) -> Self {
        Self {
            value,
            repr: Repr::Float,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.value
    }

    /// The exact value, if this number was built from an integer that fits.
    pub fn as_i64(self) -> Option<i64> {
        match self.repr {
            Repr::Signed(value) => Some(value),
            Repr::Unsigned(value) => i64::try_from(value).ok(),
            Repr::Unspecified | Repr::Float => None,
        }
    }

    /// The exact value, if this number was built from an integer that fits.
    pub fn as_u64(self) -> Option<u64> {
        match self.repr {
            Repr::Signed(value) => u64::try_from(value).ok(),
            Repr::Unsigned(value) => Some(value),
            Repr::Unspecified | Repr::Float => None,
        }
    }

    pub(crate) fn repr(self) -> Repr {
        self.repr
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::new(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::from(i64::from(value))
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::from(u64::from(value))
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self {
            value: value as f64,
            repr: Repr::Signed(value),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Self {
            value: value as f64,
            repr: Repr::Unsigned(value),
        }
    }
}

// Integers compare exactly; anything else compares as f64.
impl PartialEq for Number {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self.repr, other.repr) {
            (Repr::Signed(a), Repr::Signed(b)) => a == b,
            (Repr::Unsigned(a), Repr::Unsigned(b)) => a == b,
            (Repr::Signed(a), Repr::Unsigned(b)) | (Repr::Unsigned(b), Repr::Signed(a)) => {
                u64::try_from(a).is_ok_and(|a| a == b)
            }
            _ => self.value == other.value,
        }
    }
}

/// JavaScript-style rendering: `NaN`, `Infinity`, `-0` as `0`, and
/// integral values without a fraction.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::Signed(value) => write!(f, "{value}"),
            Repr::Unsigned(value) => write!(f, "{value}"),
            Repr::Unspecified | Repr::Float => f.write_str(&format_number(self.value)),
        }
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A shared, ordered list of nodes.
///
/// Cloning an `Array` clones the handle; both clones see the same elements.
#[derive(Clone, Default)]
pub struct Array(Rc<RefCell<Vec<Node>>>);

impl Array {
    /// Creates an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Rc::new(RefCell::new(Vec::with_capacity(capacity))))
    }

    /// Appends an element.
    pub fn push(&self, value: impl Into<Node>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Returns a handle to the element at `index`.
    pub fn get(&self, index: usize) -> Option<Node> {
        self.0.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Snapshot of the current elements.
    ///
    /// Composite elements in the snapshot are handles into the same data.
    pub fn to_vec(&self) -> Vec<Node> {
        self.0.borrow().clone()
    }

    /// Returns `true` if both handles point at the same array.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<T> FromIterator<T> for Array
where
    T: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(Rc::new(RefCell::new(iter.into_iter().map(Into::into).collect())))
    }
}

/// A shared, insertion-ordered map from keys to nodes.
///
/// Cloning an `Object` clones the handle; both clones see the same entries.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Vec<(String, Node)>>>);

impl Object {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its position and has its value replaced; the
    /// previous value is returned.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        if let Some((_, slot)) = entries.iter_mut().find(|(existing, _)| *existing == key) {
            return Some(std::mem::replace(slot, value));
        }
        entries.push((key, value));
        None
    }

    /// Appends an entry without checking for an existing key.
    ///
    /// Callers guarantee `key` is not already present.
    pub(crate) fn push_unique(&self, key: String, value: Node) {
        self.0.borrow_mut().push((key, value));
    }

    /// Returns a handle to the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.0
            .borrow()
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.clone())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Snapshot of the current entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Node)> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns `true` if both handles point at the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn identity(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl<K, V> FromIterator<(K, V)> for Object
where
    K: Into<String>,
    V: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let object = Object::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

/// A value in a nested data tree.
#[derive(Clone, Default)]
pub enum Node {
    /// An absent value. Kept distinct from `Null` so that both survive a walk.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Array),
    Object(Object),
}

impl Node {
    /// Creates an empty array node.
    #[must_use]
    pub fn array() -> Self {
        Node::Array(Array::new())
    }

    /// Creates an empty object node.
    #[must_use]
    pub fn object() -> Self {
        Node::Object(Object::new())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Node::Undefined => ValueKind::Undefined,
            Node::Null => ValueKind::Null,
            Node::Bool(_) => ValueKind::Boolean,
            Node::Number(_) => ValueKind::Number,
            Node::String(_) => ValueKind::String,
            Node::Array(_) => ValueKind::Array,
            Node::Object(_) => ValueKind::Object,
        }
    }

    /// Returns `true` for arrays and objects.
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Number(number) => Some(number.as_f64()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up `key` when this node is an object.
    pub fn get(&self, key: &str) -> Option<Node> {
        self.as_object().and_then(|object| object.get(key))
    }

    /// Looks up `index` when this node is an array.
    pub fn at(&self, index: usize) -> Option<Node> {
        self.as_array().and_then(|array| array.get(index))
    }

    /// Returns `true` if both nodes are the same composite.
    ///
    /// Primitives have no identity and never compare as pointer-equal.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Array(a), Node::Array(b)) => a.ptr_eq(b),
            (Node::Object(a), Node::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub(crate) fn identity(&self) -> Option<usize> {
        match self {
            Node::Array(array) => Some(array.identity()),
            Node::Object(object) => Some(object.identity()),
            _ => None,
        }
    }

    /// Renders the value the way a JavaScript `String(value)` would for
    /// primitives. Composites render as `[array]` / `[object]`.
    pub fn to_display_string(&self) -> String {
        match self {
            Node::Undefined => "undefined".to_owned(),
            Node::Null => "null".to_owned(),
            Node::Bool(value) => value.to_string(),
            Node::Number(number) => number.to_string(),
            Node::String(value) => value.clone(),
            Node::Array(_) => "[array]".to_owned(),
            Node::Object(_) => "[object]".to_owned(),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if value == 0.0 {
        // -0 prints as 0
        "0".to_owned()
    } else {
        value.to_string()
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<Number> for Node {
    fn from(value: Number) -> Self {
        Node::Number(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Number(Number::new(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Number(Number::from(value))
    }
}

impl From<u32> for Node {
    fn from(value: u32) -> Self {
        Node::Number(Number::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Number(Number::from(value))
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Node::Number(Number::from(value))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Array> for Node {
    fn from(value: Array) -> Self {
        Node::Array(value)
    }
}

impl From<Object> for Node {
    fn from(value: Object) -> Self {
        Node::Object(value)
    }
}

impl<T> From<Option<T>> for Node
where
    T: Into<Node>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}

impl<T> From<Vec<T>> for Node
where
    T: Into<Node>,
{
    fn from(value: Vec<T>) -> Self {
        Node::Array(value.into_iter().collect())
    }
}

// Deep equality. Pairs of composites already under comparison are assumed
// equal, which makes comparing two cyclic trees terminate.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        deep_eq(self, other, &mut Vec::new())
    }
}

fn deep_eq(left: &Node, right: &Node, in_progress: &mut Vec<(usize, usize)>) -> bool {
    match (left, right) {
        (Node::Undefined, Node::Undefined) | (Node::Null, Node::Null) => true,
        (Node::Bool(a), Node::Bool(b)) => a == b,
        (Node::Number(a), Node::Number(b)) => a == b,
        (Node::String(a), Node::String(b)) => a == b,
        (Node::Array(a), Node::Array(b)) => {
            let pair = (a.identity(), b.identity());
            if a.ptr_eq(b) || in_progress.contains(&pair) {
                return true;
            }
            let (a, b) = (a.to_vec(), b.to_vec());
            if a.len() != b.len() {
                return false;
            }
            in_progress.push(pair);
            let equal = a.iter().zip(&b).all(|(x, y)| deep_eq(x, y, in_progress));
            in_progress.pop();
            equal
        }
        (Node::Object(a), Node::Object(b)) => {
            let pair = (a.identity(), b.identity());
            if a.ptr_eq(b) || in_progress.contains(&pair) {
                return true;
            }
            let (a, b) = (a.entries(), b.entries());
            if a.len() != b.len() {
                return false;
            }
            in_progress.push(pair);
            let equal = a.iter().zip(&b).all(|((ka, va), (kb, vb))| {
                ka == kb && deep_eq(va, vb, in_progress)
            });
            in_progress.pop();
            equal
        }
        _ => false,
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_node(self, f, &mut Vec::new())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_node(&Node::Array(self.clone()), f, &mut Vec::new())
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        debug_node(&Node::Object(self.clone()), f, &mut Vec::new())
    }
}

fn debug_node(node: &Node, f: &mut fmt::Formatter<'_>, ancestors: &mut Vec<usize>) -> fmt::Result {
    if let Some(identity) = node.identity() {
        if ancestors.contains(&identity) {
            return f.write_str("[Circular]");
        }
        ancestors.push(identity);
    }
    let result = match node {
        Node::Undefined => f.write_str("undefined"),
        Node::Null => f.write_str("null"),
        Node::Bool(value) => write!(f, "{value}"),
        Node::Number(number) => write!(f, "{number}"),
        Node::String(value) => write!(f, "{value:?}"),
        Node::Array(array) => {
            f.write_str("[")?;
            for (index, item) in array.to_vec().iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                debug_node(item, f, ancestors)?;
            }
            f.write_str("]")
        }
        Node::Object(object) => {
            f.write_str("{")?;
            for (index, (key, value)) in object.entries().iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                debug_node(value, f, ancestors)?;
            }
            f.write_str("}")
        }
    };
    if node.identity().is_some() {
        ancestors.pop();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{Node, Number, Object, ValueKind};

    #[test]
    fn object_insert_replaces_in_place() {
        let object = Object::new();
        object.insert("a", 1);
        object.insert("b", 2);
        let previous = object.insert("a", 3);

        assert_eq!(previous, Some(Node::from(1)));
        assert_eq!(object.keys(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(object.get("a"), Some(Node::from(3)));
    }

    #[test]
    fn clones_share_identity() {
        let node = Node::object();
        let alias = node.clone();
        assert!(node.ptr_eq(&alias));
        assert!(!node.ptr_eq(&Node::object()));
        assert!(!Node::from(1).ptr_eq(&Node::from(1)));
    }

    #[test]
    fn display_string_follows_javascript_rendering() {
        assert_eq!(Node::from(1.0).to_display_string(), "1");
        assert_eq!(Node::from(-0.0).to_display_string(), "0");
        assert_eq!(Node::from(2.5).to_display_string(), "2.5");
        assert_eq!(Node::from(f64::NAN).to_display_string(), "NaN");
        assert_eq!(Node::from(true).to_display_string(), "true");
        assert_eq!(Node::Null.to_display_string(), "null");
        assert_eq!(Node::Undefined.to_display_string(), "undefined");
    }

    #[test]
    fn kinds() {
        assert_eq!(Node::from("x").kind(), ValueKind::String);
        assert_eq!(Node::array().kind(), ValueKind::Array);
        assert_eq!(Node::from(None::<i32>).kind(), ValueKind::Null);
        assert_eq!(ValueKind::Boolean.to_string(), "boolean");
    }

    #[test]
    fn cyclic_values_compare_and_format() {
        let a = Object::new();
        a.insert("self", a.clone());
        let b = Object::new();
        b.insert("self", b.clone());

        assert_eq!(Node::from(a.clone()), Node::from(b));
        assert_eq!(format!("{a:?}"), "{\"self\": [Circular]}");
    }

    #[test]
    fn integers_compare_exactly() {
        let above_f64_precision = 9_007_199_254_740_993_u64;
        assert_ne!(
            Number::from(above_f64_precision),
            Number::from(above_f64_precision - 1)
        );
        assert_eq!(Number::from(5_i64), Number::from(5_u64));
        assert_eq!(Number::from(-1_i64).as_u64(), None);
        assert_eq!(Number::float(2.0).as_i64(), None);
        assert_eq!(Number::from(above_f64_precision).to_string(), "9007199254740993");
    }
}
