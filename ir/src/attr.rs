// attr.rs — Typed node attributes
//
// `AttrValue` is the closed tagged union of attribute payloads. An `Attr`
// pairs a name and a tag with either a concrete value, a reference to a
// function-level attribute parameter (bound later, inside a function body),
// or an empty placeholder of a known tag.

use std::fmt;

use crate::graph::Graph;
use crate::tensor::Tensor;
use crate::types::TypeDesc;

// ── Attribute type tag ──────────────────────────────────────────────────────

/// Attribute tag, numbered as in the ONNX `AttributeProto.AttributeType` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Float,
    Int,
    String,
    Tensor,
    Graph,
    Floats,
    Ints,
    Strings,
    Tensors,
    Graphs,
    TypeProto,
    TypeProtos,
}

impl AttributeType {
    pub const ALL: [AttributeType; 12] = [
        AttributeType::Float,
        AttributeType::Int,
        AttributeType::String,
        AttributeType::Tensor,
        AttributeType::Graph,
        AttributeType::Floats,
        AttributeType::Ints,
        AttributeType::Strings,
        AttributeType::Tensors,
        AttributeType::Graphs,
        AttributeType::TypeProto,
        AttributeType::TypeProtos,
    ];

    pub fn code(self) -> i32 {
        match self {
            AttributeType::Float => 1,
            AttributeType::Int => 2,
            AttributeType::String => 3,
            AttributeType::Tensor => 4,
            AttributeType::Graph => 5,
            AttributeType::Floats => 6,
            AttributeType::Ints => 7,
            AttributeType::Strings => 8,
            AttributeType::Tensors => 9,
            AttributeType::Graphs => 10,
            AttributeType::TypeProto => 13,
            AttributeType::TypeProtos => 14,
        }
    }

    pub fn from_code(code: i32) -> Option<AttributeType> {
        AttributeType::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            AttributeType::Float => "FLOAT",
            AttributeType::Int => "INT",
            AttributeType::String => "STRING",
            AttributeType::Tensor => "TENSOR",
            AttributeType::Graph => "GRAPH",
            AttributeType::Floats => "FLOATS",
            AttributeType::Ints => "INTS",
            AttributeType::Strings => "STRINGS",
            AttributeType::Tensors => "TENSORS",
            AttributeType::Graphs => "GRAPHS",
            AttributeType::TypeProto => "TYPE_PROTO",
            AttributeType::TypeProtos => "TYPE_PROTOS",
        }
    }

    pub fn is_sequence(self) -> bool {
        matches!(
            self,
            AttributeType::Floats
                | AttributeType::Ints
                | AttributeType::Strings
                | AttributeType::Tensors
                | AttributeType::Graphs
                | AttributeType::TypeProtos
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Attribute payload ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f32),
    String(String),
    Ints(Vec<i64>),
    Floats(Vec<f32>),
    Strings(Vec<String>),
    Tensor(Tensor),
    Tensors(Vec<Tensor>),
    Graph(Graph),
    Graphs(Vec<Graph>),
    TypeProto(TypeDesc),
    TypeProtos(Vec<TypeDesc>),
}

impl AttrValue {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttrValue::Int(_) => AttributeType::Int,
            AttrValue::Float(_) => AttributeType::Float,
            AttrValue::String(_) => AttributeType::String,
            AttrValue::Ints(_) => AttributeType::Ints,
            AttrValue::Floats(_) => AttributeType::Floats,
            AttrValue::Strings(_) => AttributeType::Strings,
            AttrValue::Tensor(_) => AttributeType::Tensor,
            AttrValue::Tensors(_) => AttributeType::Tensors,
            AttrValue::Graph(_) => AttributeType::Graph,
            AttrValue::Graphs(_) => AttributeType::Graphs,
            AttrValue::TypeProto(_) => AttributeType::TypeProto,
            AttrValue::TypeProtos(_) => AttributeType::TypeProtos,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v:?}"),
            AttrValue::String(v) => write!(f, "{v:?}"),
            AttrValue::Ints(v) => write!(f, "{v:?}"),
            AttrValue::Floats(v) => write!(f, "{v:?}"),
            AttrValue::Strings(v) => write!(f, "{v:?}"),
            AttrValue::Tensor(t) => write!(f, "{t}"),
            AttrValue::Tensors(ts) => write_list(f, ts),
            AttrValue::Graph(g) => write!(f, "<graph {}>", g.name().unwrap_or("?")),
            AttrValue::Graphs(gs) => {
                f.write_str("[")?;
                for (i, g) in gs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "<graph {}>", g.name().unwrap_or("?"))?;
                }
                f.write_str("]")
            }
            AttrValue::TypeProto(t) => write!(f, "{t}"),
            AttrValue::TypeProtos(ts) => write_list(f, ts),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

// ── Attribute record ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum AttrPayload {
    /// A concrete value.
    Value(AttrValue),
    /// Deferred binding to the named attribute parameter of the enclosing function.
    Ref(String),
    /// Tag known, value not supplied.
    Empty,
}

/// A named, typed attribute attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    name: String,
    ty: AttributeType,
    payload: AttrPayload,
}

impl Attr {
    /// Attribute holding `value`; the tag is taken from the value.
    pub fn new(name: impl Into<String>, value: AttrValue) -> Self {
        Attr {
            name: name.into(),
            ty: value.attribute_type(),
            payload: AttrPayload::Value(value),
        }
    }

    /// Reference attribute, resolved against `ref_attr_name` when the
    /// enclosing function is instantiated.
    pub fn reference(
        name: impl Into<String>,
        ref_attr_name: impl Into<String>,
        ty: AttributeType,
    ) -> Self {
        Attr {
            name: name.into(),
            ty,
            payload: AttrPayload::Ref(ref_attr_name.into()),
        }
    }

    /// Attribute with a tag and no value.
    pub fn placeholder(name: impl Into<String>, ty: AttributeType) -> Self {
        Attr {
            name: name.into(),
            ty,
            payload: AttrPayload::Empty,
        }
    }

    pub fn int(name: impl Into<String>, value: i64) -> Self {
        Attr::new(name, AttrValue::Int(value))
    }

    pub fn float(name: impl Into<String>, value: f32) -> Self {
        Attr::new(name, AttrValue::Float(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attr::new(name, AttrValue::String(value.into()))
    }

    pub fn ints(name: impl Into<String>, values: Vec<i64>) -> Self {
        Attr::new(name, AttrValue::Ints(values))
    }

    pub fn floats(name: impl Into<String>, values: Vec<f32>) -> Self {
        Attr::new(name, AttrValue::Floats(values))
    }

    pub fn tensor(name: impl Into<String>, value: Tensor) -> Self {
        Attr::new(name, AttrValue::Tensor(value))
    }

    pub fn graph(name: impl Into<String>, value: Graph) -> Self {
        Attr::new(name, AttrValue::Graph(value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> AttributeType {
        self.ty
    }

    pub fn payload(&self) -> &AttrPayload {
        &self.payload
    }

    pub fn value(&self) -> Option<&AttrValue> {
        match &self.payload {
            AttrPayload::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_ref(&self) -> bool {
        matches!(self.payload, AttrPayload::Ref(_))
    }

    pub fn ref_attr_name(&self) -> Option<&str> {
        match &self.payload {
            AttrPayload::Ref(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value()? {
            AttrValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self.value()? {
            AttrValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self.value()? {
            AttrValue::Tensor(t) => Some(t),
            _ => None,
        }
    }

    /// Subgraphs held by a GRAPH or GRAPHS attribute; empty for any other tag.
    pub fn subgraphs(&self) -> &[Graph] {
        match &self.payload {
            AttrPayload::Value(AttrValue::Graph(g)) => std::slice::from_ref(g),
            AttrPayload::Value(AttrValue::Graphs(gs)) => gs,
            _ => &[],
        }
    }

    pub fn subgraphs_mut(&mut self) -> &mut [Graph] {
        match &mut self.payload {
            AttrPayload::Value(AttrValue::Graph(g)) => std::slice::from_mut(g),
            AttrPayload::Value(AttrValue::Graphs(gs)) => gs,
            _ => &mut [],
        }
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            AttrPayload::Value(v) => write!(f, "{}={}", self.name, v),
            AttrPayload::Ref(r) => write!(f, "{}=@{}", self.name, r),
            AttrPayload::Empty => write!(f, "{}=<{}>", self.name, self.ty),
        }
    }
}
