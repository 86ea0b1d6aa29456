// types.rs — Element types, shapes and type descriptors
//
// `DataType` carries the ONNX element-type codes so the codec can map them
// one-to-one. `TypeDesc` is the closed set of type descriptors a value (or a
// TYPE_PROTO attribute) can declare.

use std::fmt;

// ── Element types ───────────────────────────────────────────────────────────

/// Tensor element type, numbered as in the ONNX `TensorProto.DataType` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Float,
    Uint8,
    Int8,
    Uint16,
    Int16,
    Int32,
    Int64,
    String,
    Bool,
    Float16,
    Double,
    Uint32,
    Uint64,
    Bfloat16,
}

impl DataType {
    pub const ALL: [DataType; 14] = [
        DataType::Float,
        DataType::Uint8,
        DataType::Int8,
        DataType::Uint16,
        DataType::Int16,
        DataType::Int32,
        DataType::Int64,
        DataType::String,
        DataType::Bool,
        DataType::Float16,
        DataType::Double,
        DataType::Uint32,
        DataType::Uint64,
        DataType::Bfloat16,
    ];

    /// The ONNX numeric code.
    pub fn code(self) -> i32 {
        match self {
            DataType::Float => 1,
            DataType::Uint8 => 2,
            DataType::Int8 => 3,
            DataType::Uint16 => 4,
            DataType::Int16 => 5,
            DataType::Int32 => 6,
            DataType::Int64 => 7,
            DataType::String => 8,
            DataType::Bool => 9,
            DataType::Float16 => 10,
            DataType::Double => 11,
            DataType::Uint32 => 12,
            DataType::Uint64 => 13,
            DataType::Bfloat16 => 16,
        }
    }

    pub fn from_code(code: i32) -> Option<DataType> {
        DataType::ALL.into_iter().find(|dt| dt.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Float => "FLOAT",
            DataType::Uint8 => "UINT8",
            DataType::Int8 => "INT8",
            DataType::Uint16 => "UINT16",
            DataType::Int16 => "INT16",
            DataType::Int32 => "INT32",
            DataType::Int64 => "INT64",
            DataType::String => "STRING",
            DataType::Bool => "BOOL",
            DataType::Float16 => "FLOAT16",
            DataType::Double => "DOUBLE",
            DataType::Uint32 => "UINT32",
            DataType::Uint64 => "UINT64",
            DataType::Bfloat16 => "BFLOAT16",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Shapes ──────────────────────────────────────────────────────────────────

/// One dimension of a declared shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dim {
    Fixed(i64),
    Symbolic(String),
    Unknown,
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Fixed(n) => write!(f, "{n}"),
            Dim::Symbolic(s) => f.write_str(s),
            Dim::Unknown => f.write_str("?"),
        }
    }
}

/// A declared shape. A rank-0 shape (`[]`) describes a scalar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    pub dims: Vec<Dim>,
}

impl Shape {
    pub fn new(dims: Vec<Dim>) -> Self {
        Shape { dims }
    }

    /// Shape whose every dimension is known.
    pub fn fixed(dims: &[i64]) -> Self {
        Shape {
            dims: dims.iter().map(|&d| Dim::Fixed(d)).collect(),
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// All dimensions as integers, if every one is fixed.
    pub fn as_fixed(&self) -> Option<Vec<i64>> {
        self.dims
            .iter()
            .map(|d| match d {
                Dim::Fixed(n) => Some(*n),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{dim}")?;
        }
        f.write_str("]")
    }
}

// ── Type descriptors ────────────────────────────────────────────────────────

/// The declared type of a value, or the payload of a TYPE_PROTO attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    Tensor(DataType),
    SparseTensor(DataType),
    Sequence(Box<TypeDesc>),
    Optional(Box<TypeDesc>),
}

impl TypeDesc {
    pub fn sequence(elem: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(elem))
    }

    pub fn optional(elem: TypeDesc) -> Self {
        TypeDesc::Optional(Box::new(elem))
    }

    /// The innermost element type.
    pub fn elem_type(&self) -> DataType {
        match self {
            TypeDesc::Tensor(dt) | TypeDesc::SparseTensor(dt) => *dt,
            TypeDesc::Sequence(inner) | TypeDesc::Optional(inner) => inner.elem_type(),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Tensor(dt) => write!(f, "Tensor({dt})"),
            TypeDesc::SparseTensor(dt) => write!(f, "SparseTensor({dt})"),
            TypeDesc::Sequence(inner) => write!(f, "Sequence({inner})"),
            TypeDesc::Optional(inner) => write!(f, "Optional({inner})"),
        }
    }
}
