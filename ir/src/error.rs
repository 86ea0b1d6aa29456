// error.rs — Error type shared by every IR operation
//
// Failure classes:
//   unsupported input    — a native value or tag/value pair with no conversion
//   contract mismatch    — caller-supplied names, tags, lengths or ids disagree
//   structural fault     — the graph itself is malformed or an edit would
//                          leave dangling consumers
//   codec failure        — the external encoding cannot be decoded
// Advisory conflicts are not errors; see `diag`.

use thiserror::Error;

use crate::attr::AttributeType;
use crate::id::{NodeId, ValueId};

/// Result type for IR operations.
pub type Result<T> = std::result::Result<T, IrError>;

#[derive(Error, Debug)]
pub enum IrError {
    #[error("unsupported attribute type: '{found}'")]
    UnsupportedAttributeType { found: &'static str },

    #[error("cannot infer an attribute type from an empty sequence; pass an explicit type")]
    EmptySequence,

    #[error("attribute '{name}': a {found} value cannot be stored as {ty}")]
    UnsupportedAttributeValue {
        name: String,
        ty: AttributeType,
        found: &'static str,
    },

    #[error("attribute '{name}': an attribute type must be provided when the value is absent")]
    MissingAttributeType { name: String },

    #[error("attribute name '{found}' does not match provided name '{expected}'")]
    AttributeNameMismatch { expected: String, found: String },

    #[error("attribute '{name}': type {found} does not match provided type {expected}")]
    AttributeTypeMismatch {
        name: String,
        expected: AttributeType,
        found: AttributeType,
    },

    #[error("the number of {what} must match ({left} != {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },

    #[error("unknown value {0}")]
    UnknownValue(ValueId),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is not in the node order of this graph")]
    NodeNotInGraph(NodeId),

    #[error("node {0} is already in the node order of this graph")]
    NodeAlreadyInGraph(NodeId),

    #[error("node {node} has {arity} inputs; slot {slot} is out of range")]
    InputSlotOutOfRange {
        node: NodeId,
        slot: usize,
        arity: usize,
    },

    #[error("initializer '{0}' is already defined")]
    DuplicateInitializer(String),

    #[error("value {0} cannot be an initializer: {1}")]
    InvalidInitializer(ValueId, &'static str),

    #[error("cannot remove node {node}: output {value} {reason}")]
    UnsafeRemoval {
        node: NodeId,
        value: ValueId,
        reason: &'static str,
    },

    #[error("inconsistent graph: {0}")]
    Inconsistent(String),

    #[error("Constant node '{node}' {message}")]
    MalformedConstant { node: String, message: String },

    #[error(
        "unsupported attribute '{attribute}' in Constant node '{node}'; expected one of \
         'value_float', 'value_floats', 'value_int', 'value_ints', 'value_string', \
         'value_strings', or 'value'"
    )]
    UnsupportedConstantAttribute { node: String, attribute: String },

    #[error("decode error: {message}")]
    Decode { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IrError {
    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        IrError::Decode {
            message: message.into(),
        }
    }

    /// Create a malformed-Constant error for the named node
    pub fn malformed_constant(node: impl Into<String>, message: impl Into<String>) -> Self {
        IrError::MalformedConstant {
            node: node.into(),
            message: message.into(),
        }
    }
}
