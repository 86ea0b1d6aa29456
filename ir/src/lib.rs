// onnxir — in-memory IR for ONNX-style computation graphs
//
// Library root. Storage (`graph`) and its building blocks come first, then
// the editing protocol (`binder`, `rewire`, `constant`) and the surfaces
// built on top (`codec`, `traversal`, `dot`, `fingerprint`).

pub mod attr;
pub mod binder;
pub mod codec;
pub mod constant;
pub mod diag;
pub mod dot;
pub mod error;
pub mod fingerprint;
pub mod graph;
pub mod id;
pub mod rewire;
pub mod tensor;
pub mod traversal;
pub mod types;

pub use attr::{Attr, AttrPayload, AttrValue, AttributeType};
pub use binder::{convert_attribute, convert_attributes, infer_attribute_type, AttrInput};
pub use constant::{
    get_const_tensor, resolve_all_constants, resolve_const_tensor, ConstResolution,
};
pub use error::{IrError, Result};
pub use graph::{Function, Graph, Node, NodeSpec, Usage, Value};
pub use id::{NodeId, ValueId};
pub use rewire::{create_value_mapping, replace_all_uses_with, replace_nodes_and_values};
pub use tensor::{Tensor, TensorData};
pub use types::{DataType, Dim, Shape, TypeDesc};
