// constant.rs — Compile-time constant resolution
//
// A value is constant if it embeds a tensor (initializers, or values a pass
// has folded) or if it is the single output of a `Constant` node in the
// default domain. Resolution can optionally overwrite the value's declared
// shape and type with the tensor's.
//
// Preconditions: `value` belongs to `graph`.
// Postconditions: with `propagate_shape_type`, a resolved value's shape and
//   type equal the tensor's.
// Failure modes: a `Constant` node with the wrong number of outputs or
//   attributes, an unknown attribute name, or a payload that does not match
//   the attribute name.
// Side effects: `log::warn!` when declared metadata is overwritten or a
//   batch resolution skips a malformed `Constant`.

use log::warn;

use crate::attr::AttrValue;
use crate::diag::{codes, Diagnostic};
use crate::error::{IrError, Result};
use crate::graph::Graph;
use crate::id::ValueId;
use crate::tensor::Tensor;
use crate::types::TypeDesc;

pub const CONSTANT_OP: &str = "Constant";

/// Outcome of resolving one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstResolution {
    pub tensor: Option<Tensor>,
    /// Metadata conflicts found while propagating shape and type.
    pub diagnostics: Vec<Diagnostic>,
}

/// The constant tensor `value` denotes, if any. See `resolve_const_tensor`.
pub fn get_const_tensor(
    graph: &mut Graph,
    value: ValueId,
    propagate_shape_type: bool,
) -> Result<Option<Tensor>> {
    Ok(resolve_const_tensor(graph, value, propagate_shape_type)?.tensor)
}

/// Resolve `value` to a constant tensor.
///
/// An embedded constant is returned unchanged. Otherwise the producer must be
/// a `Constant` node in the `""` domain; its single attribute gives the tensor,
/// which is named after `value`. A reference attribute cannot be resolved
/// here and yields `None`, as does any other producer or none at all.
pub fn resolve_const_tensor(
    graph: &mut Graph,
    value: ValueId,
    propagate_shape_type: bool,
) -> Result<ConstResolution> {
    let embedded = graph
        .try_value(value)
        .ok_or(IrError::UnknownValue(value))?
        .const_value()
        .cloned();
    let tensor = match embedded {
        Some(tensor) => tensor,
        None => match constant_node_tensor(graph, value)? {
            Some(tensor) => tensor,
            None => return Ok(ConstResolution::default()),
        },
    };
    let diagnostics = if propagate_shape_type {
        reconcile_shape_type(graph, value, &tensor)
    } else {
        Vec::new()
    };
    Ok(ConstResolution {
        tensor: Some(tensor),
        diagnostics,
    })
}

fn constant_node_tensor(graph: &Graph, value: ValueId) -> Result<Option<Tensor>> {
    let Some(producer) = graph.producer(value) else {
        return Ok(None);
    };
    let node = graph.node(producer);
    if !node.is_op("", CONSTANT_OP) {
        return Ok(None);
    }
    let label = node.name().unwrap_or_default();
    if node.outputs().len() != 1 {
        return Err(IrError::malformed_constant(
            label,
            format!(
                "must have exactly one output, but has {} outputs",
                node.outputs().len()
            ),
        ));
    }
    if node.attributes().len() != 1 {
        return Err(IrError::malformed_constant(
            label,
            format!(
                "must have exactly one attribute, but has {} attributes",
                node.attributes().len()
            ),
        ));
    }

    let attr = &node.attributes()[0];
    if attr.is_ref() {
        return Ok(None);
    }
    let payload = attr.value().ok_or_else(|| {
        IrError::malformed_constant(label, format!("attribute '{}' has no value", attr.name()))
    })?;

    let mut tensor = match (attr.name(), payload) {
        ("value_float", AttrValue::Float(v)) => Tensor::scalar_f32(*v),
        ("value_floats", AttrValue::Floats(v)) => Tensor::from_f32(v.clone()),
        ("value_int", AttrValue::Int(v)) => Tensor::scalar_i64(*v),
        ("value_ints", AttrValue::Ints(v)) => Tensor::from_i64(v.clone()),
        ("value_string", AttrValue::String(v)) => Tensor::scalar_string(v),
        ("value_strings", AttrValue::Strings(v)) => Tensor::from_strings(v),
        ("value", AttrValue::Tensor(t)) => t.clone(),
        (
            "value_float" | "value_floats" | "value_int" | "value_ints" | "value_string"
            | "value_strings" | "value",
            other,
        ) => {
            return Err(IrError::malformed_constant(
                label,
                format!(
                    "attribute '{}' holds a {} payload",
                    attr.name(),
                    other.attribute_type()
                ),
            ))
        }
        (name, _) => {
            return Err(IrError::UnsupportedConstantAttribute {
                node: label.to_string(),
                attribute: name.to_string(),
            })
        }
    };
    tensor.set_name(graph.value(value).name().map(str::to_string));
    Ok(Some(tensor))
}

/// Resolve every value of `graph` (not its subgraphs), in id order.
///
/// Unlike `resolve_const_tensor` this does not stop at a malformed `Constant`
/// node: the failure becomes an `E0100` error diagnostic for that value and
/// the walk goes on. Returns the resolved tensors and every diagnostic.
pub fn resolve_all_constants(
    graph: &mut Graph,
    propagate_shape_type: bool,
) -> (Vec<(ValueId, Tensor)>, Vec<Diagnostic>) {
    let mut resolved = Vec::new();
    let mut diagnostics = Vec::new();
    for id in graph.value_ids() {
        match resolve_const_tensor(graph, id, propagate_shape_type) {
            Ok(resolution) => {
                diagnostics.extend(resolution.diagnostics);
                if let Some(tensor) = resolution.tensor {
                    resolved.push((id, tensor));
                }
            }
            Err(e) => {
                warn!("{}: {}", graph.value_label(id), e);
                diagnostics.push(
                    Diagnostic::error(graph.value_label(id), e.to_string())
                        .with_code(codes::E0100),
                );
            }
        }
    }
    (resolved, diagnostics)
}

/// Overwrite `value`'s shape and type with those of `tensor`.
///
/// A declared shape or type that disagrees is replaced anyway; each conflict
/// is logged and returned as a warning (`W0100` shape, `W0101` type).
pub fn reconcile_shape_type(graph: &mut Graph, value: ValueId, tensor: &Tensor) -> Vec<Diagnostic> {
    let subject = graph
        .value(value)
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string());
    let shape = tensor.shape();
    let ty = TypeDesc::Tensor(tensor.dtype());
    let mut diagnostics = Vec::new();

    let target = graph.value_mut(value);
    if let Some(declared) = target.shape() {
        if *declared != shape {
            warn!(
                "value '{}' has shape {} that differs from the constant tensor's shape {}; \
                 the value's shape will be updated",
                subject, declared, shape
            );
            diagnostics.push(
                Diagnostic::warning(
                    subject.clone(),
                    format!("declared shape {declared} replaced by constant shape {shape}"),
                )
                .with_code(codes::W0100)
                .with_hint(format!("correct or drop the declared shape of '{subject}'")),
            );
        }
    }
    if let Some(declared) = target.ty() {
        if *declared != ty {
            warn!(
                "value '{}' has type {} that differs from the constant tensor's type {}; \
                 the value's type will be updated",
                subject, declared, ty
            );
            diagnostics.push(
                Diagnostic::warning(
                    subject.clone(),
                    format!("declared type {declared} replaced by constant type {ty}"),
                )
                .with_code(codes::W0101)
                .with_hint(format!("correct or drop the declared type of '{subject}'")),
            );
        }
    }
    target.set_shape(Some(shape));
    target.set_type(Some(ty));
    diagnostics
}
