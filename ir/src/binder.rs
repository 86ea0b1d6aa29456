// binder.rs — Native values to typed attributes
//
// `AttrInput` is the set of native values a caller may hand to the binder.
// Inference maps an input to the unique attribute tag it denotes; binding
// converts it into that tag's representation, decoding wire tensors and
// graphs on the way.
//
// Preconditions: none.
// Postconditions: a returned `Attr` carries the requested (or inferred) tag
//   and a payload of that tag.
// Failure modes: unsupported or ambiguous inputs, tag/value disagreements,
//   name mismatches on pre-built attributes, decode failures.
// Side effects: none.

use crate::attr::{Attr, AttrValue, AttributeType};
use crate::codec::{self, GraphProto, TensorProto};
use crate::error::{IrError, Result};
use crate::graph::Graph;
use crate::tensor::Tensor;
use crate::types::TypeDesc;

// ── Native inputs ──────────────────────────────────────────────────────────

/// A native value that can be bound to an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrInput {
    Int(i64),
    Float(f64),
    Str(String),
    /// An already-built attribute, passed through unchanged.
    Attr(Attr),
    Tensor(Tensor),
    EncodedTensor(TensorProto),
    Graph(Graph),
    EncodedGraph(GraphProto),
    Type(TypeDesc),
    Seq(Vec<AttrInput>),
}

impl AttrInput {
    /// Short name of the input's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrInput::Int(_) => "int",
            AttrInput::Float(_) => "float",
            AttrInput::Str(_) => "string",
            AttrInput::Attr(_) => "attribute",
            AttrInput::Tensor(_) => "tensor",
            AttrInput::EncodedTensor(_) => "encoded tensor",
            AttrInput::Graph(_) => "graph",
            AttrInput::EncodedGraph(_) => "encoded graph",
            AttrInput::Type(_) => "type",
            AttrInput::Seq(items) if items.is_empty() => "empty sequence",
            AttrInput::Seq(_) => "mixed sequence",
        }
    }

    fn is_int(&self) -> bool {
        matches!(self, AttrInput::Int(_))
    }

    fn is_float(&self) -> bool {
        matches!(self, AttrInput::Float(_))
    }

    fn is_str(&self) -> bool {
        matches!(self, AttrInput::Str(_))
    }

    fn is_tensor_like(&self) -> bool {
        matches!(self, AttrInput::Tensor(_) | AttrInput::EncodedTensor(_))
    }

    fn is_graph_like(&self) -> bool {
        matches!(self, AttrInput::Graph(_) | AttrInput::EncodedGraph(_))
    }

    fn is_type(&self) -> bool {
        matches!(self, AttrInput::Type(_))
    }
}

macro_rules! attr_input_from {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for AttrInput {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

attr_input_from! {
    i64 => |v| AttrInput::Int(v);
    i32 => |v| AttrInput::Int(v as i64);
    f64 => |v| AttrInput::Float(v);
    f32 => |v| AttrInput::Float(v as f64);
    String => |v| AttrInput::Str(v);
    &str => |v| AttrInput::Str(v.to_string());
    Attr => |v| AttrInput::Attr(v);
    Tensor => |v| AttrInput::Tensor(v);
    TensorProto => |v| AttrInput::EncodedTensor(v);
    Graph => |v| AttrInput::Graph(v);
    GraphProto => |v| AttrInput::EncodedGraph(v);
    TypeDesc => |v| AttrInput::Type(v);
}

impl<T: Into<AttrInput>> From<Vec<T>> for AttrInput {
    fn from(items: Vec<T>) -> Self {
        AttrInput::Seq(items.into_iter().map(Into::into).collect())
    }
}

// ── Inference ──────────────────────────────────────────────────────────────

/// The attribute tag `value` denotes.
///
/// Scalars map to their scalar tag and an existing attribute to its own tag.
/// A sequence maps to the sequence tag shared by all of its elements; an
/// empty sequence is ambiguous and a mixed one is unsupported.
pub fn infer_attribute_type(value: &AttrInput) -> Result<AttributeType> {
    let unsupported = || IrError::UnsupportedAttributeType {
        found: value.kind_name(),
    };
    match value {
        AttrInput::Int(_) => Ok(AttributeType::Int),
        AttrInput::Float(_) => Ok(AttributeType::Float),
        AttrInput::Str(_) => Ok(AttributeType::String),
        AttrInput::Attr(attr) => Ok(attr.ty()),
        AttrInput::Tensor(_) | AttrInput::EncodedTensor(_) => Ok(AttributeType::Tensor),
        AttrInput::Graph(_) | AttrInput::EncodedGraph(_) => Ok(AttributeType::Graph),
        AttrInput::Type(_) => Ok(AttributeType::TypeProto),
        AttrInput::Seq(items) if items.is_empty() => Err(IrError::EmptySequence),
        AttrInput::Seq(items) => {
            let all = |pred: fn(&AttrInput) -> bool| items.iter().all(pred);
            if all(AttrInput::is_int) {
                Ok(AttributeType::Ints)
            } else if all(AttrInput::is_float) {
                Ok(AttributeType::Floats)
            } else if all(AttrInput::is_str) {
                Ok(AttributeType::Strings)
            } else if all(AttrInput::is_tensor_like) {
                Ok(AttributeType::Tensors)
            } else if all(AttrInput::is_graph_like) {
                Ok(AttributeType::Graphs)
            } else if all(AttrInput::is_type) {
                Ok(AttributeType::TypeProtos)
            } else {
                Err(unsupported())
            }
        }
    }
}

// ── Binding ────────────────────────────────────────────────────────────────

/// Bind `value` to an attribute named `name`.
///
/// - `None` needs an explicit `ty` and yields an empty placeholder.
/// - A pre-built `Attr` must carry `name` (and `ty`, when given) and is
///   returned as is.
/// - Anything else is converted to `ty`, or to the inferred tag if `ty` is
///   `None`. Wire tensors and graphs are decoded.
pub fn convert_attribute(
    name: &str,
    value: Option<AttrInput>,
    ty: Option<AttributeType>,
) -> Result<Attr> {
    let Some(value) = value else {
        let ty = ty.ok_or_else(|| IrError::MissingAttributeType {
            name: name.to_string(),
        })?;
        return Ok(Attr::placeholder(name, ty));
    };

    if let AttrInput::Attr(attr) = value {
        if attr.name() != name {
            return Err(IrError::AttributeNameMismatch {
                expected: name.to_string(),
                found: attr.name().to_string(),
            });
        }
        if let Some(expected) = ty {
            if attr.ty() != expected {
                return Err(IrError::AttributeTypeMismatch {
                    name: name.to_string(),
                    expected,
                    found: attr.ty(),
                });
            }
        }
        return Ok(attr);
    }

    let ty = match ty {
        Some(ty) => ty,
        None => infer_attribute_type(&value)?,
    };
    let found = value.kind_name();
    let mismatch = || IrError::UnsupportedAttributeValue {
        name: name.to_string(),
        ty,
        found,
    };

    let converted = match (ty, value) {
        (AttributeType::Int, AttrInput::Int(v)) => AttrValue::Int(v),
        (AttributeType::Float, AttrInput::Float(v)) => AttrValue::Float(v as f32),
        (AttributeType::Float, AttrInput::Int(v)) => AttrValue::Float(v as f32),
        (AttributeType::String, AttrInput::Str(v)) => AttrValue::String(v),
        (AttributeType::Ints, AttrInput::Seq(items)) => AttrValue::Ints(
            items
                .into_iter()
                .map(|item| match item {
                    AttrInput::Int(v) => Ok(v),
                    _ => Err(mismatch()),
                })
                .collect::<Result<_>>()?,
        ),
        (AttributeType::Floats, AttrInput::Seq(items)) => AttrValue::Floats(
            items
                .into_iter()
                .map(|item| match item {
                    AttrInput::Float(v) => Ok(v as f32),
                    AttrInput::Int(v) => Ok(v as f32),
                    _ => Err(mismatch()),
                })
                .collect::<Result<_>>()?,
        ),
        (AttributeType::Strings, AttrInput::Seq(items)) => AttrValue::Strings(
            items
                .into_iter()
                .map(|item| match item {
                    AttrInput::Str(v) => Ok(v),
                    _ => Err(mismatch()),
                })
                .collect::<Result<_>>()?,
        ),
        (AttributeType::Tensor, item) => AttrValue::Tensor(tensor_of(item).ok_or_else(mismatch)??),
        (AttributeType::Tensors, AttrInput::Seq(items)) => AttrValue::Tensors(
            items
                .into_iter()
                .map(|item| tensor_of(item).ok_or_else(mismatch)?)
                .collect::<Result<_>>()?,
        ),
        (AttributeType::Graph, item) => AttrValue::Graph(graph_of(item).ok_or_else(mismatch)??),
        (AttributeType::Graphs, AttrInput::Seq(items)) => AttrValue::Graphs(
            items
                .into_iter()
                .map(|item| graph_of(item).ok_or_else(mismatch)?)
                .collect::<Result<_>>()?,
        ),
        (AttributeType::TypeProto, AttrInput::Type(t)) => AttrValue::TypeProto(t),
        (AttributeType::TypeProtos, AttrInput::Seq(items)) => AttrValue::TypeProtos(
            items
                .into_iter()
                .map(|item| match item {
                    AttrInput::Type(t) => Ok(t),
                    _ => Err(mismatch()),
                })
                .collect::<Result<_>>()?,
        ),
        _ => return Err(mismatch()),
    };
    Ok(Attr::new(name, converted))
}

/// `None` if `input` is not tensor-like; otherwise the (decoded) tensor.
fn tensor_of(input: AttrInput) -> Option<Result<Tensor>> {
    match input {
        AttrInput::Tensor(t) => Some(Ok(t)),
        AttrInput::EncodedTensor(proto) => Some(codec::decode_tensor(&proto)),
        _ => None,
    }
}

/// `None` if `input` is not graph-like; otherwise the (decoded) graph.
fn graph_of(input: AttrInput) -> Option<Result<Graph>> {
    match input {
        AttrInput::Graph(g) => Some(Ok(g)),
        AttrInput::EncodedGraph(proto) => Some(codec::decode_subgraph(&proto)),
        _ => None,
    }
}

/// Bind every present entry in order, skipping `None` values.
pub fn convert_attributes<K, I>(entries: I) -> Result<Vec<Attr>>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Option<AttrInput>)>,
{
    let mut attrs = Vec::new();
    for (name, value) in entries {
        if let Some(value) = value {
            attrs.push(convert_attribute(name.as_ref(), Some(value), None)?);
        }
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    #[test]
    fn infer_scalars_and_sequences() {
        assert_eq!(infer_attribute_type(&3i64.into()).unwrap(), AttributeType::Int);
        assert_eq!(infer_attribute_type(&0.5f64.into()).unwrap(), AttributeType::Float);
        assert_eq!(infer_attribute_type(&"same".into()).unwrap(), AttributeType::String);
        assert_eq!(
            infer_attribute_type(&vec![1i64, 2, 3].into()).unwrap(),
            AttributeType::Ints
        );
        assert_eq!(
            infer_attribute_type(&vec![1.0f64, 2.0].into()).unwrap(),
            AttributeType::Floats
        );
        assert_eq!(
            infer_attribute_type(&vec!["a", "b"].into()).unwrap(),
            AttributeType::Strings
        );
        assert_eq!(
            infer_attribute_type(&vec![TypeDesc::Tensor(DataType::Float)].into()).unwrap(),
            AttributeType::TypeProtos
        );
    }

    #[test]
    fn infer_tensor_like_mixes_native_and_encoded() {
        let mixed = AttrInput::Seq(vec![
            Tensor::from_f32(vec![1.0]).into(),
            TensorProto::default().into(),
        ]);
        assert_eq!(infer_attribute_type(&mixed).unwrap(), AttributeType::Tensors);
    }

    #[test]
    fn infer_existing_attribute_uses_its_tag() {
        let attr = Attr::placeholder("value", AttributeType::Tensor);
        assert_eq!(infer_attribute_type(&attr.into()).unwrap(), AttributeType::Tensor);
    }

    #[test]
    fn infer_rejects_empty_and_mixed_sequences() {
        assert!(matches!(
            infer_attribute_type(&AttrInput::Seq(vec![])),
            Err(IrError::EmptySequence)
        ));
        let mixed = AttrInput::Seq(vec![1i64.into(), 1.5f64.into()]);
        assert!(matches!(
            infer_attribute_type(&mixed),
            Err(IrError::UnsupportedAttributeType {
                found: "mixed sequence"
            })
        ));
    }

    #[test]
    fn absent_value_needs_explicit_type() {
        let placeholder = convert_attribute("axis", None, Some(AttributeType::Int)).unwrap();
        assert_eq!(placeholder.ty(), AttributeType::Int);
        assert!(placeholder.value().is_none());

        assert!(matches!(
            convert_attribute("axis", None, None),
            Err(IrError::MissingAttributeType { .. })
        ));
    }

    #[test]
    fn existing_attribute_must_match_name_and_type() {
        let attr = Attr::int("axis", 1);
        let same = convert_attribute("axis", Some(attr.clone().into()), None).unwrap();
        assert_eq!(same, attr);

        assert!(matches!(
            convert_attribute("other", Some(attr.clone().into()), None),
            Err(IrError::AttributeNameMismatch { .. })
        ));
        assert!(matches!(
            convert_attribute("axis", Some(attr.into()), Some(AttributeType::Float)),
            Err(IrError::AttributeTypeMismatch { .. })
        ));
    }

    #[test]
    fn explicit_sequence_type_accepts_empty_sequence() {
        let attr = convert_attribute("axes", Some(AttrInput::Seq(vec![])), Some(AttributeType::Ints))
            .unwrap();
        assert_eq!(attr.as_ints(), Some(&[][..]));
    }

    #[test]
    fn float_values_are_narrowed() {
        let attr = convert_attribute("alpha", Some(0.1f64.into()), None).unwrap();
        assert_eq!(attr.value(), Some(&AttrValue::Float(0.1f32)));
    }

    #[test]
    fn encoded_tensor_is_decoded() {
        let proto = TensorProto {
            name: Some("proto".to_string()),
            data_type: DataType::Float.code(),
            dims: vec![3],
            float_data: vec![1.0, 2.0, 3.0],
            ..TensorProto::default()
        };
        let attr = convert_attribute("value", Some(proto.into()), None).unwrap();
        let tensor = attr.as_tensor().unwrap();
        assert_eq!(tensor.name(), Some("proto"));
        assert_eq!(tensor.as_f32(), Some(&[1.0f32, 2.0, 3.0][..]));
    }

    #[test]
    fn tag_value_disagreement_is_a_type_error() {
        let err = convert_attribute("axis", Some("oops".into()), Some(AttributeType::Int)).unwrap_err();
        assert!(matches!(
            err,
            IrError::UnsupportedAttributeValue {
                ty: AttributeType::Int,
                found: "string",
                ..
            }
        ));
        assert!(convert_attribute("axes", Some(vec![1.5f64].into()), Some(AttributeType::Ints)).is_err());
    }

    #[test]
    fn batch_skips_absent_entries_and_keeps_order() {
        let attrs = convert_attributes(vec![
            ("b", Some(AttrInput::from(1i64))),
            ("skip", None),
            ("a", Some(AttrInput::from("x"))),
        ])
        .unwrap();
        let names: Vec<&str> = attrs.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
