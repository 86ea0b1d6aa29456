// codec.rs — JSON wire format for tensors and graphs
//
// The wire structs mirror the ONNX protobuf messages field for field, encoded
// as JSON via serde. Decoding builds native `Tensor`s and `Graph`s; encoding
// is the inverse.
//
// Preconditions: none.
// Postconditions: a decoded graph satisfies `Graph::verify`.
// Failure modes: unknown type codes, element-count mismatches, undefined or
//   redefined value names, missing required payloads (`IrError::Decode`);
//   malformed JSON (`IrError::Json`).
// Side effects: none.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::attr::{Attr, AttrPayload, AttrValue, AttributeType};
use crate::error::{IrError, Result};
use crate::graph::{Graph, NodeSpec, Value};
use crate::id::ValueId;
use crate::tensor::{Tensor, TensorData};
use crate::types::{DataType, Dim, Shape, TypeDesc};

// ── Wire structs ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub data_type: i32,
    pub dims: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub float_data: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub double_data: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub int32_data: Vec<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub int64_data: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub string_data: Vec<String>,
    /// Little-endian element bytes; takes precedence over the typed fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub raw_data: Vec<u8>,
}

/// One dimension: a size, a symbolic name, or `null` for unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimProto {
    Value(i64),
    Param(String),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TensorTypeProto {
    pub elem_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<DimProto>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tensor_type: Option<TensorTypeProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sparse_tensor_type: Option<TensorTypeProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_type: Option<Box<TypeProto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_type: Option<Box<TypeProto>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueInfoProto {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeProto {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_attr_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<TensorProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub g: Option<GraphProto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<TypeProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub floats: Vec<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ints: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tensors: Vec<TensorProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub graphs: Vec<GraphProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_protos: Vec<TypeProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub op_type: String,
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub overload: String,
    /// Input names; `""` marks an empty optional slot.
    pub input: Vec<String>,
    pub output: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute: Vec<AttributeProto>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphProto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub input: Vec<ValueInfoProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub initializer: Vec<TensorProto>,
    pub node: Vec<NodeProto>,
    pub output: Vec<ValueInfoProto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_info: Vec<ValueInfoProto>,
}

// ── Tensor decoding ────────────────────────────────────────────────────────

/// Decode a wire tensor. `raw_data`, when present, wins over the typed fields.
pub fn decode_tensor(proto: &TensorProto) -> Result<Tensor> {
    let dtype = DataType::from_code(proto.data_type)
        .ok_or_else(|| IrError::decode(format!("unknown tensor data type {}", proto.data_type)))?;
    let raw = &proto.raw_data;
    let data = match dtype {
        DataType::Float if !raw.is_empty() => {
            TensorData::Float(raw_elems(raw, f32::from_le_bytes)?)
        }
        DataType::Float => TensorData::Float(proto.float_data.clone()),
        DataType::Double if !raw.is_empty() => {
            TensorData::Double(raw_elems(raw, f64::from_le_bytes)?)
        }
        DataType::Double => TensorData::Double(proto.double_data.clone()),
        DataType::Int32 if !raw.is_empty() => {
            TensorData::Int32(raw_elems(raw, i32::from_le_bytes)?)
        }
        DataType::Int32 => TensorData::Int32(proto.int32_data.clone()),
        DataType::Int64 if !raw.is_empty() => {
            TensorData::Int64(raw_elems(raw, i64::from_le_bytes)?)
        }
        DataType::Int64 => TensorData::Int64(proto.int64_data.clone()),
        DataType::Uint8 if !raw.is_empty() => TensorData::Uint8(raw.clone()),
        DataType::Uint8 => TensorData::Uint8(
            proto
                .int32_data
                .iter()
                .map(|&v| {
                    u8::try_from(v).map_err(|_| IrError::decode(format!("{v} is not a UINT8")))
                })
                .collect::<Result<_>>()?,
        ),
        DataType::Bool if !raw.is_empty() => TensorData::Bool(raw.iter().map(|&b| b != 0).collect()),
        DataType::Bool => TensorData::Bool(proto.int32_data.iter().map(|&v| v != 0).collect()),
        DataType::String => TensorData::String(
            proto.string_data.iter().map(|s| s.as_bytes().to_vec()).collect(),
        ),
        other => {
            return Err(IrError::decode(format!(
                "tensor data type {other} is not supported"
            )))
        }
    };
    let tensor = Tensor::new(proto.dims.clone(), data)?;
    Ok(match &proto.name {
        Some(name) => tensor.with_name(name.clone()),
        None => tensor,
    })
}

fn raw_elems<T, const N: usize>(raw: &[u8], from_le: fn([u8; N]) -> T) -> Result<Vec<T>> {
    if raw.len() % N != 0 {
        return Err(IrError::decode(format!(
            "raw_data length {} is not a multiple of the element size {N}",
            raw.len()
        )));
    }
    Ok(raw
        .chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(chunk);
            from_le(bytes)
        })
        .collect())
}

pub fn encode_tensor(tensor: &Tensor) -> TensorProto {
    let mut proto = TensorProto {
        name: tensor.name().map(str::to_string),
        data_type: tensor.dtype().code(),
        dims: tensor.dims().to_vec(),
        ..TensorProto::default()
    };
    match tensor.data() {
        TensorData::Float(v) => proto.float_data = v.clone(),
        TensorData::Double(v) => proto.double_data = v.clone(),
        TensorData::Int32(v) => proto.int32_data = v.clone(),
        TensorData::Int64(v) => proto.int64_data = v.clone(),
        TensorData::Uint8(v) => proto.int32_data = v.iter().map(|&b| b as i32).collect(),
        TensorData::Bool(v) => proto.int32_data = v.iter().map(|&b| b as i32).collect(),
        // Non-UTF-8 bytes are replaced; the wire format is JSON text.
        TensorData::String(v) => {
            proto.string_data = v
                .iter()
                .map(|s| String::from_utf8_lossy(s).into_owned())
                .collect()
        }
    }
    proto
}

// ── Type decoding ──────────────────────────────────────────────────────────

/// Decode a wire type. An `elem_type` of 0 (undefined) leaves the type
/// unknown but keeps the shape.
fn decode_type(proto: &TypeProto) -> Result<(Option<TypeDesc>, Option<Shape>)> {
    if let Some(tt) = &proto.tensor_type {
        let shape = tt.shape.as_deref().map(decode_shape);
        if tt.elem_type == 0 {
            return Ok((None, shape));
        }
        return Ok((Some(TypeDesc::Tensor(decode_elem_type(tt.elem_type)?)), shape));
    }
    if let Some(tt) = &proto.sparse_tensor_type {
        let shape = tt.shape.as_deref().map(decode_shape);
        return Ok((
            Some(TypeDesc::SparseTensor(decode_elem_type(tt.elem_type)?)),
            shape,
        ));
    }
    if let Some(inner) = &proto.sequence_type {
        return Ok((Some(TypeDesc::sequence(decode_type_desc(inner)?)), None));
    }
    if let Some(inner) = &proto.optional_type {
        return Ok((Some(TypeDesc::optional(decode_type_desc(inner)?)), None));
    }
    Err(IrError::decode("type has no tensor, sequence or optional member"))
}

fn decode_type_desc(proto: &TypeProto) -> Result<TypeDesc> {
    decode_type(proto)?
        .0
        .ok_or_else(|| IrError::decode("element type is undefined"))
}

fn decode_elem_type(code: i32) -> Result<DataType> {
    DataType::from_code(code).ok_or_else(|| IrError::decode(format!("unknown element type {code}")))
}

fn decode_shape(dims: &[DimProto]) -> Shape {
    Shape::new(
        dims.iter()
            .map(|d| match d {
                DimProto::Value(n) => Dim::Fixed(*n),
                DimProto::Param(p) => Dim::Symbolic(p.clone()),
                DimProto::Unknown => Dim::Unknown,
            })
            .collect(),
    )
}

fn encode_shape(shape: &Shape) -> Vec<DimProto> {
    shape
        .dims
        .iter()
        .map(|d| match d {
            Dim::Fixed(n) => DimProto::Value(*n),
            Dim::Symbolic(p) => DimProto::Param(p.clone()),
            Dim::Unknown => DimProto::Unknown,
        })
        .collect()
}

fn encode_type(ty: Option<&TypeDesc>, shape: Option<&Shape>) -> Option<TypeProto> {
    let shape = shape.map(encode_shape);
    match ty {
        None => shape.map(|shape| TypeProto {
            tensor_type: Some(TensorTypeProto {
                elem_type: 0,
                shape: Some(shape),
            }),
            ..TypeProto::default()
        }),
        Some(TypeDesc::Tensor(dt)) => Some(TypeProto {
            tensor_type: Some(TensorTypeProto {
                elem_type: dt.code(),
                shape,
            }),
            ..TypeProto::default()
        }),
        Some(TypeDesc::SparseTensor(dt)) => Some(TypeProto {
            sparse_tensor_type: Some(TensorTypeProto {
                elem_type: dt.code(),
                shape,
            }),
            ..TypeProto::default()
        }),
        Some(desc) => Some(encode_type_desc(desc)),
    }
}

fn encode_type_desc(desc: &TypeDesc) -> TypeProto {
    match desc {
        TypeDesc::Sequence(inner) => TypeProto {
            sequence_type: Some(Box::new(encode_type_desc(inner))),
            ..TypeProto::default()
        },
        TypeDesc::Optional(inner) => TypeProto {
            optional_type: Some(Box::new(encode_type_desc(inner))),
            ..TypeProto::default()
        },
        tensor => encode_type(Some(tensor), None).unwrap_or_default(),
    }
}

// ── Graph decoding ─────────────────────────────────────────────────────────

/// Decode a top-level graph. Every name a node or output refers to must be
/// defined by an input, an initializer or an earlier node.
pub fn decode_graph(proto: &GraphProto) -> Result<Graph> {
    GraphDecoder::new(false).decode(proto)
}

/// Decode a graph that will be held by an attribute. Names not defined in the
/// graph refer to the enclosing scope and become detached, named capture values.
pub fn decode_subgraph(proto: &GraphProto) -> Result<Graph> {
    GraphDecoder::new(true).decode(proto)
}

struct GraphDecoder {
    nested: bool,
    graph: Graph,
    scope: HashMap<String, ValueId>,
}

impl GraphDecoder {
    fn new(nested: bool) -> Self {
        GraphDecoder {
            nested,
            graph: Graph::default(),
            scope: HashMap::new(),
        }
    }

    fn decode(mut self, proto: &GraphProto) -> Result<Graph> {
        self.graph.set_name(proto.name.clone());

        for info in &proto.input {
            let value = annotated(Value::named(info.name.clone()), info)?;
            let id = self.graph.add_input(value);
            self.define(&info.name, id)?;
        }

        for init in &proto.initializer {
            let name = match init.name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(IrError::decode("initializer has no name")),
            };
            let tensor = decode_tensor(init)?;
            match self.scope.get(&name) {
                Some(&input) => {
                    self.graph.value_mut(input).set_const_value(Some(tensor));
                    self.graph.register_initializer(input)?;
                }
                None => {
                    let id = self.graph.add_initializer(name.clone(), tensor)?;
                    self.define(&name, id)?;
                }
            }
        }

        for node in &proto.node {
            self.decode_node(node)?;
        }

        for info in &proto.value_info {
            if let Some(&id) = self.scope.get(&info.name) {
                if let Some(ty) = &info.ty {
                    let (ty, shape) = decode_type(ty)?;
                    let value = self.graph.value_mut(id);
                    value.set_type(ty);
                    value.set_shape(shape);
                }
            }
        }

        for info in &proto.output {
            let id = self.lookup(&info.name, "graph output")?;
            if let Some(ty) = &info.ty {
                let (ty, shape) = decode_type(ty)?;
                let value = self.graph.value_mut(id);
                if value.ty().is_none() {
                    value.set_type(ty);
                }
                if value.shape().is_none() {
                    value.set_shape(shape);
                }
            }
            self.graph.push_output(id)?;
        }

        Ok(self.graph)
    }

    fn decode_node(&mut self, proto: &NodeProto) -> Result<()> {
        let label = proto.name.as_deref().unwrap_or(&proto.op_type).to_string();
        let mut spec = NodeSpec::new(proto.domain.clone(), proto.op_type.clone())
            .overload(proto.overload.clone())
            .outputs(proto.output.len());
        if let Some(name) = &proto.name {
            spec = spec.name(name.clone());
        }
        for input in &proto.input {
            if input.is_empty() {
                spec = spec.optional_input(None);
            } else {
                let id = self.lookup(input, &format!("node '{label}'"))?;
                spec = spec.input(id);
            }
        }
        for attr in &proto.attribute {
            spec = spec.attr(decode_attribute(attr)?);
        }

        let node = self.graph.append_node(spec)?;
        let outputs = self.graph.node(node).outputs().to_vec();
        for (id, name) in outputs.into_iter().zip(&proto.output) {
            if name.is_empty() {
                continue;
            }
            self.graph.value_mut(id).set_name(Some(name.clone()));
            self.define(name, id)?;
        }
        Ok(())
    }

    fn define(&mut self, name: &str, id: ValueId) -> Result<()> {
        if self.scope.insert(name.to_string(), id).is_some() {
            return Err(IrError::decode(format!("value '{name}' is defined twice")));
        }
        Ok(())
    }

    fn lookup(&mut self, name: &str, reader: &str) -> Result<ValueId> {
        if let Some(&id) = self.scope.get(name) {
            return Ok(id);
        }
        if !self.nested {
            return Err(IrError::decode(format!(
                "{reader} reads undefined value '{name}'"
            )));
        }
        let id = self.graph.add_value(Value::named(name));
        self.scope.insert(name.to_string(), id);
        Ok(id)
    }
}

fn annotated(mut value: Value, info: &ValueInfoProto) -> Result<Value> {
    if let Some(ty) = &info.ty {
        let (ty, shape) = decode_type(ty)?;
        value.set_type(ty);
        value.set_shape(shape);
    }
    Ok(value)
}

/// Decode a wire attribute. Scalar fields missing from the wire take their
/// protobuf defaults; a missing tensor or graph payload is an error.
pub fn decode_attribute(proto: &AttributeProto) -> Result<Attr> {
    let ty = AttributeType::from_code(proto.ty).ok_or_else(|| {
        IrError::decode(format!(
            "attribute '{}' has unknown type code {}",
            proto.name, proto.ty
        ))
    })?;
    if let Some(reference) = &proto.ref_attr_name {
        return Ok(Attr::reference(proto.name.clone(), reference.clone(), ty));
    }
    let missing = |what: &str| {
        IrError::decode(format!(
            "attribute '{}' of type {ty} has no {what}",
            proto.name
        ))
    };
    let value = match ty {
        AttributeType::Float => AttrValue::Float(proto.f.unwrap_or_default()),
        AttributeType::Int => AttrValue::Int(proto.i.unwrap_or_default()),
        AttributeType::String => AttrValue::String(proto.s.clone().unwrap_or_default()),
        AttributeType::Floats => AttrValue::Floats(proto.floats.clone()),
        AttributeType::Ints => AttrValue::Ints(proto.ints.clone()),
        AttributeType::Strings => AttrValue::Strings(proto.strings.clone()),
        AttributeType::Tensor => {
            AttrValue::Tensor(decode_tensor(proto.t.as_ref().ok_or_else(|| missing("tensor"))?)?)
        }
        AttributeType::Tensors => AttrValue::Tensors(
            proto.tensors.iter().map(decode_tensor).collect::<Result<_>>()?,
        ),
        AttributeType::Graph => {
            AttrValue::Graph(decode_subgraph(proto.g.as_ref().ok_or_else(|| missing("graph"))?)?)
        }
        AttributeType::Graphs => AttrValue::Graphs(
            proto.graphs.iter().map(decode_subgraph).collect::<Result<_>>()?,
        ),
        AttributeType::TypeProto => {
            AttrValue::TypeProto(decode_type_desc(proto.tp.as_ref().ok_or_else(|| missing("type"))?)?)
        }
        AttributeType::TypeProtos => AttrValue::TypeProtos(
            proto.type_protos.iter().map(decode_type_desc).collect::<Result<_>>()?,
        ),
    };
    Ok(Attr::new(proto.name.clone(), value))
}

// ── Graph encoding ─────────────────────────────────────────────────────────

/// Encode a graph. Unnamed values get generated names, and a value whose name
/// is already taken by an earlier value is renamed, so the result decodes back
/// to the same structure. Detached nodes are not encoded.
pub fn encode_graph(graph: &Graph) -> GraphProto {
    let names = NameTable::build(graph);

    let info = |id: ValueId| {
        let value = graph.value(id);
        ValueInfoProto {
            name: names.get(id),
            ty: encode_type(value.ty(), value.shape()),
        }
    };

    let mut proto = GraphProto {
        name: graph.name().map(str::to_string),
        input: graph.inputs().iter().map(|&id| info(id)).collect(),
        ..GraphProto::default()
    };

    for &id in graph.initializers() {
        if let Some(tensor) = graph.value(id).const_value() {
            let mut tensor = encode_tensor(tensor);
            tensor.name = Some(names.get(id));
            proto.initializer.push(tensor);
        }
    }

    for &node_id in graph.nodes() {
        let node = graph.node(node_id);
        proto.node.push(NodeProto {
            name: node.name().map(str::to_string),
            op_type: node.op_type().to_string(),
            domain: node.domain().to_string(),
            overload: node.overload().to_string(),
            input: node
                .inputs()
                .iter()
                .map(|v| v.map(|id| names.get(id)).unwrap_or_default())
                .collect(),
            output: node.outputs().iter().map(|&id| names.get(id)).collect(),
            attribute: node.attributes().iter().map(encode_attribute).collect(),
        });
        for &out in node.outputs() {
            let value = graph.value(out);
            if value.ty().is_some() || value.shape().is_some() {
                proto.value_info.push(info(out));
            }
        }
    }

    proto.output = graph.outputs().iter().map(|&id| info(id)).collect();
    proto
}

pub fn encode_attribute(attr: &Attr) -> AttributeProto {
    let mut proto = AttributeProto {
        name: attr.name().to_string(),
        ty: attr.ty().code(),
        ..AttributeProto::default()
    };
    match attr.payload() {
        AttrPayload::Ref(reference) => proto.ref_attr_name = Some(reference.clone()),
        AttrPayload::Empty => {}
        AttrPayload::Value(value) => match value {
            AttrValue::Int(v) => proto.i = Some(*v),
            AttrValue::Float(v) => proto.f = Some(*v),
            AttrValue::String(v) => proto.s = Some(v.clone()),
            AttrValue::Ints(v) => proto.ints = v.clone(),
            AttrValue::Floats(v) => proto.floats = v.clone(),
            AttrValue::Strings(v) => proto.strings = v.clone(),
            AttrValue::Tensor(t) => proto.t = Some(encode_tensor(t)),
            AttrValue::Tensors(ts) => proto.tensors = ts.iter().map(encode_tensor).collect(),
            AttrValue::Graph(g) => proto.g = Some(encode_graph(g)),
            AttrValue::Graphs(gs) => proto.graphs = gs.iter().map(encode_graph).collect(),
            AttrValue::TypeProto(t) => proto.tp = Some(encode_type_desc(t)),
            AttrValue::TypeProtos(ts) => proto.type_protos = ts.iter().map(encode_type_desc).collect(),
        },
    }
    proto
}

/// Unique wire names, claimed in definition order: inputs, initializers,
/// node outputs, then anything else the nodes read.
struct NameTable {
    names: HashMap<ValueId, String>,
}

impl NameTable {
    fn build(graph: &Graph) -> Self {
        let mut table = NameTable {
            names: HashMap::new(),
        };
        let mut taken = HashSet::new();
        let order = graph
            .inputs()
            .iter()
            .chain(graph.initializers())
            .copied()
            .chain(graph.nodes().iter().flat_map(|&n| {
                let node = graph.node(n);
                node.outputs()
                    .iter()
                    .copied()
                    .chain(node.inputs().iter().flatten().copied())
                    .collect::<Vec<_>>()
            }))
            .chain(graph.outputs().iter().copied());
        for id in order {
            if table.names.contains_key(&id) {
                continue;
            }
            let name = match graph.value(id).name() {
                Some(name) if !name.is_empty() && !taken.contains(name) => name.to_string(),
                Some(name) if !name.is_empty() => format!("{name}__{id}"),
                _ => format!("_{id}"),
            };
            taken.insert(name.clone());
            table.names.insert(id, name);
        }
        table
    }

    fn get(&self, id: ValueId) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| format!("_{id}"))
    }
}

// ── JSON helpers ───────────────────────────────────────────────────────────

pub fn from_json(text: &str) -> Result<Graph> {
    let proto: GraphProto = serde_json::from_str(text)?;
    decode_graph(&proto)
}

pub fn to_json(graph: &Graph) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode_graph(graph))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_float_tensor_from_typed_field() {
        let proto = TensorProto {
            name: Some("w".to_string()),
            data_type: 1,
            dims: vec![3],
            float_data: vec![1.0, 2.0, 3.0],
            ..TensorProto::default()
        };
        let t = decode_tensor(&proto).unwrap();
        assert_eq!(t.name(), Some("w"));
        assert_eq!(t.as_f32(), Some(&[1.0f32, 2.0, 3.0][..]));
    }

    #[test]
    fn decode_int64_tensor_from_raw_data() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&5i64.to_le_bytes());
        raw.extend_from_slice(&(-2i64).to_le_bytes());
        let proto = TensorProto {
            data_type: 7,
            dims: vec![2],
            raw_data: raw,
            ..TensorProto::default()
        };
        assert_eq!(decode_tensor(&proto).unwrap().as_i64(), Some(&[5i64, -2][..]));
    }

    #[test]
    fn decode_tensor_rejects_bad_raw_length_and_count() {
        let odd = TensorProto {
            data_type: 1,
            dims: vec![1],
            raw_data: vec![0, 0, 0],
            ..TensorProto::default()
        };
        assert!(decode_tensor(&odd).is_err());

        let short = TensorProto {
            data_type: 7,
            dims: vec![2, 2],
            int64_data: vec![1, 2, 3],
            ..TensorProto::default()
        };
        assert!(decode_tensor(&short).is_err());
    }

    #[test]
    fn decode_tensor_rejects_overflowing_dims() {
        let proto = TensorProto {
            data_type: 1,
            dims: vec![i64::MAX, 2],
            ..TensorProto::default()
        };
        let err = decode_tensor(&proto).unwrap_err();
        assert!(matches!(err, IrError::Decode { .. }));
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn decode_tensor_rejects_unsupported_type() {
        let proto = TensorProto {
            data_type: 10,
            dims: vec![],
            ..TensorProto::default()
        };
        let err = decode_tensor(&proto).unwrap_err();
        assert!(err.to_string().contains("FLOAT16"));
    }

    #[test]
    fn dim_proto_accepts_int_string_and_null() {
        let dims: Vec<DimProto> = serde_json::from_str(r#"[2, "N", null]"#).unwrap();
        assert_eq!(
            dims,
            vec![
                DimProto::Value(2),
                DimProto::Param("N".to_string()),
                DimProto::Unknown
            ]
        );
    }

    #[test]
    fn top_level_undefined_name_is_an_error() {
        let proto = GraphProto {
            node: vec![NodeProto {
                op_type: "Relu".to_string(),
                input: vec!["missing".to_string()],
                output: vec!["y".to_string()],
                ..NodeProto::default()
            }],
            ..GraphProto::default()
        };
        let err = decode_graph(&proto).unwrap_err();
        assert!(err.to_string().contains("undefined value 'missing'"));

        let sub = decode_subgraph(&proto).unwrap();
        let relu = sub.nodes()[0];
        let captured = sub.node(relu).inputs()[0].unwrap();
        assert_eq!(sub.value(captured).name(), Some("missing"));
        assert_eq!(sub.value(captured).producer(), None);
    }

    #[test]
    fn redefined_value_is_an_error() {
        let proto = GraphProto {
            input: vec![ValueInfoProto {
                name: "x".to_string(),
                ty: None,
            }],
            node: vec![NodeProto {
                op_type: "Relu".to_string(),
                input: vec!["x".to_string()],
                output: vec!["x".to_string()],
                ..NodeProto::default()
            }],
            ..GraphProto::default()
        };
        assert!(decode_graph(&proto).is_err());
    }

    #[test]
    fn reference_attribute_keeps_type() {
        let proto = AttributeProto {
            name: "alpha".to_string(),
            ty: 1,
            ref_attr_name: Some("a".to_string()),
            ..AttributeProto::default()
        };
        let attr = decode_attribute(&proto).unwrap();
        assert_eq!(attr.ty(), AttributeType::Float);
        assert_eq!(attr.ref_attr_name(), Some("a"));
        assert_eq!(encode_attribute(&attr), proto);
    }

    #[test]
    fn encode_renames_duplicate_and_unnamed_values() {
        let mut g = Graph::new("g");
        g.add_input(Value::named("x"));
        let b = g.add_input(Value::named("x"));
        let c = g.add_input(Value::new());
        let proto = encode_graph(&g);
        let names: Vec<String> = proto.input.iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["x".to_string(), format!("x__{b}"), format!("_{c}")]);
    }
}
