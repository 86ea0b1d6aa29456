// Integration tests for the JSON wire codec.
//
// One realistic graph (initializer bound to an input, a Constant node, an If
// whose branches read outer-scope values) is decoded and inspected, then
// pushed through encode/decode to check the fingerprint survives.

use onnxir::codec::{self, from_json, to_json, GraphProto};
use onnxir::fingerprint::fingerprint_hex;
use onnxir::traversal::recursive_nodes;
use onnxir::{create_value_mapping, get_const_tensor, DataType, Dim, Shape, TypeDesc};

const COND_GRAPH: &str = r#"
{
  "name": "cond_graph",
  "input": [
    {"name": "x", "type": {"tensor_type": {"elem_type": 1, "shape": ["N", 3]}}},
    {"name": "w", "type": {"tensor_type": {"elem_type": 1, "shape": [3]}}}
  ],
  "initializer": [
    {"name": "w", "data_type": 1, "dims": [3], "float_data": [0.5, 1.0, 1.5]},
    {"name": "axes", "data_type": 7, "dims": [1], "int64_data": [1]}
  ],
  "node": [
    {"name": "mul0", "op_type": "Mul", "input": ["x", "w"], "output": ["xw"]},
    {"name": "c0", "op_type": "Constant", "output": ["thresh"],
     "attribute": [{"name": "value_float", "type": 1, "f": 0.25}]},
    {"op_type": "Greater", "input": ["xw", "thresh"], "output": ["cond"]},
    {"op_type": "If", "input": ["cond"], "output": ["y"], "attribute": [
      {"name": "then_branch", "type": 5, "g": {
        "name": "then",
        "node": [{"op_type": "ReduceSum", "input": ["xw", "axes"], "output": ["then_out"]}],
        "output": [{"name": "then_out"}]
      }},
      {"name": "else_branch", "type": 5, "g": {
        "name": "else",
        "node": [{"op_type": "Identity", "input": ["xw"], "output": ["else_out"]}],
        "output": [{"name": "else_out"}]
      }}
    ]}
  ],
  "output": [{"name": "y", "type": {"tensor_type": {"elem_type": 1}}}],
  "value_info": [
    {"name": "xw", "type": {"tensor_type": {"elem_type": 1, "shape": ["N", 3]}}}
  ]
}
"#;

#[test]
fn decodes_inputs_initializers_and_nodes() {
    let graph = from_json(COND_GRAPH).unwrap();
    graph.verify().unwrap();

    assert_eq!(graph.name(), Some("cond_graph"));
    assert_eq!(graph.inputs().len(), 2);
    assert_eq!(graph.len(), 4);

    let x = graph.inputs()[0];
    assert_eq!(graph.value(x).ty(), Some(&TypeDesc::Tensor(DataType::Float)));
    assert_eq!(
        graph.value(x).shape(),
        Some(&Shape::new(vec![Dim::Symbolic("N".to_string()), Dim::Fixed(3)]))
    );

    // `w` is both an input and an initializer; `axes` is initializer only.
    let w = graph.inputs()[1];
    assert_eq!(graph.initializer("w"), Some(w));
    assert!(graph.value(w).const_value().is_some());
    let axes = graph.initializer("axes").unwrap();
    assert!(!graph.inputs().contains(&axes));
    assert_eq!(graph.initializers(), &[w, axes]);

    let y = graph.outputs()[0];
    assert_eq!(graph.value(y).ty(), Some(&TypeDesc::Tensor(DataType::Float)));
    let xw = graph.node(graph.nodes()[0]).outputs()[0];
    assert_eq!(graph.value(xw).shape().map(Shape::rank), Some(2));
}

#[test]
fn subgraph_outer_names_become_captures() {
    let graph = from_json(COND_GRAPH).unwrap();
    let if_node = graph.node(graph.nodes()[3]);
    let then_branch = &if_node.attribute("then_branch").unwrap().subgraphs()[0];
    then_branch.verify().unwrap();

    let reduce = then_branch.node(then_branch.nodes()[0]);
    for input in reduce.inputs() {
        let v = then_branch.value(input.unwrap());
        assert_eq!(v.producer(), None);
        assert!(!then_branch.inputs().contains(&input.unwrap()));
    }
    let names: Vec<&str> = reduce
        .inputs()
        .iter()
        .map(|v| then_branch.value(v.unwrap()).name().unwrap())
        .collect();
    assert_eq!(names, vec!["xw", "axes"]);
}

#[test]
fn traversal_and_mapping_cover_subgraphs() {
    let graph = from_json(COND_GRAPH).unwrap();
    let ops: Vec<String> = recursive_nodes(&graph)
        .map(|(g, n)| g.node(n).op_type().to_string())
        .collect();
    assert_eq!(
        ops,
        vec!["Mul", "Constant", "Greater", "If", "ReduceSum", "Identity"]
    );

    let mapping = create_value_mapping(&graph);
    assert_eq!(mapping["xw"].graph.name(), Some("cond_graph"));
    assert_eq!(mapping["then_out"].graph.name(), Some("then"));
    assert_eq!(mapping["else_out"].graph.name(), Some("else"));
    assert!(mapping.keys().all(|k| !k.is_empty()));
}

#[test]
fn constants_resolve_through_decoded_graph() {
    let mut graph = from_json(COND_GRAPH).unwrap();
    let thresh = graph.node(graph.nodes()[1]).outputs()[0];

    let t = get_const_tensor(&mut graph, thresh, true).unwrap().unwrap();
    assert_eq!(t.name(), Some("thresh"));
    assert_eq!(t.as_f32(), Some(&[0.25f32][..]));
    assert_eq!(graph.value(thresh).shape(), Some(&Shape::fixed(&[])));

    let w = graph.initializer("w").unwrap();
    let wt = get_const_tensor(&mut graph, w, false).unwrap().unwrap();
    assert_eq!(wt.dims(), &[3]);

    let x = graph.inputs()[0];
    assert!(get_const_tensor(&mut graph, x, false).unwrap().is_none());
}

#[test]
fn encode_then_decode_preserves_fingerprint() {
    let graph = from_json(COND_GRAPH).unwrap();
    let json = to_json(&graph).unwrap();
    let again = from_json(&json).unwrap();
    assert_eq!(fingerprint_hex(&graph), fingerprint_hex(&again));
    assert_eq!(again.to_string(), graph.to_string());
}

#[test]
fn undefined_top_level_name_fails() {
    let mut proto: GraphProto = serde_json::from_str(COND_GRAPH).unwrap();
    proto.input.remove(0);
    let err = codec::decode_graph(&proto).unwrap_err();
    assert!(err.to_string().contains("undefined value 'x'"), "{err}");
}

#[test]
fn malformed_json_is_a_json_error() {
    let err = from_json("{\"node\": [").unwrap_err();
    assert!(matches!(err, onnxir::IrError::Json(_)));
}
