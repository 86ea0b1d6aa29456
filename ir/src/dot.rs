// dot.rs — Graphviz DOT output for IR graphs
//
// Transforms a Graph into DOT format suitable for rendering with `dot`,
// `neato`, or other Graphviz layout engines. Subgraphs held by GRAPH/GRAPHS
// attributes are drawn as nested clusters.
//
// Preconditions: none.
// Postconditions: returns a valid DOT string representing the graph.
// Failure modes: none (pure string formatting).
// Side effects: none.

use std::fmt::Write;

use crate::graph::Graph;
use crate::id::{NodeId, ValueId};

/// Emit the graph as a Graphviz DOT string.
pub fn emit_dot(graph: &Graph) -> String {
    let mut buf = String::new();
    writeln!(buf, "digraph {} {{", sanitize(graph.name().unwrap_or("graph"))).unwrap();
    writeln!(buf, "    rankdir=TB;").unwrap();
    writeln!(buf, "    node [fontname=\"Helvetica\", fontsize=10];").unwrap();
    writeln!(buf, "    edge [fontname=\"Helvetica\", fontsize=9];").unwrap();
    write_graph_contents(&mut buf, graph, "g", "    ");
    writeln!(buf, "}}").unwrap();
    buf
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Sanitize a name to valid DOT identifier characters.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Escape a label for use inside a double-quoted DOT string.
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dot_node_id(prefix: &str, node: NodeId) -> String {
    format!("{prefix}_n{}", node.0)
}

fn dot_value_id(prefix: &str, value: ValueId) -> String {
    format!("{prefix}_v{}", value.0)
}

fn node_label(graph: &Graph, node: NodeId) -> String {
    let n = graph.node(node);
    let op = if n.domain().is_empty() {
        n.op_type().to_string()
    } else {
        format!("{}::{}", n.domain(), n.op_type())
    };
    match n.name() {
        Some(name) if !name.is_empty() => format!("{op}\\n{}", escape(name)),
        _ => op,
    }
}

/// Write nodes, terminals and edges of one graph. `prefix` keeps ids unique
/// across nested clusters.
fn write_graph_contents(buf: &mut String, graph: &Graph, prefix: &str, indent: &str) {
    // Inputs and initializers
    for &id in graph.inputs() {
        let label = escape(&graph.value_label(id));
        let vid = dot_value_id(prefix, id);
        writeln!(
            buf,
            "{indent}{vid} [shape=ellipse, style=filled, fillcolor=lightgreen, label=\"{label}\"];"
        )
        .unwrap();
    }
    for &id in graph.initializers() {
        if graph.inputs().contains(&id) {
            continue;
        }
        let label = escape(&graph.value_label(id));
        let vid = dot_value_id(prefix, id);
        writeln!(
            buf,
            "{indent}{vid} [shape=cylinder, style=filled, fillcolor=lightsalmon, label=\"{label}\"];"
        )
        .unwrap();
    }

    // Nodes
    for &node in graph.nodes() {
        let id = dot_node_id(prefix, node);
        let label = node_label(graph, node);
        writeln!(
            buf,
            "{indent}{id} [shape=box, style=filled, fillcolor=lightblue, label=\"{label}\"];"
        )
        .unwrap();
    }

    // Outputs
    for (i, &id) in graph.outputs().iter().enumerate() {
        let label = escape(&graph.value_label(id));
        writeln!(
            buf,
            "{indent}{prefix}_out{i} [shape=ellipse, style=dashed, label=\"{label}\"];"
        )
        .unwrap();
    }

    // Edges — producer (node or terminal) to consumer, labelled by value.
    writeln!(buf).unwrap();
    let source_of = |value: ValueId| -> Option<String> {
        match graph.producer(value) {
            Some(node) if graph.contains_node(node) => Some(dot_node_id(prefix, node)),
            Some(_) => None,
            None if graph.inputs().contains(&value) || graph.initializers().contains(&value) => {
                Some(dot_value_id(prefix, value))
            }
            None => None,
        }
    };
    for &node in graph.nodes() {
        let tgt = dot_node_id(prefix, node);
        for (slot, input) in graph.node(node).inputs().iter().enumerate() {
            let Some(value) = input else { continue };
            let Some(src) = source_of(*value) else { continue };
            let label = escape(&graph.value_label(*value));
            writeln!(buf, "{indent}{src} -> {tgt} [label=\"{label}:{slot}\"];").unwrap();
        }
    }
    for (i, &id) in graph.outputs().iter().enumerate() {
        if let Some(src) = source_of(id) {
            writeln!(buf, "{indent}{src} -> {prefix}_out{i};").unwrap();
        }
    }

    // Subgraph clusters
    for &node in graph.nodes() {
        for attr in graph.node(node).attributes() {
            for (k, sub) in attr.subgraphs().iter().enumerate() {
                let sub_prefix = format!("{}_{}_{}", dot_node_id(prefix, node), sanitize(attr.name()), k);
                let inner = format!("{indent}    ");
                writeln!(buf).unwrap();
                writeln!(buf, "{indent}subgraph cluster_{sub_prefix} {{").unwrap();
                writeln!(
                    buf,
                    "{inner}label=\"{}: {}\";",
                    escape(attr.name()),
                    escape(sub.name().unwrap_or(""))
                )
                .unwrap();
                writeln!(buf, "{inner}style=dashed;").unwrap();
                writeln!(buf, "{inner}color=gray70;").unwrap();
                write_graph_contents(buf, sub, &sub_prefix, &inner);
                writeln!(buf, "{indent}}}").unwrap();
                writeln!(
                    buf,
                    "{indent}{} -> {sub_prefix}_anchor [style=dotted, arrowhead=none];",
                    dot_node_id(prefix, node)
                )
                .unwrap();
            }
        }
    }
    if prefix != "g" {
        writeln!(buf, "{indent}{prefix}_anchor [shape=point, width=0.01];").unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::Attr;
    use crate::graph::{NodeSpec, Value};
    use std::collections::HashSet;

    fn sample() -> Graph {
        let mut body = Graph::new("then");
        let t = body.add_input(Value::named("t"));
        let neg = body.append_node(NodeSpec::new("", "Neg").input(t)).unwrap();
        let out = body.node(neg).outputs()[0];
        body.push_output(out).unwrap();

        let mut g = Graph::new("main graph");
        let x = g.add_input(Value::named("x"));
        let w = g
            .add_initializer("w", crate::tensor::Tensor::from_f32(vec![1.0]))
            .unwrap();
        let add = g
            .append_node(NodeSpec::new("", "Add").name("add0").inputs([x, w]))
            .unwrap();
        let sum = g.node(add).outputs()[0];
        let iff = g
            .append_node(
                NodeSpec::new("", "If")
                    .input(sum)
                    .attr(Attr::graph("then_branch", body)),
            )
            .unwrap();
        let y = g.node(iff).outputs()[0];
        g.push_output(y).unwrap();
        g
    }

    #[test]
    fn valid_dot_structure() {
        let dot = emit_dot(&sample());
        assert!(dot.starts_with("digraph main_graph {"));
        assert!(dot.trim_end().ends_with('}'));
        assert!(dot.contains("label=\"Add\\nadd0\""));
        assert!(dot.contains("shape=cylinder"), "missing initializer shape");
    }

    #[test]
    fn subgraph_is_a_cluster() {
        let dot = emit_dot(&sample());
        assert!(dot.contains("subgraph cluster_g_n1_then_branch_0 {"), "dot:\n{dot}");
        assert!(dot.contains("label=\"then_branch: then\""));
        assert!(dot.contains("g_n1_then_branch_0_anchor [shape=point"));
    }

    #[test]
    fn unique_node_ids() {
        let dot = emit_dot(&sample());
        let ids: Vec<&str> = dot
            .lines()
            .filter_map(|line| {
                let trimmed = line.trim();
                if trimmed.contains("shape=") && !trimmed.contains("->") {
                    trimmed.split_whitespace().next()
                } else {
                    None
                }
            })
            .collect();
        let unique: HashSet<&&str> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len(), "duplicate node IDs found: {:?}", ids);
    }

    #[test]
    fn deterministic_output() {
        assert_eq!(emit_dot(&sample()), emit_dot(&sample()));
    }
}
