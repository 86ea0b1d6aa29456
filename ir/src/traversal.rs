// traversal.rs — Recursive node iteration
//
// Walks a graph's node order and descends into every subgraph held by a
// GRAPH or GRAPHS attribute, yielding each node together with the graph that
// owns it (node ids are only meaningful within their own arena).

use std::slice;

use crate::graph::Graph;
use crate::id::NodeId;

/// Depth-first, pre-order iterator over the nodes of a graph and its
/// subgraphs. A node is followed by the nodes of its subgraphs, in attribute
/// order, before the next node of its own graph.
pub struct RecursiveNodes<'g> {
    stack: Vec<(&'g Graph, slice::Iter<'g, NodeId>)>,
}

impl<'g> RecursiveNodes<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        RecursiveNodes {
            stack: vec![(graph, graph.nodes().iter())],
        }
    }
}

impl<'g> Iterator for RecursiveNodes<'g> {
    type Item = (&'g Graph, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (graph, iter) = self.stack.last_mut()?;
            let graph: &'g Graph = *graph;
            let Some(&id) = iter.next() else {
                self.stack.pop();
                continue;
            };
            // Reverse so the first subgraph is on top of the stack.
            for attr in graph.node(id).attributes().iter().rev() {
                for sub in attr.subgraphs().iter().rev() {
                    self.stack.push((sub, sub.nodes().iter()));
                }
            }
            return Some((graph, id));
        }
    }
}

pub fn recursive_nodes(graph: &Graph) -> RecursiveNodes<'_> {
    RecursiveNodes::new(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{Attr, AttrValue};
    use crate::graph::{NodeSpec, Value};

    fn leaf(name: &str, ops: &[&str]) -> Graph {
        let mut g = Graph::new(name);
        let x = g.add_input(Value::named("x"));
        for op in ops {
            g.append_node(NodeSpec::new("", *op).input(x)).unwrap();
        }
        g
    }

    #[test]
    fn visits_subgraph_nodes_right_after_owner() {
        let mut g = Graph::new("main");
        let c = g.add_input(Value::named("cond"));
        g.append_node(
            NodeSpec::new("", "If")
                .input(c)
                .attr(Attr::graph("then_branch", leaf("then", &["A", "B"])))
                .attr(Attr::graph("else_branch", leaf("else", &["C"]))),
        )
        .unwrap();
        g.append_node(NodeSpec::new("", "Z").input(c)).unwrap();

        let ops: Vec<(String, String)> = recursive_nodes(&g)
            .map(|(owner, id)| {
                (
                    owner.name().unwrap_or("").to_string(),
                    owner.node(id).op_type().to_string(),
                )
            })
            .collect();
        let expected = [
            ("main", "If"),
            ("then", "A"),
            ("then", "B"),
            ("else", "C"),
            ("main", "Z"),
        ];
        assert_eq!(ops.len(), expected.len());
        for ((owner, op), (want_owner, want_op)) in ops.iter().zip(expected) {
            assert_eq!((owner.as_str(), op.as_str()), (want_owner, want_op));
        }
    }

    #[test]
    fn descends_into_graphs_attribute() {
        let mut g = Graph::new("main");
        g.append_node(
            NodeSpec::new("custom", "Multi").attr(Attr::new(
                "bodies",
                AttrValue::Graphs(vec![leaf("g0", &["P"]), leaf("g1", &["Q"])]),
            )),
        )
        .unwrap();
        assert_eq!(recursive_nodes(&g).count(), 3);
    }

    #[test]
    fn empty_graph_yields_nothing() {
        assert_eq!(recursive_nodes(&Graph::new("empty")).count(), 0);
    }
}
