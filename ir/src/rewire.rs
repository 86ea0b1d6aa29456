// rewire.rs — Redirecting uses and splicing nodes
//
// The graph-editing protocol a rewrite pass drives once it has built its
// replacement nodes: move every consumer of an old value onto a new one,
// look values up by name, and splice a replacement subgraph in place of an
// old one.
//
// Preconditions: ids passed in belong to the graph being edited.
// Postconditions: the use-list invariant holds after every operation; after a
//   splice no node in the node order references a replaced value.
// Failure modes: length mismatches, unknown ids, unsafe removal. Every check
//   runs before the first mutation, so a failed call changes nothing.
// Side effects: debug/trace logging through `log`.

use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, trace};

use crate::error::{IrError, Result};
use crate::graph::{Graph, Usage, Value};
use crate::id::{NodeId, ValueId};
use crate::traversal::RecursiveNodes;

// ── Value sequences ────────────────────────────────────────────────────────

/// One value or an ordered sequence of values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSeq(Vec<ValueId>);

impl ValueSeq {
    pub fn as_slice(&self) -> &[ValueId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<ValueId> for ValueSeq {
    fn from(id: ValueId) -> Self {
        ValueSeq(vec![id])
    }
}

impl From<Vec<ValueId>> for ValueSeq {
    fn from(ids: Vec<ValueId>) -> Self {
        ValueSeq(ids)
    }
}

impl From<&[ValueId]> for ValueSeq {
    fn from(ids: &[ValueId]) -> Self {
        ValueSeq(ids.to_vec())
    }
}

impl From<&Vec<ValueId>> for ValueSeq {
    fn from(ids: &Vec<ValueId>) -> Self {
        ValueSeq(ids.clone())
    }
}

impl<const N: usize> From<[ValueId; N]> for ValueSeq {
    fn from(ids: [ValueId; N]) -> Self {
        ValueSeq(ids.to_vec())
    }
}

// ── Use redirection ────────────────────────────────────────────────────────

/// Copy of `value`'s use list, taken before any input is repointed so the
/// walk is not disturbed by the edits it makes.
pub fn snapshot_uses(graph: &Graph, value: ValueId) -> Result<Vec<Usage>> {
    graph
        .try_value(value)
        .map(|v| v.uses().to_vec())
        .ok_or(IrError::UnknownValue(value))
}

/// Repoint every consumer of `values[i]` at `replacements[i]`, slot for slot.
///
/// Afterwards each replaced value has no uses. Graph outputs and producers are
/// not touched; pairs where a value replaces itself are skipped.
pub fn replace_all_uses_with(
    graph: &mut Graph,
    values: impl Into<ValueSeq>,
    replacements: impl Into<ValueSeq>,
) -> Result<()> {
    let values = values.into();
    let replacements = replacements.into();
    check_pairs(graph, values.as_slice(), replacements.as_slice())?;
    redirect(graph, values.as_slice(), replacements.as_slice())
}

fn check_pairs(graph: &Graph, values: &[ValueId], replacements: &[ValueId]) -> Result<()> {
    if values.len() != replacements.len() {
        return Err(IrError::LengthMismatch {
            what: "values and replacements",
            left: values.len(),
            right: replacements.len(),
        });
    }
    for &id in values.iter().chain(replacements) {
        if !graph.contains_value(id) {
            return Err(IrError::UnknownValue(id));
        }
    }
    Ok(())
}

fn redirect(graph: &mut Graph, values: &[ValueId], replacements: &[ValueId]) -> Result<()> {
    let mut moved = 0usize;
    for (&value, &replacement) in values.iter().zip(replacements) {
        if value == replacement {
            continue;
        }
        for usage in snapshot_uses(graph, value)? {
            trace!(
                "{}: slot {} of {} now reads {}",
                value,
                usage.slot,
                usage.node,
                replacement
            );
            graph.set_input(usage.node, usage.slot, Some(replacement))?;
            moved += 1;
        }
    }
    debug!(
        "redirected {} use(s) across {} value pair(s)",
        moved,
        values.len()
    );
    Ok(())
}

// ── Name lookup ────────────────────────────────────────────────────────────

/// A value addressed through the graph that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ValueRef<'g> {
    pub graph: &'g Graph,
    pub id: ValueId,
}

impl<'g> ValueRef<'g> {
    /// The referenced value. Refs built by `create_value_mapping` always
    /// resolve; a hand-built ref whose `id` is not a value of `graph` panics.
    pub fn value(&self) -> &'g Value {
        self.graph.value(self.id)
    }

    /// `true` if both refer to the same value in the same graph.
    pub fn same_as(&self, other: &ValueRef<'_>) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

/// Map every value name in `graph` and its subgraphs to the first value that
/// carries it.
///
/// Names are claimed by initializers, then graph inputs, then the inputs and
/// outputs of each node in recursive traversal order. Unnamed and empty-named
/// values are left out. The map is a snapshot and does not track later edits.
pub fn create_value_mapping(graph: &Graph) -> BTreeMap<String, ValueRef<'_>> {
    let mut mapping = BTreeMap::new();
    for &id in graph.initializers().iter().chain(graph.inputs()) {
        claim_name(&mut mapping, graph, id);
    }
    for (owner, node_id) in RecursiveNodes::new(graph) {
        let node = owner.node(node_id);
        for &id in node.inputs().iter().flatten().chain(node.outputs()) {
            claim_name(&mut mapping, owner, id);
        }
    }
    mapping
}

fn claim_name<'g>(mapping: &mut BTreeMap<String, ValueRef<'g>>, graph: &'g Graph, id: ValueId) {
    let Some(name) = graph.value(id).name() else {
        return;
    };
    if name.is_empty() || mapping.contains_key(name) {
        return;
    }
    mapping.insert(name.to_string(), ValueRef { graph, id });
}

// ── Splicing ───────────────────────────────────────────────────────────────

/// Replace `old_nodes` with `new_nodes` and `old_values` with `new_values`
/// in a graph or a function body.
///
/// `new_nodes` must be allocated in the container and detached; they are
/// inserted right after `insertion_point`, in order. Each new value first
/// takes over the name, type, shape and constant of the old value it
/// replaces, then inherits its consumers and its place in the output list.
/// Finally the old nodes are removed, which requires that every old output
/// was either replaced or was only used by other old nodes.
pub fn replace_nodes_and_values<C>(
    container: &mut C,
    insertion_point: NodeId,
    old_nodes: &[NodeId],
    new_nodes: &[NodeId],
    old_values: &[ValueId],
    new_values: &[ValueId],
) -> Result<()>
where
    C: AsMut<Graph> + ?Sized,
{
    let graph = container.as_mut();

    check_pairs(graph, old_values, new_values)?;
    if !graph.contains_node(insertion_point) {
        return Err(IrError::NodeNotInGraph(insertion_point));
    }
    graph.check_detached(new_nodes)?;
    for &node in old_nodes {
        if !graph.contains_node(node) {
            return Err(IrError::NodeNotInGraph(node));
        }
    }
    let replaced: HashSet<ValueId> = old_values
        .iter()
        .zip(new_values)
        .filter(|(old, new)| old != new)
        .map(|(&old, _)| old)
        .collect();
    graph.check_removal(old_nodes, &replaced)?;
    let mapping = output_mapping(old_values, new_values);
    check_inherited_uses(graph, old_nodes, old_values, new_values, &mapping)?;

    for (&old, &new) in old_values.iter().zip(new_values) {
        copy_metadata(graph, old, new);
    }

    redirect(graph, old_values, new_values)?;

    let outputs = graph.outputs().to_vec();
    for (index, output) in outputs.into_iter().enumerate() {
        if let Some(&new) = mapping.get(&output) {
            graph.set_output(index, new)?;
        }
    }

    graph.insert_after(insertion_point, new_nodes)?;
    graph.remove(old_nodes, true)?;

    debug!(
        "spliced {} node(s) in place of {} after {} ({} value(s) replaced)",
        new_nodes.len(),
        old_nodes.len(),
        insertion_point,
        replaced.len()
    );
    Ok(())
}

/// Old-to-new value map for the output list. A value listed twice maps to
/// its last replacement.
fn output_mapping(old_values: &[ValueId], new_values: &[ValueId]) -> HashMap<ValueId, ValueId> {
    old_values
        .iter()
        .copied()
        .zip(new_values.iter().copied())
        .collect()
}

/// Replay the redirect and the output remap on use counts, and fail if an
/// output of a node being removed would still be read or listed afterwards.
///
/// `check_removal` sees the graph as it is now; this catches outputs that
/// only become live through the splice itself, such as a new value produced
/// by an old node, or a replaced value that a later pair redirects into.
fn check_inherited_uses(
    graph: &Graph,
    old_nodes: &[NodeId],
    old_values: &[ValueId],
    new_values: &[ValueId],
    mapping: &HashMap<ValueId, ValueId>,
) -> Result<()> {
    let doomed: HashSet<NodeId> = old_nodes.iter().copied().collect();
    let live_uses = |id: ValueId| {
        graph
            .value(id)
            .uses()
            .iter()
            .filter(|u| !doomed.contains(&u.node))
            .count()
    };

    let mut counts: HashMap<ValueId, usize> = HashMap::new();
    for (&old, &new) in old_values.iter().zip(new_values) {
        if old == new {
            continue;
        }
        let moved = counts.insert(old, 0).unwrap_or_else(|| live_uses(old));
        *counts.entry(new).or_insert_with(|| live_uses(new)) += moved;
    }
    let outputs: HashSet<ValueId> = graph
        .outputs()
        .iter()
        .map(|o| mapping.get(o).copied().unwrap_or(*o))
        .collect();

    for &node in old_nodes {
        for &output in graph.node(node).outputs() {
            if outputs.contains(&output) {
                return Err(IrError::UnsafeRemoval {
                    node,
                    value: output,
                    reason: "would become a graph output",
                });
            }
            let live = counts
                .get(&output)
                .copied()
                .unwrap_or_else(|| live_uses(output));
            if live > 0 {
                return Err(IrError::UnsafeRemoval {
                    node,
                    value: output,
                    reason: "would still be read by a node that is not being removed",
                });
            }
        }
    }
    Ok(())
}

/// Overwrite `new`'s name, type, shape and constant with `old`'s.
fn copy_metadata(graph: &mut Graph, old: ValueId, new: ValueId) {
    if old == new {
        return;
    }
    let source = graph.value(old);
    let name = source.name().map(str::to_string);
    let ty = source.ty().cloned();
    let shape = source.shape().cloned();
    let const_value = source.const_value().cloned();

    let target = graph.value_mut(new);
    target.set_type(ty);
    target.set_shape(shape);
    target.set_const_value(const_value);
    target.set_name(name);
}
