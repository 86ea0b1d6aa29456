// graph.rs — Arena-backed IR storage: values, nodes, graphs and functions
//
// A Graph owns an arena of Values and Nodes keyed by stable ids, plus the
// node order, the input/output lists and the initializer list. Nodes may sit
// in the arena detached (allocated but not yet in the node order) until they
// are inserted.
//
// Invariant: a Value's use list is exactly the set of (node, slot) pairs whose
// input slot references it. `set_input` is the only operation that changes an
// input, and it updates both sides in one step; node creation and safe
// removal maintain the invariant for the slots they add or drop.
//
// Failure modes: unknown ids, slot out of range, duplicate initializers and
// unsafe removal surface as `IrError`; the graph is left untouched.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::attr::Attr;
use crate::error::{IrError, Result};
use crate::id::{IdAllocator, NodeId, ValueId};
use crate::tensor::Tensor;
use crate::types::{Shape, TypeDesc};

// ── Values ──────────────────────────────────────────────────────────────────

/// One consumer of a value: `node` reads the value at input `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Usage {
    pub node: NodeId,
    pub slot: usize,
}

/// A data edge with at most one producer and any number of consumers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Value {
    name: Option<String>,
    ty: Option<TypeDesc>,
    shape: Option<Shape>,
    const_value: Option<Tensor>,
    producer: Option<(NodeId, usize)>,
    uses: Vec<Usage>,
}

impl Value {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Value {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, ty: TypeDesc) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_const_value(mut self, tensor: Tensor) -> Self {
        self.const_value = Some(tensor);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn ty(&self) -> Option<&TypeDesc> {
        self.ty.as_ref()
    }

    pub fn shape(&self) -> Option<&Shape> {
        self.shape.as_ref()
    }

    pub fn const_value(&self) -> Option<&Tensor> {
        self.const_value.as_ref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn set_type(&mut self, ty: Option<TypeDesc>) {
        self.ty = ty;
    }

    pub fn set_shape(&mut self, shape: Option<Shape>) {
        self.shape = shape;
    }

    pub fn set_const_value(&mut self, tensor: Option<Tensor>) {
        self.const_value = tensor;
    }

    /// The node producing this value; `None` for graph inputs and initializers.
    pub fn producer(&self) -> Option<NodeId> {
        self.producer.map(|(node, _)| node)
    }

    /// Output index of this value on its producer.
    pub fn output_index(&self) -> Option<usize> {
        self.producer.map(|(_, index)| index)
    }

    pub fn uses(&self) -> &[Usage] {
        &self.uses
    }

    pub fn is_used(&self) -> bool {
        !self.uses.is_empty()
    }

    fn add_use(&mut self, usage: Usage) {
        self.uses.push(usage);
    }

    fn remove_use(&mut self, usage: Usage) {
        if let Some(pos) = self.uses.iter().position(|u| *u == usage) {
            self.uses.remove(pos);
        }
    }
}

// ── Nodes ───────────────────────────────────────────────────────────────────

/// An operation instance. Inputs may be empty slots (optional inputs).
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    domain: String,
    op_type: String,
    overload: String,
    name: Option<String>,
    inputs: Vec<Option<ValueId>>,
    outputs: Vec<ValueId>,
    attributes: Vec<Attr>,
}

impl Node {
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn op_type(&self) -> &str {
        &self.op_type
    }

    pub fn overload(&self) -> &str {
        &self.overload
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    /// `true` if this node is `op_type` in exactly `domain`.
    pub fn is_op(&self, domain: &str, op_type: &str) -> bool {
        self.domain == domain && self.op_type == op_type
    }

    pub fn inputs(&self) -> &[Option<ValueId>] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ValueId] {
        &self.outputs
    }

    pub fn attributes(&self) -> &[Attr] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut [Attr] {
        &mut self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Attr> {
        self.attributes.iter().find(|a| a.name() == name)
    }

    /// Insert `attr`, replacing any attribute of the same name in place.
    pub fn set_attribute(&mut self, attr: Attr) {
        match self.attributes.iter_mut().find(|a| a.name() == attr.name()) {
            Some(slot) => *slot = attr,
            None => self.attributes.push(attr),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attr> {
        let pos = self.attributes.iter().position(|a| a.name() == name)?;
        Some(self.attributes.remove(pos))
    }

    /// Label used in diagnostics: the node name, or the op type if unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.op_type)
    }
}

/// Description of a node to allocate with `Graph::create_node`.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    domain: String,
    op_type: String,
    overload: String,
    name: Option<String>,
    inputs: Vec<Option<ValueId>>,
    attributes: Vec<Attr>,
    outputs: Vec<Option<String>>,
}

impl NodeSpec {
    /// A node with no inputs, no attributes and one unnamed output.
    pub fn new(domain: impl Into<String>, op_type: impl Into<String>) -> Self {
        NodeSpec {
            domain: domain.into(),
            op_type: op_type.into(),
            overload: String::new(),
            name: None,
            inputs: Vec::new(),
            attributes: Vec::new(),
            outputs: vec![None],
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn overload(mut self, overload: impl Into<String>) -> Self {
        self.overload = overload.into();
        self
    }

    pub fn input(mut self, value: ValueId) -> Self {
        self.inputs.push(Some(value));
        self
    }

    pub fn optional_input(mut self, value: Option<ValueId>) -> Self {
        self.inputs.push(value);
        self
    }

    pub fn inputs(mut self, values: impl IntoIterator<Item = ValueId>) -> Self {
        self.inputs.extend(values.into_iter().map(Some));
        self
    }

    pub fn attr(mut self, attr: Attr) -> Self {
        self.attributes.push(attr);
        self
    }

    pub fn attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attributes.extend(attrs);
        self
    }

    /// `count` unnamed outputs.
    pub fn outputs(mut self, count: usize) -> Self {
        self.outputs = vec![None; count];
        self
    }

    pub fn named_outputs<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.outputs = names.into_iter().map(|n| Some(n.into())).collect();
        self
    }
}

// ── Graph ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    name: Option<String>,
    values: HashMap<ValueId, Value>,
    nodes: HashMap<NodeId, Node>,
    order: Vec<NodeId>,
    inputs: Vec<ValueId>,
    outputs: Vec<ValueId>,
    initializers: Vec<ValueId>,
    ids: IdAllocator,
}

impl Graph {
    pub fn new(name: impl Into<String>) -> Self {
        Graph {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    // ── Values ──

    /// Allocate a detached value with no producer and no uses.
    pub fn add_value(&mut self, mut value: Value) -> ValueId {
        value.producer = None;
        value.uses.clear();
        let id = self.ids.alloc_value();
        self.values.insert(id, value);
        id
    }

    /// Allocate a value and append it to the graph inputs.
    pub fn add_input(&mut self, value: Value) -> ValueId {
        let id = self.add_value(value);
        self.inputs.push(id);
        id
    }

    /// Allocate a named value holding `tensor` and register it as an initializer.
    /// The value's type and shape are taken from the tensor.
    pub fn add_initializer(&mut self, name: impl Into<String>, tensor: Tensor) -> Result<ValueId> {
        let name = name.into();
        if self.initializer(&name).is_some() {
            return Err(IrError::DuplicateInitializer(name));
        }
        let value = Value::named(name)
            .with_type(TypeDesc::Tensor(tensor.dtype()))
            .with_shape(tensor.shape())
            .with_const_value(tensor);
        let id = self.add_value(value);
        self.initializers.push(id);
        Ok(id)
    }

    /// Register an existing value as an initializer. It must be named, hold a
    /// constant and have no producer.
    pub fn register_initializer(&mut self, id: ValueId) -> Result<()> {
        let value = self.try_value(id).ok_or(IrError::UnknownValue(id))?;
        if value.producer.is_some() {
            return Err(IrError::InvalidInitializer(id, "it is produced by a node"));
        }
        if value.const_value.is_none() {
            return Err(IrError::InvalidInitializer(id, "it holds no constant"));
        }
        let name = match value.name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(IrError::InvalidInitializer(id, "it has no name")),
        };
        match self.initializer(&name) {
            Some(existing) if existing == id => Ok(()),
            Some(_) => Err(IrError::DuplicateInitializer(name)),
            None => {
                self.initializers.push(id);
                Ok(())
            }
        }
    }

    /// Look up a value.
    ///
    /// # Panics
    ///
    /// Panics if `id` was allocated by another graph, or named an output of a
    /// node that a safe `remove` (or a splice) has since dropped. Use
    /// `try_value` for ids that may be stale.
    pub fn value(&self, id: ValueId) -> &Value {
        self.values.get(&id).expect("value id must be valid")
    }

    /// Mutable `value`; panics under the same conditions.
    pub fn value_mut(&mut self, id: ValueId) -> &mut Value {
        self.values.get_mut(&id).expect("value id must be valid")
    }

    pub fn try_value(&self, id: ValueId) -> Option<&Value> {
        self.values.get(&id)
    }

    pub fn contains_value(&self, id: ValueId) -> bool {
        self.values.contains_key(&id)
    }

    /// All value ids in allocation order.
    pub fn value_ids(&self) -> Vec<ValueId> {
        let mut ids: Vec<ValueId> = self.values.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn producer(&self, value: ValueId) -> Option<NodeId> {
        self.try_value(value).and_then(Value::producer)
    }

    // ── Nodes ──

    /// Allocate a detached node, creating its outputs and registering one use
    /// on every referenced input.
    pub fn create_node(&mut self, spec: NodeSpec) -> Result<NodeId> {
        for value in spec.inputs.iter().flatten() {
            if !self.contains_value(*value) {
                return Err(IrError::UnknownValue(*value));
            }
        }
        let id = self.ids.alloc_node();
        let mut outputs = Vec::with_capacity(spec.outputs.len());
        for (index, name) in spec.outputs.into_iter().enumerate() {
            let value_id = self.ids.alloc_value();
            self.values.insert(
                value_id,
                Value {
                    name,
                    producer: Some((id, index)),
                    ..Value::default()
                },
            );
            outputs.push(value_id);
        }
        for (slot, value) in spec.inputs.iter().enumerate() {
            if let Some(value) = value {
                self.value_mut(*value).add_use(Usage { node: id, slot });
            }
        }
        self.nodes.insert(
            id,
            Node {
                domain: spec.domain,
                op_type: spec.op_type,
                overload: spec.overload,
                name: spec.name,
                inputs: spec.inputs,
                outputs,
                attributes: spec.attributes,
            },
        );
        Ok(id)
    }

    /// Allocate a node and append it to the node order.
    pub fn append_node(&mut self, spec: NodeSpec) -> Result<NodeId> {
        let id = self.create_node(spec)?;
        self.order.push(id);
        Ok(id)
    }

    /// Look up a node, attached or detached.
    ///
    /// # Panics
    ///
    /// Panics if `id` was allocated by another graph or the node was dropped
    /// by a safe `remove`. Use `try_node` for ids that may be stale.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(&id).expect("node id must be valid")
    }

    /// Mutable `node`; panics under the same conditions.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).expect("node id must be valid")
    }

    pub fn try_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// `true` if the node is in the node order (allocated and attached).
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    /// The node order.
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|n| *n == id)
    }

    // ── Structural edits ──

    /// Point input `slot` of `node` at `value`, moving the use from the old
    /// value's use list to the new one in the same step.
    pub fn set_input(&mut self, node: NodeId, slot: usize, value: Option<ValueId>) -> Result<()> {
        let arity = match self.nodes.get(&node) {
            Some(n) => n.inputs.len(),
            None => return Err(IrError::UnknownNode(node)),
        };
        if slot >= arity {
            return Err(IrError::InputSlotOutOfRange { node, slot, arity });
        }
        if let Some(value) = value {
            if !self.contains_value(value) {
                return Err(IrError::UnknownValue(value));
            }
        }

        let node_data = self.nodes.get_mut(&node).expect("node checked above");
        let old = std::mem::replace(&mut node_data.inputs[slot], value);
        if old == value {
            return Ok(());
        }
        let usage = Usage { node, slot };
        if let Some(old) = old {
            if let Some(old_value) = self.values.get_mut(&old) {
                old_value.remove_use(usage);
            }
        }
        if let Some(value) = value {
            self.value_mut(value).add_use(usage);
        }
        Ok(())
    }

    /// Append a detached node to the node order.
    pub fn append(&mut self, node: NodeId) -> Result<()> {
        self.check_detached(&[node])?;
        self.order.push(node);
        Ok(())
    }

    /// Insert detached `nodes` right after `anchor`, preserving their order.
    pub fn insert_after(&mut self, anchor: NodeId, nodes: &[NodeId]) -> Result<()> {
        let pos = self.position(anchor).ok_or(IrError::NodeNotInGraph(anchor))?;
        self.check_detached(nodes)?;
        self.order.splice(pos + 1..pos + 1, nodes.iter().copied());
        Ok(())
    }

    /// Insert detached `nodes` right before `anchor`, preserving their order.
    pub fn insert_before(&mut self, anchor: NodeId, nodes: &[NodeId]) -> Result<()> {
        let pos = self.position(anchor).ok_or(IrError::NodeNotInGraph(anchor))?;
        self.check_detached(nodes)?;
        self.order.splice(pos..pos, nodes.iter().copied());
        Ok(())
    }

    pub(crate) fn check_detached(&self, nodes: &[NodeId]) -> Result<()> {
        let mut seen = HashSet::new();
        for &node in nodes {
            if !self.nodes.contains_key(&node) {
                return Err(IrError::UnknownNode(node));
            }
            if !seen.insert(node) || self.contains_node(node) {
                return Err(IrError::NodeAlreadyInGraph(node));
            }
        }
        Ok(())
    }

    /// Remove `nodes` from the node order.
    ///
    /// With `safe`, the removal is rejected (and nothing changes) if any output
    /// of a removed node is a graph output or is still used by a node outside
    /// the removal set. Otherwise the removed nodes stop using their inputs and
    /// are dropped from the arena together with their outputs.
    ///
    /// Without `safe`, the nodes only leave the node order and stay allocated,
    /// so their uses and outputs remain valid.
    pub fn remove(&mut self, nodes: &[NodeId], safe: bool) -> Result<()> {
        for &node in nodes {
            if !self.contains_node(node) {
                return Err(IrError::NodeNotInGraph(node));
            }
        }
        let doomed: HashSet<NodeId> = nodes.iter().copied().collect();

        if !safe {
            self.order.retain(|n| !doomed.contains(n));
            return Ok(());
        }

        self.check_removal(nodes, &HashSet::new())?;

        for &node in nodes {
            let Some(node_data) = self.nodes.remove(&node) else {
                continue;
            };
            for (slot, input) in node_data.inputs.iter().enumerate() {
                if let Some(input) = input {
                    if let Some(value) = self.values.get_mut(input) {
                        value.remove_use(Usage { node, slot });
                    }
                }
            }
            for output in &node_data.outputs {
                self.values.remove(output);
            }
        }
        self.order.retain(|n| !doomed.contains(n));
        Ok(())
    }

    /// Check that removing `nodes` would leave no dangling consumer. Outputs in
    /// `replaced` are about to lose their uses and are exempt.
    pub(crate) fn check_removal(&self, nodes: &[NodeId], replaced: &HashSet<ValueId>) -> Result<()> {
        let doomed: HashSet<NodeId> = nodes.iter().copied().collect();
        for &node in nodes {
            let node_data = self.try_node(node).ok_or(IrError::UnknownNode(node))?;
            for &output in &node_data.outputs {
                if replaced.contains(&output) {
                    continue;
                }
                if self.outputs.contains(&output) {
                    return Err(IrError::UnsafeRemoval {
                        node,
                        value: output,
                        reason: "is a graph output",
                    });
                }
                if self.value(output).uses.iter().any(|u| !doomed.contains(&u.node)) {
                    return Err(IrError::UnsafeRemoval {
                        node,
                        value: output,
                        reason: "is still used by a node that is not being removed",
                    });
                }
            }
        }
        Ok(())
    }

    // ── Inputs, outputs, initializers ──

    pub fn inputs(&self) -> &[ValueId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ValueId] {
        &self.outputs
    }

    pub fn push_output(&mut self, value: ValueId) -> Result<()> {
        if !self.contains_value(value) {
            return Err(IrError::UnknownValue(value));
        }
        self.outputs.push(value);
        Ok(())
    }

    pub fn set_output(&mut self, index: usize, value: ValueId) -> Result<()> {
        if !self.contains_value(value) {
            return Err(IrError::UnknownValue(value));
        }
        let len = self.outputs.len();
        let slot = self.outputs.get_mut(index).ok_or(IrError::LengthMismatch {
            what: "graph outputs",
            left: index,
            right: len,
        })?;
        *slot = value;
        Ok(())
    }

    pub fn is_graph_output(&self, value: ValueId) -> bool {
        self.outputs.contains(&value)
    }

    pub fn initializers(&self) -> &[ValueId] {
        &self.initializers
    }

    pub fn initializer(&self, name: &str) -> Option<ValueId> {
        self.initializers
            .iter()
            .copied()
            .find(|id| self.value(*id).name() == Some(name))
    }

    // ── Verification ──

    /// Check the use-list invariant in both directions and that every
    /// referenced id resolves.
    pub fn verify(&self) -> Result<()> {
        for (&node_id, node) in &self.nodes {
            for (slot, input) in node.inputs.iter().enumerate() {
                let Some(input) = input else { continue };
                let value = self.try_value(*input).ok_or_else(|| {
                    IrError::Inconsistent(format!("{node_id} reads missing value {input}"))
                })?;
                let usage = Usage {
                    node: node_id,
                    slot,
                };
                if value.uses.iter().filter(|u| **u == usage).count() != 1 {
                    return Err(IrError::Inconsistent(format!(
                        "{input} does not record its use by {node_id} at slot {slot}"
                    )));
                }
            }
            for (index, output) in node.outputs.iter().enumerate() {
                match self.try_value(*output) {
                    Some(value) if value.producer == Some((node_id, index)) => {}
                    _ => {
                        return Err(IrError::Inconsistent(format!(
                            "output {index} of {node_id} does not point back at it"
                        )))
                    }
                }
            }
        }
        for (&value_id, value) in &self.values {
            for usage in &value.uses {
                let reads = self
                    .try_node(usage.node)
                    .and_then(|n| n.inputs.get(usage.slot).copied().flatten());
                if reads != Some(value_id) {
                    return Err(IrError::Inconsistent(format!(
                        "{value_id} records a stale use by {} at slot {}",
                        usage.node, usage.slot
                    )));
                }
            }
        }
        for &id in self.inputs.iter().chain(&self.outputs).chain(&self.initializers) {
            if !self.contains_value(id) {
                return Err(IrError::Inconsistent(format!(
                    "graph references missing value {id}"
                )));
            }
        }
        for &id in &self.order {
            if !self.nodes.contains_key(&id) {
                return Err(IrError::Inconsistent(format!(
                    "node order references missing node {id}"
                )));
            }
        }
        Ok(())
    }

    // ── Printing helpers ──

    /// `%name`, or `%v<id>` for unnamed values.
    pub fn value_label(&self, id: ValueId) -> String {
        match self.try_value(id).and_then(Value::name) {
            Some(name) if !name.is_empty() => format!("%{name}"),
            _ => format!("%{id}"),
        }
    }

    fn annotated_label(&self, id: ValueId) -> String {
        let label = self.value_label(id);
        let Some(value) = self.try_value(id) else {
            return label;
        };
        match (&value.ty, &value.shape) {
            (Some(ty), Some(shape)) => format!("{label}: {ty}{shape}"),
            (Some(ty), None) => format!("{label}: {ty}"),
            (None, Some(shape)) => format!("{label}: ?{shape}"),
            (None, None) => label,
        }
    }
}

impl AsRef<Graph> for Graph {
    fn as_ref(&self) -> &Graph {
        self
    }
}

impl AsMut<Graph> for Graph {
    fn as_mut(&mut self) -> &mut Graph {
        self
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs: Vec<String> = self.inputs.iter().map(|&v| self.annotated_label(v)).collect();
        writeln!(
            f,
            "graph {}({}) {{",
            self.name.as_deref().unwrap_or(""),
            inputs.join(", ")
        )?;
        for &init in &self.initializers {
            write!(f, "  init {}", self.annotated_label(init))?;
            if let Some(tensor) = self.value(init).const_value() {
                write!(f, " = {tensor}")?;
            }
            writeln!(f)?;
        }
        for &node_id in &self.order {
            let node = self.node(node_id);
            f.write_str("  ")?;
            if !node.outputs.is_empty() {
                let outs: Vec<String> = node.outputs.iter().map(|&v| self.value_label(v)).collect();
                write!(f, "{} = ", outs.join(", "))?;
            }
            if !node.domain.is_empty() {
                write!(f, "{}::", node.domain)?;
            }
            f.write_str(&node.op_type)?;
            if !node.overload.is_empty() {
                write!(f, ":{}", node.overload)?;
            }
            let ins: Vec<String> = node
                .inputs
                .iter()
                .map(|v| match v {
                    Some(v) => self.value_label(*v),
                    None => "_".to_string(),
                })
                .collect();
            write!(f, "({})", ins.join(", "))?;
            if !node.attributes.is_empty() {
                let attrs: Vec<String> = node.attributes.iter().map(|a| a.to_string()).collect();
                write!(f, " {{{}}}", attrs.join(", "))?;
            }
            writeln!(f)?;
        }
        let outs: Vec<String> = self.outputs.iter().map(|&v| self.value_label(v)).collect();
        writeln!(f, "  return {}", outs.join(", "))?;
        f.write_str("}")
    }
}

// ── Function ────────────────────────────────────────────────────────────────

/// A function: an identified, attribute-parameterised body graph. Reference
/// attributes inside the body bind to `attributes` by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub domain: String,
    pub name: String,
    pub overload: String,
    pub attributes: Vec<Attr>,
    body: Graph,
}

impl Function {
    pub fn new(domain: impl Into<String>, name: impl Into<String>, mut body: Graph) -> Self {
        let name = name.into();
        body.set_name(Some(name.clone()));
        Function {
            domain: domain.into(),
            name,
            overload: String::new(),
            attributes: Vec::new(),
            body,
        }
    }

    /// `(domain, name, overload)`, the key nodes use to call this function.
    pub fn identifier(&self) -> (&str, &str, &str) {
        (&self.domain, &self.name, &self.overload)
    }

    pub fn body(&self) -> &Graph {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Graph {
        &mut self.body
    }
}

impl AsRef<Graph> for Function {
    fn as_ref(&self) -> &Graph {
        &self.body
    }
}

impl AsMut<Graph> for Function {
    fn as_mut(&mut self) -> &mut Graph {
        &mut self.body
    }
}
