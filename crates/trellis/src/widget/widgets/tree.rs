//! Hierarchical checklist widget.
//!
//! Nodes live in a slotmap arena with parent back-references by key, so
//! ownership stays strictly tree-shaped. The host reports the full set of
//! currently-checked and currently-expanded node keys after each round; the
//! widget reconciles with recursive check propagation and attributes the
//! whole change to a single cause node.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};
use slotmap::{new_key_type, SlotMap};
use trellis_core::Signal;

use crate::error::{Result, TrellisError};
use crate::protocol::ResultPayload;
use crate::widget::{Interactive, Widget, WidgetBase};

new_key_type! {
    /// Arena key of a tree node.
    pub struct NodeKey;
}

/// One reconciled check-state change, attributed to a single cause node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeChange {
    /// Wire key of the node attributed as the cause.
    pub cause: String,
    /// The cause node's final checked state.
    pub checked: bool,
    /// Wire keys of every node whose checked state changed, in depth-first
    /// order.
    pub changed: Vec<String>,
}

struct Node {
    /// Wire key, unique within the tree.
    key: String,
    label: String,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    checked: bool,
    expanded: bool,
    check_recursive: bool,
}

/// A tree of checkable, collapsible nodes with recursive check propagation.
///
/// Checking a node marked `check_recursive` checks its whole subtree;
/// unchecking any node unchecks every `check_recursive` ancestor above it,
/// one level at a time. When a host round trip changes several nodes at
/// once, the change is attributed to exactly one cause: the shallowest
/// changed node if its own toggle explains the whole set (every direct
/// child ended up in the same state), otherwise the deepest changed node.
pub struct TreeChecklist {
    base: WidgetBase,
    nodes: SlotMap<NodeKey, Node>,
    roots: Vec<NodeKey>,
    /// Pending change staged by phase 1 for phase 2.
    pending: RefCell<Option<TreeChange>>,
    /// Emitted with the attributed change when checked states changed in a
    /// round. Expanded-state changes never fire it.
    pub checked_changed: Signal<TreeChange>,
}

impl TreeChecklist {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            pending: RefCell::new(None),
            checked_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Node Management
    // =========================================================================

    /// Add a root node. The wire key must be unique within the tree.
    pub fn add_root(&mut self, key: impl Into<String>, label: impl Into<String>) -> Result<NodeKey> {
        let node = self.insert_node(key.into(), label.into(), None)?;
        self.roots.push(node);
        Ok(node)
    }

    /// Add a child under an existing node.
    pub fn add_child(
        &mut self,
        parent: NodeKey,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return Err(TrellisError::UnknownTreeNode);
        }
        let node = self.insert_node(key.into(), label.into(), Some(parent))?;
        self.nodes[parent].children.push(node);
        Ok(node)
    }

    fn insert_node(&mut self, key: String, label: String, parent: Option<NodeKey>) -> Result<NodeKey> {
        if self.nodes.values().any(|n| n.key == key) {
            return Err(TrellisError::DuplicateNodeKey { key });
        }
        Ok(self.nodes.insert(Node {
            key,
            label,
            parent,
            children: Vec::new(),
            checked: false,
            expanded: true,
            check_recursive: false,
        }))
    }

    /// Remove a node and its whole subtree. The parent back-reference is
    /// cleared as part of detaching.
    pub fn remove_node(&mut self, node: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(TrellisError::UnknownTreeNode);
        }
        if let Some(parent) = self.nodes[node].parent {
            self.nodes[parent].children.retain(|&child| child != node);
        } else {
            self.roots.retain(|&root| root != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                stack.extend(removed.children);
            }
        }
        Ok(())
    }

    /// Look up a node by its wire key.
    pub fn find(&self, key: &str) -> Option<NodeKey> {
        self.nodes.iter().find(|(_, n)| n.key == key).map(|(k, _)| k)
    }

    /// The root nodes, in insertion order.
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Direct children of a node, in insertion order.
    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A node's wire key.
    pub fn key_of(&self, node: NodeKey) -> Option<&str> {
        self.nodes.get(node).map(|n| n.key.as_str())
    }

    /// Whether a node is checked.
    pub fn is_checked(&self, node: NodeKey) -> bool {
        self.nodes.get(node).is_some_and(|n| n.checked)
    }

    /// Whether a node is expanded.
    pub fn is_expanded(&self, node: NodeKey) -> bool {
        self.nodes.get(node).is_some_and(|n| n.expanded)
    }

    /// Expand or collapse a node.
    pub fn set_expanded(&mut self, node: NodeKey, expanded: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.expanded = expanded;
        }
    }

    /// Whether checking this node cascades through its subtree.
    pub fn is_check_recursive(&self, node: NodeKey) -> bool {
        self.nodes.get(node).is_some_and(|n| n.check_recursive)
    }

    /// Enable or disable recursive checking for a node.
    pub fn set_check_recursive(&mut self, node: NodeKey, recursive: bool) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.check_recursive = recursive;
        }
    }

    /// Check or uncheck a node programmatically, running the propagation
    /// rules. Emits `checked_changed` with this node as the cause.
    pub fn set_checked(&mut self, node: NodeKey, checked: bool) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(TrellisError::UnknownTreeNode);
        }
        if self.nodes[node].checked == checked {
            return Ok(());
        }
        let before = self.checked_snapshot();
        self.nodes[node].checked = checked;
        if checked {
            if self.nodes[node].check_recursive {
                self.check_subtree(node);
            }
        } else {
            self.uncheck_recursive_ancestors(node);
        }
        let changed = self.changed_keys(&before);
        self.checked_changed.emit(TreeChange {
            cause: self.nodes[node].key.clone(),
            checked,
            changed,
        });
        Ok(())
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    fn check_subtree(&mut self, node: NodeKey) {
        let mut stack = self.nodes[node].children.clone();
        while let Some(current) = stack.pop() {
            self.nodes[current].checked = true;
            stack.extend(self.nodes[current].children.iter().copied());
        }
    }

    /// Uncheck every `check_recursive` ancestor, one level at a time.
    fn uncheck_recursive_ancestors(&mut self, node: NodeKey) {
        let mut current = self.nodes[node].parent;
        while let Some(parent) = current {
            if !self.nodes[parent].check_recursive || !self.nodes[parent].checked {
                break;
            }
            self.nodes[parent].checked = false;
            current = self.nodes[parent].parent;
        }
    }

    fn depth(&self, node: NodeKey) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[node].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent].parent;
        }
        depth
    }

    /// All node keys in depth-first, insertion order.
    fn dfs_order(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeKey> = self.roots.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.nodes[current].children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    fn checked_snapshot(&self) -> HashMap<NodeKey, bool> {
        self.nodes.iter().map(|(k, n)| (k, n.checked)).collect()
    }

    /// Wire keys of nodes whose checked state differs from the snapshot,
    /// in depth-first order.
    fn changed_keys(&self, before: &HashMap<NodeKey, bool>) -> Vec<String> {
        self.dfs_order()
            .into_iter()
            .filter(|&node| before.get(&node) != Some(&self.nodes[node].checked))
            .map(|node| self.nodes[node].key.clone())
            .collect()
    }

    /// Pick the single cause node for a multi-node change.
    ///
    /// The shallowest changed node is the cause when its own toggle
    /// explains the whole set, i.e. every direct child ended up in the same
    /// final state (a downward cascade). Otherwise the deepest changed node
    /// is the cause (an upward uncheck cascade). Depth ties resolve to the
    /// first node in depth-first order.
    fn attribute_cause(&self, changed: &[NodeKey]) -> NodeKey {
        if changed.len() == 1 {
            return changed[0];
        }
        let shallowest = changed
            .iter()
            .copied()
            .min_by_key(|&node| self.depth(node))
            .unwrap();
        let state = self.nodes[shallowest].checked;
        let explains_all = self.nodes[shallowest]
            .children
            .iter()
            .all(|&child| self.nodes[child].checked == state);
        if explains_all {
            shallowest
        } else {
            changed
                .iter()
                .copied()
                .max_by_key(|&node| self.depth(node))
                .unwrap()
        }
    }
}

impl Default for TreeChecklist {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for TreeChecklist {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "tree"
    }

    fn properties(&self) -> Value {
        fn describe(tree: &TreeChecklist, node: NodeKey) -> Value {
            let n = &tree.nodes[node];
            json!({
                "key": n.key,
                "label": n.label,
                "checked": n.checked,
                "expanded": n.expanded,
                "check_recursive": n.check_recursive,
                "children": n.children.iter().map(|&c| describe(tree, c)).collect::<Vec<_>>(),
            })
        }
        json!({
            "nodes": self.roots.iter().map(|&r| describe(self, r)).collect::<Vec<_>>(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn as_interactive(&self) -> Option<&dyn Interactive> {
        Some(self)
    }

    fn as_interactive_mut(&mut self) -> Option<&mut dyn Interactive> {
        Some(self)
    }
}

impl Interactive for TreeChecklist {
    fn wants_notify(&self) -> bool {
        self.checked_changed.connection_count() > 0
    }

    fn apply_result(&mut self, payload: &ResultPayload) {
        let Some(value) = payload.value_of(self.base.id()) else {
            return;
        };
        let key_set = |field: &str| -> Option<HashSet<String>> {
            value.get(field).and_then(Value::as_array).map(|keys| {
                keys.iter()
                    .filter_map(|k| k.as_str().map(str::to_owned))
                    .collect()
            })
        };

        // Expanded-state changes update the cache silently.
        if let Some(expanded) = key_set("expanded") {
            for node in self.nodes.values_mut() {
                node.expanded = expanded.contains(&node.key);
            }
        }

        let Some(checked) = key_set("checked") else {
            return;
        };
        let before = self.checked_snapshot();
        for node in self.nodes.values_mut() {
            node.checked = checked.contains(&node.key);
        }
        // Reconcile: freshly checked recursive nodes cascade downward,
        // then any unchecked node unchecks its recursive ancestors.
        for node in self.dfs_order() {
            if self.nodes[node].checked
                && self.nodes[node].check_recursive
                && before.get(&node) != Some(&true)
            {
                self.check_subtree(node);
            }
        }
        for node in self.dfs_order() {
            if !self.nodes[node].checked {
                self.uncheck_recursive_ancestors(node);
            }
        }

        let changed_nodes: Vec<NodeKey> = self
            .dfs_order()
            .into_iter()
            .filter(|&node| before.get(&node) != Some(&self.nodes[node].checked))
            .collect();
        if changed_nodes.is_empty() || !self.wants_notify() {
            return;
        }
        let cause = self.attribute_cause(&changed_nodes);
        let change = TreeChange {
            cause: self.nodes[cause].key.clone(),
            checked: self.nodes[cause].checked,
            changed: changed_nodes
                .iter()
                .map(|&node| self.nodes[node].key.clone())
                .collect(),
        };
        tracing::debug!(
            target: trellis_core::logging::targets::WIDGET,
            tree = %self.base.id(),
            cause = %change.cause,
            changed = change.changed.len(),
            "tree change attributed"
        );
        *self.pending.borrow_mut() = Some(change);
    }

    fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    fn raise_pending(&self) {
        let staged = self.pending.borrow_mut().take();
        if let Some(change) = staged {
            self.checked_changed.emit(change);
        }
    }

    fn discard_pending(&self) {
        self.pending.borrow_mut().take();
    }
}
