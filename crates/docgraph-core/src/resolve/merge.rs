//! Cross-module merging
//!
//! A namespace is usually spread over several modules; one copy is elected
//! to carry the documentation and absorbs the public children of the
//! others. Proxies work in the opposite direction: an index tree's proxy
//! carries members another module related into one of our aggregates.

use std::collections::BTreeMap;

use crate::database::Database;
use crate::error::DiagnosticKind;
use crate::node::{Node, NodeId};

impl Database {
    /// Elect the documented copy of every namespace and merge the others
    ///
    /// Election order: a namespace documented in the primary tree wins;
    /// failing that, an index copy that was documented in its own module;
    /// failing that, the first copy seen. Every other documented copy is a
    /// duplicate-documentation error. Every non-private winner enters the
    /// namespace index, documented or not.
    pub(crate) fn resolve_namespaces(&mut self) {
        let mut groups: BTreeMap<String, Vec<NodeId>> = BTreeMap::new();
        for tree in self.trees.clone() {
            for ns in self.collect_namespaces(tree.root) {
                groups
                    .entry(self.arena.plain_full_name(ns))
                    .or_default()
                    .push(ns);
            }
        }

        for (name, copies) in groups {
            let winner = self.elect_namespace(&name, &copies);
            let winner_module = self
                .tree_of(winner)
                .map(|t| self.trees[t].module_name.clone());
            for &ns in &copies {
                if let Some(data) = self.arena[ns].as_namespace_mut() {
                    data.where_documented = winner_module.clone();
                }
            }
            self.merge_namespace_children(winner, &copies);
            if !self.arena[winner].is_private() {
                let entry = self
                    .indexes
                    .namespaces
                    .entry(name.to_lowercase())
                    .or_default();
                if !entry.contains(&winner) {
                    entry.push(winner);
                }
            }
        }
    }

    fn elect_namespace(&mut self, name: &str, copies: &[NodeId]) -> NodeId {
        let local_documented = copies
            .iter()
            .copied()
            .find(|&ns| !self.arena[ns].is_index_node && self.arena[ns].has_doc());

        if let Some(winner) = local_documented {
            // Another module documenting the same namespace is an error
            for &ns in copies {
                if ns != winner && self.arena[ns].had_doc {
                    self.diags.warn(
                        DiagnosticKind::NamespaceDocumentedTwice(name.to_string()),
                        self.arena[winner].doc_location.clone(),
                    );
                }
            }
            return winner;
        }

        if let Some(winner) = copies
            .iter()
            .copied()
            .find(|&ns| self.arena[ns].is_index_node && self.arena[ns].had_doc)
        {
            return winner;
        }

        // Nobody documents it; members documented here have no page to
        // land on
        let fallback = *copies.first().expect("group is never empty");
        if copies
            .iter()
            .any(|&ns| self.arena.has_documented_children(ns))
        {
            self.diags.report(
                crate::error::Diagnostic::new(
                    DiagnosticKind::Undocumented(name.to_string()),
                    self.arena[fallback].declaration_location.clone(),
                )
                .with_hint("the namespace has documented members but no \\namespace comment"),
            );
        }
        fallback
    }

    /// Give the winner non-owning references to the other copies' public
    /// children
    fn merge_namespace_children(&mut self, winner: NodeId, copies: &[NodeId]) {
        let mut included: Vec<NodeId> = Vec::new();
        for &ns in copies {
            if ns == winner {
                continue;
            }
            let children = self.arena[ns]
                .as_aggregate()
                .map(|agg| agg.children.clone())
                .unwrap_or_default();
            for child in children {
                if self.arena[child].is_public() && !self.arena.is_internal(child) {
                    included.push(child);
                }
            }
        }
        if let Some(data) = self.arena[winner].as_namespace_mut() {
            for child in included {
                if !data.included_children.contains(&child) {
                    data.included_children.push(child);
                }
            }
        }
    }

    /// Attach index-tree proxy members to the primary aggregates they
    /// target
    pub(crate) fn resolve_proxies(&mut self) {
        let mut transfers: Vec<(NodeId, Vec<NodeId>)> = Vec::new();
        for tree in self.trees.iter().skip(1) {
            for &proxy in &tree.proxies {
                let name = self.arena[proxy].name.clone();
                let Some(target) = self.find_node_in(
                    self.primary_root(),
                    &[name],
                    crate::node::Genus::DontCare,
                    &Node::is_aggregate,
                ) else {
                    continue;
                };
                let children = self.arena[proxy]
                    .as_aggregate()
                    .map(|agg| agg.children.clone())
                    .unwrap_or_default();
                transfers.push((target, children));
            }
        }
        for (target, children) in transfers {
            if let Some(agg) = self.arena[target].as_aggregate_mut() {
                for child in children {
                    if !agg.related_by_proxy.contains(&child) {
                        agg.related_by_proxy.push(child);
                    }
                }
            }
        }
    }

    /// All named namespace nodes below `root`, preorder
    fn collect_namespaces(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.arena[node].is_namespace() && !self.arena[node].name.is_empty() {
                out.push(node);
            }
            if let Some(agg) = self.arena[node].as_aggregate() {
                stack.extend(agg.children.iter().rev().copied());
            }
        }
        out
    }

    /// Index of the tree a node belongs to
    fn tree_of(&self, node: NodeId) -> Option<usize> {
        let root = self.arena.root_of(node);
        self.trees.iter().position(|t| t.root == root)
    }
}
