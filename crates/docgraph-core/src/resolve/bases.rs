//! C++ inheritance resolution
//!
//! Base classes arrive as qualified paths because the base may be declared
//! in a header parsed later, or in another module entirely. Once input is
//! complete the paths are resolved to nodes, derived edges are mirrored, and
//! bases the documentation must not show are replaced by their own public
//! bases.

use std::collections::BTreeSet;

use crate::database::Database;
use crate::error::DiagnosticKind;
use crate::node::{Node, NodeId, RelatedClass, Virtualness};

impl Database {
    /// Resolve every unresolved base-class path below `root`
    ///
    /// Lookup is global first; a miss is retried relative to the enclosing
    /// namespace, which covers bases written without their namespace
    /// qualifier. Each resolution also records the reverse derived edge.
    pub(crate) fn resolve_base_classes(&mut self, root: NodeId) {
        for class in self.collect_class_nodes(root) {
            let bases = self.arena[class]
                .as_class()
                .map(|data| data.bases.clone())
                .unwrap_or_default();
            for (i, base) in bases.iter().enumerate() {
                if base.node.is_some() {
                    continue;
                }
                let found = self.find_class_node(&base.path).or_else(|| {
                    self.retry_in_enclosing_namespace(class, &base.path)
                });
                let Some(found) = found else {
                    self.diags.warn(
                        DiagnosticKind::UnresolvedBaseClass {
                            class: self.arena.plain_full_name(class),
                            base: base.path.join("::"),
                        },
                        self.arena[class].declaration_location.clone(),
                    );
                    continue;
                };
                if found == class {
                    continue;
                }
                let access = base.access;
                if let Some(data) = self.arena[class].as_class_mut() {
                    data.bases[i].node = Some(found);
                }
                if let Some(base_data) = self.arena[found].as_class_mut() {
                    base_data.derived.push(RelatedClass::resolved(access, class));
                }
            }
        }
    }

    /// Retry a base lookup with the enclosing namespace path prepended
    fn retry_in_enclosing_namespace(&self, class: NodeId, path: &[String]) -> Option<NodeId> {
        let mut scope = self.arena[class].parent();
        while let Some(ns) = scope {
            if self.arena[ns].is_namespace() && !self.arena[ns].name.is_empty() {
                let mut prefixed = self.arena.full_path(ns);
                prefixed.extend_from_slice(path);
                if let Some(found) = self.find_class_node(&prefixed) {
                    return Some(found);
                }
            }
            scope = self.arena[ns].parent();
        }
        None
    }

    /// Drop bases the documentation must not show
    ///
    /// A private, internal, don't-document or duplicate base is moved to the
    /// ignored list and replaced in place by its own public bases, so the
    /// documented hierarchy skips over it. Derived lists are trimmed the
    /// same way.
    pub(crate) fn remove_private_and_internal_bases(&mut self, root: NodeId) {
        for class in self.collect_class_nodes(root) {
            self.trim_bases_of(class);
            self.trim_derived_of(class);
        }
    }

    fn trim_bases_of(&mut self, class: NodeId) {
        let Some(data) = self.arena[class].as_class() else {
            return;
        };
        let mut bases = data.bases.clone();
        let mut ignored = data.ignored_bases.clone();
        let mut found: BTreeSet<NodeId> = BTreeSet::new();
        let mut i = 0;
        while i < bases.len() {
            let base_node = bases[i]
                .node
                .or_else(|| self.find_class_node(&bases[i].path));
            let hidden = base_node.is_some_and(|b| {
                self.arena[b].is_private()
                    || self.arena.is_internal(b)
                    || self.arena[b].is_dont_document()
                    || found.contains(&b)
            });
            if hidden {
                let removed = bases.remove(i);
                let promoted = base_node
                    .and_then(|b| self.arena[b].as_class())
                    .map(|d| d.bases.clone())
                    .unwrap_or_default();
                // Reverse insertion at i preserves the original order
                for promote in promoted.into_iter().rev() {
                    bases.insert(i, promote);
                }
                ignored.push(removed);
            } else {
                if let Some(b) = base_node {
                    found.insert(b);
                    bases[i].node = Some(b);
                }
                i += 1;
            }
        }
        if let Some(data) = self.arena[class].as_class_mut() {
            data.bases = bases;
            data.ignored_bases = ignored;
        }
    }

    fn trim_derived_of(&mut self, class: NodeId) {
        let Some(data) = self.arena[class].as_class() else {
            return;
        };
        let mut derived = data.derived.clone();
        let mut i = 0;
        while i < derived.len() {
            let node = derived[i].node;
            let hidden = node.is_some_and(|d| {
                self.arena[d].is_private() || self.arena.is_internal(d)
            });
            if hidden {
                let removed = derived.remove(i);
                let promoted = removed
                    .node
                    .and_then(|d| self.arena[d].as_class())
                    .map(|data| data.derived.clone())
                    .unwrap_or_default();
                for promote in promoted.into_iter().rev() {
                    derived.insert(i, promote);
                }
            } else {
                i += 1;
            }
        }
        if let Some(data) = self.arena[class].as_class_mut() {
            data.derived = derived;
        }
    }

    /// Link each property to the base-class property it overrides
    pub(crate) fn resolve_property_overridden_from(&mut self, root: NodeId) {
        for class in self.collect_class_nodes(root) {
            let properties: Vec<NodeId> = self.arena[class]
                .as_aggregate()
                .map(|agg| {
                    agg.children
                        .iter()
                        .copied()
                        .filter(|&c| self.arena[c].is_property())
                        .collect()
                })
                .unwrap_or_default();
            for property in properties {
                let name = self.arena[property].name.clone();
                if let Some(overridden) = self.find_in_bases(class, &|n: &Node| {
                    n.is_property() && n.name == name
                }) {
                    if let Some(data) = self.arena[property].as_property_mut() {
                        data.overridden_from = Some(overridden);
                    }
                }
            }
        }
    }

    /// Bind `\reimp` functions to the base-class function they override
    pub(crate) fn resolve_reimplemented(&mut self, root: NodeId) {
        for class in self.collect_class_nodes(root) {
            let functions: Vec<NodeId> = self.arena[class]
                .as_aggregate()
                .map(|agg| {
                    agg.children
                        .iter()
                        .copied()
                        .filter(|&c| self.arena[c].is_function())
                        .collect()
                })
                .unwrap_or_default();
            for function in functions {
                let marked = self.arena[function]
                    .doc
                    .as_ref()
                    .is_some_and(crate::doc::Doc::is_marked_reimp);
                if !marked {
                    continue;
                }
                let name = self.arena[function].name.clone();
                let base_fn = self.find_function_in_bases(class, function, &name);
                match base_fn {
                    Some(base_fn) => {
                        if let Some(data) = self.arena[function].as_function_mut() {
                            data.reimplemented_from = Some(base_fn);
                        }
                    }
                    None => {
                        self.diags.warn(
                            DiagnosticKind::NoMatchingDeclaration(
                                self.arena.function_signature(function),
                            ),
                            self.arena[function].doc_location.clone(),
                        );
                    }
                }
            }
        }
    }

    /// Breadth-first search of the resolved base hierarchy
    fn find_in_bases(&self, class: NodeId, pred: &dyn Fn(&Node) -> bool) -> Option<NodeId> {
        let mut queue: Vec<NodeId> = self.resolved_bases(class);
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        while let Some(base) = queue.pop() {
            if !seen.insert(base) {
                continue;
            }
            if let Some(agg) = self.arena[base].as_aggregate() {
                for &child in &agg.children {
                    if pred(&self.arena[child]) {
                        return Some(child);
                    }
                }
            }
            queue.extend(self.resolved_bases(base));
        }
        None
    }

    fn find_function_in_bases(&self, class: NodeId, clone: NodeId, name: &str) -> Option<NodeId> {
        let mut queue: Vec<NodeId> = self.resolved_bases(class);
        let mut seen: BTreeSet<NodeId> = BTreeSet::new();
        while let Some(base) = queue.pop() {
            if !seen.insert(base) {
                continue;
            }
            for candidate in self.arena.overloads(base, name) {
                let virtual_enough = self.arena[candidate]
                    .as_function()
                    .is_some_and(|f| f.virtualness != Virtualness::NonVirtual);
                if virtual_enough
                    && !self.arena.is_internal(candidate)
                    && self.arena.same_signature(clone, candidate)
                {
                    return Some(candidate);
                }
            }
            queue.extend(self.resolved_bases(base));
        }
        None
    }

    fn resolved_bases(&self, class: NodeId) -> Vec<NodeId> {
        self.arena[class]
            .as_class()
            .map(|data| data.bases.iter().filter_map(|b| b.node).collect())
            .unwrap_or_default()
    }

    /// All class-like nodes below `root`, preorder
    pub(crate) fn collect_class_nodes(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if self.arena[node].is_class_node() {
                out.push(node);
            }
            if let Some(agg) = self.arena[node].as_aggregate() {
                stack.extend(agg.children.iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, DeclKind, Declaration};
    use crate::location::Location;
    use crate::node::{Access, Status};

    fn class(db: &mut Database, parent: &[&str], name: &str) -> NodeId {
        db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: parent.iter().map(|s| (*s).to_string()).collect(),
            name: name.to_string(),
            access: Access::Public,
            location: Location::new("t.h", 1, 1),
        })
    }

    fn add_base(db: &mut Database, class: NodeId, path: &[&str]) {
        let path = path.iter().map(|s| (*s).to_string()).collect();
        db.arena_mut()[class]
            .as_class_mut()
            .unwrap()
            .bases
            .push(RelatedClass::unresolved(Access::Public, path, String::new()));
    }

    #[test]
    fn bases_resolve_and_mirror_derived_edges() {
        let mut db = Database::new("widgets");
        let base = class(&mut db, &[], "QObject");
        let derived = class(&mut db, &[], "QWidget");
        add_base(&mut db, derived, &["QObject"]);
        let root = db.primary_root();
        db.resolve_base_classes(root);

        assert_eq!(db.arena()[derived].as_class().unwrap().bases[0].node, Some(base));
        assert_eq!(db.arena()[base].as_class().unwrap().derived[0].node, Some(derived));
        assert!(db.diagnostics().is_empty());
    }

    #[test]
    fn unqualified_base_found_via_enclosing_namespace() {
        let mut db = Database::new("widgets");
        let base = class(&mut db, &["Qt"], "Base");
        let derived = class(&mut db, &["Qt"], "Derived");
        add_base(&mut db, derived, &["Base"]);
        let root = db.primary_root();
        db.resolve_base_classes(root);
        assert_eq!(db.arena()[derived].as_class().unwrap().bases[0].node, Some(base));
    }

    #[test]
    fn unresolved_base_warns() {
        let mut db = Database::new("widgets");
        let derived = class(&mut db, &[], "QWidget");
        add_base(&mut db, derived, &["Missing"]);
        let root = db.primary_root();
        db.resolve_base_classes(root);
        assert!(matches!(
            db.diagnostics()[0].kind,
            DiagnosticKind::UnresolvedBaseClass { .. }
        ));
    }

    #[test]
    fn private_base_replaced_by_its_public_bases() {
        let mut db = Database::new("widgets");
        let public_base = class(&mut db, &[], "QObject");
        let hidden = class(&mut db, &[], "QWidgetPrivate");
        db.arena_mut()[hidden].set_status(Status::Internal);
        add_base(&mut db, hidden, &["QObject"]);
        let derived = class(&mut db, &[], "QWidget");
        add_base(&mut db, derived, &["QWidgetPrivate"]);

        let root = db.primary_root();
        db.resolve_base_classes(root);
        db.remove_private_and_internal_bases(root);

        let data = db.arena()[derived].as_class().unwrap();
        assert_eq!(data.bases.len(), 1);
        assert_eq!(data.bases[0].node, Some(public_base));
        assert_eq!(data.ignored_bases.len(), 1);
        assert_eq!(data.ignored_bases[0].node, Some(hidden));
    }

    #[test]
    fn duplicate_base_is_dropped() {
        let mut db = Database::new("widgets");
        let base = class(&mut db, &[], "QObject");
        let derived = class(&mut db, &[], "QWidget");
        add_base(&mut db, derived, &["QObject"]);
        add_base(&mut db, derived, &["QObject"]);
        let root = db.primary_root();
        db.resolve_base_classes(root);
        db.remove_private_and_internal_bases(root);

        let data = db.arena()[derived].as_class().unwrap();
        assert_eq!(data.bases.len(), 1);
        assert_eq!(data.bases[0].node, Some(base));
        assert_eq!(data.ignored_bases.len(), 1);
    }

    #[test]
    fn property_override_found_in_grandparent() {
        let mut db = Database::new("widgets");
        let grandparent = class(&mut db, &[], "A");
        let parent = class(&mut db, &[], "B");
        let child = class(&mut db, &[], "C");
        add_base(&mut db, parent, &["A"]);
        add_base(&mut db, child, &["B"]);
        let base_prop = db.declare(&Declaration {
            kind: DeclKind::Property(crate::database::PropertyDecl::default()),
            parent_path: vec!["A".into()],
            name: "enabled".into(),
            access: Access::Public,
            location: Location::new("t.h", 2, 1),
        });
        let child_prop = db.declare(&Declaration {
            kind: DeclKind::Property(crate::database::PropertyDecl::default()),
            parent_path: vec!["C".into()],
            name: "enabled".into(),
            access: Access::Public,
            location: Location::new("t.h", 3, 1),
        });
        let _ = grandparent;
        let root = db.primary_root();
        db.resolve_base_classes(root);
        db.resolve_property_overridden_from(root);
        assert_eq!(
            db.arena()[child_prop].as_property().unwrap().overridden_from,
            Some(base_prop)
        );
    }

    #[test]
    fn reimp_binds_to_virtual_base_function() {
        use crate::database::FunctionDecl;
        use crate::doc::Doc;

        let mut db = Database::new("widgets");
        let base = class(&mut db, &[], "QObject");
        let derived = class(&mut db, &[], "QWidget");
        add_base(&mut db, derived, &["QObject"]);
        let _ = base;

        let base_fn = db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some("QEvent *event".into()),
                virtualness: Virtualness::NormalVirtual,
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QObject".into()],
            name: "event".into(),
            access: Access::Public,
            location: Location::new("t.h", 4, 1),
        });
        let derived_fn = db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some("QEvent *event".into()),
                virtualness: Virtualness::NormalVirtual,
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QWidget".into()],
            name: "event".into(),
            access: Access::Public,
            location: Location::new("t.h", 5, 1),
        });
        db.attach_doc(
            derived_fn,
            Doc::parse("\\reimp", Location::new("t.cpp", 1, 1)),
            false,
        );

        let root = db.primary_root();
        db.resolve_base_classes(root);
        db.resolve_reimplemented(root);
        assert_eq!(
            db.arena()[derived_fn].as_function().unwrap().reimplemented_from,
            Some(base_fn)
        );
    }
}
