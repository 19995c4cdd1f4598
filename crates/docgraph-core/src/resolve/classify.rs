//! Classification passes
//!
//! The final resolution step walks every tree of the forest and fills the
//! lookup tables the generators page through: classes, QML types, obsolete
//! things, functions, attributions and the `\since` timeline. Keys are
//! lower-cased so the generated indexes sort case-insensitively. The
//! namespace index is the exception: it holds the winners elected by the
//! merge pass and is not rebuilt here.

use crate::database::Database;
use crate::node::{NodeId, PageType, Status};

impl Database {
    /// Register `\target` and `\keyword` link anchors below `root`
    ///
    /// First registration wins; a page redefining an anchor keeps pointing
    /// at the original.
    pub(crate) fn resolve_targets(&mut self, root: NodeId) {
        for node in self.collect_subtree(root) {
            let Some(doc) = &self.arena[node].doc else {
                continue;
            };
            let mut anchors: Vec<String> =
                doc.targets().iter().map(|t| t.text.clone()).collect();
            anchors.extend(doc.keywords().iter().map(|k| k.text.clone()));
            for anchor in anchors {
                self.indexes.targets.entry(anchor).or_insert(node);
            }
        }
    }

    /// Rebuild the classification maps from the whole forest
    pub(crate) fn build_classification_indexes(&mut self) {
        self.indexes.clear_classification();
        let roots: Vec<NodeId> = self.trees.iter().map(|t| t.root).collect();
        for root in roots {
            for node in self.collect_subtree(root) {
                self.classify(node);
            }
        }
    }

    fn classify(&mut self, node: NodeId) {
        let name = self.arena[node].name.clone();
        if name.is_empty() {
            return;
        }
        let key = name.to_lowercase();

        if self.arena[node].is_class_node() {
            if !self.in_classification(node) {
                return;
            }
            self.indexes.cpp_classes.entry(key.clone()).or_default().push(node);
            if self.is_obsolete(node) {
                self.indexes.obsolete_classes.entry(key).or_default().push(node);
            } else if self.has_obsolete_members(node) {
                self.indexes
                    .classes_with_obsolete_members
                    .entry(key)
                    .or_default()
                    .push(node);
            }
        } else if self.arena[node].is_qml_type() {
            if !self.in_classification(node) {
                return;
            }
            self.indexes.qml_type_names.entry(key.clone()).or_default().push(node);
            if self.is_obsolete(node) {
                self.indexes.obsolete_qml_types.entry(key).or_default().push(node);
            } else if self.has_obsolete_members(node) {
                self.indexes
                    .qml_types_with_obsolete_members
                    .entry(key)
                    .or_default()
                    .push(node);
            }
        } else if matches!(
            self.arena[node].node_type(),
            crate::node::NodeType::QmlBasicType | crate::node::NodeType::JsBasicType
        ) {
            if self.in_classification(node) && self.arena[node].has_doc() {
                self.indexes.qml_basic_types.entry(key).or_default().push(node);
            }
        } else if self.arena[node].node_type() == crate::node::NodeType::Example {
            if !self.arena[node].is_private() {
                let title = match &self.arena[node].data {
                    crate::node::NodeData::Page(data) if !data.title.is_empty() => {
                        data.title.clone()
                    }
                    _ => name.clone(),
                };
                self.indexes.examples.entry(title).or_default().push(node);
            }
        } else if self.arena[node].is_function() {
            let special = self.arena[node]
                .as_function()
                .is_some_and(|f| f.metaness.is_special_member());
            if !self.in_classification(node)
                || !self.arena[node].has_doc()
                || self.is_obsolete(node)
                || special
            {
                return;
            }
            // Function keys keep their case, the function index is exact
            self.indexes.functions.entry(name).or_default().push(node);
        } else if self.arena[node].page_type == PageType::Attribution {
            if !self.arena[node].is_private() {
                self.indexes.attributions.entry(key).or_default().push(node);
            }
        }

        let since = self.arena[node].since.clone();
        if !since.is_empty() && self.in_classification(node) {
            self.indexes.since.entry(since.clone()).or_default().push(node);
            if self.arena[node].is_class_node() {
                self.indexes.since_classes.entry(since).or_default().push(node);
            } else if self.arena[node].is_qml_type() {
                self.indexes.since_qml_types.entry(since).or_default().push(node);
            }
        }
        // Enumerators introduced later than their enum get their own entry
        if self.in_classification(node) {
            let item_versions: Vec<String> = self.arena[node]
                .as_enum()
                .map(|data| {
                    data.items
                        .iter()
                        .filter(|i| !i.since.is_empty())
                        .map(|i| i.since.clone())
                        .collect()
                })
                .unwrap_or_default();
            for version in item_versions {
                let entry = self.indexes.since.entry(version).or_default();
                if !entry.contains(&node) {
                    entry.push(node);
                }
            }
        }
    }

    /// Public-facing filter shared by the classification maps
    fn in_classification(&self, node: NodeId) -> bool {
        !self.arena[node].is_private()
            && !self.arena.is_internal(node)
            && !self.arena[node].is_dont_document()
    }

    fn is_obsolete(&self, node: NodeId) -> bool {
        matches!(
            self.arena[node].status(),
            Status::Deprecated | Status::Obsolete
        )
    }

    fn has_obsolete_members(&self, node: NodeId) -> bool {
        self.arena[node].as_aggregate().is_some_and(|agg| {
            agg.children
                .iter()
                .any(|&c| self.is_obsolete(c) && self.arena[c].has_doc())
        })
    }

    /// Every node below `root`, preorder, root excluded
    pub(crate) fn collect_subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.arena[root]
            .as_aggregate()
            .map(|agg| agg.children.iter().rev().copied().collect())
            .unwrap_or_default();
        while let Some(node) = stack.pop() {
            out.push(node);
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
    use crate::doc::Doc;
    use crate::location::Location;
    use crate::node::{Node, NodeType};

    fn class_in(db: &mut Database, parent: NodeId, name: &str) -> NodeId {
        let class = db.arena_mut().alloc(Node::new(NodeType::Class, name));
        db.arena_mut().add_child(parent, class);
        class
    }

    fn doc(text: &str) -> Doc {
        Doc::parse(text, Location::new("t.cpp", 1, 1))
    }

    #[test]
    fn classes_are_indexed_by_lowercase_name() {
        let mut db = Database::new("core");
        let root = db.primary_root();
        let class = class_in(&mut db, root, "QString");
        db.build_classification_indexes();
        assert_eq!(db.indexes().cpp_classes["qstring"], vec![class]);
    }

    #[test]
    fn internal_and_dont_document_classes_are_skipped() {
        let mut db = Database::new("core");
        let root = db.primary_root();
        let internal = class_in(&mut db, root, "QInternal");
        db.arena_mut()[internal].set_status(Status::Internal);
        let suppressed = class_in(&mut db, root, "QSuppressed");
        db.arena_mut()[suppressed].set_status(Status::DontDocument);
        db.build_classification_indexes();
        assert!(db.indexes().cpp_classes.is_empty());
    }

    #[test]
    fn loaded_index_trees_feed_the_lookup_tables() {
        let mut db = Database::new("core");
        let index_root = db.add_tree("gui", true);
        let class = class_in(&mut db, index_root, "QWindow");
        db.arena_mut()[class].since = "5.0".into();
        db.build_classification_indexes();
        assert_eq!(db.indexes().cpp_classes["qwindow"], vec![class]);
        assert_eq!(db.indexes().since["5.0"], vec![class]);
    }

    #[test]
    fn obsolete_split_is_exclusive() {
        let mut db = Database::new("core");
        let root = db.primary_root();
        let obsolete = class_in(&mut db, root, "QOld");
        db.arena_mut()[obsolete].set_status(Status::Obsolete);
        let carrier = class_in(&mut db, root, "QCarrier");
        let member = class_in(&mut db, carrier, "Dead");
        db.arena_mut()[member].set_status(Status::Deprecated);
        db.arena_mut()[member].set_doc(doc("Deprecated member."));

        db.build_classification_indexes();
        assert!(db.indexes().obsolete_classes.contains_key("qold"));
        assert!(!db.indexes().classes_with_obsolete_members.contains_key("qold"));
        assert!(db
            .indexes()
            .classes_with_obsolete_members
            .contains_key("qcarrier"));
    }

    #[test]
    fn since_groups_by_version() {
        let mut db = Database::new("core");
        let root = db.primary_root();
        let a = class_in(&mut db, root, "QNew");
        db.arena_mut()[a].since = "6.5".into();
        let b = class_in(&mut db, root, "QNewer");
        db.arena_mut()[b].since = "6.5".into();
        db.build_classification_indexes();
        assert_eq!(db.indexes().since["6.5"], vec![a, b]);
    }

    #[test]
    fn enum_item_since_feeds_the_timeline() {
        use crate::node::EnumItem;

        let mut db = Database::new("core");
        let root = db.primary_root();
        let en = db.arena_mut().alloc(Node::new(NodeType::Enum, "Feature"));
        db.arena_mut().add_child(root, en);
        db.arena_mut()[en].as_enum_mut().unwrap().items.push(EnumItem {
            name: "NewThing".into(),
            value: "3".into(),
            since: "6.2".into(),
        });
        db.build_classification_indexes();
        assert_eq!(db.indexes().since["6.2"], vec![en]);
    }

    #[test]
    fn special_member_functions_stay_out_of_the_function_index() {
        use crate::node::Metaness;

        let mut db = Database::new("core");
        let root = db.primary_root();
        let class = class_in(&mut db, root, "QString");
        let ctor = db.arena_mut().alloc(Node::new(NodeType::Function, "QString"));
        db.arena_mut()[ctor].as_function_mut().unwrap().metaness = Metaness::Ctor;
        db.arena_mut()[ctor].set_doc(doc("Constructs."));
        let normal = db.arena_mut().alloc(Node::new(NodeType::Function, "append"));
        db.arena_mut()[normal].set_doc(doc("Appends."));
        db.arena_mut().add_child(class, ctor);
        db.arena_mut().add_child(class, normal);

        db.build_classification_indexes();
        assert!(!db.indexes().functions.contains_key("QString"));
        assert_eq!(db.indexes().functions["append"], vec![normal]);
    }

    #[test]
    fn first_target_registration_wins() {
        let mut db = Database::new("core");
        let root = db.primary_root();
        let first = class_in(&mut db, root, "QFirst");
        db.arena_mut()[first].set_doc(doc("\\target anchor\nText."));
        let second = class_in(&mut db, root, "QSecond");
        db.arena_mut()[second].set_doc(doc("\\target anchor\nText."));
        db.resolve_targets(root);
        assert_eq!(db.indexes().targets["anchor"], first);
    }
}
