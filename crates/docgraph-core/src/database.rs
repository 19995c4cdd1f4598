//! The database façade
//!
//! [`Database`] owns the arena, the forest of trees (the primary tree plus
//! one tree per loaded index file), the diagnostics sink and the auxiliary
//! indexes. The front ends push declarations and documentation comments in,
//! [`Database::resolve_all`] runs the resolution passes once all input is
//! consumed, and the generators query the resolved forest read-only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::doc::Doc;
use crate::error::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::location::Location;
use crate::node::aggregate::FindFlags;
use crate::node::arena::NodeArena;
use crate::node::{
    Access, EnumItem, Genus, Metaness, Node, NodeData, NodeId, NodeType, ProxyData, Status,
    Virtualness,
};
use crate::params::Parameters;
use crate::resolve::{Indexes, ResolutionContext};

/// One tree in the forest
#[derive(Debug, Clone)]
pub struct TreeInfo {
    /// Unnamed namespace node at the top of the tree
    pub root: NodeId,
    /// Physical module the tree documents
    pub module_name: String,
    /// True for trees loaded from an index file
    pub is_index: bool,
    /// Proxy nodes found in this tree, for cross-module resolution
    pub proxies: Vec<NodeId>,
}

/// A candidate declaration delivered by an external parser front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    #[serde(flatten)]
    pub kind: DeclKind,
    #[serde(default)]
    pub parent_path: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub location: Location,
}

/// Kind-specific declaration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclKind {
    Namespace,
    Class,
    Struct,
    Union,
    Enum {
        #[serde(default)]
        is_scoped: bool,
        #[serde(default)]
        items: Vec<EnumItem>,
    },
    Typedef {
        #[serde(default)]
        aliased_type: String,
    },
    Variable {
        #[serde(default)]
        data_type: String,
        #[serde(default)]
        is_static: bool,
    },
    Function(FunctionDecl),
    Property(PropertyDecl),
}

/// Function details of a declaration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionDecl {
    #[serde(default)]
    pub return_type: String,
    /// Raw text between the parentheses; preferred over `parameter_types`
    #[serde(default)]
    pub signature: Option<String>,
    /// Bare parameter types as the front end saw them; a trailing
    /// `QPrivateSignal` is recognized and stripped
    #[serde(default)]
    pub parameter_types: Vec<String>,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_variadic: bool,
    #[serde(default)]
    pub metaness: Metaness,
    #[serde(default)]
    pub virtualness: Virtualness,
}

/// Property macro details: accessors arrive as names, bound to function
/// nodes during resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyDecl {
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub getter: String,
    #[serde(default)]
    pub setter: String,
    #[serde(default)]
    pub resetter: String,
    #[serde(default)]
    pub notifier: String,
}

/// Property accessor names awaiting resolution to function nodes
#[derive(Debug, Clone)]
pub(crate) struct PendingAccessors {
    pub property: NodeId,
    pub getter: String,
    pub setter: String,
    pub resetter: String,
    pub notifier: String,
}

/// The documentation database
#[derive(Debug)]
pub struct Database {
    pub(crate) arena: NodeArena,
    pub(crate) trees: Vec<TreeInfo>,
    pub(crate) diags: Diagnostics,
    pub(crate) ctx: ResolutionContext,
    pub(crate) indexes: Indexes,
    pub(crate) dont_document: BTreeSet<String>,
    pub(crate) pending_accessors: Vec<PendingAccessors>,
    pub(crate) pending_relates: Vec<(NodeId, String, Location)>,
}

impl Database {
    /// Create a database with an empty primary tree for `module_name`
    #[must_use]
    pub fn new(module_name: impl Into<String>) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new(NodeType::Namespace, ""));
        Self {
            arena,
            trees: vec![TreeInfo {
                root,
                module_name: module_name.into(),
                is_index: false,
                proxies: Vec::new(),
            }],
            diags: Diagnostics::new(),
            ctx: ResolutionContext::default(),
            indexes: Indexes::default(),
            dont_document: BTreeSet::new(),
            pending_accessors: Vec::new(),
            pending_relates: Vec::new(),
        }
    }

    /// The node storage
    #[must_use]
    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Mutable node storage, for front ends that build nodes directly
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Root of the primary tree
    #[must_use]
    pub fn primary_root(&self) -> NodeId {
        self.trees[0].root
    }

    /// Name of the module the primary tree documents
    #[must_use]
    pub fn primary_module_name(&self) -> &str {
        &self.trees[0].module_name
    }

    /// All trees, primary first
    #[must_use]
    pub fn trees(&self) -> &[TreeInfo] {
        &self.trees
    }

    /// Diagnostics recorded so far
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diags.items()
    }

    /// Drain the recorded diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diags.take()
    }

    /// The auxiliary indexes filled by [`Database::resolve_all`]
    #[must_use]
    pub fn indexes(&self) -> &Indexes {
        &self.indexes
    }

    /// Start a new tree for an index file; returns its root
    pub(crate) fn add_tree(&mut self, module_name: impl Into<String>, is_index: bool) -> NodeId {
        let mut root = Node::new(NodeType::Namespace, "");
        root.is_index_node = is_index;
        let root = self.arena.alloc(root);
        self.trees.push(TreeInfo {
            root,
            module_name: module_name.into(),
            is_index,
            proxies: Vec::new(),
        });
        root
    }

    // ===== Declaration intake =====

    /// Insert a candidate declaration, unifying it with an existing node
    ///
    /// The parent path is resolved segment by segment; missing namespace
    /// segments are created on the fly because headers may be parsed in any
    /// order. At the leaf, a function is matched against the existing
    /// overload set by arity, const-ness and parameter types; a miss means a
    /// new declaration, never an error.
    pub fn declare(&mut self, decl: &Declaration) -> NodeId {
        let mut parent = self.primary_root();
        for segment in &decl.parent_path {
            parent = match self.arena.find_child_node(
                parent,
                segment,
                Genus::DontCare,
                FindFlags::default(),
            ) {
                Some(node) if self.arena[node].is_aggregate() => node,
                _ => {
                    let ns = self.arena.alloc(Node::new(NodeType::Namespace, segment.clone()));
                    self.arena.add_child(parent, ns);
                    ns
                }
            };
        }

        if let Some(existing) = self.find_declared(parent, decl) {
            if self.arena[existing].declaration_location.is_empty() {
                self.arena[existing].declaration_location = decl.location.clone();
            }
            return existing;
        }
        self.create_declared(parent, decl)
    }

    /// Match a declaration against the parent's existing children
    fn find_declared(&self, parent: NodeId, decl: &Declaration) -> Option<NodeId> {
        let name = decl.name.as_str();
        match &decl.kind {
            DeclKind::Namespace => {
                self.arena
                    .find_nonfunction_child(parent, name, |n| n.is_namespace())
            }
            DeclKind::Class | DeclKind::Struct | DeclKind::Union => {
                self.arena
                    .find_nonfunction_child(parent, name, |n| n.is_class_node())
            }
            DeclKind::Enum { .. } => {
                self.arena.find_nonfunction_child(parent, name, |n| n.is_enum())
            }
            DeclKind::Typedef { .. } => {
                self.arena
                    .find_nonfunction_child(parent, name, |n| n.is_typedef())
            }
            DeclKind::Variable { .. } => self
                .arena
                .find_nonfunction_child(parent, name, |n| n.node_type() == NodeType::Variable),
            DeclKind::Property(_) => {
                self.arena.find_nonfunction_child(parent, name, |n| n.is_property())
            }
            DeclKind::Function(f) => self.find_declared_function(parent, name, f),
        }
    }

    /// The cursor-to-node matching heuristic for functions
    ///
    /// Arity is adjusted for a stored private-signal marker and a variadic
    /// tail, const-ness must agree, and parameter types must be pairwise
    /// equal after stripping one redundant enclosing-scope qualifier from
    /// both sides.
    fn find_declared_function(
        &self,
        parent: NodeId,
        name: &str,
        decl: &FunctionDecl,
    ) -> Option<NodeId> {
        let candidates = self.arena.overloads(parent, name);
        if candidates.is_empty() {
            return None;
        }
        // The private-signal marker is stripped on both sides, so plain
        // counts compare
        let arg_types = decl.visible_parameter_types();
        let actual_args = arg_types.len();
        let scope = format!("{}::", self.arena[parent].name);

        for candidate in candidates {
            let Some(data) = self.arena[candidate].as_function() else {
                continue;
            };
            if data.parameters.count() != actual_args + usize::from(decl.is_variadic) {
                continue;
            }
            if data.is_const != decl.is_const {
                continue;
            }
            if decl.is_variadic
                && data.parameters.last().map_or(true, |p| p.ty() != "...")
            {
                continue;
            }
            let mut different = false;
            for i in 0..actual_args {
                let t1 = data.parameters.at(i).ty();
                let t2 = arg_types[i].as_str();
                if t1 != t2 && strip_scope(t1, &scope) != strip_scope(t2, &scope) {
                    different = true;
                    break;
                }
            }
            if !different {
                return Some(candidate);
            }
        }
        None
    }

    /// Build and attach a node for a declaration with no existing match
    fn create_declared(&mut self, parent: NodeId, decl: &Declaration) -> NodeId {
        let node_type = match &decl.kind {
            DeclKind::Namespace => NodeType::Namespace,
            DeclKind::Class => NodeType::Class,
            DeclKind::Struct => NodeType::Struct,
            DeclKind::Union => NodeType::Union,
            DeclKind::Enum { .. } => NodeType::Enum,
            DeclKind::Typedef { .. } => NodeType::Typedef,
            DeclKind::Variable { .. } => NodeType::Variable,
            DeclKind::Function(_) => NodeType::Function,
            DeclKind::Property(_) => NodeType::Property,
        };
        let mut node = Node::new(node_type, decl.name.clone());
        node.access = decl.access;
        node.declaration_location = decl.location.clone();

        match &decl.kind {
            DeclKind::Enum { is_scoped, items } => {
                let data = node.as_enum_mut().expect("enum payload");
                data.is_scoped = *is_scoped;
                data.items = items.clone();
            }
            DeclKind::Typedef { aliased_type } => {
                node.as_typedef_mut().expect("typedef payload").aliased_type =
                    aliased_type.clone();
            }
            DeclKind::Variable {
                data_type,
                is_static,
            } => {
                if let NodeData::Variable(v) = &mut node.data {
                    v.left_type = data_type.clone();
                    v.is_static = *is_static;
                }
            }
            DeclKind::Function(f) => {
                let parameters = self.build_parameters(f, &decl.location);
                let data = node.as_function_mut().expect("function payload");
                data.metaness = f.metaness;
                data.virtualness = f.virtualness;
                data.is_const = f.is_const;
                data.is_static = f.is_static;
                data.return_type = f.return_type.clone();
                data.parameters = parameters;
            }
            DeclKind::Property(p) => {
                node.as_property_mut().expect("property payload").data_type =
                    p.data_type.clone();
            }
            _ => {}
        }

        let id = self.arena.alloc(node);
        self.arena.add_child(parent, id);

        if let DeclKind::Property(p) = &decl.kind {
            self.pending_accessors.push(PendingAccessors {
                property: id,
                getter: p.getter.clone(),
                setter: p.setter.clone(),
                resetter: p.resetter.clone(),
                notifier: p.notifier.clone(),
            });
        }
        id
    }

    fn build_parameters(&mut self, decl: &FunctionDecl, location: &Location) -> Parameters {
        let mut parameters = if let Some(signature) = &decl.signature {
            let parsed = Parameters::parse(signature);
            if !parsed.is_valid() {
                self.diags.warn(
                    DiagnosticKind::InvalidParameterList(signature.clone()),
                    location.clone(),
                );
            }
            parsed
        } else {
            let mut types = decl.parameter_types.clone();
            let private_signal = types.last().is_some_and(|t| t == "QPrivateSignal");
            if private_signal {
                types.pop();
            }
            let mut parameters = Parameters::from_types(&types);
            if private_signal {
                parameters.set_private_signal();
            }
            parameters
        };
        if decl.is_variadic && parameters.last().map_or(true, |p| p.ty() != "...") {
            parameters.append("...", "", "");
        }
        parameters
    }

    // ===== Queries =====

    /// Find a node by qualified path across the forest, primary tree first
    #[must_use]
    pub fn find_node_by_path(&self, path: &[String], genus: Genus) -> Option<NodeId> {
        self.find_node_where(path, genus, &|_| true)
    }

    /// Find a class, struct or union by qualified path
    #[must_use]
    pub fn find_class_node(&self, path: &[String]) -> Option<NodeId> {
        self.find_node_where(path, Genus::Cpp, &Node::is_class_node)
    }

    /// Find a node by path for which `pred` holds, searching every tree
    pub fn find_node_where(
        &self,
        path: &[String],
        genus: Genus,
        pred: &dyn Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        self.trees
            .iter()
            .find_map(|tree| self.find_node_in(tree.root, path, genus, pred))
    }

    /// Find a node by path below `root`
    pub fn find_node_in(
        &self,
        root: NodeId,
        path: &[String],
        genus: Genus,
        pred: &dyn Fn(&Node) -> bool,
    ) -> Option<NodeId> {
        let mut current = root;
        for (i, segment) in path.iter().enumerate() {
            if i + 1 == path.len() {
                return self
                    .arena
                    .find_children(current, segment)
                    .into_iter()
                    .find(|&c| genus.matches(self.arena[c].genus) && pred(&self.arena[c]));
            }
            current = self.arena.find_child_node(
                current,
                segment,
                Genus::DontCare,
                FindFlags::default(),
            )?;
            if !self.arena[current].is_aggregate() {
                return None;
            }
        }
        None
    }

    /// Find an aggregate by qualified name in the primary tree
    #[must_use]
    pub fn find_aggregate(&self, name: &str) -> Option<NodeId> {
        let path: Vec<String> = name.split("::").map(str::to_string).collect();
        self.find_node_in(self.primary_root(), &path, Genus::DontCare, &Node::is_aggregate)
    }

    /// Find a QML type by logical module id and name
    ///
    /// An empty module id falls back to a module-less search by name across
    /// the forest.
    #[must_use]
    pub fn find_qml_type(&self, qmid: &str, name: &str) -> Option<NodeId> {
        if !qmid.is_empty() {
            if let Some(&node) = self.indexes.qml_types.get(&format!("{qmid}::{name}")) {
                return Some(node);
            }
            return None;
        }
        let path = vec![name.to_string()];
        self.find_node_where(&path, Genus::Qml, &Node::is_qml_type)
    }

    /// Find a QML type through an import record
    #[must_use]
    pub fn find_qml_type_by_import(
        &self,
        import: &crate::node::ImportRec,
        name: &str,
    ) -> Option<NodeId> {
        if import.module_name.is_empty() {
            return None;
        }
        // Dotted names are tried segment by segment
        for part in name.split('.') {
            let key = format!("{}::{}", import.module_name, part);
            if let Some(&node) = self.indexes.qml_types.get(&key) {
                return Some(node);
            }
        }
        None
    }

    /// Find a function by a `Path::name(signature)` target string
    ///
    /// The target may omit the parameter list entirely; the relaxed
    /// empty-parameters policy of the overload lookup then applies.
    #[must_use]
    pub fn find_function_node(&self, target: &str) -> Option<NodeId> {
        let (path, parameters) = parse_function_target(target);
        if path.is_empty() {
            return None;
        }
        let (leaf, prefix) = path.split_last().expect("checked non-empty");
        self.trees.iter().find_map(|tree| {
            let mut current = tree.root;
            for segment in prefix {
                current = self.arena.find_child_node(
                    current,
                    segment,
                    Genus::DontCare,
                    FindFlags::default(),
                )?;
            }
            self.arena.find_function_child(current, leaf, &parameters)
        })
    }

    // ===== Resolution =====

    /// Run every resolution pass, in dependency order, exactly once
    ///
    /// After this returns the forest is frozen by convention: generators
    /// only read.
    pub fn resolve_all(&mut self) {
        let root = self.primary_root();
        self.resolve_base_classes(root);
        self.resolve_property_overridden_from(root);
        self.arena.normalize_overloads(root);
        self.mark_dont_document_nodes();
        self.remove_private_and_internal_bases(root);
        self.resolve_properties();
        self.arena.mark_undocumented_children_internal(root);
        self.resolve_qml_inheritance(root);
        self.resolve_cpp_to_qml_links(root);
        self.resolve_reimplemented(root);
        self.resolve_relates();
        self.resolve_targets(root);
        self.resolve_namespaces();
        self.resolve_proxies();
        self.build_classification_indexes();
    }

    /// Apply the `\dontdocument` list to top-level types of the primary tree
    fn mark_dont_document_nodes(&mut self) {
        if self.dont_document.is_empty() {
            return;
        }
        let names: Vec<String> = self.dont_document.iter().cloned().collect();
        for name in names {
            let path: Vec<String> = name.split("::").map(str::to_string).collect();
            if let Some(node) =
                self.find_node_in(self.primary_root(), &path, Genus::Cpp, &|n| {
                    n.is_class_node() || n.is_namespace()
                })
            {
                self.arena[node].set_status(Status::DontDocument);
            }
        }
    }

    /// Bind property accessor names to sibling function nodes
    ///
    /// An accessor must share the property's access, and its status unless
    /// the function is undocumented.
    fn resolve_properties(&mut self) {
        let pending = std::mem::take(&mut self.pending_accessors);
        for entry in &pending {
            let property = entry.property;
            let Some(parent) = self.arena[property].parent() else {
                continue;
            };
            let access = self.arena[property].access;
            let status = self.arena[property].status();
            let Some(agg) = self.arena[parent].as_aggregate() else {
                continue;
            };
            let children = agg.children.clone();
            for child in children {
                if !self.arena[child].is_function() {
                    continue;
                }
                if self.arena[child].access != access {
                    continue;
                }
                if self.arena[child].status() != status && self.arena[child].has_doc() {
                    continue;
                }
                let name = self.arena[child].name.clone();
                let role = if name == entry.getter {
                    Some(crate::node::PropertyRole::Getter)
                } else if name == entry.setter {
                    Some(crate::node::PropertyRole::Setter)
                } else if name == entry.resetter {
                    Some(crate::node::PropertyRole::Resetter)
                } else if name == entry.notifier {
                    Some(crate::node::PropertyRole::Notifier)
                } else {
                    None
                };
                if let Some(role) = role {
                    self.arena[property]
                        .as_property_mut()
                        .expect("property payload")
                        .add_function(child, role);
                    self.arena[child]
                        .as_function_mut()
                        .expect("function child")
                        .associated_properties
                        .push(property);
                }
            }
        }
    }
}

impl FunctionDecl {
    /// Parameter types as delivered, without a trailing private-signal
    /// marker
    fn visible_parameter_types(&self) -> Vec<String> {
        if let Some(signature) = &self.signature {
            let parameters = Parameters::parse(signature);
            return parameters.types().iter().map(|t| (*t).to_string()).collect();
        }
        let mut types = self.parameter_types.clone();
        if types.last().is_some_and(|t| t == "QPrivateSignal") {
            types.pop();
        }
        types
    }
}

/// Strip one leading `Scope::` qualifier, if present
fn strip_scope<'a>(ty: &'a str, scope: &str) -> &'a str {
    ty.strip_prefix(scope).unwrap_or(ty)
}

/// Split a `Path::name(signature)` target into path segments and parameters
fn parse_function_target(target: &str) -> (Vec<String>, Parameters) {
    let target = target.trim();
    let (name_part, parameters) = match target.find('(') {
        Some(open) => {
            let close = target.rfind(')').unwrap_or(target.len());
            let inner = &target[open + 1..close.min(target.len())];
            (&target[..open], Parameters::parse(inner))
        }
        None => (target, Parameters::new()),
    };
    // A return type before the qualified name is tolerated and dropped
    let name_part = name_part
        .trim_end_matches("const")
        .trim()
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("");
    let path: Vec<String> = name_part
        .split("::")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    (path, parameters)
}

impl Database {
    /// Record a `\relates` for the resolution pass; the target may not be
    /// declared yet when the comment is seen
    pub(crate) fn handle_relates(&mut self, node: NodeId, target: &str, location: &Location) {
        self.pending_relates
            .push((node, target.to_string(), location.clone()));
    }

    /// Adopt every `\relates` node into its target aggregate
    pub(crate) fn resolve_relates(&mut self) {
        let pending = std::mem::take(&mut self.pending_relates);
        for (node, target, location) in pending {
            self.resolve_one_relates(node, &target, &location);
        }
    }

    /// Make `node` a related non-member of the aggregate named `target`
    ///
    /// If the target lives in another module's tree, the node is attached
    /// to a proxy standing in for the foreign aggregate, and the proxy pass
    /// links the two after loading.
    fn resolve_one_relates(&mut self, node: NodeId, target: &str, location: &Location) {
        if let Some(aggregate) = self.find_aggregate(target) {
            self.arena.adopt_child(aggregate, node);
            self.arena[node].is_related_nonmember = true;
            return;
        }
        // Not in the primary tree; a proxy carries the relation if any
        // index tree knows the target
        let foreign = self
            .trees
            .iter()
            .skip(1)
            .find_map(|tree| {
                let path: Vec<String> =
                    target.split("::").map(str::to_string).collect();
                self.find_node_in(tree.root, &path, Genus::DontCare, &Node::is_aggregate)
                    .map(|found| (tree.module_name.clone(), found))
            });
        if let Some((module, _)) = foreign {
            let proxy = self.find_or_create_proxy(target, &module);
            self.arena.adopt_child(proxy, node);
            self.arena[node].is_related_nonmember = true;
        } else {
            self.diags.report(Diagnostic::new(
                DiagnosticKind::UnresolvedRelates {
                    name: self.arena[node].name.clone(),
                    target: target.to_string(),
                },
                location.clone(),
            ));
        }
    }

    fn find_or_create_proxy(&mut self, name: &str, module: &str) -> NodeId {
        let root = self.primary_root();
        if let Some(existing) = self
            .arena
            .find_nonfunction_child(root, name, |n| n.is_proxy())
        {
            return existing;
        }
        let mut node = Node::new(NodeType::Proxy, name);
        node.data = NodeData::Proxy(ProxyData {
            proxied_module: module.to_string(),
            ..ProxyData::default()
        });
        let id = self.arena.alloc(node);
        self.arena.add_child(root, id);
        self.trees[0].proxies.push(id);
        id
    }

    /// Attach `doc` to `node`, warning when documentation is overridden
    ///
    /// The old doc is overwritten regardless; the loss is acceptable but
    /// must be observable.
    pub fn attach_doc(&mut self, node: NodeId, doc: Doc, replace: bool) {
        if self.arena[node].has_doc() && !replace && !doc.is_marked_reimp() {
            let previous = self.arena[node].doc_location.clone();
            self.diags.report(
                Diagnostic::new(
                    DiagnosticKind::DuplicateDocumentation {
                        name: self.arena.plain_full_name(node),
                        other: previous,
                    },
                    doc.location().clone(),
                )
                .with_hint("the earlier documentation is overridden"),
            );
        }
        self.arena[node].set_doc(doc);
    }
}
