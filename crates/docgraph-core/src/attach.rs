//! Comment attachment
//!
//! A documentation comment names its entity with a topic command. This
//! module resolves the topic to a node — creating one for entities that
//! have no declaration, like pages, groups and QML members — attaches the
//! parsed [`Doc`] and applies the comment's metacommands.

use crate::database::Database;
use crate::doc::{Doc, Topic};
use crate::error::DiagnosticKind;
use crate::location::Location;
use crate::node::{
    FlagValue, Genus, Metaness, Node, NodeData, NodeId, NodeType, PageType, SharedCommentData,
    Status, ThreadSafeness,
};
use crate::params::Parameters;

/// Topic commands documenting callables; only these may share a comment
fn is_function_topic(command: &str) -> bool {
    matches!(
        command,
        "fn" | "macro" | "qmlsignal" | "qmlmethod" | "qmlattachedsignal" | "qmlattachedmethod"
    )
}

impl Database {
    /// Parse a comment and attach it to the entity its topic names
    ///
    /// Returns the documented nodes: one for a normal comment, several for
    /// a comment shared by a group of `\fn` topics, none when the target
    /// cannot be resolved.
    pub fn attach_comment(&mut self, text: &str, location: Location) -> Vec<NodeId> {
        let doc = Doc::parse(text, location.clone());
        let topics: Vec<Topic> = doc.topics().to_vec();
        let Some(first) = topics.first() else {
            return Vec::new();
        };

        if topics.len() > 1 {
            if topics.iter().all(|t| is_function_topic(&t.command)) {
                return self.attach_shared_comment(&topics, &doc);
            }
            for extra in &topics[1..] {
                self.diags.warn(
                    DiagnosticKind::DuplicateTopicCommand(extra.command.clone()),
                    location.clone(),
                );
            }
        }

        match self.resolve_topic(first, &doc) {
            Some(node) => {
                self.attach_doc(node, doc.clone(), false);
                self.apply_metacommands(node, &doc);
                vec![node]
            }
            None => Vec::new(),
        }
    }

    /// One comment documenting several functions at once
    fn attach_shared_comment(&mut self, topics: &[Topic], doc: &Doc) -> Vec<NodeId> {
        let mut members = Vec::new();
        for topic in topics {
            if let Some(node) = self.resolve_topic(topic, doc) {
                members.push(node);
            }
        }
        if members.is_empty() {
            return Vec::new();
        }
        let parent = self.arena[members[0]]
            .parent()
            .unwrap_or_else(|| self.primary_root());
        let shared = self
            .arena
            .alloc(Node::new(NodeType::SharedComment, String::new()));
        self.arena[shared].data = NodeData::SharedComment(SharedCommentData {
            collective: members.clone(),
        });
        self.arena.add_child(parent, shared);
        for &member in &members {
            self.arena[member].shared_comment = Some(shared);
        }
        self.attach_doc(shared, doc.clone(), false);
        for &member in &members {
            self.apply_metacommands(member, doc);
        }
        members
    }

    fn resolve_topic(&mut self, topic: &Topic, doc: &Doc) -> Option<NodeId> {
        let args = topic.args.trim().to_string();
        let location = doc.location().clone();
        match topic.command.as_str() {
            "fn" => {
                let found = self.find_function_node(&args);
                if found.is_none() {
                    self.diags.warn(
                        DiagnosticKind::NoMatchingDeclaration(args),
                        location,
                    );
                }
                found
            }
            "macro" => Some(self.find_or_create_macro(&args)),
            "class" | "struct" | "union" => {
                self.find_documented(&args, Genus::Cpp, &Node::is_class_node, &location)
            }
            "namespace" => {
                self.find_documented(&args, Genus::Cpp, &Node::is_namespace, &location)
            }
            "enum" => self.find_documented(&args, Genus::Cpp, &Node::is_enum, &location),
            "typedef" | "typealias" => {
                self.find_documented(&args, Genus::Cpp, &Node::is_typedef, &location)
            }
            "variable" => self.find_documented(
                &args,
                Genus::Cpp,
                &|n| n.node_type() == NodeType::Variable,
                &location,
            ),
            "property" => {
                self.find_documented(&args, Genus::Cpp, &Node::is_property, &location)
            }
            "headerfile" => Some(self.find_or_create_page_like(&args, NodeType::HeaderFile)),
            "page" => Some(self.find_or_create_page_like(&args, NodeType::Page)),
            "example" => Some(self.find_or_create_page_like(&args, NodeType::Example)),
            "externalpage" => {
                Some(self.find_or_create_page_like(&args, NodeType::ExternalPage))
            }
            "group" => Some(self.find_or_create_collection(&args, NodeType::Group)),
            "module" => Some(self.find_or_create_collection(&args, NodeType::Module)),
            "qmlmodule" => Some(self.document_qml_module(&args)),
            "qmltype" | "qmlclass" => Some(self.find_or_create_qml_type(&args, false)),
            "qmlbasictype" => Some(self.find_or_create_qml_type(&args, true)),
            "qmlproperty" | "qmlattachedproperty" => {
                let attached = topic.command == "qmlattachedproperty";
                self.document_qml_property(&args, attached, &location)
            }
            "qmlsignal" | "qmlmethod" | "qmlattachedsignal" | "qmlattachedmethod" => {
                let metaness = match topic.command.as_str() {
                    "qmlsignal" | "qmlattachedsignal" => Metaness::QmlSignal,
                    _ => Metaness::QmlMethod,
                };
                self.document_qml_function(&args, metaness, &location)
            }
            "dontdocument" => {
                let list = args
                    .trim()
                    .trim_start_matches('(')
                    .trim_end_matches(')');
                for name in list.split_whitespace() {
                    self.dont_document.insert(name.to_string());
                }
                None
            }
            _ => None,
        }
    }

    fn find_documented(
        &mut self,
        args: &str,
        genus: Genus,
        pred: &dyn Fn(&Node) -> bool,
        location: &Location,
    ) -> Option<NodeId> {
        let name = args.split_whitespace().next().unwrap_or_default();
        let path: Vec<String> = name.split("::").map(str::to_string).collect();
        let found = self.find_node_where(&path, genus, pred);
        if found.is_none() {
            self.diags.warn(
                DiagnosticKind::UnresolvedDocTarget(name.to_string()),
                location.clone(),
            );
        }
        found
    }

    fn find_or_create_macro(&mut self, args: &str) -> NodeId {
        let (name, parameters) = match args.find('(') {
            Some(open) => {
                let close = args.rfind(')').unwrap_or(args.len());
                (
                    args[..open].trim(),
                    Some(Parameters::parse(&args[open + 1..close.min(args.len())])),
                )
            }
            None => (args.trim(), None),
        };
        // A macro may carry a return type before its name
        let name = name.rsplit(char::is_whitespace).next().unwrap_or(name);
        let root = self.primary_root();
        if let Some(parameters) = &parameters {
            if let Some(existing) = self.arena.find_function_child(root, name, parameters) {
                return existing;
            }
        } else if let Some(existing) = self.arena.primary_function(root, name) {
            return existing;
        }

        let mut node = Node::new(NodeType::Function, name);
        let data = node.as_function_mut().expect("function payload");
        data.metaness = if parameters.is_some() {
            Metaness::MacroWithParams
        } else {
            Metaness::MacroWithoutParams
        };
        if let Some(parameters) = parameters {
            data.parameters = parameters;
        }
        let id = self.arena.alloc(node);
        self.arena.add_child(root, id);
        id
    }

    /// Pages and header files are created on first sight; the first word of
    /// the argument is the name, the rest of the line is ignored here
    fn find_or_create_page_like(&mut self, args: &str, node_type: NodeType) -> NodeId {
        let name = args.split_whitespace().next().unwrap_or_default();
        let root = self.primary_root();
        if let Some(existing) = self
            .arena
            .find_nonfunction_child(root, name, |n| n.node_type() == node_type)
        {
            return existing;
        }
        let mut node = Node::new(node_type, name);
        node.page_type = match node_type {
            NodeType::Example => PageType::Example,
            NodeType::Page | NodeType::ExternalPage => PageType::Article,
            _ => PageType::NoPage,
        };
        if node_type != NodeType::HeaderFile {
            node.genus = Genus::Doc;
        }
        let id = self.arena.alloc(node);
        self.arena.add_child(root, id);
        id
    }

    fn find_or_create_collection(&mut self, args: &str, node_type: NodeType) -> NodeId {
        let name = args
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let map = match node_type {
            NodeType::Group => &self.indexes.groups,
            NodeType::Module => &self.indexes.modules,
            _ => &self.indexes.qml_modules,
        };
        if let Some(&existing) = map.get(&name) {
            return existing;
        }
        let mut node = Node::new(node_type, name.clone());
        if node_type == NodeType::Group {
            node.genus = Genus::Doc;
        }
        let id = self.arena.alloc(node);
        let root = self.primary_root();
        self.arena.add_child(root, id);
        let map = match node_type {
            NodeType::Group => &mut self.indexes.groups,
            NodeType::Module => &mut self.indexes.modules,
            _ => &mut self.indexes.qml_modules,
        };
        map.insert(name, id);
        id
    }

    /// `\qmlmodule Name version`
    fn document_qml_module(&mut self, args: &str) -> NodeId {
        let mut words = args.split_whitespace();
        let name = words.next().unwrap_or_default().to_string();
        let version = words.next().unwrap_or_default().to_string();
        let module = self.find_or_create_collection(&name, NodeType::QmlModule);
        if let Some(data) = self.arena[module].as_collection_mut() {
            data.logical_module_name = name;
            data.logical_module_version = version;
            data.was_seen = true;
        }
        module
    }

    fn find_or_create_qml_type(&mut self, args: &str, basic: bool) -> NodeId {
        let name = args.split_whitespace().next().unwrap_or_default();
        let node_type = if basic {
            NodeType::QmlBasicType
        } else {
            NodeType::QmlType
        };
        let root = self.primary_root();
        if let Some(existing) = self
            .arena
            .find_nonfunction_child(root, name, |n| n.node_type() == node_type)
        {
            return existing;
        }
        let id = self.arena.alloc(Node::new(node_type, name));
        self.arena.add_child(root, id);
        id
    }

    /// `\qmlproperty type Holder::name`, holder possibly module-qualified
    fn document_qml_property(
        &mut self,
        args: &str,
        attached: bool,
        location: &Location,
    ) -> Option<NodeId> {
        let mut words = args.split_whitespace();
        let data_type = words.next().unwrap_or_default().to_string();
        let target = words.collect::<Vec<_>>().join(" ");
        let mut segments: Vec<String> = target.split("::").map(str::to_string).collect();
        if segments.len() < 2 {
            self.diags.warn(
                DiagnosticKind::UnresolvedDocTarget(target),
                location.clone(),
            );
            return None;
        }
        let name = segments.pop().expect("checked length");
        let Some(holder) = self.find_qml_holder(&segments, location) else {
            return None;
        };
        let genus = self.arena[holder].genus;
        if let Some(existing) = self.arena.find_qml_property(holder, &name, Some(attached)) {
            return Some(existing);
        }
        let mut node = Node::new(NodeType::QmlProperty, name);
        node.genus = genus;
        if let NodeData::QmlProperty(data) = &mut node.data {
            data.data_type = data_type;
            data.is_attached = attached;
        }
        let id = self.arena.alloc(node);
        self.arena.add_child(holder, id);
        Some(id)
    }

    /// `\qmlsignal ret Holder::name(params)`; QML callables rarely have a
    /// declaration, so a miss creates the node
    fn document_qml_function(
        &mut self,
        args: &str,
        metaness: Metaness,
        location: &Location,
    ) -> Option<NodeId> {
        let (open, close) = match args.find('(') {
            Some(open) => (open, args.rfind(')').unwrap_or(args.len())),
            None => (args.len(), args.len()),
        };
        let parameters = if open < args.len() {
            Parameters::parse(&args[open + 1..close.min(args.len())])
        } else {
            Parameters::new()
        };
        let name_part = args[..open]
            .trim()
            .rsplit(char::is_whitespace)
            .next()
            .unwrap_or_default();
        let mut segments: Vec<String> = name_part.split("::").map(str::to_string).collect();
        if segments.len() < 2 {
            self.diags.warn(
                DiagnosticKind::UnresolvedDocTarget(name_part.to_string()),
                location.clone(),
            );
            return None;
        }
        let name = segments.pop().expect("checked length");
        let holder = self.find_qml_holder(&segments, location)?;
        if let Some(existing) = self.arena.find_function_child(holder, &name, &parameters) {
            return Some(existing);
        }
        let mut node = Node::new(NodeType::Function, name);
        node.genus = self.arena[holder].genus;
        let data = node.as_function_mut().expect("function payload");
        data.metaness = metaness;
        data.parameters = parameters;
        let id = self.arena.alloc(node);
        self.arena.add_child(holder, id);
        Some(id)
    }

    /// Resolve the `Module::Type` or `Type` part of a QML member target
    fn find_qml_holder(&mut self, segments: &[String], location: &Location) -> Option<NodeId> {
        let found = match segments {
            [name] => self.find_qml_type("", name),
            [module, name] => self
                .find_qml_type(module, name)
                .or_else(|| self.find_qml_type("", name)),
            _ => None,
        };
        if found.is_none() {
            self.diags.warn(
                DiagnosticKind::UnresolvedDocTarget(segments.join("::")),
                location.clone(),
            );
        }
        found
    }

    /// Apply every metacommand of `doc` to `node`
    pub fn apply_metacommands(&mut self, node: NodeId, doc: &Doc) {
        let commands: Vec<String> = doc.metacommands_used().map(str::to_string).collect();
        for command in commands {
            let args = doc.metacommand_args(&command).to_vec();
            let arg = args.first().map(|a| a.text.clone()).unwrap_or_default();
            let arg_location = args
                .first()
                .map_or_else(|| doc.location().clone(), |a| a.location.clone());
            match command.as_str() {
                "internal" => self.arena[node].set_status(Status::Internal),
                "obsolete" => self.arena[node].set_status(Status::Obsolete),
                "deprecated" => self.arena[node].set_status(Status::Deprecated),
                "preliminary" => self.arena[node].set_status(Status::Preliminary),
                "since" => self.arena[node].since = arg,
                "overload" => {
                    if let Some(data) = self.arena[node].as_function_mut() {
                        data.overload_flag = true;
                    }
                }
                "relates" => self.handle_relates(node, &arg, &arg_location),
                "ingroup" => {
                    for group_arg in &args {
                        let group =
                            self.find_or_create_collection(&group_arg.text, NodeType::Group);
                        self.add_collection_member(group, node);
                    }
                }
                "inmodule" => {
                    let module = self.find_or_create_collection(&arg, NodeType::Module);
                    self.add_collection_member(module, node);
                    self.arena[node].physical_module_name = arg;
                }
                "inqmlmodule" => self.set_qml_module(node, &arg),
                "instantiates" | "nativetype" => {
                    if let Some(data) = self.arena[node].as_qml_type_mut() {
                        data.cpp_class_name = arg;
                    }
                }
                "inherits" => {
                    if let Some(data) = self.arena[node].as_qml_type_mut() {
                        data.qml_base_name = arg;
                    }
                }
                "threadsafe" => {
                    self.arena[node].thread_safeness = ThreadSafeness::ThreadSafe;
                }
                "reentrant" => self.arena[node].thread_safeness = ThreadSafeness::Reentrant,
                "nonreentrant" => {
                    self.arena[node].thread_safeness = ThreadSafeness::NonReentrant;
                }
                "abstract" | "qmlabstract" => self.set_abstract(node),
                "wrapper" => {
                    if let Some(data) = self.arena[node].as_class_mut() {
                        data.is_wrapper = true;
                    }
                }
                "readonly" => {
                    if let Some(data) = self.qml_property_mut(node) {
                        data.read_only = FlagValue::True;
                    }
                }
                "required" => {
                    if let Some(data) = self.qml_property_mut(node) {
                        data.is_required = true;
                    }
                }
                "default" => {
                    if let Some(data) = self.qml_property_mut(node) {
                        data.read_only = FlagValue::False;
                    }
                }
                "title" => self.set_title(node, arg_full(&args)),
                "subtitle" => self.set_subtitle(node, arg_full(&args)),
                "attribution" => self.arena[node].page_type = PageType::Attribution,
                // brief, keyword and target are consumed straight from the
                // Doc; reimp is resolved against base classes later
                _ => {}
            }
        }
    }

    fn add_collection_member(&mut self, collection: NodeId, member: NodeId) {
        if let Some(data) = self.arena[collection].as_collection_mut() {
            if !data.members.contains(&member) {
                data.members.push(member);
            }
        }
    }

    /// `\inqmlmodule` fixes a QML type's logical module and makes it
    /// findable under its qualified name
    fn set_qml_module(&mut self, node: NodeId, module_name: &str) {
        let module = self.find_or_create_collection(module_name, NodeType::QmlModule);
        self.add_collection_member(module, node);
        let name = self.arena[node].name.clone();
        if let Some(data) = self.arena[node].as_qml_type_mut() {
            data.logical_module = Some(module);
            self.indexes
                .qml_types
                .insert(format!("{module_name}::{name}"), node);
        }
    }

    fn set_abstract(&mut self, node: NodeId) {
        if let Some(data) = self.arena[node].as_class_mut() {
            data.is_abstract = true;
        } else if let Some(data) = self.arena[node].as_qml_type_mut() {
            data.is_abstract = true;
        }
    }

    fn qml_property_mut(
        &mut self,
        node: NodeId,
    ) -> Option<&mut crate::node::QmlPropertyData> {
        match &mut self.arena[node].data {
            NodeData::QmlProperty(data) => Some(data),
            _ => None,
        }
    }

    fn set_title(&mut self, node: NodeId, title: String) {
        match &mut self.arena[node].data {
            NodeData::Page(data) => data.title = title,
            NodeData::Header(data) => data.title = title,
            NodeData::Collection(data) => data.title = title,
            _ => {}
        }
    }

    fn set_subtitle(&mut self, node: NodeId, subtitle: String) {
        match &mut self.arena[node].data {
            NodeData::Page(data) => data.subtitle = subtitle,
            NodeData::Header(data) => data.subtitle = subtitle,
            NodeData::Collection(data) => data.subtitle = subtitle,
            _ => {}
        }
    }
}

/// A title argument is the whole rest of the line, not the first word
fn arg_full(args: &[crate::doc::ArgLocation]) -> String {
    args.first().map(|a| a.text.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{DeclKind, Declaration, FunctionDecl};
    use crate::node::Access;

    fn db_with_class(name: &str) -> (Database, NodeId) {
        let mut db = Database::new("widgets");
        let class = db.declare(&Declaration {
            kind: DeclKind::Class,
            parent_path: vec![],
            name: name.into(),
            access: Access::Public,
            location: Location::new("t.h", 1, 1),
        });
        (db, class)
    }

    fn at(line: u32) -> Location {
        Location::new("t.cpp", line, 1)
    }

    #[test]
    fn class_comment_attaches_and_applies_metacommands() {
        let (mut db, class) = db_with_class("QWidget");
        let nodes = db.attach_comment(
            "\\class QWidget\n\\inmodule QtWidgets\n\\since 4.0\nThe widget.",
            at(1),
        );
        assert_eq!(nodes, vec![class]);
        assert!(db.arena()[class].has_doc());
        assert_eq!(db.arena()[class].since, "4.0");
        assert_eq!(db.arena()[class].physical_module_name, "QtWidgets");
        let module = db.indexes().modules["QtWidgets"];
        assert_eq!(
            db.arena()[module].as_collection().unwrap().members,
            vec![class]
        );
    }

    #[test]
    fn unknown_class_target_warns() {
        let mut db = Database::new("widgets");
        let nodes = db.attach_comment("\\class QMissing\nText.", at(1));
        assert!(nodes.is_empty());
        assert!(matches!(
            db.diagnostics()[0].kind,
            DiagnosticKind::UnresolvedDocTarget(_)
        ));
    }

    #[test]
    fn fn_comment_resolves_overload() {
        let (mut db, _) = db_with_class("QWidget");
        let plain = db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some(String::new()),
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QWidget".into()],
            name: "show".into(),
            access: Access::Public,
            location: Location::new("t.h", 5, 1),
        });
        let nodes = db.attach_comment("\\fn void QWidget::show()\nShows.", at(3));
        assert_eq!(nodes, vec![plain]);
    }

    #[test]
    fn fn_comment_without_declaration_warns() {
        let (mut db, _) = db_with_class("QWidget");
        let nodes = db.attach_comment("\\fn void QWidget::missing()\nText.", at(3));
        assert!(nodes.is_empty());
        assert!(matches!(
            db.diagnostics()[0].kind,
            DiagnosticKind::NoMatchingDeclaration(_)
        ));
    }

    #[test]
    fn shared_comment_collects_fn_topics() {
        let (mut db, _) = db_with_class("QWidget");
        let a = db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some(String::new()),
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QWidget".into()],
            name: "show".into(),
            access: Access::Public,
            location: Location::new("t.h", 5, 1),
        });
        let b = db.declare(&Declaration {
            kind: DeclKind::Function(FunctionDecl {
                signature: Some(String::new()),
                ..FunctionDecl::default()
            }),
            parent_path: vec!["QWidget".into()],
            name: "hide".into(),
            access: Access::Public,
            location: Location::new("t.h", 6, 1),
        });
        let nodes = db.attach_comment(
            "\\fn void QWidget::show()\n\\fn void QWidget::hide()\nToggle visibility.",
            at(3),
        );
        assert_eq!(nodes, vec![a, b]);
        let shared = db.arena()[a].shared_comment.unwrap();
        assert_eq!(db.arena()[b].shared_comment, Some(shared));
        assert_eq!(
            db.arena()[shared].as_shared_comment().unwrap().collective,
            vec![a, b]
        );
        assert!(db.arena()[shared].has_doc());
        assert!(db.arena()[a].is_sharing_comment());
    }

    #[test]
    fn mixed_topics_keep_first_and_warn() {
        let (mut db, class) = db_with_class("QWidget");
        let nodes = db.attach_comment("\\class QWidget\n\\enum QWidget::Kind\nText.", at(1));
        assert_eq!(nodes, vec![class]);
        assert!(matches!(
            db.diagnostics()[0].kind,
            DiagnosticKind::DuplicateTopicCommand(_)
        ));
    }

    #[test]
    fn page_is_created_with_title() {
        let mut db = Database::new("widgets");
        let nodes = db.attach_comment(
            "\\page tips.html\n\\title Programming Tips\nBody.",
            at(1),
        );
        assert_eq!(nodes.len(), 1);
        let page = nodes[0];
        assert_eq!(db.arena()[page].name, "tips.html");
        assert_eq!(db.arena()[page].page_type, PageType::Article);
        match &db.arena()[page].data {
            NodeData::Page(data) => assert_eq!(data.title, "Programming Tips"),
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn qml_type_with_module_becomes_findable() {
        let mut db = Database::new("quick");
        let nodes = db.attach_comment(
            "\\qmltype Rectangle\n\\inqmlmodule QtQuick\n\\instantiates QQuickRectangle\nA rectangle.",
            at(1),
        );
        let rect = nodes[0];
        assert_eq!(db.find_qml_type("QtQuick", "Rectangle"), Some(rect));
        assert_eq!(
            db.arena()[rect].as_qml_type().unwrap().cpp_class_name,
            "QQuickRectangle"
        );
        let module = db.indexes().qml_modules["QtQuick"];
        assert_eq!(
            db.arena()[rect].as_qml_type().unwrap().logical_module,
            Some(module)
        );
    }

    #[test]
    fn qml_property_is_created_under_its_type() {
        let mut db = Database::new("quick");
        db.attach_comment("\\qmltype Rectangle\n\\inqmlmodule QtQuick\nText.", at(1));
        let nodes = db.attach_comment(
            "\\qmlproperty color QtQuick::Rectangle::color\n\\readonly\nThe color.",
            at(8),
        );
        let property = nodes[0];
        assert_eq!(db.arena()[property].name, "color");
        match &db.arena()[property].data {
            NodeData::QmlProperty(data) => {
                assert_eq!(data.data_type, "color");
                assert_eq!(data.read_only, FlagValue::True);
                assert!(!data.is_attached);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        let rect = db.find_qml_type("QtQuick", "Rectangle").unwrap();
        assert_eq!(db.arena()[property].parent(), Some(rect));
    }

    #[test]
    fn qml_signal_created_on_first_sight() {
        let mut db = Database::new("quick");
        db.attach_comment("\\qmltype Rectangle\n\\inqmlmodule QtQuick\nText.", at(1));
        let nodes = db.attach_comment(
            "\\qmlsignal void QtQuick::Rectangle::clicked(MouseEvent event)\nEmitted.",
            at(9),
        );
        let signal = nodes[0];
        let data = db.arena()[signal].as_function().unwrap();
        assert_eq!(data.metaness, Metaness::QmlSignal);
        assert_eq!(data.parameters.count(), 1);
        assert_eq!(db.arena()[signal].genus, Genus::Qml);
    }

    #[test]
    fn qml_attached_method_creates_a_function() {
        let mut db = Database::new("quick");
        db.attach_comment("\\qmltype Keys\n\\inqmlmodule QtQuick\nText.", at(1));
        let nodes = db.attach_comment(
            "\\qmlattachedmethod void QtQuick::Keys::forwardTo(list targets)\nForwards.",
            at(9),
        );
        assert_eq!(nodes.len(), 1);
        let data = db.arena()[nodes[0]].as_function().unwrap();
        assert_eq!(data.metaness, Metaness::QmlMethod);
        assert_eq!(data.parameters.count(), 1);
        let keys = db.find_qml_type("QtQuick", "Keys").unwrap();
        assert_eq!(db.arena()[nodes[0]].parent(), Some(keys));
    }

    #[test]
    fn dontdocument_fills_the_suppression_list() {
        let mut db = Database::new("widgets");
        let nodes = db.attach_comment("\\dontdocument (QPrivate QHelper)", at(1));
        assert!(nodes.is_empty());
        assert!(db.dont_document.contains("QPrivate"));
        assert!(db.dont_document.contains("QHelper"));
    }

    #[test]
    fn internal_metacommand_sets_status() {
        let (mut db, class) = db_with_class("QWidget");
        db.attach_comment("\\class QWidget\n\\internal\nPrivate API.", at(1));
        assert_eq!(db.arena()[class].status(), Status::Internal);
    }
}
