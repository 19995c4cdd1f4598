//! The node graph data model
//!
//! Every documented entity is a [`Node`]: a fixed header of attributes shared
//! by all kinds (name, access, status, locations, attached [`Doc`]) plus a
//! kind-specific [`NodeData`] payload. Nodes live in a
//! [`NodeArena`](arena::NodeArena) and refer to each other by [`NodeId`];
//! aggregates own their children through id lists, every other edge is a
//! non-owning reference.

pub mod aggregate;
pub mod arena;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::doc::Doc;
use crate::location::Location;
use crate::params::Parameters;

/// Stable handle to a node in a [`arena::NodeArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The arena slot this handle refers to
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Namespace,
    Class,
    Struct,
    Union,
    HeaderFile,
    Page,
    Enum,
    Example,
    ExternalPage,
    Function,
    Typedef,
    TypeAlias,
    Property,
    Variable,
    Group,
    Module,
    QmlType,
    QmlModule,
    QmlProperty,
    QmlBasicType,
    JsType,
    JsModule,
    JsProperty,
    JsBasicType,
    SharedComment,
    Proxy,
}

impl NodeType {
    /// The genus a freshly created node of this kind starts with
    #[must_use]
    pub fn default_genus(self) -> Genus {
        match self {
            NodeType::Namespace
            | NodeType::Class
            | NodeType::Struct
            | NodeType::Union
            | NodeType::HeaderFile
            | NodeType::Enum
            | NodeType::Function
            | NodeType::Typedef
            | NodeType::TypeAlias
            | NodeType::Property
            | NodeType::Variable
            | NodeType::Module => Genus::Cpp,
            NodeType::QmlType
            | NodeType::QmlModule
            | NodeType::QmlProperty
            | NodeType::QmlBasicType => Genus::Qml,
            NodeType::JsType | NodeType::JsModule | NodeType::JsProperty | NodeType::JsBasicType => {
                Genus::Js
            }
            NodeType::Page
            | NodeType::Example
            | NodeType::ExternalPage
            | NodeType::Group
            | NodeType::SharedComment
            | NodeType::Proxy => Genus::Doc,
        }
    }

    /// Class, struct and union share all classification behavior
    #[must_use]
    pub fn is_class_kind(self) -> bool {
        matches!(self, NodeType::Class | NodeType::Struct | NodeType::Union)
    }

    /// Kinds whose nodes hold non-owning member lists
    #[must_use]
    pub fn is_collection_kind(self) -> bool {
        matches!(
            self,
            NodeType::Group | NodeType::Module | NodeType::QmlModule | NodeType::JsModule
        )
    }
}

/// The language family a node belongs to
///
/// Derived from the kind at creation but independently mutable because
/// QML-versus-JS is sometimes discovered late.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genus {
    Cpp,
    Qml,
    Js,
    Doc,
    DontCare,
}

impl Genus {
    /// Genus filter used by child lookup; `DontCare` matches everything
    #[must_use]
    pub fn matches(self, other: Genus) -> bool {
        self == Genus::DontCare || other == Genus::DontCare || self == other
    }
}

/// C++ access specifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

/// Documentation status of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Active,
    Preliminary,
    Deprecated,
    Obsolete,
    Internal,
    DontDocument,
}

/// Thread safety classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadSafeness {
    #[default]
    Unspecified,
    NonReentrant,
    Reentrant,
    ThreadSafe,
}

/// What sort of page a documentation node produces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    #[default]
    NoPage,
    Api,
    Article,
    Example,
    Attribution,
}

/// A three-valued boolean for property flags whose default is inherited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagValue {
    #[default]
    Default,
    True,
    False,
}

impl FlagValue {
    /// Collapse to a boolean, using `default_value` when unspecified
    #[must_use]
    pub fn to_bool(self, default_value: bool) -> bool {
        match self {
            FlagValue::Default => default_value,
            FlagValue::True => true,
            FlagValue::False => false,
        }
    }

    /// Lift a boolean into an explicit flag value
    #[must_use]
    pub fn from_bool(value: bool) -> Self {
        if value {
            FlagValue::True
        } else {
            FlagValue::False
        }
    }
}

/// What kind of callable a function node is
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metaness {
    #[default]
    Plain,
    Signal,
    Slot,
    Ctor,
    CCtor,
    MCtor,
    Dtor,
    CAssign,
    MAssign,
    MacroWithParams,
    MacroWithoutParams,
    Native,
    QmlSignal,
    QmlSignalHandler,
    QmlMethod,
    JsSignal,
    JsSignalHandler,
    JsMethod,
}

impl Metaness {
    /// Constructors, destructors and assignment operators never take part in
    /// "documentation missing" checks
    #[must_use]
    pub fn is_special_member(self) -> bool {
        matches!(
            self,
            Metaness::Ctor
                | Metaness::CCtor
                | Metaness::MCtor
                | Metaness::Dtor
                | Metaness::CAssign
                | Metaness::MAssign
        )
    }
}

/// Virtual-ness of a member function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Virtualness {
    #[default]
    NonVirtual,
    NormalVirtual,
    PureVirtual,
}

/// Reference qualifier of a member function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefQualifier {
    #[default]
    None,
    LValue,
    RValue,
}

/// Role of a function relative to an associated property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyRole {
    Getter,
    Setter,
    Resetter,
    Notifier,
}

/// A base- or derived-class edge
///
/// Carries either a resolved node or the qualified path seen in source,
/// because the other class may not have been parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedClass {
    pub access: Access,
    pub node: Option<NodeId>,
    pub path: Vec<String>,
    pub signature: String,
}

impl RelatedClass {
    /// An edge to an already-resolved class
    #[must_use]
    pub fn resolved(access: Access, node: NodeId) -> Self {
        Self {
            access,
            node: Some(node),
            path: Vec::new(),
            signature: String::new(),
        }
    }

    /// An edge awaiting resolution
    #[must_use]
    pub fn unresolved(access: Access, path: Vec<String>, signature: String) -> Self {
        Self {
            access,
            node: None,
            path,
            signature,
        }
    }
}

/// A QML import statement attached to a QML type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRec {
    pub module_name: String,
    #[serde(default)]
    pub version: String,
}

/// One enumerator of an enum node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumItem {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub since: String,
}

/// Child storage shared by every node kind that owns children
#[derive(Debug, Clone, Default)]
pub struct AggregateData {
    /// Owned children in insertion order
    pub children: Vec<NodeId>,
    /// Non-function children by name; one name can map to several nodes of
    /// different genus
    pub(crate) nonfunction_map: BTreeMap<String, Vec<NodeId>>,
    /// Function children by name; position 0 is the primary overload
    pub(crate) function_map: BTreeMap<String, Vec<NodeId>>,
    /// Cached enum children for reverse enum-value lookup
    pub(crate) enum_children: Vec<NodeId>,
    /// Header files a user must include to use this aggregate
    pub include_files: Vec<String>,
    /// Children of other modules' proxy nodes that relate to this aggregate
    pub related_by_proxy: Vec<NodeId>,
}

/// Payload of a namespace node
#[derive(Debug, Clone, Default)]
pub struct NamespaceData {
    pub agg: AggregateData,
    /// Module whose index gets this namespace's documentation
    pub where_documented: Option<String>,
    /// Children contributed by same-named namespaces in other modules
    pub included_children: Vec<NodeId>,
}

/// Payload of a class, struct or union node
#[derive(Debug, Clone, Default)]
pub struct ClassData {
    pub agg: AggregateData,
    pub bases: Vec<RelatedClass>,
    pub derived: Vec<RelatedClass>,
    /// Bases removed because they were private, internal or duplicate
    pub ignored_bases: Vec<RelatedClass>,
    /// The QML type that instantiates this class, if any
    pub qml_element: Option<NodeId>,
    pub is_abstract: bool,
    pub is_wrapper: bool,
}

/// Payload of a header-file node
#[derive(Debug, Clone, Default)]
pub struct HeaderData {
    pub agg: AggregateData,
    pub title: String,
    pub subtitle: String,
}

/// Payload of page-like nodes (page, example, external page)
#[derive(Debug, Clone, Default)]
pub struct PageData {
    pub title: String,
    pub subtitle: String,
}

/// Payload of an enum node
#[derive(Debug, Clone, Default)]
pub struct EnumData {
    pub items: Vec<EnumItem>,
    /// The flags typedef wrapping this enum, if any
    pub flags_type: Option<NodeId>,
    pub is_scoped: bool,
}

/// Payload of a function node
#[derive(Debug, Clone, Default)]
pub struct FunctionData {
    pub metaness: Metaness,
    pub virtualness: Virtualness,
    pub is_const: bool,
    pub is_static: bool,
    pub ref_qualifier: RefQualifier,
    pub parameters: Parameters,
    pub return_type: String,
    /// Set by an `\overload` command before numbering runs
    pub overload_flag: bool,
    /// 0 for the primary, 1..n for the rest; assigned by normalization
    pub overload_number: u8,
    pub reimplemented_from: Option<NodeId>,
    /// Properties this function is an accessor of
    pub associated_properties: Vec<NodeId>,
}

impl FunctionData {
    /// True if the declaration ends with a C-style `...`
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|p| p.ty() == "...")
    }

    /// True if a trailing `QPrivateSignal` parameter was stripped
    #[must_use]
    pub fn is_private_signal(&self) -> bool {
        self.parameters.is_private_signal()
    }

    /// True for `\overload`-flagged or non-primary overloads
    #[must_use]
    pub fn is_overload(&self) -> bool {
        self.overload_flag || self.overload_number > 0
    }
}

/// Payload of a typedef or type-alias node
#[derive(Debug, Clone, Default)]
pub struct TypedefData {
    pub aliased_type: String,
    /// The enum this typedef wraps via Q_DECLARE_FLAGS, if any
    pub associated_enum: Option<NodeId>,
}

/// Payload of a property node
#[derive(Debug, Clone, Default)]
pub struct PropertyData {
    pub data_type: String,
    pub getters: Vec<NodeId>,
    pub setters: Vec<NodeId>,
    pub resetters: Vec<NodeId>,
    pub notifiers: Vec<NodeId>,
    pub stored: FlagValue,
    pub designable: FlagValue,
    pub scriptable: FlagValue,
    pub writable: FlagValue,
    pub user: FlagValue,
    pub is_constant: bool,
    pub is_required: bool,
    /// Base-class property whose unset flags this one inherits
    pub overridden_from: Option<NodeId>,
}

impl PropertyData {
    /// The accessor list for a role
    #[must_use]
    pub fn functions(&self, role: PropertyRole) -> &[NodeId] {
        match role {
            PropertyRole::Getter => &self.getters,
            PropertyRole::Setter => &self.setters,
            PropertyRole::Resetter => &self.resetters,
            PropertyRole::Notifier => &self.notifiers,
        }
    }

    /// Add an accessor for a role
    pub fn add_function(&mut self, function: NodeId, role: PropertyRole) {
        match role {
            PropertyRole::Getter => self.getters.push(function),
            PropertyRole::Setter => self.setters.push(function),
            PropertyRole::Resetter => self.resetters.push(function),
            PropertyRole::Notifier => self.notifiers.push(function),
        }
    }

    /// All accessors across all roles
    pub fn all_functions(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.getters
            .iter()
            .chain(&self.setters)
            .chain(&self.resetters)
            .chain(&self.notifiers)
            .copied()
    }
}

/// Payload of a variable node
#[derive(Debug, Clone, Default)]
pub struct VariableData {
    pub left_type: String,
    pub right_type: String,
    pub is_static: bool,
}

/// Payload of group/module/QML-module collections
#[derive(Debug, Clone, Default)]
pub struct CollectionData {
    /// Non-owning member references
    pub members: Vec<NodeId>,
    pub title: String,
    pub subtitle: String,
    pub logical_module_name: String,
    pub logical_module_version: String,
    /// True once the collection's own documentation comment was seen
    pub was_seen: bool,
}

impl CollectionData {
    /// Major component of the logical module version
    #[must_use]
    pub fn logical_module_version_major(&self) -> &str {
        self.logical_module_version
            .split('.')
            .next()
            .unwrap_or("")
    }
}

/// Payload of QML and JS type nodes
#[derive(Debug, Clone, Default)]
pub struct QmlTypeData {
    pub agg: AggregateData,
    /// Base type name as written; resolved to `qml_base_node` lazily
    pub qml_base_name: String,
    pub qml_base_node: Option<NodeId>,
    /// Name of the C++ class this QML type wraps, as written after
    /// `\instantiates`
    pub cpp_class_name: String,
    /// The C++ class this QML type wraps, if any
    pub class_node: Option<NodeId>,
    pub logical_module: Option<NodeId>,
    pub imports: Vec<ImportRec>,
    pub is_abstract: bool,
}

/// Payload of QML and JS property nodes
#[derive(Debug, Clone, Default)]
pub struct QmlPropertyData {
    pub data_type: String,
    pub read_only: FlagValue,
    pub is_required: bool,
    pub is_attached: bool,
}

/// Payload of a shared-comment node
#[derive(Debug, Clone, Default)]
pub struct SharedCommentData {
    /// The nodes documented by the one shared comment
    pub collective: Vec<NodeId>,
}

/// Payload of a proxy node standing in for another module's aggregate
#[derive(Debug, Clone, Default)]
pub struct ProxyData {
    pub agg: AggregateData,
    /// The module that really owns the proxied aggregate
    pub proxied_module: String,
}

/// Kind-specific payload of a node
#[derive(Debug, Clone)]
pub enum NodeData {
    Namespace(NamespaceData),
    Class(ClassData),
    Header(HeaderData),
    Page(PageData),
    Enum(EnumData),
    Function(FunctionData),
    Typedef(TypedefData),
    Property(PropertyData),
    Variable(VariableData),
    Collection(CollectionData),
    QmlType(QmlTypeData),
    QmlProperty(QmlPropertyData),
    SharedComment(SharedCommentData),
    Proxy(ProxyData),
}

impl NodeData {
    /// Default payload for a node kind
    #[must_use]
    pub fn for_type(node_type: NodeType) -> Self {
        match node_type {
            NodeType::Namespace => NodeData::Namespace(NamespaceData::default()),
            NodeType::Class | NodeType::Struct | NodeType::Union => {
                NodeData::Class(ClassData::default())
            }
            NodeType::HeaderFile => NodeData::Header(HeaderData::default()),
            NodeType::Page | NodeType::Example | NodeType::ExternalPage => {
                NodeData::Page(PageData::default())
            }
            NodeType::Enum => NodeData::Enum(EnumData::default()),
            NodeType::Function => NodeData::Function(FunctionData::default()),
            NodeType::Typedef | NodeType::TypeAlias => NodeData::Typedef(TypedefData::default()),
            NodeType::Property => NodeData::Property(PropertyData::default()),
            NodeType::Variable => NodeData::Variable(VariableData::default()),
            NodeType::Group | NodeType::Module | NodeType::QmlModule | NodeType::JsModule => {
                NodeData::Collection(CollectionData::default())
            }
            NodeType::QmlType
            | NodeType::QmlBasicType
            | NodeType::JsType
            | NodeType::JsBasicType => NodeData::QmlType(QmlTypeData::default()),
            NodeType::QmlProperty | NodeType::JsProperty => {
                NodeData::QmlProperty(QmlPropertyData::default())
            }
            NodeType::SharedComment => NodeData::SharedComment(SharedCommentData::default()),
            NodeType::Proxy => NodeData::Proxy(ProxyData::default()),
        }
    }
}

/// A node in the documentation graph
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    node_type: NodeType,
    pub name: String,
    pub access: Access,
    status: Status,
    pub genus: Genus,
    pub page_type: PageType,
    pub thread_safeness: ThreadSafeness,
    pub physical_module_name: String,
    pub since: String,
    /// Where the entity is declared, usually a header
    pub declaration_location: Location,
    /// Where its documentation comment is, usually an implementation file
    pub doc_location: Location,
    pub doc: Option<Doc>,
    /// True for nodes loaded from another module's index file
    pub is_index_node: bool,
    /// True if a doc was ever attached, even if since replaced
    pub had_doc: bool,
    /// True once adopted elsewhere via `\relates`
    pub is_related_nonmember: bool,
    /// The shared-comment node this node belongs to, if any
    pub shared_comment: Option<NodeId>,
    pub data: NodeData,
}

impl Node {
    /// Create a detached node; use the arena to allocate and attach it
    #[must_use]
    pub fn new(node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            id: NodeId(u32::MAX),
            parent: None,
            node_type,
            name: name.into(),
            access: Access::Public,
            status: Status::Active,
            genus: node_type.default_genus(),
            page_type: PageType::NoPage,
            thread_safeness: ThreadSafeness::Unspecified,
            physical_module_name: String::new(),
            since: String::new(),
            declaration_location: Location::empty(),
            doc_location: Location::empty(),
            doc: None,
            is_index_node: false,
            had_doc: false,
            is_related_nonmember: false,
            shared_comment: None,
            data: NodeData::for_type(node_type),
        }
    }

    /// This node's handle
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The owning parent, `None` only for tree roots
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's kind
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The node's own status, without parent derivation
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Set the status
    ///
    /// Obsolete is authoritative: a later attempt to soften it to Deprecated
    /// is ignored.
    pub fn set_status(&mut self, status: Status) {
        if self.status == Status::Obsolete && status == Status::Deprecated {
            return;
        }
        self.status = status;
    }

    /// Attach a doc, remembering that this node was ever documented
    pub fn set_doc(&mut self, doc: Doc) {
        self.doc_location = doc.location().clone();
        self.had_doc = true;
        self.doc = Some(doc);
    }

    /// Returns true if a non-empty doc is currently attached
    #[must_use]
    pub fn has_doc(&self) -> bool {
        self.doc.as_ref().is_some_and(|d| !d.is_empty())
    }

    // ===== Kind predicates =====

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.access == Access::Private
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access == Access::Public
    }

    /// Internal by the node's own status only; the arena-level check also
    /// derives internal-ness from ancestors
    #[must_use]
    pub fn is_status_internal(&self) -> bool {
        self.status == Status::Internal
    }

    #[must_use]
    pub fn is_dont_document(&self) -> bool {
        self.status == Status::DontDocument
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        matches!(self.status, Status::Deprecated | Status::Obsolete)
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        self.node_type == NodeType::Function
    }

    #[must_use]
    pub fn is_class_node(&self) -> bool {
        self.node_type.is_class_kind()
    }

    #[must_use]
    pub fn is_namespace(&self) -> bool {
        self.node_type == NodeType::Namespace
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.node_type == NodeType::Enum
    }

    #[must_use]
    pub fn is_typedef(&self) -> bool {
        matches!(self.node_type, NodeType::Typedef | NodeType::TypeAlias)
    }

    #[must_use]
    pub fn is_property(&self) -> bool {
        self.node_type == NodeType::Property
    }

    #[must_use]
    pub fn is_qml_type(&self) -> bool {
        matches!(self.node_type, NodeType::QmlType | NodeType::JsType)
    }

    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.node_type.is_collection_kind()
    }

    #[must_use]
    pub fn is_proxy(&self) -> bool {
        self.node_type == NodeType::Proxy
    }

    #[must_use]
    pub fn is_sharing_comment(&self) -> bool {
        self.shared_comment.is_some()
    }

    /// Returns true for kinds that can own children
    #[must_use]
    pub fn is_aggregate(&self) -> bool {
        self.as_aggregate().is_some()
    }

    // ===== Payload accessors =====

    /// Child storage, for kinds that own children
    #[must_use]
    pub fn as_aggregate(&self) -> Option<&AggregateData> {
        match &self.data {
            NodeData::Namespace(d) => Some(&d.agg),
            NodeData::Class(d) => Some(&d.agg),
            NodeData::Header(d) => Some(&d.agg),
            NodeData::QmlType(d) => Some(&d.agg),
            NodeData::Proxy(d) => Some(&d.agg),
            _ => None,
        }
    }

    /// Mutable child storage, for kinds that own children
    pub fn as_aggregate_mut(&mut self) -> Option<&mut AggregateData> {
        match &mut self.data {
            NodeData::Namespace(d) => Some(&mut d.agg),
            NodeData::Class(d) => Some(&mut d.agg),
            NodeData::Header(d) => Some(&mut d.agg),
            NodeData::QmlType(d) => Some(&mut d.agg),
            NodeData::Proxy(d) => Some(&mut d.agg),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionData> {
        match &self.data {
            NodeData::Function(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionData> {
        match &mut self.data {
            NodeData::Function(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassData> {
        match &self.data {
            NodeData::Class(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ClassData> {
        match &mut self.data {
            NodeData::Class(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_namespace(&self) -> Option<&NamespaceData> {
        match &self.data {
            NodeData::Namespace(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_namespace_mut(&mut self) -> Option<&mut NamespaceData> {
        match &mut self.data {
            NodeData::Namespace(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&EnumData> {
        match &self.data {
            NodeData::Enum(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_enum_mut(&mut self) -> Option<&mut EnumData> {
        match &mut self.data {
            NodeData::Enum(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_typedef(&self) -> Option<&TypedefData> {
        match &self.data {
            NodeData::Typedef(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_typedef_mut(&mut self) -> Option<&mut TypedefData> {
        match &mut self.data {
            NodeData::Typedef(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyData> {
        match &self.data {
            NodeData::Property(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyData> {
        match &mut self.data {
            NodeData::Property(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<&CollectionData> {
        match &self.data {
            NodeData::Collection(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut CollectionData> {
        match &mut self.data {
            NodeData::Collection(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_qml_type(&self) -> Option<&QmlTypeData> {
        match &self.data {
            NodeData::QmlType(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_qml_type_mut(&mut self) -> Option<&mut QmlTypeData> {
        match &mut self.data {
            NodeData::QmlType(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_shared_comment(&self) -> Option<&SharedCommentData> {
        match &self.data {
            NodeData::SharedComment(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_shared_comment_mut(&mut self) -> Option<&mut SharedCommentData> {
        match &mut self.data {
            NodeData::SharedComment(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_proxy(&self) -> Option<&ProxyData> {
        match &self.data {
            NodeData::Proxy(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_proxy_mut(&mut self) -> Option<&mut ProxyData> {
        match &mut self.data {
            NodeData::Proxy(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_monotonic_against_deprecated() {
        let mut node = Node::new(NodeType::Class, "QWidget");
        node.set_status(Status::Obsolete);
        node.set_status(Status::Deprecated);
        assert_eq!(node.status(), Status::Obsolete);

        node.set_status(Status::Active);
        assert_eq!(node.status(), Status::Active);
    }

    #[test]
    fn preliminary_then_obsolete_sticks() {
        let mut node = Node::new(NodeType::Function, "draw");
        node.set_status(Status::Preliminary);
        node.set_status(Status::Obsolete);
        node.set_status(Status::Deprecated);
        assert_eq!(node.status(), Status::Obsolete);
    }

    #[test]
    fn default_genus_follows_kind() {
        assert_eq!(Node::new(NodeType::Class, "C").genus, Genus::Cpp);
        assert_eq!(Node::new(NodeType::QmlType, "Item").genus, Genus::Qml);
        assert_eq!(Node::new(NodeType::Page, "intro").genus, Genus::Doc);
    }

    #[test]
    fn genus_matching() {
        assert!(Genus::DontCare.matches(Genus::Cpp));
        assert!(Genus::Cpp.matches(Genus::DontCare));
        assert!(Genus::Cpp.matches(Genus::Cpp));
        assert!(!Genus::Qml.matches(Genus::Js));
        assert!(!Genus::Cpp.matches(Genus::Qml));
    }

    #[test]
    fn aggregate_payloads() {
        assert!(Node::new(NodeType::Namespace, "Qt").is_aggregate());
        assert!(Node::new(NodeType::Struct, "Point").is_aggregate());
        assert!(Node::new(NodeType::QmlBasicType, "string").is_aggregate());
        assert!(!Node::new(NodeType::Function, "f").is_aggregate());
        assert!(!Node::new(NodeType::Group, "widgets").is_aggregate());
    }

    #[test]
    fn flag_value_collapse() {
        assert!(FlagValue::Default.to_bool(true));
        assert!(!FlagValue::Default.to_bool(false));
        assert!(FlagValue::True.to_bool(false));
        assert!(!FlagValue::False.to_bool(true));
    }

    #[test]
    fn variadic_detection() {
        let mut data = FunctionData {
            parameters: crate::params::Parameters::parse("const char *format, ..."),
            ..FunctionData::default()
        };
        assert!(data.is_variadic());
        data.parameters = crate::params::Parameters::parse("int x");
        assert!(!data.is_variadic());
    }
}
