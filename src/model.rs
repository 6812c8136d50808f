//! Input data model — the CLI/service metadata a build documents.
//!
//! Everything here is plain data handed in by the caller: a provider with
//! its services, a service with its operations, an operation with its
//! parameters and value schemas, plus the per-build help context. The
//! generator never validates this metadata; it renders what it is given.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::document::RstDocument;
use crate::events::EventClass;
use crate::style::RstStyle;

/// CLI type names treated as scalar leaves.
pub const SCALAR_TYPE_NAMES: &[&str] = &[
    "string",
    "integer",
    "long",
    "boolean",
    "timestamp",
    "float",
    "double",
    "blob",
];

/// Scalar leaf kinds a schema can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Integer,
    Long,
    Boolean,
    Timestamp,
    Float,
    Double,
    Blob,
}

impl ScalarKind {
    /// Bare type name as it appears in rendered docs.
    pub fn type_name(self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Long => "long",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Blob => "blob",
        }
    }
}

/// Structural description of a value shape.
///
/// Nesting must be finite; the model carries no cycle detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaNode {
    /// A leaf value, optionally restricted to an enumerated set.
    Scalar {
        kind: ScalarKind,
        #[serde(default)]
        choices: Vec<String>,
    },
    /// Homogeneous sequence.
    List { member: Box<SchemaNode> },
    /// Open key/value mapping.
    Map {
        key: KeySpec,
        member: Box<SchemaNode>,
    },
    /// Fixed member set; declaration order is rendering order.
    Structure { members: Vec<Member> },
}

impl SchemaNode {
    pub fn is_scalar(&self) -> bool {
        matches!(self, SchemaNode::Scalar { .. })
    }

    /// Variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SchemaNode::Scalar { .. } => "scalar",
            SchemaNode::List { .. } => "list",
            SchemaNode::Map { .. } => "map",
            SchemaNode::Structure { .. } => "structure",
        }
    }
}

/// Key shape of a map schema.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySpec {
    pub kind: ScalarKind,
    #[serde(default)]
    pub choices: Vec<String>,
}

/// One named member of a structure schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(flatten)]
    pub node: SchemaNode,
}

/// Shorthand-syntax generator hook attached to a parameter by outer
/// tooling. Produces the compact alternate form shown next to the JSON
/// example; the generator itself is opaque to this crate.
pub type ExampleFn = fn(&Param) -> String;

/// An operation parameter: internal name, CLI spelling, value schema.
#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    pub name: String,
    pub cli_name: String,
    #[serde(default)]
    pub documentation: String,
    pub schema: SchemaNode,
    #[serde(skip)]
    pub example_fn: Option<ExampleFn>,
}

/// One entry of a help context's argument table.
#[derive(Debug, Clone, Deserialize)]
pub struct Argument {
    /// CLI spelling, e.g. `--instance-ids`.
    pub cli_name: String,
    /// CLI-facing type tag, e.g. `string`, `list`, `structure`.
    pub cli_type_name: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub required: bool,
    /// Arguments sharing a group name are documented collectively.
    #[serde(default)]
    pub group_name: Option<String>,
    /// Link back to the parameter and its schema, when the argument maps
    /// to one.
    #[serde(default)]
    pub argument_object: Option<Param>,
}

impl Argument {
    pub fn is_scalar_type(&self) -> bool {
        SCALAR_TYPE_NAMES.contains(&self.cli_type_name.as_str())
    }

    pub fn is_boolean(&self) -> bool {
        self.cli_type_name == "boolean"
    }
}

/// Top-level program: owns services, global options, and usage prose.
#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub synopsis: String,
    /// Usage prose shown under the synopsis.
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub services: Vec<Service>,
}

/// One service: a named group of operations.
#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub name: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

/// One operation of a service.
#[derive(Debug, Clone, Deserialize)]
pub struct Operation {
    /// Internal identifier, e.g. `ListItems`.
    pub name: String,
    /// CLI spelling, e.g. `list-items`.
    pub cli_name: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub params: Vec<Param>,
    /// Server-side result filters, documented in an appendix. Keyed by
    /// filter name; BTreeMap keeps the appendix order stable.
    #[serde(default)]
    pub filters: Option<BTreeMap<String, Filter>>,
}

/// A single result filter of an operation.
#[derive(Debug, Clone, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub documentation: Option<String>,
    #[serde(default)]
    pub choices: Option<Vec<String>>,
}

/// The object a build documents.
#[derive(Debug, Clone)]
pub enum DocTarget {
    Provider(Provider),
    Service(Service),
    Operation(Operation),
}

impl DocTarget {
    pub fn name(&self) -> &str {
        match self {
            DocTarget::Provider(provider) => &provider.name,
            DocTarget::Service(service) => &service.name,
            DocTarget::Operation(operation) => &operation.name,
        }
    }

    pub fn event_class(&self) -> EventClass {
        match self {
            DocTarget::Provider(_) => EventClass::Provider,
            DocTarget::Service(_) => EventClass::Service,
            DocTarget::Operation(_) => EventClass::Operation,
        }
    }
}

/// Everything one documentation build needs: the documented object, its
/// argument table, and the output buffer. Created once per build; the
/// buffer is finalized exactly once at the end.
#[derive(Debug)]
pub struct HelpContext {
    /// Display name of the documented command.
    pub name: String,
    pub description: String,
    pub synopsis: String,
    /// Argument id → argument, in table order. Events fire per entry in
    /// this order.
    pub arg_table: IndexMap<String, Argument>,
    pub obj: DocTarget,
    pub event_class: EventClass,
    pub doc: RstDocument,
    pub style: RstStyle,
}

impl HelpContext {
    /// Context with an empty argument table and a man-target buffer. The
    /// event class is derived from the documented object.
    pub fn new(name: impl Into<String>, obj: DocTarget) -> Self {
        let event_class = obj.event_class();
        HelpContext {
            name: name.into(),
            description: String::new(),
            synopsis: String::new(),
            arg_table: IndexMap::new(),
            obj,
            event_class,
            doc: RstDocument::default(),
            style: RstStyle::new(),
        }
    }
}
