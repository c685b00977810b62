// Normalized declaration model. Everything downstream of `lower` reads this,
// never the raw tree, except for type syntax that is resolved lazily.

use serde::Serialize;
use crate::raw::RawType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    Struct,
    Class,
    Enum,
    Protocol,
}

impl DeclKind {
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "struct" => Some(DeclKind::Struct),
            "class" => Some(DeclKind::Class),
            "enum" => Some(DeclKind::Enum),
            "protocol" => Some(DeclKind::Protocol),
            _ => None,
        }
    }
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Struct => "struct",
            DeclKind::Class => "class",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
        }
    }
}

/// Visibility propagated onto every generated function. A `private`
/// declaration never gets this far (see `lower::access_level`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Public,
    #[default]
    Internal,
}

impl AccessLevel {
    /// Prefix for a generated signature, trailing space included.
    pub fn prefix(self) -> &'static str {
        match self {
            AccessLevel::Public => "public ",
            AccessLevel::Internal => "",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeDeclaration {
    pub kind: DeclKind,
    pub name: String,
    pub access: AccessLevel,
    pub body: DeclBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DeclBody {
    /// struct- and class-like declarations
    Record(Members),
    Enum(EnumCaseSet),
    /// recognized, never analyzed
    Opaque,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Members {
    pub properties: Vec<Property>,
    pub initializers: Vec<Initializer>,
}

impl Members {
    /// Stored, instance-level, non-private properties in declaration order.
    pub fn properties_to_initialize(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter().filter(|p| p.is_initializable())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub name: String,
    /// `None` when the declaration has no type annotation
    pub ty: Option<RawType>,
    pub is_computed: bool,
    pub is_static: bool,
    pub is_private: bool,
}

impl Property {
    pub fn is_initializable(&self) -> bool {
        !self.is_computed && !self.is_static && !self.is_private
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Initializer {
    pub parameters: Vec<InitParam>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitParam {
    /// external label, `_` for positional
    pub label: String,
    /// internal name
    pub name: String,
    pub ty: RawType,
}

/// A generated `makeRandomWith` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub label: String,
    pub ty: TypeExpr,
}

impl Parameter {
    pub fn is_positional(&self) -> bool {
        self.label == "_"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumCaseSet {
    cases: Vec<EnumCase>,
}

impl EnumCaseSet {
    /// `None` for an empty case list.
    pub fn new(cases: Vec<EnumCase>) -> Option<Self> {
        if cases.is_empty() { None } else { Some(EnumCaseSet { cases }) }
    }
    pub fn cases(&self) -> &[EnumCase] {
        &self.cases
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumCase {
    pub name: String,
    pub associated_values: Vec<AssociatedValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssociatedValue {
    pub label: Option<String>,
    pub ty: RawType,
}

impl AssociatedValue {
    /// Label to use at the construction site; `_` means positional.
    pub fn call_label(&self) -> Option<&str> {
        self.label.as_deref().filter(|label| *label != "_")
    }
}

/// Resolved type expression. Only these five shapes have a canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TypeExpr {
    Identifier { name: String },
    Array { element: Box<TypeExpr> },
    Optional { wrapped: Box<TypeExpr> },
    Dictionary { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// at least two elements
    Tuple { elements: Vec<TypeExpr> },
}
