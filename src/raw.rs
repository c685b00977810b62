//! Host-supplied declaration tree, as decoded from JSON.
//!
//! Nothing here is validated: kinds are free text, types may be shapes the
//! engine cannot handle. `lower` decides what is acceptable.
use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDecl {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub members: Vec<RawMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "snake_case")]
pub enum RawMember {
    Property {
        name: String,
        #[serde(rename = "type", default)]
        ty: Option<RawType>,
        #[serde(default)]
        modifiers: Vec<String>,
        /// has an accessor block (`{ get }`, `{ "" }`, ...)
        #[serde(default)]
        computed: bool,
    },
    Initializer {
        #[serde(default)]
        parameters: Vec<RawParam>,
    },
    Case {
        elements: Vec<RawCase>,
    },
    /// functions, subscripts, nested types, ...
    #[serde(other)]
    Other,
}

/// Initializer parameter: `first_name second_name: type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParam {
    pub first_name: String,
    #[serde(default)]
    pub second_name: Option<String>,
    #[serde(rename = "type")]
    pub ty: RawType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCase {
    pub name: String,
    #[serde(default)]
    pub associated_values: Vec<RawAssociatedValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAssociatedValue {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub ty: RawType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawType {
    Identifier { name: String },
    Array { element: Box<RawType> },
    Optional { wrapped: Box<RawType> },
    Dictionary { key: Box<RawType>, value: Box<RawType> },
    Tuple { elements: Vec<RawType> },

    // shapes a host may send that have no canonical form
    Member { base: Box<RawType>, name: String },
    Function { parameters: Vec<RawType>, result: Box<RawType> },
    #[serde(rename = "some")]
    Opaque { constraint: Box<RawType> },
    #[serde(rename = "any")]
    Existential { constraint: Box<RawType> },
    ImplicitlyUnwrapped { wrapped: Box<RawType> },
    Metatype { base: Box<RawType> },
    #[serde(other)]
    Unknown,
}

impl RawType {
    pub fn ident(name: impl Into<String>) -> Self {
        RawType::Identifier { name: name.into() }
    }
    pub fn array(element: RawType) -> Self {
        RawType::Array { element: Box::new(element) }
    }
    pub fn optional(wrapped: RawType) -> Self {
        RawType::Optional { wrapped: Box::new(wrapped) }
    }
    pub fn dictionary(key: RawType, value: RawType) -> Self {
        RawType::Dictionary { key: Box::new(key), value: Box::new(value) }
    }
    pub fn tuple(elements: Vec<RawType>) -> Self {
        RawType::Tuple { elements }
    }
}

/// Source-like rendering, for diagnostics only.
impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawType::Identifier { name } => write!(f, "{name}"),
            RawType::Array { element } => write!(f, "[{element}]"),
            RawType::Optional { wrapped } => write!(f, "{wrapped}?"),
            RawType::Dictionary { key, value } => write!(f, "[{key}: {value}]"),
            RawType::Tuple { elements } => {
                write!(f, "(")?;
                write_list(f, elements)?;
                write!(f, ")")
            }
            RawType::Member { base, name } => write!(f, "{base}.{name}"),
            RawType::Function { parameters, result } => {
                write!(f, "(")?;
                write_list(f, parameters)?;
                write!(f, ") -> {result}")
            }
            RawType::Opaque { constraint } => write!(f, "some {constraint}"),
            RawType::Existential { constraint } => write!(f, "any {constraint}"),
            RawType::ImplicitlyUnwrapped { wrapped } => write!(f, "{wrapped}!"),
            RawType::Metatype { base } => write!(f, "{base}.Type"),
            RawType::Unknown => write!(f, "<unknown type syntax>"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, xs: &[RawType]) -> fmt::Result {
    for (ix, x) in xs.iter().enumerate() {
        if ix > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{x}")?;
    }
    Ok(())
}
