//! Raw declaration -> normalized [`TypeDeclaration`].
//!
//! Only declaration-level problems fail here. Member types are carried over
//! unresolved; bad ones are dropped later, one at a time.
use crate::diagnostics::ExpansionError;
use crate::ir::{
    AccessLevel, AssociatedValue, DeclBody, DeclKind, EnumCase, EnumCaseSet, InitParam, Initializer,
    Members, Property, TypeDeclaration,
};
use crate::raw::{RawDecl, RawMember};

pub fn normalize(raw: &RawDecl) -> Result<TypeDeclaration, ExpansionError> {
    let kind = DeclKind::parse(&raw.kind).ok_or_else(|| ExpansionError::UnsupportedDeclarationKind {
        kind: raw.kind.clone(),
    })?;
    let access = access_level(&raw.name, &raw.modifiers)?;
    let body = match kind {
        DeclKind::Struct | DeclKind::Class => DeclBody::Record(collect_members(&raw.members)),
        DeclKind::Enum => {
            let cases = EnumCaseSet::new(collect_cases(&raw.members)).ok_or(ExpansionError::EnumWithNoCases)?;
            DeclBody::Enum(cases)
        }
        DeclKind::Protocol => DeclBody::Opaque,
    };
    Ok(TypeDeclaration { kind, name: raw.name.clone(), access, body })
}

/// `private` anywhere on the declaration rejects it; otherwise `public`
/// (or `open`) wins over the internal default.
pub fn access_level(name: &str, modifiers: &[String]) -> Result<AccessLevel, ExpansionError> {
    let mut level = AccessLevel::Internal;
    for modifier in modifiers {
        match modifier.as_str() {
            "private" => {
                return Err(ExpansionError::PrivateDeclarationRejected { name: name.to_string() });
            }
            "public" | "open" => level = AccessLevel::Public,
            _ => {}
        }
    }
    Ok(level)
}

fn collect_members(members: &[RawMember]) -> Members {
    let mut out = Members::default();
    for member in members {
        match member {
            RawMember::Property { name, ty, modifiers, computed } => out.properties.push(Property {
                name: name.clone(),
                ty: ty.clone(),
                is_computed: *computed,
                is_static: modifiers.iter().any(|m| m == "static" || m == "class"),
                is_private: modifiers.iter().any(|m| is_private_modifier(m)),
            }),
            RawMember::Initializer { parameters } => out.initializers.push(Initializer {
                parameters: parameters
                    .iter()
                    .map(|p| InitParam {
                        label: p.first_name.clone(),
                        name: p.second_name.clone().unwrap_or_else(|| p.first_name.clone()),
                        ty: p.ty.clone(),
                    })
                    .collect(),
            }),
            RawMember::Case { .. } | RawMember::Other => {}
        }
    }
    out
}

// `private(set)` included
fn is_private_modifier(modifier: &str) -> bool {
    modifier == "private" || modifier.starts_with("private(")
}

fn collect_cases(members: &[RawMember]) -> Vec<EnumCase> {
    members
        .iter()
        .filter_map(|member| match member {
            RawMember::Case { elements } => Some(elements),
            _ => None,
        })
        .flatten()
        .map(|element| EnumCase {
            name: element.name.clone(),
            associated_values: element
                .associated_values
                .iter()
                .map(|value| AssociatedValue { label: value.label.clone(), ty: value.ty.clone() })
                .collect(),
        })
        .collect()
}
