//! Factory synthesis from the normalized model.
//!
//! Produces [`FunctionDecl`]s; turning them into text is `codegen`'s job.
use serde::Serialize;

use crate::config::{CallStyle, ExpansionConfig};
use crate::diagnostics::{Diagnostics, Location};
use crate::ir::{AccessLevel, DeclKind, EnumCaseSet, Parameter, TypeExpr};
use crate::resolve::lower_type;

pub const MAKE_RANDOM: &str = "makeRandom";
pub const MAKE_RANDOM_WITH: &str = "makeRandomWith";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    pub access: AccessLevel,
    pub name: String,
    pub params: Vec<FnParam>,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FnParam {
    pub name: String,
    pub ty: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum Body {
    /// `callee(label: value, value, ...)`
    Construct { callee: String, args: Vec<Arg> },
    /// `makeRandomWith()`
    Delegate { callee: String },
    /// `[a, b, c].randomElement()!`
    PickUniformly { choices: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arg {
    /// `None` for positional arguments
    pub label: Option<String>,
    pub value: String,
}

/// The single place deciding how a random value of `ty` is written.
pub fn random_expr(ty: &TypeExpr, config: &ExpansionConfig) -> String {
    let method = &config.random_method;
    match (ty, config.call_style) {
        (TypeExpr::Tuple { elements }, _) => {
            let parts = elements.iter().map(|e| random_expr(e, config)).collect::<Vec<_>>();
            format!("({})", parts.join(", "))
        }
        (_, CallStyle::ImplicitMember) => format!(".{method}()"),
        (TypeExpr::Optional { wrapped }, CallStyle::Qualified) => {
            format!("Optional<{}>.{method}()", wrapped.render())
        }
        (_, CallStyle::Qualified) => format!("{}.{method}()", ty.render()),
    }
}

/// `makeRandomWith` plus the zero-argument `makeRandom` delegating to it.
pub fn record_factories(
    kind: DeclKind,
    access: AccessLevel,
    params: &[Parameter],
    config: &ExpansionConfig,
) -> Vec<FunctionDecl> {
    let callee = match kind {
        DeclKind::Class => "self.init",
        _ => ".init",
    };
    let make_random_with = FunctionDecl {
        access,
        name: MAKE_RANDOM_WITH.to_string(),
        params: params
            .iter()
            .map(|p| FnParam { name: p.name.clone(), ty: p.ty.render(), default: random_expr(&p.ty, config) })
            .collect(),
        body: Body::Construct {
            callee: callee.to_string(),
            args: params
                .iter()
                .map(|p| Arg {
                    label: if p.is_positional() { None } else { Some(p.label.clone()) },
                    value: p.name.clone(),
                })
                .collect(),
        },
    };
    let make_random = FunctionDecl {
        access,
        name: MAKE_RANDOM.to_string(),
        params: Vec::new(),
        body: Body::Delegate { callee: MAKE_RANDOM_WITH.to_string() },
    };
    vec![make_random_with, make_random]
}

/// Single `makeRandom` choosing uniformly among every case.
pub fn enum_factory(
    access: AccessLevel,
    cases: &EnumCaseSet,
    config: &ExpansionConfig,
    at: &Location,
    diagnostics: &mut Diagnostics,
) -> FunctionDecl {
    let choices = cases
        .cases()
        .iter()
        .map(|case| {
            if case.associated_values.is_empty() {
                return format!(".{}", case.name);
            }
            let at = at.child(&case.name);
            let mut args = Vec::with_capacity(case.associated_values.len());
            for (ix, value) in case.associated_values.iter().enumerate() {
                match lower_type(&value.ty) {
                    Ok(ty) => {
                        let expr = random_expr(&ty, config);
                        args.push(match value.call_label() {
                            Some(label) => format!("{label}: {expr}"),
                            None => expr,
                        });
                    }
                    Err(error) => {
                        let segment = value.call_label().map(str::to_string).unwrap_or_else(|| ix.to_string());
                        diagnostics.report(error, at.child(segment));
                    }
                }
            }
            // every value dropped still leaves `.name()`; the diagnostics flag it
            format!(".{}({})", case.name, args.join(", "))
        })
        .collect();
    FunctionDecl {
        access,
        name: MAKE_RANDOM.to_string(),
        params: Vec::new(),
        body: Body::PickUniformly { choices },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AssociatedValue, EnumCase};
    use crate::raw::RawType;

    fn param(label: &str, name: &str, ty: TypeExpr) -> Parameter {
        Parameter { name: name.into(), label: label.into(), ty }
    }

    #[test]
    fn random_expr_qualified_and_implicit() {
        let config = ExpansionConfig::default();
        let dict = TypeExpr::Dictionary {
            key: Box::new(TypeExpr::ident("Int")),
            value: Box::new(TypeExpr::Array { element: Box::new(TypeExpr::ident("Segment")) }),
        };
        assert_eq!(random_expr(&TypeExpr::ident("Int"), &config), "Int.random()");
        assert_eq!(random_expr(&dict, &config), "[Int: [Segment]].random()");
        let optional = TypeExpr::Optional { wrapped: Box::new(TypeExpr::ident("Date")) };
        assert_eq!(random_expr(&optional, &config), "Optional<Date>.random()");

        let implicit = ExpansionConfig {
            random_method: "makeRandom".into(),
            call_style: CallStyle::ImplicitMember,
            ..ExpansionConfig::default()
        };
        assert_eq!(random_expr(&dict, &implicit), ".makeRandom()");
    }

    #[test]
    fn tuple_default_has_one_expression_per_element() {
        let config = ExpansionConfig::default();
        let tuple = TypeExpr::Tuple {
            elements: vec![
                TypeExpr::ident("Int"),
                TypeExpr::Dictionary { key: Box::new(TypeExpr::ident("K")), value: Box::new(TypeExpr::ident("V")) },
            ],
        };
        assert_eq!(random_expr(&tuple, &config), "(Int.random(), [K: V].random())");
    }

    #[test]
    fn struct_call_passes_positional_without_label() {
        let params = [param("_", "id", TypeExpr::ident("Int")), param("name", "name", TypeExpr::ident("String"))];
        let fns = record_factories(DeclKind::Struct, AccessLevel::Internal, &params, &ExpansionConfig::default());
        assert_eq!(fns.len(), 2);
        let Body::Construct { callee, args } = &fns[0].body else { panic!("expected construct body") };
        assert_eq!(callee, ".init");
        assert_eq!(args[0], Arg { label: None, value: "id".into() });
        assert_eq!(args[1], Arg { label: Some("name".into()), value: "name".into() });
        assert_eq!(fns[0].params[0].name, "id");
    }

    #[test]
    fn make_random_only_delegates() {
        let params = [param("id", "id", TypeExpr::ident("Int"))];
        let fns = record_factories(DeclKind::Class, AccessLevel::Public, &params, &ExpansionConfig::default());
        let Body::Construct { callee, .. } = &fns[0].body else { panic!("expected construct body") };
        assert_eq!(callee, "self.init");
        assert_eq!(fns[1].name, MAKE_RANDOM);
        assert!(fns[1].params.is_empty());
        assert_eq!(fns[1].body, Body::Delegate { callee: MAKE_RANDOM_WITH.into() });
        assert!(fns.iter().all(|f| f.access == AccessLevel::Public));
    }

    #[test]
    fn enum_choices_cover_every_case() {
        let cases = EnumCaseSet::new(vec![
            EnumCase { name: "flight".into(), associated_values: vec![] },
            EnumCase {
                name: "car".into(),
                associated_values: vec![
                    AssociatedValue { label: Some("seats".into()), ty: RawType::ident("Int") },
                    AssociatedValue { label: Some("_".into()), ty: RawType::ident("String") },
                ],
            },
        ])
        .unwrap();
        let mut diags = Diagnostics::new();
        let f = enum_factory(AccessLevel::Internal, &cases, &ExpansionConfig::default(), &Location::decl("Service"), &mut diags);
        assert!(diags.is_empty());
        let Body::PickUniformly { choices } = f.body else { panic!("expected pick body") };
        assert_eq!(choices, [".flight", ".car(seats: Int.random(), String.random())"]);
    }

    #[test]
    fn bad_associated_value_is_dropped_and_reported() {
        let cases = EnumCaseSet::new(vec![EnumCase {
            name: "custom".into(),
            associated_values: vec![
                AssociatedValue { label: None, ty: RawType::Unknown },
                AssociatedValue { label: Some("id".into()), ty: RawType::ident("Int") },
            ],
        }])
        .unwrap();
        let mut diags = Diagnostics::new();
        let f = enum_factory(AccessLevel::Internal, &cases, &ExpansionConfig::default(), &Location::decl("E"), &mut diags);
        let Body::PickUniformly { choices } = f.body else { panic!("expected pick body") };
        assert_eq!(choices, [".custom(id: Int.random())"]);
        assert_eq!(diags.iter().next().unwrap().at.to_string(), "E.custom.0");
    }

    #[test]
    fn case_with_every_value_dropped_keeps_empty_call() {
        let cases = EnumCaseSet::new(vec![
            EnumCase { name: "none".into(), associated_values: vec![] },
            EnumCase {
                name: "handler".into(),
                associated_values: vec![AssociatedValue { label: Some("run".into()), ty: RawType::Unknown }],
            },
        ])
        .unwrap();
        let mut diags = Diagnostics::new();
        let f = enum_factory(AccessLevel::Internal, &cases, &ExpansionConfig::default(), &Location::decl("E"), &mut diags);
        let Body::PickUniformly { choices } = f.body else { panic!("expected pick body") };
        assert_eq!(choices, [".none", ".handler()"]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().unwrap().at.to_string(), "E.handler.run");
    }
}
