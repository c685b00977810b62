//! Type-expression resolution: raw type syntax -> [`TypeExpr`] -> canonical text.
use crate::diagnostics::ExpansionError;
use crate::ir::TypeExpr;
use crate::raw::RawType;

/// Lower raw syntax into one of the five canonical shapes.
///
/// Children are resolved before their parent; the first unsupported node
/// anywhere in the tree fails the whole expression and is named in the error.
pub fn lower_type(raw: &RawType) -> Result<TypeExpr, ExpansionError> {
    match raw {
        RawType::Identifier { name } => Ok(TypeExpr::Identifier { name: name.clone() }),
        RawType::Array { element } => Ok(TypeExpr::Array {
            element: Box::new(lower_type(element)?),
        }),
        RawType::Optional { wrapped } => Ok(TypeExpr::Optional {
            wrapped: Box::new(lower_type(wrapped)?),
        }),
        RawType::Dictionary { key, value } => Ok(TypeExpr::Dictionary {
            key: Box::new(lower_type(key)?),
            value: Box::new(lower_type(value)?),
        }),
        // `(T)` is just T
        RawType::Tuple { elements } if elements.len() == 1 => lower_type(&elements[0]),
        RawType::Tuple { elements } if elements.len() >= 2 => {
            let elements = elements.iter().map(lower_type).collect::<Result<Vec<_>, _>>()?;
            Ok(TypeExpr::Tuple { elements })
        }
        unsupported => Err(unsupported_type(unsupported)),
    }
}

pub fn unsupported_type(raw: &RawType) -> ExpansionError {
    ExpansionError::UnsupportedTypeExpression { ty: raw.to_string() }
}

/// Resolve raw syntax straight to its canonical text.
pub fn resolve(raw: &RawType) -> Result<String, ExpansionError> {
    lower_type(raw).map(|ty| ty.render())
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Identifier { name: name.into() }
    }

    /// Canonical text: `T`, `[T]`, `T?`, `[K: V]`, `(A, B)`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        match self {
            TypeExpr::Identifier { name } => out.push_str(name),
            TypeExpr::Array { element } => {
                out.push('[');
                element.render_into(out);
                out.push(']');
            }
            TypeExpr::Optional { wrapped } => {
                wrapped.render_into(out);
                out.push('?');
            }
            TypeExpr::Dictionary { key, value } => {
                out.push('[');
                key.render_into(out);
                out.push_str(": ");
                value.render_into(out);
                out.push(']');
            }
            TypeExpr::Tuple { elements } => {
                out.push('(');
                for (ix, element) in elements.iter().enumerate() {
                    if ix > 0 {
                        out.push_str(", ");
                    }
                    element.render_into(out);
                }
                out.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_shape() {
        assert_eq!(resolve(&RawType::ident("Int")).unwrap(), "Int");
        assert_eq!(resolve(&RawType::array(RawType::ident("String"))).unwrap(), "[String]");
        assert_eq!(resolve(&RawType::optional(RawType::ident("Date"))).unwrap(), "Date?");
        assert_eq!(
            resolve(&RawType::dictionary(RawType::ident("String"), RawType::ident("Int"))).unwrap(),
            "[String: Int]"
        );
        assert_eq!(
            resolve(&RawType::tuple(vec![RawType::ident("Int"), RawType::ident("Bool")])).unwrap(),
            "(Int, Bool)"
        );
    }

    #[test]
    fn nested_dictionary_of_arrays() {
        let raw = RawType::dictionary(RawType::ident("Int"), RawType::array(RawType::ident("Segment")));
        assert_eq!(resolve(&raw).unwrap(), "[Int: [Segment]]");
    }

    #[test]
    fn deep_nesting_composes_inside_out() {
        let raw = RawType::optional(RawType::array(RawType::optional(RawType::tuple(vec![
            RawType::ident("Int"),
            RawType::dictionary(RawType::ident("String"), RawType::ident("Double")),
        ]))));
        assert_eq!(resolve(&raw).unwrap(), "[(Int, [String: Double])?]?");
    }

    #[test]
    fn unsupported_leaf_fails_whole_expression_and_names_the_leaf() {
        let raw = RawType::array(RawType::Opaque { constraint: Box::new(RawType::ident("View")) });
        assert_eq!(
            resolve(&raw),
            Err(ExpansionError::UnsupportedTypeExpression { ty: "some View".into() })
        );
        let member = RawType::Member { base: Box::new(RawType::ident("Flight")), name: "Segment".into() };
        assert!(resolve(&member).is_err());
    }

    #[test]
    fn single_element_tuple_is_parenthesised_sugar() {
        let raw = RawType::tuple(vec![RawType::ident("Int")]);
        assert_eq!(resolve(&raw).unwrap(), "Int");
        assert!(resolve(&RawType::tuple(vec![])).is_err());
    }

    #[test]
    fn tuple_keeps_components_containing_commas_whole() {
        let nested = lower_type(&RawType::tuple(vec![
            RawType::ident("A"),
            RawType::dictionary(RawType::ident("K"), RawType::ident("V")),
        ]))
        .unwrap();
        let TypeExpr::Tuple { elements } = &nested else { panic!("expected tuple") };
        assert_eq!(elements.len(), 2);
        assert_eq!(nested.render(), "(A, [K: V])");
    }
}
