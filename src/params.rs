//! Parameter extraction for struct- and class-like declarations.
use crate::diagnostics::{Diagnostic, Diagnostics, ExpansionError, Location};
use crate::ir::{Initializer, Members, Parameter, Property};
use crate::resolve::lower_type;

/// Where the generated parameters come from. Exactly one source is used.
#[derive(Debug, Clone, Copy)]
pub enum ParameterSource<'a> {
    /// the first declared initializer
    Initializer(&'a Initializer),
    /// no initializer: the memberwise candidates
    Properties(&'a Members),
}

pub fn select_source(members: &Members) -> ParameterSource<'_> {
    match members.initializers.first() {
        Some(init) => ParameterSource::Initializer(init),
        None => ParameterSource::Properties(members),
    }
}

/// Convert every candidate, keeping the good ones in order and reporting the rest.
pub fn extract_parameters(members: &Members, at: &Location, diagnostics: &mut Diagnostics) -> Vec<Parameter> {
    let results: Vec<Result<Parameter, Diagnostic>> = match select_source(members) {
        ParameterSource::Initializer(init) => {
            let at = at.child("init");
            init.parameters
                .iter()
                .enumerate()
                .map(|(ix, p)| {
                    let name = binding_name(&p.name, ix);
                    lower_type(&p.ty)
                        .map(|ty| Parameter { name: name.clone(), label: p.label.clone(), ty })
                        .map_err(|error| Diagnostic { error, at: at.child(name) })
                })
                .collect()
        }
        ParameterSource::Properties(members) => members
            .properties_to_initialize()
            .map(|p| property_parameter(p).map_err(|error| Diagnostic { error, at: at.child(&p.name) }))
            .collect(),
    };

    let mut params = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(param) => params.push(param),
            Err(Diagnostic { error, at }) => diagnostics.report(error, at),
        }
    }
    params
}

/// `init(_: Int)` binds nothing, so the generated parameter gets `arg<N>`.
fn binding_name(name: &str, ix: usize) -> String {
    if name == "_" { format!("arg{ix}") } else { name.to_string() }
}

fn property_parameter(property: &Property) -> Result<Parameter, ExpansionError> {
    let raw = property.ty.as_ref().ok_or_else(|| ExpansionError::UnsupportedTypeExpression {
        ty: "<missing type annotation>".to_string(),
    })?;
    Ok(Parameter {
        name: property.name.clone(),
        label: property.name.clone(),
        ty: lower_type(raw)?,
    })
}
