//! Per-declaration expansion driver.
//!
//! Each declaration is handled on its own: nothing is shared between calls,
//! so a batch can be spread across threads and still come back in order.
use rayon::prelude::*;
use serde::Serialize;

use crate::codegen::Codegen;
use crate::config::{ClassStrategy, ExpansionConfig};
use crate::diagnostics::{Diagnostic, Diagnostics, Location};
use crate::ir::{DeclBody, DeclKind};
use crate::lower::normalize;
use crate::params::extract_parameters;
use crate::raw::RawDecl;
use crate::synth::{enum_factory, record_factories, FunctionDecl};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Generated(Vec<FunctionDecl>),
    /// recognized kind deliberately left unexpanded
    NotImplemented(DeclKind),
    /// rejected; the reason is in the report's diagnostics
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub name: String,
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

pub fn expand(raw: &RawDecl, config: &ExpansionConfig) -> Report {
    let at = Location::decl(&raw.name);
    let mut diagnostics = Diagnostics::new();
    let outcome = expand_into(raw, config, &at, &mut diagnostics);
    tracing::debug!(
        declaration = %raw.name,
        diagnostics = diagnostics.len(),
        "expanded declaration"
    );
    Report { name: raw.name.clone(), outcome, diagnostics: diagnostics.into_vec() }
}

fn expand_into(raw: &RawDecl, config: &ExpansionConfig, at: &Location, diagnostics: &mut Diagnostics) -> Outcome {
    let decl = match normalize(raw) {
        Ok(decl) => decl,
        Err(error) => {
            diagnostics.report(error, at.clone());
            return Outcome::Skipped;
        }
    };
    match (&decl.body, decl.kind) {
        (DeclBody::Opaque, kind) => Outcome::NotImplemented(kind),
        (DeclBody::Record(_), DeclKind::Class) if config.class_strategy == ClassStrategy::Placeholder => {
            Outcome::NotImplemented(DeclKind::Class)
        }
        (DeclBody::Record(members), kind) => {
            let params = extract_parameters(members, at, diagnostics);
            Outcome::Generated(record_factories(kind, decl.access, &params, config))
        }
        (DeclBody::Enum(cases), _) => {
            Outcome::Generated(vec![enum_factory(decl.access, cases, config, at, diagnostics)])
        }
    }
}

/// Expand a batch in parallel; reports come back in input order.
pub fn expand_all(decls: &[RawDecl], config: &ExpansionConfig) -> Vec<Report> {
    decls.par_iter().map(|decl| expand(decl, config)).collect()
}

/// Render every generated or placeholder outcome; skipped declarations emit nothing.
pub fn render(reports: &[Report], config: &ExpansionConfig) -> String {
    let mut cg = Codegen::new(config);
    for report in reports {
        match &report.outcome {
            Outcome::Generated(functions) => cg.emit(&report.name, functions),
            Outcome::NotImplemented(kind) => cg.emit_placeholder(&report.name, *kind),
            Outcome::Skipped => {}
        }
    }
    cg.into_string()
}
