//! Structural errors found while expanding a declaration.
//!
//! Every stage reports into a [`Diagnostics`] sink instead of aborting. A
//! declaration-level error stops that declaration only; a type-level error
//! drops the one parameter or associated value it was found on.

use std::fmt;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ExpansionError {
    #[error("'@Randomizable' can only be applied to a 'struct', 'class', 'enum' and 'protocol' (found '{kind}')")]
    UnsupportedDeclarationKind { kind: String },
    #[error("'@Randomizable' cannot be applied to private type '{name}'")]
    PrivateDeclarationRejected { name: String },
    #[error("Can't use '@Randomizable' with no enum cases")]
    EnumWithNoCases,
    #[error("unsupported type `{ty}`")]
    UnsupportedTypeExpression { ty: String },
}

impl ExpansionError {
    /// Declaration-level errors stop the whole declaration.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExpansionError::UnsupportedTypeExpression { .. })
    }
}

/// Where in the declaration tree an error was found. The host maps this back
/// to a source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub declaration: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl Location {
    pub fn decl(name: impl Into<String>) -> Self {
        Location { declaration: name.into(), path: Vec::new() }
    }
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(segment.into());
        Location { declaration: self.declaration.clone(), path }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.declaration)?;
        for segment in &self.path {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub error: ExpansionError,
    pub at: Location,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.at, self.error)
    }
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: ExpansionError, at: Location) {
        if error.is_fatal() {
            tracing::debug!(%at, %error, "declaration rejected");
        } else {
            tracing::warn!(%at, %error, "dropping member with unsupported type");
        }
        self.items.push(Diagnostic { error, at });
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for Diagnostic { error, at } in diagnostics {
            self.report(error, at);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
