//! Declaration analysis and factory synthesis for `@Randomizable` types.
//!
//! A raw declaration tree (see [`raw`]) is normalized ([`lower`]), its
//! parameters or cases extracted ([`params`]), and `makeRandom` /
//! `makeRandomWith` synthesized ([`synth`]) and written out ([`codegen`]).
//! Structural problems are collected as [`diagnostics`] rather than aborting
//! the batch.
pub mod raw;
pub mod ir;
pub mod resolve;
pub mod lower;
pub mod params;
pub mod synth;
pub mod codegen;
pub mod diagnostics;
pub mod config;
pub mod expand;
pub mod source;
pub mod jq_exec;
pub mod path_de;

pub use config::ExpansionConfig;
pub use diagnostics::{Diagnostic, ExpansionError};
pub use expand::{expand, expand_all, render, Outcome, Report};
pub use raw::RawDecl;
