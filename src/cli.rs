//! CLI: declarations (JSON) → (swift | model)
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;

use randomizable::config::{CallStyle, ClassStrategy, ExpansionConfig};
use randomizable::diagnostics::{Diagnostic, Diagnostics, Location};
use randomizable::expand::{expand_all, render};
use randomizable::ir::{DeclBody, Parameter, TypeDeclaration};
use randomizable::source::SourceOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// synthesize `makeRandom` / `makeRandomWith` factories for type declarations
#[derive(Parser, Debug)]
#[command(name = "randomizable")]
pub struct CommandLineInterface {
    /// increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// expand declarations and print the generated Swift
    Expand(ExpandOut),
    /// print the normalized declaration model as JSON
    Model(ModelOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /module/declarations)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// only expand declarations whose name matches this regex
    #[arg(long)]
    only: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct ExpandOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// JSON expansion config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// runtime method emitted in default values (e.g. `makeRandom`)
    #[arg(long)]
    random_method: Option<String>,

    #[arg(long, value_enum)]
    call_style: Option<CallStyle>,

    #[arg(long, value_enum)]
    class_strategy: Option<ClassStrategy>,

    /// protocol named in the wrapping extension
    #[arg(long, conflicts_with = "no_conformance")]
    conformance: Option<String>,

    /// emit bare functions, no wrapping extension
    #[arg(long)]
    no_conformance: bool,

    /// how diagnostics are written to stderr
    #[arg(long, value_enum, default_value_t = DiagnosticsFormat::Human)]
    diagnostics: DiagnosticsFormat,

    /// output .swift file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ModelOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DiagnosticsFormat {
    Human,
    Json,
}

#[derive(Debug, Serialize)]
struct ModelView {
    #[serde(skip_serializing_if = "Option::is_none")]
    declaration: Option<TypeDeclaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Vec<Parameter>>,
    diagnostics: Vec<Diagnostic>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn to_options(&self) -> anyhow::Result<SourceOptions> {
        let only = self
            .only
            .as_deref()
            .map(regex::Regex::new)
            .transpose()
            .context("invalid --only pattern")?;
        Ok(SourceOptions {
            inputs: self.input.clone(),
            ndjson: self.ndjson,
            json_pointer: self.json_pointer.clone(),
            jq_expr: self.jq_expr.clone(),
            only,
        })
    }
}

impl ExpandOut {
    fn expansion_config(&self) -> anyhow::Result<ExpansionConfig> {
        let mut config = match &self.config {
            Some(path) => ExpansionConfig::load(path)?,
            None => ExpansionConfig::default(),
        };
        if let Some(method) = &self.random_method {
            config.random_method = method.clone();
        }
        if let Some(style) = self.call_style {
            config.call_style = style;
        }
        if let Some(strategy) = self.class_strategy {
            config.class_strategy = strategy;
        }
        if let Some(conformance) = &self.conformance {
            config.conformance = Some(conformance.clone());
        }
        if self.no_conformance {
            config.conformance = None;
        }
        Ok(config)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Returns `true` when any diagnostic was reported.
    pub fn run(&self) -> anyhow::Result<bool> {
        match &self.cmd {
            Command::Expand(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(false);
                }
                let config = target.expansion_config()?;
                let decls = target.input_settings.to_options()?.load()?;
                tracing::info!(declarations = decls.len(), "expanding");

                let reports = expand_all(&decls, &config);
                let swift_src = render(&reports, &config);
                write_output(target.out.as_ref(), &swift_src)?;

                let diagnostics = reports.iter().flat_map(|r| r.diagnostics.iter()).collect::<Vec<_>>();
                print_diagnostics(&diagnostics, target.diagnostics)?;
                Ok(!reports.iter().all(|report| report.is_clean()))
            }
            Command::Model(target) => {
                let decls = target.input_settings.to_options()?.load()?;
                let mut views = IndexMap::<String, Vec<ModelView>>::new();
                for raw in &decls {
                    views.entry(raw.name.clone()).or_default().push(model_view(raw));
                }
                let had_diagnostics = views.values().flatten().any(|v| !v.diagnostics.is_empty());
                let json_src = serde_json::to_string_pretty(&views)?;
                write_output(target.out.as_ref(), &json_src)?;
                Ok(had_diagnostics)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn model_view(raw: &randomizable::raw::RawDecl) -> ModelView {
    let at = Location::decl(&raw.name);
    let mut diagnostics = Diagnostics::new();
    match randomizable::lower::normalize(raw) {
        Ok(decl) => {
            let parameters = match &decl.body {
                DeclBody::Record(members) => Some(randomizable::params::extract_parameters(members, &at, &mut diagnostics)),
                DeclBody::Enum(_) | DeclBody::Opaque => None,
            };
            ModelView { declaration: Some(decl), parameters, diagnostics: diagnostics.into_vec() }
        }
        Err(error) => {
            diagnostics.report(error, at);
            ModelView { declaration: None, parameters: None, diagnostics: diagnostics.into_vec() }
        }
    }
}

fn write_output(out: Option<&PathBuf>, contents: &str) -> anyhow::Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => print!("{contents}"),
    }
    Ok(())
}

fn print_diagnostics(diagnostics: &[&Diagnostic], format: DiagnosticsFormat) -> anyhow::Result<()> {
    match format {
        DiagnosticsFormat::Json => {
            eprintln!("{}", serde_json::to_string_pretty(diagnostics)?);
        }
        DiagnosticsFormat::Human => {
            for diagnostic in diagnostics {
                eprintln!(
                    "{}: {}\n  {} {}",
                    "error".red().bold(),
                    diagnostic.error,
                    "-->".blue().bold(),
                    diagnostic.at
                );
            }
        }
    }
    Ok(())
}
