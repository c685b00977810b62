//! Text output for synthesized factories.
use crate::config::ExpansionConfig;
use crate::ir::DeclKind;
use crate::synth::{Body, FunctionDecl};

pub struct Codegen<'a> {
    config: &'a ExpansionConfig,
    out: String,
    level: usize,
}

impl<'a> Codegen<'a> {
    pub fn new(config: &'a ExpansionConfig) -> Self {
        Self { config, out: String::new(), level: 0 }
    }

    /// Emit the generated functions for `name`, inside a conformance
    /// extension when one is configured.
    pub fn emit(&mut self, name: &str, functions: &[FunctionDecl]) {
        self.separate();
        let config = self.config;
        match config.conformance.as_deref() {
            Some(conformance) => {
                self.line(&format!("extension {name}: {conformance} {{"));
                self.level += 1;
                for function in functions {
                    self.function(function);
                }
                self.level -= 1;
                self.line("}");
            }
            None => {
                for function in functions {
                    self.function(function);
                }
            }
        }
    }

    /// Marker for a recognized declaration that is deliberately not expanded.
    pub fn emit_placeholder(&mut self, name: &str, kind: DeclKind) {
        self.separate();
        self.line(&format!("// Not implemented: '@Randomizable' for {} '{name}'", kind.keyword()));
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn function(&mut self, f: &FunctionDecl) {
        let head = format!("{}static func {}", f.access.prefix(), f.name);
        if f.params.is_empty() {
            self.line(&format!("{head}() -> Self {{"));
        } else {
            self.line(&format!("{head}("));
            self.level += 1;
            let last = f.params.len() - 1;
            for (ix, p) in f.params.iter().enumerate() {
                let comma = if ix == last { "" } else { "," };
                self.line(&format!("{}: {} = {}{comma}", p.name, p.ty, p.default));
            }
            self.level -= 1;
            self.line(") -> Self {");
        }
        self.level += 1;
        self.body(&f.body);
        self.level -= 1;
        self.line("}");
    }

    fn body(&mut self, body: &Body) {
        match body {
            Body::Construct { callee, args } if args.is_empty() => self.line(&format!("{callee}()")),
            Body::Construct { callee, args } => {
                self.line(&format!("{callee}("));
                self.level += 1;
                let last = args.len() - 1;
                for (ix, arg) in args.iter().enumerate() {
                    let comma = if ix == last { "" } else { "," };
                    match &arg.label {
                        Some(label) => self.line(&format!("{label}: {}{comma}", arg.value)),
                        None => self.line(&format!("{}{comma}", arg.value)),
                    }
                }
                self.level -= 1;
                self.line(")");
            }
            Body::Delegate { callee } => self.line(&format!("{callee}()")),
            Body::PickUniformly { choices } => self.line(&format!("[{}].randomElement()!", choices.join(", "))),
        }
    }

    fn separate(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.level {
            self.out.push_str(&self.config.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}
