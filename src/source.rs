//! Loading raw declarations from files: globs, NDJSON, JSON Pointer, jq.
use std::path::{Path, PathBuf};

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::raw::RawDecl;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern { pattern: String, source: glob::PatternError },
    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to parse JSON in {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
    #[error("JSON pointer `{pointer}` selects nothing in {}", .path.display())]
    Pointer { path: PathBuf, pointer: String },
    #[error("jq filter failed on {}: {message}", .path.display())]
    Jq { path: PathBuf, message: String },
    #[error("invalid declaration in {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub inputs: Vec<String>,
    pub ndjson: bool,
    pub json_pointer: Option<String>,
    pub jq_expr: Option<String>,
    /// keep only declarations whose name matches
    pub only: Option<Regex>,
}

impl SourceOptions {
    pub fn load(&self) -> Result<Vec<RawDecl>, SourceError> {
        let mut decls = Vec::new();
        for path in resolve_file_path_patterns(&self.inputs)? {
            let source = std::fs::read_to_string(&path).map_err(|source| SourceError::Io { path: path.clone(), source })?;
            let loaded = self.load_str(&path, &source)?;
            tracing::debug!(path = %path.display(), declarations = loaded.len(), "loaded input");
            decls.extend(loaded);
        }
        Ok(decls)
    }

    /// Decode one file's text; `path` is only used for error messages.
    pub fn load_str(&self, path: &Path, source: &str) -> Result<Vec<RawDecl>, SourceError> {
        let json_error = |source: serde_json::Error| SourceError::Json { path: path.to_path_buf(), source };
        let documents = if self.ndjson {
            source
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| serde_json::from_str::<Value>(line).map_err(json_error))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![serde_json::from_str::<Value>(source).map_err(json_error)?]
        };

        let mut decls = Vec::new();
        for document in documents {
            for document in self.select(path, document)? {
                decode_document(path, document, &mut decls)?;
            }
        }
        if let Some(only) = &self.only {
            decls.retain(|decl| only.is_match(&decl.name));
        }
        Ok(decls)
    }

    fn select(&self, path: &Path, document: Value) -> Result<Vec<Value>, SourceError> {
        let document = match &self.json_pointer {
            None => document,
            Some(pointer) => document.pointer(pointer).cloned().ok_or_else(|| SourceError::Pointer {
                path: path.to_path_buf(),
                pointer: pointer.clone(),
            })?,
        };
        match &self.jq_expr {
            None => Ok(vec![document]),
            Some(jq_expr) => crate::jq_exec::run_filter(jq_expr, &document).map_err(|error| SourceError::Jq {
                path: path.to_path_buf(),
                message: format!("{error:#}"),
            }),
        }
    }
}

/// A document is either one declaration or an array of them.
fn decode_document(path: &Path, document: Value, out: &mut Vec<RawDecl>) -> Result<(), SourceError> {
    let decode_error = |message: String| SourceError::Decode { path: path.to_path_buf(), message };
    match document {
        Value::Array(items) => {
            let decls = crate::path_de::from_value_with_path::<Vec<RawDecl>>(Value::Array(items)).map_err(decode_error)?;
            out.extend(decls);
        }
        other => out.push(crate::path_de::from_value_with_path::<RawDecl>(other).map_err(decode_error)?),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, SourceError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if !has_glob_chars(pattern) {
            out.push(PathBuf::from(pattern));
            continue;
        }
        let entries = glob::glob(pattern).map_err(|source| SourceError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let before = out.len();
        for entry in entries {
            match entry {
                Ok(path) => out.push(path),
                Err(error) => {
                    let path = error.path().to_path_buf();
                    return Err(SourceError::Io { path, source: error.into() });
                }
            }
        }
        if out.len() == before {
            return Err(SourceError::NoMatches(pattern.to_string()));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_DECLS: &str = r#"[
        { "kind": "struct", "name": "Flight" },
        { "kind": "enum", "name": "Service" }
    ]"#;

    #[test]
    fn array_document_yields_every_declaration() {
        let decls = SourceOptions::default().load_str(Path::new("a.json"), TWO_DECLS).unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].kind, "enum");
    }

    #[test]
    fn ndjson_skips_blank_lines() {
        let src = "{\"kind\":\"struct\",\"name\":\"A\"}\n\n{\"kind\":\"enum\",\"name\":\"B\"}\n";
        let options = SourceOptions { ndjson: true, ..SourceOptions::default() };
        let decls = options.load_str(Path::new("a.ndjson"), src).unwrap();
        assert_eq!(decls.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(), ["A", "B"]);
    }

    #[test]
    fn json_pointer_selects_subtree() {
        let src = r#"{ "module": { "types": [{ "kind": "struct", "name": "Nested" }] } }"#;
        let options = SourceOptions { json_pointer: Some("/module/types".into()), ..SourceOptions::default() };
        let decls = options.load_str(Path::new("m.json"), src).unwrap();
        assert_eq!(decls[0].name, "Nested");

        let missing = SourceOptions { json_pointer: Some("/nope".into()), ..SourceOptions::default() };
        assert!(matches!(missing.load_str(Path::new("m.json"), src), Err(SourceError::Pointer { .. })));
    }

    #[test]
    fn name_filter_applies_after_decoding() {
        let options = SourceOptions { only: Some(Regex::new("^Fl").unwrap()), ..SourceOptions::default() };
        let decls = options.load_str(Path::new("a.json"), TWO_DECLS).unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Flight");
    }

    #[test]
    fn malformed_declaration_reports_path() {
        let src = r#"{ "kind": "struct" }"#;
        let err = SourceOptions::default().load_str(Path::new("bad.json"), src).unwrap_err();
        assert!(err.to_string().contains("bad.json"), "{err}");
    }

    #[test]
    fn literal_paths_pass_through_unglobbed() {
        let paths = resolve_file_path_patterns(["decls/flight.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("decls/flight.json")]);
        assert!(matches!(
            resolve_file_path_patterns(["/definitely/not/here/*.json"]),
            Err(SourceError::NoMatches(_))
        ));
    }
}
