//! Golden-file runner: every `fixtures/<name>.json` is expanded and compared
//! against `fixtures/<name>.swift`. Optional siblings:
//! - `<name>.config.json`: expansion config for that fixture
//! - `<name>.diagnostics.json`: expected `[{ "kind": ..., "at": ... }]`
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use randomizable::path_de::from_str_with_path;
use randomizable::{expand_all, render, ExpansionConfig, RawDecl};

static FIXTURE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<stem>[A-Za-z0-9_-]+)\.json$").unwrap());

#[derive(Debug, Deserialize, PartialEq)]
struct ExpectedDiagnostic {
    kind: String,
    at: String,
}

enum Verdict {
    Pass,
    Fail(String),
}

fn main() -> ExitCode {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("fixtures"));
    let mut stems = match std::fs::read_dir(&dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                FIXTURE_NAME.captures(&file_name).map(|caps| caps["stem"].to_string())
            })
            .collect::<Vec<_>>(),
        Err(error) => {
            eprintln!("cannot read fixture directory {}: {error}", dir.display());
            return ExitCode::from(2);
        }
    };
    stems.sort();

    let mut failed = 0;
    for stem in &stems {
        match run_fixture(&dir, stem) {
            Ok(Verdict::Pass) => eprintln!("✅ {stem}"),
            Ok(Verdict::Fail(why)) => {
                failed += 1;
                eprintln!("❌ {stem}: {why}");
            }
            Err(error) => {
                failed += 1;
                eprintln!("❌ {stem}: {error}");
            }
        }
    }
    eprintln!("—— {} fixtures, {failed} failed ——", stems.len());
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::from(1) }
}

fn run_fixture(dir: &Path, stem: &str) -> Result<Verdict, String> {
    let decls = read_json::<Vec<RawDecl>>(&dir.join(format!("{stem}.json")))?;
    let config_path = dir.join(format!("{stem}.config.json"));
    let config = if config_path.exists() {
        read_json::<ExpansionConfig>(&config_path)?
    } else {
        ExpansionConfig::default()
    };

    let reports = expand_all(&decls, &config);
    let actual = render(&reports, &config);
    let expected = std::fs::read_to_string(dir.join(format!("{stem}.swift"))).map_err(|e| e.to_string())?;
    if let Some(why) = first_difference(&expected, &actual) {
        return Ok(Verdict::Fail(why));
    }

    let diagnostics_path = dir.join(format!("{stem}.diagnostics.json"));
    let expected_diagnostics = if diagnostics_path.exists() {
        read_json::<Vec<ExpectedDiagnostic>>(&diagnostics_path)?
    } else {
        Vec::new()
    };
    let actual_diagnostics = reports
        .iter()
        .flat_map(|r| r.diagnostics.iter())
        .map(|d| ExpectedDiagnostic { kind: diagnostic_kind(&d.error), at: d.at.to_string() })
        .collect::<Vec<_>>();
    if actual_diagnostics != expected_diagnostics {
        return Ok(Verdict::Fail(format!(
            "diagnostics differ\n  expected: {expected_diagnostics:?}\n  actual:   {actual_diagnostics:?}"
        )));
    }
    Ok(Verdict::Pass)
}

fn diagnostic_kind(error: &randomizable::ExpansionError) -> String {
    serde_json::to_value(error)
        .ok()
        .and_then(|v| v.get("code").and_then(|k| k.as_str()).map(str::to_string))
        .unwrap_or_default()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    from_str_with_path(&source).map_err(|message| format!("{}: {message}", path.display()))
}

fn first_difference(expected: &str, actual: &str) -> Option<String> {
    if expected == actual {
        return None;
    }
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (Some(e), Some(a)) if e == a => line += 1,
            (None, None) => return Some("trailing newline differs".to_string()),
            (e, a) => {
                return Some(format!(
                    "line {line}\n  expected: {}\n  actual:   {}",
                    e.unwrap_or("<eof>"),
                    a.unwrap_or("<eof>")
                ));
            }
        }
    }
}
