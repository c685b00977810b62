//! Expansion settings.
use std::path::Path;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// runtime capability called in default values, `Int.random()`
    pub random_method: String,
    pub call_style: CallStyle,
    pub class_strategy: ClassStrategy,
    /// wrap output in `extension Name: <conformance> { ... }`
    pub conformance: Option<String>,
    pub indent: String,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        ExpansionConfig {
            random_method: "random".to_string(),
            call_style: CallStyle::Qualified,
            class_strategy: ClassStrategy::Generate,
            conformance: Some("Randomizable".to_string()),
            indent: "    ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CallStyle {
    /// `Int.random()`
    #[default]
    Qualified,
    /// `.random()`, inferred from the parameter type
    ImplicitMember,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClassStrategy {
    /// construct through `self.init(...)`
    #[default]
    Generate,
    /// emit the not-implemented placeholder
    Placeholder,
}

impl ExpansionConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        crate::path_de::from_str_with_path::<Self>(&source)
            .map_err(|error| anyhow::anyhow!("invalid config file {}: {error}", path.display()))
    }
}
