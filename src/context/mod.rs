use fs_err as fs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::errors::{Result, SetupError};

/// The starter template a project is generated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub description: String,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

impl Template {
    /// Everything the template already installs, runtime deps first.
    pub fn installed(&self) -> Vec<&str> {
        self.dependencies
            .iter()
            .chain(self.dev_dependencies.iter())
            .map(String::as_str)
            .collect()
    }

    /// Accepts both the native shape (`dependencies` as a list) and a
    /// `package.json` (`dependencies`/`devDependencies` as name → version maps).
    pub fn from_value(v: &Value) -> Self {
        let text = |key: &str| v.get(key).and_then(Value::as_str).unwrap_or_default().to_string();
        let dev = v.get("dev_dependencies").or_else(|| v.get("devDependencies"));
        Self {
            name: text("name"),
            description: text("description"),
            dependencies: dep_names(v.get("dependencies")),
            dev_dependencies: dep_names(dev),
        }
    }
}

fn dep_names(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// What the user wants built.
#[derive(Debug, Clone, PartialEq)]
pub enum Blueprint {
    Text(String),
    Structured(Value),
}

impl Blueprint {
    pub fn as_prompt_text(&self) -> String {
        match self {
            Blueprint::Text(s) => s.trim().to_string(),
            Blueprint::Structured(v) => serde_yaml::to_string(v)
                .unwrap_or_else(|_| v.to_string())
                .trim()
                .to_string(),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn parse_structured(path: &Path, raw: &str) -> Result<Option<Value>> {
    let parsed = match extension(path).as_str() {
        "json" => serde_json::from_str::<Value>(raw).map_err(|e| e.to_string()),
        "yaml" | "yml" => serde_yaml::from_str::<Value>(raw).map_err(|e| e.to_string()),
        "toml" => toml::from_str::<Value>(raw).map_err(|e| e.to_string()),
        _ => return Ok(None),
    };
    parsed
        .map(Some)
        .map_err(|e| SetupError::Context(format!("failed to parse {}: {e}", path.display())))
}

pub fn load_template(path: &Path) -> Result<Template> {
    let raw = fs::read_to_string(path)?;
    let value = parse_structured(path, &raw)?.ok_or_else(|| {
        SetupError::Context(format!(
            "unsupported template format: {} (expected .json, .yaml or .toml)",
            path.display()
        ))
    })?;
    if !value.is_object() {
        return Err(SetupError::Context(format!("template {} is not a mapping", path.display())));
    }
    Ok(Template::from_value(&value))
}

/// Structured files become `Blueprint::Structured` unless they hold a bare
/// string; anything else is taken verbatim.
pub fn load_blueprint(path: &Path) -> Result<Blueprint> {
    let raw = fs::read_to_string(path)?;
    Ok(match parse_structured(path, &raw)? {
        Some(Value::String(s)) => Blueprint::Text(s),
        Some(v) => Blueprint::Structured(v),
        None => Blueprint::Text(raw),
    })
}
