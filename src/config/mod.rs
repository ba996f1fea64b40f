use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::{Args, ProviderKind};
use crate::errors::{Result, SetupError};

pub const CONFIG_FILE: &str = "vibe.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: String,
    pub provider: ProviderKind,
    pub model: String,
    /// Pinned for regeneration requests.
    pub regeneration_model: String,
    /// action id → model, consulted when no explicit model is pinned.
    pub routes: BTreeMap<String, String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub api_base: Option<String>,
    pub ollama_url: Option<String>,
    pub save_artifacts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: ".".into(),
            provider: ProviderKind::OpenAI,
            model: "gpt-4.1".into(),
            regeneration_model: "gpt-4.1-mini".into(),
            routes: BTreeMap::new(),
            temperature: 0.2,
            max_tokens: 2048,
            timeout_secs: 120,
            api_base: None,
            ollama_url: Some("http://localhost:11434".into()),
            save_artifacts: false,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| SetupError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// `--config` wins, then `<root>/vibe.toml`, then defaults. Flags given on
    /// the command line override whatever the file said.
    pub fn load(args: &Args) -> Result<Self> {
        let root = args.root.clone().unwrap_or_else(|| ".".into());
        let candidate = match &args.config {
            Some(p) => Some(PathBuf::from(p)),
            None => {
                let p = Path::new(&root).join(CONFIG_FILE);
                p.is_file().then_some(p)
            }
        };

        let mut cfg = match candidate {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_args(args);
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(root) = &args.root {
            self.root = root.clone();
        }
        if let Some(p) = &args.provider {
            self.provider = p.clone();
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(m) = &args.regeneration_model {
            self.regeneration_model = m.clone();
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
        if args.save_artifacts {
            self.save_artifacts = true;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SetupError::Config("model must not be empty".into()));
        }
        if self.regeneration_model.trim().is_empty() {
            return Err(SetupError::Config("regeneration_model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(SetupError::Config(format!(
                "temperature {} out of range 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}
