use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "open-ai", alias = "openai")]
    OpenAI,
    #[value(alias = "anthropic")]
    Anthropic,
    #[value(alias = "ollama")]
    Ollama,
}

#[derive(Parser, Debug)]
#[command(name="vibe_setup", version, about="Turns a project blueprint and a starter template into package install commands")]
pub struct Args {
    /// Free-text request from the user.
    #[arg(long)]
    pub query: String,

    /// Blueprint file (.md/.txt verbatim, .yaml/.json structured).
    #[arg(long)]
    pub blueprint: String,

    /// Template descriptor (.json/.yaml/.toml or a package.json).
    #[arg(long)]
    pub template: String,

    /// Error from a failed install; each one triggers a regeneration, in order.
    #[arg(long = "error")]
    pub errors: Vec<String>,

    #[arg(long)]
    pub root: Option<String>,

    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub regeneration_model: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub save_artifacts: bool,

    /// Print `{"commands": [...]}` instead of the colored list.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}
