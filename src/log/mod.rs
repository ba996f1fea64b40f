use crate::config::Config;
use crate::conversation::ConversationLog;
use crate::wire::{Message, SetupCommandsResult};
use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::Serialize;
use serde_json::to_string_pretty;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub conversation: PathBuf,
    pub result: PathBuf,
}

#[derive(Serialize)]
struct Transcript<'a> {
    transaction: Uuid,
    saved_at: DateTime<Utc>,
    query: &'a str,
    messages: &'a [Message],
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".vibe").join("tx").join(tx.to_string())
}

pub fn save_run(
    cfg: &Config,
    tx: Uuid,
    query: &str,
    log: &ConversationLog,
    result: &SetupCommandsResult,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(Path::new(&cfg.root), tx);
    fs::create_dir_all(&dir)?;

    let transcript = Transcript {
        transaction: tx,
        saved_at: Utc::now(),
        query,
        messages: log.messages(),
    };
    let conversation = dir.join("conversation.json");
    fs::write(&conversation, to_string_pretty(&transcript)?)?;

    let result_path = dir.join("result.json");
    fs::write(&result_path, to_string_pretty(result)?)?;

    tracing::debug!(dir = %dir.display(), "run artifacts saved");
    Ok(SavedPaths { dir, conversation, result: result_path })
}
