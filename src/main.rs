use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod agent;
mod cli;
mod config;
mod context;
mod conversation;
mod errors;
mod extract;
mod log;
mod prompt;
mod provider;
mod ux;
mod wire;

fn init_tracing(debug: bool) {
    let fallback = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_tracing(args.debug);

    let cfg = config::Config::load(&args)?;
    let txid = Uuid::new_v4();
    tracing::debug!(%txid, provider = ?cfg.provider, model = %cfg.model, "configuration loaded");

    let template = context::load_template(Path::new(&args.template))
        .with_context(|| format!("loading template {}", args.template))?;
    let blueprint = context::load_blueprint(Path::new(&args.blueprint))
        .with_context(|| format!("loading blueprint {}", args.blueprint))?;

    let prov = provider::make_provider(&cfg)?;
    let ictx = provider::InferenceContext::from_config(&cfg);
    let mut setup = agent::SetupAgent::new(args.query.clone(), &blueprint, &template, prov, ictx);

    // First attempt, then one regeneration per reported failure.
    let mut result = setup.generate_setup_commands(None).await?;
    for err in &args.errors {
        result = setup.generate_setup_commands(Some(err.as_str())).await?;
    }

    if args.debug {
        ux::show_transcript(setup.log());
    }

    if cfg.save_artifacts {
        let saved = log::save_run(&cfg, txid, setup.query(), setup.log(), &result)?;
        tracing::info!(dir = %saved.dir.display(), conversation = %saved.conversation.display(), result = %saved.result.display(), "artifacts saved");
    }

    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        ux::show_commands(&result);
    }

    Ok(())
}
