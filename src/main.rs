use anyhow::{bail, Context};
use courtside::orchestration::recorder::RetryPolicy;
use courtside::orchestration::replay::{record_script, MatchScript};
use courtside::{config::Config, db::init_db, Repository};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let script_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => bail!("usage: courtside <match-script.json>"),
    };

    let config = Config::from_env().context("loading configuration")?;
    let script = MatchScript::load(&script_path)?;

    let pool = init_db(&config.database_path)
        .await
        .with_context(|| format!("opening result store at {}", config.database_path))?;
    let repo = Arc::new(Repository::new(pool));

    let (outcome, stats) = record_script(&script, repo, RetryPolicy::from_config(&config)).await?;

    tracing::info!(
        ignored_tokens = outcome.ignored_tokens,
        stored = stats.stored,
        failed = stats.failed,
        "Replay finished"
    );
    println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?);
    if let Some(result) = &outcome.result {
        println!(
            "{} def. {} {}",
            result.winner_name(),
            result.loser_name(),
            result.per_set_scoreline.join(" ")
        );
    }
    if stats.failed > 0 {
        bail!("{} match result(s) could not be persisted", stats.failed);
    }
    Ok(())
}
