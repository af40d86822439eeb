use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tt_predictor::config::{Config, LoggingConfig};
use tt_predictor::engine::{self, MatchFixture, Prediction};
use tt_predictor::feed::{self, types::MatchPayload};
use tt_predictor::report;

const DEFAULT_CONFIG: &str = "config.toml";

struct Args {
    config_path: PathBuf,
    json: bool,
}

fn parse_args() -> Result<Args> {
    let mut config_path = PathBuf::from(DEFAULT_CONFIG);
    let mut json = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                config_path = PathBuf::from(path);
            }
            other => anyhow::bail!("unknown argument: {}", other),
        }
    }
    Ok(Args { config_path, json })
}

fn init_logging(config: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured directive.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .context("invalid logging filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &config.log_file {
        Some(path) => {
            let log_file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path))?;
            builder.with_writer(log_file).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Validate every fixture; invalid ones are logged and skipped.
fn evaluate(payload: MatchPayload, config: &Config) -> Vec<(MatchFixture, Prediction)> {
    payload
        .matches
        .into_iter()
        .filter_map(|wire| {
            let match_id = wire.match_id.clone();
            match wire.into_fixture() {
                Ok(fixture) => Some(fixture),
                Err(e) => {
                    let reason = format!("{:#}", e);
                    tracing::warn!(match_id = %match_id, error = %reason, "skipping fixture");
                    None
                }
            }
        })
        .map(|fixture| {
            let analysis = engine::analyze(&fixture.history_a, &fixture.history_b, &config.engine);
            tracing::debug!(
                match_id = %fixture.match_id,
                expected = analysis.expected,
                avg_dispersion = analysis.avg_dispersion,
                "fixture evaluated"
            );
            (fixture, analysis.prediction)
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    // Load saved settings from .env (real env vars take precedence)
    Config::load_env_file();

    let config = Config::load_or_default(Path::new(&args.config_path))?;
    init_logging(&config.logging)?;

    let mut match_feed = feed::build_feed(&config.feed)?;
    tracing::info!(source = match_feed.source_name(), "fetching matches");
    let payload = match_feed.fetch_payload().await?;
    let date = payload.date.clone();

    let evaluated = evaluate(payload, &config);
    tracing::info!(date = %date, count = evaluated.len(), "matches evaluated");

    if args.json {
        let out: Vec<_> = evaluated
            .iter()
            .map(|(fixture, prediction)| report::EvaluatedFixture::new(fixture, *prediction))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let rows: Vec<_> = evaluated
            .iter()
            .map(|(fixture, prediction)| report::build_row(fixture, prediction))
            .collect();
        if !date.is_empty() {
            println!("TT Prudent Predictor - {}\n", date);
        }
        println!("{}", report::render_text(&rows));
    }

    Ok(())
}
