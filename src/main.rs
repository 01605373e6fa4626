//! Digest CLI: binary entrypoint
//! Loads candidates (batch file or library day), pre-ranks them, curates the
//! Top-K and writes `digest.json`.

use ai_digest::curate::Curator;
use ai_digest::ingest::{load_batch_file, load_library_for_date};
use ai_digest::{build_digest, write_digest, CandidateItem, DigestConfig};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "ai-digest", about = "Build a ranked, UI-ready digest JSON")]
struct Args {
    /// JSON file holding an array of items.
    #[arg(short, long, conflicts_with = "date")]
    input: Option<PathBuf>,

    /// Use library articles fetched on this day (YYYY-MM-DD).
    #[arg(short, long)]
    date: Option<String>,

    /// Candidates sent to curation after pre-ranking.
    #[arg(short = 'k', long)]
    top_k: Option<usize>,

    /// Skip the digest cache (no read, no write).
    #[arg(long)]
    no_cache: bool,

    /// Output directory (default: <output_dir>/web).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: $DIGEST_CONFIG_PATH or config/digest.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "ai_digest=debug,info"
    } else {
        "ai_digest=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn collect_items(args: &Args, cfg: &DigestConfig) -> Result<Vec<CandidateItem>> {
    if let Some(path) = &args.input {
        return load_batch_file(path).with_context(|| format!("loading {}", path.display()));
    }
    if let Some(raw) = &args.date {
        let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("invalid date {raw:?}, use YYYY-MM-DD"))?;
        return Ok(load_library_for_date(&cfg.library_dir(), day)?);
    }
    bail!("provide --input <file> or --date <YYYY-MM-DD>")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; no-op otherwise.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = DigestConfig::load(args.config.as_deref())?;
    let items = collect_items(&args, &cfg)?;
    if items.is_empty() {
        warn!("no items found, nothing to do");
        return Ok(());
    }

    let top_k = args.top_k.unwrap_or(cfg.top_k);
    let curator = Curator::from_config(&cfg)?;
    let curation = build_digest(&curator, &items, top_k, !args.no_cache).await;

    let out_dir = args.output.clone().unwrap_or_else(|| cfg.web_dir());
    let path = write_digest(&out_dir, &curation.digest)?;

    let stats = &curation.digest.stats;
    info!(
        outcome = ?curation.outcome,
        fingerprint = %curation.fingerprint,
        items_in = stats.items_in,
        items_kept = stats.items_kept,
        top_stories = stats.top_stories_count,
        duplicates = stats.duplicates_count,
        "digest ready"
    );
    println!("{}", path.display());
    Ok(())
}
