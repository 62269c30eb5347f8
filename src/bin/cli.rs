use anyhow::Result;
use clap::Parser;
use nba_props_ev::api::explain_api::ExplanationService;
use nba_props_ev::config::AppConfig;
use nba_props_ev::utils::data::{export_enriched_csv, load_props};
use nba_props_ev::utils::enrich::enrich_props;
use nba_props_ev::utils::query::{PropsQuery, SortColumn};
use std::path::PathBuf;

#[derive(Parser)]
struct Cli {
    /// Props CSV file (defaults to the configured assets path)
    #[arg(long)]
    props_file: Option<PathBuf>,

    /// Only show props with at least this EV per dollar
    #[arg(long)]
    min_ev: Option<f64>,

    /// Only show props for this stat type (exact match)
    #[arg(long)]
    stat_type: Option<String>,

    /// Only show props whose player name contains this text
    #[arg(long)]
    player: Option<String>,

    /// Column to sort by
    #[arg(long, default_value = "ev_per_dollar")]
    sort_by: String,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,

    /// Attach LLM explanations to the top props (requires VLLM_BASE_URL)
    #[arg(long)]
    explain: bool,

    /// Write the result set to a CSV file
    #[arg(long)]
    out: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    println!("NBA Props EV Analyzer\n");

    let props_path = cli
        .props_file
        .clone()
        .unwrap_or_else(|| config.props_path());
    println!("Loading props from {}\n", props_path.display());

    let props = load_props(&props_path)?;
    let enriched = enrich_props(&props)?;

    let query = PropsQuery {
        min_ev: cli.min_ev,
        stat_type: cli.stat_type.clone(),
        player: cli.player.clone(),
        sort_by: SortColumn::parse(&cli.sort_by)?,
        sort_desc: !cli.asc,
        explain: cli.explain,
    };

    let mut rows = query.apply(&enriched);

    if cli.explain {
        let explainer = ExplanationService::from_config(&config);
        if explainer.is_enabled() {
            println!("Generating LLM explanations...\n");
            explainer.annotate_top(&mut rows).await;
        } else {
            println!("VLLM_BASE_URL not set; skipping explanations\n");
        }
    }

    println!("PROPS ANALYSIS\n");
    if rows.is_empty() {
        println!("No props matched the filters.");
    } else {
        println!("Found {} props:\n", rows.len());
        for (i, prop) in rows.iter().enumerate() {
            println!("{}. {}", i + 1, prop.format());
            if let Some(explanation) = &prop.llm_explanation {
                println!("   {}", explanation);
            }
        }
    }

    if let Some(out) = &cli.out {
        if rows.is_empty() {
            println!("\nNothing to save.");
        } else {
            export_enriched_csv(&rows, out)?;
            println!("\nSaved analysis to {}", out);
        }
    }

    Ok(())
}
