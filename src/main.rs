use clap::Parser;
use serde::Serialize;
use snailfilter::config::Config;
use snailfilter::drawer::KeywordFilterDrawer;
use snailfilter::keyword::{Feature, FeatureRegistry, KeywordFilter};
use snailfilter::ranker::{Histogram, Suggestion};
use snailfilter::Result;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rank a keyword histogram into filter suggestions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON histogram: [{"keyword": .., "count": ..}] or {"keyword": count}
    #[arg(long)]
    histogram: PathBuf,
    /// search_source, file_extension or file_name
    #[arg(short, long)]
    feature: Feature,
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Applied filters, comma separated, e.g. "+ubuntu,-server"
    #[arg(short, long)]
    pipeline: Option<String>,
    /// Also print suggestions hidden by the applied filters
    #[arg(long)]
    all: bool,
}

#[derive(Serialize)]
struct Output<'a> {
    feature: Feature,
    threshold: Option<f32>,
    applied: &'a [KeywordFilter],
    suggestions: Vec<&'a Suggestion>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = if let Some(config_path) = args.config.as_ref() {
        Config::load_json_file(config_path)?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();

    let applied = match args.pipeline.as_deref() {
        Some(list) => KeywordFilter::parse_list(list)?,
        None => vec![],
    };

    let content = fs::read_to_string(&args.histogram)?;
    let histogram = serde_json::from_str::<Histogram>(&content)?.into_entries();
    info!(path = ?args.histogram, entries = histogram.len(), "load histogram");

    let registry = FeatureRegistry::from_config(&cfg);
    let threshold = registry.threshold(args.feature);
    let mut drawer = KeywordFilterDrawer::new(registry);
    drawer.update_data(Some(&applied), args.feature, &histogram);

    let suggestions: Vec<&Suggestion> = drawer
        .group(args.feature)
        .map(|g| {
            g.suggestions()
                .items()
                .iter()
                .filter(|s| args.all || !s.hidden)
                .collect()
        })
        .unwrap_or_default();

    let output = Output {
        feature: args.feature,
        threshold,
        applied: drawer.applied(),
        suggestions,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
