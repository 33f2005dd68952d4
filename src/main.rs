use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use yt_trend_analyzer::trend_core::VideoTypeFilter;
use yt_trend_analyzer::{
    create_source, export_run, render_report, AnalysisError, AnalysisRequest, ChartKind, Config,
    ProviderError, TrendAnalyzer,
};

#[derive(Parser)]
#[command(name = "yt-trend-analyzer")]
#[command(version, author = "TigreRoll")]
#[command(about = "Analyze trending YouTube videos by language and topic")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ./yt-trend-analyzer.toml or ./config/yt-trend-analyzer.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, classify and summarize videos for one topic
    Analyze {
        #[arg(short, long, default_value = "English")]
        language: String,

        /// Main category (e.g. "Tech"); inferred from the subcategory when omitted
        #[arg(short, long)]
        category: Option<String>,

        /// Subcategory within the category (e.g. "AI Tools")
        #[arg(short, long)]
        sub_category: String,

        /// "short" or "full"; defaults to the configured video type
        #[arg(short = 't', long)]
        video_type: Option<VideoTypeFilter>,

        #[arg(long, value_enum, default_value_t = ChartKind::TopViews)]
        chart: ChartKind,

        /// Read search results and statistics from a JSON fixture instead of the API
        #[arg(long)]
        fixture: Option<PathBuf>,

        #[arg(short, long)]
        export_dir: Option<PathBuf>,

        /// Skip writing export files
        #[arg(long)]
        no_export: bool,

        /// Concurrent per-video lookups
        #[arg(short, long)]
        workers: Option<usize>,

        /// Number of search results to analyze (1-50)
        #[arg(short, long)]
        max_results: Option<u32>,
    },
    /// List languages, categories and subcategories
    Taxonomy,
    /// Write the default configuration file
    InitConfig {
        #[arg(default_value = "yt-trend-analyzer.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        std::env::var("YT_TREND_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("yt_trend_analyzer={0},trend_core={0},warn", level))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        eprintln!("{}", user_message(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };

    match cli.command {
        Commands::Analyze {
            language,
            category,
            sub_category,
            video_type,
            chart,
            fixture,
            export_dir,
            no_export,
            workers,
            max_results,
        } => {
            let mut config = config;
            if let Some(workers) = workers {
                config.analysis.max_concurrent_lookups = workers;
            }
            if let Some(max_results) = max_results {
                config.youtube.max_results = max_results;
            }
            if let Some(export_dir) = export_dir {
                config.output.export_dir = export_dir;
            }
            config.validate()?;
            debug!("{}", config.summary());

            let category = match category {
                Some(category) => category,
                None => config
                    .taxonomy
                    .category_of(&sub_category)
                    .map(|group| group.name.clone())
                    .ok_or_else(|| anyhow!("no category lists subcategory '{}'", sub_category))?,
            };

            let request = AnalysisRequest::new(
                language,
                category,
                sub_category,
                video_type.unwrap_or(config.analysis.default_video_type),
            );

            let source = create_source(&config.youtube, fixture.as_deref())?;
            let analyzer = TrendAnalyzer::new(config.clone(), source)?;

            info!("🚀 YouTube Trend Analyzer starting ({} source)...", analyzer.source_name());
            let run = analyzer.analyze(&request).await?;

            println!("{}", render_report(&run, chart));

            if no_export {
                debug!("Export skipped");
            } else if run.records.is_empty() {
                info!("Nothing to export");
            } else {
                let written = export_run(&run, &config.output.export_dir, &config.output.export_formats)?;
                info!("📁 Exported {} file(s)", written.len());
            }
        }
        Commands::Taxonomy => {
            let taxonomy = &config.taxonomy;
            println!("Languages: {}", taxonomy.languages.join(", "));
            for group in &taxonomy.categories {
                println!("{}:", group.name);
                for sub_category in &group.subcategories {
                    println!("  - {}", sub_category);
                }
            }
        }
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                return Err(anyhow!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            Config::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Message shown to the user for a failed command
fn user_message(err: &anyhow::Error) -> String {
    let provider = err
        .downcast_ref::<ProviderError>()
        .or_else(|| match err.downcast_ref::<AnalysisError>() {
            Some(AnalysisError::Provider(provider)) => Some(provider),
            _ => None,
        });

    match provider {
        Some(ProviderError::MissingApiKey) => ProviderError::MissingApiKey.to_string(),
        Some(ProviderError::Fixture(message)) => format!("Could not read fixture: {}", message),
        Some(provider) => format!("An error occurred with the API key or request: {}", provider),
        None => format!("Error: {:#}", err),
    }
}
