use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use wattcanvas_datapipe::config::Config;
use wattcanvas_datapipe::logging;
use wattcanvas_datapipe::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "wattcanvas_datapipe")]
#[command(about = "WattCanvas GeoJSON plant dataset preparation pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Pipeline config file (TOML); defaults to datapipe.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Project raw features down to the dashboard property set
    Extract {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Collapse features sharing a composite identity key (first-seen-wins)
    Dedup {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
    /// Cluster owner names and stamp each feature with normalized_owner
    NormalizeOwners {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Override the configured similarity threshold (0-100)
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Run extract, dedup, and owner normalization sequentially
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Override the configured similarity threshold (0-100)
        #[arg(long)]
        threshold: Option<f64>,
    },
}

fn load_config(path: Option<&PathBuf>, threshold: Option<f64>) -> anyhow::Result<Config> {
    let mut config = Config::load_or_default(path.map(|p| p.as_path()))?;
    if let Some(threshold) = threshold {
        if !(0.0..=100.0).contains(&threshold) {
            anyhow::bail!("--threshold must be between 0 and 100, got {threshold}");
        }
        config.owners.similarity_threshold = threshold;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output } => {
            println!("🔄 Running extract stage...");
            let config = load_config(cli.config.as_ref(), None)?;
            let pipeline = Pipeline::new(config);
            match pipeline.run_extract(&input, &output) {
                Ok(count) => {
                    info!("Extract finished");
                    println!("✅ Extracted {} features to {}", count, output.display());
                }
                Err(e) => {
                    error!("Extract failed: {}", e);
                    println!("❌ Extract failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Dedup { input, output } => {
            println!("🔄 Running dedup stage...");
            let config = load_config(cli.config.as_ref(), None)?;
            let pipeline = Pipeline::new(config);
            match pipeline.run_dedup(&input, &output) {
                Ok((retained, dropped)) => {
                    info!("Dedup finished");
                    println!(
                        "✅ Retained {} features ({} duplicates dropped), wrote {}",
                        retained,
                        dropped,
                        output.display()
                    );
                }
                Err(e) => {
                    error!("Dedup failed: {}", e);
                    println!("❌ Dedup failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::NormalizeOwners {
            input,
            output,
            threshold,
        } => {
            println!("🔄 Running owner normalization...");
            let config = load_config(cli.config.as_ref(), threshold)?;
            let pipeline = Pipeline::new(config);
            match pipeline.run_normalize_owners(&input, &output) {
                Ok(stats) => {
                    info!("Owner normalization finished");
                    println!(
                        "✅ {} distinct owner names collapsed into {} clusters; {} features stamped",
                        stats.distinct_names, stats.clusters, stats.stamped
                    );
                    println!("   Output file: {}", output.display());
                }
                Err(e) => {
                    error!("Owner normalization failed: {}", e);
                    println!("❌ Owner normalization failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Run {
            input,
            output,
            threshold,
        } => {
            println!("🚀 Running full pipeline (extract + dedup + normalize-owners)...");
            let config = load_config(cli.config.as_ref(), threshold)?;
            let pipeline = Pipeline::new(config);
            match pipeline.run(&input, &output) {
                Ok(result) => {
                    info!("Pipeline finished");
                    println!("\n📊 Pipeline Results:");
                    println!("   Features read: {}", result.features_read);
                    println!("   Features written: {}", result.features_written);
                    println!("   Duplicates dropped: {}", result.duplicates_dropped);
                    println!("   Distinct owner names: {}", result.distinct_owner_names);
                    println!("   Owner clusters: {}", result.owner_clusters);
                    println!("   Output file: {}", result.output_file);
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    println!("❌ Pipeline failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}
