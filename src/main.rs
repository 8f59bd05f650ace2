use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixops::models::{ImageSummary, Recipe};
use pixops::services::{synthetic, BatchProcessor};

#[derive(Parser)]
#[command(name = "pixops")]
#[command(about = "Run YAML recipes of pixel transforms over RGB(A) buffers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a recipe, then print its steps
    Check {
        /// Recipe YAML file
        recipe: PathBuf,

        /// Print the parsed recipe as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a recipe over a generated buffer and report timing and statistics
    Bench {
        /// Recipe YAML file
        recipe: PathBuf,

        /// Buffer width in pixels
        #[arg(long, default_value_t = 640)]
        width: usize,

        /// Buffer height in pixels
        #[arg(long, default_value_t = 480)]
        height: usize,

        /// Add an alpha channel
        #[arg(long)]
        alpha: bool,

        /// Use seeded random noise instead of a gradient
        #[arg(long)]
        noise: bool,

        /// Seed for --noise
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixops=info,pixop_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { recipe, json } => run_check_command(&recipe, json),
        Commands::Bench {
            recipe,
            width,
            height,
            alpha,
            noise,
            seed,
        } => run_bench_command(&recipe, width, height, alpha, noise.then_some(seed)).await,
    }
}

fn run_check_command(path: &Path, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::load(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    println!("Recipe: {}", recipe.display_name());
    if recipe.steps.is_empty() {
        println!("  (no steps)");
    }
    for (index, step) in recipe.steps.iter().enumerate() {
        println!("  {:>2}. {}", index + 1, step.name());
    }
    Ok(())
}

async fn run_bench_command(
    path: &Path,
    width: usize,
    height: usize,
    alpha: bool,
    noise_seed: Option<u64>,
) -> anyhow::Result<()> {
    let recipe = Arc::new(Recipe::load(path)?);

    let image = match noise_seed {
        Some(seed) => synthetic::noise(width, height, alpha, seed)?,
        None => synthetic::gradient(width, height, alpha)?,
    };
    tracing::info!(
        width,
        height,
        alpha,
        source = if noise_seed.is_some() { "noise" } else { "gradient" },
        "Generated input buffer"
    );

    let started = Instant::now();
    let output = BatchProcessor::apply_blocking(recipe.clone(), image).await?;
    let elapsed = started.elapsed();

    let summary = ImageSummary::from_buffer(&output);
    tracing::info!(
        recipe = recipe.display_name(),
        elapsed_ms = elapsed.as_millis() as u64,
        width = summary.width,
        height = summary.height,
        "Benchmark finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
