mod cli;
mod pipeline;

use anyhow::Result;
use clap::Parser;

use crate::cli::CliArgs;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    if !args.input.exists() {
        anyhow::bail!("file not found: {}", args.input.display());
    }

    deepread_core::config::load_dotenv();
    let config = deepread_core::Config::from_env();
    config.log_summary();

    let pipeline = Pipeline::new(config);
    let output = pipeline.run(&args).await?;

    match output.mode {
        Some(mode) => println!("Segmentation complete ({} mode)", mode.as_str()),
        None => println!("Segmentation complete"),
    }
    for path in &output.artifacts {
        println!("  {}", path.display());
    }
    Ok(())
}
