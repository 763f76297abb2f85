use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt2text::cli::{Cli, Commands};
use yt2text::config::Config;
use yt2text::transcribe::TranscriptionPipeline;
use yt2text::{output, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; keep stdout clean for the transcript itself
    let default_filter = if cli.verbose {
        "yt2text=debug"
    } else {
        "yt2text=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Transcribe(args) => {
            let settings = config.resolve(&args, cli.quiet)?;

            // Check for required external dependencies (non-fatal, tools may
            // still appear on PATH by run time)
            let missing_deps = utils::check_dependencies(&settings.yt_dlp_path).await;
            if !missing_deps.is_empty() {
                eprintln!(
                    "{}",
                    console::style("Dependency check warnings:").yellow().bold()
                );
                for dep in missing_deps {
                    eprintln!("  {} {}", console::style("•").yellow(), dep);
                }
            }

            tracing::info!("Starting transcription for URL: {}", settings.source_url);

            let pipeline = TranscriptionPipeline::new(settings)?;
            let result = pipeline.run().await?;

            output::print_result(&result);
        }
        Commands::Config { show, init } => {
            if init {
                let path = config.init()?;
                println!("Wrote default configuration to {}", path.display());
            } else if show {
                config.display();
            } else {
                println!("Configuration file location:");
                println!("  {}", Config::config_path()?.display());
                println!("Use --show to print effective values, --init to create the file.");
            }
        }
    }

    Ok(())
}
