use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vocal_wellness::{create_router, AppState, AudioFile, Config, WellnessPipeline};

#[derive(Parser)]
#[command(name = "vocal-wellness", about = "Estimate stress and fatigue from a short voice clip")]
struct Cli {
    /// Config file (without extension); missing files fall back to defaults
    #[arg(long, default_value = "config/vocal-wellness")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP analysis service
    Serve,
    /// Analyze an audio file and print the JSON report
    Analyze {
        /// WAV, MP3, M4A, AAC or MP4 recording
        file: PathBuf,
    },
    /// Print the trend over recent analyses
    Trend,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("Vocal Wellness v{}", env!("CARGO_PKG_VERSION"));
    info!("History file: {}", cfg.history.path.display());

    let pipeline = WellnessPipeline::from_config(&cfg)?;

    match cli.command {
        Command::Serve => {
            let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;

            info!("HTTP server listening on {}", addr);
            axum::serve(listener, create_router(AppState::new(pipeline))).await?;
        }
        Command::Analyze { file } => {
            let report = tokio::task::spawn_blocking(move || -> Result<_> {
                let audio = AudioFile::open(&file, pipeline.decoder())?;
                Ok(pipeline.analyze_waveform(&audio.waveform)?)
            })
            .await??;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Trend => {
            println!("{}", serde_json::to_string_pretty(&pipeline.trend())?);
        }
    }

    Ok(())
}
