use anyhow::{bail, Context};
use clap::Parser;
use note_bridge::adapters::client::{parse_melody, NoteClient, JINGLE_BELLS};
use note_bridge::utils::logger;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "play-melody")]
#[command(about = "Plays a melody through a running note-bridge")]
struct Args {
    /// Base URL of the bridge
    #[arg(short, long, default_value = "http://127.0.0.1:5000")]
    url: String,

    /// Comma-separated notes, defaults to Jingle Bells
    #[arg(short, long)]
    notes: Option<String>,

    /// Pause after each note in milliseconds
    #[arg(long, default_value = "600")]
    gap_ms: u64,

    /// Per-request timeout in milliseconds
    #[arg(long, default_value = "1000")]
    timeout_ms: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let notes = match &args.notes {
        Some(notes) => parse_melody(notes),
        None => JINGLE_BELLS.iter().map(|note| note.to_string()).collect(),
    };
    if notes.is_empty() {
        bail!("No notes to play");
    }

    let client = NoteClient::new(&args.url, Duration::from_millis(args.timeout_ms))
        .with_context(|| format!("Invalid bridge URL: {}", args.url))?;

    tracing::info!("🚀 Playing {} notes via {}", notes.len(), client.endpoint());
    let summary = client
        .play_melody(&notes, Duration::from_millis(args.gap_ms))
        .await;

    println!(
        "✅ Song playback complete! {} sent, {} failed",
        summary.sent, summary.failed
    );
    if summary.sent == 0 {
        bail!("No note reached the bridge");
    }

    Ok(())
}
