use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use hand_snake::game::GameConfig;
use hand_snake::modes::PlayMode;
use hand_snake::tracking::TrackerConfig;

#[derive(Parser)]
#[command(name = "hand_snake")]
#[command(version, about = "Snake steered by webcam hand tracking")]
struct Cli {
    /// Camera device index
    #[arg(long, default_value = "0")]
    camera: i32,

    /// Board width in pixels
    #[arg(long, default_value = "600")]
    width: u32,

    /// Board height in pixels
    #[arg(long, default_value = "400")]
    height: u32,

    /// Disable the hand-tracking preview window
    #[arg(long)]
    no_preview: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The board owns stdout; logs go to stderr and stay silent unless
    // RUST_LOG is set.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = GameConfig::new(cli.width, cli.height);
    let tracker_config = TrackerConfig {
        camera_index: cli.camera,
        show_preview: !cli.no_preview,
        ..Default::default()
    };

    let mut mode = PlayMode::new(config, tracker_config)?;
    mode.run().await
}
