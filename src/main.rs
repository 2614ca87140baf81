use clap::Parser;
use graphchat::ProbePolicy;
use graphchat::core::config::{self, CliOverrides, GraphchatConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "graphchat", about = "Terminal chat client for a graph-based assistant backend")]
struct Args {
    /// Backend base URL (overrides config file and GRAPHCHAT_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Conversation thread to resume
    #[arg(short, long)]
    thread_id: Option<String>,

    /// How health probe responses map to "connected"
    #[arg(long, value_enum)]
    probe_policy: Option<ProbePolicy>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to graphchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("graphchat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(file_config) => file_config,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            GraphchatConfig::default()
        }
    };

    let overrides = CliOverrides {
        base_url: args.base_url,
        thread_id: args.thread_id,
        probe_policy: args.probe_policy,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "graphchat starting up: backend={}, thread={}, probe_policy={:?}",
        resolved.base_url,
        resolved.thread_id,
        resolved.probe_policy
    );

    graphchat::tui::run(resolved)
}
