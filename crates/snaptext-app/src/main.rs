use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use snaptext_config::Config;
use tokio::signal;

mod context;
mod controller;
mod events;
mod io;
mod lifecycle;
mod session;
mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::state::AppState;

/// Capture a screen region, recognize its text, translate on demand.
#[derive(Parser)]
#[command(name = "snaptext", version)]
struct Args {
    /// Recognition engine executable
    #[arg(long)]
    engine_exe: Option<PathBuf>,
    /// Directory holding the engine's models/libraries
    #[arg(long)]
    engine_libs: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(atty::is(atty::Stream::Stdout))
        .init();

    let args = Args::parse();
    let mut config = Config::new();
    if let Some(exe) = args.engine_exe {
        config.engine.exe_path = Some(exe);
    }
    if let Some(libs) = args.engine_libs {
        config.engine.lib_dir = Some(libs);
    }

    let state = Arc::new(AppState::new(config));
    let controller = AppController::new(state);
    let tasks = controller.spawn_tasks();

    // Ctrl+C quits the UI loop; everything else unwinds behind it.
    tokio::spawn(async {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown requested");
            snaptext_ui::request_quit();
        }
    });

    // The shell owns this thread until quit; background tasks run on the pool.
    let result = controller.run_ui().await;

    controller.shutdown();
    drop(tasks);
    result
}
