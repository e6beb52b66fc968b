//! Keystars entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use keystars::cli::Cli;
use keystars::config::{SinkKind, StarfieldConfig};
use keystars::engine::{self, Engine};
use keystars::input::{self, devices};
use keystars::sink::terminal::watch_quit_keys;
use keystars::sink::{LightingSink, NullSink, TerminalSink};

/// Clear the returned flag on Ctrl+C.
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the terminal preview owns stdout
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(StarfieldConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let mut config = StarfieldConfig::load(&config_path)?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.save_config {
        config.save(&config_path)?;
        println!("Saved config to {}", config_path.display());
        return Ok(());
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if cli.list_devices {
        let keyboards = devices::list_keyboards();
        if keyboards.is_empty() {
            println!("No keyboards found (check read access to /dev/input/event*)");
        }
        for kb in keyboards {
            println!("{}  {}", kb.path.display(), kb.name);
        }
        return Ok(());
    }

    let mut engine = Engine::new(&config).context("Invalid grid layout")?;

    let keyboards = devices::open_keyboards(&config.devices).inspect_err(|e| error!("{e}"))?;
    let (sender, mut source) = input::channel();
    let readers = devices::spawn_readers(keyboards, sender);

    let mut sink: Box<dyn LightingSink> = match config.sink {
        SinkKind::Terminal => Box::new(TerminalSink::stdout(
            config.grid_width,
            config.grid_height,
            engine.keymap().labels(),
        )),
        SinkKind::Null => Box::new(NullSink::new()),
    };

    let running = setup_interrupt_handler();
    let quit_watcher = matches!(config.sink, SinkKind::Terminal)
        .then(|| tokio::spawn(watch_quit_keys(Arc::clone(&running))));
    info!("Starting starfield. Press Ctrl+C to exit.");

    let result = engine::run(
        &mut engine,
        &mut source,
        &mut *sink,
        config.tick(),
        config.init_delay(),
        &running,
    )
    .await;

    for reader in readers {
        reader.abort();
    }
    if let Some(watcher) = quit_watcher {
        watcher.abort();
    }

    match result {
        Ok(ticks) => {
            info!("Done ({ticks} frames)");
            Ok(())
        }
        Err(e) => {
            error!("Lighting device failed: {e}");
            Err(e.into())
        }
    }
}
