//! Entry point for the **winsnap** daemon.
//!
//! Spawns the Unix-socket [`CommandSource`](winsnap::traits::CommandSource)
//! on a background thread and processes incoming requests one at a time on
//! the main thread, which owns the [`Placer`] and its grid configuration.
//!
//! Options:
//!
//! * `--config <path>`: configuration file (default
//!   `$XDG_CONFIG_HOME/winsnap/config.json`).
//! * `--socket <path>`: control socket (default
//!   `$XDG_RUNTIME_DIR/winsnap.sock`).

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use winsnap::command::Envelope;
use winsnap::config::Config;
use winsnap::ipc::listener::UnixSocketListener;
use winsnap::placer::Placer;
use winsnap::traits::CommandSource;

/// Default socket path for the command listener.
fn default_socket_path() -> String {
    let runtime = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".into());
    format!("{}/winsnap.sock", runtime)
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/winsnap`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("winsnap")
}

/// Load the config from `path`, falling back to compiled-in defaults.
fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no usable config file ({}), using defaults", e);
            Config::default()
        }
    }
}

/// Value following `flag` on the command line, if any.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

//  Main

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = arg_value(&args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_dir().join("config.json"));
    let socket_path = arg_value(&args, "--socket").unwrap_or_else(default_socket_path);

    let config = load_config(&config_path);
    let placer = Placer::new(&config);
    info!(
        "grid {}x{}, margins {}/{}, anchor margin {}, resize step {}",
        placer.grid().columns,
        placer.grid().rows,
        placer.grid().margin_x,
        placer.grid().margin_y,
        placer.placement().margin,
        placer.placement().increment
    );

    let (tx, rx) = mpsc::channel::<Envelope>();
    spawn_command_sources(tx, socket_path);

    run_event_loop(placer, rx);
}

//  Event loop

fn run_event_loop(mut placer: Placer, rx: mpsc::Receiver<Envelope>) {
    info!("winsnap running");
    for envelope in rx {
        let response = placer.respond(&envelope.request);
        if envelope.reply.send(response).is_err() {
            warn!("client went away before its response was sent");
        }
    }
    info!("all command sources closed, exiting");
}

//  Helpers

fn spawn_command_sources(tx: mpsc::Sender<Envelope>, socket_path: String) {
    std::thread::spawn(move || {
        let mut source = UnixSocketListener::new(&socket_path);
        if let Err(e) = source.run(tx) {
            error!("socket listener error: {}", e);
        }
    });
}
