//! kbgwm: a small floating window manager for X11
//!
//! Log output is controlled through `RUST_LOG` and defaults to `info`.
use kbgwm::{x11rb::Conn, Config, WindowManager};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run() {
        error!(%e, "fatal error");
        process::exit(1);
    }
}

fn run() -> kbgwm::Result<()> {
    let conn = Conn::new()?;
    let wm = WindowManager::new(Config::default(), conn)?;

    wm.run()
}
