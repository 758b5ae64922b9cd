//! Utility functions for use in other parts of kbgwm
use crate::{custom_error, Result};
use std::{
    os::unix::process::CommandExt,
    process::{Command, Stdio},
};
use tracing::info;

/// Run an external program given as an argv vector.
///
/// The program is started in its own process group with stdout and stderr redirected to
/// /dev/null. We do not wait for it to exit: with SIGCHLD ignored it is reaped automatically.
pub fn spawn(argv: &[String]) -> Result<()> {
    let (prog, args) = argv
        .split_first()
        .ok_or_else(|| custom_error!("unable to spawn an empty command"))?;

    info!(?argv, "spawning subprocess");
    Command::new(prog)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .process_group(0)
        .spawn()?;

    Ok(())
}
