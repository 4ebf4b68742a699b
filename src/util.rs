//! Utilities for spawning external commands.
//!
//! Commands are fire-and-forget: the window manager never waits on a
//! child. Exited children are reaped from a SIGCHLD handler instead,
//! so that they never linger as zombies and the event loop never blocks.

use std::ffi::OsStr;
use std::process::{Command, Stdio};

use nix::libc::c_int;
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use tracing::{debug, instrument};

use crate::{Result, WmError};

/// Launches a command detached from the window manager.
#[instrument(level = "debug", skip_all)]
pub fn spawn<S>(argv: &[S]) -> Result<()>
where
    S: AsRef<OsStr>,
{
    let Some((command, args)) = argv.split_first() else {
        return Err(WmError::Spawn("empty command".into()))
    };

    let child = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| {
            WmError::Spawn(format!("{}: {}", command.as_ref().to_string_lossy(), e))
        })?;

    debug!("spawned process {}", child.id());
    Ok(())
}

extern "C" fn reap_children(_: c_int) {
    // only async-signal-safe calls in here
    loop {
        match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) | Err(_) => break,
            Ok(_) => continue,
        }
    }
}

/// Installs the SIGCHLD handler that reaps exited children.
pub fn install_child_reaper() -> Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(reap_children),
        SaFlags::SA_RESTART | SaFlags::SA_NOCLDSTOP,
        SigSet::empty(),
    );

    // SAFETY: the handler only calls waitpid, which is async-signal-safe
    unsafe { signal::sigaction(Signal::SIGCHLD, &action) }
        .map_err(|e| WmError::Spawn(format!("could not install SIGCHLD handler: {}", e)))?;

    debug!("installed SIGCHLD handler");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_empty_command() {
        let argv: [&str; 0] = [];

        assert!(matches!(spawn(&argv), Err(WmError::Spawn(_))));
    }

    #[test]
    fn test_spawn_missing_binary() {
        assert!(spawn(&["/nonexistent/tsukiwm-test-binary"]).is_err());
    }
}
