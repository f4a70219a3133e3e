use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

pub const DEFAULT_URL: &str = "https://www.example.com";

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("could not launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Status { program: String, status: ExitStatus },
}

/// The platform command that hands `url` to the default browser.
pub fn browser_command(url: &str) -> Command {
    #[cfg(target_os = "macos")]
    {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        cmd
    }
    #[cfg(target_os = "windows")]
    {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        cmd
    }
}

/// Run a launcher command to completion.
pub fn launch(mut cmd: Command) -> Result<(), BrowserError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!("Running {:?}", cmd);
    let status = cmd
        .status()
        .map_err(|source| BrowserError::Launch { program: program.clone(), source })?;
    if status.success() {
        Ok(())
    } else {
        Err(BrowserError::Status { program, status })
    }
}

pub fn open_url(url: &str) -> Result<(), BrowserError> {
    launch(browser_command(url))
}
