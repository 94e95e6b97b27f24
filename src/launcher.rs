//! Program-launch side effect: best-effort OS open of `<program>://`.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::traits::ProgramLauncher;

pub struct SystemLauncher;

#[async_trait]
impl ProgramLauncher for SystemLauncher {
    async fn launch(&self, program: &str) -> anyhow::Result<()> {
        let uri = format!("{}://", program.trim());
        info!(uri = %uri, "Requesting OS open");
        // Spawn without waiting: whether the URI scheme resolves to anything
        // is unobservable from here.
        open_command(&uri).spawn()?;
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn open_command(uri: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(uri);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(uri: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", uri]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(uri: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(uri);
    cmd
}
