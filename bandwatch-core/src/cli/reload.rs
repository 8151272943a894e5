use crate::logging::SharedOutput;
use crate::systemd;
use tokio::signal::unix::{SignalKind, signal};

/// Reopens `output` on every SIGHUP, telling the service manager around it.
pub async fn handle_hangups(output: SharedOutput) -> anyhow::Result<()> {
    let mut hup = signal(SignalKind::hangup())?;

    while hup.recv().await.is_some() {
        tracing::info!("SIGHUP received");
        if let Err(e) = systemd::notify_reloading() {
            tracing::warn!(error = %e, "failed to notify reloading");
        }
        if let Err(e) = output.reopen() {
            tracing::error!(error = %e, "failed to reopen output log");
        }
        if let Err(e) = systemd::notify_ready() {
            tracing::warn!(error = %e, "failed to notify ready");
        }
    }
    Ok(())
}
