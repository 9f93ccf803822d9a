//! # Termination signals for `Service::serve_until_signal`.
//!
//! [`termination_signal`] resolves with the name of the first signal received:
//! - unix: `SIGINT`, `SIGTERM` or `SIGQUIT`
//! - elsewhere: Ctrl-C (`"ctrl-c"`)
//!
//! Handlers are registered per call and released when the future is dropped.

/// Waits for SIGINT, SIGTERM or SIGQUIT and returns its name.
#[cfg(unix)]
pub(crate) async fn termination_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut quit = signal(SignalKind::quit())?;

    let name = tokio::select! {
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = quit.recv() => "SIGQUIT",
    };
    Ok(name)
}

/// Waits for Ctrl-C.
#[cfg(not(unix))]
pub(crate) async fn termination_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("ctrl-c")
}
