//! OS signal handling.
//!
//! SIGINT and SIGTERM disconnect the bot and trigger graceful shutdown; the
//! process then exits with status 0 from `main`. Handlers are installed at
//! most once per process, and they are registered before `install` returns.

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::bot::{BotConnector, ConnectionManager};
use crate::lifecycle::Shutdown;

static INSTALLED: AtomicBool = AtomicBool::new(false);

/// Register the handlers and spawn the watcher.
///
/// Returns `None` if handlers are already installed or registration fails.
/// Must be called from within a tokio runtime.
pub fn install<C: BotConnector>(
    manager: Arc<ConnectionManager<C>>,
    shutdown: Shutdown,
) -> Option<JoinHandle<()>> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        tracing::debug!("Signal handlers already installed");
        return None;
    }

    let termination = match Termination::listen() {
        Ok(termination) => termination,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register shutdown signal handlers");
            INSTALLED.store(false, Ordering::SeqCst);
            return None;
        }
    };

    Some(tokio::spawn(watch(manager, shutdown, termination.recv())))
}

/// Wait for `signal`, then disconnect the bot and trigger shutdown.
async fn watch<C, F>(manager: Arc<ConnectionManager<C>>, shutdown: Shutdown, signal: F)
where
    C: BotConnector,
    F: Future<Output = io::Result<&'static str>>,
{
    match signal.await {
        Ok(signal) => tracing::info!(signal, "Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signals");
            return;
        }
    }
    manager.disconnect();
    shutdown.trigger();
}

/// Registered SIGINT and SIGTERM streams.
#[cfg(unix)]
#[derive(Debug)]
pub struct Termination {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Termination {
    pub fn listen() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Resolve when either signal arrives, yielding its name.
    pub async fn recv(mut self) -> io::Result<&'static str> {
        tokio::select! {
            _ = self.interrupt.recv() => Ok("SIGINT"),
            _ = self.terminate.recv() => Ok("SIGTERM"),
        }
    }
}

/// Ctrl+C, the only termination signal outside unix.
#[cfg(not(unix))]
#[derive(Debug)]
pub struct Termination;

#[cfg(not(unix))]
impl Termination {
    pub fn listen() -> io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(self) -> io::Result<&'static str> {
        tokio::signal::ctrl_c().await?;
        Ok("ctrl-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::bot::MockConnector;
    use crate::config::{ConnectionConfig, ConnectionOverrides};
    use crate::observability::RecordingSink;

    fn connected_manager() -> Arc<ConnectionManager<MockConnector>> {
        let manager = Arc::new(ConnectionManager::new(
            MockConnector::new(),
            ConnectionConfig::default(),
            Arc::new(RecordingSink::new()),
        ));
        manager.connect(&ConnectionOverrides::default()).unwrap();
        manager
    }

    #[tokio::test]
    async fn signal_disconnects_then_triggers_shutdown() {
        let manager = connected_manager();
        let handle = manager.handle().unwrap();
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        watch(manager.clone(), shutdown, async { Ok("SIGTERM") }).await;

        assert_eq!(handle.quit_count(), 1);
        assert!(manager.handle().is_none());
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn listener_failure_leaves_service_running() {
        let manager = connected_manager();
        let handle = manager.handle().unwrap();
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        watch(manager.clone(), shutdown, async {
            Err(io::Error::new(io::ErrorKind::Other, "no signal driver"))
        })
        .await;

        assert_eq!(handle.quit_count(), 0);
        assert!(manager.handle().is_some());
        assert!(rx.try_recv().is_err());
    }

    // The only test in this binary that installs process-wide handlers.
    #[cfg(unix)]
    #[tokio::test]
    async fn install_once_and_stop_on_sigterm() {
        let manager = connected_manager();
        let handle = manager.handle().unwrap();
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();

        let watcher = install(manager.clone(), shutdown.clone()).expect("first install");
        assert!(install(manager.clone(), shutdown.clone()).is_none());

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .expect("kill runs");
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), watcher)
            .await
            .expect("watcher finishes")
            .unwrap();

        assert_eq!(handle.quit_count(), 1);
        assert!(manager.handle().is_none());
        assert!(rx.try_recv().is_ok());
    }
}
