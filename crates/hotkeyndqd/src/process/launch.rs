//! Supervises relay launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::{info, warn};

use crate::bootstrap::{ConfigLoader, SystemConfigLoader};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::server::start_server;
use crate::sink::{BackendEventSink, EventSink};
use crate::telemetry;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::signals::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the relay.
pub struct LaunchPlan<L, S> {
    /// Source of the configuration.
    pub loader: L,
    /// External shutdown notifications.
    pub signal: S,
    /// Lifecycle observer.
    pub reporter: Arc<dyn HealthReporter>,
}

/// Runs the relay using the production collaborators.
///
/// # Errors
///
/// Returns [`LaunchError`] when configuration, telemetry, socket binding or
/// signal installation fails, or when a server thread panics.
pub fn run_server() -> Result<(), LaunchError> {
    run_server_with(LaunchPlan {
        loader: SystemConfigLoader,
        signal: SystemShutdownSignal::new(),
        reporter: Arc::new(StructuredHealthReporter::new()),
    })
}

/// Runs the relay with injected collaborators and blocks until it stops.
///
/// # Errors
///
/// See [`run_server`].
pub fn run_server_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        signal,
        reporter,
    } = plan;

    let config = loader.load()?;
    telemetry::initialise(&config)?;
    info!(
        target: PROCESS_TARGET,
        version = env!("CARGO_PKG_VERSION"),
        "starting command relay"
    );

    let mode = config.backend();
    reporter.backend_selected(mode);
    let sink: Arc<dyn EventSink> = Arc::new(BackendEventSink::for_mode(mode));
    let server = start_server(&config, sink, Arc::clone(&reporter))?;

    let watch = match signal.watch(server.shutdown_handle()) {
        Ok(watch) => watch,
        Err(error) => {
            if let Err(join_error) = server.join() {
                warn!(
                    target: PROCESS_TARGET,
                    error = %join_error,
                    "server did not stop cleanly"
                );
            }
            return Err(error.into());
        }
    };

    let reason = server.wait();
    watch.close();
    server.join()?;
    info!(
        target: PROCESS_TARGET,
        %reason,
        "shutdown sequence completed"
    );
    Ok(())
}
