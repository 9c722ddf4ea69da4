use super::{DeathReason, Heart};
use crate::library::{BoxedError, EmptyResult};
use async_trait::async_trait;
use futures::lock::Mutex;
use jatsl::{JobScheduler, State, StatusServer};
use std::any::type_name;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

/// Time granted to scheduled jobs to wind down before they are aborted
const JOB_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Executable module
#[async_trait]
pub trait Module {
    /// Executed before running the core loop
    async fn pre_startup(&mut self) -> EmptyResult {
        Ok(())
    }

    /// Core run loop of the module
    ///
    /// When the function returns `Some(_)` the death of the returned [`Heart`] is awaited before calling the shutdown hook.
    /// Useful for situations where you dispatch background jobs in the run loop but want to hand-off the program lifecycle management.
    ///
    /// Returning `None` results in the program entering a shutdown state and calling the `post_shutdown` hook.
    async fn run(&mut self, scheduler: &JobScheduler) -> Result<Option<Heart>, BoxedError>;

    /// Shutdown hook executed after the core loop and all associated jobs have terminated
    #[instrument(skip(self))]
    async fn post_shutdown(&mut self, termination_reason: &ModuleTerminationReason) {
        if termination_reason.is_failure() {
            error!(%termination_reason, "Module terminated with an error");
        } else {
            info!("Module exited normally");
        }
    }
}

/// Reason why a module has terminated
#[derive(Error, Debug)]
pub enum ModuleTerminationReason {
    /// Startup routine threw an error
    #[error("startup routine threw an error: {0}")]
    StartupFailed(#[source] BoxedError),
    /// Core run loop threw an error
    #[error("error during operation: {0}")]
    OperationalError(#[source] BoxedError),
    /// [`Heart`] provided by module died
    #[error("heart provided by module died: {0}")]
    HeartDied(DeathReason),
    /// Run loop exited cleanly
    #[error("run loop exited cleanly")]
    ExitedNormally,
}

impl ModuleTerminationReason {
    /// Whether the process should report an unsuccessful exit
    ///
    /// Only external termination signals and clean exits of the run loop count as success.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            Self::ExitedNormally | Self::HeartDied(DeathReason::Terminated)
        )
    }
}

/// Runner for [`Module`] implementations
pub struct ModuleRunner {
    shutdown_timeout: Duration,
    status_server_port: Option<u16>,
}

impl ModuleRunner {
    /// Creates a new instance using default timeouts and enabling the status server
    pub fn new_with_status_server(status_server_port: u16) -> Self {
        Self {
            status_server_port: Some(status_server_port),
            ..Default::default()
        }
    }
}

impl Default for ModuleRunner {
    /// Waits indefinitely for the startup and up to 60 seconds for the shutdown
    fn default() -> Self {
        Self {
            shutdown_timeout: Duration::from_secs(60),
            status_server_port: None,
        }
    }
}

impl ModuleRunner {
    /// Executes a [`Module`] until it exits by calling the corresponding lifecycle functions in order
    /// and returns the reason why it terminated.
    #[instrument(skip(self, module), fields(module_name = type_name::<M>()))]
    pub async fn run<M: Module + Send + Sync>(&self, mut module: M) -> ModuleTerminationReason {
        let scheduler = JobScheduler::default();

        let status_state = if let Some(port) = self.status_server_port {
            info!(port, "Spawning status server");
            let (status_state, status_server) = StatusServer::new(&scheduler, port);
            scheduler.spawn_job(status_server).await;
            Some(status_state)
        } else {
            None
        };

        info!("Commencing module startup sequence");
        let termination_reason = match module.pre_startup().await {
            Ok(_) => self.run_loop(&mut module, &scheduler, &status_state).await,
            Err(error) => {
                error!(%error, "Module startup sequence encountered an error");
                ModuleTerminationReason::StartupFailed(error)
            }
        };

        if let Some(state) = status_state {
            *state.lock().await = State::Shutdown;
        }

        info!("Terminating remaining jobs");
        scheduler.terminate_jobs(JOB_GRACE_PERIOD).await;

        info!("Commencing module shutdown sequence");
        let result = timeout(
            self.shutdown_timeout,
            module.post_shutdown(&termination_reason),
        )
        .await;

        if result.is_err() {
            error!("Module shutdown sequence timed out");
        }

        termination_reason
    }

    #[instrument(skip(self, module, scheduler, status_state))]
    async fn run_loop<M: Module + Send + Sync>(
        &self,
        module: &mut M,
        scheduler: &JobScheduler,
        status_state: &Option<Arc<Mutex<State>>>,
    ) -> ModuleTerminationReason {
        info!("Executing module run procedure");
        match module.run(scheduler).await {
            Ok(None) => {
                debug!("Module run procedure completed successfully");
                if let Some(state) = status_state {
                    *state.lock().await = State::Running;
                }
                ModuleTerminationReason::ExitedNormally
            }
            Ok(Some(mut heart)) => {
                debug!("Module run procedure completed successfully, entering run loop");
                if let Some(state) = status_state {
                    *state.lock().await = State::Running;
                }
                let death_reason = heart.death().await;
                info!(%death_reason, "Heart provided by run procedure died");
                ModuleTerminationReason::HeartDied(death_reason)
            }
            Err(error) => {
                error!(%error, "Module run procedure encountered an error");
                ModuleTerminationReason::OperationalError(error)
            }
        }
    }
}
