//! # Node Bootstrap
//!
//! Brings a runtime node up in the fixed order its services depend on, then
//! hands control to the thread orchestrator until the last actor is gone.
//!
//! ## Startup Sequence
//! 1. Validate the configuration
//! 2. Initialize platform subsystems (harbor, handles, queues, modules, clock, poller)
//! 3. Launch the logger actor; without it nothing can report, so this is fatal
//! 4. Launch the master actor when the node is standalone
//! 5. Start the harbor link to the master
//! 6. Launch the launcher actor, register it as `.launcher`, launch the start script
//! 7. Run the worker threads

use tracing::{info, warn};

use roost_api::Platform;

use crate::thread::config::RuntimeConfig;
use crate::thread::error::BootError;
use crate::thread::orchestrator::{Orchestrator, RunReport};

pub const LOGGER_MODULE: &str = "logger";
pub const MASTER_MODULE: &str = "master";
pub const LAUNCHER_ARGS: &str = "launcher";
pub const LAUNCHER_NAME: &str = ".launcher";

/// Bring the node up and run it until shutdown.
pub fn boot(config: RuntimeConfig, platform: &dyn Platform) -> Result<RunReport, BootError> {
    config.validate()?;
    platform.init(&config.platform_settings())?;

    let logger_args = config.logger.as_deref().unwrap_or("");
    if platform.launch(LOGGER_MODULE, logger_args).is_none() {
        return Err(BootError::LoggerUnavailable(logger_args.to_string()));
    }

    if let Some(standalone) = config.standalone.as_deref() {
        if platform.launch(MASTER_MODULE, standalone).is_none() {
            return Err(BootError::MasterUnavailable(standalone.to_string()));
        }
    }

    platform
        .start_harbor(config.master.as_deref(), config.local.as_deref())
        .map_err(|e| BootError::HarborStart(e.to_string()))?;

    match platform.launch(&config.script_module, LAUNCHER_ARGS) {
        Some(launcher) => {
            if let Err(e) = platform.register(launcher, LAUNCHER_NAME) {
                warn!(handle = launcher, error = %e, "launcher name registration failed");
            }
            if platform.launch(&config.script_module, &config.start).is_none() {
                warn!(start = %config.start, "start script failed to launch");
            }
        }
        None => warn!(module = %config.script_module, "launcher failed to launch"),
    }

    info!(harbor = config.harbor, workers = config.thread, "node started");
    let orchestrator = Orchestrator::new(config, platform.collaborators());
    Ok(orchestrator.run()?)
}
