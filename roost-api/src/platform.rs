//! # Platform Bootstrap Contract
//!
//! Everything a runtime node needs before its worker threads start: subsystem
//! initialization, actor launch by module name, name registration, and the
//! cluster link. The roost core drives these in a fixed order and then hands
//! [`Platform::collaborators`] to its thread orchestrator.

use crate::collaborators::Collaborators;
use crate::errors::ServiceError;
use crate::types::ActorHandle;

/// Settings a platform needs to initialize its subsystems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSettings {
    /// Cluster node id.
    pub harbor: u8,
    /// Module search path.
    pub module_path: String,
}

pub trait Platform: Send + Sync {
    /// Initialize harbor, handle registry, message queues, module loader, clock
    /// and poll subsystem, in that order.
    fn init(&self, settings: &PlatformSettings) -> Result<(), ServiceError>;

    /// Create an actor from `module` with `args`. `None` if the module could not
    /// be loaded or its instance failed to initialize.
    fn launch(&self, module: &str, args: &str) -> Option<ActorHandle>;

    /// Bind a well-known `name` to `handle`.
    fn register(&self, handle: ActorHandle, name: &str) -> Result<(), ServiceError>;

    /// Connect to the cluster master (if any) and start the local harbor service.
    fn start_harbor(&self, master: Option<&str>, local: Option<&str>) -> Result<(), ServiceError>;

    /// Collaborators the worker-thread core runs against.
    fn collaborators(&self) -> Collaborators;
}
