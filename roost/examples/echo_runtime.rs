// Runs a small node on the in-process collaborators: an "echo" actor receives
// network events, each one handled on a worker thread, and the node shuts down
// once every actor has retired.
//
//   cargo run --example echo_runtime [config.json]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use roost::local::LocalNode;
use roost::{boot, logging, RuntimeConfig};
use roost_api::{ActorHandle, Collaborators, LiveActors, Platform, PlatformSettings, ServiceError};

const EVENTS: usize = 32;

struct LocalPlatform {
    node: LocalNode,
    next_handle: AtomicU32,
}

impl Platform for LocalPlatform {
    fn init(&self, settings: &PlatformSettings) -> Result<(), ServiceError> {
        tracing::info!(harbor = settings.harbor, module_path = %settings.module_path, "platform ready");
        Ok(())
    }

    fn launch(&self, module: &str, args: &str) -> Option<ActorHandle> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.node.actors.spawned();
        tracing::info!(module = module, args = args, handle = handle, "actor launched");
        Some(handle)
    }

    fn register(&self, handle: ActorHandle, name: &str) -> Result<(), ServiceError> {
        tracing::info!(handle = handle, name = name, "name registered");
        Ok(())
    }

    fn start_harbor(&self, _master: Option<&str>, _local: Option<&str>) -> Result<(), ServiceError> {
        Ok(())
    }

    fn collaborators(&self) -> Collaborators {
        self.node.collaborators()
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_default();

    let config = match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::with_workers(4),
    };

    let node = LocalNode::new(0);
    let platform = LocalPlatform {
        node: node.clone(),
        next_handle: AtomicU32::new(1),
    };

    let echoed = Arc::new(AtomicUsize::new(0));
    let client = {
        let node = node.clone();
        let echoed = Arc::clone(&echoed);
        thread::spawn(move || {
            // Wait for bootstrap to register its actors before sending.
            while node.actors.remaining() == 0 {
                thread::sleep(Duration::from_millis(1));
            }
            for i in 0..EVENTS {
                let echoed = Arc::clone(&echoed);
                node.poller.deliver(0, 1, move || {
                    echoed.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(event = i, "echo");
                });
            }
            while echoed.load(Ordering::Relaxed) < EVENTS {
                thread::sleep(Duration::from_millis(5));
            }
            node.actors.set(0);
        })
    };

    let report = boot(config, &platform)?;
    let _ = client.join();

    println!(
        "echoed {} events on {} workers ({} timer ticks)",
        echoed.load(Ordering::Relaxed),
        report.workers.len(),
        report.timer_ticks
    );
    Ok(())
}
