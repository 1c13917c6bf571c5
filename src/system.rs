use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    Config, Node, Result, Workload,
    internal::LocalRuntime,
    runtime::{Registration, Runtime},
};

/// Top-level handle over one runtime instance.
///
/// Built from a [`Config`]; attaches workloads to produce [`Node`]s. The
/// runtime instance is exclusively owned by this system and lives as long
/// as it does.
pub struct System {
    runtime: Arc<dyn Runtime>,
    config: Arc<Config>,
}

impl System {
    /// Create a system from a TOML config file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Config::from_file(path)?))
    }

    /// Create a system from a TOML config `file://` URL.
    ///
    /// Non-file URLs fail with a configuration error before any read.
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(Config::from_url(url)?))
    }

    /// Create a system over the bundled in-process runtime.
    pub fn new(config: Config) -> Self {
        let runtime = Arc::new(LocalRuntime::new(&config));
        Self::with_runtime(config, runtime)
    }

    /// Create a system over an explicit runtime collaborator.
    pub fn with_runtime(config: Config, runtime: Arc<dyn Runtime>) -> Self {
        debug!(realm = %config.realm, "system created");
        Self {
            runtime,
            config: Arc::new(config),
        }
    }

    /// Attach a workload and return a node that can be started.
    ///
    /// Allocates the runtime-side pending descriptor; no actor is live
    /// until [`Node::start`] is called.
    pub fn spawn<W: Workload>(&self, workload: W) -> Result<Node<W>> {
        let actr_type = workload.actr_type();
        let pending = self.runtime.attach(Registration {
            actr_type: actr_type.clone(),
        })?;
        debug!(realm = %self.config.realm, %actr_type, "workload spawned");
        Ok(Node::new(
            self.runtime.clone(),
            self.config.clone(),
            pending,
            workload,
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("System")
            .field("realm", &self.config.realm)
            .finish()
    }
}
