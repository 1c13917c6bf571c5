use std::{sync::Arc, time::Duration};

use tokio::sync::{Mutex, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    Actr, Config, Error, Result, Workload, WorkloadContext,
    internal::WorkloadHandler,
    runtime::{Binding, PendingId, Runtime},
};

struct PendingNode<W> {
    pending: PendingId,
    workload: W,
}

/// A configured-but-not-yet-running actor descriptor.
///
/// Produced by [`System::spawn`](crate::System::spawn) and consumed by
/// [`start`](Node::start). The descriptor is a one-shot resource: the
/// second `start` on the same node fails with a state error, as does a
/// `start` after a failed one.
pub struct Node<W: Workload> {
    runtime: Arc<dyn Runtime>,
    config: Arc<Config>,
    slot: Mutex<Option<PendingNode<W>>>,
}

impl<W: Workload> Node<W> {
    pub(crate) fn new(
        runtime: Arc<dyn Runtime>,
        config: Arc<Config>,
        pending: PendingId,
        workload: W,
    ) -> Self {
        Self {
            runtime,
            config,
            slot: Mutex::new(Some(PendingNode { pending, workload })),
        }
    }

    /// Ask the runtime to instantiate and run the actor for this node's
    /// workload. Suspends until the actor has an assigned identity and is
    /// accepting messages, then returns the live reference.
    pub async fn start(&self) -> Result<Actr> {
        // A zero-capacity mailbox would panic in the channel constructor.
        // Parsed configs reject this already; builder-made ones reach here.
        if self.config.node.channel_size == 0 {
            return Err(Error::state("node.channel_size must be at least 1"));
        }
        let PendingNode { pending, workload } = self
            .slot
            .lock()
            .await
            .take()
            .ok_or_else(|| Error::state("node has already been started"))?;

        let (mailbox_tx, mailbox_rx) = mpsc::channel(self.config.node.channel_size);
        let (done_tx, done_rx) = oneshot::channel();
        let cancel = CancellationToken::new();

        let id = self
            .runtime
            .start(
                pending,
                Binding {
                    mailbox: mailbox_tx,
                    cancel: cancel.clone(),
                    done: done_rx,
                },
            )
            .await?;
        debug!(actor = %id, "node started");

        let handler = WorkloadHandler {
            workload,
            receiver: mailbox_rx,
            ctx: WorkloadContext { actr_id: id.clone() },
            cancel,
            done: done_tx,
        };
        tokio::spawn(handler.run());

        Ok(Actr::new(
            id,
            self.runtime.clone(),
            Duration::from_millis(self.config.rpc.default_timeout_ms),
        ))
    }
}
