use tokio::{select, sync::{mpsc::Receiver, oneshot}};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use crate::{Workload, WorkloadContext, runtime::Delivery};

/// Per-actor task driving one workload.
///
/// Processes mailbox deliveries sequentially until cancelled or the mailbox
/// closes, then signals termination through `done`. Deliveries still queued
/// when cancellation lands are dropped; their callers observe a
/// runtime-kind failure.
pub(crate) struct WorkloadHandler<W: Workload> {
    pub(crate) workload: W,
    pub(crate) receiver: Receiver<Delivery>,
    pub(crate) ctx: WorkloadContext,
    pub(crate) cancel: CancellationToken,
    pub(crate) done: oneshot::Sender<()>,
}

impl<W: Workload> WorkloadHandler<W> {
    pub(crate) async fn run(mut self) {
        if let Err(e) = self.workload.on_start(&self.ctx).await {
            warn!(actor = %self.ctx.actr_id(), error = %e, "workload on_start failed, terminating");
        } else {
            loop {
                select! {
                    _ = self.cancel.cancelled() => break,
                    delivery = self.receiver.recv() => match delivery {
                        Some(d) => {
                            trace!(
                                actor = %self.ctx.actr_id(),
                                route = d.envelope.route_key(),
                                payload_type = %d.payload_type,
                                "delivery received"
                            );
                            let res = self.workload.handle_rpc(&self.ctx, &d.envelope).await;
                            // The caller may have abandoned the call already.
                            let _ = d.reply.send(res);
                        }
                        None => break,
                    },
                }
            }
        }

        if let Err(e) = self.workload.on_shutdown(&self.ctx).await {
            warn!(actor = %self.ctx.actr_id(), error = %e, "workload on_shutdown failed");
        }
        let _ = self.done.send(());
    }
}
