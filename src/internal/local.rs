use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{
    ActrId, ActrType, Config, Error, PayloadType, Result, RpcEnvelope,
    runtime::{Binding, Delivery, PendingId, Registration, Runtime},
};

struct LiveActor {
    actr_type: ActrType,
    mailbox: mpsc::Sender<Delivery>,
    cancel: CancellationToken,
    done: Option<oneshot::Receiver<()>>,
}

/// In-process engine behind the [`Runtime`] seam.
///
/// Keeps a registry of live actors and routes calls straight into their
/// mailboxes. Stands in for a networked engine in local deployments and
/// tests.
pub(crate) struct LocalRuntime {
    realm: Arc<str>,
    pending: Mutex<HashMap<PendingId, ActrType>>,
    live: Mutex<HashMap<ActrId, LiveActor>>,
}

impl LocalRuntime {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            realm: Arc::from(config.realm.as_str()),
            pending: Mutex::new(HashMap::new()),
            live: Mutex::new(HashMap::new()),
        }
    }

    fn pending_map(&self) -> std::sync::MutexGuard<'_, HashMap<PendingId, ActrType>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn live_map(&self) -> std::sync::MutexGuard<'_, HashMap<ActrId, LiveActor>> {
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Runtime for LocalRuntime {
    fn attach(&self, registration: Registration) -> Result<PendingId> {
        let pending = PendingId::generate();
        debug!(realm = %self.realm, actr_type = %registration.actr_type, "workload attached");
        self.pending_map()
            .insert(pending.clone(), registration.actr_type);
        Ok(pending)
    }

    async fn start(&self, pending: PendingId, binding: Binding) -> Result<ActrId> {
        let actr_type = self
            .pending_map()
            .remove(&pending)
            .ok_or_else(|| Error::state("pending actor is unknown or already started"))?;
        let id = ActrId::generate();
        debug!(realm = %self.realm, actor = %id, actr_type = %actr_type, "actor started");
        self.live_map().insert(
            id.clone(),
            LiveActor {
                actr_type,
                mailbox: binding.mailbox,
                cancel: binding.cancel,
                done: Some(binding.done),
            },
        );
        Ok(id)
    }

    async fn call(
        &self,
        target: &ActrId,
        envelope: RpcEnvelope,
        payload_type: PayloadType,
        _timeout: Duration,
    ) -> Result<Vec<u8>> {
        let mailbox = {
            let live = self.live_map();
            let actor = live
                .get(target)
                .ok_or_else(|| Error::runtime(format!("no live actor with id {target}")))?;
            actor.mailbox.clone()
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        mailbox
            .send(Delivery {
                envelope,
                payload_type,
                reply: reply_tx,
            })
            .await?;
        reply_rx.await?
    }

    async fn discover(&self, target_type: &ActrType, limit: u32) -> Result<Vec<ActrId>> {
        let live = self.live_map();
        Ok(live
            .iter()
            .filter(|(_, actor)| actor.actr_type == *target_type)
            .take(limit as usize)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn shutdown(&self, target: &ActrId) -> Result<()> {
        let mut actor = self
            .live_map()
            .remove(target)
            .ok_or_else(|| Error::runtime(format!("no live actor with id {target}")))?;
        debug!(realm = %self.realm, actor = %target, "actor shutting down");
        actor.cancel.cancel();
        drop(actor.mailbox);
        if let Some(done) = actor.done.take() {
            // RecvError here means the actor task is already gone, which
            // still counts as terminated.
            let _ = done.await;
        }
        debug!(realm = %self.realm, actor = %target, "actor terminated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> (Binding, mpsc::Receiver<Delivery>, oneshot::Sender<()>) {
        let (tx, rx) = mpsc::channel(8);
        let (done_tx, done_rx) = oneshot::channel();
        let binding = Binding {
            mailbox: tx,
            cancel: CancellationToken::new(),
            done: done_rx,
        };
        (binding, rx, done_tx)
    }

    #[tokio::test]
    async fn test_start_requires_attached_pending() {
        let runtime = LocalRuntime::new(&Config::default());
        let (b, _rx, _done) = binding();
        let err = runtime.start(PendingId::generate(), b).await.unwrap_err();
        assert!(matches!(err, Error::State(_)));
    }

    #[tokio::test]
    async fn test_pending_consumed_by_start() {
        let runtime = LocalRuntime::new(&Config::default());
        let pending = runtime
            .attach(Registration {
                actr_type: ActrType::new("worker"),
            })
            .unwrap();
        let (b1, _rx1, _done1) = binding();
        runtime.start(pending.clone(), b1).await.unwrap();
        let (b2, _rx2, _done2) = binding();
        assert!(runtime.start(pending, b2).await.is_err());
    }

    #[tokio::test]
    async fn test_call_to_unknown_actor_is_runtime_error() {
        let runtime = LocalRuntime::new(&Config::default());
        let err = runtime
            .call(
                &ActrId::generate(),
                RpcEnvelope::new("ping", Vec::<u8>::new()),
                PayloadType::new("()"),
                Duration::from_secs(1),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
    }

    #[tokio::test]
    async fn test_discover_filters_by_type_and_limit() {
        let runtime = LocalRuntime::new(&Config::default());
        let mut keep = Vec::new();
        for actr_type in ["worker", "worker", "worker", "gateway"] {
            let pending = runtime
                .attach(Registration {
                    actr_type: ActrType::new(actr_type),
                })
                .unwrap();
            let (b, rx, done) = binding();
            runtime.start(pending, b).await.unwrap();
            keep.push((rx, done));
        }
        let workers = runtime
            .discover(&ActrType::new("worker"), 2)
            .await
            .unwrap();
        assert_eq!(workers.len(), 2);
        let gateways = runtime
            .discover(&ActrType::new("gateway"), 10)
            .await
            .unwrap();
        assert_eq!(gateways.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_and_awaits_done() {
        let runtime = LocalRuntime::new(&Config::default());
        let pending = runtime
            .attach(Registration {
                actr_type: ActrType::new("worker"),
            })
            .unwrap();
        let (tx, mut rx) = mpsc::channel::<Delivery>(8);
        let (done_tx, done_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let id = runtime
            .start(
                pending,
                Binding {
                    mailbox: tx,
                    cancel: cancel.clone(),
                    done: done_rx,
                },
            )
            .await
            .unwrap();

        // Simulated actor task: terminates once cancelled.
        let task = tokio::spawn(async move {
            cancel.cancelled().await;
            rx.close();
            let _ = done_tx.send(());
        });

        runtime.shutdown(&id).await.unwrap();
        task.await.unwrap();
        assert!(runtime.discover(&ActrType::new("worker"), 1).await.unwrap().is_empty());
    }
}
