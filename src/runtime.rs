use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{ActrId, ActrType, PayloadType, Result, RpcEnvelope};

/// Descriptor handed to the runtime when a workload is attached.
#[derive(Debug, Clone)]
pub struct Registration {
    pub actr_type: ActrType,
}

/// Opaque handle to an attached-but-not-yet-started actor.
///
/// Minted by the runtime in [`Runtime::attach`] and redeemed exactly once
/// by [`Runtime::start`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingId(Uuid);

impl PendingId {
    /// Mint a fresh pending handle. Called by runtime implementations.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

/// One routed request delivered to an actor's mailbox.
///
/// The runtime pushes these into the mailbox it was handed at start; the
/// per-actor task answers through `reply`. A dropped `reply` means the
/// actor terminated before responding.
#[derive(Debug)]
pub struct Delivery {
    pub envelope: RpcEnvelope,
    pub payload_type: PayloadType,
    pub reply: oneshot::Sender<Result<Vec<u8>>>,
}

/// Channel bundle binding a live actor to the runtime.
///
/// Created by the facade at start time: the runtime keeps `mailbox` for
/// routing inbound requests, cancels `cancel` to begin shutdown, and awaits
/// `done` to confirm the actor task has terminated.
pub struct Binding {
    pub mailbox: mpsc::Sender<Delivery>,
    pub cancel: CancellationToken,
    pub done: oneshot::Receiver<()>,
}

/// Contract a client uses to drive the actor runtime.
///
/// The engine behind this trait owns scheduling, transport and persistence;
/// this crate only drives it. The bundled in-process implementation covers
/// local deployments and tests; a networked engine plugs in through
/// [`System::with_runtime`](crate::System::with_runtime).
#[async_trait]
pub trait Runtime: Send + Sync + 'static {
    /// Register a workload's type, allocating a pending actor descriptor.
    /// No actor is live until the descriptor is started.
    fn attach(&self, registration: Registration) -> Result<PendingId>;

    /// Instantiate the pending actor, assign its identity and begin
    /// accepting messages. Resolves once the actor is addressable.
    async fn start(&self, pending: PendingId, binding: Binding) -> Result<ActrId>;

    /// Route one request to a live actor and await its response bytes.
    ///
    /// `timeout` is the caller's budget, forwarded so the engine can stop
    /// spending resources on an expired request; the facade enforces the
    /// budget on its side regardless.
    async fn call(
        &self,
        target: &ActrId,
        envelope: RpcEnvelope,
        payload_type: PayloadType,
        timeout: Duration,
    ) -> Result<Vec<u8>>;

    /// Resolve up to `limit` live actors of the given type. Order among the
    /// returned ids is unspecified.
    async fn discover(&self, target_type: &ActrType, limit: u32) -> Result<Vec<ActrId>>;

    /// Begin shutdown of a live actor and resolve once it has terminated.
    async fn shutdown(&self, target: &ActrId) -> Result<()>;
}
