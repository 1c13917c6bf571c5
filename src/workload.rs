use std::future::Future;

use crate::{ActrId, ActrType, RpcEnvelope, Result};

/// Application-supplied handler logic backing one actor.
///
/// The runtime invokes [`handle_rpc`](Workload::handle_rpc) once per routed
/// message delivered to the actor this workload backs. Deliveries to a
/// single actor are processed one at a time; whether different actors share
/// threads is runtime policy, not part of this contract.
///
/// Methods can be written as plain `async fn` thanks to
/// return-position `impl Future`; no `#[async_trait]` is required.
///
/// ```rust,ignore
/// struct Echo;
///
/// impl Workload for Echo {
///     async fn handle_rpc(&mut self, _ctx: &WorkloadContext, envelope: &RpcEnvelope)
///     -> Result<Vec<u8>> {
///         match envelope.route_key() {
///             "echo" => Ok(envelope.payload().to_vec()),
///             route => Err(Error::unknown_route(route)),
///         }
///     }
/// }
/// ```
pub trait Workload: Send + 'static {
    /// Logical type this workload registers under for discovery.
    ///
    /// Defaults to the implementing Rust type's name.
    fn actr_type(&self) -> ActrType
    where
        Self: Sized,
    {
        ActrType::of::<Self>()
    }

    /// Handle one routed message and produce the serialized response.
    ///
    /// Return [`Error::unknown_route`](crate::Error::unknown_route) for
    /// routes this workload does not serve; the caller sees it as a
    /// runtime-kind failure.
    fn handle_rpc(
        &mut self,
        ctx: &WorkloadContext,
        envelope: &RpcEnvelope,
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Called once after the actor is live, before any delivery.
    fn on_start(&mut self, ctx: &WorkloadContext) -> impl Future<Output = Result<()>> + Send {
        let _ = ctx;
        async { Ok(()) }
    }

    /// Called once after the last delivery, as the actor terminates.
    fn on_shutdown(&mut self, ctx: &WorkloadContext) -> impl Future<Output = Result<()>> + Send {
        let _ = ctx;
        async { Ok(()) }
    }
}

/// Runtime-provided context handed to every workload invocation.
#[derive(Debug, Clone)]
pub struct WorkloadContext {
    pub(crate) actr_id: ActrId,
}

impl WorkloadContext {
    /// Identity of the actor this workload is backing.
    #[inline]
    pub fn actr_id(&self) -> &ActrId {
        &self.actr_id
    }
}
