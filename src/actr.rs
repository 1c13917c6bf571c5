use std::{
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    ActrId, ActrType, Error, PayloadType, Result, RpcEnvelope, RpcRequest, payload,
    runtime::Runtime,
};

/// Per-call overrides for [`Actr::call_with`].
///
/// `None` fields fall back to the defaults: the payload type derived from
/// the request's Rust type, and the timeout configured on the system
/// (30 000 ms unless overridden).
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub payload_type: Option<PayloadType>,
    pub timeout: Option<Duration>,
}

impl CallOptions {
    pub fn with_payload_type(mut self, payload_type: PayloadType) -> Self {
        self.payload_type = Some(payload_type);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_ms(self, ms: u64) -> Self {
        self.with_timeout(Duration::from_millis(ms))
    }
}

struct ActrRef {
    id: ActrId,
    runtime: Arc<dyn Runtime>,
    default_timeout: Duration,
    stopped: Mutex<bool>,
    in_flight: AtomicU32,
}

/// Decrements the in-flight counter when the operation completes or its
/// future is dropped mid-await.
struct OpGuard<'a> {
    in_flight: &'a AtomicU32,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A live, addressable reference to a running actor.
///
/// Obtained from [`Node::start`](crate::Node::start). Cheap to clone; every
/// clone addresses the same actor. Concurrent calls from different holders
/// are safe: the lifecycle flag is mutex-guarded and the in-flight count is
/// atomic, with neither held across the network await, so the awaited
/// runtime work of separate calls proceeds concurrently. No ordering is
/// promised between the completions of concurrent calls.
///
/// After [`stop`](Actr::stop) completes the identity is no longer
/// addressable; `call` and `discover` fail with a state error, a repeated
/// `stop` is a no-op.
#[derive(Clone)]
pub struct Actr {
    inner: Arc<ActrRef>,
}

impl Actr {
    pub(crate) fn new(id: ActrId, runtime: Arc<dyn Runtime>, default_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(ActrRef {
                id,
                runtime,
                default_timeout,
                stopped: Mutex::new(false),
                in_flight: AtomicU32::new(0),
            }),
        }
    }

    /// Identity assigned at start. Stable for the life of the actor.
    #[inline]
    pub fn id(&self) -> &ActrId {
        &self.inner.id
    }

    /// Perform a typed RPC call with default payload type and timeout.
    pub async fn call<Req, Res>(&self, route: &str, message: &Req) -> Result<Res>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        self.call_with(route, message, CallOptions::default()).await
    }

    /// Perform a typed RPC call.
    ///
    /// The route must be non-empty; an empty route fails with a state error
    /// before anything reaches the runtime. The message is encoded, routed
    /// to the actor, and the response bytes are decoded into `Res`; a
    /// schema mismatch fails with a serialization error. An elapsed budget
    /// fails with a timeout error, distinct from routing and decode
    /// failures.
    pub async fn call_with<Req, Res>(
        &self,
        route: &str,
        message: &Req,
        options: CallOptions,
    ) -> Result<Res>
    where
        Req: Serialize + Sync,
        Res: DeserializeOwned,
    {
        if route.is_empty() {
            return Err(Error::state("route must not be empty"));
        }
        let bytes = payload::to_bytes(message)?;
        let payload_type = options.payload_type.unwrap_or_else(PayloadType::of::<Req>);
        let budget = options.timeout.unwrap_or(self.inner.default_timeout);

        let _op = self.begin_op().await?;
        let envelope = RpcEnvelope::new(route, bytes);
        let outcome = tokio::time::timeout(
            budget,
            self.inner
                .runtime
                .call(&self.inner.id, envelope, payload_type, budget),
        )
        .await;

        match outcome {
            Ok(response) => payload::from_bytes(&response?),
            Err(_) => Err(Error::Timeout(budget)),
        }
    }

    /// Typed RPC call where the route and response type come from the
    /// message's [`RpcRequest`] impl.
    pub async fn request<R: RpcRequest>(&self, message: &R) -> Result<R::Response> {
        self.call(R::ROUTE_KEY, message).await
    }

    /// Resolve up to `limit` live actors of the given type.
    ///
    /// A zero limit short-circuits to an empty result without a runtime
    /// round-trip. A limit beyond `u32::MAX` fails with a state error
    /// before contacting the runtime. Order among the returned ids is
    /// runtime-defined and not stable across calls.
    pub async fn discover(&self, target_type: &ActrType, limit: usize) -> Result<Vec<ActrId>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = u32::try_from(limit)
            .map_err(|_| Error::state("discovery limit exceeds u32::MAX"))?;

        let _op = self.begin_op().await?;
        self.inner.runtime.discover(target_type, limit).await
    }

    /// Begin shutdown and wait for the runtime to confirm termination.
    ///
    /// Idempotent: a second `stop` returns immediately without waiting,
    /// even while the first is still in flight. Calls still pending when
    /// shutdown lands fail with a runtime error.
    pub async fn stop(&self) -> Result<()> {
        {
            let mut stopped = self.inner.stopped.lock().await;
            if *stopped {
                return Ok(());
            }
            *stopped = true;
            let in_flight = self.inner.in_flight.load(Ordering::Acquire);
            if in_flight > 0 {
                debug!(
                    actor = %self.inner.id,
                    in_flight,
                    "stopping with calls in flight"
                );
            }
        }
        self.inner.runtime.shutdown(&self.inner.id).await
    }

    async fn begin_op(&self) -> Result<OpGuard<'_>> {
        let stopped = self.inner.stopped.lock().await;
        if *stopped {
            return Err(Error::state(format!(
                "actor {} is stopped",
                self.inner.id
            )));
        }
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        Ok(OpGuard {
            in_flight: &self.inner.in_flight,
        })
    }

    #[cfg(test)]
    fn in_flight(&self) -> u32 {
        self.inner.in_flight.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Actr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actr").field("id", &self.inner.id).finish()
    }
}
