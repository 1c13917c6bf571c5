use serde::{Serialize, de::DeserializeOwned};

/// Associates an RPC request message with its response type and route key.
///
/// Implementing this for a message type lets callers use
/// [`Actr::request`](crate::Actr::request) instead of spelling out the route
/// and response type at every call site:
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct GetStatus;
///
/// impl RpcRequest for GetStatus {
///     type Response = Status;
///     const ROUTE_KEY: &'static str = "status.get";
/// }
///
/// let status = actor.request(&GetStatus).await?;
/// ```
pub trait RpcRequest: Serialize + Send + Sync {
    type Response: DeserializeOwned + Send;

    const ROUTE_KEY: &'static str;
}
