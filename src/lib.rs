//! actr - Client facade for a distributed actor runtime
//!
//! Define a configuration, spawn long-lived actors backed by application
//! workloads, address them by identity or type-based discovery, and talk to
//! them through typed request/response RPC over binary payloads.
//!
//! ```rust,ignore
//! let system = System::from_file("actr.toml")?;
//! let node = system.spawn(EchoWorkload)?;
//! let actor = node.start().await?;
//! let reply: Greeting = actor.call("greet", &Hello { name: "sol".into() }).await?;
//! actor.stop().await?;
//! ```
//!
//! The engine behind the facade (scheduling, transport, persistence) sits
//! behind the [`runtime::Runtime`] trait; an in-process implementation is
//! bundled for local use and tests.

mod actr;
mod config;
mod envelope;
mod error;
mod id;
mod node;
pub mod payload;
mod request;
mod system;
mod workload;

mod internal;
pub mod runtime;

pub use actr::{Actr, CallOptions};
pub use config::Config;
pub use envelope::RpcEnvelope;
pub use error::Error;
pub use id::{ActrId, ActrType};
pub use node::Node;
pub use payload::PayloadType;
pub use request::RpcRequest;
pub use system::System;
pub use workload::{Workload, WorkloadContext};

pub type Result<T = ()> = std::result::Result<T, Error>;
