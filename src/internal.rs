mod handler;
mod local;

pub(crate) use handler::WorkloadHandler;
pub(crate) use local::LocalRuntime;
