//! Node and actor lifecycle: one-shot start, stable identity, terminal stop.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use actr::{Config, Error, Result, RpcEnvelope, System, Workload, WorkloadContext};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

struct Echo;

impl Workload for Echo {
    async fn handle_rpc(
        &mut self,
        _ctx: &WorkloadContext,
        envelope: &RpcEnvelope,
    ) -> Result<Vec<u8>> {
        Ok(envelope.payload().to_vec())
    }
}

struct Hooked {
    started: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl Workload for Hooked {
    async fn handle_rpc(
        &mut self,
        _ctx: &WorkloadContext,
        envelope: &RpcEnvelope,
    ) -> Result<Vec<u8>> {
        Ok(envelope.payload().to_vec())
    }

    async fn on_start(&mut self, _ctx: &WorkloadContext) -> Result<()> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn on_shutdown(&mut self, _ctx: &WorkloadContext) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_start_twice_fails_second_invocation() {
    init_tracing();
    let system = System::new(Config::default());
    let node = system.spawn(Echo).unwrap();

    let actor = node.start().await.unwrap();
    let err = node.start().await.unwrap_err();
    assert!(matches!(err, Error::State(_)));

    actor.stop().await.unwrap();
}

#[tokio::test]
async fn test_zero_channel_size_fails_start_without_panicking() {
    init_tracing();
    let system = System::new(Config::default().with_channel_size(0));
    let node = system.spawn(Echo).unwrap();
    let err = node.start().await.unwrap_err();
    assert!(matches!(err, Error::State(_)));
}

#[tokio::test]
async fn test_id_is_stable_across_reads_and_clones() {
    init_tracing();
    let system = System::new(Config::default());
    let actor = system.spawn(Echo).unwrap().start().await.unwrap();

    let id = actor.id().clone();
    assert_eq!(&id, actor.id());
    assert_eq!(&id, actor.clone().id());

    actor.stop().await.unwrap();
    // Identity is still readable after stop, just no longer addressable.
    assert_eq!(&id, actor.id());
}

#[tokio::test]
async fn test_operations_after_stop_fail_with_state_error() {
    init_tracing();
    let system = System::new(Config::default());
    let actor = system.spawn(Echo).unwrap().start().await.unwrap();
    actor.stop().await.unwrap();

    let err = actor.call::<_, u32>("echo", &1u32).await.unwrap_err();
    assert!(matches!(err, Error::State(_)));
    let err = actor.discover(&"echo".into(), 1).await.unwrap_err();
    assert!(matches!(err, Error::State(_)));
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    init_tracing();
    let system = System::new(Config::default());
    let actor = system.spawn(Echo).unwrap().start().await.unwrap();

    actor.stop().await.unwrap();
    actor.stop().await.unwrap();
    actor.clone().stop().await.unwrap();
}

#[tokio::test]
async fn test_lifecycle_hooks_run_once_each() {
    init_tracing();
    let started = Arc::new(AtomicBool::new(false));
    let stopped = Arc::new(AtomicBool::new(false));
    let system = System::new(Config::default());
    let actor = system
        .spawn(Hooked {
            started: started.clone(),
            stopped: stopped.clone(),
        })
        .unwrap()
        .start()
        .await
        .unwrap();

    // on_start runs before the first delivery is answered.
    let _: u32 = actor.call("any", &7u32).await.unwrap();
    assert!(started.load(Ordering::SeqCst));
    assert!(!stopped.load(Ordering::SeqCst));

    actor.stop().await.unwrap();
    assert!(stopped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_system_spawns_many_independent_nodes() {
    init_tracing();
    let system = System::new(Config::default());
    let first = system.spawn(Echo).unwrap().start().await.unwrap();
    let second = system.spawn(Echo).unwrap().start().await.unwrap();

    assert_ne!(first.id(), second.id());

    // Stopping one leaves the other addressable.
    first.stop().await.unwrap();
    let back: u32 = second.call("echo", &11u32).await.unwrap();
    assert_eq!(back, 11);
    second.stop().await.unwrap();
}
