// shopsync/src/task.rs

use std::future::Future;
use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when dropped.
///
/// Subscriptions hold one of these so that walking away from a stream also tears
/// down whatever is still running behind it.
#[derive(Debug)]
pub struct TaskGuard(JoinHandle<()>);

impl TaskGuard {
  /// Spawns `future` on the current tokio runtime. Panics outside a runtime.
  pub fn spawn<F>(future: F) -> Self
  where
    F: Future<Output = ()> + Send + 'static,
  {
    TaskGuard(tokio::spawn(future))
  }

  pub fn is_finished(&self) -> bool {
    self.0.is_finished()
  }
}

impl Drop for TaskGuard {
  fn drop(&mut self) {
    self.0.abort();
  }
}
