// shopsync/src/cart/keyed_lock.rs

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Slot {
  mutex: Arc<AsyncMutex<()>>,
  // Holders plus waiters, including waits that have not finished yet.
  users: usize,
}

/// One async mutex per key, created on demand and dropped once nobody holds or
/// waits on it.
#[derive(Debug, Default)]
pub struct KeyedLock {
  slots: Mutex<HashMap<i64, Slot>>,
}

/// Counts one user of a slot from registration until drop, whether or not the
/// lock was ever acquired.
#[derive(Debug)]
struct Registration<'a> {
  owner: &'a KeyedLock,
  key: i64,
}

impl Drop for Registration<'_> {
  fn drop(&mut self) {
    let mut slots = self.owner.slots.lock();
    let unused = match slots.get_mut(&self.key) {
      Some(slot) => {
        slot.users -= 1;
        slot.users == 0
      }
      None => false,
    };
    if unused {
      slots.remove(&self.key);
    }
  }
}

/// Held for the duration of one read-then-write on a key.
#[derive(Debug)]
pub struct KeyGuard<'a> {
  // Declared first so the mutex is released before the registration is.
  _guard: OwnedMutexGuard<()>,
  _registration: Registration<'a>,
}

impl KeyedLock {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn lock(&self, key: i64) -> KeyGuard<'_> {
    let mutex = {
      let mut slots = self.slots.lock();
      let slot = slots.entry(key).or_default();
      slot.users += 1;
      slot.mutex.clone()
    };
    // If this future is dropped while waiting, the registration still unwinds.
    let registration = Registration { owner: self, key };
    let guard = mutex.lock_owned().await;
    KeyGuard {
      _guard: guard,
      _registration: registration,
    }
  }

  /// Number of keys that currently have a slot.
  pub fn active_keys(&self) -> usize {
    self.slots.lock().len()
  }
}
