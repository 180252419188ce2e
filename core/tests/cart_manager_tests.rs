// tests/cart_manager_tests.rs
mod common;

use common::*;
use futures_util::StreamExt;
use shopsync::{CartManager, CartRow, CartStore, ShopContext, ShopError};

fn memory_cart() -> (CartManager, shopsync::MemoryStore) {
  let (ctx, store) = ShopContext::in_memory(StaticRemote::with(Vec::new()));
  (CartManager::new(&ctx), store)
}

async fn sqlite_cart() -> CartManager {
  let ctx = ShopContext::sqlite("sqlite::memory:", StaticRemote::with(Vec::new()))
    .await
    .unwrap();
  CartManager::new(&ctx)
}

#[tokio::test]
async fn add_creates_then_increments() {
  setup_tracing();
  let (cart, _) = memory_cart();

  assert_eq!(cart.add_item(5).await.unwrap(), 1);
  assert_eq!(cart.get_count(5).await.unwrap(), 1);

  assert_eq!(cart.add_item(5).await.unwrap(), 2);
  assert_eq!(cart.get_count(5).await.unwrap(), 2);
}

#[tokio::test]
async fn remove_last_unit_deletes_row() {
  setup_tracing();
  let (cart, store) = memory_cart();
  store.insert(CartRow::new(5, 1)).await.unwrap();

  assert_eq!(cart.remove_item(5).await.unwrap(), 0);
  assert_eq!(cart.get_count(5).await.unwrap(), 0);
  assert!(store.cart_rows().is_empty());
}

#[tokio::test]
async fn remove_decrements_without_deleting() {
  setup_tracing();
  let (cart, store) = memory_cart();
  store.insert(CartRow::new(5, 3)).await.unwrap();

  assert_eq!(cart.remove_item(5).await.unwrap(), 2);
  assert_eq!(store.cart_rows(), vec![CartRow::new(5, 2)]);
}

#[tokio::test]
async fn remove_on_absent_entry_is_noop() {
  setup_tracing();
  let (cart, store) = memory_cart();
  let version_before = store.cart_version();

  assert_eq!(cart.remove_item(5).await.unwrap(), 0);
  assert_eq!(cart.get_count(5).await.unwrap(), 0);
  assert!(store.cart_rows().is_empty());
  assert_eq!(store.cart_version(), version_before);
}

#[tokio::test]
async fn n_adds_then_n_removes_returns_to_absent() {
  setup_tracing();
  let (cart, store) = memory_cart();
  for n in 1..=7 {
    for _ in 0..n {
      cart.add_item(9).await.unwrap();
    }
    assert_eq!(cart.get_count(9).await.unwrap(), n);
    for _ in 0..n {
      cart.remove_item(9).await.unwrap();
    }
    assert_eq!(cart.get_count(9).await.unwrap(), 0);
    assert!(store.cart_rows().is_empty());
  }
}

#[tokio::test]
async fn count_never_negative_and_rows_stay_positive() {
  setup_tracing();
  let (cart, store) = memory_cart();
  // Mixed script: more removes than adds at several points.
  let script = "arrraaraarrrrraaarrrrrr";
  let mut expected: i64 = 0;
  for op in script.chars() {
    match op {
      'a' => {
        cart.add_item(3).await.unwrap();
        expected += 1;
      }
      _ => {
        cart.remove_item(3).await.unwrap();
        expected = (expected - 1).max(0);
      }
    }
    let count = cart.get_count(3).await.unwrap();
    assert!(count >= 0);
    assert_eq!(count, expected);
    assert!(store.cart_rows().iter().all(|row| row.count >= 1));
  }
}

#[tokio::test]
async fn entries_stream_reflects_every_change() {
  setup_tracing();
  let (cart, _) = memory_cart();
  let mut entries = cart.subscribe_cart_entries();

  let initial = within(entries.next()).await.unwrap().unwrap();
  assert!(initial.is_empty());

  cart.add_item(1).await.unwrap();
  let after_add = next_matching(&mut entries, |item| matches!(item, Ok(list) if !list.is_empty())).await;
  assert_eq!(after_add.unwrap()[0].count, 1);

  cart.remove_item(1).await.unwrap();
  let after_remove = next_matching(&mut entries, |item| matches!(item, Ok(list) if list.is_empty())).await;
  assert!(after_remove.unwrap().is_empty());
}

#[tokio::test]
async fn cart_size_sums_all_counts() {
  setup_tracing();
  let (cart, _) = memory_cart();
  cart.add_item(1).await.unwrap();
  cart.add_item(1).await.unwrap();
  cart.add_item(2).await.unwrap();
  assert_eq!(cart.cart_size().await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_on_one_product_are_not_lost() {
  setup_tracing();
  let (cart, _) = memory_cart();
  let mut tasks = Vec::new();
  for _ in 0..50 {
    let cart = cart.clone();
    tasks.push(tokio::spawn(async move { cart.add_item(11).await }));
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }
  assert_eq!(cart.get_count(11).await.unwrap(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_add_remove_pairs_cancel_out() {
  setup_tracing();
  let (cart, store) = memory_cart();
  for _ in 0..20 {
    cart.add_item(4).await.unwrap();
  }

  let mut tasks = Vec::new();
  for i in 0..40 {
    let cart = cart.clone();
    tasks.push(tokio::spawn(async move {
      if i % 2 == 0 {
        cart.add_item(4).await
      } else {
        cart.remove_item(4).await
      }
    }));
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }
  assert_eq!(cart.get_count(4).await.unwrap(), 20);
  assert_eq!(store.cart_rows().len(), 1);
}

#[tokio::test]
async fn storage_failure_propagates() {
  setup_tracing();
  let (cart, store) = memory_cart();
  store.set_failing(true);

  let err = cart.add_item(1).await.unwrap_err();
  assert!(matches!(err, ShopError::Storage(_)));

  store.set_failing(false);
  assert_eq!(cart.get_count(1).await.unwrap(), 0);
}

#[tokio::test]
async fn sqlite_cart_follows_same_state_machine() {
  setup_tracing();
  let cart = sqlite_cart().await;

  cart.add_item(5).await.unwrap();
  cart.add_item(5).await.unwrap();
  cart.add_item(5).await.unwrap();
  assert_eq!(cart.get_count(5).await.unwrap(), 3);

  assert_eq!(cart.remove_item(5).await.unwrap(), 2);
  assert_eq!(cart.remove_item(5).await.unwrap(), 1);
  assert_eq!(cart.remove_item(5).await.unwrap(), 0);
  assert_eq!(cart.remove_item(5).await.unwrap(), 0);
  assert_eq!(cart.get_count(5).await.unwrap(), 0);
  assert!(cart.entries().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn managers_from_one_context_share_row_locks() {
  setup_tracing();
  let ctx = ShopContext::sqlite("sqlite::memory:", StaticRemote::with(Vec::new()))
    .await
    .unwrap();
  let first = CartManager::new(&ctx);
  let second = CartManager::new(&ctx);

  let mut tasks = Vec::new();
  for i in 0..100 {
    let cart = if i % 2 == 0 { first.clone() } else { second.clone() };
    tasks.push(tokio::spawn(async move { cart.add_item(7).await }));
  }
  for task in tasks {
    task.await.unwrap().unwrap();
  }
  assert_eq!(first.get_count(7).await.unwrap(), 100);
  assert_eq!(ctx.cart_locks.active_keys(), 0);
}

#[tokio::test]
async fn add_up_to_limit_stops_at_limit() {
  setup_tracing();
  let (cart, store) = memory_cart();

  assert_eq!(cart.add_item_up_to(2, 2).await.unwrap(), Some(1));
  assert_eq!(cart.add_item_up_to(2, 2).await.unwrap(), Some(2));
  let version = store.cart_version();
  assert_eq!(cart.add_item_up_to(2, 2).await.unwrap(), None);
  assert_eq!(store.cart_version(), version);
  assert_eq!(cart.get_count(2).await.unwrap(), 2);

  assert_eq!(cart.add_item_up_to(6, 0).await.unwrap(), None);
  assert!(CartStore::get(&store, 6).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_never_pass_limit() {
  setup_tracing();
  let (ctx, _) = ShopContext::in_memory(StaticRemote::with(Vec::new()));
  let managers = [CartManager::new(&ctx), CartManager::new(&ctx)];

  let mut tasks = Vec::new();
  for i in 0..40 {
    let cart = managers[i % 2].clone();
    tasks.push(tokio::spawn(async move { cart.add_item_up_to(9, 5).await }));
  }
  let mut accepted = 0;
  for task in tasks {
    if task.await.unwrap().unwrap().is_some() {
      accepted += 1;
    }
  }
  assert_eq!(accepted, 5);
  assert_eq!(managers[0].get_count(9).await.unwrap(), 5);
}
