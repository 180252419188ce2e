// shopsync/src/store/sqlite.rs

use crate::error::ShopResult;
use crate::model::{CartRow, NewProductRow, ProductRow};
use crate::store::live::{live_query, ChangeNotifier};
use crate::store::{CartStore, ProductStore};

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::SqliteConnection;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, instrument};

const CREATE_PRODUCT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS product_table (
  local_id INTEGER PRIMARY KEY AUTOINCREMENT,
  product_server_id INTEGER NOT NULL,
  description TEXT NOT NULL,
  name TEXT NOT NULL,
  price INTEGER NOT NULL,
  currency_code TEXT NOT NULL,
  currency_symbol TEXT NOT NULL,
  quantity INTEGER NOT NULL,
  image_url TEXT NOT NULL,
  status TEXT NOT NULL
)"#;

const CREATE_PRODUCT_SERVER_ID_INDEX: &str =
  "CREATE UNIQUE INDEX IF NOT EXISTS index_product_table_product_server_id ON product_table (product_server_id)";

const CREATE_CART_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cart_table (
  product_id INTEGER PRIMARY KEY NOT NULL,
  count INTEGER NOT NULL
)"#;

// Replaces every column but the surrogate key, so re-syncing identical data is a no-op.
const UPSERT_PRODUCT: &str = r#"
INSERT INTO product_table
  (product_server_id, description, name, price, currency_code, currency_symbol, quantity, image_url, status)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (product_server_id) DO UPDATE SET
  description = excluded.description,
  name = excluded.name,
  price = excluded.price,
  currency_code = excluded.currency_code,
  currency_symbol = excluded.currency_symbol,
  quantity = excluded.quantity,
  image_url = excluded.image_url,
  status = excluded.status"#;

const SELECT_ALL_PRODUCTS: &str = "SELECT local_id, product_server_id, description, name, price, currency_code, \
   currency_symbol, quantity, image_url, status FROM product_table ORDER BY local_id ASC";

const SELECT_PRODUCT: &str = "SELECT local_id, product_server_id, description, name, price, currency_code, \
   currency_symbol, quantity, image_url, status FROM product_table WHERE product_server_id = ?";

const SELECT_ALL_CART: &str = "SELECT product_id, count FROM cart_table ORDER BY product_id ASC";
const SELECT_CART_ITEM: &str = "SELECT product_id, count FROM cart_table WHERE product_id = ? LIMIT 1";
const REPLACE_CART_ITEM: &str = "INSERT OR REPLACE INTO cart_table (product_id, count) VALUES (?, ?)";
const DELETE_CART_ITEM: &str = "DELETE FROM cart_table WHERE product_id = ?";

async fn upsert_product(conn: &mut SqliteConnection, row: &NewProductRow) -> Result<(), sqlx::Error> {
  sqlx::query(UPSERT_PRODUCT)
    .bind(row.product_server_id)
    .bind(&row.description)
    .bind(&row.name)
    .bind(row.price)
    .bind(&row.currency_code)
    .bind(&row.currency_symbol)
    .bind(row.quantity)
    .bind(&row.image_url)
    .bind(&row.status)
    .execute(conn)
    .await?;
  Ok(())
}

async fn replace_cart_item(conn: &mut SqliteConnection, row: CartRow) -> Result<(), sqlx::Error> {
  sqlx::query(REPLACE_CART_ITEM)
    .bind(row.product_id)
    .bind(row.count)
    .execute(conn)
    .await?;
  Ok(())
}

async fn delete_cart_item(conn: &mut SqliteConnection, row: CartRow) -> Result<u64, sqlx::Error> {
  let result = sqlx::query(DELETE_CART_ITEM).bind(row.product_id).execute(conn).await?;
  Ok(result.rows_affected())
}

/// SQLite-backed product and cart tables sharing one pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: SqlitePool,
  product_changes: Arc<ChangeNotifier>,
  cart_changes: Arc<ChangeNotifier>,
}

impl SqliteStore {
  /// Opens (creating if missing) the database at `url` and ensures the schema exists.
  ///
  /// In-memory databases are pinned to one never-recycled connection; each SQLite
  /// connection would otherwise see its own empty database.
  #[instrument(name = "SqliteStore::connect", skip_all, err(Display))]
  pub async fn connect(url: &str) -> ShopResult<Self> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let in_memory = url.contains(":memory:") || url.contains("mode=memory");

    let mut pool_options = SqlitePoolOptions::new();
    if in_memory {
      pool_options = pool_options
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None);
    }
    let pool = pool_options.connect_with(options).await?;
    info!(in_memory, "Connected to SQLite product cache.");

    let store = Self::from_pool(pool);
    store.migrate().await?;
    Ok(store)
  }

  pub fn from_pool(pool: SqlitePool) -> Self {
    Self {
      pool,
      product_changes: Arc::new(ChangeNotifier::new()),
      cart_changes: Arc::new(ChangeNotifier::new()),
    }
  }

  pub async fn migrate(&self) -> ShopResult<()> {
    for statement in [CREATE_PRODUCT_TABLE, CREATE_PRODUCT_SERVER_ID_INDEX, CREATE_CART_TABLE] {
      sqlx::query(statement).execute(&self.pool).await?;
    }
    debug!("Schema ensured for product_table and cart_table.");
    Ok(())
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }
}

#[async_trait]
impl ProductStore for SqliteStore {
  async fn insert(&self, row: NewProductRow) -> ShopResult<()> {
    let mut conn = self.pool.acquire().await?;
    upsert_product(&mut conn, &row).await?;
    self.product_changes.notify();
    Ok(())
  }

  #[instrument(name = "SqliteStore::insert_all", skip_all, fields(rows = rows.len()), err(Display))]
  async fn insert_all(&self, rows: Vec<NewProductRow>) -> ShopResult<()> {
    if rows.is_empty() {
      return Ok(());
    }
    let mut tx = self.pool.begin().await?;
    for row in &rows {
      upsert_product(&mut tx, row).await?;
    }
    tx.commit().await?;
    self.product_changes.notify();
    Ok(())
  }

  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<ProductRow>>> {
    let pool = self.pool.clone();
    live_query(self.product_changes.subscribe(), move || {
      let pool = pool.clone();
      async move {
        let rows = sqlx::query_as::<_, ProductRow>(SELECT_ALL_PRODUCTS)
          .fetch_all(&pool)
          .await?;
        Ok(rows)
      }
    })
  }

  async fn get(&self, server_id: i64) -> ShopResult<Option<ProductRow>> {
    let row = sqlx::query_as::<_, ProductRow>(SELECT_PRODUCT)
      .bind(server_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row)
  }
}

#[async_trait]
impl CartStore for SqliteStore {
  fn observe_all(&self) -> BoxStream<'static, ShopResult<Vec<CartRow>>> {
    let pool = self.pool.clone();
    live_query(self.cart_changes.subscribe(), move || {
      let pool = pool.clone();
      async move {
        let rows = sqlx::query_as::<_, CartRow>(SELECT_ALL_CART).fetch_all(&pool).await?;
        Ok(rows)
      }
    })
  }

  async fn get(&self, product_id: i64) -> ShopResult<Option<CartRow>> {
    let row = sqlx::query_as::<_, CartRow>(SELECT_CART_ITEM)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row)
  }

  async fn insert(&self, row: CartRow) -> ShopResult<()> {
    let mut conn = self.pool.acquire().await?;
    replace_cart_item(&mut conn, row).await?;
    self.cart_changes.notify();
    Ok(())
  }

  async fn delete(&self, row: CartRow) -> ShopResult<()> {
    let mut conn = self.pool.acquire().await?;
    if delete_cart_item(&mut conn, row).await? > 0 {
      self.cart_changes.notify();
    }
    Ok(())
  }

  async fn replace_in_transaction(&self, old: CartRow, new: CartRow) -> ShopResult<()> {
    let mut tx = self.pool.begin().await?;
    delete_cart_item(&mut tx, old).await?;
    replace_cart_item(&mut tx, new).await?;
    tx.commit().await?;
    self.cart_changes.notify();
    Ok(())
  }
}
