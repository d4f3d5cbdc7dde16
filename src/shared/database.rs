use std::sync::Arc;

use sqlx::{PgPool, Pool, Postgres};

pub struct Database {
  pub pool: Arc<Pool<Postgres>>,
}

impl Database {
  pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
    let pool = PgPool::connect(database_url).await?;
    Ok(Self {
      pool: Arc::new(pool),
    })
  }
}
