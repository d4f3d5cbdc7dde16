use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::drivers::model::Driver;
use crate::shared::database::Database;

#[derive(Debug, Error)]
pub enum DriverRepositoryError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),
}

pub trait DriverRepository {
  async fn find_all(&self) -> Result<Vec<Driver>, DriverRepositoryError>;
  async fn find_one(&self, uuid: &str) -> Option<Driver>;
  async fn create(
    &self,
    create_driver: CreateDriver,
  ) -> Result<Driver, DriverRepositoryError>;
  async fn update(&self, driver: Driver) -> Result<Driver, DriverRepositoryError>;
  /// Returns whether a row was deleted.
  async fn delete(&self, uuid: &str) -> Result<bool, DriverRepositoryError>;
}

pub struct DriverRepositoryImpl {
  pool: Arc<Pool<Postgres>>,
}

impl DriverRepositoryImpl {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

impl DriverRepository for DriverRepositoryImpl {
  async fn find_all(&self) -> Result<Vec<Driver>, DriverRepositoryError> {
    sqlx::query("SELECT * FROM drivers ORDER BY created_at")
      .map(|row: PgRow| Driver::from(row))
      .fetch_all(&*self.pool)
      .await
      .map_err(DriverRepositoryError::from)
  }

  async fn find_one(&self, uuid: &str) -> Option<Driver> {
    let rows = sqlx::query("SELECT * FROM drivers WHERE uuid = $1 LIMIT 1")
      .bind(uuid)
      .map(|row: PgRow| Driver::from(row))
      .fetch_one(&*self.pool)
      .await;
    rows.ok()
  }

  async fn create(
    &self,
    create_driver: CreateDriver,
  ) -> Result<Driver, DriverRepositoryError> {
    let query = r#"
      INSERT INTO drivers (uuid, name, birth_date)
      VALUES ($1, $2, $3)
      RETURNING uuid, name, birth_date, created_at, updated_at
    "#;
    sqlx::query(query)
      .bind(&create_driver.uuid)
      .bind(&create_driver.name)
      .bind(create_driver.birth_date)
      .map(|row: PgRow| Driver::from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(DriverRepositoryError::from)
  }

  async fn update(&self, driver: Driver) -> Result<Driver, DriverRepositoryError> {
    let query = r#"
      UPDATE drivers
      SET name = $2, birth_date = $3, updated_at = now()
      WHERE uuid = $1
      RETURNING uuid, name, birth_date, created_at, updated_at
    "#;
    sqlx::query(query)
      .bind(&driver.uuid)
      .bind(&driver.name)
      .bind(driver.birth_date)
      .map(|row: PgRow| Driver::from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(DriverRepositoryError::from)
  }

  async fn delete(&self, uuid: &str) -> Result<bool, DriverRepositoryError> {
    let result = sqlx::query("DELETE FROM drivers WHERE uuid = $1")
      .bind(uuid)
      .execute(&*self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDriver {
  pub uuid: String,
  pub name: String,
  pub birth_date: NaiveDate,
}

impl From<PgRow> for Driver {
  fn from(row: PgRow) -> Self {
    Self {
      uuid: row.get("uuid"),
      name: row.get("name"),
      birth_date: row.get::<NaiveDate, _>("birth_date"),
      created_at: row.get::<DateTime<Utc>, _>("created_at"),
      updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
  }
}
