use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::passengers::model::Passenger;
use crate::shared::database::Database;

#[derive(Debug, Error)]
pub enum PassengerRepositoryError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),
}

pub trait PassengerRepository {
  async fn find_all(&self) -> Result<Vec<Passenger>, PassengerRepositoryError>;
  async fn find_one(&self, uuid: &str) -> Option<Passenger>;
  async fn create(
    &self,
    create_passenger: CreatePassenger,
  ) -> Result<Passenger, PassengerRepositoryError>;
  async fn update(
    &self,
    passenger: Passenger,
  ) -> Result<Passenger, PassengerRepositoryError>;
  /// Returns whether a row was deleted.
  async fn delete(&self, uuid: &str) -> Result<bool, PassengerRepositoryError>;
}

pub struct PassengerRepositoryImpl {
  pool: Arc<Pool<Postgres>>,
}

impl PassengerRepositoryImpl {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

impl PassengerRepository for PassengerRepositoryImpl {
  async fn find_all(&self) -> Result<Vec<Passenger>, PassengerRepositoryError> {
    sqlx::query("SELECT * FROM passengers ORDER BY created_at")
      .map(|row: PgRow| Passenger::from(row))
      .fetch_all(&*self.pool)
      .await
      .map_err(PassengerRepositoryError::from)
  }

  async fn find_one(&self, uuid: &str) -> Option<Passenger> {
    let rows = sqlx::query("SELECT * FROM passengers WHERE uuid = $1 LIMIT 1")
      .bind(uuid)
      .map(|row: PgRow| Passenger::from(row))
      .fetch_one(&*self.pool)
      .await;
    rows.ok()
  }

  async fn create(
    &self,
    create_passenger: CreatePassenger,
  ) -> Result<Passenger, PassengerRepositoryError> {
    let query = r#"
      INSERT INTO passengers (uuid, name)
      VALUES ($1, $2)
      RETURNING uuid, name, created_at, updated_at
    "#;
    sqlx::query(query)
      .bind(&create_passenger.uuid)
      .bind(&create_passenger.name)
      .map(|row: PgRow| Passenger::from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(PassengerRepositoryError::from)
  }

  async fn update(
    &self,
    passenger: Passenger,
  ) -> Result<Passenger, PassengerRepositoryError> {
    let query = r#"
      UPDATE passengers
      SET name = $2, updated_at = now()
      WHERE uuid = $1
      RETURNING uuid, name, created_at, updated_at
    "#;
    sqlx::query(query)
      .bind(&passenger.uuid)
      .bind(&passenger.name)
      .map(|row: PgRow| Passenger::from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(PassengerRepositoryError::from)
  }

  async fn delete(&self, uuid: &str) -> Result<bool, PassengerRepositoryError> {
    let result = sqlx::query("DELETE FROM passengers WHERE uuid = $1")
      .bind(uuid)
      .execute(&*self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePassenger {
  pub uuid: String,
  pub name: String,
}

impl From<PgRow> for Passenger {
  fn from(row: PgRow) -> Self {
    Self {
      uuid: row.get("uuid"),
      name: row.get("name"),
      created_at: row.get::<DateTime<Utc>, _>("created_at"),
      updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
  }
}

#[cfg(test)]
pub mod tests {
  use std::sync::RwLock;

  use chrono::Utc;

  use crate::passengers::model::Passenger;

  use super::{CreatePassenger, PassengerRepository, PassengerRepositoryError};

  pub struct InMemoryPassengerRepository {
    pub passengers: RwLock<Vec<Passenger>>,
  }

  impl InMemoryPassengerRepository {
    pub fn new() -> Self {
      Self {
        passengers: RwLock::new(Vec::new()),
      }
    }
  }

  impl PassengerRepository for InMemoryPassengerRepository {
    async fn find_all(
      &self,
    ) -> Result<Vec<Passenger>, PassengerRepositoryError> {
      let passengers = self.passengers.read().unwrap(); // Acquire read lock
      Ok(passengers.clone())
    }

    async fn find_one(&self, uuid: &str) -> Option<Passenger> {
      let passengers = self.passengers.read().unwrap();
      passengers
        .iter()
        .find(|passenger| passenger.uuid == uuid)
        .cloned()
    }

    async fn create(
      &self,
      create_passenger: CreatePassenger,
    ) -> Result<Passenger, PassengerRepositoryError> {
      let mut passengers = self.passengers.write().unwrap(); // Acquire write lock
      let now = Utc::now();
      let passenger = Passenger {
        uuid: create_passenger.uuid,
        name: create_passenger.name,
        created_at: now,
        updated_at: now,
      };
      passengers.push(passenger.clone());
      Ok(passenger)
    }

    async fn update(
      &self,
      passenger: Passenger,
    ) -> Result<Passenger, PassengerRepositoryError> {
      let mut passengers = self.passengers.write().unwrap();
      if let Some(stored) = passengers
        .iter_mut()
        .find(|stored| stored.uuid == passenger.uuid)
      {
        stored.name = passenger.name.clone();
        stored.updated_at = Utc::now();
        return Ok(stored.clone());
      }
      Err(PassengerRepositoryError::DatabaseError(
        sqlx::Error::RowNotFound,
      ))
    }

    async fn delete(
      &self,
      uuid: &str,
    ) -> Result<bool, PassengerRepositoryError> {
      let mut passengers = self.passengers.write().unwrap();
      let before = passengers.len();
      passengers.retain(|passenger| passenger.uuid != uuid);
      Ok(passengers.len() < before)
    }
  }
}
