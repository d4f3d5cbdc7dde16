use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::{postgres::PgRow, Pool, Postgres};
use thiserror::Error;

use crate::shared::database::Database;
use crate::travel_requests::model::{TravelRequest, TravelRequestStatus};

#[derive(Debug, Error)]
pub enum TravelRequestRepositoryError {
  #[error("Database error: {0}")]
  DatabaseError(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  SerializationError(#[from] serde_json::Error),
}

pub trait TravelRequestRepository {
  async fn create(
    &self,
    create_travel_request: CreateTravelRequest,
  ) -> Result<TravelRequest, TravelRequestRepositoryError>;
  async fn find_one(&self, uuid: &str) -> Option<TravelRequest>;
  async fn find_by_status(
    &self,
    status: TravelRequestStatus,
  ) -> Result<Vec<TravelRequest>, TravelRequestRepositoryError>;
  /// Atomically moves `uuid` from `expected` to `new`, stamping the driver
  /// when one is given. Returns whether the update applied; a false return
  /// means the stored status no longer was `expected`.
  async fn compare_and_set_status(
    &self,
    uuid: &str,
    expected: TravelRequestStatus,
    new: TravelRequestStatus,
    driver_uuid: Option<&str>,
  ) -> Result<bool, TravelRequestRepositoryError>;
}

pub struct TravelRequestRepositoryImpl {
  pool: Arc<Pool<Postgres>>,
}

impl TravelRequestRepositoryImpl {
  pub fn new(database: Arc<Database>) -> Self {
    Self {
      pool: database.pool.clone(),
    }
  }
}

impl TravelRequestRepository for TravelRequestRepositoryImpl {
  async fn create(
    &self,
    create_travel_request: CreateTravelRequest,
  ) -> Result<TravelRequest, TravelRequestRepositoryError> {
    let query = r#"
      INSERT INTO travel_requests (uuid, passenger_uuid, origin, destination, status)
      VALUES ($1, $2, $3, $4, $5)
      RETURNING uuid, passenger_uuid, driver_uuid, origin, destination, status, created_at, updated_at
    "#;
    sqlx::query(query)
      .bind(&create_travel_request.uuid)
      .bind(&create_travel_request.passenger_uuid)
      .bind(&create_travel_request.origin)
      .bind(&create_travel_request.destination)
      .bind(serde_json::to_string(&TravelRequestStatus::Created)?)
      .map(|row: PgRow| TravelRequest::from(row))
      .fetch_one(&*self.pool)
      .await
      .map_err(TravelRequestRepositoryError::from)
  }

  async fn find_one(&self, uuid: &str) -> Option<TravelRequest> {
    let rows =
      sqlx::query("SELECT * FROM travel_requests WHERE uuid = $1 LIMIT 1")
        .bind(uuid)
        .map(|row: PgRow| TravelRequest::from(row))
        .fetch_one(&*self.pool)
        .await;
    rows.ok()
  }

  async fn find_by_status(
    &self,
    status: TravelRequestStatus,
  ) -> Result<Vec<TravelRequest>, TravelRequestRepositoryError> {
    sqlx::query("SELECT * FROM travel_requests WHERE status = $1")
      .bind(serde_json::to_string(&status)?)
      .map(|row: PgRow| TravelRequest::from(row))
      .fetch_all(&*self.pool)
      .await
      .map_err(TravelRequestRepositoryError::from)
  }

  async fn compare_and_set_status(
    &self,
    uuid: &str,
    expected: TravelRequestStatus,
    new: TravelRequestStatus,
    driver_uuid: Option<&str>,
  ) -> Result<bool, TravelRequestRepositoryError> {
    let query = r#"
      UPDATE travel_requests
      SET status = $3, driver_uuid = COALESCE($4, driver_uuid), updated_at = now()
      WHERE uuid = $1 AND status = $2
    "#;
    let result = sqlx::query(query)
      .bind(uuid)
      .bind(serde_json::to_string(&expected)?)
      .bind(serde_json::to_string(&new)?)
      .bind(driver_uuid)
      .execute(&*self.pool)
      .await?;
    Ok(result.rows_affected() == 1)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTravelRequest {
  pub uuid: String,
  pub passenger_uuid: String,
  pub origin: String,
  pub destination: String,
}

impl From<PgRow> for TravelRequest {
  fn from(row: PgRow) -> Self {
    Self {
      uuid: row.get("uuid"),
      passenger_uuid: row.get("passenger_uuid"),
      driver_uuid: row.get("driver_uuid"),
      origin: row.get("origin"),
      destination: row.get("destination"),
      status: serde_json::from_str(row.get("status")).unwrap(),
      created_at: row.get::<DateTime<Utc>, _>("created_at"),
      updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
    }
  }
}

#[cfg(test)]
pub mod tests {
  use std::sync::RwLock;

  use chrono::{TimeZone, Utc};

  use crate::travel_requests::model::{TravelRequest, TravelRequestStatus};

  use super::{
    CreateTravelRequest, TravelRequestRepository, TravelRequestRepositoryError,
  };

  pub struct InMemoryTravelRequestRepository {
    pub requests: RwLock<Vec<TravelRequest>>,
  }

  impl InMemoryTravelRequestRepository {
    pub fn new() -> Self {
      Self {
        requests: RwLock::new(Vec::new()),
      }
    }

    pub fn with_requests(requests: Vec<TravelRequest>) -> Self {
      Self {
        requests: RwLock::new(requests),
      }
    }
  }

  impl TravelRequestRepository for InMemoryTravelRequestRepository {
    async fn create(
      &self,
      create_travel_request: CreateTravelRequest,
    ) -> Result<TravelRequest, TravelRequestRepositoryError> {
      let mut requests = self.requests.write().unwrap(); // Acquire write lock
      let now = Utc::now();
      let request = TravelRequest {
        uuid: create_travel_request.uuid,
        passenger_uuid: create_travel_request.passenger_uuid,
        driver_uuid: None,
        origin: create_travel_request.origin,
        destination: create_travel_request.destination,
        status: TravelRequestStatus::Created,
        created_at: now,
        updated_at: now,
      };
      requests.push(request.clone());
      Ok(request)
    }

    async fn find_one(&self, uuid: &str) -> Option<TravelRequest> {
      let requests = self.requests.read().unwrap(); // Acquire read lock
      requests.iter().find(|request| request.uuid == uuid).cloned()
    }

    async fn find_by_status(
      &self,
      status: TravelRequestStatus,
    ) -> Result<Vec<TravelRequest>, TravelRequestRepositoryError> {
      let requests = self.requests.read().unwrap();
      Ok(
        requests
          .iter()
          .filter(|request| request.status == status)
          .cloned()
          .collect(),
      )
    }

    async fn compare_and_set_status(
      &self,
      uuid: &str,
      expected: TravelRequestStatus,
      new: TravelRequestStatus,
      driver_uuid: Option<&str>,
    ) -> Result<bool, TravelRequestRepositoryError> {
      let mut requests = self.requests.write().unwrap();
      match requests.iter_mut().find(|request| request.uuid == uuid) {
        Some(request) if request.status == expected => {
          request.status = new;
          if let Some(driver_uuid) = driver_uuid {
            request.driver_uuid = Some(driver_uuid.to_string());
          }
          request.updated_at = Utc::now();
          Ok(true)
        }
        _ => Ok(false),
      }
    }
  }

  /// Builds a request in the given status with a fixed creation second, so
  /// ordering tests stay deterministic.
  pub fn sample_travel_request(
    uuid: &str,
    origin: &str,
    status: TravelRequestStatus,
    created_at_secs: i64,
  ) -> TravelRequest {
    let created_at = Utc.timestamp_opt(created_at_secs, 0).unwrap();
    TravelRequest {
      uuid: uuid.to_string(),
      passenger_uuid: "passenger-1".to_string(),
      driver_uuid: None,
      origin: origin.to_string(),
      destination: "Terminal Rodoviário".to_string(),
      status,
      created_at,
      updated_at: created_at,
    }
  }
}
