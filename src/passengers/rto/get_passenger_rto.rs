use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GetPassengerRto {
  pub uuid: String,
  pub name: String,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
}
