use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct GetDriverRto {
  pub uuid: String,
  pub name: String,
  #[serde(rename = "birthDate")]
  pub birth_date: NaiveDate,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
}
