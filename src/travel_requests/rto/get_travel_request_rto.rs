use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::travel_requests::model::TravelRequestStatus;

#[derive(Debug, Serialize, Deserialize)]
pub struct GetTravelRequestRto {
  pub uuid: String,
  #[serde(rename = "passengerUuid")]
  pub passenger_uuid: String,
  #[serde(rename = "driverUuid")]
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub driver_uuid: Option<String>,
  pub origin: String,
  pub destination: String,
  pub status: TravelRequestStatus,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
}
