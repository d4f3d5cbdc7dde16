use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::travel_requests::model::TravelRequestStatus;

#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyTravelRequestRto {
  pub uuid: String,
  pub origin: String,
  pub destination: String,
  pub status: TravelRequestStatus,
  #[serde(rename = "travelTimeSeconds")]
  pub travel_time_seconds: u64,
  #[serde(rename = "createdAt")]
  pub created_at: DateTime<Utc>,
}
