use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct NearbyTravelRequestsDto {
  #[serde(rename = "currentAddress")]
  #[validate(length(min = 1))]
  pub current_address: String,
  #[serde(rename = "maxTravelSeconds")]
  pub max_travel_seconds: Option<u64>,
}
