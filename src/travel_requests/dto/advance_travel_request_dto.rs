use serde::Deserialize;
use validator_derive::Validate;

use crate::travel_requests::model::TravelRequestStatus;

#[derive(Debug, Deserialize, Validate)]
pub struct AdvanceTravelRequestDto {
  pub status: TravelRequestStatus,
}
