use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct GetTravelRequestDto {
  pub uuid: String,
}
