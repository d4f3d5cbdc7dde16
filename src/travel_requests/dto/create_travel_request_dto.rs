use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTravelRequestDto {
  #[validate(length(min = 1))]
  pub origin: String,
  #[validate(length(min = 1))]
  pub destination: String,
}
