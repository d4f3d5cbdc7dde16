use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePassengerDto {
  #[validate(length(min = 1))]
  pub name: String,
}
