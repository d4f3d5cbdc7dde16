use chrono::NaiveDate;
use serde::Deserialize;
use validator_derive::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDriverDto {
  #[validate(length(min = 1))]
  pub name: String,
  #[serde(rename = "birthDate")]
  pub birth_date: NaiveDate,
}
