use chrono::NaiveDate;
use serde::Deserialize;
use validator_derive::Validate;

/// Incremental update: an absent field leaves the stored value unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PatchDriverDto {
  #[validate(length(min = 1))]
  pub name: Option<String>,
  #[serde(rename = "birthDate")]
  pub birth_date: Option<NaiveDate>,
}
