use serde::{Deserialize, Serialize};

use crate::shared::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
  pub uuid: String,
  pub role: Role,
  pub exp: usize,
  pub iat: usize,
}

impl AccessTokenClaims {
  /// Back-office roles may act on entities they do not own.
  pub fn is_back_office(&self) -> bool {
    self.role == Role::Admin || self.role == Role::Manager
  }
}
