use actix_web::{dev::ServiceRequest, error, web, Error};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use subtle::ConstantTimeEq;

use crate::shared::config::Config;

/// Validator that:
/// - accepts Bearer auth;
/// - rejects requests whose token does not match the provisioning master key.
pub async fn master_key_validator(
  req: ServiceRequest,
  credentials: Option<BearerAuth>,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
  let Some(credentials) = credentials else {
    return Err((error::ErrorUnauthorized("no bearer header"), req));
  };

  let Some(config) = req.app_data::<web::Data<Config>>() else {
    return Err((
      error::ErrorInternalServerError("missing configuration"),
      req,
    ));
  };

  if !constant_time_compare(credentials.token(), &config.master_key) {
    return Err((error::ErrorForbidden("invalid master key"), req));
  }

  Ok(req)
}

fn constant_time_compare(a: &str, b: &str) -> bool {
  a.as_bytes().ct_eq(b.as_bytes()).unwrap_u8() == 1
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_constant_time_compare() {
    assert!(constant_time_compare("MASTER", "MASTER"));
    assert!(!constant_time_compare("MASTER", "master"));
    assert!(!constant_time_compare("MASTER", "MASTER_KEY"));
    assert!(!constant_time_compare("", "MASTER"));
  }
}
