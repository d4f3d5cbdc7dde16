pub mod google_maps;

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistanceProviderError {
  #[error("Distance provider unavailable: {0}")]
  Unavailable(String),

  #[error("Distance lookup timed out")]
  Timeout,
}

/// Estimates how long it takes to travel between two free-form addresses.
///
/// The addresses are opaque to the caller; only the provider interprets them.
pub trait DistanceProvider {
  async fn travel_time(
    &self,
    origin: &str,
    destination: &str,
  ) -> Result<Duration, DistanceProviderError>;
}
