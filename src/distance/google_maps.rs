use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::shared::config::Config;

use super::{DistanceProvider, DistanceProviderError};

/// Distance Matrix client. One origin and one destination per call; the
/// travel time comes from the first element of the first row.
pub struct GoogleMapsDistanceProvider {
  client: Client,
  base_url: String,
  api_key: String,
}

impl GoogleMapsDistanceProvider {
  pub fn new(config: &Config) -> Self {
    let client = Client::builder()
      .timeout(Duration::from_millis(config.distance_timeout_ms))
      .build()
      .expect("failed to build the distance provider HTTP client");
    Self {
      client,
      base_url: config.maps_api_url.clone(),
      api_key: config.maps_api_key.clone(),
    }
  }
}

impl DistanceProvider for GoogleMapsDistanceProvider {
  async fn travel_time(
    &self,
    origin: &str,
    destination: &str,
  ) -> Result<Duration, DistanceProviderError> {
    let url = format!("{}/maps/api/distancematrix/json", self.base_url);
    let response = self
      .client
      .get(&url)
      .query(&[
        ("origins", origin),
        ("destinations", destination),
        ("key", self.api_key.as_str()),
      ])
      .send()
      .await
      .map_err(request_error)?
      .error_for_status()
      .map_err(request_error)?;

    let body: DistanceMatrixResponse =
      response.json().await.map_err(request_error)?;

    let element = body
      .rows
      .into_iter()
      .next()
      .and_then(|row| row.elements.into_iter().next())
      .ok_or_else(|| {
        DistanceProviderError::Unavailable("empty distance matrix".to_string())
      })?;

    if element.status != "OK" {
      return Err(DistanceProviderError::Unavailable(format!(
        "element status {}",
        element.status
      )));
    }

    element
      .duration
      .map(|duration| Duration::from_secs(duration.value))
      .ok_or_else(|| {
        DistanceProviderError::Unavailable("missing duration".to_string())
      })
  }
}

fn request_error(error: reqwest::Error) -> DistanceProviderError {
  if error.is_timeout() {
    DistanceProviderError::Timeout
  } else {
    DistanceProviderError::Unavailable(error.to_string())
  }
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
  rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
  elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
  status: String,
  duration: Option<DurationValue>,
}

#[derive(Debug, Deserialize)]
struct DurationValue {
  value: u64,
}
