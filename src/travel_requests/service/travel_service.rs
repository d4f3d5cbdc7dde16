use std::time::Duration;

use actix_web::rt::time;
use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::custom_nanoid;
use crate::distance::DistanceProvider;
use crate::shared::config::Config;
use crate::travel_requests::model::{TravelRequest, TravelRequestStatus};
use crate::travel_requests::repository::travel_request_repository::{
  CreateTravelRequest, TravelRequestRepository, TravelRequestRepositoryError,
};

// Cap on in-flight distance lookups for a single nearby query.
const MAX_CONCURRENT_DISTANCE_LOOKUPS: usize = 8;

#[derive(Debug, Error)]
pub enum TravelServiceError {
  #[error("Invalid request: {0}")]
  InvalidRequest(String),

  #[error("Invalid state transition: {from:?} -> {to:?}")]
  InvalidStateTransition {
    from: TravelRequestStatus,
    to: TravelRequestStatus,
  },

  #[error("Travel request already matched")]
  AlreadyMatched,

  #[error("Travel request not found")]
  NotFound,

  #[error("Repository error: {0}")]
  Repository(#[from] TravelRequestRepositoryError),
}

/// A candidate request paired with the estimated travel time from the
/// driver's current address to its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyTravelRequest {
  pub travel_request: TravelRequest,
  pub travel_time: Duration,
}

/// The travel-request lifecycle and matching engine. Holds its store and
/// distance-provider handles explicitly; all persistent state lives in the
/// store.
pub struct TravelService<TR: TravelRequestRepository, DP: DistanceProvider> {
  travel_request_repository: TR,
  distance_provider: DP,
  max_travel_time: Duration,
  lookup_timeout: Duration,
}

impl<TR: TravelRequestRepository, DP: DistanceProvider> TravelService<TR, DP> {
  pub fn new(
    travel_request_repository: TR,
    distance_provider: DP,
    config: &Config,
  ) -> Self {
    Self {
      travel_request_repository,
      distance_provider,
      max_travel_time: Duration::from_secs(config.max_travel_seconds),
      lookup_timeout: Duration::from_millis(config.distance_timeout_ms),
    }
  }

  pub async fn create_travel_request(
    &self,
    passenger_uuid: &str,
    origin: &str,
    destination: &str,
  ) -> Result<TravelRequest, TravelServiceError> {
    if origin.trim().is_empty() {
      return Err(TravelServiceError::InvalidRequest(
        "origin must not be empty".to_string(),
      ));
    }
    if destination.trim().is_empty() {
      return Err(TravelServiceError::InvalidRequest(
        "destination must not be empty".to_string(),
      ));
    }
    if origin == destination {
      return Err(TravelServiceError::InvalidRequest(
        "origin and destination must differ".to_string(),
      ));
    }
    self
      .travel_request_repository
      .create(CreateTravelRequest {
        uuid: custom_nanoid(),
        passenger_uuid: passenger_uuid.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
      })
      .await
      .map_err(TravelServiceError::from)
  }

  /// Returns the pending requests reachable from `current_address` within
  /// the travel-time threshold, nearest first.
  ///
  /// A failed or timed-out lookup drops that candidate only; a mapping
  /// outage must not block matching as a whole.
  pub async fn list_nearby_travel_requests(
    &self,
    current_address: &str,
    max_travel_time: Option<Duration>,
  ) -> Result<Vec<NearbyTravelRequest>, TravelServiceError> {
    if current_address.trim().is_empty() {
      return Err(TravelServiceError::InvalidRequest(
        "current address must not be empty".to_string(),
      ));
    }
    let threshold = max_travel_time.unwrap_or(self.max_travel_time);

    let candidates = self
      .travel_request_repository
      .find_by_status(TravelRequestStatus::Created)
      .await?;

    let mut nearby: Vec<NearbyTravelRequest> = stream::iter(candidates)
      .map(|candidate| async move {
        let lookup = time::timeout(
          self.lookup_timeout,
          self
            .distance_provider
            .travel_time(current_address, &candidate.origin),
        )
        .await;
        match lookup {
          Ok(Ok(travel_time)) => Some(NearbyTravelRequest {
            travel_request: candidate,
            travel_time,
          }),
          Ok(Err(error)) => {
            log::warn!(
              "distance lookup failed for travel request {}: {}",
              candidate.uuid,
              error
            );
            None
          }
          Err(_) => {
            log::warn!(
              "distance lookup timed out for travel request {}",
              candidate.uuid
            );
            None
          }
        }
      })
      .buffer_unordered(MAX_CONCURRENT_DISTANCE_LOOKUPS)
      .filter_map(|lookup| async move { lookup })
      .collect()
      .await;

    nearby.retain(|candidate| candidate.travel_time < threshold);
    // Lookups settle in arbitrary order; the sort keeps results
    // deterministic: nearest first, oldest first on equal times.
    nearby.sort_by(|a, b| {
      a.travel_time
        .cmp(&b.travel_time)
        .then_with(|| {
          a.travel_request.created_at.cmp(&b.travel_request.created_at)
        })
        .then_with(|| a.travel_request.uuid.cmp(&b.travel_request.uuid))
    });
    Ok(nearby)
  }

  /// Claims a pending request for a driver. The store applies the
  /// Created -> Matched edge atomically, so of two concurrent accepts only
  /// the first succeeds.
  pub async fn accept_travel_request(
    &self,
    uuid: &str,
    driver_uuid: &str,
  ) -> Result<TravelRequest, TravelServiceError> {
    let request = self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)?;

    if !request
      .status
      .can_transition_to(TravelRequestStatus::Matched)
    {
      return Err(match request.status {
        TravelRequestStatus::Matched => TravelServiceError::AlreadyMatched,
        status => TravelServiceError::InvalidStateTransition {
          from: status,
          to: TravelRequestStatus::Matched,
        },
      });
    }

    let applied = self
      .travel_request_repository
      .compare_and_set_status(
        uuid,
        TravelRequestStatus::Created,
        TravelRequestStatus::Matched,
        Some(driver_uuid),
      )
      .await?;
    if !applied {
      // Lost the race: another driver moved it out of Created first.
      return Err(TravelServiceError::AlreadyMatched);
    }

    self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)
  }

  /// Driver-initiated progress: only Matched -> InProgress and
  /// InProgress -> Completed are reachable through here.
  pub async fn advance_travel_request(
    &self,
    uuid: &str,
    new_status: TravelRequestStatus,
  ) -> Result<TravelRequest, TravelServiceError> {
    let request = self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)?;

    let required_from = match new_status {
      TravelRequestStatus::InProgress => TravelRequestStatus::Matched,
      TravelRequestStatus::Completed => TravelRequestStatus::InProgress,
      status => {
        return Err(TravelServiceError::InvalidStateTransition {
          from: request.status,
          to: status,
        })
      }
    };
    if request.status != required_from {
      return Err(TravelServiceError::InvalidStateTransition {
        from: request.status,
        to: new_status,
      });
    }

    let applied = self
      .travel_request_repository
      .compare_and_set_status(uuid, required_from, new_status, None)
      .await?;
    if !applied {
      let current = self
        .travel_request_repository
        .find_one(uuid)
        .await
        .ok_or(TravelServiceError::NotFound)?;
      return Err(TravelServiceError::InvalidStateTransition {
        from: current.status,
        to: new_status,
      });
    }

    self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)
  }

  pub async fn cancel_travel_request(
    &self,
    uuid: &str,
  ) -> Result<TravelRequest, TravelServiceError> {
    let request = self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)?;

    if !request
      .status
      .can_transition_to(TravelRequestStatus::Cancelled)
    {
      return Err(TravelServiceError::InvalidStateTransition {
        from: request.status,
        to: TravelRequestStatus::Cancelled,
      });
    }

    let applied = self
      .travel_request_repository
      .compare_and_set_status(
        uuid,
        request.status,
        TravelRequestStatus::Cancelled,
        None,
      )
      .await?;
    if !applied {
      let current = self
        .travel_request_repository
        .find_one(uuid)
        .await
        .ok_or(TravelServiceError::NotFound)?;
      return Err(match current.status {
        TravelRequestStatus::Matched => TravelServiceError::AlreadyMatched,
        status => TravelServiceError::InvalidStateTransition {
          from: status,
          to: TravelRequestStatus::Cancelled,
        },
      });
    }

    self
      .travel_request_repository
      .find_one(uuid)
      .await
      .ok_or(TravelServiceError::NotFound)
  }

  pub async fn find_travel_request(&self, uuid: &str) -> Option<TravelRequest> {
    self.travel_request_repository.find_one(uuid).await
  }
}
