use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TravelRequestStatus {
  #[serde(rename = "CREATED")]
  Created,
  #[serde(rename = "MATCHED")]
  Matched,
  #[serde(rename = "IN_PROGRESS")]
  InProgress,
  #[serde(rename = "COMPLETED")]
  Completed,
  #[serde(rename = "CANCELLED")]
  Cancelled,
}

impl TravelRequestStatus {
  /// Lifecycle edges. Acceptance moves Created to Matched, drivers advance
  /// Matched through InProgress to Completed, and both pre-ride states may
  /// be cancelled. Everything else is rejected.
  pub fn can_transition_to(self, next: TravelRequestStatus) -> bool {
    use TravelRequestStatus::*;
    matches!(
      (self, next),
      (Created, Matched)
        | (Matched, InProgress)
        | (InProgress, Completed)
        | (Created, Cancelled)
        | (Matched, Cancelled)
    )
  }

  pub fn is_terminal(self) -> bool {
    matches!(
      self,
      TravelRequestStatus::Completed | TravelRequestStatus::Cancelled
    )
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelRequest {
  pub uuid: String,
  pub passenger_uuid: String,
  pub driver_uuid: Option<String>,
  pub origin: String,
  pub destination: String,
  pub status: TravelRequestStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::TravelRequestStatus::*;
  use super::*;

  #[test]
  fn test_allowed_transitions() {
    assert!(Created.can_transition_to(Matched));
    assert!(Matched.can_transition_to(InProgress));
    assert!(InProgress.can_transition_to(Completed));
    assert!(Created.can_transition_to(Cancelled));
    assert!(Matched.can_transition_to(Cancelled));
  }

  #[test]
  fn test_rejected_transitions() {
    // No request may revert to Created after leaving it.
    for status in [Matched, InProgress, Completed, Cancelled] {
      assert!(!status.can_transition_to(Created));
    }
    // Terminal states have no outgoing edges.
    for status in [Created, Matched, InProgress, Completed, Cancelled] {
      assert!(!Completed.can_transition_to(status));
      assert!(!Cancelled.can_transition_to(status));
    }
    assert!(!Created.can_transition_to(InProgress));
    assert!(!Created.can_transition_to(Completed));
    assert!(!Matched.can_transition_to(Completed));
    assert!(!InProgress.can_transition_to(Cancelled));
  }

  #[test]
  fn test_terminal_states() {
    assert!(Completed.is_terminal());
    assert!(Cancelled.is_terminal());
    assert!(!Created.is_terminal());
    assert!(!Matched.is_terminal());
    assert!(!InProgress.is_terminal());
  }

  #[test]
  fn test_status_wire_format() {
    let serialized = serde_json::to_string(&InProgress).unwrap();
    assert_eq!(serialized, "\"IN_PROGRESS\"");

    let deserialized: TravelRequestStatus =
      serde_json::from_str("\"CANCELLED\"").unwrap();
    assert_eq!(deserialized, Cancelled);
  }
}
