use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of an appointment. Transitions go through
/// [`AppointmentStatus::can_transition_to`]; writes that would skip a
/// state or revive a terminal one are rejected at the handler boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "SCHEDULED",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::InProgress => "IN_PROGRESS",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::NoShow => "NO_SHOW",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SCHEDULED" => Some(AppointmentStatus::Scheduled),
            "CONFIRMED" => Some(AppointmentStatus::Confirmed),
            "IN_PROGRESS" => Some(AppointmentStatus::InProgress),
            "COMPLETED" => Some(AppointmentStatus::Completed),
            "CANCELLED" => Some(AppointmentStatus::Cancelled),
            "NO_SHOW" => Some(AppointmentStatus::NoShow),
            _ => None,
        }
    }

    pub fn all() -> [AppointmentStatus; 6] {
        [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ]
    }

    /// Allowed-transition table. Completed, cancelled and no-show are
    /// terminal.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (*self, next),
            (Scheduled, Confirmed)
                | (Scheduled, Cancelled)
                | (Scheduled, NoShow)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed
                | AppointmentStatus::Cancelled
                | AppointmentStatus::NoShow
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_status() {
        for status in AppointmentStatus::all() {
            assert_eq!(AppointmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AppointmentStatus::parse("DONE"), None);
        assert_eq!(AppointmentStatus::parse("scheduled"), None);
    }

    #[test]
    fn scheduled_can_only_move_forward_or_out() {
        let from = AppointmentStatus::Scheduled;
        assert!(from.can_transition_to(AppointmentStatus::Confirmed));
        assert!(from.can_transition_to(AppointmentStatus::Cancelled));
        assert!(from.can_transition_to(AppointmentStatus::NoShow));
        assert!(!from.can_transition_to(AppointmentStatus::InProgress));
        assert!(!from.can_transition_to(AppointmentStatus::Completed));
        assert!(!from.can_transition_to(AppointmentStatus::Scheduled));
    }

    #[test]
    fn completed_is_terminal() {
        let from = AppointmentStatus::Completed;
        assert!(from.is_terminal());
        for next in AppointmentStatus::all() {
            assert!(!from.can_transition_to(next));
        }
    }

    #[test]
    fn completed_cannot_go_back_to_scheduled() {
        assert!(!AppointmentStatus::Completed.can_transition_to(AppointmentStatus::Scheduled));
        assert!(!AppointmentStatus::Cancelled.can_transition_to(AppointmentStatus::Scheduled));
        assert!(!AppointmentStatus::NoShow.can_transition_to(AppointmentStatus::Scheduled));
    }

    #[test]
    fn in_progress_completes_or_cancels() {
        let from = AppointmentStatus::InProgress;
        assert!(from.can_transition_to(AppointmentStatus::Completed));
        assert!(from.can_transition_to(AppointmentStatus::Cancelled));
        assert!(!from.can_transition_to(AppointmentStatus::NoShow));
        assert!(!from.can_transition_to(AppointmentStatus::Confirmed));
    }
}
