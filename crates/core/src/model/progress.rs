use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress value is required")]
    Missing,

    #[error("progress must be between 0 and 100, got {0}")]
    OutOfRange(i64),
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Progress at or above this percentage counts as a completed course.
pub const COMPLETION_THRESHOLD: u8 = 80;

/// Completion percentage of a course, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// Validates a raw percentage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::OutOfRange` outside `0..=100`.
    pub fn new(raw: i64) -> Result<Self, ProgressError> {
        u8::try_from(raw)
            .ok()
            .filter(|v| *v <= 100)
            .map(Self)
            .ok_or(ProgressError::OutOfRange(raw))
    }

    /// Validates an optional raw percentage, as received from a request body.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Missing` for `None`, `OutOfRange` otherwise.
    pub fn from_input(raw: Option<i64>) -> Result<Self, ProgressError> {
        raw.ok_or(ProgressError::Missing).and_then(Self::new)
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Percentage for `completed` of `total` steps, rounded half up.
    ///
    /// Returns `None` when the course has no steps.
    #[must_use]
    pub fn from_completed_steps(completed: usize, total: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let completed = completed.min(total);
        // round(c / t * 100) == floor((200c + t) / 2t) for non-negative c, t > 0
        let pct = (completed * 200 + total) / (total * 2);
        u8::try_from(pct).ok().map(Self)
    }

    /// Number of fully completed steps this percentage covers:
    /// `floor(progress / 100 * total)`.
    ///
    /// This is not the inverse of [`Progress::from_completed_steps`]; a stored
    /// value of 45 over 5 steps yields 2 steps, which maps back to 40.
    #[must_use]
    pub fn completed_steps(self, total: usize) -> usize {
        usize::from(self.0) * total / 100
    }

    /// Whether a certificate is earned at this progress.
    #[must_use]
    pub fn earns_certificate(self) -> bool {
        self.0 >= COMPLETION_THRESHOLD
    }
}

impl TryFrom<i64> for Progress {
    type Error = ProgressError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Progress> for i64 {
    fn from(p: Progress) -> Self {
        i64::from(p.0)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Derived enrollment status. Never set directly; always computed from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl EnrollmentStatus {
    #[must_use]
    pub fn from_progress(progress: Progress) -> Self {
        if progress.earns_certificate() {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Parses the persisted label.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "In Progress" => Some(Self::InProgress),
            "Completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(v: i64) -> Progress {
        Progress::new(v).unwrap()
    }

    #[test]
    fn rejects_out_of_range_and_missing() {
        assert_eq!(Progress::new(-1), Err(ProgressError::OutOfRange(-1)));
        assert_eq!(Progress::new(101), Err(ProgressError::OutOfRange(101)));
        assert_eq!(Progress::from_input(None), Err(ProgressError::Missing));
        assert_eq!(Progress::from_input(Some(100)), Ok(Progress::FULL));
    }

    #[test]
    fn status_flips_at_eighty() {
        for v in 0..=100 {
            let expected = if v >= 80 {
                EnrollmentStatus::Completed
            } else {
                EnrollmentStatus::InProgress
            };
            assert_eq!(EnrollmentStatus::from_progress(p(v)), expected, "progress {v}");
        }
        assert!(!p(79).earns_certificate());
        assert!(p(80).earns_certificate());
    }

    #[test]
    fn completed_steps_floor_does_not_round_trip() {
        let stored = p(45);
        let steps = stored.completed_steps(5);
        assert_eq!(steps, 2);
        assert_eq!(Progress::from_completed_steps(steps, 5), Some(p(40)));
    }

    #[test]
    fn marking_third_of_five_gives_sixty() {
        assert_eq!(Progress::from_completed_steps(3, 5), Some(p(60)));
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(Progress::from_completed_steps(1, 3), Some(p(33)));
        assert_eq!(Progress::from_completed_steps(2, 3), Some(p(67)));
        assert_eq!(Progress::from_completed_steps(1, 8), Some(p(13)));
    }

    #[test]
    fn zero_steps_never_divides() {
        assert_eq!(Progress::from_completed_steps(0, 0), None);
        assert_eq!(p(100).completed_steps(0), 0);
    }

    #[test]
    fn completed_count_is_clamped_to_total() {
        assert_eq!(Progress::from_completed_steps(9, 5), Some(Progress::FULL));
    }

    #[test]
    fn serializes_as_integer_and_validates_on_deserialize() {
        assert_eq!(serde_json::to_string(&p(60)).unwrap(), "60");
        assert!(serde_json::from_str::<Progress>("140").is_err());
        assert_eq!(
            serde_json::to_string(&EnrollmentStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
    }
}
