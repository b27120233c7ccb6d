use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Where enrollment timestamps and certificate dates come from.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => *at,
        }
    }

    /// Calendar day printed on certificates (UTC).
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Only a fixed clock moves; tests use this to space out writes.
    pub fn advance(&mut self, by: Duration) {
        if let Self::Fixed(at) = self {
            *at += by;
        }
    }
}

/// 2023-11-14T22:13:20Z, shared by tests.
///
/// # Panics
///
/// Never in practice: the timestamp is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("fixed timestamp should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_day_follows_fixed_clock() {
        let mut clock = Clock::fixed(fixed_now());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());

        clock.advance(Duration::hours(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2023, 11, 15).unwrap());

        let mut system = Clock::system();
        system.advance(Duration::days(1));
        assert!(matches!(system, Clock::System));
    }
}
