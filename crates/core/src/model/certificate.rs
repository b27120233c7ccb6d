use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recipient shown when no display name is known.
pub const DEFAULT_RECIPIENT: &str = "Valued Student";

const ISSUER: &str = "SkillHub NG";

/// Printable certificate of completion.
///
/// Never persisted; produced on demand while the course progress earns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    recipient: String,
    course_name: String,
    issued_on: NaiveDate,
}

impl Certificate {
    #[must_use]
    pub fn new(recipient: Option<&str>, course_name: impl Into<String>, issued_on: NaiveDate) -> Self {
        let recipient = recipient
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_RECIPIENT);
        Self {
            recipient: recipient.to_owned(),
            course_name: course_name.into(),
            issued_on,
        }
    }

    #[must_use]
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    #[must_use]
    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    #[must_use]
    pub fn issued_on(&self) -> NaiveDate {
        self.issued_on
    }
}

impl fmt::Display for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CERTIFICATE OF COMPLETION")?;
        writeln!(f)?;
        writeln!(f, "This certificate is proudly presented to")?;
        writeln!(f, "{}", self.recipient)?;
        writeln!(f, "for successfully completing the course")?;
        writeln!(f, "{}", self.course_name)?;
        writeln!(f)?;
        writeln!(f, "Issued on: {}", self.issued_on.format("%Y-%m-%d"))?;
        write!(f, "{ISSUER}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn today() -> NaiveDate {
        fixed_now().date_naive()
    }

    #[test]
    fn falls_back_to_default_recipient() {
        let cert = Certificate::new(None, "Basic Computer Course", today());
        assert_eq!(cert.recipient(), DEFAULT_RECIPIENT);

        let cert = Certificate::new(Some("   "), "Basic Computer Course", today());
        assert_eq!(cert.recipient(), DEFAULT_RECIPIENT);
    }

    #[test]
    fn printable_text_names_recipient_course_and_issuer() {
        let cert = Certificate::new(Some("Ada"), "Art Design Fundamentals", today());
        let text = cert.to_string();
        assert!(text.starts_with("CERTIFICATE OF COMPLETION"));
        assert!(text.contains("\nAda\n"));
        assert!(text.contains("Art Design Fundamentals"));
        assert!(text.contains("Issued on: 2023-11-14"));
        assert!(text.ends_with("SkillHub NG"));
    }
}
