//! Issue identifiers for periodical publications.
//!
//! The catalog addresses an issue as `YYYYMM`. For the meeting workbook the
//! month is that of the two-month period the date falls in; the study
//! edition is monthly.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use super::error::DomainError;

/// Publications whose issue we can derive from a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicationType {
    /// Meeting workbook (`mwb`), one issue per two months on odd months.
    WeeklyMeeting,
    /// Study edition (`w`), one issue per month.
    WatchtowerStudy,
}

impl PublicationType {
    /// Look up a publication by catalog code.
    ///
    /// # Examples
    ///
    /// ```
    /// use schedule_server::domain::PublicationType;
    ///
    /// assert_eq!(PublicationType::from_code("mwb"), Some(PublicationType::WeeklyMeeting));
    /// assert_eq!(PublicationType::from_code("w"), Some(PublicationType::WatchtowerStudy));
    /// assert_eq!(PublicationType::from_code("g"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mwb" => Some(Self::WeeklyMeeting),
            "w" => Some(Self::WatchtowerStudy),
            _ => None,
        }
    }

    /// The catalog code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WeeklyMeeting => "mwb",
            Self::WatchtowerStudy => "w",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A resolved publication period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueReference {
    publication: PublicationType,
    year: i32,
    month: u32,
}

impl IssueReference {
    /// The issue covering `date`.
    pub fn for_date(publication: PublicationType, date: NaiveDate) -> Self {
        let (year, month) = match publication {
            PublicationType::WeeklyMeeting => bimonthly_issue(date.year(), date.month()),
            PublicationType::WatchtowerStudy => (date.year(), date.month()),
        };
        Self {
            publication,
            year,
            month,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Catalog form, `YYYYMM`.
    pub fn identifier(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for IssueReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:04}{:02}", self.publication, self.year, self.month)
    }
}

/// Issue month for a two-monthly publication released on odd months.
///
/// Even months belong to the issue of the month before. A zero month rolls
/// back into December of the previous year.
fn bimonthly_issue(year: i32, month: u32) -> (i32, u32) {
    let issue_month = if month % 2 == 1 {
        month
    } else {
        month.saturating_sub(1)
    };
    if issue_month == 0 {
        (year - 1, 12)
    } else {
        (year, issue_month)
    }
}

/// Resolve the catalog issue identifier for a request.
///
/// A non-empty `explicit_issue` is returned verbatim without looking at the
/// publication code. Otherwise the issue covering `reference_date` is
/// computed, which only works for publications with a known cadence.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::resolve_issue;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 12, 9).unwrap();
/// assert_eq!(resolve_issue("mwb", None, date).unwrap(), "202411");
/// assert_eq!(resolve_issue("w", None, date).unwrap(), "202412");
/// assert_eq!(resolve_issue("g", Some("202410"), date).unwrap(), "202410");
/// assert!(resolve_issue("g", None, date).is_err());
/// ```
pub fn resolve_issue(
    pub_code: &str,
    explicit_issue: Option<&str>,
    reference_date: NaiveDate,
) -> Result<String, DomainError> {
    if let Some(issue) = explicit_issue.filter(|i| !i.is_empty()) {
        return Ok(issue.to_string());
    }

    let publication = PublicationType::from_code(pub_code)
        .ok_or_else(|| DomainError::InvalidPublicationType(pub_code.to_string()))?;

    Ok(IssueReference::for_date(publication, reference_date).identifier())
}
