use serde::Serialize;
use std::cmp::Ordering;

use crate::models::JobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Company,
    Visa,
    Match,
    Status,
    AppliedDate,
    ResponseDate,
    Days,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Title,
        SortField::Company,
        SortField::Visa,
        SortField::Match,
        SortField::Status,
        SortField::AppliedDate,
        SortField::ResponseDate,
        SortField::Days,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Company => "company",
            SortField::Visa => "visa",
            SortField::Match => "match",
            SortField::Status => "status",
            SortField::AppliedDate => "applied_date",
            SortField::ResponseDate => "response_date",
            SortField::Days => "days",
        }
    }

    /// Unknown names give `None`, which sorts nothing.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "title" => Some(SortField::Title),
            "company" => Some(SortField::Company),
            "visa" => Some(SortField::Visa),
            "match" => Some(SortField::Match),
            "status" => Some(SortField::Status),
            "applied_date" | "appliedDate" => Some(SortField::AppliedDate),
            "response_date" | "responseDate" => Some(SortField::ResponseDate),
            "days" => Some(SortField::Days),
            _ => None,
        }
    }

    pub fn key(self, job: &JobRecord) -> SortKey {
        match self {
            SortField::Title => SortKey::Text(job.title.to_lowercase()),
            SortField::Company => SortKey::Text(job.company.to_lowercase()),
            SortField::Visa => SortKey::Number(job.has_visa_sponsorship.ordinal()),
            SortField::Match => SortKey::Number(job.match_or_zero()),
            SortField::Status => SortKey::Number(job.status.ordinal()),
            SortField::AppliedDate => {
                SortKey::Number(job.applied_date.map_or(0, |d| d.timestamp_millis()))
            }
            SortField::ResponseDate => {
                SortKey::Number(job.response_date.map_or(0, |d| d.timestamp_millis()))
            }
            SortField::Days => SortKey::Number(job.days_to_response.unwrap_or(0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortState {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }
}

/// Derived per-record value that ordering compares. A field always yields the
/// same variant, so mixed comparisons never happen in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Text(String),
}

/// Stable sort by the configured field; `None` keeps input order.
pub fn sort_jobs<'a>(jobs: &[&'a JobRecord], state: &SortState) -> Vec<&'a JobRecord> {
    let Some(field) = state.field else {
        return jobs.to_vec();
    };

    let mut keyed: Vec<(SortKey, &'a JobRecord)> =
        jobs.iter().map(|job| (field.key(job), *job)).collect();

    // ties keep input order in both directions
    keyed.sort_by(|a, b| state.direction.apply(a.0.cmp(&b.0)));

    keyed.into_iter().map(|(_, job)| job).collect()
}
