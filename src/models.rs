use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    New,
    Applied,
    Interview,
    Offer,
    Rejected,
    /// Anything the backend sends that we don't know about, null included.
    Unrecognized,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        JobStatus::New,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Offer,
        JobStatus::Rejected,
    ];

    /// Filter token for this status. Unrecognized statuses have none and so
    /// never match a status filter.
    pub fn token(self) -> Option<&'static str> {
        match self {
            JobStatus::New => Some("new"),
            JobStatus::Applied => Some("applied"),
            JobStatus::Interview => Some("interview"),
            JobStatus::Offer => Some("offer"),
            JobStatus::Rejected => Some("rejected"),
            JobStatus::Unrecognized => None,
        }
    }

    pub fn parse(name: &str) -> Self {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.token() == Some(name))
            .unwrap_or(JobStatus::Unrecognized)
    }

    /// Pipeline position: new → applied → interview → offer → rejected.
    pub fn ordinal(self) -> i64 {
        match self {
            JobStatus::New => 1,
            JobStatus::Applied => 2,
            JobStatus::Interview => 3,
            JobStatus::Offer => 4,
            JobStatus::Rejected => 5,
            JobStatus::Unrecognized => 0,
        }
    }

    pub fn label(self) -> &'static str {
        self.token().unwrap_or("?")
    }
}

/// LLM verdict on whether the employer sponsors visas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum VisaSponsorship {
    Yes,
    No,
    #[default]
    Unknown,
}

impl From<Option<bool>> for VisaSponsorship {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => VisaSponsorship::Yes,
            Some(false) => VisaSponsorship::No,
            None => VisaSponsorship::Unknown,
        }
    }
}

impl From<VisaSponsorship> for Option<bool> {
    fn from(value: VisaSponsorship) -> Self {
        match value {
            VisaSponsorship::Yes => Some(true),
            VisaSponsorship::No => Some(false),
            VisaSponsorship::Unknown => None,
        }
    }
}

impl VisaSponsorship {
    /// String form used by visa filter tokens.
    pub fn token(self) -> &'static str {
        match self {
            VisaSponsorship::Yes => "true",
            VisaSponsorship::No => "false",
            VisaSponsorship::Unknown => "null",
        }
    }

    /// Yes > N/A > No
    pub fn ordinal(self) -> i64 {
        match self {
            VisaSponsorship::Yes => 3,
            VisaSponsorship::Unknown => 2,
            VisaSponsorship::No => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VisaSponsorship::Yes => "yes",
            VisaSponsorship::No => "no",
            VisaSponsorship::Unknown => "n/a",
        }
    }
}

/// One tracked job application, as served by the backend's `/api/jobs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: JobStatus,
    #[serde(default)]
    pub has_visa_sponsorship: VisaSponsorship,
    #[serde(default)]
    pub sponsorship_analysis: Option<String>,
    #[serde(default)]
    pub resume_match_percentage: Option<i64>,
    #[serde(default)]
    pub match_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub applied_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub response_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub days_to_response: Option<i64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn new(id: i64, title: &str, company: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            company: company.to_string(),
            job_url: None,
            status: JobStatus::default(),
            has_visa_sponsorship: VisaSponsorship::default(),
            sponsorship_analysis: None,
            resume_match_percentage: None,
            match_analysis: None,
            applied_date: None,
            response_date: None,
            days_to_response: None,
            created_at: None,
        }
    }

    /// Match percentage with "not analyzed yet" counted as 0.
    pub fn match_or_zero(&self) -> i64 {
        self.resume_match_percentage.unwrap_or(0)
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<JobStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(name) => JobStatus::parse(&name),
        _ => JobStatus::Unrecognized,
    })
}

/// Strings go through [`parse_timestamp`], integers are Unix milliseconds,
/// anything else is treated as missing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// Parses the timestamp shapes the backend has been seen to emit: RFC 3339,
/// naive ISO-8601 (taken as UTC) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
