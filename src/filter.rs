use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::models::JobRecord;

/// Token selecting jobs with a resume match below 40%.
pub const BELOW_FORTY: &str = "0";
const LOW_MATCH_CEILING: i64 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Status,
    Visa,
    Match,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 3] = [
        FilterCategory::Status,
        FilterCategory::Visa,
        FilterCategory::Match,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterCategory::Status => "status",
            FilterCategory::Visa => "visa",
            FilterCategory::Match => "match",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "status" => Some(FilterCategory::Status),
            "visa" => Some(FilterCategory::Visa),
            "match" => Some(FilterCategory::Match),
            _ => None,
        }
    }
}

/// Selected tokens per category. Tokens inside a category are OR-ed,
/// categories are AND-ed, and an empty category constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub status: BTreeSet<String>,
    pub visa: BTreeSet<String>,
    #[serde(rename = "match")]
    pub match_: BTreeSet<String>,
}

impl FilterState {
    pub fn tokens(&self, category: FilterCategory) -> &BTreeSet<String> {
        match category {
            FilterCategory::Status => &self.status,
            FilterCategory::Visa => &self.visa,
            FilterCategory::Match => &self.match_,
        }
    }

    pub fn tokens_mut(&mut self, category: FilterCategory) -> &mut BTreeSet<String> {
        match category {
            FilterCategory::Status => &mut self.status,
            FilterCategory::Visa => &mut self.visa,
            FilterCategory::Match => &mut self.match_,
        }
    }

    pub fn contains(&self, category: FilterCategory, token: &str) -> bool {
        self.tokens(category).contains(token)
    }

    /// Adds `token` if absent, removes it if present. Returns whether the
    /// token is selected afterwards.
    pub fn toggle(&mut self, category: FilterCategory, token: &str) -> bool {
        let tokens = self.tokens_mut(category);
        if tokens.remove(token) {
            false
        } else {
            tokens.insert(token.to_string());
            true
        }
    }

    /// True when at least one category constrains the result.
    pub fn is_active(&self) -> bool {
        FilterCategory::ALL
            .iter()
            .any(|c| !self.tokens(*c).is_empty())
    }

    /// First category that rejects `job`, if any.
    pub fn rejecting_category(&self, job: &JobRecord) -> Option<FilterCategory> {
        if !self.status.is_empty()
            && !job
                .status
                .token()
                .is_some_and(|token| self.status.contains(token))
        {
            return Some(FilterCategory::Status);
        }

        if !self.visa.is_empty() && !self.visa.contains(job.has_visa_sponsorship.token()) {
            return Some(FilterCategory::Visa);
        }

        if !self.match_.is_empty() {
            let pct = job.match_or_zero();
            if !self.match_.iter().any(|t| threshold_admits(t, pct)) {
                return Some(FilterCategory::Match);
            }
        }

        None
    }

    pub fn passes(&self, job: &JobRecord) -> bool {
        self.rejecting_category(job).is_none()
    }
}

/// `"0"` means "below 40%", any other integer is an inclusive lower bound.
/// Tokens that aren't integers admit nothing.
fn threshold_admits(token: &str, pct: i64) -> bool {
    if token == BELOW_FORTY {
        return pct < LOW_MATCH_CEILING;
    }
    match token.trim().parse::<i64>() {
        Ok(0) => pct < LOW_MATCH_CEILING,
        Ok(min) => pct >= min,
        Err(_) => false,
    }
}

/// Keeps the jobs that satisfy every category, in input order.
pub fn filter_jobs<'a, I>(jobs: I, state: &FilterState) -> Vec<&'a JobRecord>
where
    I: IntoIterator<Item = &'a JobRecord>,
{
    jobs.into_iter()
        .filter(|job| match state.rejecting_category(job) {
            Some(category) => {
                trace!(job_id = job.id, category = category.as_str(), "job filtered out");
                false
            }
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, VisaSponsorship};

    fn job(id: i64, status: JobStatus, visa: VisaSponsorship, pct: Option<i64>) -> JobRecord {
        let mut j = JobRecord::new(id, &format!("Job {}", id), "Co");
        j.status = status;
        j.has_visa_sponsorship = visa;
        j.resume_match_percentage = pct;
        j
    }

    fn sample() -> Vec<JobRecord> {
        vec![
            job(1, JobStatus::New, VisaSponsorship::Yes, Some(85)),
            job(2, JobStatus::Applied, VisaSponsorship::No, Some(30)),
            job(3, JobStatus::Interview, VisaSponsorship::Unknown, None),
            job(4, JobStatus::Applied, VisaSponsorship::Yes, Some(55)),
            job(5, JobStatus::Rejected, VisaSponsorship::Unknown, Some(70)),
        ]
    }

    fn ids(jobs: &[&JobRecord]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    fn state_with(category: FilterCategory, tokens: &[&str]) -> FilterState {
        let mut state = FilterState::default();
        for t in tokens {
            state.toggle(category, t);
        }
        state
    }

    #[test]
    fn test_empty_state_is_identity() {
        let jobs = sample();
        let out = filter_jobs(&jobs, &FilterState::default());
        assert_eq!(ids(&out), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_status_tokens_are_or_combined() {
        let jobs = sample();
        let state = state_with(FilterCategory::Status, &["applied", "rejected"]);
        assert_eq!(ids(&filter_jobs(&jobs, &state)), vec![2, 4, 5]);
    }

    #[test]
    fn test_visa_null_token_matches_unknown() {
        let jobs = sample();
        let state = state_with(FilterCategory::Visa, &["null"]);
        assert_eq!(ids(&filter_jobs(&jobs, &state)), vec![3, 5]);
    }

    #[test]
    fn test_categories_are_and_combined() {
        let jobs = sample();
        let mut state = state_with(FilterCategory::Status, &["applied"]);
        state.toggle(FilterCategory::Visa, "true");
        assert_eq!(ids(&filter_jobs(&jobs, &state)), vec![4]);
    }

    #[test]
    fn test_match_threshold_lower_bound() {
        let jobs = vec![
            {
                let mut j = JobRecord::new(1, "B", "Co");
                j.resume_match_percentage = Some(30);
                j
            },
            {
                let mut j = JobRecord::new(2, "A", "Co");
                j.resume_match_percentage = Some(80);
                j
            },
        ];
        let state = state_with(FilterCategory::Match, &["40"]);
        let out = filter_jobs(&jobs, &state);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "A");
    }

    #[test]
    fn test_match_extremes_exclude_middle_band() {
        let jobs = sample();
        let state = state_with(FilterCategory::Match, &["0", "70"]);
        // 85 and 70 are >= 70, 30 and missing (0) are < 40, 55 is neither
        assert_eq!(ids(&filter_jobs(&jobs, &state)), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_missing_match_counts_as_zero() {
        let jobs = sample();
        let state = state_with(FilterCategory::Match, &["0"]);
        assert_eq!(ids(&filter_jobs(&jobs, &state)), vec![2, 3]);
    }

    #[test]
    fn test_malformed_tokens_fail_closed() {
        let jobs = sample();
        let state = state_with(FilterCategory::Match, &["lots"]);
        assert!(filter_jobs(&jobs, &state).is_empty());

        let state = state_with(FilterCategory::Status, &["NEW"]);
        assert!(filter_jobs(&jobs, &state).is_empty());
    }

    #[test]
    fn test_unrecognized_status_never_matches() {
        let jobs = vec![job(1, JobStatus::Unrecognized, VisaSponsorship::Yes, None)];
        let state = state_with(FilterCategory::Status, &["new"]);
        assert!(filter_jobs(&jobs, &state).is_empty());
        assert_eq!(ids(&filter_jobs(&jobs, &FilterState::default())), vec![1]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let jobs = sample();
        let mut state = state_with(FilterCategory::Match, &["0", "70"]);
        state.toggle(FilterCategory::Visa, "null");
        let once = filter_jobs(&jobs, &state);
        let twice = filter_jobs(once.iter().copied(), &state);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut state = state_with(FilterCategory::Status, &["new"]);
        let before = state.clone();
        assert!(state.toggle(FilterCategory::Visa, "true"));
        assert!(!state.toggle(FilterCategory::Visa, "true"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_is_active() {
        let mut state = FilterState::default();
        assert!(!state.is_active());
        state.toggle(FilterCategory::Match, "40");
        assert!(state.is_active());
        state.toggle(FilterCategory::Match, "40");
        assert!(!state.is_active());
    }

    #[test]
    fn test_category_parse() {
        for category in FilterCategory::ALL {
            assert_eq!(FilterCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(FilterCategory::parse("salary"), None);
    }
}
