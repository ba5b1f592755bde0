use serde::Serialize;

use crate::model::{
    AnnotatedSuggestion, Classification, ErrorLine, Job, JobDetail, JobLogUrl, PerfJobDetail,
};

pub const PARSE_STATUS_PENDING: &str = "pending";
pub const PARSE_STATUS_UNAVAILABLE: &str = "unavailable";

/// Everything the detail view knows about the currently selected job.
///
/// A selection batch replaces this record wholesale; dependent fetches
/// (classifications, bug suggestions) patch their own sections afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobViewState {
    pub loading: bool,
    pub job: Option<Job>,
    pub job_details: Vec<JobDetail>,
    pub job_log_urls: Vec<JobLogUrl>,
    pub logs_all_parsed: bool,
    pub log_parse_status: String,
    pub log_viewer_url: Option<String>,
    pub log_viewer_full_url: Option<String>,
    pub reftest_url: Option<String>,
    pub perf_job_details: Vec<PerfJobDetail>,
    pub job_revision: Option<String>,
    pub classifications: Vec<Classification>,
    pub suggestions: Vec<AnnotatedSuggestion>,
    pub errors: Vec<ErrorLine>,
    pub suggestions_loading: bool,
}

impl Default for JobViewState {
    fn default() -> Self {
        Self {
            loading: false,
            job: None,
            job_details: Vec::new(),
            job_log_urls: Vec::new(),
            logs_all_parsed: false,
            log_parse_status: PARSE_STATUS_UNAVAILABLE.to_string(),
            log_viewer_url: None,
            log_viewer_full_url: None,
            reftest_url: None,
            perf_job_details: Vec::new(),
            job_revision: None,
            classifications: Vec::new(),
            suggestions: Vec::new(),
            errors: Vec::new(),
            suggestions_loading: false,
        }
    }
}

impl JobViewState {
    /// Classifications arrive most-recent-first; only the newest one is shown.
    pub fn latest_classification(&self) -> Option<&Classification> {
        self.classifications.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn create_classification(id: u64, text: &str) -> Classification {
        Classification {
            id,
            job_id: 42,
            failure_classification_id: 4,
            text: text.to_string(),
            who: "sheriff@example.org".to_string(),
            created: Utc.with_ymd_and_hms(2017, 9, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_default_state_is_empty_and_idle() {
        let state = JobViewState::default();

        assert!(!state.loading);
        assert!(!state.suggestions_loading);
        assert!(state.job.is_none());
        assert_eq!(state.log_parse_status, PARSE_STATUS_UNAVAILABLE);
        assert!(state.latest_classification().is_none());
    }

    #[test]
    fn test_latest_classification_is_the_first_entry() {
        let state = JobViewState {
            classifications: vec![
                create_classification(9, "newest note"),
                create_classification(3, "older note"),
            ],
            ..JobViewState::default()
        };

        let latest = state.latest_classification().unwrap();

        assert_eq!(latest.id, 9);
        assert_eq!(latest.text, "newest note");
    }
}
