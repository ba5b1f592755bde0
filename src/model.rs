use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One execution of a build/test configuration in the CI system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Job id, unique within the results service
    pub id: u64,
    /// Globally unique job key
    pub job_guid: String,
    /// Id of the push this job ran against
    pub result_set_id: u64,
    /// Build configuration label (e.g. "linux64-debug")
    pub ref_data_name: String,
    /// Display name of the job type (e.g. "mochitest-5")
    pub job_type_name: String,
    /// Lifecycle state (e.g. "pending", "running", "completed")
    pub state: String,
    /// Final result (e.g. "success", "testfailed", "busted")
    pub result: String,
}

/// The selection key carried by "job selected" events.
///
/// A selection only needs the job id and its GUID; the coordinator fetches
/// the full record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRef {
    pub id: u64,
    pub job_guid: String,
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            job_guid: job.job_guid.clone(),
        }
    }
}

/// One title/value property describing a job run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetail {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// A log artifact attached to a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobLogUrl {
    pub id: u64,
    /// Artifact name; structured-log artifacts end in `_json`
    pub name: String,
    pub url: String,
    /// Parse state of the artifact ("pending", "parsed", "failed", ...)
    pub parse_status: String,
}

/// A raw performance measurement tied to a signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDatum {
    pub id: u64,
    /// Signature of the series this measurement belongs to
    pub signature_id: u64,
    pub value: f64,
}

/// Metadata describing one performance series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerfSeries {
    /// Signature id the series is keyed by
    pub id: u64,
    /// Display name (e.g. "tp5o summary opt")
    pub name: String,
    /// Performance framework the series belongs to
    pub framework_id: u64,
    /// Signature of the summary series this one rolls up into, if any.
    /// Series carrying a parent are rollups, not leaf measurements.
    #[serde(default)]
    pub parent_signature: Option<u64>,
}

/// A performance measurement joined to its series, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerfJobDetail {
    /// Link into the performance graphs view
    pub url: String,
    pub value: f64,
    /// Series display name
    pub title: String,
}

/// A human or automated judgment about a job's failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub id: u64,
    pub job_id: u64,
    pub failure_classification_id: u64,
    pub text: String,
    /// Who entered the classification (email or "autoclassifier")
    pub who: String,
    pub created: DateTime<Utc>,
}

/// A bug referenced by a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bug {
    pub id: u64,
    pub summary: String,
    #[serde(default)]
    pub resolution: String,
}

/// Bug lists attached to one suggestion, split by recency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionBugs {
    /// Open bugs touched recently; the strongest matches
    pub open_recent: Vec<Bug>,
    /// Everything else that matched the failure line
    pub all_others: Vec<Bug>,
}

/// A log-derived candidate list of related bugs, as fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugSuggestion {
    /// The failure line the bugs were matched against
    pub search: String,
    pub bugs: SuggestionBugs,
}

/// A suggestion annotated with its display validity flags.
///
/// Produced by [`crate::detail`]'s pure annotation pass; the fetched
/// [`BugSuggestion`] is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedSuggestion {
    pub search: String,
    pub bugs: SuggestionBugs,
    /// The open_recent list exceeds the display limit
    pub too_many_open_recent: bool,
    /// The all_others list exceeds the display limit
    pub too_many_all_others: bool,
    pub valid_open_recent: bool,
    pub valid_all_others: bool,
}

/// One parsed step of a job's text log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLogStep {
    pub name: String,
    pub result: String,
    /// Line the step ended on, used to anchor viewer links
    #[serde(default)]
    pub finished_line_number: u64,
}

/// Fallback error entry derived from a non-success log step when a job has
/// no bug suggestions at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLine {
    pub name: String,
    pub result: String,
    /// Log viewer link anchored to the step's last line
    pub log_viewer_url: String,
}

/// A set of revisions submitted together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Push {
    pub id: u64,
    /// Tip revision of the push
    pub revision: String,
    pub author: String,
}
