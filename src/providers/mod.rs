mod treeherder;

pub use treeherder::TreeherderClient;

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::{JobscopeError, Result};
use crate::model::{
    BugSuggestion, Classification, Job, JobDetail, JobLogUrl, PerfSeries, PerformanceDatum, Push,
    TextLogStep,
};

/// Read access to every per-job data set the detail view consumes.
///
/// The coordinator only ever talks to this seam: [`TreeherderClient`] is the
/// production implementation, tests script their own. All operations are
/// independent fetches; the coordinator decides how they are joined.
#[async_trait]
pub trait DetailFetcher: Send + Sync {
    /// Fetches the full job record.
    async fn job(&self, project: &str, job_id: u64) -> Result<Job>;

    /// Fetches the free-form detail list for a job, keyed by its GUID.
    async fn job_details(&self, job_guid: &str) -> Result<Vec<JobDetail>>;

    /// Fetches the log artifacts of a job.
    async fn job_log_urls(&self, project: &str, job_id: u64) -> Result<Vec<JobLogUrl>>;

    /// Fetches the raw performance measurements recorded by a job, grouped
    /// by series name in response order.
    async fn performance_series_data(
        &self,
        project: &str,
        job_id: u64,
    ) -> Result<IndexMap<String, Vec<PerformanceDatum>>>;

    /// Fetches series metadata for a batch of signature ids.
    async fn series_list(&self, project: &str, signature_ids: &[u64]) -> Result<Vec<PerfSeries>>;

    /// Fetches the classification list for a job, most recent first.
    async fn classifications(&self, project: &str, job_id: u64) -> Result<Vec<Classification>>;

    /// Fetches the bug suggestions derived from a job's logs.
    async fn bug_suggestions(&self, project: &str, job_id: u64) -> Result<Vec<BugSuggestion>>;

    /// Fetches the parsed steps of a job's text log.
    async fn text_log_steps(&self, project: &str, job_id: u64) -> Result<Vec<TextLogStep>>;
}

/// Resolves push ids to revisions.
pub trait PushLookup: Send + Sync {
    /// Returns the tip revision of a known push.
    ///
    /// # Errors
    ///
    /// Returns [`JobscopeError::PushNotFound`] for an unknown id. A job
    /// always references a push that exists, so an unknown id is a
    /// data-consistency bug upstream, not a display state.
    fn revision_for(&self, push_id: u64) -> Result<String>;
}

/// In-memory push table, primed from fetched pushes.
#[derive(Debug, Default)]
pub struct PushIndex {
    pushes: HashMap<u64, Push>,
}

impl PushIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a push, replacing any previous entry with the same id.
    pub fn insert(&mut self, push: Push) {
        self.pushes.insert(push.id, push);
    }

    pub fn from_pushes(pushes: impl IntoIterator<Item = Push>) -> Self {
        let mut index = Self::new();
        for push in pushes {
            index.insert(push);
        }
        index
    }
}

impl PushLookup for PushIndex {
    fn revision_for(&self, push_id: u64) -> Result<String> {
        self.pushes
            .get(&push_id)
            .map(|push| push.revision.clone())
            .ok_or(JobscopeError::PushNotFound(push_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_push(id: u64, revision: &str) -> Push {
        Push {
            id,
            revision: revision.to_string(),
            author: "dev@example.org".to_string(),
        }
    }

    #[test]
    fn test_push_index_resolves_known_push() {
        let index = PushIndex::from_pushes([create_push(7, "deadbeef")]);

        assert_eq!(index.revision_for(7).unwrap(), "deadbeef");
    }

    #[test]
    fn test_push_index_unknown_push_is_an_error() {
        let index = PushIndex::from_pushes([create_push(7, "deadbeef")]);

        let err = index.revision_for(8).unwrap_err();
        assert!(matches!(err, JobscopeError::PushNotFound(8)));
    }

    #[test]
    fn test_push_index_insert_replaces_existing_entry() {
        let mut index = PushIndex::new();
        index.insert(create_push(7, "deadbeef"));
        index.insert(create_push(7, "cafe1234"));

        assert_eq!(index.revision_for(7).unwrap(), "cafe1234");
    }
}
