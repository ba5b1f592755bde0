//! Coordinates the fetch batches behind the job detail view.
//!
//! Selecting a job starts a batch of concurrent fetches; selecting another
//! job supersedes the first batch, whose results are discarded no matter
//! when they arrive. Supersession is tracked by a generation counter, and
//! every state write is guarded by the generation it belongs to.

mod aggregate;
mod state;
mod suggestions;


pub use state::JobViewState;
pub use suggestions::BUG_SUGGESTION_LIMIT;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use log::{debug, warn};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::error::Result;
use crate::links;
use crate::model::{JobRef, PerfSeries};
use crate::providers::{DetailFetcher, PushLookup};

const SERIES_FETCH_BATCH: usize = 20;

pub struct DetailCoordinator<F, P> {
    fetcher: F,
    pushes: P,
    project: String,
    origin: String,
    state: Mutex<JobViewState>,
    generation: AtomicU64,
}

impl<F: DetailFetcher, P: PushLookup> DetailCoordinator<F, P> {
    pub fn new(fetcher: F, pushes: P, project: &str, origin: &str) -> Self {
        Self {
            fetcher,
            pushes,
            project: project.to_string(),
            origin: origin.to_string(),
            state: Mutex::new(JobViewState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Clone of the current view state. Readers never observe a partially
    /// applied batch.
    pub fn snapshot(&self) -> JobViewState {
        self.state.lock().unwrap().clone()
    }

    /// Applies a state change if `batch` is still the live generation.
    ///
    /// Returns false when the batch has been superseded, in which case the
    /// change is discarded. The generation check happens under the state
    /// lock, so a commit and a superseding selection cannot interleave.
    fn commit(&self, batch: u64, apply: impl FnOnce(&mut JobViewState)) -> bool {
        let mut state = self.state.lock().unwrap();
        if self.generation.load(Ordering::SeqCst) != batch {
            return false;
        }
        apply(&mut state);
        true
    }

    /// Loads everything the detail view shows for `job`.
    ///
    /// Any batch still in flight is superseded immediately. The primary
    /// fetches land in one wholesale state write; classifications and bug
    /// suggestions follow it and patch their own sections. Their failures
    /// are logged and leave the committed view intact.
    pub async fn select_job(&self, job: &JobRef) -> Result<()> {
        let batch = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Selecting job {} (batch {batch})", job.id);

        self.commit(batch, |state| {
            state.loading = true;
            state.suggestions_loading = true;
        });

        let view = match self.fetch_primary(job).await {
            Ok(view) => view,
            Err(error) => {
                warn!("Loading job {} failed: {error}", job.id);
                self.commit(batch, |state| {
                    state.loading = false;
                    state.suggestions_loading = false;
                });
                return Err(error);
            }
        };

        if !self.commit(batch, |state| *state = view) {
            debug!("Batch {batch} superseded; discarding results for job {}", job.id);
            return Ok(());
        }

        tokio::join!(
            self.update_classifications(batch, job.id),
            self.load_bug_suggestions(batch, job.id),
        );
        Ok(())
    }

    /// Runs the primary fetch batch and derives the view state it commits.
    async fn fetch_primary(&self, job: &JobRef) -> Result<JobViewState> {
        let (job_result, details_result, logs_result, perf_result) = tokio::join!(
            self.fetcher.job(&self.project, job.id),
            self.fetcher.job_details(&job.job_guid),
            self.fetcher.job_log_urls(&self.project, job.id),
            self.fetcher.performance_series_data(&self.project, job.id),
        );
        let job = job_result?;
        let details = details_result?;
        let logs = logs_result?;
        let groups = perf_result?;

        let revision = self.pushes.revision_for(job.result_set_id)?;

        let data = aggregate::flatten_performance_data(groups);
        let series = self.fetch_series(&aggregate::distinct_signature_ids(&data)).await?;
        let perf_job_details =
            aggregate::join_performance_series(&data, &series, &self.project, job.result_set_id);

        let details = aggregate::with_buildername(details, &job);
        let logs = aggregate::displayable_logs(logs);
        let log_viewer_url = links::log_viewer_url(job.id, &self.project, None);
        let log_viewer_full_url = format!("{}/{log_viewer_url}", self.origin);

        Ok(JobViewState {
            loading: false,
            log_parse_status: aggregate::log_parse_status(&logs),
            logs_all_parsed: aggregate::logs_all_parsed(&logs),
            reftest_url: aggregate::reftest_url(&logs),
            log_viewer_url: Some(log_viewer_url),
            log_viewer_full_url: Some(log_viewer_full_url),
            job_revision: Some(revision),
            job: Some(job),
            job_details: details,
            job_log_urls: logs,
            perf_job_details,
            classifications: Vec::new(),
            suggestions: Vec::new(),
            errors: Vec::new(),
            suggestions_loading: true,
        })
    }

    /// Fetches series descriptors for the given signatures, at most
    /// [`SERIES_FETCH_BATCH`] ids per request, requests in flight together.
    async fn fetch_series(&self, signature_ids: &[u64]) -> Result<Vec<PerfSeries>> {
        let requests = signature_ids
            .chunks(SERIES_FETCH_BATCH)
            .map(|chunk| self.fetcher.series_list(&self.project, chunk));

        let mut series = Vec::new();
        for batch in join_all(requests).await {
            series.extend(batch?);
        }
        Ok(series)
    }

    async fn update_classifications(&self, batch: u64, job_id: u64) {
        match self.fetcher.classifications(&self.project, job_id).await {
            Ok(classifications) => {
                self.commit(batch, |state| state.classifications = classifications);
            }
            Err(error) => warn!("Fetching classifications for job {job_id} failed: {error}"),
        }
    }

    /// Loads bug suggestions, falling back to text log error lines when the
    /// job has no suggestions at all.
    async fn load_bug_suggestions(&self, batch: u64, job_id: u64) {
        let suggestions = match self.fetcher.bug_suggestions(&self.project, job_id).await {
            Ok(suggestions) => suggestions,
            Err(error) => {
                warn!("Fetching bug suggestions for job {job_id} failed: {error}");
                self.commit(batch, |state| state.suggestions_loading = false);
                return;
            }
        };

        let need_fallback = suggestions.is_empty();
        let annotated = suggestions::annotate_suggestions(suggestions);
        self.commit(batch, |state| {
            state.suggestions = annotated;
            state.suggestions_loading = false;
        });
        if !need_fallback {
            return;
        }

        match self.fetcher.text_log_steps(&self.project, job_id).await {
            Ok(steps) => {
                let errors = suggestions::error_lines(steps, job_id, &self.project);
                self.commit(batch, |state| state.errors = errors);
            }
            Err(error) => warn!("Fetching text log steps for job {job_id} failed: {error}"),
        }
    }
}

impl<F, P> DetailCoordinator<F, P>
where
    F: DetailFetcher + 'static,
    P: PushLookup + 'static,
{
    /// Consumes selection events, spawning one batch per event so a new
    /// selection can land while the previous one is still fetching.
    pub async fn listen(self: Arc<Self>, mut selections: UnboundedReceiver<JobRef>) {
        while let Some(job) = selections.recv().await {
            let coordinator = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(error) = coordinator.select_job(&job).await {
                    warn!("Selection of job {} failed: {error}", job.id);
                }
            });
        }
    }
}
