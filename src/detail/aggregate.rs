//! Pure derivations that turn raw fetch results into displayable view data.

use indexmap::{IndexMap, IndexSet};

use super::state::{PARSE_STATUS_PENDING, PARSE_STATUS_UNAVAILABLE};
use crate::links;
use crate::model::{Job, JobDetail, JobLogUrl, PerfJobDetail, PerfSeries, PerformanceDatum};

const BUILDBOT_REQUEST_ID: &str = "buildbot_request_id";

/// Buildbot jobs carry no buildername detail of their own; append one derived
/// from the job's build configuration label. Fetched entries keep their order.
pub fn with_buildername(mut details: Vec<JobDetail>, job: &Job) -> Vec<JobDetail> {
    if details.iter().any(|d| d.title == BUILDBOT_REQUEST_ID) {
        details.push(JobDetail {
            title: "Buildername".to_string(),
            value: job.ref_data_name.clone(),
            url: None,
        });
    }
    details
}

/// Drops machine-readable companion logs (names ending in `_json`).
pub fn displayable_logs(mut logs: Vec<JobLogUrl>) -> Vec<JobLogUrl> {
    logs.retain(|log| !log.name.ends_with("_json"));
    logs
}

/// Parse status of the first displayable log, `"unavailable"` without logs.
pub fn log_parse_status(logs: &[JobLogUrl]) -> String {
    logs.first()
        .map(|log| log.parse_status.clone())
        .unwrap_or_else(|| PARSE_STATUS_UNAVAILABLE.to_string())
}

/// True once no displayable log is still waiting on the parser. An empty log
/// list has nothing left to wait for.
pub fn logs_all_parsed(logs: &[JobLogUrl]) -> bool {
    logs.iter()
        .all(|log| log.parse_status != PARSE_STATUS_PENDING)
}

/// Reftest analyzer link for the first displayable log, if any.
pub fn reftest_url(logs: &[JobLogUrl]) -> Option<String> {
    logs.first().map(|log| links::reftest_analyzer_url(&log.url))
}

/// Flattens the per-suite datum groups into one list, preserving group order.
pub fn flatten_performance_data(
    groups: IndexMap<String, Vec<PerformanceDatum>>,
) -> Vec<PerformanceDatum> {
    groups.into_values().flatten().collect()
}

/// Signature ids referenced by the data, deduplicated in first-seen order.
pub fn distinct_signature_ids(data: &[PerformanceDatum]) -> Vec<u64> {
    let ids: IndexSet<u64> = data.iter().map(|datum| datum.signature_id).collect();
    ids.into_iter().collect()
}

/// Joins each datum to its series and maps the pair to a displayable
/// measurement with a graph link.
///
/// Data pointing at a series with a parent signature are subtest rollups and
/// are dropped; data whose signature matches no fetched series are dropped
/// rather than dereferenced.
pub fn join_performance_series(
    data: &[PerformanceDatum],
    series: &[PerfSeries],
    project: &str,
    push_id: u64,
) -> Vec<PerfJobDetail> {
    let by_signature: IndexMap<u64, &PerfSeries> = series.iter().map(|s| (s.id, s)).collect();

    data.iter()
        .filter_map(|datum| {
            let series = by_signature.get(&datum.signature_id)?;
            if series.parent_signature.is_some() {
                return None;
            }
            Some(PerfJobDetail {
                url: links::perf_graph_url(
                    project,
                    datum.signature_id,
                    push_id,
                    series.framework_id,
                    datum.id,
                ),
                value: datum.value,
                title: series.name.clone(),
            })
        })
        .collect()
}
