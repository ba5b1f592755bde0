//! Builders for the dashboard URLs the detail view links out to.

/// Reftest analyzer shipped with the source tree; takes a raw log URL in
/// its fragment.
const REFTEST_ANALYZER_URL: &str =
    "https://hg.mozilla.org/mozilla-central/raw-file/tip/layout/tools/reftest/reftest-analyzer.xhtml";

/// Builds the in-dashboard log viewer URL for a job.
///
/// # Arguments
///
/// * `job_id` - Job whose log should be opened
/// * `project` - Project (repository) slug the job belongs to
/// * `line_number` - Optional log line to anchor the viewer to
///
/// # Returns
///
/// Origin-relative viewer URL (e.g. `logviewer.html#?job_id=42&repo=autoland`)
pub fn log_viewer_url(job_id: u64, project: &str, line_number: Option<u64>) -> String {
    let url = format!("logviewer.html#?job_id={job_id}&repo={project}");
    match line_number {
        Some(line) => format!("{url}&lineNumber={line}"),
        None => url,
    }
}

/// Builds a reftest analyzer link for a raw log, restricted to unexpected
/// results.
///
/// # Arguments
///
/// * `log_url` - Raw log URL, embedded URL-encoded in the analyzer fragment
///
/// # Returns
///
/// Absolute analyzer URL with `only_show_unexpected` set.
pub fn reftest_analyzer_url(log_url: &str) -> String {
    format!(
        "{REFTEST_ANALYZER_URL}#logurl={}&only_show_unexpected=1",
        urlencoding::encode(log_url)
    )
}

/// Builds the performance graphs link for one measurement.
///
/// The `series` parameter selects the series (visible by default, hence the
/// fixed `1`); `selected` highlights this job's data point on it.
///
/// # Arguments
///
/// * `project` - Project (repository) slug
/// * `signature_id` - Signature of the series the measurement belongs to
/// * `push_id` - Push the measured job ran against
/// * `framework_id` - Performance framework of the series
/// * `datum_id` - Id of the measurement to highlight
pub fn perf_graph_url(
    project: &str,
    signature_id: u64,
    push_id: u64,
    framework_id: u64,
    datum_id: u64,
) -> String {
    format!(
        "/perf.html#/graphs?series={project},{signature_id},1,{framework_id}&selected={project},{signature_id},{push_id},{datum_id}"
    )
}
