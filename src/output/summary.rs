use std::fmt::Write;

use comfy_table::{Cell, Color as TableColor};

use crate::detail::{JobViewState, BUG_SUGGESTION_LIMIT};
use crate::model::AnnotatedSuggestion;

use super::styling::{bright, bright_yellow, cyan, dim, styled_result};
use super::tables::{create_table, parse_status_cell, result_cell};

/// Prints a human-readable rendering of the job detail view to stdout.
///
/// Displays color-coded sections showing:
/// - Job: type, build configuration, state, result, revision, log viewer link
/// - Job Details: free-form metadata recorded by the job
/// - Logs: log artifacts with their parse status
/// - Performance: measurements with links into the graphs view
/// - Classification: the newest sheriff annotation
/// - Failure Suggestions: bugs matching the failure lines, or the raw log
///   error lines when nothing matched
pub fn print_view(state: &JobViewState) {
    println!("{}", render_view(state));
}

// Helper functions

fn create_cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn suggestion_bug_lines(output: &mut String, suggestion: &AnnotatedSuggestion) {
    if suggestion.valid_open_recent {
        for bug in &suggestion.bugs.open_recent {
            let _ = writeln!(output, "    {} {}", cyan(format!("#{}", bug.id)), bug.summary);
        }
    } else if suggestion.too_many_open_recent {
        let _ = writeln!(
            output,
            "    {}",
            dim(format!(
                "{} open bugs match (more than {BUG_SUGGESTION_LIMIT}); narrow the search",
                suggestion.bugs.open_recent.len()
            ))
        );
    }

    if suggestion.valid_all_others {
        let _ = writeln!(output, "    {}", dim("Other matching bugs:"));
        for bug in &suggestion.bugs.all_others {
            let resolution = if bug.resolution.is_empty() {
                String::new()
            } else {
                format!(" [{}]", bug.resolution)
            };
            let _ = writeln!(
                output,
                "    {} {}{}",
                cyan(format!("#{}", bug.id)),
                bug.summary,
                dim(resolution)
            );
        }
    } else if suggestion.too_many_all_others {
        let _ = writeln!(
            output,
            "    {}",
            dim(format!(
                "{} resolved or older bugs match (more than {BUG_SUGGESTION_LIMIT})",
                suggestion.bugs.all_others.len()
            ))
        );
    }
}

#[allow(clippy::too_many_lines, clippy::format_push_string)]
fn render_view(state: &JobViewState) -> String {
    let mut output = String::new();

    let job = match state.job.as_ref() {
        Some(job) => job,
        None => {
            output.push_str(&format!("{}\n", bright_yellow("No job selected.")));
            return output;
        }
    };

    // Job section
    add_section_header(&mut output, "🧾", "Job");

    output.push_str(&format!(
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Job type:"),
        cyan(&job.job_type_name),
        dim("Build:"),
        bright(&job.ref_data_name),
        dim("State:"),
        bright(&job.state),
        dim("Result:"),
        styled_result(&job.result),
        dim("Revision:"),
        bright_yellow(state.job_revision.as_deref().unwrap_or("unknown")),
    ));
    if let Some(url) = &state.log_viewer_full_url {
        output.push_str(&format!("  {} {}\n", dim("Log viewer:"), cyan(url)));
    }
    output.push('\n');

    // Job Details
    if !state.job_details.is_empty() {
        add_section_header(&mut output, "📋", "Job Details");

        let mut details_table = create_table();
        details_table.set_header(create_cyan_header(&["Title", "Value", "Link"]));
        for detail in &state.job_details {
            details_table.add_row(vec![
                Cell::new(&detail.title),
                Cell::new(&detail.value),
                Cell::new(detail.url.as_deref().unwrap_or("")),
            ]);
        }
        output.push_str(&format!("{details_table}\n\n"));
    }

    // Logs
    add_section_header(&mut output, "📜", "Logs");

    if state.job_log_urls.is_empty() {
        output.push_str(&format!(
            "  {}\n\n",
            bright_yellow("No logs recorded for this job.")
        ));
    } else {
        let mut logs_table = create_table();
        logs_table.set_header(create_cyan_header(&["Name", "Parse Status", "URL"]));
        for log in &state.job_log_urls {
            logs_table.add_row(vec![
                Cell::new(&log.name),
                parse_status_cell(&log.parse_status),
                Cell::new(&log.url),
            ]);
        }
        output.push_str(&format!("{logs_table}\n"));

        if !state.logs_all_parsed {
            output.push_str(&format!(
                "  {}\n",
                bright_yellow("Some logs are still being parsed.")
            ));
        }
        if let Some(url) = &state.reftest_url {
            output.push_str(&format!("  {} {}\n", dim("Reftest analyzer:"), dim(url)));
        }
        output.push('\n');
    }

    // Performance
    if !state.perf_job_details.is_empty() {
        add_section_header(&mut output, "📈", "Performance");

        let mut perf_table = create_table();
        perf_table.set_header(create_cyan_header(&["Measurement", "Value", "Graph"]));
        for perf in &state.perf_job_details {
            perf_table.add_row(vec![
                Cell::new(&perf.title),
                Cell::new(perf.value),
                Cell::new(&perf.url),
            ]);
        }
        output.push_str(&format!("{perf_table}\n\n"));
    }

    // Classification
    if let Some(classification) = state.latest_classification() {
        add_section_header(&mut output, "🏷️", "Classification");
        output.push_str(&format!(
            "  {}\n  {} {} {}\n\n",
            bright(&classification.text),
            dim("by"),
            cyan(&classification.who),
            dim(classification.created.format("%Y-%m-%d %H:%M UTC"))
        ));
    }

    // Failure Suggestions
    if state.suggestions_loading {
        add_section_header(&mut output, "💡", "Failure Suggestions");
        output.push_str(&format!(
            "  {}\n",
            bright_yellow("Suggestions are still loading.")
        ));
    } else if !state.suggestions.is_empty() {
        add_section_header(&mut output, "💡", "Failure Suggestions");
        for suggestion in &state.suggestions {
            output.push_str(&format!("  {}\n", bright(&suggestion.search)));
            suggestion_bug_lines(&mut output, suggestion);
        }
        output.push('\n');
    }

    // Log error fallback, shown when nothing matched any known bug
    if !state.errors.is_empty() {
        add_section_header(&mut output, "❌", "Log Errors");

        let mut errors_table = create_table();
        errors_table.set_header(create_cyan_header(&["Step", "Result", "Log Viewer"]));
        for error in &state.errors {
            errors_table.add_row(vec![
                Cell::new(&error.name),
                result_cell(&error.result),
                Cell::new(&error.log_viewer_url),
            ]);
        }
        output.push_str(&format!("{errors_table}\n"));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Bug, Classification, ErrorLine, Job, JobDetail, JobLogUrl, PerfJobDetail,
        SuggestionBugs,
    };
    use chrono::{TimeZone, Utc};

    fn create_test_job() -> Job {
        Job {
            id: 42,
            job_guid: "abc/42".to_string(),
            result_set_id: 7,
            ref_data_name: "linux64-debug".to_string(),
            job_type_name: "mochitest-5".to_string(),
            state: "completed".to_string(),
            result: "testfailed".to_string(),
        }
    }

    fn create_test_suggestion(open_recent: usize, all_others: usize) -> AnnotatedSuggestion {
        let bugs = |count: usize| -> Vec<Bug> {
            (0..count as u64)
                .map(|id| Bug {
                    id: 1000 + id,
                    summary: format!("Intermittent failure {id}"),
                    resolution: String::new(),
                })
                .collect()
        };
        let too_many_open_recent = open_recent > BUG_SUGGESTION_LIMIT;
        AnnotatedSuggestion {
            search: "TEST-UNEXPECTED-FAIL | foo.html | timed out".to_string(),
            bugs: SuggestionBugs {
                open_recent: bugs(open_recent),
                all_others: bugs(all_others),
            },
            too_many_open_recent,
            too_many_all_others: all_others > BUG_SUGGESTION_LIMIT,
            valid_open_recent: open_recent > 0 && !too_many_open_recent,
            valid_all_others: all_others > 0
                && all_others <= BUG_SUGGESTION_LIMIT
                && !too_many_open_recent,
        }
    }

    fn create_test_state() -> JobViewState {
        JobViewState {
            job: Some(create_test_job()),
            job_details: vec![JobDetail {
                title: "CPU usage".to_string(),
                value: "37%".to_string(),
                url: None,
            }],
            job_log_urls: vec![JobLogUrl {
                id: 1,
                name: "builds-4h".to_string(),
                url: "https://example.org/raw.log".to_string(),
                parse_status: "parsed".to_string(),
            }],
            logs_all_parsed: true,
            log_parse_status: "parsed".to_string(),
            log_viewer_full_url: Some(
                "https://treeherder.example.org/logviewer.html#?job_id=42&repo=autoland"
                    .to_string(),
            ),
            perf_job_details: vec![PerfJobDetail {
                url: "/perf.html#/graphs?series=autoland,1134,1,1".to_string(),
                value: 512.5,
                title: "tp5o summary opt".to_string(),
            }],
            job_revision: Some("deadbeef0123".to_string()),
            classifications: vec![Classification {
                id: 5,
                job_id: 42,
                failure_classification_id: 4,
                text: "Bug 123456".to_string(),
                who: "sheriff@example.org".to_string(),
                created: Utc.with_ymd_and_hms(2017, 9, 1, 12, 0, 0).unwrap(),
            }],
            suggestions: vec![create_test_suggestion(2, 0)],
            ..JobViewState::default()
        }
    }

    #[test]
    fn test_render_view_without_a_job() {
        let output = render_view(&JobViewState::default());

        assert!(output.contains("No job selected."));
    }

    #[test]
    fn test_render_view_shows_every_populated_section() {
        let output = render_view(&create_test_state());

        assert!(output.contains("mochitest-5"));
        assert!(output.contains("linux64-debug"));
        assert!(output.contains("testfailed"));
        assert!(output.contains("deadbeef0123"));
        assert!(output.contains("logviewer.html#?job_id=42&repo=autoland"));

        assert!(output.contains("Job Details"));
        assert!(output.contains("CPU usage"));

        assert!(output.contains("Logs"));
        assert!(output.contains("builds-4h"));
        assert!(output.contains("parsed"));

        assert!(output.contains("Performance"));
        assert!(output.contains("tp5o summary opt"));
        assert!(output.contains("512.5"));

        assert!(output.contains("Classification"));
        assert!(output.contains("Bug 123456"));
        assert!(output.contains("sheriff@example.org"));

        assert!(output.contains("Failure Suggestions"));
        assert!(output.contains("TEST-UNEXPECTED-FAIL | foo.html | timed out"));
        assert!(output.contains("Intermittent failure 0"));
    }

    #[test]
    fn test_render_view_notes_logs_still_being_parsed() {
        let mut state = create_test_state();
        state.logs_all_parsed = false;
        state.job_log_urls[0].parse_status = "pending".to_string();

        let output = render_view(&state);

        assert!(output.contains("Some logs are still being parsed."));
    }

    #[test]
    fn test_render_view_collapses_overcrowded_suggestions() {
        let mut state = create_test_state();
        state.suggestions = vec![create_test_suggestion(BUG_SUGGESTION_LIMIT + 1, 0)];

        let output = render_view(&state);

        assert!(output.contains("21 open bugs match (more than 20)"));
        assert!(!output.contains("Intermittent failure 0"));
    }

    #[test]
    fn test_render_view_shows_log_error_fallback() {
        let mut state = create_test_state();
        state.suggestions = Vec::new();
        state.errors = vec![ErrorLine {
            name: "run tests".to_string(),
            result: "testfailed".to_string(),
            log_viewer_url: "logviewer.html#?job_id=42&repo=autoland&lineNumber=42".to_string(),
        }];

        let output = render_view(&state);

        assert!(output.contains("Log Errors"));
        assert!(output.contains("run tests"));
        assert!(output.contains("lineNumber=42"));
    }

    #[test]
    fn test_render_view_without_logs() {
        let mut state = create_test_state();
        state.job_log_urls = Vec::new();

        let output = render_view(&state);

        assert!(output.contains("No logs recorded for this job."));
    }
}
