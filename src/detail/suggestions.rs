//! Bug suggestion annotation and the text-log error fallback.

use crate::links;
use crate::model::{AnnotatedSuggestion, BugSuggestion, ErrorLine, TextLogStep};

/// Suggestions matching more bugs than this are shown collapsed.
pub const BUG_SUGGESTION_LIMIT: usize = 20;

/// Computes the display flags for one suggestion.
///
/// The "too many" flags are derived from the raw list lengths first; the
/// "valid" flags depend on them. A crowded open-recent list also suppresses
/// the all-others section, which would otherwise drown the display.
pub fn annotate_suggestion(suggestion: BugSuggestion, limit: usize) -> AnnotatedSuggestion {
    let too_many_open_recent = suggestion.bugs.open_recent.len() > limit;
    let too_many_all_others = suggestion.bugs.all_others.len() > limit;
    let valid_open_recent = !suggestion.bugs.open_recent.is_empty() && !too_many_open_recent;
    let valid_all_others =
        !suggestion.bugs.all_others.is_empty() && !too_many_all_others && !too_many_open_recent;

    AnnotatedSuggestion {
        search: suggestion.search,
        bugs: suggestion.bugs,
        too_many_open_recent,
        too_many_all_others,
        valid_open_recent,
        valid_all_others,
    }
}

pub fn annotate_suggestions(suggestions: Vec<BugSuggestion>) -> Vec<AnnotatedSuggestion> {
    suggestions
        .into_iter()
        .map(|s| annotate_suggestion(s, BUG_SUGGESTION_LIMIT))
        .collect()
}

/// Derives one error line per unsuccessful text log step, each linking into
/// the log viewer at the line where the step finished.
pub fn error_lines(steps: Vec<TextLogStep>, job_id: u64, project: &str) -> Vec<ErrorLine> {
    steps
        .into_iter()
        .filter(|step| step.result != "success")
        .map(|step| ErrorLine {
            log_viewer_url: links::log_viewer_url(
                job_id,
                project,
                Some(step.finished_line_number),
            ),
            name: step.name,
            result: step.result,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bug, SuggestionBugs};

    fn create_bugs(count: usize) -> Vec<Bug> {
        (0..count as u64)
            .map(|id| Bug {
                id,
                summary: format!("Intermittent failure {id}"),
                resolution: String::new(),
            })
            .collect()
    }

    fn create_suggestion(open_recent: usize, all_others: usize) -> BugSuggestion {
        BugSuggestion {
            search: "TEST-UNEXPECTED-FAIL | foo.html | timed out".to_string(),
            bugs: SuggestionBugs {
                open_recent: create_bugs(open_recent),
                all_others: create_bugs(all_others),
            },
        }
    }

    fn create_step(name: &str, result: &str, finished_line_number: u64) -> TextLogStep {
        TextLogStep {
            name: name.to_string(),
            result: result.to_string(),
            finished_line_number,
        }
    }

    #[test]
    fn test_short_bug_lists_are_valid() {
        let annotated = annotate_suggestion(create_suggestion(2, 3), 5);

        assert!(!annotated.too_many_open_recent);
        assert!(!annotated.too_many_all_others);
        assert!(annotated.valid_open_recent);
        assert!(annotated.valid_all_others);
        assert_eq!(annotated.search, "TEST-UNEXPECTED-FAIL | foo.html | timed out");
        assert_eq!(annotated.bugs.open_recent.len(), 2);
    }

    #[test]
    fn test_empty_bug_lists_are_not_valid() {
        let annotated = annotate_suggestion(create_suggestion(0, 0), 5);

        assert!(!annotated.too_many_open_recent);
        assert!(!annotated.valid_open_recent);
        assert!(!annotated.valid_all_others);
    }

    #[test]
    fn test_crowded_open_recent_suppresses_all_others() {
        let annotated = annotate_suggestion(create_suggestion(6, 2), 5);

        assert!(annotated.too_many_open_recent);
        assert!(!annotated.valid_open_recent);
        assert!(!annotated.too_many_all_others);
        assert!(!annotated.valid_all_others);
    }

    #[test]
    fn test_annotate_suggestions_applies_the_display_limit() {
        let suggestions = vec![
            create_suggestion(BUG_SUGGESTION_LIMIT, 0),
            create_suggestion(BUG_SUGGESTION_LIMIT + 1, 0),
        ];

        let annotated = annotate_suggestions(suggestions);

        assert!(annotated[0].valid_open_recent);
        assert!(annotated[1].too_many_open_recent);
    }

    #[test]
    fn test_error_lines_skip_successful_steps() {
        let steps = vec![
            create_step("build", "success", 10),
            create_step("run tests", "testfailed", 42),
        ];

        let errors = error_lines(steps, 42, "autoland");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].name, "run tests");
        assert_eq!(errors[0].result, "testfailed");
        assert_eq!(
            errors[0].log_viewer_url,
            "logviewer.html#?job_id=42&repo=autoland&lineNumber=42"
        );
    }
}
