use console::style;

/// Terminal styling helpers
pub fn bright(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn bright_red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn cyan(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}

pub fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Styles a job result string in its conventional color: green for success,
/// red for any failure, yellow for retries and cancellations.
pub fn styled_result(result: &str) -> console::StyledObject<String> {
    match result {
        "success" => bright_green(result),
        "testfailed" | "busted" | "exception" => bright_red(result),
        "retry" | "usercancel" => bright_yellow(result),
        other => bright(other),
    }
}
