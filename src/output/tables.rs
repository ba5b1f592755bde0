use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn result_cell(result: &str) -> Cell {
    match result {
        "success" => Cell::new(result).fg(TableColor::Green),
        "testfailed" | "busted" | "exception" => Cell::new(result).fg(TableColor::Red),
        "retry" | "usercancel" => Cell::new(result).fg(TableColor::Yellow),
        other => Cell::new(other),
    }
}

pub fn parse_status_cell(parse_status: &str) -> Cell {
    match parse_status {
        "parsed" => Cell::new(parse_status).fg(TableColor::Green),
        "pending" => Cell::new(parse_status).fg(TableColor::Yellow),
        "failed" | "skipped-size" => Cell::new(parse_status).fg(TableColor::Red),
        other => Cell::new(other),
    }
}
