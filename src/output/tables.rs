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

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => Cell::new("-").fg(TableColor::DarkGrey),
    }
}

/// Build result coloured the way the web UI does it.
pub fn build_result_cell(result: Option<&str>, status: Option<&str>) -> Cell {
    match result {
        Some("succeeded") => Cell::new("succeeded").fg(TableColor::Green),
        Some("failed") => Cell::new("failed").fg(TableColor::Red),
        Some(other) => Cell::new(other).fg(TableColor::Yellow),
        None => Cell::new(status.unwrap_or("pending")).fg(TableColor::DarkGrey),
    }
}

pub fn color_coded_duration_cell(seconds: Option<i64>) -> Cell {
    let Some(seconds) = seconds else {
        return Cell::new("-").fg(TableColor::DarkGrey);
    };

    #[allow(clippy::cast_precision_loss)]
    let minutes = seconds as f64 / 60.0;
    let text = format!("{minutes:.1}min");
    if minutes <= 10.0 {
        Cell::new(text).fg(TableColor::Green)
    } else if minutes <= 15.0 {
        Cell::new(text).fg(TableColor::Yellow)
    } else {
        Cell::new(text).fg(TableColor::Red)
    }
}
