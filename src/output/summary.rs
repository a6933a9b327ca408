use chrono::{DateTime, FixedOffset};
use comfy_table::Cell;
use serde_json::Value;
use std::fmt::Write;

use crate::insights::{PipelineAggregate, ProjectSummary, WorkItemSummary};

use super::styling::{bright, bright_green, bright_red, bright_yellow, cyan, dim, success_rate};
use super::tables::{
    build_result_cell, color_coded_duration_cell, create_table, cyan_header, optional_cell,
};

// Helper functions

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<FixedOffset>> {
    value.and_then(|v| DateTime::parse_from_rfc3339(v).ok())
}

/// `2024-05-01T10:00:00.123Z` -> `2024-05-01 10:00`; unparsable values are shown as-is.
fn short_timestamp(value: Option<&str>) -> Option<String> {
    match parse_timestamp(value) {
        Some(ts) => Some(ts.format("%Y-%m-%d %H:%M").to_string()),
        None => value.map(ToString::to_string),
    }
}

fn build_duration_seconds(start: Option<&str>, finish: Option<&str>) -> Option<i64> {
    let start = parse_timestamp(start)?;
    let finish = parse_timestamp(finish)?;
    Some((finish - start).num_seconds())
}

fn assignee_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

fn short_branch(branch: Option<&str>) -> Option<&str> {
    branch.map(|b| b.trim_start_matches("refs/heads/"))
}

pub fn render_projects(projects: &[ProjectSummary]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📁", "Projects");

    if projects.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No projects found."));
        return output;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["Name", "State", "Id"]));
    for project in projects {
        table.add_row(vec![
            optional_cell(project.name.as_deref()),
            optional_cell(project.state.as_deref()),
            Cell::new(&project.id),
        ]);
    }

    let _ = writeln!(output, "{table}");
    let _ = writeln!(output, "  {} {}", dim("Total:"), bright_yellow(projects.len()));
    output
}

pub fn render_work_items(project: &str, items: &[WorkItemSummary]) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📝", "Recent Work Items");
    let _ = writeln!(output, "  {} {}\n", dim("Project:"), cyan(project));

    if items.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No work items found."));
        return output;
    }

    let mut table = create_table();
    table.set_header(cyan_header(&["Id", "Type", "Title", "State", "Assigned To", "Changed"]));
    for item in items {
        table.add_row(vec![
            Cell::new(item.id),
            optional_cell(item.work_item_type.as_deref()),
            optional_cell(item.title.as_deref()),
            optional_cell(item.state.as_deref()),
            optional_cell(assignee_text(item.assigned_to.as_ref()).as_deref()),
            optional_cell(short_timestamp(item.changed_date.as_deref()).as_deref()),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}

pub fn render_pipelines(aggregate: &PipelineAggregate) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");

    let _ = write!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n\n",
        dim("Project:"),
        cyan(&aggregate.project),
        dim("Builds analyzed:"),
        bright_yellow(aggregate.total),
        dim("Succeeded:"),
        bright_green(aggregate.succeeded),
        dim("Failed:"),
        bright_red(aggregate.failed),
        dim("Success rate:"),
        success_rate(aggregate.success_rate),
    );

    if aggregate.pipelines.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No build data found."));
        return output;
    }

    add_section_header(&mut output, "🚀", "Recent Builds");

    let mut table = create_table();
    table.set_header(cyan_header(&[
        "Id",
        "Pipeline",
        "Result",
        "Branch",
        "Reason",
        "Requested By",
        "Duration",
        "Started",
    ]));

    for run in &aggregate.pipelines {
        table.add_row(vec![
            Cell::new(run.id),
            optional_cell(run.pipeline_name.as_deref()),
            build_result_cell(run.result.as_deref(), run.status.as_deref()),
            optional_cell(short_branch(run.source_branch.as_deref())),
            optional_cell(run.reason.as_deref()),
            optional_cell(run.requested_by.as_deref()),
            color_coded_duration_cell(build_duration_seconds(
                run.start_time.as_deref(),
                run.finish_time.as_deref(),
            )),
            optional_cell(short_timestamp(run.start_time.as_deref()).as_deref()),
        ]);
    }

    let _ = writeln!(output, "{table}");
    output
}
