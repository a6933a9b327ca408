mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_json;
pub use progress::FetchProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{render_pipelines, render_projects, render_work_items};

/// Prints the adolens banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔍 adolens"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Azure DevOps Server insights")
    );
}
