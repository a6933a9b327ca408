use log::{info, warn};

use super::core::AdoProvider;
use crate::client::types::BuildRecord;
use crate::error::Result;
use crate::insights::{PipelineAggregate, PipelineRunSummary};

/// How a build counts toward the success rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuildOutcome {
    Succeeded,
    Failed,
    /// Canceled, partially succeeded, or not finished yet.
    Other,
}

impl BuildOutcome {
    fn classify(result: Option<&str>) -> Self {
        match result {
            Some("succeeded") => Self::Succeeded,
            Some("failed") => Self::Failed,
            _ => Self::Other,
        }
    }
}

impl AdoProvider {
    /// Most recent builds of `project` with success/failure tallies.
    ///
    /// # Arguments
    /// * `project` - Project name
    /// * `limit` - Passed to the server as `$top`
    ///
    /// # Errors
    /// Returns an error if the builds request fails.
    pub async fn get_recent_pipelines(
        &self,
        project: &str,
        limit: usize,
    ) -> Result<PipelineAggregate> {
        info!("Fetching up to {limit} builds for project: {project}");

        let builds = self.client.fetch_builds(project, limit).await?;

        if builds.is_empty() {
            warn!("No builds found for project: {project}");
        }

        let aggregate = calculate_summary(project, builds);
        info!(
            "Analyzed {} builds: {} succeeded, {} failed ({}%)",
            aggregate.total, aggregate.succeeded, aggregate.failed, aggregate.success_rate
        );

        Ok(aggregate)
    }
}

/// Tally outcomes and project each build, keeping server order.
fn calculate_summary(project: &str, builds: Vec<BuildRecord>) -> PipelineAggregate {
    let total = builds.len();
    let mut succeeded = 0;
    let mut failed = 0;

    let pipelines: Vec<PipelineRunSummary> = builds
        .into_iter()
        .map(|build| {
            match BuildOutcome::classify(build.result.as_deref()) {
                BuildOutcome::Succeeded => succeeded += 1,
                BuildOutcome::Failed => failed += 1,
                BuildOutcome::Other => {}
            }
            run_summary(build)
        })
        .collect();

    PipelineAggregate {
        project: project.to_string(),
        total,
        succeeded,
        failed,
        success_rate: success_rate(succeeded, total),
        pipelines,
    }
}

#[allow(clippy::cast_precision_loss)]
fn success_rate(succeeded: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = succeeded as f64 / total as f64 * 100.0;
    (rate * 100.0).round_ties_even() / 100.0
}

fn run_summary(build: BuildRecord) -> PipelineRunSummary {
    PipelineRunSummary {
        id: build.id,
        pipeline_name: build.pipeline_name(),
        requested_by: build.requested_by(),
        web_url: build.web_url(),
        status: build.status,
        result: build.result,
        reason: build.reason,
        source_branch: build.source_branch,
        start_time: build.start_time,
        finish_time: build.finish_time,
    }
}
