use log::info;

use super::core::AdoProvider;
use crate::client::types::ProjectRecord;
use crate::error::Result;
use crate::insights::ProjectSummary;

impl AdoProvider {
    /// List all projects of the collection as `{id, name, state}`.
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>> {
        let projects: Vec<ProjectSummary> = self
            .client
            .fetch_projects()
            .await?
            .into_iter()
            .map(project_summary)
            .collect();

        info!("Listed {} projects", projects.len());
        Ok(projects)
    }
}

fn project_summary(record: ProjectRecord) -> ProjectSummary {
    ProjectSummary {
        id: record.id,
        name: record.name,
        state: record.state,
    }
}
