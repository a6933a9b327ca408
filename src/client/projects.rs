use super::core::AdoClient;
use super::types::{ListResponse, ProjectRecord};
use crate::error::Result;

impl AdoClient {
    /// Fetch every project of the collection (single page).
    pub async fn fetch_projects(&self) -> Result<Vec<ProjectRecord>> {
        let url = self.endpoint(&["_apis", "projects"], &[])?;
        let response: ListResponse<ProjectRecord> = self.get_json(url).await?;
        Ok(response.value)
    }
}
