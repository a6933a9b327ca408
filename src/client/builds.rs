use super::core::AdoClient;
use super::types::{BuildRecord, ListResponse};
use crate::error::Result;

impl AdoClient {
    /// Fetch the `top` most recent builds of `project`.
    ///
    /// The limit is applied server-side via `$top`.
    pub async fn fetch_builds(&self, project: &str, top: usize) -> Result<Vec<BuildRecord>> {
        let top = top.to_string();
        let url = self.endpoint(
            &[project, "_apis", "build", "builds"],
            &[("$top", top.as_str())],
        )?;

        let response: ListResponse<BuildRecord> = self.get_json(url).await?;
        Ok(response.value)
    }
}
