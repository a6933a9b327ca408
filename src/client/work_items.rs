use super::core::AdoClient;
use super::types::{ListResponse, WiqlQuery, WiqlResponse, WorkItemRecord};
use crate::error::Result;

const WORK_ITEM_COLUMNS: &[&str] = &[
    "System.Id",
    "System.Title",
    "System.State",
    "System.AssignedTo",
    "System.ChangedDate",
    "System.WorkItemType",
];

/// WIQL selecting every work item of `project`, newest change first.
///
/// No `TOP` clause and no type filter: the caller truncates the id list.
pub fn recent_changes_query(project: &str) -> String {
    let columns = WORK_ITEM_COLUMNS
        .iter()
        .map(|column| format!("[{column}]"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "SELECT {columns} FROM WorkItems \
         WHERE [System.TeamProject] = '{}' \
         ORDER BY [System.ChangedDate] DESC",
        project.replace('\'', "''")
    )
}

impl AdoClient {
    /// Run the recent-changes WIQL query and return matched ids in server order.
    pub async fn query_work_item_ids(&self, project: &str) -> Result<Vec<u64>> {
        let url = self.endpoint(&[project, "_apis", "wit", "wiql"], &[])?;
        let body = WiqlQuery {
            query: recent_changes_query(project),
        };

        let response: WiqlResponse = self.post_json(url, &body).await?;
        Ok(response.work_items.into_iter().map(|wi| wi.id).collect())
    }

    /// Fetch full field sets for `ids` in one request.
    ///
    /// The server does not promise to answer in the order asked.
    pub async fn fetch_work_items(&self, ids: &[u64]) -> Result<Vec<WorkItemRecord>> {
        let ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = self.endpoint(&["_apis", "wit", "workitems"], &[("ids", ids.as_str())])?;

        let response: ListResponse<WorkItemRecord> = self.get_json(url).await?;
        Ok(response.value)
    }
}
