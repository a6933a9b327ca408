use log::{debug, info, warn};
use std::collections::HashMap;

use super::core::AdoProvider;
use crate::client::types::{assignee_name, WorkItemRecord};
use crate::error::Result;
use crate::insights::WorkItemSummary;

impl AdoProvider {
    /// Most recently changed work items of `project`, newest first.
    ///
    /// Two sequential requests: a WIQL query for the ordered id list, then a
    /// single batch fetch for the first `limit` ids. When the query matches
    /// nothing the batch request is skipped.
    ///
    /// # Errors
    ///
    /// Any HTTP failure in either phase aborts the call.
    pub async fn get_recent_work_items(
        &self,
        project: &str,
        limit: usize,
    ) -> Result<Vec<WorkItemSummary>> {
        info!("Fetching up to {limit} recent work items for project: {project}");

        let mut ids = self.client.query_work_item_ids(project).await?;
        debug!("WIQL matched {} work items", ids.len());
        ids.truncate(limit);

        if ids.is_empty() {
            warn!("No work items found for project: {project}");
            return Ok(Vec::new());
        }

        let records = self.client.fetch_work_items(&ids).await?;
        let items = order_by_query(&ids, records)
            .into_iter()
            .map(work_item_summary)
            .collect::<Vec<_>>();

        info!("Fetched {} work items", items.len());
        Ok(items)
    }
}

/// Put batch results back into the query's recency order.
///
/// Records for ids that were not asked for go last, in arrival order.
fn order_by_query(ids: &[u64], mut records: Vec<WorkItemRecord>) -> Vec<WorkItemRecord> {
    let rank: HashMap<u64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    records.sort_by_key(|record| rank.get(&record.id).copied().unwrap_or(usize::MAX));
    records
}

fn work_item_summary(record: WorkItemRecord) -> WorkItemSummary {
    let fields = record.fields;
    WorkItemSummary {
        id: record.id,
        title: fields.title,
        state: fields.state,
        assigned_to: assignee_name(fields.assigned_to),
        changed_date: fields.changed_date,
        work_item_type: fields.work_item_type,
    }
}
