use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItemSummary {
    pub id: u64,
    pub title: Option<String>,
    pub state: Option<String>,
    /// Display name, or the raw upstream value when it is not an identity.
    pub assigned_to: Option<Value>,
    pub changed_date: Option<String>,
    pub work_item_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRunSummary {
    pub id: u64,
    pub pipeline_name: Option<String>,
    pub status: Option<String>,
    pub result: Option<String>,
    pub reason: Option<String>,
    pub source_branch: Option<String>,
    pub requested_by: Option<String>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineAggregate {
    pub project: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Percentage rounded to two decimals, 0 when there are no builds.
    pub success_rate: f64,
    pub pipelines: Vec<PipelineRunSummary>,
}
