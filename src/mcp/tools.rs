use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::AdoError;
use crate::provider::AdoProvider;

pub(crate) const LIST_PROJECTS: &str = "list_projects";
pub(crate) const GET_RECENT_WORK_ITEMS: &str = "get_recent_work_items";
pub(crate) const GET_RECENT_PIPELINES: &str = "get_recent_pipelines";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Error)]
pub(crate) enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error(transparent)]
    Failed(#[from] AdoError),
}

#[derive(Debug, Deserialize)]
struct ProjectArgs {
    project: String,
    #[serde(default)]
    limit: Option<usize>,
}

fn project_schema(default_limit: usize) -> Value {
    json!({
        "type": "object",
        "properties": {
            "project": {
                "type": "string",
                "description": "Project name"
            },
            "limit": {
                "type": "integer",
                "minimum": 0,
                "default": default_limit,
                "description": "Maximum number of records to return"
            }
        },
        "required": ["project"]
    })
}

pub(crate) fn tool_descriptors(default_limit: usize) -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: LIST_PROJECTS.into(),
            description: "List all projects of the Azure DevOps Server collection.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
        ToolDescriptor {
            name: GET_RECENT_WORK_ITEMS.into(),
            description: "Most recently changed work items of a project, of any type, \
                          newest first, summarized for analysis."
                .into(),
            input_schema: project_schema(default_limit),
        },
        ToolDescriptor {
            name: GET_RECENT_PIPELINES.into(),
            description: "Most recent build (pipeline) runs of a project with success and \
                          failure counts and the success rate, for failure analysis."
                .into(),
            input_schema: project_schema(default_limit),
        },
    ]
}

fn parse_project_args(tool: &str, arguments: Value) -> Result<ProjectArgs, ToolCallError> {
    let invalid = |reason: String| ToolCallError::InvalidArguments {
        tool: tool.to_string(),
        reason,
    };

    let args: ProjectArgs =
        serde_json::from_value(arguments).map_err(|e| invalid(e.to_string()))?;
    if args.project.trim().is_empty() {
        return Err(invalid("project must not be empty".to_string()));
    }
    Ok(args)
}

/// Run one tool and return its JSON result.
pub(crate) async fn call_tool(
    provider: &AdoProvider,
    name: &str,
    arguments: Value,
    default_limit: usize,
) -> Result<Value, ToolCallError> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };

    let value = match name {
        LIST_PROJECTS => serde_json::to_value(provider.list_projects().await?),
        GET_RECENT_WORK_ITEMS => {
            let args = parse_project_args(name, arguments)?;
            let limit = args.limit.unwrap_or(default_limit);
            serde_json::to_value(provider.get_recent_work_items(&args.project, limit).await?)
        }
        GET_RECENT_PIPELINES => {
            let args = parse_project_args(name, arguments)?;
            let limit = args.limit.unwrap_or(default_limit);
            serde_json::to_value(provider.get_recent_pipelines(&args.project, limit).await?)
        }
        other => return Err(ToolCallError::UnknownTool(other.to_string())),
    };

    value.map_err(|e| ToolCallError::Failed(e.into()))
}
