//! Wire shapes of the REST responses.
//!
//! Everything except the identifiers is optional: the server omits fields
//! freely (unassigned items, builds still running, deleted definitions) and
//! a missing field must never fail a whole call. Text fields are read with
//! `loose_text` so an unexpected JSON type is kept instead of rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read an optional text field from any JSON value.
///
/// Strings pass through, `null` becomes `None`, anything else keeps its JSON
/// text (`42` -> `"42"`).
fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Envelope used by every collection endpoint: `{"count": n, "value": [...]}`.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub state: Option<String>,
}

/// Request body of the WIQL endpoint.
#[derive(Debug, Serialize)]
pub struct WiqlQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WiqlResponse {
    #[serde(default)]
    pub work_items: Vec<WorkItemReference>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WorkItemReference {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkItemRecord {
    pub id: u64,
    #[serde(default)]
    pub fields: WorkItemFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkItemFields {
    #[serde(rename = "System.Title", default, deserialize_with = "loose_text")]
    pub title: Option<String>,
    #[serde(rename = "System.State", default, deserialize_with = "loose_text")]
    pub state: Option<String>,
    /// Usually an identity object, but older servers and some process
    /// templates store a plain `"Name <domain\\user>"` string.
    #[serde(rename = "System.AssignedTo", default)]
    pub assigned_to: Option<Value>,
    #[serde(rename = "System.ChangedDate", default, deserialize_with = "loose_text")]
    pub changed_date: Option<String>,
    #[serde(rename = "System.WorkItemType", default, deserialize_with = "loose_text")]
    pub work_item_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    pub id: u64,
    #[serde(default)]
    pub definition: Option<DefinitionReference>,
    #[serde(default, deserialize_with = "loose_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub result: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub source_branch: Option<String>,
    #[serde(default)]
    pub requested_for: Option<IdentityRef>,
    #[serde(default, deserialize_with = "loose_text")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub finish_time: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: Option<BuildLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionReference {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default, deserialize_with = "loose_text")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildLinks {
    #[serde(default)]
    pub web: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "loose_text")]
    pub href: Option<String>,
}

impl BuildRecord {
    pub fn pipeline_name(&self) -> Option<String> {
        self.definition.as_ref().and_then(|d| d.name.clone())
    }

    pub fn requested_by(&self) -> Option<String> {
        self.requested_for
            .as_ref()
            .and_then(|identity| identity.display_name.clone())
    }

    pub fn web_url(&self) -> Option<String> {
        self.links
            .as_ref()
            .and_then(|links| links.web.as_ref())
            .and_then(|web| web.href.clone())
    }
}

/// Resolve `System.AssignedTo` to something readable.
///
/// Identity objects collapse to their display name; any other value is
/// returned untouched.
pub fn assignee_name(value: Option<Value>) -> Option<Value> {
    match value? {
        Value::Object(mut identity) => identity
            .remove("displayName")
            .filter(|name| !name.is_null()),
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignee_identity_object() {
        let value = json!({"displayName": "Alice", "uniqueName": "CORP\\alice", "id": "42"});
        assert_eq!(assignee_name(Some(value)), Some(json!("Alice")));
    }

    #[test]
    fn test_assignee_raw_string_passes_through() {
        let value = json!("alice@example.com");
        assert_eq!(assignee_name(Some(value)), Some(json!("alice@example.com")));
    }

    #[test]
    fn test_assignee_absent() {
        assert_eq!(assignee_name(None), None);
        assert_eq!(assignee_name(Some(Value::Null)), None);
        assert_eq!(assignee_name(Some(json!({"uniqueName": "x"}))), None);
    }

    #[test]
    fn test_build_record_nested_fields() {
        let build: BuildRecord = serde_json::from_value(json!({
            "id": 7,
            "definition": {"id": 3, "name": "CI"},
            "requestedFor": {"displayName": "Bob"},
            "_links": {"web": {"href": "http://tfs/build/7"}}
        }))
        .unwrap();

        assert_eq!(build.pipeline_name().as_deref(), Some("CI"));
        assert_eq!(build.requested_by().as_deref(), Some("Bob"));
        assert_eq!(build.web_url().as_deref(), Some("http://tfs/build/7"));
    }

    #[test]
    fn test_build_record_missing_nested_fields() {
        let build: BuildRecord = serde_json::from_value(json!({
            "id": 8,
            "definition": null,
            "requestedFor": {},
            "_links": {"self": {"href": "http://tfs/api/8"}}
        }))
        .unwrap();

        assert_eq!(build.pipeline_name(), None);
        assert_eq!(build.requested_by(), None);
        assert_eq!(build.web_url(), None);
        assert_eq!(build.result, None);
    }

    #[test]
    fn test_unexpected_field_types_do_not_fail_decoding() {
        let item: WorkItemRecord = serde_json::from_value(json!({
            "id": 9,
            "fields": {
                "System.Title": 1234,
                "System.State": null,
                "System.ChangedDate": {"ticks": 1}
            }
        }))
        .unwrap();
        assert_eq!(item.fields.title.as_deref(), Some("1234"));
        assert_eq!(item.fields.state, None);
        assert_eq!(item.fields.changed_date.as_deref(), Some(r#"{"ticks":1}"#));

        let build: BuildRecord = serde_json::from_value(json!({
            "id": 3,
            "status": 2,
            "reason": true,
            "definition": {"name": 7}
        }))
        .unwrap();
        assert_eq!(build.status.as_deref(), Some("2"));
        assert_eq!(build.reason.as_deref(), Some("true"));
        assert_eq!(build.pipeline_name().as_deref(), Some("7"));
    }

    #[test]
    fn test_work_item_without_fields() {
        let item: WorkItemRecord = serde_json::from_value(json!({"id": 5})).unwrap();
        assert_eq!(item.id, 5);
        assert!(item.fields.title.is_none());
        assert!(item.fields.assigned_to.is_none());
    }

    #[test]
    fn test_list_response_without_value() {
        let list: ListResponse<ProjectRecord> = serde_json::from_value(json!({"count": 0})).unwrap();
        assert!(list.value.is_empty());
    }
}
