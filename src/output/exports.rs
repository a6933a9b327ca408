use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Writes any tool result as a single JSON document followed by a newline.
pub fn export_json<T>(value: &T, pretty: bool, output: &mut dyn Write) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::ProjectSummary;

    #[test]
    fn test_export_json_compact() {
        let projects = vec![ProjectSummary {
            id: "p-1".to_string(),
            name: Some("Fabrikam".to_string()),
            state: None,
        }];
        let mut buffer = Vec::new();
        export_json(&projects, false, &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "[{\"id\":\"p-1\",\"name\":\"Fabrikam\",\"state\":null}]\n"
        );
    }

    #[test]
    fn test_export_json_pretty() {
        let mut buffer = Vec::new();
        export_json(&serde_json::json!({"total": 0}), true, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\n  \"total\": 0\n}\n");
    }
}
