//! FileMaker Data API request and response types

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::DEFAULT_REPETITION;
use crate::errors::DriverError;

/// FileMaker field name → formatted value, sent as `fieldData`.
pub type FieldData = BTreeMap<String, String>;

/// Optional scripts run around a record request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptParams {
    pub script: Option<String>,
    pub script_param: Option<String>,
    pub prerequest: Option<String>,
    pub prerequest_param: Option<String>,
    pub presort: Option<String>,
    pub presort_param: Option<String>,
}

impl ScriptParams {
    /// Run `name` after the request.
    pub fn named(name: impl Into<String>) -> Self {
        Self { script: Some(name.into()), ..Self::default() }
    }

    /// Wire names and values, skipping unset or empty entries.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        [
            ("script", &self.script),
            ("script.param", &self.script_param),
            ("script.prerequest", &self.prerequest),
            ("script.prerequest.param", &self.prerequest_param),
            ("script.presort", &self.presort),
            ("script.presort.param", &self.presort_param),
        ]
        .into_iter()
        .filter_map(|(key, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((key, v.to_string())),
            _ => None,
        })
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.to_params().is_empty()
    }
}

/// File to send into a container field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerUpload {
    pub record_id: String,
    pub field_name: String,
    pub file_path: PathBuf,
    /// Name sent in the multipart part, defaults to the file name of
    /// `file_path`. Sanitized before sending.
    pub file_name: Option<String>,
    pub repetition: u32,
}

impl ContainerUpload {
    pub fn new(
        record_id: impl Into<String>,
        field_name: impl Into<String>,
        file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            record_id: record_id.into(),
            field_name: field_name.into(),
            file_path: file_path.into(),
            file_name: None,
            repetition: DEFAULT_REPETITION,
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_repetition(mut self, repetition: u32) -> Self {
        self.repetition = repetition;
        self
    }
}

/// Successful Data API call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OperationResult {
    pub http_status: u16,
    /// `messages[0].code`, `Some(0)` for a normal success.
    pub server_message_code: Option<i64>,
    /// `response.data`
    pub records: Option<Value>,
    /// `response.dataInfo`
    pub data_info: Option<Value>,
    /// `response.recordId`
    pub record_id: Option<String>,
    /// Raw `response` object, `Value::Null` when absent.
    pub response: Value,
}

impl OperationResult {
    /// Build from a parsed response envelope.
    pub fn from_envelope(http_status: u16, envelope: &Value) -> Self {
        let response = envelope.get("response").cloned().unwrap_or(Value::Null);
        let server_message_code = envelope
            .pointer("/messages/0/code")
            .and_then(code_to_i64);
        let record_id = response.get("recordId").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Self {
            http_status,
            server_message_code,
            records: response.get("data").cloned(),
            data_info: response.get("dataInfo").cloned(),
            record_id,
            response,
        }
    }

    /// Layouts listed by `GET layouts`.
    pub fn layouts(&self) -> Result<Vec<LayoutEntry>, DriverError> {
        match self.response.get("layouts") {
            Some(layouts) => serde_json::from_value(layouts.clone())
                .map_err(|e| DriverError::InvalidResponse(format!("layouts: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Field metadata and value lists from `GET layouts/{layout}`.
    pub fn layout_metadata(&self) -> Result<LayoutMetadata, DriverError> {
        serde_json::from_value(self.response.clone())
            .map_err(|e| DriverError::InvalidResponse(format!("layout metadata: {e}")))
    }
}

/// FileMaker reports codes as strings; some gateways send numbers.
pub fn code_to_i64(code: &Value) -> Option<i64> {
    match code {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

/// Entry of the layout list, possibly a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub name: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub folder_layout_names: Vec<LayoutEntry>,
}

/// Names of all non-folder layouts, depth first.
pub fn flatten_layout_names(entries: &[LayoutEntry]) -> Vec<String> {
    let mut names = Vec::new();
    for entry in entries {
        if entry.is_folder {
            names.extend(flatten_layout_names(&entry.folder_layout_names));
        } else {
            names.push(entry.name.clone());
        }
    }
    names
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutMetadata {
    #[serde(rename = "fieldMetaData")]
    pub field_meta: Vec<FieldMeta>,
    pub value_lists: Vec<ValueList>,
}

impl LayoutMetadata {
    pub fn value_list(&self, name: &str) -> Option<&ValueList> {
        self.value_lists.iter().find(|list| list.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.field_meta.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub display_type: String,
    pub result: String,
    pub global: bool,
    pub auto_enter: bool,
    pub max_repeat: u32,
    pub value_list: Option<String>,
}

impl FieldMeta {
    pub fn is_container(&self) -> bool {
        self.result == "container"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueList {
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: String,
    pub values: Vec<ValueListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueListItem {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

impl ValueListItem {
    pub fn label(&self) -> &str {
        self.display_value.as_deref().unwrap_or(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn script_params_skip_empty_values() {
        let params = ScriptParams {
            script: Some("AfterSubmit".into()),
            script_param: Some(String::new()),
            presort: Some("Sort".into()),
            ..ScriptParams::default()
        };

        assert_eq!(
            params.to_params(),
            vec![("script", "AfterSubmit".to_string()), ("script.presort", "Sort".to_string())]
        );
        assert!(ScriptParams::default().is_empty());
    }

    #[test]
    fn envelope_extracts_record_id_and_code() {
        let envelope = json!({
            "response": {"recordId": "42", "modId": "0"},
            "messages": [{"code": "0", "message": "OK"}]
        });

        let result = OperationResult::from_envelope(200, &envelope);

        assert_eq!(result.record_id.as_deref(), Some("42"));
        assert_eq!(result.server_message_code, Some(0));
        assert!(result.records.is_none());
    }

    #[test]
    fn layout_metadata_parses_value_lists() {
        let envelope = json!({
            "response": {
                "fieldMetaData": [{"name": "Name", "type": "normal", "result": "text"}],
                "valueLists": [{
                    "name": "Colors",
                    "type": "customList",
                    "values": [
                        {"value": "R", "displayValue": "Red"},
                        {"value": "Blue"}
                    ]
                }]
            },
            "messages": [{"code": "0", "message": "OK"}]
        });

        let meta = OperationResult::from_envelope(200, &envelope).layout_metadata().unwrap();
        let colors = meta.value_list("Colors").unwrap();

        assert_eq!(meta.field("Name").unwrap().result, "text");
        assert_eq!(colors.values[0].label(), "Red");
        assert_eq!(colors.values[1].label(), "Blue");
    }

    #[test]
    fn folder_layouts_are_flattened() {
        let envelope = json!({
            "response": {"layouts": [
                {"name": "Contacts"},
                {"name": "Web", "isFolder": true, "folderLayoutNames": [{"name": "WebForm"}]}
            ]}
        });

        let layouts = OperationResult::from_envelope(200, &envelope).layouts().unwrap();
        assert_eq!(flatten_layout_names(&layouts), vec!["Contacts", "WebForm"]);
    }
}
