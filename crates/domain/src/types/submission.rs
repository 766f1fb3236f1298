//! Form submission input and per-form settings

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::datasource::DatasourceId;

/// How a submitted value is formatted for FileMaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    /// radio, checkbox and select tags
    Choice,
    Date,
    File,
}

impl FieldKind {
    /// Kind for a form tag base type (`text`, `checkbox`, `date`, ...).
    pub fn from_basetype(basetype: &str) -> Self {
        match basetype.trim_end_matches('*') {
            "radio" | "checkbox" | "select" => Self::Choice,
            "date" => Self::Date,
            "file" => Self::File,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// One posted form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedField {
    pub name: String,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl SubmittedField {
    pub fn new(name: impl Into<String>, kind: FieldKind, value: impl Into<FieldValue>) -> Self {
        Self { name: name.into(), kind, value: value.into() }
    }
}

/// Files attached to one form field, as stored by the form plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field_name: String,
    pub paths: Vec<PathBuf>,
    /// Client-side file name, when the browser supplied one.
    pub original_name: Option<String>,
}

impl UploadedFile {
    pub fn new(field_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { field_name: field_name.into(), paths: vec![path.into()], original_name: None }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Only the first file of a field is sent.
    pub fn first_path(&self) -> Option<&PathBuf> {
        self.paths.first()
    }
}

/// A posted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub fields: Vec<SubmittedField>,
    pub uploads: Vec<UploadedFile>,
    /// Resolved special mail tag values keyed by tag name (`_date`, ...).
    pub special_tags: BTreeMap<String, String>,
    /// Set on intermediate steps of a multi-step form, which are never saved.
    pub skip_save: bool,
}

impl Submission {
    pub fn with_field(mut self, field: SubmittedField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_upload(mut self, upload: UploadedFile) -> Self {
        self.uploads.push(upload);
        self
    }

    pub fn with_special_tag(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.special_tags.insert(tag.into(), value.into());
        self
    }

    pub fn with_skip_save(mut self) -> Self {
        self.skip_save = true;
        self
    }
}

/// FileMaker target of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormMapping {
    /// `None` when the form is not bound to a datasource.
    pub datasource_id: Option<DatasourceId>,
    pub layout: String,
    pub script: Option<String>,
    /// Form field name → FileMaker field name, possibly with a `(N)`
    /// repetition suffix for container fields.
    pub fields: BTreeMap<String, String>,
    /// Form-level `skip_mail` / `demo_mode` setting.
    pub suppress_mail: bool,
}

impl FormMapping {
    pub fn new(datasource_id: impl Into<DatasourceId>, layout: impl Into<String>) -> Self {
        Self {
            datasource_id: Some(datasource_id.into()),
            layout: layout.into(),
            ..Self::default()
        }
    }

    pub fn map_field(mut self, form_field: impl Into<String>, fm_field: impl Into<String>) -> Self {
        self.fields.insert(form_field.into(), fm_field.into());
        self
    }

    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    pub fn with_suppressed_mail(mut self) -> Self {
        self.suppress_mail = true;
        self
    }

    /// Mapped FileMaker field, `None` when unmapped or blank.
    pub fn target_of(&self, form_field: &str) -> Option<&str> {
        self.fields
            .get(form_field)
            .map(String::as_str)
            .filter(|target| !target.trim().is_empty())
    }

    pub fn is_bound(&self) -> bool {
        matches!(&self.datasource_id, Some(id) if !id.as_str().is_empty() && id.as_str() != "-1")
    }
}
