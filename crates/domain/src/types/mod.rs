//! Domain types

pub mod datasource;
pub mod fmdapi;
pub mod secret;
pub mod submission;

pub use datasource::{session_key, DatasourceConfig, DatasourceId, Driver, Session};
pub use fmdapi::{
    code_to_i64, flatten_layout_names, ContainerUpload, FieldData, FieldMeta, LayoutEntry,
    LayoutMetadata, OperationResult, ScriptParams, ValueList, ValueListItem,
};
pub use secret::SecretString;
pub use submission::{
    FieldKind, FieldValue, FormMapping, Submission, SubmittedField, UploadedFile,
};
