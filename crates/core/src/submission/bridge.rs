//! Form submission bridge - core business logic

use std::sync::Arc;

use fmbridge_domain::{
    ContainerUpload, DatasourceId, DriverResult, FieldValue, FormMapping, OperationResult, Result,
    ScriptParams, Submission,
};
use tracing::{debug, info, warn};

use super::feedback::{SubmissionFeedback, SubmissionStatus};
use super::format::{format_submission, is_fm_field, parse_repetition};
use crate::datasource::ports::CredentialStore;
use crate::fmdapi::ports::{FileMakerGateway, GatewayFactory};
use crate::session::ports::SessionTokenCache;

/// Sends posted forms to FileMaker
pub struct FormSubmissionBridge {
    credentials: Arc<dyn CredentialStore>,
    gateways: Arc<dyn GatewayFactory>,
    sessions: Arc<dyn SessionTokenCache>,
}

impl FormSubmissionBridge {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        gateways: Arc<dyn GatewayFactory>,
        sessions: Arc<dyn SessionTokenCache>,
    ) -> Self {
        Self { credentials, gateways, sessions }
    }

    /// Create a record for `submission` and upload its files.
    pub async fn submit(
        &self,
        mapping: &FormMapping,
        submission: &Submission,
    ) -> SubmissionFeedback {
        let Some(datasource_id) = mapping.datasource_id.as_ref().filter(|_| mapping.is_bound())
        else {
            debug!(layout = %mapping.layout, "Form has no datasource, skipping FileMaker");
            return SubmissionFeedback::skipped().with_suppressed_mail(mapping.suppress_mail);
        };
        if submission.skip_save {
            debug!(layout = %mapping.layout, "Intermediate form step, skipping FileMaker");
            return SubmissionFeedback::skipped().with_suppressed_mail(mapping.suppress_mail);
        }

        let feedback = match self.send(datasource_id, mapping, submission).await {
            Ok(_) if is_blank(submission) => SubmissionFeedback::empty_submission(),
            Ok(record_id) => {
                info!(datasource = %datasource_id, layout = %mapping.layout, "Submission sent");
                SubmissionFeedback::sent(record_id)
            }
            Err(err) => {
                warn!(
                    datasource = %datasource_id,
                    layout = %mapping.layout,
                    error = %err,
                    "Submission failed"
                );
                let feedback = SubmissionFeedback::from_error(&err);
                if feedback.status == SubmissionStatus::Invalid {
                    self.sessions.clear();
                }
                feedback
            }
        };

        feedback.with_suppressed_mail(mapping.suppress_mail)
    }

    async fn send(
        &self,
        datasource_id: &DatasourceId,
        mapping: &FormMapping,
        submission: &Submission,
    ) -> Result<Option<String>> {
        let datasource = self.credentials.get_datasource(datasource_id).await?;
        let gateway = self.gateways.open(datasource, &mapping.layout)?;

        let field_data = format_submission(mapping, submission);
        let script = mapping
            .script
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(ScriptParams::named);

        let created = gateway.create_record(&field_data, script.as_ref()).await?;
        let record_id = created.record_id.filter(|id| !id.is_empty());

        if let Some(id) = record_id.as_deref() {
            upload_files(gateway.as_ref(), id, mapping, submission).await?;
        }

        Ok(record_id)
    }
}

/// Upload every mapped file, stopping at the first failure.
async fn upload_files(
    gateway: &dyn FileMakerGateway,
    record_id: &str,
    mapping: &FormMapping,
    submission: &Submission,
) -> DriverResult<Vec<OperationResult>> {
    let layout = gateway.layout().to_string();
    if layout.is_empty() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for file in submission.uploads.iter().filter(|file| is_fm_field(&file.field_name)) {
        let (Some(path), Some(target)) = (file.first_path(), mapping.target_of(&file.field_name))
        else {
            continue;
        };

        let (field_name, repetition) = parse_repetition(target);
        let mut upload =
            ContainerUpload::new(record_id, field_name, path.clone()).with_repetition(repetition);
        if let Some(name) = &file.original_name {
            upload = upload.with_file_name(name.clone());
        }

        debug!(field = %upload.field_name, repetition, "Uploading container file");
        results.push(gateway.upload_container(&layout, &upload).await?);
    }

    Ok(results)
}

fn is_blank(submission: &Submission) -> bool {
    submission.uploads.is_empty()
        && submission.fields.iter().all(|field| match &field.value {
            FieldValue::Single(value) => value.is_empty(),
            FieldValue::Multiple(values) => values.iter().all(String::is_empty),
        })
}
