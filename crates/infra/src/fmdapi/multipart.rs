//! Container upload bodies

use std::path::Path;

use fmbridge_domain::constants::UPLOAD_PART_NAME;
use fmbridge_domain::{ContainerUpload, DriverError, DriverResult};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::multipart::{Form, Part};

const FALLBACK_FILE_NAME: &str = "unnamed-file";

static SPECIAL_CHARS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"[?\[\]/\\=<>:;,'"&$#*()|~`!{}%+^\x00-\x1f\x7f]"#).ok());
static SEPARATORS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[\s-]+").ok());

/// File contents and the name sent with them.
#[derive(Debug, Clone)]
pub(crate) struct UploadBody {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadBody {
    /// Read the source file of `upload`. No request is sent if this fails.
    pub async fn read(upload: &ContainerUpload) -> DriverResult<Self> {
        let bytes = tokio::fs::read(&upload.file_path).await.map_err(|source| {
            DriverError::FileRead { path: upload.file_path.clone(), source }
        })?;

        let raw_name = upload
            .file_name
            .clone()
            .or_else(|| file_name_of(&upload.file_path))
            .unwrap_or_default();

        Ok(Self { file_name: sanitize_file_name(&raw_name), bytes })
    }

    /// Single-part form named `upload`. Built fresh for every attempt.
    pub fn form(&self) -> Form {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        Form::new().part(UPLOAD_PART_NAME, part)
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Strip characters that are unsafe in a multipart filename.
///
/// Only the last path component is kept and whitespace runs become `-`.
/// Leading and trailing dots, dashes and underscores are trimmed.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();

    let stripped = match SPECIAL_CHARS.as_ref() {
        Some(re) => re.replace_all(base, "").into_owned(),
        None => {
            base.chars().filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_')).collect()
        }
    };
    let joined = match SEPARATORS.as_ref() {
        Some(re) => re.replace_all(&stripped, "-").into_owned(),
        None => stripped,
    };

    let trimmed = joined.trim_matches(|c| matches!(c, '.' | '-' | '_'));
    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn sanitizes_client_supplied_names() {
        assert_eq!(sanitize_file_name("Cat Photo.png"), "Cat-Photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\ada\\cv (final).pdf"), "cv-final.pdf");
        assert_eq!(sanitize_file_name("report\r\n\".pdf"), "report.pdf");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
    }

    #[test]
    fn empty_names_fall_back() {
        assert_eq!(sanitize_file_name(""), FALLBACK_FILE_NAME);
        assert_eq!(sanitize_file_name("***"), FALLBACK_FILE_NAME);
    }

    #[tokio::test]
    async fn reads_file_and_prefers_client_name() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();

        let upload = ContainerUpload::new("1", "Resume", file.path()).with_file_name("My CV.pdf");
        let body = UploadBody::read(&upload).await.unwrap();

        assert_eq!(body.file_name, "My-CV.pdf");
        assert_eq!(body.bytes, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn missing_file_is_a_file_read_error() {
        let upload = ContainerUpload::new("1", "Resume", "/nonexistent/fmbridge/cv.pdf");

        let err = UploadBody::read(&upload).await.unwrap_err();

        assert!(matches!(err, DriverError::FileRead { .. }));
        assert_eq!(err.messages().len(), 1);
    }
}
