//! Application constants
//!
//! Centralized location for the Data API and form-bridge constants used
//! throughout the workspace.

// Error code namespace
pub const NAME_PREFIX: &str = "fmbridge";

// FileMaker Data API
pub const DEFAULT_API_VERSION: &str = "vLatest";
pub const DEFAULT_PROTOCOL: &str = "https";
pub const LOCAL_DEV_HOST: &str = "localhost";
pub const LOCAL_DEV_PORT: u16 = 3000;
pub const CLOUD_HOST_SUFFIX: &str = ".account.filemaker-cloud.com";

/// FileMaker error code for an invalid or expired Data API token.
pub const FMS_INVALID_TOKEN_CODE: i64 = 952;

// Container upload
pub const UPLOAD_PART_NAME: &str = "upload";
pub const DEFAULT_REPETITION: u32 = 1;

// Form bridge
pub const FM_FIELD_PREFIX: &str = "fm_field-";
pub const FM_VALUE_LIST_PREFIX: &str = "fm_value_list-";
pub const MULTI_VALUE_SEPARATOR: &str = "\r";

/// Contact Form 7 special mail tags a form may map to FileMaker fields.
pub const SPECIAL_MAIL_TAGS: [&str; 17] = [
    "_remote_ip",
    "_user_agent",
    "_url",
    "_date",
    "_time",
    "_invalid_fields",
    "_serial_number",
    "_post_id",
    "_post_name",
    "_post_title",
    "_post_url",
    "_post_author",
    "_post_author_email",
    "_site_title",
    "_site_description",
    "_site_url",
    "_site_admin_email",
];

// HTTP
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Encryption
pub const ENCRYPTION_KEY_BYTES: usize = 32;
pub const ENCRYPTION_IV_BYTES: usize = 12;
