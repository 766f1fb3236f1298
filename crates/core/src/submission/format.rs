//! Conversion of posted form values into FileMaker field data

use fmbridge_domain::constants::{
    DEFAULT_REPETITION, FM_FIELD_PREFIX, MULTI_VALUE_SEPARATOR, SPECIAL_MAIL_TAGS,
};
use fmbridge_domain::{FieldData, FieldKind, FieldValue, FormMapping, Submission};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());
static REPETITION_SUFFIX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^(.+)\((\d+)\)$").ok());

/// True for form fields the bridge forwards to FileMaker.
pub fn is_fm_field(name: &str) -> bool {
    name.starts_with(FM_FIELD_PREFIX)
}

/// Build `fieldData` for every mapped `fm_field-` field and mapped special
/// mail tag.
///
/// File fields are sent separately as container uploads. Special tag values
/// are forwarded unformatted and win over a form field with the same target.
pub fn format_submission(mapping: &FormMapping, submission: &Submission) -> FieldData {
    let fields = submission
        .fields
        .iter()
        .filter(|field| is_fm_field(&field.name))
        .filter_map(|field| {
            let target = mapping.target_of(&field.name)?;
            let value = format_value(field.kind, &field.value)?;
            Some((target.to_string(), value))
        });

    let special_tags = SPECIAL_MAIL_TAGS.iter().filter_map(|tag| {
        let target = mapping.target_of(tag)?;
        let value = submission.special_tags.get(*tag)?;
        Some((target.to_string(), value.clone()))
    });

    fields.chain(special_tags).collect()
}

/// Format one posted value, `None` for file fields.
pub fn format_value(kind: FieldKind, value: &FieldValue) -> Option<String> {
    match (kind, value) {
        (FieldKind::File, _) => None,
        (_, FieldValue::Multiple(values)) => Some(values.join(MULTI_VALUE_SEPARATOR)),
        (FieldKind::Choice, FieldValue::Single(value)) => Some(value.clone()),
        (FieldKind::Date, FieldValue::Single(value)) => {
            Some(format_date(value).unwrap_or_else(|| normalize_line_breaks(value)))
        }
        (FieldKind::Text, FieldValue::Single(value)) => Some(normalize_line_breaks(value)),
    }
}

/// `YYYY-MM-DD` → `MM/DD/YYYY`, `None` for any other shape.
pub fn format_date(value: &str) -> Option<String> {
    let pattern = ISO_DATE.as_ref()?;
    if !pattern.is_match(value) {
        return None;
    }

    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    Some(format!("{month}/{day}/{year}"))
}

/// FileMaker stores paragraph breaks as a lone carriage return.
pub fn normalize_line_breaks(value: &str) -> String {
    value.replace("\r\n", "\r").replace('\n', "\r")
}

/// Split a container target like `Photo(2)` into field and repetition.
pub fn parse_repetition(target: &str) -> (String, u32) {
    let parsed = REPETITION_SUFFIX.as_ref().and_then(|pattern| {
        let captures = pattern.captures(target)?;
        let repetition = captures.get(2)?.as_str().parse().ok()?;
        Some((captures.get(1)?.as_str().to_string(), repetition))
    });

    parsed.unwrap_or_else(|| (target.to_string(), DEFAULT_REPETITION))
}
