use validator::ValidationError;

/// Lowercase letters, digits and single hyphens, e.g. `about-us`.
pub(crate) fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug")
            .with_message("must contain only lowercase letters, digits and single hyphens".into()))
    }
}

/// Letters, digits, `_`, `.` and `-`, e.g. `site.title`.
pub(crate) fn validate_setting_key(key: &str) -> Result<(), ValidationError> {
    if key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        Ok(())
    } else {
        Err(ValidationError::new("setting_key")
            .with_message("may contain only letters, digits, '_', '.' and '-'".into()))
    }
}

pub(crate) fn validate_json_object(value: &serde_json::Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(ValidationError::new("json_object").with_message("must be a JSON object".into()))
    }
}
