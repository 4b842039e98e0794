//! Custom rules referenced from `#[validate(custom = "...")]` attributes.

use validator::ValidationError;

pub const USERNAME_MAX_LENGTH: usize = 32;

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() || username.len() > USERNAME_MAX_LENGTH {
        let mut error = ValidationError::new("length");
        error.message = Some("username must be 1 to 32 characters".into());
        return Err(error);
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut error = ValidationError::new("alphanumeric");
        error.message = Some("username may only contain letters and digits".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.trim().is_empty()) {
        let mut error = ValidationError::new("blank_tag");
        error.message = Some("tags must not be blank".into());
        return Err(error);
    }
    if normalize_tags(tags).is_empty() {
        return Err(ValidationError::new("no_tags"));
    }
    Ok(())
}

/// Trims tag names and drops duplicates, keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !names.iter().any(|name| name == tag) {
            names.push(tag.to_string());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_must_be_alphanumeric() {
        assert!(validate_username("foo42").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("foo bar").is_err());
        assert!(validate_username("foo_bar").is_err());
        assert!(validate_username("ユーザー").is_err());
    }

    #[test]
    fn username_length_is_bounded() {
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LENGTH)).is_ok());
        let err = validate_username(&"a".repeat(USERNAME_MAX_LENGTH + 1)).unwrap_err();
        assert_eq!(err.code, "length");
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_not_blank("body").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \n\t").is_err());
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![" rust ".to_string(), "go".to_string(), "rust".to_string()];
        assert_eq!(normalize_tags(&tags), vec!["rust", "go"]);
        assert!(validate_tags(&tags).is_ok());
    }

    #[test]
    fn blank_tags_are_rejected() {
        assert!(validate_tags(&["rust".to_string(), "  ".to_string()]).is_err());
        assert!(validate_tags(&[]).is_err());
    }
}
