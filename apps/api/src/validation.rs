use crate::errors::AppError;

/// Trims `value`, rejecting it with 400 when nothing is left.
pub fn non_blank(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims and lowercases an email address and applies a minimal shape check.
pub fn normalize_email(value: &str) -> Result<String, AppError> {
    let email = non_blank("email", value)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(AppError::Validation("email is invalid".to_string())),
    }
}

/// Optional text: blank collapses to `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank_trims() {
        assert_eq!(non_blank("title", "  Intern ").unwrap(), "Intern");
        assert!(matches!(non_blank("title", "   "), Err(AppError::Validation(m)) if m == "title is required"));
    }

    #[test]
    fn test_email_normalized() {
        assert_eq!(normalize_email(" Ada@Example.COM ").unwrap(), "ada@example.com");
        assert!(normalize_email("nope").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" 10k ".into())), Some("10k".into()));
        assert_eq!(optional_text(None), None);
    }
}
