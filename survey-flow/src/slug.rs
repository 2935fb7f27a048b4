//! Public survey links.
//!
//! A survey link ends in a slug such as `patient-feedback-MTI=`: a
//! readable title part followed by the survey id, base64-encoded, after
//! the last dash.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

/// Recover the survey id from a link slug.
///
/// Returns `None` when the last segment is not valid base64 or does not
/// decode to UTF-8 text.
pub fn decode_survey_slug(slug: &str) -> Option<String> {
    let encoded = slug.trim().rsplit('-').next()?;
    if encoded.is_empty() {
        return None;
    }
    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded))
        .ok()?;
    let id = String::from_utf8(bytes).ok()?;
    (!id.is_empty()).then_some(id)
}

/// Build a link slug from a survey title and id.
pub fn survey_slug(title: &str, survey_id: &str) -> String {
    let mut slug = String::new();
    for word in title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(&word.to_lowercase());
    }
    let encoded = STANDARD.encode(survey_id);
    if slug.is_empty() {
        encoded
    } else {
        format!("{slug}-{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_last_segment() {
        assert_eq!(decode_survey_slug("patient-feedback-MTI=").as_deref(), Some("12"));
        assert_eq!(decode_survey_slug("MTI=").as_deref(), Some("12"));
        assert_eq!(decode_survey_slug("ward-survey-MTI").as_deref(), Some("12"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(decode_survey_slug(""), None);
        assert_eq!(decode_survey_slug("survey-"), None);
        assert_eq!(decode_survey_slug("survey-%%%"), None);
        assert_eq!(decode_survey_slug("survey-/w=="), None);
    }

    #[test]
    fn builds_readable_slugs() {
        assert_eq!(survey_slug("Patient Feedback (Ward 3)", "12"), "patient-feedback-ward-3-MTI=");
        assert_eq!(survey_slug("", "7"), "Nw==");
        let slug = survey_slug("Émergency care", "42");
        assert_eq!(decode_survey_slug(&slug).as_deref(), Some("42"));
    }
}
