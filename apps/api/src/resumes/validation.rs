use serde::Deserialize;

use crate::errors::AppError;
use crate::jobs::validation::non_blank;
use crate::models::resume::ResumeDraft;

#[derive(Debug, Deserialize)]
pub struct ResumeForm {
    #[serde(default)]
    pub title: String,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    #[serde(default)]
    pub contact: String,
}

pub fn validate_resume(form: ResumeForm) -> Result<ResumeDraft, AppError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Resume title is required".to_string()));
    }
    let contact = form.contact.trim();
    if contact.is_empty() {
        return Err(AppError::Validation(
            "Contact information is required".to_string(),
        ));
    }

    Ok(ResumeDraft {
        title: title.to_string(),
        summary: non_blank(form.summary),
        experience: non_blank(form.experience),
        education: non_blank(form.education),
        skills: non_blank(form.skills),
        contact: contact.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ResumeForm {
        ResumeForm {
            title: " Senior Backend Engineer ".into(),
            summary: Some("Ten years of Rust and Postgres".into()),
            experience: Some("".into()),
            education: None,
            skills: Some(" rust, sql ".into()),
            contact: "me@example.com".into(),
        }
    }

    #[test]
    fn test_optional_fields_normalised() {
        let draft = validate_resume(form()).unwrap();
        assert_eq!(draft.title, "Senior Backend Engineer");
        assert_eq!(draft.experience, None);
        assert_eq!(draft.education, None);
        assert_eq!(draft.skills.as_deref(), Some("rust, sql"));
    }

    #[test]
    fn test_contact_required() {
        let mut f = form();
        f.contact = "  ".into();
        assert!(matches!(validate_resume(f), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_title_required() {
        let mut f = form();
        f.title = String::new();
        match validate_resume(f) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Resume title is required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
