//! Input validation and normalization
//!
//! Every rule for an input is evaluated and all failures are reported together.

use crate::contract::{
    DocumentPatch, DomainPatch, FeaturePatch, NewDocument, NewDomain, NewFeature, NewProject,
    NewRequirement, PageRequest, ProjectPatch, RequirementPatch, RequirementsError,
};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .unwrap_or_else(|e| panic!("invalid email pattern: {e}"))
});

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z\s'-]+$").unwrap_or_else(|e| panic!("invalid name pattern: {e}"))
});

static PROJECT_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9\s]+$")
        .unwrap_or_else(|e| panic!("invalid project title pattern: {e}"))
});

const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+";
const MAX_EMAIL_LEN: usize = 100;
const MAX_LABEL_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 1000;
const EMPTY_UPDATE: &str = "At least one field must be provided for update";

/// Accumulates rule violations for one input
#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.0.push(message.into());
        }
    }

    fn finish<T>(self, value: T) -> Result<T, RequirementsError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(RequirementsError::Validation { errors: self.0 })
        }
    }
}

/// Normalized registration input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Trimmed and lowercased
    pub email: String,
    /// Trimmed
    pub password: String,
    /// Inner whitespace compressed
    pub name: String,
}

pub fn validate_registration(
    email: &str,
    password: &str,
    name: &str,
) -> Result<Registration, RequirementsError> {
    let mut v = Violations::default();

    let email = check_email(&mut v, email);

    let password = password.trim().to_string();
    let password_len = password.chars().count();
    v.check(
        password_len >= 8,
        "Password must have at least 8 characters",
    );
    v.check(
        password_len <= 20,
        "Password must have at most 20 characters",
    );
    v.check(
        password.chars().any(|c| c.is_ascii_lowercase())
            && password.chars().any(|c| c.is_ascii_digit())
            && password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        "Password must include at least one lowercase letter, one number, and one special character",
    );

    let name = compress_whitespace(name);
    let name_len = name.chars().count();
    v.check(
        (2..=50).contains(&name_len),
        "Name must be between 2 and 50 characters",
    );
    v.check(
        NAME_RE.is_match(&name),
        "Name can only contain alphabets, spaces, hyphens, and apostrophes",
    );

    v.finish(Registration {
        email,
        password,
        name,
    })
}

/// Returns the normalized `(email, password)` pair
pub fn validate_login(email: &str, password: &str) -> Result<(String, String), RequirementsError> {
    let mut v = Violations::default();
    let email = check_email(&mut v, email);
    let password = password.trim().to_string();
    v.check(!password.is_empty(), "Password must not be empty");
    v.finish((email, password))
}

pub fn validate_new_project(input: NewProject) -> Result<NewProject, RequirementsError> {
    let mut v = Violations::default();
    let title = check_project_title(&mut v, &input.title);
    let description = check_description(&mut v, "Project description", input.description);
    v.finish(NewProject { title, description })
}

pub fn validate_project_patch(patch: ProjectPatch) -> Result<ProjectPatch, RequirementsError> {
    if is_blank(&patch.title) && is_blank(&patch.description) {
        return Err(RequirementsError::validation(EMPTY_UPDATE));
    }
    let mut v = Violations::default();
    let title = patch.title.map(|t| check_project_title(&mut v, &t));
    let description = check_description(&mut v, "Project description", patch.description);
    v.finish(ProjectPatch { title, description })
}

pub fn validate_new_document(input: NewDocument) -> Result<NewDocument, RequirementsError> {
    let mut v = Violations::default();
    let title = check_label(&mut v, "Document title", &input.title);
    v.finish(NewDocument {
        project_id: input.project_id,
        title,
    })
}

pub fn validate_document_patch(patch: DocumentPatch) -> Result<DocumentPatch, RequirementsError> {
    if is_blank(&patch.title) {
        return Err(RequirementsError::validation(EMPTY_UPDATE));
    }
    let mut v = Violations::default();
    let title = patch.title.map(|t| check_label(&mut v, "Document title", &t));
    v.finish(DocumentPatch { title })
}

pub fn validate_new_domain(input: NewDomain) -> Result<NewDomain, RequirementsError> {
    let mut v = Violations::default();
    let name = check_label(&mut v, "Domain name", &input.name);
    let description = check_description(&mut v, "Domain description", input.description);
    v.finish(NewDomain {
        document_id: input.document_id,
        name,
        description,
    })
}

pub fn validate_domain_patch(patch: DomainPatch) -> Result<DomainPatch, RequirementsError> {
    if is_blank(&patch.name) && is_blank(&patch.description) {
        return Err(RequirementsError::validation(EMPTY_UPDATE));
    }
    let mut v = Violations::default();
    let name = patch.name.map(|n| check_label(&mut v, "Domain name", &n));
    let description = check_description(&mut v, "Domain description", patch.description);
    v.finish(DomainPatch { name, description })
}

pub fn validate_new_feature(input: NewFeature) -> Result<NewFeature, RequirementsError> {
    let mut v = Violations::default();
    let name = check_label(&mut v, "Feature name", &input.name);
    let description = check_description(&mut v, "Feature description", input.description);
    v.finish(NewFeature {
        domain_id: input.domain_id,
        name,
        description,
    })
}

pub fn validate_feature_patch(patch: FeaturePatch) -> Result<FeaturePatch, RequirementsError> {
    if is_blank(&patch.name) && is_blank(&patch.description) {
        return Err(RequirementsError::validation(EMPTY_UPDATE));
    }
    let mut v = Violations::default();
    let name = patch.name.map(|n| check_label(&mut v, "Feature name", &n));
    let description = check_description(&mut v, "Feature description", patch.description);
    v.finish(FeaturePatch { name, description })
}

pub fn validate_new_requirement(
    input: NewRequirement,
) -> Result<NewRequirement, RequirementsError> {
    let mut v = Violations::default();
    let title = check_label(&mut v, "Requirement title", &input.title);
    let description = check_description(&mut v, "Requirement description", input.description);
    v.finish(NewRequirement {
        feature_id: input.feature_id,
        title,
        description,
        priority: input.priority,
    })
}

pub fn validate_requirement_patch(
    patch: RequirementPatch,
) -> Result<RequirementPatch, RequirementsError> {
    if is_blank(&patch.title)
        && is_blank(&patch.description)
        && patch.priority.is_none()
        && patch.feature_id.is_none()
    {
        return Err(RequirementsError::validation(EMPTY_UPDATE));
    }
    let mut v = Violations::default();
    let title = patch.title.map(|t| check_label(&mut v, "Requirement title", &t));
    let description = check_description(&mut v, "Requirement description", patch.description);
    v.finish(RequirementPatch {
        title,
        description,
        priority: patch.priority,
        feature_id: patch.feature_id,
    })
}

/// Build a page request, applying defaults for missing values
pub fn validate_page(page: Option<u64>, size: Option<u64>) -> Result<PageRequest, RequirementsError> {
    let mut v = Violations::default();
    let page = page.unwrap_or(1);
    let size = size.unwrap_or(PageRequest::DEFAULT_SIZE);
    v.check(page >= 1, "page must be at least 1");
    v.check(
        (1..=PageRequest::MAX_SIZE).contains(&size),
        format!("size must be between 1 and {}", PageRequest::MAX_SIZE),
    );
    // Databases take the offset as a signed 64-bit integer
    let offset = page.saturating_sub(1).checked_mul(size);
    v.check(
        offset.is_some_and(|o| i64::try_from(o).is_ok()),
        "page is too large",
    );
    v.finish(PageRequest { page, size })
}

fn check_email(v: &mut Violations, email: &str) -> String {
    let email = email.trim().to_lowercase();
    v.check(
        email.chars().count() <= MAX_EMAIL_LEN,
        format!("Email must not exceed {MAX_EMAIL_LEN} characters"),
    );
    v.check(EMAIL_RE.is_match(&email), "Invalid email address");
    email
}

fn check_project_title(v: &mut Violations, title: &str) -> String {
    let title = title.trim().to_string();
    v.check(
        PROJECT_TITLE_RE.is_match(&title),
        "Project title must contain only English characters and numbers",
    );
    v.check(
        (3..=100).contains(&title.chars().count()),
        "Project title must be between 3 and 100 characters",
    );
    title
}

fn check_label(v: &mut Violations, field: &str, value: &str) -> String {
    let value = value.trim().to_string();
    v.check(!value.is_empty(), format!("{field} must not be empty"));
    v.check(
        value.chars().count() <= MAX_LABEL_LEN,
        format!("{field} must not exceed {MAX_LABEL_LEN} characters"),
    );
    value
}

fn check_description(v: &mut Violations, field: &str, value: Option<String>) -> Option<String> {
    let value = value.map(|d| d.trim().to_string());
    if let Some(d) = &value {
        v.check(
            d.chars().count() <= MAX_DESCRIPTION_LEN,
            format!("{field} must not exceed {MAX_DESCRIPTION_LEN} characters"),
        );
    }
    value
}

fn compress_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors_of<T: std::fmt::Debug>(result: Result<T, RequirementsError>) -> Vec<String> {
        match result {
            Err(RequirementsError::Validation { errors }) => errors,
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_registration_is_normalized() {
        let reg = validate_registration(" Test@Example.com ", " ValidPass1! ", "John   Doe")
            .expect("valid registration");
        assert_eq!(reg.email, "test@example.com");
        assert_eq!(reg.password, "ValidPass1!");
        assert_eq!(reg.name, "John Doe");
    }

    #[test]
    fn test_registration_email_rules() {
        let errors = errors_of(validate_registration("invalid_email", "ValidPass1!", "John Doe"));
        assert_eq!(errors, vec!["Invalid email address".to_string()]);

        let long = format!("{}@example.com", "a".repeat(90));
        let errors = errors_of(validate_registration(&long, "ValidPass1!", "John Doe"));
        assert!(errors.iter().any(|e| e.contains("must not exceed 100")));
    }

    #[test]
    fn test_registration_password_rules() {
        let errors = errors_of(validate_registration("a@b.io", "Short1!", "John Doe"));
        assert!(errors.iter().any(|e| e.contains("at least 8")));

        let errors = errors_of(validate_registration("a@b.io", &"A".repeat(21), "John Doe"));
        assert!(errors.iter().any(|e| e.contains("at most 20")));

        for weak in ["UPPERCASE1!", "NoNumberPass!", "NoSpecialChar1", "onlylowercase"] {
            let errors = errors_of(validate_registration("a@b.io", weak, "John Doe"));
            assert!(
                errors.iter().any(|e| e.contains("one lowercase letter, one number")),
                "{weak} should fail complexity"
            );
        }
    }

    #[test]
    fn test_registration_name_rules() {
        assert!(validate_registration("a@b.io", "ValidPass1!", "Mary-Jane O'Connor").is_ok());

        let errors = errors_of(validate_registration("a@b.io", "ValidPass1!", "A"));
        assert!(errors.iter().any(|e| e.contains("between 2 and 50")));

        let errors = errors_of(validate_registration("a@b.io", "ValidPass1!", &"A".repeat(51)));
        assert!(errors.iter().any(|e| e.contains("between 2 and 50")));

        let errors = errors_of(validate_registration("a@b.io", "ValidPass1!", "John123"));
        assert!(errors.iter().any(|e| e.contains("alphabets, spaces, hyphens")));
    }

    #[test]
    fn test_registration_reports_every_failure() {
        let errors = errors_of(validate_registration("invalid-email", "short", ""));
        assert!(errors.len() >= 4, "got {:?}", errors);
    }

    #[test]
    fn test_login_validation() {
        let (email, password) = validate_login(" Test@Example.com ", " pw ").expect("valid");
        assert_eq!(email, "test@example.com");
        assert_eq!(password, "pw");

        assert!(validate_login("", "ValidPass1!").is_err());
        assert!(validate_login("test@example.com", "   ").is_err());
    }

    #[test]
    fn test_project_title_rules() {
        let project = validate_new_project(NewProject {
            title: "  Leading and trailing spaces  ".to_string(),
            description: Some("  Description  ".to_string()),
        })
        .expect("valid project");
        assert_eq!(project.title, "Leading and trailing spaces");
        assert_eq!(project.description.as_deref(), Some("Description"));

        assert!(validate_new_project(NewProject {
            title: "abc".to_string(),
            description: None
        })
        .is_ok());
        assert!(validate_new_project(NewProject {
            title: "a".repeat(100),
            description: None
        })
        .is_ok());

        let errors = errors_of(validate_new_project(NewProject {
            title: "Project@123".to_string(),
            description: None,
        }));
        assert_eq!(
            errors,
            vec!["Project title must contain only English characters and numbers".to_string()]
        );

        let errors = errors_of(validate_new_project(NewProject {
            title: "a".repeat(101),
            description: None,
        }));
        assert_eq!(
            errors,
            vec!["Project title must be between 3 and 100 characters".to_string()]
        );

        let errors = errors_of(validate_new_project(NewProject {
            title: "프로젝트".to_string(),
            description: None,
        }));
        assert!(errors.iter().any(|e| e.contains("only English characters")));
    }

    #[test]
    fn test_empty_project_title_reports_length() {
        let errors = errors_of(validate_new_project(NewProject {
            title: String::new(),
            description: None,
        }));
        assert!(errors.iter().any(|e| e.contains("between 3 and 100")));
    }

    #[test]
    fn test_project_description_rules() {
        let project = validate_new_project(NewProject {
            title: "Valid Project".to_string(),
            description: Some("   ".to_string()),
        })
        .expect("whitespace description is allowed");
        assert_eq!(project.description.as_deref(), Some(""));

        let errors = errors_of(validate_new_project(NewProject {
            title: "Valid Project".to_string(),
            description: Some("a".repeat(1001)),
        }));
        assert_eq!(
            errors,
            vec!["Project description must not exceed 1000 characters".to_string()]
        );
    }

    #[test]
    fn test_project_patch_rules() {
        let errors = errors_of(validate_project_patch(ProjectPatch::default()));
        assert_eq!(errors, vec![EMPTY_UPDATE.to_string()]);

        let patch = validate_project_patch(ProjectPatch {
            title: Some("Updated Title".to_string()),
            description: None,
        })
        .expect("partial update");
        assert_eq!(patch.title.as_deref(), Some("Updated Title"));
        assert!(patch.description.is_none());

        let errors = errors_of(validate_project_patch(ProjectPatch {
            title: Some("a".to_string()),
            description: None,
        }));
        assert!(errors.iter().any(|e| e.contains("between 3 and 100")));
    }

    #[test]
    fn test_label_rules() {
        let errors = errors_of(validate_new_document(NewDocument {
            project_id: 1,
            title: "   ".to_string(),
        }));
        assert_eq!(errors, vec!["Document title must not be empty".to_string()]);

        let errors = errors_of(validate_new_feature(NewFeature {
            domain_id: 1,
            name: "x".repeat(201),
            description: None,
        }));
        assert_eq!(
            errors,
            vec!["Feature name must not exceed 200 characters".to_string()]
        );
    }

    #[test]
    fn test_requirement_patch_accepts_priority_only() {
        let patch = validate_requirement_patch(RequirementPatch {
            priority: Some(crate::contract::Priority::High),
            ..Default::default()
        })
        .expect("priority-only update");
        assert_eq!(patch.priority, Some(crate::contract::Priority::High));

        assert!(validate_requirement_patch(RequirementPatch::default()).is_err());
    }

    #[test]
    fn test_page_defaults_and_bounds() {
        assert_eq!(validate_page(None, None).expect("defaults"), PageRequest::default());
        assert!(validate_page(Some(0), None).is_err());
        assert!(validate_page(None, Some(0)).is_err());
        assert!(validate_page(None, Some(101)).is_err());
        let page = validate_page(Some(3), Some(10)).expect("valid page");
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_page_offset_must_fit_database_range() {
        let errors = errors_of(validate_page(Some(u64::MAX), Some(100)));
        assert_eq!(errors, vec!["page is too large".to_string()]);

        let last = i64::MAX as u64 / 100 + 1;
        let page = validate_page(Some(last), Some(100)).expect("largest page");
        assert!(page.offset() <= i64::MAX as u64);
        assert!(validate_page(Some(last + 1), Some(100)).is_err());
    }

    #[test]
    fn test_whitespace_only_patch_is_empty() {
        for blank in ["", "   ", "\t\n"] {
            let errors = errors_of(validate_project_patch(ProjectPatch {
                title: Some(blank.to_string()),
                description: Some(blank.to_string()),
            }));
            assert_eq!(errors, vec![EMPTY_UPDATE.to_string()], "{blank:?}");

            let errors = errors_of(validate_document_patch(DocumentPatch {
                title: Some(blank.to_string()),
            }));
            assert_eq!(errors, vec![EMPTY_UPDATE.to_string()], "{blank:?}");
        }

        let errors = errors_of(validate_feature_patch(FeaturePatch {
            name: None,
            description: Some("  ".to_string()),
        }));
        assert_eq!(errors, vec![EMPTY_UPDATE.to_string()]);
    }
}
