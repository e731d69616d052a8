//! Artifact naming.

use crate::error::{GenerateError, Result};

/// Suffix of the generated wrapper class.
pub const ARTIFACT_SUFFIX: &str = "_REST";
/// Suffix of the generated direct-call companion interface.
pub const COMPANION_SUFFIX: &str = "_DirectRestService";

/// Names derived from a subject interface's fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// The subject's fully-qualified name.
    pub subject: String,
    /// Package of the subject and of both generated types, if any.
    pub package: Option<String>,
    /// Subject name without its package.
    pub subject_simple: String,
    /// `<subject>_REST`
    pub artifact_qualified: String,
    /// `<Simple>_REST`
    pub artifact_simple: String,
    /// `<subject>_DirectRestService`
    pub companion_qualified: String,
    /// `<Simple>_DirectRestService`
    pub companion_simple: String,
}

impl ArtifactNames {
    /// Split `qualified` at its last `.` and append the fixed suffixes.
    pub fn derive(qualified: &str) -> Result<Self> {
        let qualified = qualified.trim();
        if qualified.is_empty() {
            return Err(GenerateError::MalformedDeclaration(
                "empty fully-qualified name".into(),
            ));
        }
        if qualified.split('.').any(|segment| segment.is_empty())
            || qualified.contains(char::is_whitespace)
        {
            return Err(GenerateError::MalformedDeclaration(format!(
                "`{qualified}` is not a valid fully-qualified name"
            )));
        }

        let (package, simple) = match qualified.rsplit_once('.') {
            Some((package, simple)) => (Some(package.to_string()), simple),
            None => (None, qualified),
        };

        Ok(Self {
            subject: qualified.to_string(),
            package,
            subject_simple: simple.to_string(),
            artifact_qualified: format!("{qualified}{ARTIFACT_SUFFIX}"),
            artifact_simple: format!("{simple}{ARTIFACT_SUFFIX}"),
            companion_qualified: format!("{qualified}{COMPANION_SUFFIX}"),
            companion_simple: format!("{simple}{COMPANION_SUFFIX}"),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_packaged_name() {
        let names = ArtifactNames::derive("com.example.Greeter").unwrap();
        assert_eq!(names.package.as_deref(), Some("com.example"));
        assert_eq!(names.subject_simple, "Greeter");
        assert_eq!(names.artifact_qualified, "com.example.Greeter_REST");
        assert_eq!(names.artifact_simple, "Greeter_REST");
        assert_eq!(names.companion_qualified, "com.example.Greeter_DirectRestService");
        assert_eq!(names.companion_simple, "Greeter_DirectRestService");
    }

    #[test]
    fn test_derive_default_package() {
        let names = ArtifactNames::derive("Greeter").unwrap();
        assert_eq!(names.package, None);
        assert_eq!(names.artifact_qualified, "Greeter_REST");
        assert_eq!(names.artifact_simple, "Greeter_REST");
        assert_eq!(names.companion_simple, "Greeter_DirectRestService");
    }

    #[test]
    fn test_same_simple_name_in_different_packages() {
        let a = ArtifactNames::derive("a.Svc").unwrap();
        let b = ArtifactNames::derive("b.Svc").unwrap();
        assert_eq!(a.artifact_simple, b.artifact_simple);
        assert_ne!(a.artifact_qualified, b.artifact_qualified);
    }

    #[test]
    fn test_malformed_names() {
        for bad in ["", "   ", ".Greeter", "com..Greeter", "com.example.", "com.ex ample.G"] {
            assert!(
                matches!(ArtifactNames::derive(bad), Err(GenerateError::MalformedDeclaration(_))),
                "expected `{bad}` to be rejected"
            );
        }
    }
}
