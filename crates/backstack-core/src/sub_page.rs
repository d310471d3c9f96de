#![forbid(unsafe_code)]

//! Sub-page identifiers.
//!
//! A sub-page is a full-screen overlay opened from a tab. The set of
//! sub-pages is owned by the application, so identifiers are open strings;
//! the wizard-hosting ones are exposed as constants and map to their wizard
//! through [`SubPageId::wizard`].

use std::borrow::Cow;
use std::fmt;

use crate::step::WizardId;

/// Identifier of a sub-page overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubPageId(Cow<'static, str>);

impl SubPageId {
    pub const ENROLL: SubPageId = SubPageId::from_static("enroll");
    pub const MODIFY_ENROLLMENT: SubPageId = SubPageId::from_static("modify-enrollment");
    pub const CREATE_CLASS: SubPageId = SubPageId::from_static("create-class");
    pub const PRINCIPAL_CREATE_CLASS: SubPageId = SubPageId::from_static("principal-create-class");
    pub const SIGNUP: SubPageId = SubPageId::from_static("signup");
    pub const MANAGE_STUDENTS: SubPageId = SubPageId::from_static("manage-students");
    pub const MANAGE_MEMBERS: SubPageId = SubPageId::from_static("manage-members");

    /// Identifier backed by a static string.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Identifier backed by an owned string.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The wizard hosted by this sub-page, if any.
    #[must_use]
    pub fn wizard(&self) -> Option<WizardId> {
        match self.as_str() {
            "enroll" => Some(WizardId::Enrollment),
            "modify-enrollment" => Some(WizardId::EnrollmentModification),
            "create-class" => Some(WizardId::ClassCreation),
            "principal-create-class" => Some(WizardId::PrincipalClassCreation),
            "signup" => Some(WizardId::Signup),
            "manage-students" => Some(WizardId::PersonManagement),
            "manage-members" => Some(WizardId::PrincipalPersonManagement),
            _ => None,
        }
    }

    /// The sub-page that hosts `wizard`.
    #[must_use]
    pub const fn for_wizard(wizard: WizardId) -> Self {
        match wizard {
            WizardId::Enrollment => Self::ENROLL,
            WizardId::EnrollmentModification => Self::MODIFY_ENROLLMENT,
            WizardId::ClassCreation => Self::CREATE_CLASS,
            WizardId::PrincipalClassCreation => Self::PRINCIPAL_CREATE_CLASS,
            WizardId::Signup => Self::SIGNUP,
            WizardId::PersonManagement => Self::MANAGE_STUDENTS,
            WizardId::PrincipalPersonManagement => Self::MANAGE_MEMBERS,
        }
    }
}

impl fmt::Display for SubPageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for SubPageId {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for SubPageId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wizard_mapping_is_bidirectional() {
        for wizard in WizardId::ALL {
            assert_eq!(SubPageId::for_wizard(wizard).wizard(), Some(wizard));
        }
    }

    #[test]
    fn owned_and_static_ids_compare_equal() {
        assert_eq!(SubPageId::new("enroll"), SubPageId::ENROLL);
        assert_eq!(SubPageId::from("profile").wizard(), None);
    }
}
