#![forbid(unsafe_code)]

//! Wizard identifiers and their ordered step vocabularies.
//!
//! Every multi-step form in the academy client declares a closed, totally
//! ordered sequence of steps. The sequence order is what the step machines
//! use to enforce adjacent-only transitions, and what the back resolver uses
//! to decide whether a wizard is sitting at its first step.
//!
//! [`AnyStep`] erases the wizard type so that history entries and bus events
//! can carry "wizard + step" as a single value.

use std::fmt;

/// Identifier of a multi-step wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardId {
    Enrollment,
    EnrollmentModification,
    ClassCreation,
    PrincipalClassCreation,
    Signup,
    PersonManagement,
    PrincipalPersonManagement,
}

impl WizardId {
    /// All wizards, in declaration order.
    pub const ALL: [WizardId; 7] = [
        WizardId::Enrollment,
        WizardId::EnrollmentModification,
        WizardId::ClassCreation,
        WizardId::PrincipalClassCreation,
        WizardId::Signup,
        WizardId::PersonManagement,
        WizardId::PrincipalPersonManagement,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrollment => "enrollment",
            Self::EnrollmentModification => "enrollment-modification",
            Self::ClassCreation => "class-creation",
            Self::PrincipalClassCreation => "principal-class-creation",
            Self::Signup => "signup",
            Self::PersonManagement => "person-management",
            Self::PrincipalPersonManagement => "principal-person-management",
        }
    }

    /// The first step of this wizard's declared sequence.
    #[must_use]
    pub const fn first_step(self) -> AnyStep {
        match self {
            Self::Enrollment => AnyStep::Enrollment(EnrollmentStep::FIRST),
            Self::EnrollmentModification => {
                AnyStep::EnrollmentModification(EnrollmentModificationStep::FIRST)
            }
            Self::ClassCreation => AnyStep::ClassCreation(ClassCreationStep::FIRST),
            Self::PrincipalClassCreation => {
                AnyStep::PrincipalClassCreation(PrincipalClassCreationStep::FIRST)
            }
            Self::Signup => AnyStep::Signup(SignupStep::FIRST),
            Self::PersonManagement => AnyStep::PersonManagement(PersonManagementStep::FIRST),
            Self::PrincipalPersonManagement => {
                AnyStep::PrincipalPersonManagement(PrincipalPersonManagementStep::FIRST)
            }
        }
    }
}

impl fmt::Display for WizardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A step in one wizard's ordered sequence.
pub trait WizardStep: Copy + Eq + fmt::Debug + 'static {
    /// Owning wizard.
    const WIZARD: WizardId;
    /// The declared sequence, first to last.
    const SEQUENCE: &'static [Self];

    /// Position in [`Self::SEQUENCE`].
    fn index(self) -> usize;

    /// Stable kebab-case name.
    fn as_str(self) -> &'static str;

    /// Erase into an [`AnyStep`].
    fn into_any(self) -> AnyStep;

    /// Recover a typed step from an [`AnyStep`] of the same wizard.
    fn from_any(step: AnyStep) -> Option<Self>;

    /// First step of the sequence.
    fn first() -> Self {
        Self::SEQUENCE[0]
    }

    /// Whether `self` and `other` are equal or neighbours in the sequence.
    fn is_adjacent_to(self, other: Self) -> bool {
        self.index().abs_diff(other.index()) <= 1
    }

    /// The step before this one, if any.
    fn previous(self) -> Option<Self> {
        self.index()
            .checked_sub(1)
            .map(|i| Self::SEQUENCE[i])
    }

    /// The step after this one, if any.
    fn next(self) -> Option<Self> {
        Self::SEQUENCE.get(self.index() + 1).copied()
    }
}

macro_rules! wizard_steps {
    (
        $(#[$meta:meta])*
        $name:ident for $wizard:ident {
            $first:ident => $first_label:literal
            $(, $variant:ident => $label:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $first,
            $($variant,)*
        }

        impl $name {
            /// First step of the sequence.
            pub const FIRST: Self = Self::$first;
        }

        impl WizardStep for $name {
            const WIZARD: WizardId = WizardId::$wizard;
            const SEQUENCE: &'static [Self] = &[Self::$first, $(Self::$variant,)*];

            fn index(self) -> usize {
                self as usize
            }

            fn as_str(self) -> &'static str {
                match self {
                    Self::$first => $first_label,
                    $(Self::$variant => $label,)*
                }
            }

            fn into_any(self) -> AnyStep {
                AnyStep::$wizard(self)
            }

            fn from_any(step: AnyStep) -> Option<Self> {
                match step {
                    AnyStep::$wizard(s) => Some(s),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<$name> for AnyStep {
            fn from(step: $name) -> Self {
                AnyStep::$wizard(step)
            }
        }
    };
}

wizard_steps! {
    /// Student enrollment into a class.
    EnrollmentStep for Enrollment {
        AcademySelection => "academy-selection",
        ClassSelection => "class-selection",
        DateSelection => "date-selection",
        Payment => "payment",
        Complete => "complete",
    }
}

wizard_steps! {
    /// Changing the sessions of an existing enrollment.
    EnrollmentModificationStep for EnrollmentModification {
        EnrollmentSelection => "enrollment-selection",
        DateSelection => "date-selection",
        Payment => "payment",
        Complete => "complete",
    }
}

wizard_steps! {
    /// A teacher creating a class.
    ClassCreationStep for ClassCreation {
        BasicInfo => "basic-info",
        Schedule => "schedule",
        Pricing => "pricing",
        Review => "review",
        Complete => "complete",
    }
}

wizard_steps! {
    /// A principal creating a class on behalf of a teacher.
    PrincipalClassCreationStep for PrincipalClassCreation {
        TeacherSelection => "teacher-selection",
        BasicInfo => "basic-info",
        Schedule => "schedule",
        Pricing => "pricing",
        Review => "review",
        Complete => "complete",
    }
}

wizard_steps! {
    /// Account signup.
    SignupStep for Signup {
        RoleSelection => "role-selection",
        AccountInfo => "account-info",
        AcademySelection => "academy-selection",
        Complete => "complete",
    }
}

wizard_steps! {
    /// A teacher managing students, including refunds.
    PersonManagementStep for PersonManagement {
        PersonList => "person-list",
        PersonDetail => "person-detail",
        Refund => "refund",
        Complete => "complete",
    }
}

wizard_steps! {
    /// A principal managing members, including withdrawal.
    PrincipalPersonManagementStep for PrincipalPersonManagement {
        PersonList => "person-list",
        PersonDetail => "person-detail",
        Withdrawal => "withdrawal",
        Complete => "complete",
    }
}

/// A step of any wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyStep {
    Enrollment(EnrollmentStep),
    EnrollmentModification(EnrollmentModificationStep),
    ClassCreation(ClassCreationStep),
    PrincipalClassCreation(PrincipalClassCreationStep),
    Signup(SignupStep),
    PersonManagement(PersonManagementStep),
    PrincipalPersonManagement(PrincipalPersonManagementStep),
}

impl AnyStep {
    /// Owning wizard.
    #[must_use]
    pub const fn wizard(self) -> WizardId {
        match self {
            Self::Enrollment(_) => WizardId::Enrollment,
            Self::EnrollmentModification(_) => WizardId::EnrollmentModification,
            Self::ClassCreation(_) => WizardId::ClassCreation,
            Self::PrincipalClassCreation(_) => WizardId::PrincipalClassCreation,
            Self::Signup(_) => WizardId::Signup,
            Self::PersonManagement(_) => WizardId::PersonManagement,
            Self::PrincipalPersonManagement(_) => WizardId::PrincipalPersonManagement,
        }
    }

    /// Position within the owning wizard's sequence.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Enrollment(s) => s.index(),
            Self::EnrollmentModification(s) => s.index(),
            Self::ClassCreation(s) => s.index(),
            Self::PrincipalClassCreation(s) => s.index(),
            Self::Signup(s) => s.index(),
            Self::PersonManagement(s) => s.index(),
            Self::PrincipalPersonManagement(s) => s.index(),
        }
    }

    /// Stable kebab-case step name (without the wizard).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrollment(s) => s.as_str(),
            Self::EnrollmentModification(s) => s.as_str(),
            Self::ClassCreation(s) => s.as_str(),
            Self::PrincipalClassCreation(s) => s.as_str(),
            Self::Signup(s) => s.as_str(),
            Self::PersonManagement(s) => s.as_str(),
            Self::PrincipalPersonManagement(s) => s.as_str(),
        }
    }

    /// Whether this is the first step of its wizard.
    #[must_use]
    pub fn is_first(self) -> bool {
        self.index() == 0
    }
}

impl fmt::Display for AnyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wizard(), self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_indices_match_declaration_order() {
        for (i, step) in EnrollmentStep::SEQUENCE.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
        assert_eq!(EnrollmentStep::first(), EnrollmentStep::AcademySelection);
        assert_eq!(EnrollmentStep::Complete.next(), None);
        assert_eq!(
            EnrollmentStep::ClassSelection.previous(),
            Some(EnrollmentStep::AcademySelection)
        );
    }

    #[test]
    fn adjacency_allows_self_and_neighbours_only() {
        let current = SignupStep::AccountInfo;
        assert!(current.is_adjacent_to(SignupStep::RoleSelection));
        assert!(current.is_adjacent_to(SignupStep::AccountInfo));
        assert!(current.is_adjacent_to(SignupStep::AcademySelection));
        assert!(!current.is_adjacent_to(SignupStep::Complete));
    }

    #[test]
    fn any_step_round_trips_through_typed_step() {
        let any: AnyStep = PersonManagementStep::Refund.into();
        assert_eq!(any.wizard(), WizardId::PersonManagement);
        assert_eq!(any.as_str(), "refund");
        assert_eq!(
            PersonManagementStep::from_any(any),
            Some(PersonManagementStep::Refund)
        );
        assert_eq!(SignupStep::from_any(any), None);
        assert_eq!(any.to_string(), "person-management/refund");
    }

    #[test]
    fn first_step_lookup_agrees_with_sequences() {
        for wizard in WizardId::ALL {
            let first = wizard.first_step();
            assert_eq!(first.wizard(), wizard);
            assert!(first.is_first());
        }
        assert_eq!(
            WizardId::Enrollment.first_step(),
            AnyStep::Enrollment(EnrollmentStep::AcademySelection)
        );
    }
}
