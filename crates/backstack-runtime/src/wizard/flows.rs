#![forbid(unsafe_code)]

//! The academy client's wizards and their domain data.
//!
//! Each wizard gets a marker type implementing [`Wizard`], a data struct,
//! and a patch struct whose `Some` fields overwrite the data on merge.

use backstack_core::{
    ClassCreationStep, EnrollmentModificationStep, EnrollmentStep, PersonManagementStep,
    PrincipalClassCreationStep, PrincipalPersonManagementStep, SignupStep, WizardId,
};

use super::machine::{MergePatch, Wizard};

/// How a learner pays for an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    OnSite,
}

/// Account role chosen at signup or assigned by a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Parent,
    Teacher,
    Principal,
}

macro_rules! wizard_flow {
    (
        $(#[$meta:meta])*
        $wizard:ident: $step:ty => $data:ident / $patch:ident {
            $($(#[$fmeta:meta])* $field:ident: $ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $wizard;

        impl Wizard for $wizard {
            const ID: WizardId = WizardId::$wizard;
            type Step = $step;
            type Data = $data;
        }

        #[doc = concat!("Domain fields of the [`", stringify!($wizard), "`] wizard.")]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $data {
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        #[doc = concat!("Partial update for [`", stringify!($data), "`].")]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $patch {
            $(pub $field: Option<$ty>,)*
        }

        impl MergePatch for $data {
            type Patch = $patch;

            fn merge(&mut self, patch: $patch) {
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}

wizard_flow! {
    /// Enrolling a learner into a class.
    Enrollment: EnrollmentStep => EnrollmentData / EnrollmentPatch {
        academy_id: Option<u64>,
        class_id: Option<u64>,
        /// ISO dates of the chosen sessions.
        session_dates: Vec<String>,
        payment_method: Option<PaymentMethod>,
        amount: u64,
    }
}

wizard_flow! {
    /// Adding or dropping sessions of an existing enrollment.
    EnrollmentModification: EnrollmentModificationStep
        => EnrollmentModificationData / EnrollmentModificationPatch {
        enrollment_id: Option<u64>,
        added_dates: Vec<String>,
        removed_dates: Vec<String>,
        payment_method: Option<PaymentMethod>,
        /// Positive when the learner owes more, negative for a partial refund.
        amount_delta: i64,
    }
}

wizard_flow! {
    /// A teacher creating one of their own classes.
    ClassCreation: ClassCreationStep => ClassCreationData / ClassCreationPatch {
        title: String,
        description: String,
        session_dates: Vec<String>,
        capacity: u32,
        price: u64,
    }
}

wizard_flow! {
    /// A principal creating a class for a teacher of their academy.
    PrincipalClassCreation: PrincipalClassCreationStep
        => PrincipalClassCreationData / PrincipalClassCreationPatch {
        teacher_id: Option<u64>,
        title: String,
        description: String,
        session_dates: Vec<String>,
        capacity: u32,
        price: u64,
    }
}

wizard_flow! {
    /// Creating an account.
    Signup: SignupStep => SignupData / SignupPatch {
        role: Option<Role>,
        email: String,
        name: String,
        phone: String,
        academy_ids: Vec<u64>,
        agreed_to_terms: bool,
    }
}

wizard_flow! {
    /// A teacher looking after their students, including refunds.
    PersonManagement: PersonManagementStep => PersonManagementData / PersonManagementPatch {
        person_id: Option<u64>,
        enrollment_id: Option<u64>,
        refund_amount: u64,
        refund_reason: String,
    }
}

wizard_flow! {
    /// A principal managing academy members, including withdrawal.
    PrincipalPersonManagement: PrincipalPersonManagementStep
        => PrincipalPersonManagementData / PrincipalPersonManagementPatch {
        person_id: Option<u64>,
        role: Option<Role>,
        withdrawal_reason: String,
        /// Anonymize the member's personal data on withdrawal.
        anonymize: bool,
    }
}
