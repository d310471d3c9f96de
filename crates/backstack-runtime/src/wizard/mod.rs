#![forbid(unsafe_code)]

//! Multi-step wizard state machines.
//!
//! - [`machine`]: the generic [`StepMachine`] and the [`Wizard`] trait
//! - [`flows`]: the seven academy wizards and their domain data
//! - [`forms`]: [`FormsState`] snapshots and the [`Wizards`] machine set

pub mod flows;
pub mod forms;
pub mod machine;

pub use flows::{
    ClassCreation, ClassCreationData, ClassCreationPatch, Enrollment, EnrollmentData,
    EnrollmentModification, EnrollmentModificationData, EnrollmentModificationPatch,
    EnrollmentPatch, PaymentMethod, PersonManagement, PersonManagementData, PersonManagementPatch,
    PrincipalClassCreation, PrincipalClassCreationData, PrincipalClassCreationPatch,
    PrincipalPersonManagement, PrincipalPersonManagementData, PrincipalPersonManagementPatch,
    Role, Signup, SignupData, SignupPatch,
};
pub use forms::{FormsState, Wizards};
pub use machine::{MergePatch, StepMachine, Wizard, WizardStepState};
