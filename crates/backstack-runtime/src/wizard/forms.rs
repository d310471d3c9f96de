#![forbid(unsafe_code)]

//! Aggregate view over every wizard.

use backstack_core::{AnyStep, EventBus, WizardId, WizardStep};

use super::flows::{
    ClassCreation, Enrollment, EnrollmentModification, PersonManagement, PrincipalClassCreation,
    PrincipalPersonManagement, Signup,
};
use super::machine::{StepMachine, WizardStepState};

/// Snapshot of every wizard's state, keyed by wizard.
///
/// The key set is closed: one field per [`WizardId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormsState {
    pub enrollment: WizardStepState<Enrollment>,
    pub enrollment_modification: WizardStepState<EnrollmentModification>,
    pub class_creation: WizardStepState<ClassCreation>,
    pub principal_class_creation: WizardStepState<PrincipalClassCreation>,
    pub signup: WizardStepState<Signup>,
    pub person_management: WizardStepState<PersonManagement>,
    pub principal_person_management: WizardStepState<PrincipalPersonManagement>,
}

impl FormsState {
    /// Current step of `wizard`.
    #[must_use]
    pub fn step_of(&self, wizard: WizardId) -> AnyStep {
        match wizard {
            WizardId::Enrollment => self.enrollment.current_step.into_any(),
            WizardId::EnrollmentModification => {
                self.enrollment_modification.current_step.into_any()
            }
            WizardId::ClassCreation => self.class_creation.current_step.into_any(),
            WizardId::PrincipalClassCreation => {
                self.principal_class_creation.current_step.into_any()
            }
            WizardId::Signup => self.signup.current_step.into_any(),
            WizardId::PersonManagement => self.person_management.current_step.into_any(),
            WizardId::PrincipalPersonManagement => {
                self.principal_person_management.current_step.into_any()
            }
        }
    }

    /// Whether `wizard` sits at the first step of its sequence.
    #[must_use]
    pub fn is_at_first_step(&self, wizard: WizardId) -> bool {
        self.step_of(wizard).is_first()
    }

    /// Copy of `self` with `step` written into the owning wizard, bypassing
    /// adjacency. Used to build test fixtures and simulated snapshots.
    #[must_use]
    pub fn with_step(mut self, step: AnyStep) -> Self {
        match step {
            AnyStep::Enrollment(s) => self.enrollment.current_step = s,
            AnyStep::EnrollmentModification(s) => self.enrollment_modification.current_step = s,
            AnyStep::ClassCreation(s) => self.class_creation.current_step = s,
            AnyStep::PrincipalClassCreation(s) => self.principal_class_creation.current_step = s,
            AnyStep::Signup(s) => self.signup.current_step = s,
            AnyStep::PersonManagement(s) => self.person_management.current_step = s,
            AnyStep::PrincipalPersonManagement(s) => {
                self.principal_person_management.current_step = s;
            }
        }
        self
    }
}

/// One step machine per wizard, all wired to the same bus.
#[derive(Debug, Clone)]
pub struct Wizards {
    pub enrollment: StepMachine<Enrollment>,
    pub enrollment_modification: StepMachine<EnrollmentModification>,
    pub class_creation: StepMachine<ClassCreation>,
    pub principal_class_creation: StepMachine<PrincipalClassCreation>,
    pub signup: StepMachine<Signup>,
    pub person_management: StepMachine<PersonManagement>,
    pub principal_person_management: StepMachine<PrincipalPersonManagement>,
}

impl Wizards {
    #[must_use]
    pub fn new(bus: &EventBus) -> Self {
        Self {
            enrollment: StepMachine::new(bus.clone()),
            enrollment_modification: StepMachine::new(bus.clone()),
            class_creation: StepMachine::new(bus.clone()),
            principal_class_creation: StepMachine::new(bus.clone()),
            signup: StepMachine::new(bus.clone()),
            person_management: StepMachine::new(bus.clone()),
            principal_person_management: StepMachine::new(bus.clone()),
        }
    }

    /// Snapshot of every machine.
    #[must_use]
    pub fn snapshot(&self) -> FormsState {
        FormsState {
            enrollment: self.enrollment.state(),
            enrollment_modification: self.enrollment_modification.state(),
            class_creation: self.class_creation.state(),
            principal_class_creation: self.principal_class_creation.state(),
            signup: self.signup.state(),
            person_management: self.person_management.state(),
            principal_person_management: self.principal_person_management.state(),
        }
    }

    /// Route `step` to its owning machine's `set_current_step`.
    pub fn set_step(&self, step: AnyStep) -> bool {
        match step {
            AnyStep::Enrollment(s) => self.enrollment.set_current_step(s),
            AnyStep::EnrollmentModification(s) => self.enrollment_modification.set_current_step(s),
            AnyStep::ClassCreation(s) => self.class_creation.set_current_step(s),
            AnyStep::PrincipalClassCreation(s) => {
                self.principal_class_creation.set_current_step(s)
            }
            AnyStep::Signup(s) => self.signup.set_current_step(s),
            AnyStep::PersonManagement(s) => self.person_management.set_current_step(s),
            AnyStep::PrincipalPersonManagement(s) => {
                self.principal_person_management.set_current_step(s)
            }
        }
    }

    /// Reset one wizard to its initial state.
    pub fn reset(&self, wizard: WizardId) {
        match wizard {
            WizardId::Enrollment => self.enrollment.reset(),
            WizardId::EnrollmentModification => self.enrollment_modification.reset(),
            WizardId::ClassCreation => self.class_creation.reset(),
            WizardId::PrincipalClassCreation => self.principal_class_creation.reset(),
            WizardId::Signup => self.signup.reset(),
            WizardId::PersonManagement => self.person_management.reset(),
            WizardId::PrincipalPersonManagement => self.principal_person_management.reset(),
        }
    }

    /// Reset every wizard.
    pub fn reset_all(&self) {
        for wizard in WizardId::ALL {
            self.reset(wizard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backstack_core::{EnrollmentStep, SignupStep};

    #[test]
    fn default_forms_are_all_at_first_step() {
        let forms = FormsState::default();
        for wizard in WizardId::ALL {
            assert!(forms.is_at_first_step(wizard), "{wizard} not at first step");
        }
    }

    #[test]
    fn set_step_routes_to_owning_machine() {
        let wizards = Wizards::new(&EventBus::new());
        assert!(wizards.set_step(SignupStep::AccountInfo.into()));
        assert!(!wizards.set_step(EnrollmentStep::Payment.into()));

        let forms = wizards.snapshot();
        assert_eq!(forms.step_of(WizardId::Signup), SignupStep::AccountInfo.into());
        assert!(forms.is_at_first_step(WizardId::Enrollment));
    }

    #[test]
    fn with_step_bypasses_adjacency() {
        let forms = FormsState::default().with_step(EnrollmentStep::Payment.into());
        assert_eq!(
            forms.step_of(WizardId::Enrollment),
            EnrollmentStep::Payment.into()
        );
    }

    #[test]
    fn reset_all_returns_every_machine_home() {
        let wizards = Wizards::new(&EventBus::new());
        wizards.set_step(SignupStep::AccountInfo.into());
        wizards.set_step(EnrollmentStep::ClassSelection.into());
        wizards.reset_all();
        assert_eq!(wizards.snapshot(), FormsState::default());
    }
}
