//! Company setup wizard state machine.
//!
//! A fixed linear step sequence with gated forward transitions and
//! unconditional back navigation. Reaching the final step latches a
//! persisted "setup finished" flag that later navigation never clears.
//! Config edits are pure merges; they persist but never move the step.

use serde::{Deserialize, Serialize};

use crate::models::SetupConfig;
use crate::session_store::{SessionSnapshot, SessionStore};

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetupStep {
    Welcome,
    Company,
    AiModels,
    DataSource,
    Onboarding,
    Complete,
}

const STEP_ORDER: [SetupStep; 6] = [
    SetupStep::Welcome,
    SetupStep::Company,
    SetupStep::AiModels,
    SetupStep::DataSource,
    SetupStep::Onboarding,
    SetupStep::Complete,
];

impl SetupStep {
    fn index(self) -> usize {
        STEP_ORDER
            .iter()
            .position(|s| *s == self)
            .expect("step is in STEP_ORDER")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Company => "company",
            Self::AiModels => "ai-models",
            Self::DataSource => "data-source",
            Self::Onboarding => "onboarding",
            Self::Complete => "complete",
        }
    }
}

pub struct SetupWizard {
    step: SetupStep,
    config: SetupConfig,
    setup_complete: bool,
    store: Box<dyn SessionStore>,
}

impl SetupWizard {
    /// Start a wizard, resuming any session the store already holds.
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        match store.load() {
            Some(snapshot) => Self {
                step: snapshot.step,
                config: snapshot.config,
                setup_complete: snapshot.setup_complete,
                store,
            },
            None => Self {
                step: SetupStep::Welcome,
                config: SetupConfig::default(),
                setup_complete: false,
                store,
            },
        }
    }

    pub fn step(&self) -> SetupStep {
        self.step
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// The latched "setup finished" flag.
    pub fn is_setup_complete(&self) -> bool {
        self.setup_complete
    }

    /// One-based position for progress display.
    pub fn step_number(&self) -> usize {
        self.step.index() + 1
    }

    pub fn total_steps(&self) -> usize {
        STEP_ORDER.len()
    }

    pub fn progress_percentage(&self) -> f64 {
        self.step_number() as f64 / self.total_steps() as f64 * 100.0
    }

    /// Whether the current step's required fields are satisfied. The UI
    /// renders a disabled Next control when this is false.
    pub fn can_advance(&self) -> bool {
        match self.step {
            SetupStep::Company => {
                !self.config.company.name.trim().is_empty()
                    && !self.config.company.industry.trim().is_empty()
            }
            SetupStep::AiModels => self.config.ai_models.primary.is_some(),
            SetupStep::Complete => false,
            _ => true,
        }
    }

    /// Advance one step when allowed. A `false` return means the step did
    /// not change (required fields missing, or already at the end).
    pub fn next(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let index = self.step.index();
        if index + 1 >= STEP_ORDER.len() {
            return false;
        }
        self.step = STEP_ORDER[index + 1];
        if self.step == SetupStep::Complete {
            self.setup_complete = true;
            tracing::info!(company = %self.config.company.name, "company setup finished");
        }
        self.persist();
        true
    }

    /// Retreat one step, unconditionally. The finished flag stays latched.
    pub fn previous(&mut self) {
        let index = self.step.index();
        if index > 0 {
            self.step = STEP_ORDER[index - 1];
            self.persist();
        }
    }

    /// Apply a pure merge to the config and persist it. Never changes the
    /// current step.
    pub fn update_config(&mut self, apply: impl FnOnce(&mut SetupConfig)) {
        apply(&mut self.config);
        self.persist();
    }

    /// Fill departments, safety requirements and default trainings from
    /// the industry presets.
    pub fn apply_industry_defaults(&mut self) {
        self.config.apply_industry_defaults();
        self.persist();
    }

    fn persist(&self) {
        self.store.save(&SessionSnapshot {
            step: self.step,
            config: self.config.clone(),
            setup_complete: self.setup_complete,
        });
    }
}
