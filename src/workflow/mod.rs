//! Wizard steps and the gate deciding which of them are reachable

pub mod gate;
pub mod steps;

pub use gate::{NavigationState, StepState, can_navigate, can_proceed};
pub use steps::WizardStep;
