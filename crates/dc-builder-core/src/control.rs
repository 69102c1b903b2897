//! Add-to-cart control state machine.
//!
//! `Idle → Calculating → {Ready | Unavailable}`; `Ready → Submitting →
//! {NavigatingAway | SubmitFailed}`. `Unavailable` leaves only through a new
//! calculation.

use crate::config::BuilderConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Calculating,
    Ready {
        subtotal: u64,
    },
    Unavailable,
    Submitting,
    /// Actionable again, labelled with the failure.
    SubmitFailed,
    NavigatingAway,
}

impl SubmitState {
    pub fn is_enabled(self) -> bool {
        matches!(
            self,
            SubmitState::Idle | SubmitState::Ready { .. } | SubmitState::SubmitFailed
        )
    }

    /// A cart request is in flight or already succeeded.
    pub fn is_busy(self) -> bool {
        matches!(self, SubmitState::Submitting | SubmitState::NavigatingAway)
    }

    pub fn label(self, config: &BuilderConfig) -> String {
        let labels = &config.labels;
        match self {
            SubmitState::Idle => labels.idle.clone(),
            SubmitState::Calculating => labels.calculating.clone(),
            SubmitState::Ready { subtotal } => config.format_add_for(subtotal),
            SubmitState::Unavailable => labels.unavailable.clone(),
            SubmitState::Submitting | SubmitState::NavigatingAway => labels.submitting.clone(),
            SubmitState::SubmitFailed => labels.submit_failed.clone(),
        }
    }
}
