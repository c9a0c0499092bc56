//! View state machine for the create-petition flow.
//!
//! ```text
//!            CreateClicked              Verified
//!   Idle ─────────────────▶ Verifying ───────────▶ FormVisible
//!    ▲  ◀── Failed/Cancelled/TimedOut ──┘            │   ▲
//!    │                                        Submit │   │ SubmitFailed
//!    │◀──────────── FormCancelled ───────────────────┤   │
//!    │                                               ▼   │
//!    └────────────────── Submitted ─────────────── Submitting
//! ```
//!
//! The form only becomes visible after the server accepted the identity
//! proof. There is no terminal state.

/// Where the create flow currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Form hidden.
    #[default]
    Idle,
    /// Widget open, or its proof being checked by the server.
    Verifying,
    /// Verification accepted; form shown.
    FormVisible,
    /// Create request in flight.
    Submitting,
}

/// Things that happen to the flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    CreateClicked,
    /// The server accepted the widget's proof.
    Verified,
    VerificationFailed(String),
    VerificationCancelled,
    VerificationTimedOut,
    Submit,
    Submitted,
    SubmitFailed(String),
    FormCancelled,
}

impl ViewState {
    /// The state after `event`, or `None` if the event does not apply here.
    pub fn next(self, event: &FlowEvent) -> Option<ViewState> {
        use FlowEvent as E;
        use ViewState as S;

        match (self, event) {
            (S::Idle, E::CreateClicked) => Some(S::Verifying),
            (S::Verifying, E::Verified) => Some(S::FormVisible),
            (
                S::Verifying,
                E::VerificationFailed(_) | E::VerificationCancelled | E::VerificationTimedOut,
            ) => Some(S::Idle),
            (S::FormVisible, E::Submit) => Some(S::Submitting),
            (S::FormVisible, E::FormCancelled) => Some(S::Idle),
            (S::Submitting, E::Submitted) => Some(S::Idle),
            (S::Submitting, E::SubmitFailed(_)) => Some(S::FormVisible),
            _ => None,
        }
    }

    pub fn form_visible(self) -> bool {
        matches!(self, ViewState::FormVisible | ViewState::Submitting)
    }
}
