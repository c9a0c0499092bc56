//! One person's session against the petitions API.
//!
//! Verification is a single flow: the widget yields a proof, the proof is
//! checked by the server, and only a successful check unlocks the form.
//! The whole step is bounded by [`ClientConfig::verification_timeout`] and
//! can be abandoned through a caller supplied cancel future.

use std::future::Future;

use petition_types::{NewPetition, Petition};
use petition_verification::IdentityWidget;

use crate::{ClientConfig, ClientError, FlowError, FlowEvent, PetitionApi, ViewState};

/// Transient view state. Nothing here outlives the session.
#[derive(Clone, Debug, Default)]
pub struct ViewModel {
    pub state: ViewState,
    pub title: String,
    pub description: String,
    pub petitions: Vec<Petition>,
    pub loading: bool,
    /// Why the last list fetch failed, if it did.
    pub load_error: Option<String>,
    /// Last message for the person (alert equivalent).
    pub notice: Option<String>,
}

impl ViewModel {
    /// Advance the flow and apply the event's effects on the view.
    pub fn apply(&mut self, event: FlowEvent) -> Result<(), FlowError> {
        let next = self
            .state
            .next(&event)
            .ok_or_else(|| FlowError::InvalidTransition {
                state: self.state,
                event: event.clone(),
            })?;

        match event {
            FlowEvent::VerificationFailed(detail) => {
                self.notice = Some(format!("Verification failed: {detail}"));
            }
            FlowEvent::VerificationCancelled => {
                self.notice = Some("Verification cancelled".to_string());
            }
            FlowEvent::VerificationTimedOut => {
                self.notice = Some("Verification timed out".to_string());
            }
            FlowEvent::Submitted => {
                self.title.clear();
                self.description.clear();
                self.notice = Some("Petition created!".to_string());
            }
            FlowEvent::SubmitFailed(message) => {
                self.notice = Some(format!("Error: {message}"));
            }
            FlowEvent::CreateClicked
            | FlowEvent::Verified
            | FlowEvent::Submit
            | FlowEvent::FormCancelled => {}
        }

        tracing::debug!(from = ?self.state, to = ?next, "view transition");
        self.state = next;
        Ok(())
    }
}

/// How a verification attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified { nullifier_hash: String },
    Failed(String),
    Cancelled,
    TimedOut,
}

pub struct PetitionSession<W> {
    api: PetitionApi,
    widget: W,
    config: ClientConfig,
    view: ViewModel,
}

impl<W: IdentityWidget> PetitionSession<W> {
    pub fn new(config: ClientConfig, widget: W) -> Result<Self, ClientError> {
        let api = PetitionApi::new(config.server_url.clone())?;
        Ok(Self {
            api,
            widget,
            config,
            view: ViewModel {
                loading: true,
                ..ViewModel::default()
            },
        })
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.view.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.view.description = description.into();
    }

    /// Fetch the list. On failure the previous list is kept and the error
    /// is recorded in [`ViewModel::load_error`].
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.view.loading = true;
        let result = self.api.list().await;
        self.view.loading = false;

        match result {
            Ok(petitions) => {
                self.view.petitions = petitions;
                self.view.load_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("failed to load petitions: {e}");
                self.view.load_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Open the widget and check its proof with the server.
    ///
    /// Resolves `cancel` to abandon the attempt, e.g. when the person
    /// closes the widget. Pass `std::future::pending()` for no cancel path.
    pub async fn verify<C>(&mut self, cancel: C) -> Result<VerificationOutcome, ClientError>
    where
        C: Future<Output = ()>,
    {
        self.view.apply(FlowEvent::CreateClicked)?;

        let attempt = run_verification(&self.api, &self.widget, &self.config);
        let outcome = tokio::select! {
            result = tokio::time::timeout(self.config.verification_timeout, attempt) => {
                result.unwrap_or(VerificationOutcome::TimedOut)
            }
            () = cancel => VerificationOutcome::Cancelled,
        };

        let event = match &outcome {
            VerificationOutcome::Verified { nullifier_hash } => {
                self.view.notice = Some(format!(
                    "Successfully verified! Your nullifier hash is: {nullifier_hash}"
                ));
                FlowEvent::Verified
            }
            VerificationOutcome::Failed(detail) => FlowEvent::VerificationFailed(detail.clone()),
            VerificationOutcome::Cancelled => FlowEvent::VerificationCancelled,
            VerificationOutcome::TimedOut => FlowEvent::VerificationTimedOut,
        };
        self.view.apply(event)?;
        Ok(outcome)
    }

    /// Send the form. Blank fields are refused locally with a notice and
    /// nothing is sent.
    ///
    /// On success the form is cleared and hidden and the list re-fetched.
    /// On failure the form stays open with its contents.
    pub async fn submit(&mut self) -> Result<Petition, ClientError> {
        if self.view.state.next(&FlowEvent::Submit).is_none() {
            return Err(FlowError::InvalidTransition {
                state: self.view.state,
                event: FlowEvent::Submit,
            }
            .into());
        }
        if self.view.title.trim().is_empty() || self.view.description.trim().is_empty() {
            let err = ClientError::EmptyField;
            self.view.notice = Some(format!("Error: {err}"));
            return Err(err);
        }
        self.view.apply(FlowEvent::Submit)?;

        let input = NewPetition::new(self.view.title.clone(), self.view.description.clone());
        match self.api.create(&input).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "petition created");
                self.view.apply(FlowEvent::Submitted)?;
                // The petition exists either way; a failed refresh only
                // shows up as a load error.
                let _ = self.refresh().await;
                Ok(created)
            }
            Err(e) => {
                let message = match &e {
                    ClientError::Rejected { message, .. } => message.clone(),
                    other => other.to_string(),
                };
                self.view.apply(FlowEvent::SubmitFailed(message))?;
                Err(e)
            }
        }
    }

    /// Hide the form without sending it. Inputs are kept.
    pub fn cancel_form(&mut self) -> Result<(), ClientError> {
        self.view.apply(FlowEvent::FormCancelled)?;
        Ok(())
    }
}

async fn run_verification<W: IdentityWidget>(
    api: &PetitionApi,
    widget: &W,
    config: &ClientConfig,
) -> VerificationOutcome {
    let proof = match widget.request_proof(&config.app_id, &config.action).await {
        Ok(Some(proof)) => proof,
        Ok(None) => return VerificationOutcome::Cancelled,
        Err(e) => return VerificationOutcome::Failed(e.to_string()),
    };

    tracing::info!(
        nullifier_hash = %proof.nullifier_hash,
        "proof received from widget, sending to backend"
    );

    match api.verify(&proof).await {
        Ok(response) if response.success => VerificationOutcome::Verified {
            nullifier_hash: proof.nullifier_hash,
        },
        Ok(response) => VerificationOutcome::Failed(
            response
                .detail
                .unwrap_or_else(|| "verification failed".to_string()),
        ),
        Err(e) => VerificationOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_clears_inputs_and_announces() {
        let mut view = ViewModel {
            state: ViewState::Submitting,
            title: "t".into(),
            description: "d".into(),
            ..ViewModel::default()
        };
        view.apply(FlowEvent::Submitted).unwrap();
        assert_eq!(view.state, ViewState::Idle);
        assert!(view.title.is_empty());
        assert!(view.description.is_empty());
        assert_eq!(view.notice.as_deref(), Some("Petition created!"));
    }

    #[test]
    fn submit_failure_keeps_inputs() {
        let mut view = ViewModel {
            state: ViewState::Submitting,
            title: "t".into(),
            description: "d".into(),
            ..ViewModel::default()
        };
        view.apply(FlowEvent::SubmitFailed("boom".into())).unwrap();
        assert_eq!(view.state, ViewState::FormVisible);
        assert_eq!(view.title, "t");
        assert_eq!(view.notice.as_deref(), Some("Error: boom"));
    }

    fn idle_session() -> PetitionSession<petition_nullables::NullWidget> {
        let config = ClientConfig::new(
            "http://127.0.0.1:9",
            Some("app_staging_test"),
            Some("create-petition"),
        )
        .unwrap();
        PetitionSession::new(config, petition_nullables::NullWidget::dismissing()).unwrap()
    }

    #[tokio::test]
    async fn blank_submit_while_locked_is_a_flow_error() {
        let mut session = idle_session();
        session.set_title("");
        let err = session.submit().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Flow(FlowError::InvalidTransition {
                state: ViewState::Idle,
                event: FlowEvent::Submit,
            })
        ));
        assert!(session.view().notice.is_none());
    }

    #[tokio::test]
    async fn blank_submit_with_open_form_shows_notice() {
        let mut session = idle_session();
        session.view.state = ViewState::FormVisible;
        session.set_description("x");
        let err = session.submit().await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyField));
        assert_eq!(session.view().state, ViewState::FormVisible);
        assert_eq!(
            session.view().notice.as_deref(),
            Some("Error: title and description are required")
        );
    }

    #[test]
    fn invalid_transition_leaves_state_alone() {
        let mut view = ViewModel::default();
        let err = view.apply(FlowEvent::Submitted).unwrap_err();
        assert_eq!(
            err,
            FlowError::InvalidTransition {
                state: ViewState::Idle,
                event: FlowEvent::Submitted,
            }
        );
        assert_eq!(view.state, ViewState::Idle);
        assert!(view.notice.is_none());
    }
}
