use petition_verification::AppIdError;
use thiserror::Error;

use crate::{FlowEvent, ViewState};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with an error body.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("invalid response from server: {0}")]
    InvalidResponse(String),

    /// Title or description is blank; nothing was sent.
    #[error("title and description are required")]
    EmptyField,

    #[error(transparent)]
    Flow(#[from] FlowError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("cannot handle {event:?} while {state:?}")]
    InvalidTransition { state: ViewState, event: FlowEvent },
}

/// Client start-up errors. All of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("app_id is not set")]
    MissingAppId,

    #[error("action is not set")]
    MissingAction,

    #[error(transparent)]
    InvalidAppId(#[from] AppIdError),

    #[error("invalid server url '{0}'")]
    InvalidServerUrl(String),
}
