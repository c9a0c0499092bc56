//! Client side of the petitions service.
//!
//! - [`api::PetitionApi`] talks to the HTTP API.
//! - [`flow`] is the view state machine: the create form is hidden until
//!   the identity proof has been accepted by the server.
//! - [`session::PetitionSession`] drives the flow against the API and an
//!   identity widget, with a timeout and cancel path on verification.
//! - [`view::render`] prints the current view as text.

pub mod api;
pub mod config;
pub mod error;
pub mod flow;
pub mod session;
pub mod view;

pub use api::PetitionApi;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError, FlowError};
pub use flow::{FlowEvent, ViewState};
pub use session::{PetitionSession, VerificationOutcome, ViewModel};
