// feastly/src/error.rs

use crate::flow::FlowError;
use thiserror::Error;

/// Fallback shown to the user when an error carries no server message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("HTTP error calling {endpoint}: {source}")]
  Http {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  /// The API answered with a non-2xx status. `message` is the server's own text when it sent one.
  #[error("{endpoint} returned {status}: {message}")]
  Api {
    endpoint: String,
    status: u16,
    message: String,
  },

  #[error("Failed to decode response from {endpoint}: {source}")]
  Decode {
    endpoint: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Not signed in")]
  Unauthenticated,

  #[error("Storage Error: {0}")]
  Storage(String),

  #[error("Serialization Error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl StoreError {
  /// Text suitable for a toast: the API's message when there is one, a generic fallback otherwise.
  pub fn user_message(&self) -> String {
    match self {
      StoreError::Api { message, .. } if !message.trim().is_empty() => message.clone(),
      StoreError::Validation(m) => m.clone(),
      StoreError::Unauthenticated => "Please sign in to continue.".to_string(),
      StoreError::Http { source, .. } if source.is_timeout() => {
        "The server took too long to respond. Please try again.".to_string()
      }
      _ => GENERIC_ERROR_MESSAGE.to_string(),
    }
  }

  pub fn status(&self) -> Option<u16> {
    match self {
      StoreError::Api { status, .. } => Some(*status),
      StoreError::Unauthenticated => Some(401),
      _ => None,
    }
  }
}

// Step handlers inside workflows may bubble up anyhow errors.
impl From<anyhow::Error> for StoreError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<StoreError>() {
      Ok(store_err) => store_err,
      Err(other) => StoreError::Workflow {
        source: FlowError::from(other),
      },
    }
  }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
