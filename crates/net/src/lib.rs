//! Client for the remote answer service.
//!
//! Calls are blocking; callers run them off the UI thread (see `runtime_solve`).
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("Server Error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid response from answer service: {0}")]
    Decode(String),
}

/// Anything that can turn a question into an answer. Implementations may block.
pub trait Solver {
    fn solve(&self, credential: &str, question: &str, context: &str) -> Result<String, SolveError>;
}

#[derive(Debug, Serialize)]
struct SolveRequestBody<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Deserialize)]
struct SolveResponseBody {
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpSolver {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpSolver {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("FormSolve/0.1")
            .build();
        Self {
            endpoint: endpoint.into(),
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Solver for HttpSolver {
    fn solve(&self, credential: &str, question: &str, context: &str) -> Result<String, SolveError> {
        let start = Instant::now();
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {credential}"))
            .set("Content-Type", "application/json")
            .send_json(SolveRequestBody { question, context });

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                log::warn!("answer service returned {status} after {} ms", start.elapsed().as_millis());
                return Err(SolveError::Status { status, body });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SolveError::Transport(transport.to_string()));
            }
        };

        let body: SolveResponseBody = response
            .into_json()
            .map_err(|e| SolveError::Decode(e.to_string()))?;
        log::debug!("answer service replied in {} ms", start.elapsed().as_millis());
        Ok(body.answer.unwrap_or_default())
    }
}
