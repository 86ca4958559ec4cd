use std::sync::mpsc::Sender;

use bus::CoreCommand;
use core_types::{PageId, RequestId, SurfaceId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveRequest {
    pub page_id: PageId,
    pub request_id: RequestId,
    pub surface_id: SurfaceId,
    pub question: String,
    /// Empty when the control has no options.
    pub context: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnswerSourceError {
    #[error("the answer runtime is not running")]
    Disconnected,
}

/// Non-blocking hand-off of a question. The answer comes back later as
/// `CoreEvent::SolveFinished`.
pub trait AnswerSource {
    fn request(&mut self, request: SolveRequest) -> Result<(), AnswerSourceError>;
}

/// Forwards requests to the solve runtime over the command bus.
pub struct BusAnswerSource {
    cmd_tx: Sender<CoreCommand>,
}

impl BusAnswerSource {
    pub fn new(cmd_tx: Sender<CoreCommand>) -> Self {
        Self { cmd_tx }
    }
}

impl AnswerSource for BusAnswerSource {
    fn request(&mut self, request: SolveRequest) -> Result<(), AnswerSourceError> {
        self.cmd_tx
            .send(CoreCommand::Solve {
                page_id: request.page_id,
                request_id: request.request_id,
                surface_id: request.surface_id,
                question: request.question,
                context: request.context,
            })
            .map_err(|_| AnswerSourceError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn request() -> SolveRequest {
        SolveRequest {
            page_id: 1,
            request_id: 2,
            surface_id: SurfaceId(3),
            question: "Why?".into(),
            context: String::new(),
        }
    }

    #[test]
    fn forwards_as_solve_command() {
        let (tx, rx) = mpsc::channel();
        let mut source = BusAnswerSource::new(tx);
        source.request(request()).unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            CoreCommand::Solve {
                page_id: 1,
                request_id: 2,
                surface_id: SurfaceId(3),
                question: "Why?".into(),
                context: String::new(),
            }
        );
    }

    #[test]
    fn dropped_runtime_is_reported() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut source = BusAnswerSource::new(tx);
        assert_eq!(source.request(request()), Err(AnswerSourceError::Disconnected));
    }
}
