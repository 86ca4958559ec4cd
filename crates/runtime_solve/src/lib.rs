//! Background worker that answers `CoreCommand::Solve` requests.
//!
//! Credential pre-conditions are checked here, so the UI side only ever sees an answer or a
//! human-readable error.
use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use bus::{CoreCommand, CoreEvent};
use core_types::{PageId, RequestId, SurfaceId};
use net::Solver;

pub const SIGN_IN_REQUIRED: &str = "Please sign in from the settings to use FormSolve.";
pub const SUBSCRIPTION_REQUIRED: &str =
    "Active subscription required. Please upgrade your plan.";

/// The part of the session the worker needs for each request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub auth_token: Option<String>,
    pub subscription_active: bool,
}

/// Source of the current credentials. Read on every request so sign-in and sign-out take
/// effect without restarting the worker.
pub trait SessionSource: Send + Sync {
    fn credentials(&self) -> Credentials;
}

impl SessionSource for Credentials {
    fn credentials(&self) -> Credentials {
        self.clone()
    }
}

/// Returns the bearer credential, or the message to show when a pre-condition fails.
pub fn check_preconditions(credentials: &Credentials) -> Result<String, String> {
    let token = credentials
        .auth_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SIGN_IN_REQUIRED.to_string())?;
    if !credentials.subscription_active {
        return Err(SUBSCRIPTION_REQUIRED.to_string());
    }
    Ok(token.to_string())
}

pub fn start_solve_runtime<S>(
    cmd_rx: Receiver<CoreCommand>,
    evt_tx: Sender<CoreEvent>,
    solver: Arc<S>,
    sessions: Arc<dyn SessionSource>,
) -> io::Result<JoinHandle<()>>
where
    S: Solver + Send + Sync + 'static,
{
    thread::Builder::new()
        .name("solve-runtime".into())
        .spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    CoreCommand::Solve {
                        page_id,
                        request_id,
                        surface_id,
                        question,
                        context,
                    } => {
                        let reply = Reply {
                            page_id,
                            request_id,
                            surface_id,
                            evt_tx: evt_tx.clone(),
                        };
                        let token = match check_preconditions(&sessions.credentials()) {
                            Ok(token) => token,
                            Err(message) => {
                                log::info!("solve {request_id} rejected: {message}");
                                reply.send(Err(message));
                                continue;
                            }
                        };
                        spawn_request(Arc::clone(&solver), token, question, context, reply);
                    }
                    CoreCommand::Shutdown => break,
                }
            }
            log::debug!("solve runtime stopped");
        })
}

#[derive(Clone)]
struct Reply {
    page_id: PageId,
    request_id: RequestId,
    surface_id: SurfaceId,
    evt_tx: Sender<CoreEvent>,
}

impl Reply {
    fn send(self, result: Result<String, String>) {
        let sent = self.evt_tx.send(CoreEvent::SolveFinished {
            page_id: self.page_id,
            request_id: self.request_id,
            surface_id: self.surface_id,
            result,
        });
        if sent.is_err() {
            log::warn!("dropping result for request {}: event channel closed", self.request_id);
        }
    }
}

// One thread per request: several questions may be outstanding at once.
fn spawn_request<S>(solver: Arc<S>, token: String, question: String, context: String, reply: Reply)
where
    S: Solver + Send + Sync + 'static,
{
    let request_id = reply.request_id;
    let fallback = reply.clone();
    let spawned = thread::Builder::new()
        .name(format!("solve-request-{request_id}"))
        .spawn(move || {
            let result = solver
                .solve(&token, &question, &context)
                .map_err(|e| e.to_string());
            if let Err(message) = &result {
                log::warn!("solve {request_id} failed: {message}");
            }
            reply.send(result);
        });
    if let Err(e) = spawned {
        log::error!("could not start thread for solve {request_id}: {e}");
        fallback.send(Err(format!("Extension error: could not start request ({e})")));
    }
}
