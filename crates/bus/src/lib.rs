use core_types::{PageId, RequestId, SurfaceId};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    // UI -> answer runtime
    Solve {
        page_id: PageId,
        request_id: RequestId,
        surface_id: SurfaceId,
        question: String,
        context: String,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    // Scheduler -> UI
    RescanTick {
        page_id: PageId,
    },
    // Answer runtime -> UI
    SolveFinished {
        page_id: PageId,
        request_id: RequestId,
        surface_id: SurfaceId,
        result: Result<String, String>,
    },
    // Settings -> UI
    SettingsUpdated {
        extension_enabled: bool,
    },
}

pub struct Bus {
    pub cmd_tx: Sender<CoreCommand>,
    pub evt_rx: Receiver<CoreEvent>,
    pub evt_tx: Sender<CoreEvent>, // shareable for runtimes
}

impl Bus {
    /// Create the UI side of the bus plus the command receiver a runtime consumes.
    pub fn new() -> (Self, Receiver<CoreCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();
        (
            Self {
                cmd_tx,
                evt_rx,
                evt_tx,
            },
            cmd_rx,
        )
    }
}
