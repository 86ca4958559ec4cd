use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use bus::CoreEvent;
use core_types::PageId;

pub const RESCAN_INTERVAL: Duration = Duration::from_millis(3000);

/// Periodic `RescanTick` source for one page.
///
/// Ticks are delivered through the page's event channel, so passes run on the page's own
/// loop and never overlap.
pub struct RescanScheduler {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RescanScheduler {
    /// A zero `interval` is rejected with `InvalidInput`.
    pub fn start(page_id: PageId, interval: Duration, evt_tx: Sender<CoreEvent>) -> io::Result<Self> {
        if interval.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "rescan interval must be non-zero",
            ));
        }
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name(format!("rescan-{page_id}"))
            .spawn(move || {
                let mut deadline = Instant::now() + interval;
                loop {
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    let now = Instant::now();
                    if now < deadline {
                        thread::park_timeout(deadline - now);
                        continue;
                    }
                    if evt_tx.send(CoreEvent::RescanTick { page_id }).is_err() {
                        break;
                    }
                    deadline += interval;
                }
                log::debug!(target: "assist.scheduler", "rescan scheduler for page {page_id} stopped");
            })?;
        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

impl Drop for RescanScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
