use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use bus::{Bus, CoreEvent};
use core_types::SurfaceId;

use crate::answer_source::{AnswerSource, BusAnswerSource};
use crate::autofill::AutofillOutcome;
use crate::injection::Toggle;
use crate::page::Page;
use crate::scheduler::RescanScheduler;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pumped {
    Handled(CoreEvent),
    Idle,
    Disconnected,
}

/// Event loop for a single page: owns the page, its answer source and its rescan timer.
pub struct ContentSession<A: AnswerSource> {
    page: Page,
    source: A,
    evt_tx: Sender<CoreEvent>,
    evt_rx: Receiver<CoreEvent>,
    interval: Duration,
    scheduler: Option<RescanScheduler>,
}

impl ContentSession<BusAnswerSource> {
    /// Session wired to a solve runtime through `bus`.
    pub fn with_bus(page: Page, bus: Bus, interval: Duration) -> io::Result<Self> {
        let Bus {
            cmd_tx,
            evt_rx,
            evt_tx,
        } = bus;
        Self::new(page, BusAnswerSource::new(cmd_tx), evt_tx, evt_rx, interval)
    }
}

impl<A: AnswerSource> ContentSession<A> {
    /// Runs the initial pass when the page is enabled and starts the scheduler.
    pub fn new(
        mut page: Page,
        source: A,
        evt_tx: Sender<CoreEvent>,
        evt_rx: Receiver<CoreEvent>,
        interval: Duration,
    ) -> io::Result<Self> {
        page.rescan();
        let mut session = Self {
            page,
            source,
            evt_tx,
            evt_rx,
            interval,
            scheduler: None,
        };
        session.sync_scheduler()?;
        Ok(session)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn source(&self) -> &A {
        &self.source
    }

    /// Sender other collaborators (settings, runtimes) can post events on.
    pub fn event_sender(&self) -> Sender<CoreEvent> {
        self.evt_tx.clone()
    }

    pub fn is_scheduling(&self) -> bool {
        self.scheduler.as_ref().is_some_and(RescanScheduler::is_running)
    }

    pub fn toggle(&mut self, surface: SurfaceId) -> Toggle {
        self.page.toggle(surface, &mut self.source)
    }

    pub fn close(&mut self, surface: SurfaceId) -> bool {
        self.page.close(surface)
    }

    pub fn accept_autofill(&mut self, surface: SurfaceId) -> Option<AutofillOutcome> {
        self.page.accept_autofill(surface)
    }

    /// Wait up to `timeout` for one event and handle it.
    pub fn pump(&mut self, timeout: Duration) -> io::Result<Pumped> {
        let event = match self.evt_rx.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return Ok(Pumped::Idle),
            Err(RecvTimeoutError::Disconnected) => return Ok(Pumped::Disconnected),
        };
        self.page.handle_event(&event);
        if matches!(event, CoreEvent::SettingsUpdated { .. }) {
            self.sync_scheduler()?;
        }
        Ok(Pumped::Handled(event))
    }

    fn sync_scheduler(&mut self) -> io::Result<()> {
        match (self.page.is_enabled(), self.scheduler.is_some()) {
            (true, false) => {
                self.scheduler = Some(RescanScheduler::start(
                    self.page.id(),
                    self.interval,
                    self.evt_tx.clone(),
                )?);
            }
            (false, true) => {
                if let Some(mut scheduler) = self.scheduler.take() {
                    scheduler.stop();
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer_source::{AnswerSourceError, SolveRequest};
    use crate::surface::SurfaceState;
    use html::parse_document;
    use std::sync::mpsc;

    #[derive(Default)]
    struct Collect(Vec<SolveRequest>);

    impl AnswerSource for Collect {
        fn request(&mut self, request: SolveRequest) -> Result<(), AnswerSourceError> {
            self.0.push(request);
            Ok(())
        }
    }

    fn session(enabled: bool) -> ContentSession<Collect> {
        let doc = parse_document(r#"<label for="q">What is your name?</label><input id="q">"#);
        let (tx, rx) = mpsc::channel();
        ContentSession::new(
            Page::new(5, doc, enabled),
            Collect::default(),
            tx,
            rx,
            Duration::from_secs(60),
        )
        .unwrap()
    }

    #[test]
    fn enabled_session_scans_and_schedules() {
        let session = session(true);
        assert_eq!(session.page().controller().surfaces().len(), 1);
        assert!(session.is_scheduling());
    }

    #[test]
    fn settings_updates_start_and_stop_the_scheduler() {
        let mut session = session(false);
        assert!(!session.is_scheduling());
        let tx = session.event_sender();
        tx.send(CoreEvent::SettingsUpdated {
            extension_enabled: true,
        })
        .unwrap();
        session.pump(Duration::from_secs(1)).unwrap();
        assert!(session.is_scheduling());
        assert_eq!(session.page().controller().surfaces().len(), 1);

        tx.send(CoreEvent::SettingsUpdated {
            extension_enabled: false,
        })
        .unwrap();
        session.pump(Duration::from_secs(1)).unwrap();
        assert!(!session.is_scheduling());
        assert!(session.page().controller().surfaces().is_empty());
    }

    #[test]
    fn solve_results_flow_back_into_the_surface() {
        let mut session = session(true);
        let surface = session.page().controller().surfaces()[0].id();
        let Toggle::Opened(request_id) = session.toggle(surface) else {
            panic!("expected open");
        };
        assert_eq!(session.source().0.len(), 1);
        session
            .event_sender()
            .send(CoreEvent::SolveFinished {
                page_id: 5,
                request_id,
                surface_id: surface,
                result: Ok("Ada".into()),
            })
            .unwrap();
        assert!(matches!(
            session.pump(Duration::from_secs(1)).unwrap(),
            Pumped::Handled(CoreEvent::SolveFinished { .. })
        ));
        assert_eq!(
            session.page().controller().surface(surface).unwrap().state(),
            &SurfaceState::Answer("Ada".into())
        );
        assert_eq!(session.pump(Duration::from_millis(10)).unwrap(), Pumped::Idle);
    }
}
