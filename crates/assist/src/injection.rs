//! Lifecycle of answer surfaces: injection, open/close, request routing, and autofill.
use core_types::{PageId, RequestId, SurfaceId};
use html::Document;

use crate::answer_source::{AnswerSource, SolveRequest};
use crate::autofill::{self, AutofillOutcome};
use crate::context::build_context;
use crate::markers::ProcessedMarkers;
use crate::scanner::ResolvedQuestion;
use crate::surface::{AnswerSurface, SurfaceAnchor, SurfaceState};

pub const RUNTIME_UNAVAILABLE: &str = "Extension error: the answer runtime is not running.";
pub const EMPTY_ANSWER: &str = "Could not generate an answer.";

/// What a trigger click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Opened(RequestId),
    Closed,
    /// Opened, but the request could not be handed off; the surface shows the error.
    Failed,
    Unknown,
}

/// Owns every surface on a page. At most one surface is shown at a time: opening one hides
/// the rest first.
#[derive(Debug, Default)]
pub struct InjectionController {
    surfaces: Vec<AnswerSurface>,
    next_surface: u32,
    next_request: RequestId,
}

impl InjectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface to the question's control and mark the control processed.
    pub fn inject(
        &mut self,
        doc: &Document,
        markers: &mut ProcessedMarkers,
        resolved: ResolvedQuestion,
    ) -> SurfaceId {
        markers.mark(&resolved.candidate);
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        let anchor = SurfaceAnchor::for_candidate(doc, &resolved.candidate);
        log::debug!(
            target: "assist.inject",
            "surface {id:?} for {:?} at {anchor:?}: {}",
            resolved.candidate.element,
            resolved.question
        );
        self.surfaces.push(AnswerSurface::new(
            id,
            resolved.candidate,
            resolved.question,
            resolved.context,
            anchor,
        ));
        id
    }

    pub fn surfaces(&self) -> &[AnswerSurface] {
        &self.surfaces
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&AnswerSurface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut AnswerSurface> {
        self.surfaces.iter_mut().find(|s| s.id() == id)
    }

    pub fn open_surface(&self) -> Option<SurfaceId> {
        self.surfaces.iter().find(|s| s.is_shown()).map(AnswerSurface::id)
    }

    pub fn shown_count(&self) -> usize {
        self.surfaces.iter().filter(|s| s.is_shown()).count()
    }

    /// Trigger click. A shown surface is hidden; a hidden one is opened and a fresh request
    /// is sent with the group's options as they are right now.
    pub fn toggle(
        &mut self,
        doc: &Document,
        page_id: PageId,
        id: SurfaceId,
        source: &mut dyn AnswerSource,
    ) -> Toggle {
        let Some(surface) = self.surface(id) else {
            return Toggle::Unknown;
        };
        if surface.is_shown() {
            self.close(id);
            return Toggle::Closed;
        }
        let candidate = surface.candidate().clone();
        let question = surface.question().to_string();

        for other in &mut self.surfaces {
            other.hide();
        }

        let context = candidate
            .is_choice()
            .then(|| build_context(doc, candidate.element))
            .flatten();
        let request_id = self.next_request;
        self.next_request += 1;

        let request = SolveRequest {
            page_id,
            request_id,
            surface_id: id,
            question,
            context: context.clone().unwrap_or_default(),
        };
        let sent = source.request(request);
        let Some(surface) = self.surface_mut(id) else {
            return Toggle::Unknown;
        };
        surface.begin_loading(request_id, context);
        match sent {
            Ok(()) => Toggle::Opened(request_id),
            Err(e) => {
                log::warn!("could not dispatch request {request_id}: {e}");
                surface.settle(SurfaceState::Notice(RUNTIME_UNAVAILABLE.to_string()));
                Toggle::Failed
            }
        }
    }

    /// Close control. Any outstanding answer for this surface will be dropped.
    pub fn close(&mut self, id: SurfaceId) -> bool {
        match self.surface_mut(id) {
            Some(surface) => {
                surface.hide();
                true
            }
            None => false,
        }
    }

    /// Apply an answer-source result. Returns false when the result is stale: the surface is
    /// gone, was closed, or has since started another request.
    pub fn complete(
        &mut self,
        id: SurfaceId,
        request_id: RequestId,
        result: Result<String, String>,
    ) -> bool {
        let Some(surface) = self.surface_mut(id) else {
            return false;
        };
        if surface.pending_request() != Some(request_id) {
            log::debug!(target: "assist.inject", "dropping stale result {request_id} for {id:?}");
            return false;
        }
        let state = match result {
            Ok(answer) if answer.is_empty() => SurfaceState::Notice(EMPTY_ANSWER.to_string()),
            Ok(answer) => SurfaceState::Answer(answer),
            Err(message) => SurfaceState::Error(message),
        };
        surface.settle(state);
        true
    }

    /// Autofill control. Only available while the surface shows an answer; hides it afterwards.
    pub fn accept_autofill(&mut self, doc: &mut Document, id: SurfaceId) -> Option<AutofillOutcome> {
        let surface = self.surface_mut(id)?;
        let SurfaceState::Answer(answer) = surface.state() else {
            return None;
        };
        let outcome = autofill::apply(doc, surface.candidate(), answer);
        surface.hide();
        Some(outcome)
    }

    /// Drop surfaces whose control has left the document.
    pub fn prune_detached(&mut self, doc: &Document) -> usize {
        let before = self.surfaces.len();
        self.surfaces.retain(|s| doc.is_connected(s.candidate().element));
        before - self.surfaces.len()
    }

    pub fn remove_all(&mut self) -> usize {
        let removed = self.surfaces.len();
        self.surfaces.clear();
        removed
    }
}
