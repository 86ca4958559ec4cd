use bus::CoreEvent;
use core_types::{PageId, SurfaceId};
use html::Document;

use crate::answer_source::AnswerSource;
use crate::autofill::AutofillOutcome;
use crate::injection::{InjectionController, Toggle};
use crate::markers::ProcessedMarkers;
use crate::scanner::scan;

/// One document plus the assistant state attached to it.
pub struct Page {
    page_id: PageId,
    document: Document,
    markers: ProcessedMarkers,
    controller: InjectionController,
    enabled: bool,
}

impl Page {
    pub fn new(page_id: PageId, document: Document, enabled: bool) -> Self {
        Self {
            page_id,
            document,
            markers: ProcessedMarkers::new(),
            controller: InjectionController::new(),
            enabled,
        }
    }

    pub fn id(&self) -> PageId {
        self.page_id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Host-page side mutation (scripts adding or removing markup).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn controller(&self) -> &InjectionController {
        &self.controller
    }

    pub fn markers(&self) -> &ProcessedMarkers {
        &self.markers
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Scan and inject a surface for every new question. Does nothing while disabled.
    pub fn rescan(&mut self) -> Vec<SurfaceId> {
        if !self.enabled {
            return Vec::new();
        }
        let pruned = self.controller.prune_detached(&self.document);
        if pruned > 0 {
            log::debug!("page {}: dropped {pruned} detached surface(s)", self.page_id);
        }
        let injected: Vec<SurfaceId> = scan(&self.document, &self.markers)
            .into_iter()
            .map(|resolved| {
                self.controller
                    .inject(&self.document, &mut self.markers, resolved)
            })
            .collect();
        if !injected.is_empty() {
            log::info!("page {}: {} new question(s)", self.page_id, injected.len());
        }
        injected
    }

    /// Disabling removes every surface. Processed controls stay marked, so enabling again
    /// only picks up questions that were never handled. Returns the surfaces injected by a
    /// re-enable.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<SurfaceId> {
        self.enabled = enabled;
        if enabled {
            return self.rescan();
        }
        let removed = self.controller.remove_all();
        log::info!("page {}: disabled, removed {removed} surface(s)", self.page_id);
        Vec::new()
    }

    pub fn toggle(&mut self, surface: SurfaceId, source: &mut dyn AnswerSource) -> Toggle {
        self.controller
            .toggle(&self.document, self.page_id, surface, source)
    }

    pub fn close(&mut self, surface: SurfaceId) -> bool {
        self.controller.close(surface)
    }

    pub fn accept_autofill(&mut self, surface: SurfaceId) -> Option<AutofillOutcome> {
        self.controller.accept_autofill(&mut self.document, surface)
    }

    /// React to a bus event. Events addressed to other pages are ignored. Returns whether
    /// anything on this page changed.
    pub fn handle_event(&mut self, event: &CoreEvent) -> bool {
        match event {
            CoreEvent::RescanTick { page_id } if *page_id == self.page_id => {
                !self.rescan().is_empty()
            }
            CoreEvent::SolveFinished {
                page_id,
                request_id,
                surface_id,
                result,
            } if *page_id == self.page_id => {
                self.controller
                    .complete(*surface_id, *request_id, result.clone())
            }
            CoreEvent::SettingsUpdated { extension_enabled } => {
                let changed = *extension_enabled != self.enabled;
                self.set_enabled(*extension_enabled);
                changed
            }
            _ => false,
        }
    }
}
