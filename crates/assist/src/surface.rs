//! Per-question answer surface: trigger plus popup state.
use core_types::{RequestId, SurfaceId};
use html::{Document, NodeId};

use crate::scanner::Candidate;

pub const PRODUCT_NAME: &str = "FormSolve";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    Hidden,
    Loading,
    Answer(String),
    /// Failure reported by the answer source; shown with an `Error:` prefix.
    Error(String),
    /// Message raised locally (empty answer, runtime gone); shown as is.
    Notice(String),
}

impl SurfaceState {
    pub fn is_shown(&self) -> bool {
        !matches!(self, SurfaceState::Hidden)
    }
}

/// Where the affordance sits relative to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAnchor {
    /// Immediately after this node.
    After(NodeId),
    /// Last child of this container.
    AppendTo(NodeId),
}

impl SurfaceAnchor {
    /// Free text goes right after the control. A radio goes at the end of its `fieldset`, else
    /// its `div[role=radiogroup]`, else its grandparent element.
    pub fn for_candidate(doc: &Document, candidate: &Candidate) -> Self {
        let element = candidate.element;
        if !candidate.is_choice() {
            return SurfaceAnchor::After(element);
        }
        doc.closest(element, "fieldset")
            .or_else(|| {
                doc.closest_matching(element, |e| {
                    e.is("div") && e.attr("role").is_some_and(|r| r.eq_ignore_ascii_case("radiogroup"))
                })
            })
            .or_else(|| doc.parent_element(element).and_then(|p| doc.parent_element(p)))
            .map_or(SurfaceAnchor::After(element), SurfaceAnchor::AppendTo)
    }
}

#[derive(Debug, Clone)]
pub struct AnswerSurface {
    id: SurfaceId,
    candidate: Candidate,
    question: String,
    context: Option<String>,
    anchor: SurfaceAnchor,
    state: SurfaceState,
    pending: Option<RequestId>,
}

impl AnswerSurface {
    pub(crate) fn new(
        id: SurfaceId,
        candidate: Candidate,
        question: String,
        context: Option<String>,
        anchor: SurfaceAnchor,
    ) -> Self {
        Self {
            id,
            candidate,
            question,
            context,
            anchor,
            state: SurfaceState::Hidden,
            pending: None,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    /// Context captured when the surface was injected or last opened.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn anchor(&self) -> SurfaceAnchor {
        self.anchor
    }

    pub fn state(&self) -> &SurfaceState {
        &self.state
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn is_shown(&self) -> bool {
        self.state.is_shown()
    }

    /// Tooltip of the trigger.
    pub fn title(&self) -> String {
        format!("Solve with {PRODUCT_NAME}\nQuestion: {}", self.question)
    }

    /// Popup body text; `None` while hidden.
    pub fn render(&self) -> Option<String> {
        match &self.state {
            SurfaceState::Hidden => None,
            SurfaceState::Loading => Some("Generating...".to_string()),
            SurfaceState::Answer(answer) => Some(format!("Answer:\n{answer}")),
            SurfaceState::Error(message) => Some(format!("Error: {message}")),
            SurfaceState::Notice(message) => Some(message.clone()),
        }
    }

    pub(crate) fn begin_loading(&mut self, request_id: RequestId, context: Option<String>) {
        self.context = context;
        self.pending = Some(request_id);
        self.state = SurfaceState::Loading;
    }

    pub(crate) fn settle(&mut self, state: SurfaceState) {
        self.pending = None;
        self.state = state;
    }

    /// Hide and forget any outstanding request; a late result for it is dropped.
    pub(crate) fn hide(&mut self) {
        self.pending = None;
        self.state = SurfaceState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::CandidateKind;
    use html::parse_document;

    fn anchor_of(html: &str, control: &str) -> (Document, SurfaceAnchor) {
        let doc = parse_document(html);
        let id = doc.element_by_id(control).unwrap();
        let candidate = Candidate::classify(&doc, id).unwrap();
        let anchor = SurfaceAnchor::for_candidate(&doc, &candidate);
        (doc, anchor)
    }

    #[test]
    fn text_inputs_anchor_after_themselves() {
        let (doc, anchor) = anchor_of(r#"<fieldset><input id="a"></fieldset>"#, "a");
        assert_eq!(anchor, SurfaceAnchor::After(doc.element_by_id("a").unwrap()));
    }

    #[test]
    fn radios_prefer_fieldset_then_radiogroup_then_grandparent() {
        let (doc, anchor) = anchor_of(
            r#"<fieldset id="f"><div role="radiogroup"><input type="radio" id="a"></div></fieldset>"#,
            "a",
        );
        assert_eq!(anchor, SurfaceAnchor::AppendTo(doc.element_by_id("f").unwrap()));

        let (doc, anchor) = anchor_of(
            r#"<div id="g" role="RadioGroup"><span><input type="radio" id="a"></span></div>"#,
            "a",
        );
        assert_eq!(anchor, SurfaceAnchor::AppendTo(doc.element_by_id("g").unwrap()));

        let (doc, anchor) = anchor_of(
            r#"<section id="s"><p><input type="radio" id="a"></p></section>"#,
            "a",
        );
        assert_eq!(anchor, SurfaceAnchor::AppendTo(doc.element_by_id("s").unwrap()));

        let (doc, anchor) = anchor_of(r#"<p><input type="radio" id="a"></p>"#, "a");
        assert_eq!(anchor, SurfaceAnchor::After(doc.element_by_id("a").unwrap()));
    }

    #[test]
    fn render_and_title() {
        let candidate = Candidate {
            element: NodeId(1),
            kind: CandidateKind::FreeText,
        };
        let mut surface = AnswerSurface::new(
            SurfaceId(0),
            candidate,
            "What is your name?".into(),
            None,
            SurfaceAnchor::After(NodeId(1)),
        );
        assert_eq!(surface.title(), "Solve with FormSolve\nQuestion: What is your name?");
        assert_eq!(surface.render(), None);
        surface.begin_loading(4, None);
        assert_eq!(surface.render().as_deref(), Some("Generating..."));
        assert_eq!(surface.pending_request(), Some(4));
        surface.settle(SurfaceState::Answer("Paris".into()));
        assert_eq!(surface.render().as_deref(), Some("Answer:\nParis"));
        assert_eq!(surface.pending_request(), None);
        surface.settle(SurfaceState::Error("Server Error: 500 - timeout".into()));
        assert_eq!(surface.render().as_deref(), Some("Error: Server Error: 500 - timeout"));
        surface.settle(SurfaceState::Notice("Could not generate an answer.".into()));
        assert_eq!(surface.render().as_deref(), Some("Could not generate an answer."));
        assert!(surface.is_shown());
        surface.hide();
        assert!(!surface.is_shown());
    }
}
