use std::collections::HashSet;

use html::{Document, InputControlType, NodeId, input_control_type};

use crate::context::{build_context, group_name};
use crate::markers::ProcessedMarkers;
use crate::text_resolver::{is_long_enough, resolve_question};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateKind {
    /// Single-line text input or textarea.
    FreeText,
    /// Radio button; `name` is `None` for a radio outside any named group.
    ChoiceGroup { name: Option<String> },
}

/// A control eligible for question extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub element: NodeId,
    pub kind: CandidateKind,
}

impl Candidate {
    /// Classify `id`; `None` for anything that is not a text input, textarea or radio.
    pub fn classify(doc: &Document, id: NodeId) -> Option<Self> {
        let kind = match input_control_type(doc, id) {
            InputControlType::Text | InputControlType::Textarea => CandidateKind::FreeText,
            InputControlType::Radio => CandidateKind::ChoiceGroup {
                name: group_name(doc, id).map(str::to_string),
            },
            InputControlType::Checkbox | InputControlType::Hidden | InputControlType::Other => {
                return None;
            }
        };
        Some(Self { element: id, kind })
    }

    pub fn group_name(&self) -> Option<&str> {
        match &self.kind {
            CandidateKind::ChoiceGroup { name } => name.as_deref(),
            CandidateKind::FreeText => None,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, CandidateKind::ChoiceGroup { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuestion {
    pub candidate: Candidate,
    pub question: String,
    pub context: Option<String>,
}

/// One pass over the document. Pure: marking happens when an affordance is injected, so a
/// control whose question cannot be resolved yet is retried on the next pass.
pub fn scan(doc: &Document, markers: &ProcessedMarkers) -> Vec<ResolvedQuestion> {
    let mut seen_groups: HashSet<&str> = HashSet::new();
    let mut found = Vec::new();

    for id in doc.elements() {
        let Some(candidate) = Candidate::classify(doc, id) else {
            continue;
        };
        if markers.is_processed(id) || doc.is_style_hidden(id) {
            continue;
        }
        if let Some(name) = group_name(doc, id) {
            if markers.is_group_processed(name) || !seen_groups.insert(name) {
                continue;
            }
        }

        let Some(question) = resolve_question(doc, id).filter(|q| is_long_enough(q)) else {
            log::trace!(target: "assist.scan", "no usable question for {id:?}");
            continue;
        };
        let context = candidate
            .is_choice()
            .then(|| build_context(doc, id))
            .flatten();
        found.push(ResolvedQuestion {
            candidate,
            question,
            context,
        });
    }

    log::debug!(target: "assist.scan", "scan found {} question(s)", found.len());
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_document;

    fn questions(doc: &Document, markers: &ProcessedMarkers) -> Vec<String> {
        scan(doc, markers).into_iter().map(|q| q.question).collect()
    }

    #[test]
    fn collects_text_inputs_textareas_and_radio_groups() {
        let doc = parse_document(
            r#"<form>
                <label for="n">What is your name?</label><input id="n" type="text">
                <label for="bio">Tell us about yourself</label><textarea id="bio"></textarea>
                <label for="u">Untyped input field</label><input id="u">
                <label for="e">Your email address</label><input id="e" type="email">
                <label for="h">Hidden field label</label><input id="h" type="hidden">
                <label for="x">Checkbox question?</label><input id="x" type="checkbox">
            </form>"#,
        );
        assert_eq!(
            questions(&doc, &ProcessedMarkers::new()),
            vec!["What is your name?", "Tell us about yourself", "Untyped input field"]
        );
    }

    #[test]
    fn one_question_per_radio_group() {
        let doc = parse_document(
            r#"<fieldset><legend>Pick a colour?</legend>
                <input type="radio" name="c" value="r"> Red
                <input type="radio" name="c" value="g"> Green
            </fieldset>
            <div>Are you sure?<input type="radio" value="y"><input type="radio" value="n"></div>"#,
        );
        let found = scan(&doc, &ProcessedMarkers::new());
        assert_eq!(found.len(), 3, "one named group plus two unnamed radios");
        assert_eq!(found[0].question, "Pick a colour?");
        assert_eq!(
            found[0].candidate.kind,
            CandidateKind::ChoiceGroup {
                name: Some("c".into())
            }
        );
        assert_eq!(
            found[0].context.as_deref(),
            Some("Available options: Red || Green")
        );
        assert_eq!(found[1].question, "Are you sure?");
        assert_eq!(found[1].context, None);
    }

    #[test]
    fn skips_style_hidden_and_short_questions() {
        let doc = parse_document(
            r#"<label for="a">Hidden question?</label><input id="a" style="display: none">
               <label for="b">Hi</label><input id="b">"#,
        );
        assert!(scan(&doc, &ProcessedMarkers::new()).is_empty());
    }

    #[test]
    fn hidden_group_member_does_not_claim_the_group() {
        let doc = parse_document(
            r#"<input type="radio" name="g" id="a" style="display:none">
               <label for="b">Visible option</label><input type="radio" name="g" id="b">"#,
        );
        let found = scan(&doc, &ProcessedMarkers::new());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].candidate.element, doc.element_by_id("b").unwrap());
    }

    #[test]
    fn processed_group_is_not_rediscovered_through_another_member() {
        let doc = parse_document(
            r#"<label for="a">First option</label><input type="radio" name="g" id="a">
               <label for="b">Second option</label><input type="radio" name="g" id="b">"#,
        );
        let mut markers = ProcessedMarkers::new();
        let first = scan(&doc, &markers);
        assert_eq!(first.len(), 1);
        markers.mark(&first[0].candidate);
        assert!(scan(&doc, &markers).is_empty());
    }

    #[test]
    fn unresolved_representative_skips_its_group_for_the_pass() {
        let doc = parse_document(
            r#"<input type="radio" name="g" id="a"><label for="b">Second option</label><input type="radio" name="g" id="b">"#,
        );
        assert!(scan(&doc, &ProcessedMarkers::new()).is_empty());
    }
}
