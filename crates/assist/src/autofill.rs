//! Writes an accepted answer back into the document.
use html::{Document, DomEventKind, NodeId};

use crate::context::{group_members, option_label};
use crate::scanner::{Candidate, CandidateKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofillOutcome {
    ValueSet(NodeId),
    Selected(NodeId),
    NoMatch,
}

pub fn apply(doc: &mut Document, candidate: &Candidate, answer: &str) -> AutofillOutcome {
    match &candidate.kind {
        CandidateKind::FreeText => {
            let id = candidate.element;
            if !doc.set_value(id, answer) {
                return AutofillOutcome::NoMatch;
            }
            notify(doc, id);
            AutofillOutcome::ValueSet(id)
        }
        CandidateKind::ChoiceGroup { name: Some(name) } => {
            match matching_option(doc, name, answer) {
                Some(id) => {
                    doc.set_checked(id, true);
                    notify(doc, id);
                    AutofillOutcome::Selected(id)
                }
                None => {
                    log::debug!(target: "assist.autofill", "no option of {name:?} matches the answer");
                    AutofillOutcome::NoMatch
                }
            }
        }
        CandidateKind::ChoiceGroup { name: None } => AutofillOutcome::NoMatch,
    }
}

/// First member, in document order, whose label contains the answer or is contained in it,
/// ignoring case. The answer is compared as given, surrounding whitespace included; an empty
/// answer matches nothing.
pub fn matching_option(doc: &Document, group: &str, answer: &str) -> Option<NodeId> {
    let answer = answer.to_lowercase();
    if answer.is_empty() {
        return None;
    }
    group_members(doc, group).into_iter().find(|member| {
        let label = option_label(doc, *member).to_lowercase();
        !label.is_empty() && (answer.contains(&label) || label.contains(&answer))
    })
}

fn notify(doc: &mut Document, id: NodeId) {
    doc.dispatch_event(id, DomEventKind::Input);
    doc.dispatch_event(id, DomEventKind::Change);
}
