//! Option labels and the context string sent alongside a choice-group question.
use html::{Document, InputControlType, NodeId, input_control_type};

use crate::text_resolver::label_text;

pub const OPTIONS_PREFIX: &str = "Available options: ";
pub const OPTION_SEPARATOR: &str = " || ";

/// Group name of a radio, if it has a non-empty one.
pub fn group_name(doc: &Document, id: NodeId) -> Option<&str> {
    if input_control_type(doc, id) != InputControlType::Radio {
        return None;
    }
    doc.attr(id, "name").filter(|name| !name.is_empty())
}

/// Every connected radio named `name`, in document order. Groups span the whole document.
pub fn group_members(doc: &Document, name: &str) -> Vec<NodeId> {
    doc.elements_named("input")
        .filter(|id| input_control_type(doc, *id) == InputControlType::Radio)
        .filter(|id| doc.attr(*id, "name") == Some(name))
        .collect()
}

/// Display text of one option.
///
/// A following text node claims the option as soon as it is non-empty, even when it is only
/// whitespace; the option then trims to `""` and drops out of the context. Only when no
/// source has text does the control's value stand in, verbatim.
pub fn option_label(doc: &Document, id: NodeId) -> String {
    label_text(doc, id)
        .or_else(|| following_text(doc, id))
        .or_else(|| {
            doc.next_element_sibling(id)
                .map(|next| doc.inner_text(next))
                .filter(|text| !text.is_empty())
        })
        .map(|text| text.trim().to_string())
        .unwrap_or_else(|| doc.value(id).unwrap_or_default().to_string())
}

fn following_text(doc: &Document, id: NodeId) -> Option<String> {
    doc.next_sibling(id)
        .and_then(|next| doc.node(next))
        .and_then(|node| node.as_text())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// `Available options: A || B || C` for the group `representative` belongs to; `None` for
/// controls outside a named group.
pub fn build_context(doc: &Document, representative: NodeId) -> Option<String> {
    let name = group_name(doc, representative)?;
    let labels: Vec<String> = group_members(doc, name)
        .into_iter()
        .map(|member| option_label(doc, member))
        .filter(|label| !label.is_empty())
        .collect();
    Some(format!("{OPTIONS_PREFIX}{}", labels.join(OPTION_SEPARATOR)))
}
