use crate::dom::{Document, Element, NodeKind};
use crate::tokenizer::tokenize;
use crate::types::{NodeId, Token, TokenStream};

/// Parse a whole document.
pub fn parse_document(input: &str) -> Document {
    let stream = tokenize(input);
    build_dom(&stream)
}

pub fn build_dom(stream: &TokenStream) -> Document {
    let mut doc = Document::new();
    let root = doc.root();
    build_into(&mut doc, root, stream);
    doc
}

/// Append the nodes described by `stream` under `parent`.
///
/// End tags pop the open-element stack down to the nearest element with the same name; an end
/// tag with no matching open element is ignored rather than closing everything.
pub(crate) fn build_into(doc: &mut Document, parent: NodeId, stream: &TokenStream) {
    let first_new = doc.len();
    let mut open_elements: Vec<(NodeId, &str)> = Vec::new();

    for token in stream.tokens() {
        let current = open_elements.last().map_or(parent, |(id, _)| *id);
        match token {
            Token::Doctype(s) => {
                if parent == doc.root() {
                    doc.set_doctype(s.clone());
                }
            }
            Token::Comment(c) => {
                doc.push_child(current, NodeKind::Comment(c.clone()));
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    doc.push_child(current, NodeKind::Text(txt.clone()));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let id = doc.push_child(
                    current,
                    NodeKind::Element(Element::new(name.clone(), attributes.clone())),
                );
                if !*self_closing {
                    open_elements.push((id, name.as_str()));
                }
            }
            Token::EndTag(name) => {
                if let Some(pos) = open_elements.iter().rposition(|(_, open)| *open == name.as_str()) {
                    open_elements.truncate(pos);
                } else {
                    log::trace!(target: "html.dom_builder", "ignoring stray </{name}>");
                }
            }
        }
    }

    let textareas: Vec<NodeId> = (first_new..doc.len())
        .map(|i| NodeId(i as u32))
        .filter(|id| doc.element(*id).is_some_and(|e| e.is("textarea")))
        .collect();
    for id in textareas {
        doc.seed_textarea_value(id);
    }
}
