//! HTML tokenizer and arena document model for form-bearing pages.
//!
//! The document keeps live control state (`value`, `checked`) next to the markup and queues the
//! change notifications a host page would observe.

pub mod dom;
pub mod events;
pub mod form;
pub mod traverse;

mod dom_builder;
mod entities;
mod text;
mod tokenizer;
mod types;

pub use crate::dom::{Document, Element, Node, NodeKind};
pub use crate::dom_builder::{build_dom, parse_document};
pub use crate::events::{DomEvent, DomEventKind};
pub use crate::form::{InputControlType, input_control_type};
pub use crate::tokenizer::tokenize;
pub use crate::types::{Attribute, NodeId, Token, TokenStream};
