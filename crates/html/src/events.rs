use crate::types::NodeId;

/// Standard notifications raised when a control's value changes programmatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomEventKind {
    /// The value changed (`input`).
    Input,
    /// The value was committed (`change`).
    Change,
}

impl DomEventKind {
    pub fn name(self) -> &'static str {
        match self {
            DomEventKind::Input => "input",
            DomEventKind::Change => "change",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomEvent {
    pub target: NodeId,
    pub kind: DomEventKind,
    pub bubbles: bool,
}
