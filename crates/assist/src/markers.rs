use std::collections::HashSet;

use html::NodeId;

use crate::scanner::Candidate;

/// Side table of controls that already carry an affordance.
///
/// Choice groups are recorded by name as well, so a later pass never promotes another member
/// of a handled group to representative.
#[derive(Debug, Default, Clone)]
pub struct ProcessedMarkers {
    elements: HashSet<NodeId>,
    groups: HashSet<String>,
}

impl ProcessedMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, candidate: &Candidate) {
        self.elements.insert(candidate.element);
        if let Some(name) = candidate.group_name() {
            self.groups.insert(name.to_string());
        }
    }

    pub fn is_processed(&self, id: NodeId) -> bool {
        self.elements.contains(&id)
    }

    pub fn is_group_processed(&self, name: &str) -> bool {
        self.groups.contains(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
