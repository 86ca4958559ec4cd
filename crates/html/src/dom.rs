use crate::events::{DomEvent, DomEventKind};
use crate::form::{InputControlType, form_owner_scope, input_control_type, textarea_initial_value};
use crate::text::collect_inner_text;
use crate::traverse::{AncestorElements, Descendants};
use crate::types::{Attribute, NodeId};

#[derive(Debug, Clone)]
pub enum NodeKind {
    Document { doctype: Option<String> },
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// An element with its markup attributes and live form state.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    style: Vec<(String, String)>,
    value: String,
    checked: bool,
}

impl Element {
    pub(crate) fn new(name: String, attributes: Vec<Attribute>) -> Self {
        let style = attributes
            .iter()
            .find(|(k, _)| k == "style")
            .and_then(|(_, v)| v.as_deref())
            .map(parse_inline_style)
            .unwrap_or_default();
        let checked = attributes.iter().any(|(k, _)| k == "checked");
        Self {
            name,
            attributes,
            style,
            value: String::new(),
            checked,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Inline style declarations in source order, property names lowercased.
    pub fn style(&self) -> &[(String, String)] {
        &self.style
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn checked(&self) -> bool {
        self.checked
    }
}

fn parse_inline_style(source: &str) -> Vec<(String, String)> {
    source
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Arena-backed document tree.
///
/// Node ids are stable for the lifetime of the document: removing a node only detaches it,
/// so an id held by a caller never starts pointing at a different node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    events: Vec<DomEvent>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document { doctype: None },
            }],
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::as_element)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn doctype(&self) -> Option<&str> {
        match &self.nodes[0].kind {
            NodeKind::Document { doctype } => doctype.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn set_doctype(&mut self, doctype: String) {
        if let NodeKind::Document { doctype: slot } = &mut self.nodes[0].kind {
            *slot = Some(doctype);
        }
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let is_textarea = matches!(&kind, NodeKind::Element(e) if e.is("textarea"));
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.index()].children.push(id);
        if !is_textarea {
            self.seed_value(id);
        }
        id
    }

    /// Initial control value for inputs; textareas are seeded once their content is known.
    fn seed_value(&mut self, id: NodeId) {
        let control = input_control_type(self, id);
        let Some(element) = self.element_mut(id) else {
            return;
        };
        element.value = match control {
            InputControlType::Radio | InputControlType::Checkbox => {
                element.attr("value").unwrap_or("on").to_string()
            }
            _ => element.attr("value").unwrap_or("").to_string(),
        };
    }

    pub(crate) fn seed_textarea_value(&mut self, id: NodeId) {
        let initial = textarea_initial_value(&self.text_content(id));
        if let Some(element) = self.element_mut(id) {
            element.value = initial;
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|p| self.element(*p).is_some())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    fn sibling_index(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|c| *c == id)?;
        Some((parent, index))
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(id)?;
        index
            .checked_sub(1)
            .map(|prev| self.children(parent)[prev])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|c| self.element(*c).is_some())
    }

    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    pub fn ancestor_elements(&self, id: NodeId) -> AncestorElements<'_> {
        AncestorElements::new(self, id)
    }

    /// Every connected element in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(self.root())
            .filter(|id| self.element(*id).is_some())
    }

    pub fn elements_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.elements()
            .filter(move |id| self.element(*id).is_some_and(|e| e.is(tag)))
    }

    /// First connected element whose `id` attribute equals `value`.
    pub fn element_by_id(&self, value: &str) -> Option<NodeId> {
        if value.is_empty() {
            return None;
        }
        self.elements().find(|id| self.attr(*id, "id") == Some(value))
    }

    /// First connected `label` whose `for` attribute equals `control_id`.
    pub fn label_for(&self, control_id: &str) -> Option<NodeId> {
        if control_id.is_empty() {
            return None;
        }
        self.elements_named("label")
            .find(|id| self.attr(*id, "for") == Some(control_id))
    }

    /// Nearest inclusive ancestor element named `tag`.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.closest_matching(id, |e| e.is(tag))
    }

    pub fn closest_matching(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .filter(|id| self.element(*id).is_some())
            .chain(self.ancestor_elements(id))
            .find(|id| self.element(*id).is_some_and(&pred))
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root() {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Concatenated text of every descendant text node, markup ignored.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.node(id).map(Node::kind) {
            Some(NodeKind::Text(text) | NodeKind::Comment(text)) => text.clone(),
            Some(_) => self
                .descendants(id)
                .filter_map(|d| self.node(d).and_then(Node::as_text))
                .collect(),
            None => String::new(),
        }
    }

    /// Text as a reader sees it rendered: collapsed whitespace, block boundaries as line breaks.
    pub fn inner_text(&self, id: NodeId) -> String {
        collect_inner_text(self, id)
    }

    /// True when the element's inline style sets `display: none`.
    pub fn is_style_hidden(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| {
            e.style()
                .iter()
                .rev()
                .find(|(k, _)| k == "display")
                .is_some_and(|(_, v)| {
                    let v = v.trim_end_matches("!important").trim();
                    v.eq_ignore_ascii_case("none")
                })
        })
    }

    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::value)
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(Element::checked)
    }

    /// Replace a control's value. Returns false when `id` is not an element.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> bool {
        let Some(element) = self.element_mut(id) else {
            return false;
        };
        element.value = value.to_string();
        true
    }

    /// Set the checked state. Checking a named radio unchecks the rest of its group within
    /// the same form owner. Returns whether any checked state changed.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> bool {
        let Some(element) = self.element(id) else {
            return false;
        };
        let mut changed = element.checked != checked;
        let group = (checked && input_control_type(self, id) == InputControlType::Radio)
            .then(|| element.attr("name"))
            .flatten()
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        if let Some(name) = group {
            let scope = form_owner_scope(self, id);
            let others: Vec<NodeId> = self
                .elements_named("input")
                .filter(|other| *other != id)
                .filter(|other| input_control_type(self, *other) == InputControlType::Radio)
                .filter(|other| self.attr(*other, "name") == Some(name.as_str()))
                .filter(|other| form_owner_scope(self, *other) == scope)
                .collect();
            for other in others {
                if let Some(e) = self.element_mut(other) {
                    changed |= e.checked;
                    e.checked = false;
                }
            }
        }

        if let Some(e) = self.element_mut(id) {
            e.checked = checked;
        }
        changed
    }

    pub fn dispatch_event(&mut self, target: NodeId, kind: DomEventKind) {
        log::debug!(target: "html.events", "dispatch {} on {:?}", kind.name(), target);
        self.events.push(DomEvent {
            target,
            kind,
            bubbles: true,
        });
    }

    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<DomEvent> {
        std::mem::take(&mut self.events)
    }

    /// Parse `fragment` and append the resulting nodes to `parent`. Returns the new top-level
    /// nodes.
    pub fn append_html(&mut self, parent: NodeId, fragment: &str) -> Vec<NodeId> {
        let before = self.children(parent).len();
        crate::dom_builder::build_into(self, parent, &crate::tokenize(fragment));
        self.children(parent)[before..].to_vec()
    }

    /// Detach a node (and its subtree) from the tree. Its id stays valid but it is no longer
    /// reachable from the root.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        self.nodes[parent.index()].children.retain(|c| *c != id);
        self.nodes[id.index()].parent = None;
        true
    }
}
