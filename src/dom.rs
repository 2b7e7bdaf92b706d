//! Host document tree and the element-handle layer.
//!
//! The document is an arena of nodes behind shared ownership, so handles are
//! cheap clones that mediate access without owning anything. Parsing is
//! lenient and total in the spirit of the lexer: unclosed elements close at
//! end of input, stray close tags are ignored, and no entity decoding is
//! performed anywhere. Markup written through a handle is re-parsed verbatim
//! with no sanitization; embedders facing untrusted input sanitize upstream.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

pub type NodeId = usize;

/// Member dispatch failures surfaced to the evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemberError {
    /// The member is not part of the handle surface (`texte`, `html`, `suppr`)
    #[error("unknown member '{0}'")]
    UnknownMember(String),

    /// A call-style member was invoked on a missing element
    #[error("cannot call '{0}' on a missing element")]
    NullTarget(String),
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn push(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            data,
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { .. } => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].data {
            NodeData::Text(text) => out.push_str(text),
            NodeData::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
                out.push('>');
                self.serialize_children(id, out);
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn serialize_children(&self, id: NodeId, out: &mut String) {
        for &child in &self.nodes[id].children {
            self.serialize_node(child, out);
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id].parent.take() {
            self.nodes[parent].children.retain(|&c| c != id);
        }
    }

    /// Drop the children of `id` from the tree (they stay in the arena but
    /// become unreachable).
    fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id].children);
        for child in children {
            self.nodes[child].parent = None;
        }
    }
}

/// Lenient markup scanner shared by whole-document and fragment parsing.
struct MarkupScanner {
    input: Vec<char>,
    position: usize,
}

impl MarkupScanner {
    fn new(input: &str) -> Self {
        MarkupScanner {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                name.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        name
    }

    fn read_attributes(&mut self) -> (Vec<(String, String)>, bool) {
        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            match self.current_char() {
                None | Some('>') => {
                    self.advance();
                    return (attrs, false);
                }
                Some('/') if self.peek_char(1) == Some('>') => {
                    self.advance();
                    self.advance();
                    return (attrs, true);
                }
                Some('/') => self.advance(),
                _ => {
                    let name = self.read_name();
                    if name.is_empty() {
                        // Junk character inside a tag; skip it.
                        self.advance();
                        continue;
                    }
                    self.skip_whitespace();
                    let value = if self.current_char() == Some('=') {
                        self.advance();
                        self.skip_whitespace();
                        self.read_attribute_value()
                    } else {
                        String::new()
                    };
                    attrs.push((name, value));
                }
            }
        }
    }

    fn read_attribute_value(&mut self) -> String {
        match self.current_char() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut value = String::new();
                while let Some(ch) = self.current_char() {
                    if ch == quote {
                        self.advance();
                        break;
                    }
                    value.push(ch);
                    self.advance();
                }
                value
            }
            _ => {
                let mut value = String::new();
                while let Some(ch) = self.current_char() {
                    if ch.is_whitespace() || ch == '>' || ch == '/' {
                        break;
                    }
                    value.push(ch);
                    self.advance();
                }
                value
            }
        }
    }

    fn skip_until(&mut self, end: char) {
        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == end {
                break;
            }
        }
    }

    fn read_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '<' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn parse_into(&mut self, tree: &mut Tree, root: NodeId) {
        let mut stack = vec![root];

        while let Some(ch) = self.current_char() {
            if ch != '<' {
                let text = self.read_text();
                if !text.is_empty() {
                    let parent = *stack.last().unwrap_or(&root);
                    tree.push(Some(parent), NodeData::Text(text));
                }
                continue;
            }

            match self.peek_char(1) {
                // Close tag: pop to the matching open element, if any.
                Some('/') => {
                    self.advance();
                    self.advance();
                    let name = self.read_name().to_ascii_lowercase();
                    self.skip_until('>');
                    if let Some(depth) = stack.iter().rposition(|&id| {
                        matches!(&tree.nodes[id].data, NodeData::Element { tag, .. } if *tag == name)
                            && id != root
                    }) {
                        stack.truncate(depth);
                    }
                }
                // Comments, doctype: skipped wholesale.
                Some('!') | Some('?') => {
                    self.skip_until('>');
                }
                Some(c) if c.is_ascii_alphabetic() => {
                    self.advance();
                    let tag = self.read_name().to_ascii_lowercase();
                    let (attrs, self_closed) = self.read_attributes();
                    let parent = *stack.last().unwrap_or(&root);
                    let id = tree.push(Some(parent), NodeData::Element { tag, attrs });
                    if !self_closed {
                        stack.push(id);
                    }
                }
                // A lone '<' is text.
                _ => {
                    let parent = *stack.last().unwrap_or(&root);
                    tree.push(Some(parent), NodeData::Text("<".to_string()));
                    self.advance();
                }
            }
        }
    }
}

/// A live in-memory markup document.
///
/// Cloning a `Document` clones the shared tree reference, not the tree; all
/// clones and all handles observe the same mutations, matching the host
/// platform's single-threaded last-writer-wins mutation model.
#[derive(Clone)]
pub struct Document {
    tree: Rc<RefCell<Tree>>,
    root: NodeId,
}

impl Document {
    /// An empty document with only the synthetic root element.
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let root = tree.push(
            None,
            NodeData::Element {
                tag: "#document".to_string(),
                attrs: Vec::new(),
            },
        );
        Document {
            tree: Rc::new(RefCell::new(tree)),
            root,
        }
    }

    /// Parse markup leniently. Never fails; malformed constructs degrade to
    /// text or are skipped.
    pub fn parse(input: &str) -> Self {
        let doc = Document::new();
        {
            let mut tree = doc.tree.borrow_mut();
            MarkupScanner::new(input).parse_into(&mut tree, doc.root);
        }
        doc
    }

    fn handle(&self, id: NodeId) -> ElementHandle {
        ElementHandle {
            tree: Rc::clone(&self.tree),
            id,
        }
    }

    fn element_ids(&self) -> Vec<NodeId> {
        let tree = self.tree.borrow();
        let mut out = Vec::new();
        let mut pending = vec![self.root];
        while let Some(id) = pending.pop() {
            if matches!(tree.nodes[id].data, NodeData::Element { .. }) && id != self.root {
                out.push(id);
            }
            // Children pushed in reverse so traversal stays in document order.
            for &child in tree.nodes[id].children.iter().rev() {
                pending.push(child);
            }
        }
        out
    }

    /// `doc.id(...)`: the first element whose `id` attribute matches, or an
    /// absorbing empty selection when none does. Absence is not an error.
    pub fn by_id(&self, id: &str) -> Selection {
        for node in self.element_ids() {
            let handle = self.handle(node);
            if handle.attr("id").as_deref() == Some(id) {
                return Selection::Single(handle);
            }
        }
        Selection::None
    }

    /// `doc.type(...)`: every element with the given tag name, in document
    /// order. Possibly empty, never an error.
    pub fn by_tag(&self, tag: &str) -> Selection {
        let wanted = tag.to_ascii_lowercase();
        let handles: Vec<ElementHandle> = self
            .element_ids()
            .into_iter()
            .map(|id| self.handle(id))
            .filter(|h| h.tag().as_deref() == Some(wanted.as_str()))
            .collect();
        Selection::Many(handles)
    }

    /// Serialized markup of the whole document.
    pub fn markup(&self) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        tree.serialize_children(self.root, &mut out);
        out
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Document({} nodes)", self.tree.borrow().nodes.len())
    }
}

/// A live reference to exactly one element node.
///
/// Handles never own the node; they mediate access to the shared tree.
/// Detaching a node does not invalidate handles to it; later text or markup
/// access operates on the detached subtree.
#[derive(Clone)]
pub struct ElementHandle {
    tree: Rc<RefCell<Tree>>,
    id: NodeId,
}

impl ElementHandle {
    /// Tag name, lowercase. `None` for text nodes (not reachable through
    /// queries, which only yield elements).
    pub fn tag(&self) -> Option<String> {
        match &self.tree.borrow().nodes[self.id].data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            NodeData::Text(_) => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.tree.borrow().nodes[self.id].data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.clone()),
            NodeData::Text(_) => None,
        }
    }

    /// Text projection: concatenated descendant text.
    pub fn text(&self) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        tree.collect_text(self.id, &mut out);
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text(&self, text: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.clear_children(self.id);
        tree.push(Some(self.id), NodeData::Text(text.to_string()));
    }

    /// Markup projection: serialized inner markup.
    pub fn markup(&self) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        tree.serialize_children(self.id, &mut out);
        out
    }

    /// Replace inner markup by re-parsing the fragment verbatim.
    ///
    /// Deliberate trust boundary: no sanitization happens here.
    pub fn set_markup(&self, markup: &str) {
        let mut tree = self.tree.borrow_mut();
        tree.clear_children(self.id);
        MarkupScanner::new(markup).parse_into(&mut tree, self.id);
    }

    /// Detach from the parent. Idempotent; detaching an already-detached
    /// node is a no-op.
    pub fn detach(&self) {
        self.tree.borrow_mut().detach(self.id);
    }

    /// Whether the node is still attached to a parent.
    pub fn is_attached(&self) -> bool {
        self.tree.borrow().nodes[self.id].parent.is_some()
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.id == other.id
    }
}

impl fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag() {
            Some(tag) => write!(f, "ElementHandle(<{}> #{})", tag, self.id),
            None => write!(f, "ElementHandle(#text #{})", self.id),
        }
    }
}

/// Result of a document query: no element, exactly one, or an ordered
/// sequence. Broadcast semantics are implemented here, once, rather than at
/// each evaluator call site.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// `doc.id(...)` that matched nothing. Absorbs member writes silently;
    /// member calls against it are errors.
    None,
    /// A single element from `doc.id(...)`.
    Single(ElementHandle),
    /// Every element from `doc.type(...)`, in document order. May be empty.
    Many(Vec<ElementHandle>),
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        match self {
            Selection::None => true,
            Selection::Single(_) => false,
            Selection::Many(handles) => handles.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::None => 0,
            Selection::Single(_) => 1,
            Selection::Many(handles) => handles.len(),
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = &ElementHandle> {
        let slice: &[ElementHandle] = match self {
            Selection::None => &[],
            Selection::Single(handle) => std::slice::from_ref(handle),
            Selection::Many(handles) => handles,
        };
        slice.iter()
    }

    /// Diagnostic form used when a selection reaches `msg`.
    pub fn summary(&self) -> String {
        match self.len() {
            0 => "<empty selection>".to_string(),
            1 => "<1 element>".to_string(),
            n => format!("<{} elements>", n),
        }
    }

    /// Member write, broadcast in sequence order. A missing element absorbs
    /// every write, known member or not.
    pub fn write_member(&self, member: &str, text: &str) -> Result<(), MemberError> {
        if matches!(self, Selection::None) {
            return Ok(());
        }
        for handle in self.handles() {
            match member {
                "texte" => handle.set_text(text),
                "html" => handle.set_markup(text),
                _ => return Err(MemberError::UnknownMember(member.to_string())),
            }
        }
        Ok(())
    }

    /// Member call, broadcast in sequence order. Calls against a missing
    /// element are rejected.
    pub fn call_member(&self, member: &str) -> Result<(), MemberError> {
        if matches!(self, Selection::None) {
            return Err(MemberError::NullTarget(member.to_string()));
        }
        for handle in self.handles() {
            match member {
                "suppr" => handle.detach(),
                _ => return Err(MemberError::UnknownMember(member.to_string())),
            }
        }
        Ok(())
    }
}
