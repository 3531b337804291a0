//! In-memory document used by the touch emulator tests

use std::collections::BTreeMap;

use super::event::{DragEvent, DragEventKind};
use super::host::{DragHost, Rect};

#[derive(Debug, Clone)]
struct FakeNode {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    rect: Rect,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl FakeNode {
    fn new(tag: &str, parent: Option<usize>) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            rect: Rect::default(),
            parent,
            children: Vec::new(),
        }
    }
}

/// Arena-backed DOM; node handles are arena indices
pub struct FakeDom {
    nodes: Vec<FakeNode>,
    touch: bool,
    pub events: Vec<(usize, DragEvent)>,
    pub stylesheets: Vec<String>,
}

impl FakeDom {
    pub fn new(touch: bool) -> Self {
        Self {
            nodes: vec![FakeNode::new("body", None)],
            touch,
            events: Vec::new(),
            stylesheets: Vec::new(),
        }
    }

    pub const fn body_id(&self) -> usize {
        0
    }

    pub fn append(&mut self, parent: usize, tag: &str) -> usize {
        let id = self.nodes.len();
        self.nodes.push(FakeNode::new(tag, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    pub fn set_attr(&mut self, node: usize, name: &str, value: &str) {
        self.nodes[node].attrs.insert(name.to_string(), value.to_string());
    }

    pub fn add_class_name(&mut self, node: usize, class: &str) {
        if !self.nodes[node].classes.iter().any(|c| c == class) {
            self.nodes[node].classes.push(class.to_string());
        }
    }

    pub fn set_rect(&mut self, node: usize, rect: Rect) {
        self.nodes[node].rect = rect;
    }

    /// Whether the node is still reachable from the body
    pub fn is_attached(&self, node: usize) -> bool {
        let mut current = node;
        loop {
            if current == 0 {
                return true;
            }
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn nodes_with_class(&self, class: &str) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&id| self.is_attached(id) && self.has_class(&id, class))
            .collect()
    }

    /// Event kinds in dispatch order, paired with their target
    pub fn event_log(&self) -> Vec<(usize, DragEventKind)> {
        self.events.iter().map(|(node, e)| (*node, e.kind)).collect()
    }

    fn is_hidden(&self, node: usize) -> bool {
        self.nodes[node].style.get("display").is_some_and(|d| d == "none")
    }

    fn hit_test(&self, node: usize, x: f64, y: f64, hit: &mut Option<usize>) {
        if self.is_hidden(node) {
            return;
        }
        if self.nodes[node].rect.contains(x, y) {
            *hit = Some(node);
        }
        for &child in &self.nodes[node].children {
            self.hit_test(child, x, y, hit);
        }
    }

    fn deep_clone(&mut self, node: usize, parent: usize) -> usize {
        let mut copy = self.nodes[node].clone();
        copy.parent = Some(parent);
        copy.children = Vec::new();
        let id = self.nodes.len();
        self.nodes.push(copy);
        self.nodes[parent].children.push(id);
        for child in self.nodes[node].children.clone() {
            self.deep_clone(child, id);
        }
        id
    }
}

impl DragHost for FakeDom {
    type Node = usize;

    fn is_touch_capable(&self) -> bool {
        self.touch
    }

    fn body(&self) -> usize {
        0
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        (0..self.nodes.len())
            .find(|&n| self.is_attached(n) && self.nodes[n].attrs.get("id").is_some_and(|v| v == id))
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        self.nodes[*node].parent
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.nodes[*node].children.clone()
    }

    fn tag_name(&self, node: &usize) -> String {
        self.nodes[*node].tag.clone()
    }

    fn has_class(&self, node: &usize, class: &str) -> bool {
        self.nodes[*node].classes.iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &usize, class: &str) {
        self.add_class_name(*node, class);
    }

    fn remove_class(&mut self, node: &usize, class: &str) {
        self.nodes[*node].classes.retain(|c| c != class);
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        if name == "class" && !self.nodes[*node].classes.is_empty() {
            return Some(self.nodes[*node].classes.join(" "));
        }
        self.nodes[*node].attrs.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &usize, name: &str, value: &str) {
        self.set_attr(*node, name, value);
    }

    fn bounding_rect(&self, node: &usize) -> Rect {
        self.nodes[*node].rect
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<usize> {
        let mut hit = None;
        self.hit_test(0, x, y, &mut hit);
        hit
    }

    fn clone_into_body(&mut self, node: &usize) -> Option<usize> {
        Some(self.deep_clone(*node, 0))
    }

    fn remove(&mut self, node: &usize) {
        if let Some(parent) = self.nodes[*node].parent.take() {
            self.nodes[parent].children.retain(|c| c != node);
        }
    }

    fn style(&self, node: &usize, property: &str) -> Option<String> {
        self.nodes[*node].style.get(property).cloned()
    }

    fn set_style(&mut self, node: &usize, property: &str, value: &str) {
        if value.is_empty() {
            self.nodes[*node].style.remove(property);
        } else {
            self.nodes[*node]
                .style
                .insert(property.to_string(), value.to_string());
        }
    }

    fn outer_html(&self, node: &usize) -> String {
        let n = &self.nodes[*node];
        let mut attrs: Vec<String> = n.attrs.iter().map(|(k, v)| format!(" {k}=\"{v}\"")).collect();
        if !n.classes.is_empty() {
            attrs.insert(0, format!(" class=\"{}\"", n.classes.join(" ")));
        }
        let inner: String = n.children.iter().map(|c| self.outer_html(c)).collect();
        format!("<{tag}{attrs}>{inner}</{tag}>", tag = n.tag, attrs = attrs.concat())
    }

    fn dispatch(&mut self, node: &usize, event: DragEvent) {
        self.events.push((*node, event));
    }

    fn inject_stylesheet(&mut self, css: &str) {
        self.stylesheets.push(css.to_string());
    }
}
