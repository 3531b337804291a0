//! Host document abstraction
//!
//! The emulator never touches a browser directly; whoever embeds it (a
//! `web-sys` binding, a test double) implements [`DragHost`].

use std::fmt;

use super::event::DragEvent;
use super::selector::SelectorList;

/// A touch point in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Touch {
    pub client_x: f64,
    pub client_y: f64,
}

impl Touch {
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self { client_x, client_y }
    }
}

/// Element bounding box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    /// Edges are inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

/// DOM operations the drag emulator relies on
pub trait DragHost {
    /// Handle to an element; equality means "same element"
    type Node: Clone + PartialEq + fmt::Debug;

    /// Whether the runtime reports touch input at all
    fn is_touch_capable(&self) -> bool;

    fn body(&self) -> Self::Node;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    /// Lowercase tag name
    fn tag_name(&self, node: &Self::Node) -> String;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn bounding_rect(&self, node: &Self::Node) -> Rect;
    /// Topmost rendered element at the point, if any
    fn element_from_point(&self, x: f64, y: f64) -> Option<Self::Node>;

    /// Deep-clone `node` and append the clone to the body
    fn clone_into_body(&mut self, node: &Self::Node) -> Option<Self::Node>;
    fn remove(&mut self, node: &Self::Node);

    /// Inline style value; `None` when unset
    fn style(&self, node: &Self::Node, property: &str) -> Option<String>;
    /// An empty value clears the property
    fn set_style(&mut self, node: &Self::Node, property: &str, value: &str);

    fn outer_html(&self, node: &Self::Node) -> String;
    fn dispatch(&mut self, node: &Self::Node, event: DragEvent);
    fn inject_stylesheet(&mut self, css: &str);

    /// Hosts with a native selector engine may override these two
    fn matches(&self, node: &Self::Node, selector: &SelectorList) -> bool
    where
        Self: Sized,
    {
        selector.matches(self, node)
    }

    fn closest(&self, node: &Self::Node, selector: &SelectorList) -> Option<Self::Node>
    where
        Self: Sized,
    {
        selector.closest(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(10.0, 20.0));
        assert!(rect.contains(110.0, 70.0));
        assert!(!rect.contains(110.5, 70.0));
        assert!(!rect.contains(9.9, 30.0));
    }
}
