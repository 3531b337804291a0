//! Touch-to-drag translation
//!
//! Turns `touchstart`/`touchmove`/`touchend` sequences on instrumented
//! elements into the drag lifecycle the desktop editor already listens for.

use super::event::{DataTransfer, DragEvent, DragEventKind};
use super::host::{DragHost, Touch};
use super::selector::{SelectorError, SelectorList};
use super::session::DragSession;
use super::styles::{DRAGGING_CLASS, DRAG_ACTIVE_CLASS, DRAG_OVER_CLASS, GHOST_CLASS, STYLESHEET};
use crate::logger;

/// Marks a drag source as instrumented
pub const DRAG_MARKER: &str = "data-mobile-drag-setup";
/// Marks a drop zone as instrumented
pub const DROP_MARKER: &str = "data-mobile-drop-setup";
/// Opaque component identifier carried into `dragstart`
pub const COMPONENT_ATTR: &str = "data-component";

/// Where the emulator looks for sources and targets
#[derive(Debug, Clone)]
pub struct EmulatorConfig {
    pub draggable_selector: String,
    pub drop_zone_selector: String,
    /// Canvas frame that counts as a drop zone whenever the touch is inside its box
    pub canvas_frame_id: String,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            draggable_selector: r#"[draggable="true"], .component-item, .section-item, .drag-elements li"#
                .to_string(),
            drop_zone_selector: "#canvas iframe, .drop-zone, [data-droppable]".to_string(),
            canvas_frame_id: "iframe1".to_string(),
        }
    }
}

/// Whether the host should suppress the native touch behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Call `preventDefault` on the touch event
    Consumed,
    Ignored,
}

pub struct TouchDragEmulator<H: DragHost> {
    host: H,
    draggable: SelectorList,
    drop_zones: SelectorList,
    canvas_frame_id: String,
    session: Option<DragSession<H::Node>>,
}

impl<H: DragHost> TouchDragEmulator<H> {
    /// Install on a host; `Ok(None)` when the host has no touch input
    pub fn install(host: H, config: &EmulatorConfig) -> Result<Option<Self>, SelectorError> {
        let draggable = SelectorList::parse(&config.draggable_selector)?;
        let drop_zones = SelectorList::parse(&config.drop_zone_selector)?;

        if !host.is_touch_capable() {
            logger::log_debug("Touch drag emulator not installed: no touch support");
            return Ok(None);
        }

        let mut emulator = Self {
            host,
            draggable,
            drop_zones,
            canvas_frame_id: config.canvas_frame_id.clone(),
            session: None,
        };
        emulator.host.inject_stylesheet(STYLESHEET);
        Ok(Some(emulator))
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub const fn session(&self) -> Option<&DragSession<H::Node>> {
        self.session.as_ref()
    }

    pub const fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Instrument matching elements in `root`'s subtree
    ///
    /// Call again whenever new markup is inserted; already instrumented
    /// elements are skipped. Returns the number of newly marked elements.
    pub fn attach(&mut self, root: &H::Node) -> usize {
        let mut marked = 0;
        let mut pending = vec![root.clone()];

        while let Some(node) = pending.pop() {
            if self.host.attribute(&node, DRAG_MARKER).is_none()
                && self.host.matches(&node, &self.draggable)
            {
                self.host.set_attribute(&node, DRAG_MARKER, "true");
                marked += 1;
            }
            if self.host.attribute(&node, DROP_MARKER).is_none()
                && self.host.matches(&node, &self.drop_zones)
            {
                self.host.set_attribute(&node, DROP_MARKER, "true");
                marked += 1;
            }
            pending.extend(self.host.children(&node));
        }

        if marked > 0 {
            logger::log_debug(&format!("Instrumented {marked} drag/drop elements"));
        }
        marked
    }

    /// `target` may be the instrumented element or anything inside it
    pub fn touch_start(&mut self, target: &H::Node, touches: &[Touch]) -> TouchOutcome {
        let Some(source) = self.drag_source(target) else {
            return TouchOutcome::Ignored;
        };
        let Some(&touch) = touches.first() else {
            return TouchOutcome::Ignored;
        };

        if let Some(stale) = self.session.take() {
            logger::log_warning("touchstart during an active drag; abandoning previous gesture");
            let last = stale.last_touch;
            self.finish(stale, last, false);
        }

        let rect = self.host.bounding_rect(&source);
        let mut session = DragSession::new(
            source.clone(),
            touch,
            touch.client_x - rect.left,
            touch.client_y - rect.top,
        );
        session.ghost = self.create_ghost(&session, touch);

        let body = self.host.body();
        self.host.add_class(&source, DRAGGING_CLASS);
        self.host.add_class(&body, DRAG_ACTIVE_CLASS);

        let mut data = DataTransfer::new();
        data.set_data("text/html", self.host.outer_html(&source));
        if let Some(component) = self.host.attribute(&source, COMPONENT_ATTR) {
            data.set_data("component", component);
        }
        self.host.dispatch(
            &source,
            DragEvent::at(DragEventKind::DragStart, touch).with_data(data),
        );

        self.session = Some(session);
        TouchOutcome::Consumed
    }

    pub fn touch_move(&mut self, touches: &[Touch]) -> TouchOutcome {
        let Some(&touch) = touches.first() else {
            return TouchOutcome::Ignored;
        };
        let Some(mut session) = self.session.take() else {
            return TouchOutcome::Ignored;
        };
        session.last_touch = touch;

        if let Some(ghost) = &session.ghost {
            let (left, top) = session.ghost_origin(touch);
            self.host.set_style(ghost, "left", &format!("{left}px"));
            self.host.set_style(ghost, "top", &format!("{top}px"));
        }

        let target = self.find_drop_target(session.ghost.as_ref(), touch);
        if target != session.drop_zone {
            if let Some(old) = &session.drop_zone {
                self.host.remove_class(old, DRAG_OVER_CLASS);
                self.host.dispatch(old, DragEvent::at(DragEventKind::DragLeave, touch));
            }
            if let Some(new) = &target {
                self.host.add_class(new, DRAG_OVER_CLASS);
                self.host.dispatch(new, DragEvent::at(DragEventKind::DragEnter, touch));
            }
            session.drop_zone = target;
        }

        if let Some(zone) = &session.drop_zone {
            self.host.dispatch(zone, DragEvent::at(DragEventKind::DragOver, touch));
        }

        self.session = Some(session);
        TouchOutcome::Consumed
    }

    pub fn touch_end(&mut self, changed_touches: &[Touch]) -> TouchOutcome {
        self.end_gesture(changed_touches, true)
    }

    /// The gesture was interrupted; clean up without dropping
    pub fn touch_cancel(&mut self, changed_touches: &[Touch]) -> TouchOutcome {
        self.end_gesture(changed_touches, false)
    }

    fn end_gesture(&mut self, changed_touches: &[Touch], allow_drop: bool) -> TouchOutcome {
        let Some(session) = self.session.take() else {
            return TouchOutcome::Ignored;
        };
        let touch = changed_touches.first().copied().unwrap_or(session.last_touch);
        self.finish(session, touch, allow_drop);
        TouchOutcome::Consumed
    }

    /// Tear down a session that has already been taken out of `self`
    fn finish(&mut self, session: DragSession<H::Node>, touch: Touch, allow_drop: bool) {
        let body = self.host.body();
        self.host.remove_class(&session.source, DRAGGING_CLASS);
        if let Some(zone) = &session.drop_zone {
            self.host.remove_class(zone, DRAG_OVER_CLASS);
        }
        self.host.remove_class(&body, DRAG_ACTIVE_CLASS);

        if let Some(ghost) = &session.ghost {
            self.host.remove(ghost);
        }

        if allow_drop {
            if let Some(zone) = &session.drop_zone {
                self.host.dispatch(zone, DragEvent::at(DragEventKind::Drop, touch));
            }
        }
        self.host
            .dispatch(&session.source, DragEvent::at(DragEventKind::DragEnd, touch));
    }

    /// Nearest inclusive ancestor instrumented by `attach`
    fn drag_source(&self, target: &H::Node) -> Option<H::Node> {
        let mut current = Some(target.clone());
        while let Some(node) = current {
            if self.host.attribute(&node, DRAG_MARKER).as_deref() == Some("true") {
                return Some(node);
            }
            current = self.host.parent(&node);
        }
        None
    }

    fn create_ghost(&mut self, session: &DragSession<H::Node>, touch: Touch) -> Option<H::Node> {
        let Some(ghost) = self.host.clone_into_body(&session.source) else {
            logger::log_warning("Could not clone drag source; dragging without a ghost");
            return None;
        };
        let (left, top) = session.ghost_origin(touch);
        for (property, value) in [
            ("position", "fixed".to_string()),
            ("left", format!("{left}px")),
            ("top", format!("{top}px")),
            ("opacity", "0.7".to_string()),
            ("pointer-events", "none".to_string()),
            ("z-index", "9999".to_string()),
            ("transform", "rotate(3deg)".to_string()),
        ] {
            self.host.set_style(&ghost, property, &value);
        }
        self.host.add_class(&ghost, GHOST_CLASS);
        Some(ghost)
    }

    /// Drop zone under the touch point, ignoring the ghost itself
    fn find_drop_target(&mut self, ghost: Option<&H::Node>, touch: Touch) -> Option<H::Node> {
        let saved_display = ghost.map(|g| self.host.style(g, "display").unwrap_or_default());
        if let Some(g) = ghost {
            self.host.set_style(g, "display", "none");
        }

        let below = self.host.element_from_point(touch.client_x, touch.client_y);

        if let (Some(g), Some(display)) = (ghost, saved_display) {
            self.host.set_style(g, "display", &display);
        }

        let below = below?;
        self.host.closest(&below, &self.drop_zones).or_else(|| {
            self.host
                .element_by_id(&self.canvas_frame_id)
                .filter(|frame| {
                    self.host
                        .bounding_rect(frame)
                        .contains(touch.client_x, touch.client_y)
                })
        })
    }
}
