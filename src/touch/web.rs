//! Browser host backed by `web-sys`
//!
//! [`WebDocument`] maps [`DragHost`] onto the live DOM. [`WebTouchDrag`]
//! listens for touch events on the document, feeds them to the emulator,
//! and re-runs `attach` whenever markup is added under `<body>`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlElement, MutationObserver, MutationObserverInit,
    MutationRecord, TouchEvent, TouchList, Window,
};

use super::emulator::{EmulatorConfig, TouchDragEmulator, TouchOutcome};
use super::event::DragEvent;
use super::host::{DragHost, Rect, Touch};
use super::selector::SelectorList;
use crate::logger;

const TOUCH_EVENTS: [&str; 4] = ["touchstart", "touchmove", "touchend", "touchcancel"];

fn warn_on_err<T>(result: Result<T, JsValue>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            logger::log_warning(&format!("{what} failed: {e:?}"));
            None
        }
    }
}

pub struct WebDocument {
    window: Window,
    document: Document,
    body: Element,
}

impl WebDocument {
    /// `None` outside a browser page or before `<body>` exists
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let body: Element = document.body()?.into();
        Some(Self {
            window,
            document,
            body,
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_native(event: &DragEvent) -> Option<web_sys::DragEvent> {
    let init = web_sys::DragEventInit::new();
    init.set_bubbles(event.bubbles);
    init.set_cancelable(event.cancelable);
    init.set_client_x(event.client_x.round() as i32);
    init.set_client_y(event.client_y.round() as i32);

    if let Some(data) = &event.data_transfer {
        let transfer = warn_on_err(web_sys::DataTransfer::new(), "new DataTransfer")?;
        for format in data.types() {
            warn_on_err(transfer.set_data(format, data.get_data(format)), "setData");
        }
        init.set_data_transfer(Some(&transfer));
    }

    warn_on_err(
        web_sys::DragEvent::new_with_event_init_dict(event.kind.as_str(), &init),
        "new DragEvent",
    )
}

impl DragHost for WebDocument {
    type Node = Element;

    fn is_touch_capable(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("ontouchstart")).unwrap_or(false)
            || self.window.navigator().max_touch_points() > 0
    }

    fn body(&self) -> Element {
        self.body.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        warn_on_err(node.class_list().add_1(class), "classList.add");
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        warn_on_err(node.class_list().remove_1(class), "classList.remove");
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        warn_on_err(node.set_attribute(name, value), "setAttribute");
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn element_from_point(&self, x: f64, y: f64) -> Option<Element> {
        self.document.element_from_point(x as f32, y as f32)
    }

    fn clone_into_body(&mut self, node: &Element) -> Option<Element> {
        let copy = warn_on_err(node.clone_node_with_deep(true), "cloneNode")?
            .dyn_into::<Element>()
            .ok()?;
        warn_on_err(self.body.append_child(&copy), "appendChild")?;
        Some(copy)
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }

    fn style(&self, node: &Element, property: &str) -> Option<String> {
        let value = node
            .dyn_ref::<HtmlElement>()?
            .style()
            .get_property_value(property)
            .ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        // SVG and other non-HTML elements keep their styles untouched
        let Some(element) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = element.style();
        if value.is_empty() {
            warn_on_err(style.remove_property(property), "removeProperty");
        } else {
            warn_on_err(style.set_property(property, value), "setProperty");
        }
    }

    fn outer_html(&self, node: &Element) -> String {
        node.outer_html()
    }

    fn dispatch(&mut self, node: &Element, event: DragEvent) {
        if let Some(native) = to_native(&event) {
            warn_on_err(node.dispatch_event(&native), "dispatchEvent");
        }
    }

    fn inject_stylesheet(&mut self, css: &str) {
        let Some(style) = warn_on_err(self.document.create_element("style"), "createElement")
        else {
            return;
        };
        style.set_text_content(Some(css));
        let parent: Element = self
            .document
            .head()
            .map_or_else(|| self.body.clone(), Into::into);
        warn_on_err(parent.append_child(&style), "appendChild");
    }

    // The browser's engine understands everything the crate parser accepts
    fn matches(&self, node: &Element, selector: &SelectorList) -> bool {
        node.matches(selector.as_str())
            .unwrap_or_else(|_| selector.matches(self, node))
    }

    fn closest(&self, node: &Element, selector: &SelectorList) -> Option<Element> {
        node.closest(selector.as_str())
            .unwrap_or_else(|_| selector.closest(self, node))
    }
}

fn touch_points(list: &TouchList) -> Vec<Touch> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .map(|t| Touch::new(f64::from(t.client_x()), f64::from(t.client_y())))
        .collect()
}

type SharedEmulator = Rc<RefCell<TouchDragEmulator<WebDocument>>>;
type TouchHandler = Closure<dyn FnMut(TouchEvent)>;

fn touch_handler(emulator: &SharedEmulator, kind: &'static str) -> TouchHandler {
    let emulator = Rc::clone(emulator);
    Closure::wrap(Box::new(move |event: TouchEvent| {
        // A drag listener that synthesizes touches would re-enter here
        let Ok(mut emulator) = emulator.try_borrow_mut() else {
            return;
        };
        let outcome = match kind {
            "touchstart" => event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map_or(TouchOutcome::Ignored, |target| {
                    emulator.touch_start(&target, &touch_points(&event.touches()))
                }),
            "touchmove" => emulator.touch_move(&touch_points(&event.touches())),
            "touchend" => emulator.touch_end(&touch_points(&event.changed_touches())),
            _ => emulator.touch_cancel(&touch_points(&event.changed_touches())),
        };
        if outcome == TouchOutcome::Consumed {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(_)>)
}

/// A running emulator bound to the page; dropping it detaches everything
pub struct WebTouchDrag {
    emulator: SharedEmulator,
    document: Document,
    listeners: Vec<(&'static str, TouchHandler)>,
    observer: MutationObserver,
    _on_mutation: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl WebTouchDrag {
    /// `Ok(None)` on devices without touch input
    pub fn start(config: &EmulatorConfig) -> Result<Option<Self>, JsValue> {
        let host = WebDocument::new().ok_or_else(|| JsValue::from_str("document has no body"))?;
        let document = host.document.clone();
        let body = host.body.clone();

        let Some(mut emulator) = TouchDragEmulator::install(host, config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        else {
            return Ok(None);
        };
        emulator.attach(&body);
        let emulator = Rc::new(RefCell::new(emulator));

        // Non-passive so preventDefault can stop scrolling during a drag
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let mut listeners = Vec::with_capacity(TOUCH_EVENTS.len());
        for kind in TOUCH_EVENTS {
            let handler = touch_handler(&emulator, kind);
            document.add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                handler.as_ref().unchecked_ref(),
                &options,
            )?;
            listeners.push((kind, handler));
        }

        let on_mutation = {
            let emulator = Rc::clone(&emulator);
            let body = body.clone();
            Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
                let added = records
                    .iter()
                    .filter_map(|r| r.dyn_into::<MutationRecord>().ok())
                    .any(|r| r.added_nodes().length() > 0);
                if !added {
                    return;
                }
                if let Ok(mut emulator) = emulator.try_borrow_mut() {
                    emulator.attach(&body);
                }
            }) as Box<dyn FnMut(_, _)>)
        };
        let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer.observe_with_options(&body, &init)?;

        logger::log_info("Touch drag emulator installed");
        Ok(Some(Self {
            emulator,
            document,
            listeners,
            observer,
            _on_mutation: on_mutation,
        }))
    }

    /// Instrument a subtree now instead of waiting for the observer
    pub fn attach(&self, root: &Element) -> usize {
        self.emulator
            .try_borrow_mut()
            .map_or(0, |mut emulator| emulator.attach(root))
    }

    pub fn is_dragging(&self) -> bool {
        self.emulator
            .try_borrow()
            .is_ok_and(|emulator| emulator.is_dragging())
    }
}

impl Drop for WebTouchDrag {
    fn drop(&mut self) {
        self.observer.disconnect();
        for (kind, handler) in &self.listeners {
            warn_on_err(
                self.document
                    .remove_event_listener_with_callback(kind, handler.as_ref().unchecked_ref()),
                "removeEventListener",
            );
        }
    }
}

/// Install with the editor's default selectors for the lifetime of the page
///
/// Returns `false` on devices without touch input.
#[wasm_bindgen(js_name = installTouchDrag)]
pub fn install_touch_drag() -> Result<bool, JsValue> {
    let Some(handle) = WebTouchDrag::start(&EmulatorConfig::default())? else {
        return Ok(false);
    };
    std::mem::forget(handle);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::touch::{DataTransfer, DragEventKind};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn element(host: &WebDocument, tag: &str) -> Element {
        host.document.create_element(tag).unwrap()
    }

    #[wasm_bindgen_test]
    fn native_selectors_back_matches_and_closest() {
        let host = WebDocument::new().unwrap();
        let zone = element(&host, "section");
        zone.set_class_name("drop-zone");
        let inner = element(&host, "p");
        zone.append_child(&inner).unwrap();
        host.body.append_child(&zone).unwrap();

        let selector = SelectorList::parse(".drop-zone, [data-droppable]").unwrap();
        assert!(host.matches(&zone, &selector));
        assert!(!host.matches(&inner, &selector));
        assert_eq!(host.closest(&inner, &selector), Some(zone.clone()));
        zone.remove();
    }

    #[wasm_bindgen_test]
    fn ghost_clone_carries_styles_and_is_removable() {
        let mut host = WebDocument::new().unwrap();
        let item = element(&host, "div");
        item.set_attribute("data-component", "html/button").unwrap();
        item.set_inner_html("<span>Button</span>");
        host.body.append_child(&item).unwrap();

        let ghost = host.clone_into_body(&item).unwrap();
        assert_eq!(host.parent(&ghost), Some(host.body()));
        assert_eq!(host.children(&ghost).len(), 1);

        host.set_style(&ghost, "left", "12px");
        assert_eq!(host.style(&ghost, "left").as_deref(), Some("12px"));
        host.set_style(&ghost, "left", "");
        assert_eq!(host.style(&ghost, "left"), None);

        host.remove(&ghost);
        assert_eq!(host.parent(&ghost), None);
        item.remove();
    }

    #[wasm_bindgen_test]
    fn dispatch_delivers_drag_data() {
        let mut host = WebDocument::new().unwrap();
        let target = element(&host, "div");
        host.body.append_child(&target).unwrap();

        let seen = Rc::new(RefCell::new(None));
        let listener = {
            let seen = Rc::clone(&seen);
            Closure::wrap(Box::new(move |e: web_sys::DragEvent| {
                let data = e.data_transfer().and_then(|d| d.get_data("component").ok());
                *seen.borrow_mut() = Some((e.type_(), data));
            }) as Box<dyn FnMut(_)>)
        };
        target
            .add_event_listener_with_callback("dragstart", listener.as_ref().unchecked_ref())
            .unwrap();

        let mut data = DataTransfer::new();
        data.set_data("component", "html/button");
        let event = DragEvent::at(DragEventKind::DragStart, Touch::new(5.0, 6.0)).with_data(data);
        host.dispatch(&target, event);

        assert_eq!(
            *seen.borrow(),
            Some(("dragstart".to_string(), Some("html/button".to_string())))
        );
        target.remove();
    }
}
