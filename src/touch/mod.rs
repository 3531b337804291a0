//! Touch drag emulation
//!
//! Mobile browsers never fire HTML5 drag events for touch input. This
//! module tracks a single touch gesture per document and replays it as
//! `dragstart`, `dragenter`/`dragover`/`dragleave`, `drop` and `dragend`
//! on a [`DragHost`], with a floating ghost copy following the finger.

pub mod emulator;
pub mod event;
pub mod host;
pub mod selector;
pub mod session;
pub mod styles;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

#[cfg(test)]
pub(crate) mod testing;

pub use emulator::{EmulatorConfig, TouchDragEmulator, TouchOutcome};
pub use event::{DataTransfer, DragEvent, DragEventKind};
pub use host::{DragHost, Rect, Touch};
pub use selector::{SelectorError, SelectorList};
pub use session::DragSession;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::{install_touch_drag, WebDocument, WebTouchDrag};
