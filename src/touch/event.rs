//! Synthesized drag events and their data-transfer payload

use std::collections::BTreeMap;
use std::fmt;

use super::host::Touch;

/// Drag lifecycle events the emulator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEventKind {
    DragStart,
    DragEnter,
    DragLeave,
    DragOver,
    Drop,
    DragEnd,
}

impl DragEventKind {
    /// DOM event type name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "dragstart",
            Self::DragEnter => "dragenter",
            Self::DragLeave => "dragleave",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
            Self::DragEnd => "dragend",
        }
    }
}

impl fmt::Display for DragEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-keyed string storage standing in for the browser's `DataTransfer`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTransfer {
    data: BTreeMap<String, String>,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, format: &str, value: impl Into<String>) {
        self.data.insert(format.to_string(), value.into());
    }

    /// Empty string for formats never set, like the DOM API
    pub fn get_data(&self, format: &str) -> &str {
        self.data.get(format).map_or("", String::as_str)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub client_x: f64,
    pub client_y: f64,
    pub bubbles: bool,
    pub cancelable: bool,
    /// Only carried by `dragstart`
    pub data_transfer: Option<DataTransfer>,
}

impl DragEvent {
    pub const fn at(kind: DragEventKind, touch: Touch) -> Self {
        Self {
            kind,
            client_x: touch.client_x,
            client_y: touch.client_y,
            bubbles: true,
            cancelable: true,
            data_transfer: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: DataTransfer) -> Self {
        self.data_transfer = Some(data);
        self
    }
}
