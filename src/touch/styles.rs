//! Stylesheet injected once when the emulator is installed

pub const DRAG_ACTIVE_CLASS: &str = "drag-active";
pub const DRAGGING_CLASS: &str = "dragging";
pub const DRAG_OVER_CLASS: &str = "drag-over";
pub const GHOST_CLASS: &str = "drag-ghost";

pub const STYLESHEET: &str = r#"
.drag-active {
    user-select: none;
    -webkit-user-select: none;
}

.dragging {
    opacity: 0.5;
    transform: scale(0.95);
    transition: transform 0.2s ease, opacity 0.2s ease;
}

.drag-over {
    background-color: rgba(0, 123, 255, 0.1) !important;
    border: 2px dashed #007bff !important;
    transition: all 0.2s ease;
}

.drag-ghost {
    box-shadow: 0 5px 15px rgba(0, 0, 0, 0.3);
    border-radius: 4px;
}

@media (max-width: 768px) {
    .component-item, .section-item, [draggable="true"] {
        padding: 12px;
        margin: 4px 0;
        touch-action: none;
    }

    .drag-elements ul li {
        padding: 15px 10px;
        border: 1px solid #ddd;
        margin: 5px 0;
        border-radius: 4px;
        background: white;
    }

    .btn, .form-control, .nav-link {
        min-height: 44px;
        padding: 12px 16px;
    }
}
"#;
