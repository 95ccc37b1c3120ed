//! Input events
//!
//! Event objects handed to listeners during dispatch. The input-forwarding
//! layer builds them from platform input; the dispatcher owns the transient
//! fields (target, current target, phase).

use crate::NodeId;

/// Event type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    ContextMenu,
    PointerDown,
    PointerUp,
    PointerMove,
    PointerEnter,
    PointerLeave,
    PointerOver,
    PointerOut,
    PointerCancel,
    Wheel,
    KeyDown,
    KeyUp,
    Input,
    Change,
    Focus,
    Blur,
    FocusIn,
    FocusOut,
    Scroll,
    Custom(String),
}

impl EventType {
    /// Parse a DOM event name. Unrecognized names become [`EventType::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "contextmenu" => Self::ContextMenu,
            "pointerdown" | "mousedown" => Self::PointerDown,
            "pointerup" | "mouseup" => Self::PointerUp,
            "pointermove" | "mousemove" => Self::PointerMove,
            "pointerenter" | "mouseenter" => Self::PointerEnter,
            "pointerleave" | "mouseleave" => Self::PointerLeave,
            "pointerover" | "mouseover" => Self::PointerOver,
            "pointerout" | "mouseout" => Self::PointerOut,
            "pointercancel" => Self::PointerCancel,
            "wheel" => Self::Wheel,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "input" => Self::Input,
            "change" => Self::Change,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "focusin" => Self::FocusIn,
            "focusout" => Self::FocusOut,
            "scroll" => Self::Scroll,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::ContextMenu => "contextmenu",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerMove => "pointermove",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::PointerOver => "pointerover",
            Self::PointerOut => "pointerout",
            Self::PointerCancel => "pointercancel",
            Self::Wheel => "wheel",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Scroll => "scroll",
            Self::Custom(name) => name,
        }
    }

    /// Default `bubbles` value for events of this type
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            Self::Focus | Self::Blur | Self::PointerEnter | Self::PointerLeave | Self::Scroll
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::Click
                | Self::DblClick
                | Self::ContextMenu
                | Self::PointerDown
                | Self::PointerUp
                | Self::PointerMove
                | Self::PointerEnter
                | Self::PointerLeave
                | Self::PointerOver
                | Self::PointerOut
                | Self::PointerCancel
                | Self::Wheel
        )
    }
}

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub bubbles: bool,
    pub cancelable: bool,
    pub client_x: f32,
    pub client_y: f32,
    /// Mouse button (0 primary, 1 auxiliary, 2 secondary)
    pub button: i16,
    pub pointer_id: i32,
    pub related_target: Option<NodeId>,
    pub key: Option<String>,
    pub timestamp: f64,
    pub(crate) target: Option<NodeId>,
    pub(crate) current_target: Option<NodeId>,
    pub(crate) phase: EventPhase,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_stopped: bool,
}

impl Event {
    pub fn new(event_type: EventType) -> Self {
        Self {
            bubbles: event_type.bubbles(),
            event_type,
            cancelable: true,
            client_x: 0.0,
            client_y: 0.0,
            button: 0,
            pointer_id: 0,
            related_target: None,
            key: None,
            timestamp: 0.0,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_stopped: false,
        }
    }

    /// Pointer event at client coordinates
    pub fn pointer(event_type: EventType, x: f32, y: f32, button: i16, pointer_id: i32) -> Self {
        Self {
            client_x: x,
            client_y: y,
            button,
            pointer_id,
            ..Self::new(event_type)
        }
    }

    /// Keyboard event carrying the key name
    pub fn keyboard(event_type: EventType, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::new(event_type)
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn with_related_target(mut self, related: NodeId) -> Self {
        self.related_target = Some(related);
        self
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Prevent default action (only for cancelable events)
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to the remaining nodes on the path
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Skip the remaining listeners on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.immediate_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }
}
