//! Lumen Engine
//!
//! A reconciling render pipeline: a mutable node tree, CSS cascade, flexbox
//! layout and a diffing reconciler that emits a compact command stream for a
//! native backend, plus W3C-style event dispatch.
//!
//! # Example
//! ```rust,ignore
//! use lumen_engine::{Config, Session, Tag};
//!
//! let mut session = Session::new(Config::default());
//! session.set_layout_adapter(Box::new(TaffyLayoutAdapter::new()))?;
//! let div = session.create_element(Tag::Div);
//! session.append_child(session.root(), div)?;
//! let bytes = session.tick_binary()?;
//! ```

mod config;
mod reconciler;
mod session;

pub use config::Config;
pub use reconciler::{diff_styles, Reconciler};
pub use session::Session;

pub use lumen_css::{CssError, StyleEngine, Stylesheet};
pub use lumen_dom::{
    DomError, Event, EventDispatcher, EventPhase, EventType, Listener, NodeId, NodeStore,
    PseudoState, StyleMap, Tag, VirtualNode,
};
pub use lumen_layout::{LayoutAdapter, LayoutError, LayoutRect, TaffyLayoutAdapter};
pub use lumen_render::{CodecError, RenderCommand, RenderCommandBuffer, RenderOp};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("CSS error: {0}")]
    Css(#[from] CssError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("node {0} has a parent that does not list it as a child")]
    MissingFromParent(NodeId),
}
