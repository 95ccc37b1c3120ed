//! Session Configuration

/// Session configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Available width passed to layout; `None` is unconstrained
    pub viewport_width: Option<f32>,

    /// Available height passed to layout; `None` is unconstrained
    pub viewport_height: Option<f32>,

    /// Call `mark_created` for every node made through the session
    pub auto_mark_created: bool,

    /// Mirror the existing tree into a layout adapter when it is attached
    pub backfill_on_attach: bool,
}

impl Config {
    pub fn with_viewport(mut self, width: Option<f32>, height: Option<f32>) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_auto_mark_created(mut self, enabled: bool) -> Self {
        self.auto_mark_created = enabled;
        self
    }

    pub fn with_backfill_on_attach(mut self, enabled: bool) -> Self {
        self.backfill_on_attach = enabled;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewport_width: Some(800.0),
            viewport_height: Some(600.0),
            auto_mark_created: true,
            backfill_on_attach: true,
        }
    }
}
