/// Tolerance for deciding the right edge is sitting on the newest sample.
const FOLLOW_EPSILON: f64 = 0.01;

/// The visible time interval, in stream seconds. Recomputed index ranges
/// are transient; this is the only view state that persists across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub width: f64,
}

impl Viewport {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Whether the window's right edge is on the stream's leading edge.
    /// Must be evaluated against the last timestamp as it was *before* an
    /// append, since the leading edge itself moves once data lands.
    pub fn is_tracking_latest(&self, last_timestamp: f64) -> bool {
        self.right() + FOLLOW_EPSILON >= last_timestamp
    }

    /// Scroll so the right edge lands on `last_timestamp`. Leaves the
    /// window alone when the newest data is already inside it. Returns
    /// whether the window moved.
    pub fn follow(&mut self, last_timestamp: f64) -> bool {
        if last_timestamp > self.right() {
            self.left = last_timestamp - self.width;
            true
        } else {
            false
        }
    }

    /// Manual navigation; a panned-away window stops tracking the stream.
    pub fn pan_to(&mut self, left: f64) {
        self.left = left;
    }
}

/// Per-tick hand-off to the rendering collaborator. The renderer resolves
/// the index range against the history store it reads from; it has no write
/// access to any pipeline state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderFrame {
    /// Inclusive index range of history entries inside the viewport.
    pub visible: (usize, usize),
    /// Full stored time span, padded to the minimum visible duration.
    pub span: (f64, f64),
    /// True when the viewport is pinned to the newest data.
    pub auto_scroll: bool,
    /// Samples folded into the history by this tick.
    pub appended: usize,
}
