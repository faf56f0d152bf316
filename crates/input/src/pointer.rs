use glam::Vec2;

/// Size of the surface pointer coordinates are measured against, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Map a screen position to normalized device coordinates.
///
/// `(0, 0)` is the top-left corner and maps to `(-1, 1)`; `(W, H)` maps to
/// `(1, -1)`. Values outside the viewport map outside `[-1, 1]`.
pub fn normalize(screen: Vec2, viewport: Viewport) -> Vec2 {
    Vec2::new(
        (screen.x / viewport.width) * 2.0 - 1.0,
        -(screen.y / viewport.height) * 2.0 + 1.0,
    )
}

/// One frame's worth of pointer input, as consumed by the animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    /// Normalized position in `[-1, 1]` (when inside the viewport).
    pub ndc: Vec2,
    /// Screen-space movement while pressed since the previous sample, in pixels.
    pub drag_delta: Vec2,
    pub pressed: bool,
}

impl PointerSample {
    /// Pressed and actually moved this frame.
    pub fn is_dragging(&self) -> bool {
        self.pressed && self.drag_delta != Vec2::ZERO
    }
}

/// Live pointer state, updated from raw window events.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    ndc: Vec2,
    screen: Vec2,
    pressed: bool,
    drag_origin: Vec2,
    prev: Vec2,
    delta: Vec2,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Where the current press started, if a press is in progress.
    pub fn drag_origin(&self) -> Option<Vec2> {
        self.pressed.then_some(self.drag_origin)
    }

    /// Drag movement accumulated since the last `take_sample`.
    pub fn pending_delta(&self) -> Vec2 {
        self.delta
    }

    /// Pointer moved to `screen`.
    ///
    /// While pressed, the movement since the previous position is accumulated
    /// into the drag delta. A zero-sized viewport keeps the last normalized
    /// position instead of producing NaN.
    pub fn on_move(&mut self, screen: Vec2, viewport: Viewport) {
        self.screen = screen;
        if !viewport.is_empty() {
            self.ndc = normalize(screen, viewport);
        }
        if self.pressed {
            self.delta += screen - self.prev;
            self.prev = screen;
        }
    }

    /// Primary button went down at `screen`.
    pub fn on_press(&mut self, screen: Vec2, viewport: Viewport) {
        self.screen = screen;
        if !viewport.is_empty() {
            self.ndc = normalize(screen, viewport);
        }
        self.pressed = true;
        self.drag_origin = screen;
        self.prev = screen;
        self.delta = Vec2::ZERO;
        tracing::trace!(x = screen.x, y = screen.y, "pointer pressed");
    }

    /// Primary button released. Clears any pending drag delta.
    pub fn on_release(&mut self) {
        self.pressed = false;
        self.delta = Vec2::ZERO;
        tracing::trace!("pointer released");
    }

    /// Snapshot the pointer for this frame and reset the accumulated delta.
    pub fn take_sample(&mut self) -> PointerSample {
        let sample = PointerSample {
            ndc: self.ndc,
            drag_delta: self.delta,
            pressed: self.pressed,
        };
        self.delta = Vec2::ZERO;
        sample
    }
}
