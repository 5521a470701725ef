/// Snapshot of the input signals for one tick.
///
/// Directional signals are independent booleans; the kernel combines them
/// additively, so opposite signals cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// External request to stop the frame loop (escape key, window close).
    pub close_requested: bool,
    /// Scroll wheel movement since the previous tick. Positive zooms in.
    pub scroll_delta: f32,
}

impl InputState {
    /// No signals held.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }

    pub fn close() -> Self {
        Self {
            close_requested: true,
            ..Self::default()
        }
    }

    /// True when any directional signal is held.
    pub fn any_direction(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Something that reports the current input signals once per tick.
pub trait InputSource {
    fn poll(&mut self) -> InputState;
}

impl InputSource for InputState {
    /// A fixed state acts as a source that holds the same signals forever.
    fn poll(&mut self) -> InputState {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_has_no_signals() {
        let s = InputState::idle();
        assert!(!s.any_direction());
        assert!(!s.close_requested);
        assert_eq!(s.scroll_delta, 0.0);
    }

    #[test]
    fn constant_state_is_a_source() {
        let mut s = InputState::forward();
        assert_eq!(s.poll(), InputState::forward());
        assert_eq!(s.poll(), InputState::forward());
    }

    #[test]
    fn close_is_not_a_direction() {
        assert!(!InputState::close().any_direction());
    }
}
