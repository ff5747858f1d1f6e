//! Pointer and keyboard translation

use std::time::{Duration, Instant};
use winit::event::MouseScrollDelta;
use winit::keyboard::Key;

/// Pixels of trackpad scroll that count as one wheel step
const PIXELS_PER_STEP: f64 = 50.0;

/// Spots two clicks close together in time and space
#[derive(Debug, Clone)]
pub struct DoubleClickDetector {
    max_interval: Duration,
    max_distance: f64,
    last: Option<(Instant, (f64, f64))>,
}

impl DoubleClickDetector {
    pub fn new(max_interval: Duration, max_distance: f64) -> Self {
        Self {
            max_interval,
            max_distance,
            last: None,
        }
    }

    /// Record a click. True if it completes a double click.
    pub fn click(&mut self, now: Instant, position: (f64, f64)) -> bool {
        if let Some((at, (x, y))) = self.last {
            let close_in_time = now.saturating_duration_since(at) <= self.max_interval;
            let close_in_space = (position.0 - x).hypot(position.1 - y) <= self.max_distance;
            if close_in_time && close_in_space {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, position));
        false
    }
}

impl Default for DoubleClickDetector {
    fn default() -> Self {
        Self::new(Duration::from_millis(300), 4.0)
    }
}

/// Turns cursor motion into drag deltas while the button is held
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    pressed: bool,
    cursor: Option<(f64, f64)>,
}

impl DragTracker {
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    /// Record the cursor; returns the drag delta if the button is held
    pub fn moved(&mut self, position: (f64, f64)) -> Option<(f32, f32)> {
        let previous = self.cursor.replace(position);
        if !self.pressed {
            return None;
        }
        previous.map(|(x, y)| ((position.0 - x) as f32, (position.1 - y) as f32))
    }
}

/// Wheel motion in steps; positive is away from the user (zoom in)
pub fn wheel_steps(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_STEP) as f32,
    }
}

/// Gallery slot selected by a number key: "1" is the first card
pub fn gallery_slot(key: &Key) -> Option<usize> {
    match key {
        Key::Character(c) => {
            let digit = c.as_str().parse::<usize>().ok()?;
            (1..=9).contains(&digit).then(|| digit - 1)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;
    use winit::keyboard::NamedKey;

    #[test]
    fn test_double_click() {
        let mut detector = DoubleClickDetector::default();
        let t0 = Instant::now();
        assert!(!detector.click(t0, (100.0, 100.0)));
        assert!(detector.click(t0 + Duration::from_millis(200), (102.0, 101.0)));
        // A third click starts over
        assert!(!detector.click(t0 + Duration::from_millis(250), (102.0, 101.0)));
    }

    #[test]
    fn test_slow_or_distant_clicks_are_single() {
        let mut detector = DoubleClickDetector::default();
        let t0 = Instant::now();
        assert!(!detector.click(t0, (100.0, 100.0)));
        assert!(!detector.click(t0 + Duration::from_millis(400), (100.0, 100.0)));
        assert!(!detector.click(t0 + Duration::from_millis(450), (120.0, 100.0)));
    }

    #[test]
    fn test_drag_only_while_pressed() {
        let mut drag = DragTracker::default();
        assert_eq!(drag.moved((10.0, 10.0)), None);
        drag.set_pressed(true);
        assert_eq!(drag.moved((15.0, 7.0)), Some((5.0, -3.0)));
        drag.set_pressed(false);
        assert_eq!(drag.moved((30.0, 30.0)), None);
        assert_eq!(drag.cursor(), Some((30.0, 30.0)));
    }

    #[test]
    fn test_wheel_steps() {
        assert_eq!(wheel_steps(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        assert_eq!(wheel_steps(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -100.0))), -2.0);
    }

    #[test]
    fn test_gallery_slot() {
        assert_eq!(gallery_slot(&Key::Character("1".into())), Some(0));
        assert_eq!(gallery_slot(&Key::Character("4".into())), Some(3));
        assert_eq!(gallery_slot(&Key::Character("0".into())), None);
        assert_eq!(gallery_slot(&Key::Character("x".into())), None);
        assert_eq!(gallery_slot(&Key::Named(NamedKey::Escape)), None);
    }
}
