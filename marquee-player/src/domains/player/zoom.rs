//! Pinch, wheel and drag zoom over the video surface.
//!
//! The transform is derived presentation state: the view renders
//! [`ZoomState::css_transform`] and nothing else reads it.

use crate::infra::constants::player::zoom::{MIN_SCALE, WHEEL_SENSITIVITY};

/// Input from the gesture layer, coordinates in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Wheel { delta_y: f64, x: f64, y: f64 },
    PinchStart { distance: f64 },
    PinchMove { distance: f64 },
    PinchEnd,
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd,
}

impl GestureEvent {
    fn is_finite(&self) -> bool {
        match *self {
            Self::Wheel { delta_y, x, y } => {
                delta_y.is_finite() && x.is_finite() && y.is_finite()
            }
            Self::PinchStart { distance } | Self::PinchMove { distance } => {
                distance.is_finite()
            }
            Self::DragStart { x, y } | Self::DragMove { x, y } => x.is_finite() && y.is_finite(),
            Self::PinchEnd | Self::DragEnd => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Transform origin, percent of the surface
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomState {
    pub const fn identity() -> Self {
        Self {
            scale: MIN_SCALE,
            translate_x: 0.0,
            translate_y: 0.0,
            origin_x: 50.0,
            origin_y: 50.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn css_transform(&self) -> String {
        format!(
            "translate({:.1}px, {:.1}px) scale({:.3})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ActiveGesture {
    Pinch { start_distance: f64, start_scale: f64 },
    Drag { last_x: f64, last_y: f64 },
}

/// Gesture tracker owning the zoom transform
#[derive(Debug, Clone)]
pub struct ZoomController {
    state: ZoomState,
    max_scale: f64,
    viewport: Option<(f64, f64)>,
    active: Option<ActiveGesture>,
}

impl ZoomController {
    pub fn new(max_scale: f64) -> Self {
        Self {
            state: ZoomState::identity(),
            max_scale: max_scale.max(MIN_SCALE),
            viewport: None,
            active: None,
        }
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn is_zoomed(&self) -> bool {
        self.state.scale > MIN_SCALE
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.viewport = Some((width, height));
            self.clamp_translation();
        }
    }

    pub fn reset(&mut self) {
        self.state = ZoomState::identity();
        self.active = None;
    }

    /// Apply a scale directly, as a pinch or wheel would
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.state.scale = scale.clamp(MIN_SCALE, self.max_scale);
        self.clamp_translation();
    }

    /// Events carrying NaN or infinite coordinates are dropped
    pub fn handle(&mut self, event: GestureEvent) {
        if !event.is_finite() {
            return;
        }
        match event {
            GestureEvent::Wheel { delta_y, x, y } => {
                if let Some((width, height)) = self.viewport {
                    self.state.origin_x = (x * 100.0 / width).clamp(0.0, 100.0);
                    self.state.origin_y = (y * 100.0 / height).clamp(0.0, 100.0);
                }
                // Wheel up (negative delta) zooms in
                let factor = (-delta_y * WHEEL_SENSITIVITY).exp();
                self.set_scale(self.state.scale * factor);
                self.settle();
            }
            GestureEvent::PinchStart { distance } if distance.is_finite() && distance > 0.0 => {
                self.active = Some(ActiveGesture::Pinch {
                    start_distance: distance,
                    start_scale: self.state.scale,
                });
            }
            GestureEvent::PinchStart { .. } => {}
            GestureEvent::PinchMove { distance } => {
                if let Some(ActiveGesture::Pinch {
                    start_distance,
                    start_scale,
                }) = self.active
                {
                    self.set_scale(start_scale * distance / start_distance);
                }
            }
            GestureEvent::DragStart { x, y } => {
                if self.is_zoomed() {
                    self.active = Some(ActiveGesture::Drag {
                        last_x: x,
                        last_y: y,
                    });
                }
            }
            GestureEvent::DragMove { x, y } => {
                if let Some(ActiveGesture::Drag { last_x, last_y }) = self.active {
                    self.state.translate_x += x - last_x;
                    self.state.translate_y += y - last_y;
                    self.clamp_translation();
                    self.active = Some(ActiveGesture::Drag {
                        last_x: x,
                        last_y: y,
                    });
                }
            }
            GestureEvent::PinchEnd | GestureEvent::DragEnd => {
                self.active = None;
                self.settle();
            }
        }
    }

    /// Releasing at scale 1 drops any leftover translation
    fn settle(&mut self) {
        if self.state.scale <= MIN_SCALE {
            self.state.scale = MIN_SCALE;
            self.state.translate_x = 0.0;
            self.state.translate_y = 0.0;
        }
    }

    fn clamp_translation(&mut self) {
        let Some((width, height)) = self.viewport else {
            return;
        };
        let max_x = (self.state.scale - 1.0) * width / 2.0;
        let max_y = (self.state.scale - 1.0) * height / 2.0;
        if !(max_x.is_finite() && max_y.is_finite()) || max_x < 0.0 || max_y < 0.0 {
            return;
        }
        self.state.translate_x = self.state.translate_x.clamp(-max_x, max_x);
        self.state.translate_y = self.state.translate_y.clamp(-max_y, max_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinch_scales_relative_to_start_and_clamps() {
        let mut zoom = ZoomController::new(4.0);
        zoom.handle(GestureEvent::PinchStart { distance: 100.0 });
        zoom.handle(GestureEvent::PinchMove { distance: 250.0 });
        assert_eq!(zoom.state().scale, 2.5);

        zoom.handle(GestureEvent::PinchMove { distance: 1000.0 });
        assert_eq!(zoom.state().scale, 4.0);

        zoom.handle(GestureEvent::PinchMove { distance: 10.0 });
        assert_eq!(zoom.state().scale, 1.0);
    }

    #[test]
    fn drag_only_translates_while_zoomed() {
        let mut zoom = ZoomController::new(4.0);
        zoom.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
        zoom.handle(GestureEvent::DragMove { x: 50.0, y: 20.0 });
        assert!(zoom.state().is_identity());

        zoom.set_scale(2.0);
        zoom.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
        zoom.handle(GestureEvent::DragMove { x: 50.0, y: 20.0 });
        assert_eq!(zoom.state().translate_x, 50.0);
        assert_eq!(zoom.state().translate_y, 20.0);
    }

    #[test]
    fn translation_is_bounded_by_viewport_overflow() {
        let mut zoom = ZoomController::new(4.0);
        zoom.set_viewport(800.0, 400.0);
        zoom.set_scale(2.0);
        zoom.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
        zoom.handle(GestureEvent::DragMove { x: 1000.0, y: -1000.0 });

        assert_eq!(zoom.state().translate_x, 400.0);
        assert_eq!(zoom.state().translate_y, -200.0);
    }

    #[test]
    fn releasing_at_unit_scale_resets_translation() {
        let mut zoom = ZoomController::new(4.0);
        zoom.set_scale(2.0);
        zoom.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
        zoom.handle(GestureEvent::DragMove { x: 30.0, y: 30.0 });
        zoom.handle(GestureEvent::DragEnd);

        zoom.handle(GestureEvent::PinchStart { distance: 200.0 });
        zoom.handle(GestureEvent::PinchMove { distance: 50.0 });
        zoom.handle(GestureEvent::PinchEnd);

        assert_eq!(zoom.state().scale, 1.0);
        assert_eq!(zoom.state().translate_x, 0.0);
        assert_eq!(zoom.state().translate_y, 0.0);
    }

    #[test]
    fn wheel_up_zooms_in_around_pointer() {
        let mut zoom = ZoomController::new(4.0);
        zoom.set_viewport(1000.0, 500.0);
        zoom.handle(GestureEvent::Wheel {
            delta_y: -200.0,
            x: 250.0,
            y: 100.0,
        });

        assert!(zoom.state().scale > 1.0);
        assert_eq!(zoom.state().origin_x, 25.0);
        assert_eq!(zoom.state().origin_y, 20.0);
    }

    #[test]
    fn non_finite_gestures_leave_the_transform_alone() {
        let mut zoom = ZoomController::new(4.0);
        zoom.set_viewport(800.0, 400.0);
        zoom.set_scale(2.0);

        zoom.handle(GestureEvent::PinchStart { distance: f64::INFINITY });
        zoom.handle(GestureEvent::PinchMove { distance: f64::INFINITY });
        zoom.handle(GestureEvent::Wheel {
            delta_y: f64::NAN,
            x: 10.0,
            y: 10.0,
        });
        zoom.handle(GestureEvent::DragStart { x: 0.0, y: 0.0 });
        zoom.handle(GestureEvent::DragMove {
            x: f64::NEG_INFINITY,
            y: 5.0,
        });
        zoom.set_scale(f64::NAN);

        assert_eq!(zoom.state().scale, 2.0);
        assert_eq!(zoom.state().translate_x, 0.0);
        assert_eq!(zoom.state().translate_y, 0.0);
    }

    #[test]
    fn pinch_without_viewport_keeps_scale_in_range() {
        let mut zoom = ZoomController::new(4.0);
        zoom.handle(GestureEvent::PinchStart { distance: 100.0 });
        zoom.handle(GestureEvent::PinchMove { distance: f64::NAN });
        zoom.handle(GestureEvent::PinchMove { distance: 0.0 });
        assert_eq!(zoom.state().scale, 1.0);
    }

    #[test]
    fn reset_returns_identity() {
        let mut zoom = ZoomController::new(4.0);
        zoom.set_scale(3.2);
        zoom.reset();
        assert!(zoom.state().is_identity());
        assert_eq!(zoom.state().css_transform(), "translate(0.0px, 0.0px) scale(1.000)");
    }
}
