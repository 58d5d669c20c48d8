//! Triangle-wave sweep generator for the pan servo.
//!
//! The angle walks from `min` to `max` in fixed steps, clamps at the
//! bound, and turns around.  Both bounds are inclusive and always hit
//! exactly, whatever the step size.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct SweepGenerator {
    min: i16,
    max: i16,
    step: i16,
    angle: i16,
    direction: Direction,
}

impl SweepGenerator {
    /// Start at `min`, heading forward.
    pub fn new(min: i16, max: i16, step: i16) -> Self {
        debug_assert!(min < max && step > 0);
        Self {
            min,
            max,
            step,
            angle: min,
            direction: Direction::Forward,
        }
    }

    pub fn angle(&self) -> i16 {
        self.angle
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Advance one step and return the new angle.
    pub fn advance(&mut self) -> i16 {
        match self.direction {
            Direction::Forward => {
                self.angle = self.angle.saturating_add(self.step);
                if self.angle >= self.max {
                    self.angle = self.max;
                    self.direction = Direction::Backward;
                }
            }
            Direction::Backward => {
                self.angle = self.angle.saturating_sub(self.step);
                if self.angle <= self.min {
                    self.angle = self.min;
                    self.direction = Direction::Forward;
                }
            }
        }
        self.angle
    }
}

/// Project a polar radar return onto the sensor plane (cm).
/// 90° points straight ahead along +y.
pub fn polar_to_cartesian(angle_deg: i16, distance_cm: f32) -> (f32, f32) {
    let rad = f32::from(angle_deg).to_radians();
    (distance_cm * rad.cos(), distance_cm * rad.sin())
}
