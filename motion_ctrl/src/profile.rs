//! # Trapezoidal velocity profile
//!
//! Discrete-time time-optimal velocity planning between an initial and a
//! final velocity over a signed distance. The profile is quantised to whole
//! control periods: an acceleration ramp, an optional constant-speed plateau
//! and a deceleration ramp. When the distance is too short for the plateau
//! the profile degenerates to a triangle, and when even braking cannot meet
//! the final velocity in the available distance no profile is generated.
//!
//! Speeds are in distance units per period, accelerations in distance units
//! per period squared.

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Distances below this are treated as zero.
const MIN_DISTANCE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A generated velocity profile, queryable per period.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrapezoidalProfile {
    /// Velocity at the start of the acceleration ramp, magnitude along the
    /// direction of travel.
    start_velocity: f64,

    /// Plateau (peak) velocity, signed.
    plateau_velocity: f64,

    /// Velocity after the profile completes, signed.
    final_velocity: f64,

    /// Distance covered by the whole profile, signed.
    target_distance: f64,

    /// Acceleration magnitude.
    acceleration: f64,

    /// Deceleration magnitude.
    deceleration: f64,

    /// Length of the acceleration ramp in periods.
    accel_periods: u32,

    /// Length of the plateau in periods.
    plateau_periods: u32,

    /// Length of the deceleration ramp in periods.
    decel_periods: u32,

    initialized: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrapezoidalProfile {
    /// Create an uninitialised profile, all queries return zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the time-optimal profile, returning its length in periods.
    ///
    /// - `initial_velocity` is the current velocity of the robot; a component
    ///   opposing the direction of travel is clamped to zero before planning.
    /// - `distance` is signed, its sign sets the direction of every output.
    /// - When `must_stop` is false the profile ends at `max_speed` instead of
    ///   zero.
    ///
    /// Degenerate inputs (zero distance, non-positive acceleration,
    /// deceleration or max speed) and unsatisfiable braking produce a
    /// stationary profile of zero periods which holds `initial_velocity`.
    pub fn generate(
        &mut self,
        initial_velocity: f64,
        distance: f64,
        acceleration: f64,
        deceleration: f64,
        max_speed: f64,
        must_stop: bool,
    ) -> u32 {
        self.initialized = false;

        if distance.abs() < MIN_DISTANCE
            || acceleration <= 0.0
            || deceleration <= 0.0
            || max_speed <= 0.0
        {
            self.reset_to_stationary(initial_velocity);
            return 0;
        }

        let direction = if distance >= 0.0 { 1.0 } else { -1.0 };
        let abs_distance = distance.abs();

        // Initial velocity along the direction of travel, opposing component
        // clamped to zero
        let v0 = (initial_velocity * direction).max(0.0);

        // Final velocity magnitude along the direction of travel
        let vf = if must_stop { 0.0 } else { max_speed };

        self.start_velocity = v0;
        self.final_velocity = vf * direction;
        self.target_distance = distance;
        self.acceleration = acceleration;
        self.deceleration = deceleration;

        // Ideal (continuous) ramp distances
        let accel_distance = accel_distance_between(v0, max_speed, acceleration);
        let decel_distance = accel_distance_between(max_speed, vf, deceleration);

        if accel_distance + decel_distance <= abs_distance {
            // Trapezoidal: reach max speed, cruise, then decelerate
            self.plateau_velocity = max_speed * direction;
            self.accel_periods = ramp_periods(v0, max_speed, acceleration);
            self.decel_periods = ramp_periods(max_speed, vf, deceleration);

            // Recompute the ramp distances with discrete period counts, the
            // plateau absorbs the remainder
            let discrete_accel = discrete_distance(v0, acceleration, self.accel_periods);
            let discrete_decel = discrete_distance(max_speed, -deceleration, self.decel_periods);
            let plateau_distance = abs_distance - discrete_accel - discrete_decel;
            self.plateau_periods = (plateau_distance.max(0.0) / max_speed) as u32;
        } else {
            // Cannot reach max speed within the distance
            let v_peak_sq = (2.0 * acceleration * deceleration * abs_distance
                + deceleration * v0 * v0
                + acceleration * vf * vf)
                / (acceleration + deceleration);
            // Guard against floating point rounding on edge cases
            let v_peak = v_peak_sq.max(0.0).sqrt();

            if v0 <= v_peak {
                // Triangular: accelerate to the peak then decelerate
                self.plateau_velocity = v_peak * direction;
                self.plateau_periods = 0;
                self.accel_periods = ramp_periods(v0, v_peak, acceleration);
                self.decel_periods = ramp_periods(v_peak, vf, deceleration);
            } else {
                // Entering faster than the peak, braking is the only option
                let brake_distance = accel_distance_between(v0, vf, deceleration);

                if brake_distance >= abs_distance {
                    // Cannot meet the final velocity within the distance, no
                    // feedforward profile
                    self.reset_to_stationary(initial_velocity);
                    return 0;
                }

                // Cruise at the entry speed then decelerate
                self.plateau_velocity = v0 * direction;
                self.accel_periods = 0;
                self.decel_periods = ramp_periods(v0, vf, deceleration);

                let discrete_decel = discrete_distance(v0, -deceleration, self.decel_periods);
                let plateau_distance = abs_distance - discrete_decel;
                self.plateau_periods = (plateau_distance.max(0.0) / v0) as u32;
            }
        }

        self.initialized = true;
        self.total_periods()
    }

    /// Theoretical velocity at the given period, signed.
    pub fn velocity(&self, period: u32) -> f64 {
        if !self.initialized {
            return 0.0;
        }

        let direction = if self.plateau_velocity >= 0.0 {
            1.0
        } else {
            -1.0
        };

        let plateau_end = self.accel_periods + self.plateau_periods;

        if period < self.accel_periods {
            let ramp = self.start_velocity + self.acceleration * period as f64;
            direction * ramp.min(self.plateau_velocity.abs())
        } else if period < plateau_end {
            self.plateau_velocity
        } else if period < self.total_periods() {
            let into_decel = (period - plateau_end) as f64;
            self.plateau_velocity - direction * self.deceleration * into_decel
        } else {
            self.final_velocity
        }
    }

    /// Theoretical distance left to travel at the given period, signed.
    pub fn remaining_distance(&self, period: u32) -> f64 {
        if !self.initialized {
            return 0.0;
        }

        let direction = if self.plateau_velocity >= 0.0 {
            1.0
        } else {
            -1.0
        };

        let mut travelled = 0.0;

        // Acceleration ramp contribution
        let n = period.min(self.accel_periods);
        travelled += discrete_distance(self.start_velocity, self.acceleration, n);

        // Plateau contribution
        if period > self.accel_periods {
            let k = (period - self.accel_periods).min(self.plateau_periods);
            travelled += self.plateau_velocity.abs() * k as f64;
        }

        // Deceleration ramp contribution
        let plateau_end = self.accel_periods + self.plateau_periods;
        if period > plateau_end {
            let m = (period - plateau_end).min(self.decel_periods);
            travelled += discrete_distance(self.plateau_velocity.abs(), -self.deceleration, m);
        }

        self.target_distance - direction * travelled
    }

    /// Total length of the profile in periods.
    pub fn total_periods(&self) -> u32 {
        self.accel_periods + self.plateau_periods + self.decel_periods
    }

    /// Return to the uninitialised state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zero-length profile which holds the given velocity forever.
    fn reset_to_stationary(&mut self, velocity: f64) {
        self.start_velocity = velocity;
        self.plateau_velocity = velocity;
        self.final_velocity = velocity;
        self.target_distance = 0.0;
        self.acceleration = 0.0;
        self.deceleration = 0.0;
        self.accel_periods = 0;
        self.plateau_periods = 0;
        self.decel_periods = 0;
        self.initialized = true;
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Continuous distance covered ramping between two speeds: |v1² - v0²| / 2a.
fn accel_distance_between(v0: f64, v1: f64, accel: f64) -> f64 {
    if accel.abs() < MIN_DISTANCE {
        return 0.0;
    }
    ((v1 * v1 - v0 * v0) / (2.0 * accel)).abs()
}

/// Number of whole periods to ramp between two speeds, rounded to nearest.
fn ramp_periods(v0: f64, v1: f64, accel: f64) -> u32 {
    if accel.abs() < MIN_DISTANCE {
        return 0;
    }
    ((v1 - v0).abs() / accel + 0.5) as u32
}

/// Distance covered over `periods` periods starting at `v0` with constant
/// acceleration, by the kinematic equation d = v0 t + a t² / 2.
fn discrete_distance(v0: f64, accel: f64, periods: u32) -> f64 {
    let t = periods as f64;
    v0 * t + 0.5 * accel * t * t
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_zero_distance_is_stationary() {
        let mut profile = TrapezoidalProfile::new();
        let periods = profile.generate(3.0, 0.0, 1.0, 1.0, 10.0, true);

        assert_eq!(periods, 0);
        assert_eq!(profile.total_periods(), 0);
        for p in [0u32, 1, 10, 1000].iter() {
            assert!((profile.velocity(*p) - 3.0).abs() < 1e-9);
        }
        assert!(profile.remaining_distance(0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_params_are_stationary() {
        let mut profile = TrapezoidalProfile::new();

        assert_eq!(profile.generate(1.0, 100.0, 0.0, 1.0, 10.0, true), 0);
        assert_eq!(profile.generate(1.0, 100.0, 1.0, -1.0, 10.0, true), 0);
        assert_eq!(profile.generate(1.0, 100.0, 1.0, 1.0, 0.0, true), 0);
    }

    #[test]
    fn test_trapezoidal_profile() {
        let mut profile = TrapezoidalProfile::new();
        let periods = profile.generate(0.0, 1000.0, 1.0, 1.0, 10.0, true);

        // 10 periods to accelerate (50 mm), 10 to decelerate (50 mm),
        // 900 mm plateau at 10 mm/period
        assert_eq!(periods, 110);

        assert!((profile.velocity(0)).abs() < 1e-9);
        assert!((profile.velocity(5) - 5.0).abs() < 1e-9);
        assert!((profile.velocity(10) - 10.0).abs() < 1e-9);
        assert!((profile.velocity(60) - 10.0).abs() < 1e-9);
        assert!((profile.velocity(105) - 5.0).abs() < 1e-9);
        assert!((profile.velocity(110)).abs() < 1e-9);
        assert!((profile.velocity(500)).abs() < 1e-9);

        assert!((profile.remaining_distance(0) - 1000.0).abs() < 1e-9);
        assert!(profile.remaining_distance(periods).abs() < 1.0);
    }

    #[test]
    fn test_triangular_profile() {
        let mut profile = TrapezoidalProfile::new();
        let periods = profile.generate(0.0, 100.0, 1.0, 1.0, 20.0, true);

        // Peak velocity sqrt(100) = 10, well below the max speed
        assert_eq!(periods, 20);
        assert!((profile.velocity(10) - 10.0).abs() < 1e-9);
        assert!(profile.remaining_distance(periods).abs() < 1.0);

        // Never exceeds the peak
        for p in 0..periods {
            assert!(profile.velocity(p).abs() <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_no_stop_profile_holds_max_speed() {
        let mut profile = TrapezoidalProfile::new();
        let periods = profile.generate(0.0, 1000.0, 1.0, 1.0, 10.0, false);

        // No deceleration ramp: 10 accel periods (50 mm) then a 950 mm
        // plateau
        assert_eq!(periods, 105);
        assert!((profile.velocity(periods) - 10.0).abs() < 1e-9);
        assert!((profile.velocity(periods + 50) - 10.0).abs() < 1e-9);
        assert!(profile.remaining_distance(periods).abs() < 1.0);
    }

    #[test]
    fn test_backward_profile_mirrors_forward() {
        let mut forward = TrapezoidalProfile::new();
        let mut backward = TrapezoidalProfile::new();

        let n_fwd = forward.generate(2.0, 1000.0, 0.5, 0.5, 8.0, true);
        let n_bwd = backward.generate(-2.0, -1000.0, 0.5, 0.5, 8.0, true);

        assert_eq!(n_fwd, n_bwd);
        for p in 0..=n_fwd {
            assert!((forward.velocity(p) + backward.velocity(p)).abs() < 1e-9);
            assert!(
                (forward.remaining_distance(p) + backward.remaining_distance(p)).abs() < 1e-9
            );
        }
    }

    #[test]
    fn test_opposing_initial_velocity_clamped() {
        let mut with_opposing = TrapezoidalProfile::new();
        let mut from_rest = TrapezoidalProfile::new();

        let n_opposing = with_opposing.generate(-5.0, 1000.0, 1.0, 1.0, 10.0, true);
        let n_rest = from_rest.generate(0.0, 1000.0, 1.0, 1.0, 10.0, true);

        // Planned as if starting from rest, no reversal phase
        assert_eq!(n_opposing, n_rest);
        for p in 0..=n_opposing {
            assert!((with_opposing.velocity(p) - from_rest.velocity(p)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cannot_brake_in_time_is_stationary() {
        let mut profile = TrapezoidalProfile::new();

        // Needs 200 mm to stop from 20 mm/period but only 30 mm remain
        let periods = profile.generate(20.0, 30.0, 1.0, 1.0, 10.0, true);

        assert_eq!(periods, 0);
        assert!((profile.velocity(0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_continuity_and_bounds() {
        let mut profile = TrapezoidalProfile::new();
        let periods = profile.generate(2.0, 500.0, 0.3, 0.7, 8.0, true);

        assert!(periods > 0);

        // Period rounding makes the last deceleration step up to half a
        // quantum larger than the deceleration itself
        let max_step = 0.7 * 1.5 + 1e-9;
        for p in 0..periods {
            let v0 = profile.velocity(p);
            let v1 = profile.velocity(p + 1);

            assert!(v0.abs() <= 8.0 + 1e-9);
            assert!((v1 - v0).abs() <= max_step);
        }

        // Remaining distance decreases monotonically
        let mut last = profile.remaining_distance(0);
        for p in 1..=periods {
            let d = profile.remaining_distance(p);
            assert!(d <= last + 1e-9);
            last = d;
        }
    }

    #[test]
    fn test_uninitialised_queries_are_zero() {
        let mut profile = TrapezoidalProfile::new();
        assert!(profile.velocity(10).abs() < 1e-9);
        assert!(profile.remaining_distance(10).abs() < 1e-9);

        profile.generate(0.0, 100.0, 1.0, 1.0, 10.0, true);
        profile.reset();

        assert_eq!(profile.total_periods(), 0);
        assert!(profile.velocity(0).abs() < 1e-9);
    }
}
