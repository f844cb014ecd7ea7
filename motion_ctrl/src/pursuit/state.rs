//! # Implementations for the adaptive pure pursuit state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};
use nalgebra::Vector2;

// Internal
use super::geometry::{circle_segment_intersection, point_on_segment};
use super::params::Params;
use crate::blackboard::{Blackboard, Key, PoseStatus};
use crate::controller::{Controller, TickInputs};
use crate::path::{MotionDirection, Path};
use util::maths::{deg_to_rad, rad_to_deg, wrap_angle_deg};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Lower bound on the chord to the lookahead point, avoids dividing by zero
/// in the curvature calculation.
///
/// Units: millimetres
const MIN_CHORD_MM: f64 = 1.0;

/// Curvatures below this are treated as straight-line motion.
const MIN_CURVATURE: f64 = 1e-6;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Tracking state of the pure pursuit controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuitState {
    /// Turning on the spot towards the start of the path.
    RotatingToDirection,

    /// Steering towards the lookahead point along the path.
    FollowingPath,

    /// Turning on the spot onto the final heading.
    RotatingToFinal,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Adaptive pure pursuit path tracking controller.
///
/// The controller borrows the path each period and never mutates its cursor,
/// progress along the path is tracked privately as a segment index and a
/// parameter along that segment. Segment 0 is the implicit segment from the
/// robot's position to the first waypoint.
pub struct AdaptivePurePursuit {
    params: Params,

    state: PursuitState,

    /// Index of the segment the lookahead point was last found on.
    segment_index: usize,

    /// Parameter of the lookahead point along that segment, in [0, 1].
    segment_param: f64,

    /// True once the direction of travel of a bidirectional path is chosen.
    direction_locked: bool,

    /// The chosen direction, only meaningful when locked.
    locked_backward: bool,

    /// True on the first period of a rotating state, signals the angular
    /// pose loop to regenerate its profile.
    first_rotating_cycle: bool,

    /// True until the first period after construction or reset.
    needs_path_init: bool,

    /// Heading to face before starting to follow the path.
    ///
    /// Units: degrees
    target_direction_deg: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AdaptivePurePursuit {
    /// Create a controller with the given parameters.
    pub fn new(params: Params) -> Result<Self, super::ParamsError> {
        params.validate()?;

        Ok(Self {
            params,
            state: PursuitState::RotatingToDirection,
            segment_index: 0,
            segment_param: 0.0,
            direction_locked: false,
            locked_backward: false,
            first_rotating_cycle: true,
            needs_path_init: true,
            target_direction_deg: 0.0,
        })
    }

    /// Current tracking state.
    pub fn state(&self) -> PursuitState {
        self.state
    }

    /// Progress along the path as (segment index, segment parameter).
    ///
    /// Never regresses while a path is being followed.
    pub fn segment_progress(&self) -> (usize, f64) {
        (self.segment_index, self.segment_param)
    }

    /// Lookahead distance for the given speed, growing linearly between the
    /// configured bounds.
    fn lookahead_distance(&self, current_speed: f64) -> f64 {
        let lookahead =
            self.params.min_lookahead + current_speed.abs() * self.params.lookahead_speed_ratio;

        lookahead.clamp(self.params.min_lookahead, self.params.max_lookahead)
    }

    /// Find the lookahead point by intersecting the lookahead circle with the
    /// path, scanning from the current progress so the point never regresses.
    ///
    /// Falls back to the next waypoint when no intersection lies ahead.
    fn find_lookahead_point(
        &mut self,
        path: &Path,
        robot: Vector2<f64>,
        lookahead: f64,
    ) -> Option<Vector2<f64>> {
        let waypoints = path.waypoints();

        if waypoints.is_empty() {
            return None;
        }

        if self.segment_index >= waypoints.len() {
            self.segment_index = 0;
            self.segment_param = 0.0;
        }

        for i in self.segment_index..waypoints.len() {
            let (start, end) = if i == 0 {
                // Implicit segment from the robot to the first waypoint
                (robot, waypoints[0].position())
            } else {
                (waypoints[i - 1].position(), waypoints[i].position())
            };

            if let Some(t) = circle_segment_intersection(start, end, robot, lookahead) {
                // Accept only progress: a later segment, or further along
                // the current one
                if i > self.segment_index || t > self.segment_param {
                    self.segment_index = i;
                    self.segment_param = t;
                    return Some(point_on_segment(start, end, t));
                }
            }
        }

        // No intersection ahead, target the end of the current segment
        let fallback = if self.segment_index < waypoints.len() {
            &waypoints[self.segment_index]
        } else {
            &waypoints[waypoints.len() - 1]
        };

        debug!(
            "No lookahead intersection, falling back to waypoint {}",
            self.segment_index.min(waypoints.len() - 1)
        );

        Some(fallback.position())
    }

    /// Remaining distance along the path from the robot to the last
    /// waypoint.
    fn distance_to_goal(&self, path: &Path, robot: Vector2<f64>) -> f64 {
        let waypoints = path.waypoints();

        if waypoints.is_empty() {
            return 0.0;
        }

        let start_idx = if self.segment_index < waypoints.len() {
            self.segment_index
        } else {
            0
        };

        // Remainder of the current segment
        let mut total = if start_idx > 0 {
            let segment = waypoints[start_idx].position() - waypoints[start_idx - 1].position();
            (1.0 - self.segment_param) * segment.norm()
        } else {
            (waypoints[0].position() - robot).norm()
        };

        // Plus the polyline length of all later segments
        for i in start_idx..waypoints.len().saturating_sub(1) {
            total += (waypoints[i + 1].position() - waypoints[i].position()).norm();
        }

        total
    }

    /// Write zero speed orders and the given pose status.
    fn output_stopped(&self, io: &mut Blackboard, status: PoseStatus) {
        io.set_float(Key::LinearSpeedOrder, 0.0);
        io.set_float(Key::AngularSpeedOrder, 0.0);
        io.set_status(Key::PoseReached, status);
    }
}

impl Controller for AdaptivePurePursuit {
    fn name(&self) -> &'static str {
        "adaptive_pure_pursuit"
    }

    fn execute(&mut self, inputs: &TickInputs, io: &mut Blackboard) {
        let path = match inputs.path {
            Some(p) if p.is_started() && !p.is_empty() => p,
            _ => {
                // Path not ready yet, hold position without signalling
                // completion
                self.output_stopped(io, PoseStatus::Moving);
                return;
            }
        };

        let current_x = io.get_float(Key::CurrentPoseX);
        let current_y = io.get_float(Key::CurrentPoseY);
        let current_o = io.get_float(Key::CurrentPoseO);
        let robot = Vector2::new(current_x, current_y);
        let current_speed = io.get_float(Key::LinearCurrentSpeed).abs();

        // The whole path is followed in one direction and ends at one pose,
        // both taken from the last waypoint
        let (first_wp, last_wp) = match (path.first(), path.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => {
                self.output_stopped(io, PoseStatus::Moving);
                return;
            }
        };
        let motion_dir = last_wp.motion_direction;

        if self.needs_path_init {
            debug!("Starting new path with {} waypoints", path.len());

            self.segment_index = 0;
            self.segment_param = 0.0;
            self.direction_locked = false;

            let to_first = first_wp.position() - robot;
            let angle_to_first = rad_to_deg(to_first[1].atan2(to_first[0]));

            let go_backward = match motion_dir {
                MotionDirection::ForwardOnly => false,
                MotionDirection::BackwardOnly => true,
                MotionDirection::Bidirectional => {
                    // Choose whichever direction needs less turning and lock
                    // it for the whole path
                    let alpha = wrap_angle_deg(angle_to_first - current_o);
                    self.locked_backward = alpha.abs() > 90.0;
                    self.direction_locked = true;
                    self.locked_backward
                }
            };

            self.target_direction_deg = if go_backward {
                wrap_angle_deg(angle_to_first + 180.0)
            } else {
                angle_to_first
            };

            // Bidirectional paths skip the initial rotation, pure pursuit
            // turns while moving
            self.state = if motion_dir == MotionDirection::Bidirectional {
                PursuitState::FollowingPath
            } else {
                PursuitState::RotatingToDirection
            };
            self.first_rotating_cycle = true;
            self.needs_path_init = false;
        }

        let target_orientation = last_wp.pose.heading_deg;
        let bypass_final = last_wp.bypass_final_orientation;
        io.set_bool(Key::IsIntermediate, last_wp.is_intermediate);

        let distance_to_goal = self.distance_to_goal(path, robot);

        if self.state == PursuitState::RotatingToDirection {
            let angular_error = wrap_angle_deg(self.target_direction_deg - current_o);

            if angular_error.abs() < self.params.initial_rotation_threshold {
                debug!("Initial rotation complete, error {:.2} deg", angular_error);
                self.state = PursuitState::FollowingPath;
                self.first_rotating_cycle = true;
            } else {
                // The angular pose loop does the turning, publish the error
                // for it and hold the wheels
                io.set_float(Key::AngularPoseError, angular_error);
                io.set_bool(Key::RecomputeAngularProfile, self.first_rotating_cycle);
                self.first_rotating_cycle = false;
                io.set_bool(Key::RotatingInPlace, true);
                self.output_stopped(io, PoseStatus::Moving);
                return;
            }
        }

        if self.state == PursuitState::FollowingPath
            && distance_to_goal < self.params.linear_threshold
        {
            if bypass_final {
                debug!("Position reached, bypassing final orientation");
                io.set_bool(Key::PathComplete, true);
                self.output_stopped(io, PoseStatus::Reached);
                return;
            }

            debug!(
                "Position reached, rotating to final heading {:.1} deg",
                target_orientation
            );
            self.state = PursuitState::RotatingToFinal;
            self.first_rotating_cycle = true;
        }

        io.set_bool(
            Key::RotatingInPlace,
            self.state == PursuitState::RotatingToFinal,
        );

        if self.state == PursuitState::RotatingToFinal {
            let angular_error = wrap_angle_deg(target_orientation - current_o);

            if angular_error.abs() < self.params.angular_threshold {
                debug!("Final orientation reached, error {:.2} deg", angular_error);
                io.set_bool(Key::PathComplete, true);
                io.set_bool(Key::RotatingInPlace, false);
                self.output_stopped(io, PoseStatus::Reached);
                return;
            }

            io.set_float(Key::AngularPoseError, angular_error);
            io.set_bool(Key::RecomputeAngularProfile, self.first_rotating_cycle);
            self.first_rotating_cycle = false;
            self.output_stopped(io, PoseStatus::Moving);
            return;
        }

        // Track the lookahead point
        let lookahead_distance = self.lookahead_distance(current_speed);
        let lookahead = match self.find_lookahead_point(path, robot, lookahead_distance) {
            Some(p) => p,
            None => {
                warn!("No valid lookahead point, stopping");
                self.output_stopped(io, PoseStatus::Moving);
                return;
            }
        };

        let to_lookahead = lookahead - robot;
        let angle_to_lookahead = rad_to_deg(to_lookahead[1].atan2(to_lookahead[0]));
        let mut alpha = wrap_angle_deg(angle_to_lookahead - current_o);

        let go_backward = match motion_dir {
            MotionDirection::ForwardOnly => false,
            MotionDirection::BackwardOnly => true,
            MotionDirection::Bidirectional => {
                // Lock the direction on first determination to avoid
                // oscillating between forward and backward
                if !self.direction_locked {
                    self.locked_backward = alpha.abs() > 90.0;
                    self.direction_locked = true;
                    debug!(
                        "Direction locked: {}",
                        if self.locked_backward {
                            "backward"
                        } else {
                            "forward"
                        }
                    );
                }
                self.locked_backward
            }
        };

        // Driving backward the lookahead point sits behind the robot's nose
        if go_backward {
            alpha = wrap_angle_deg(alpha + 180.0);
        }

        let chord = to_lookahead.norm().max(MIN_CHORD_MM);
        let alpha_rad = deg_to_rad(alpha);
        let sin_alpha = alpha_rad.sin();
        let cos_alpha = alpha_rad.cos();

        // Facing away from the lookahead point, rotate in place instead of
        // arcing
        if cos_alpha <= 0.0 {
            let rotate_max = self.params.max_angular_speed * 0.5;
            let decel_limited = (2.0 * self.params.angular_deceleration * alpha.abs()).sqrt();
            let mut angular_speed = rotate_max.min(decel_limited);
            if alpha < 0.0 {
                angular_speed = -angular_speed;
            }

            debug!(
                "Rotating in place, alpha {:.1} deg, speed {:.2}",
                alpha, angular_speed
            );

            io.set_float(Key::LinearSpeedOrder, 0.0);
            io.set_float(Key::AngularSpeedOrder, angular_speed);
            io.set_status(Key::PoseReached, PoseStatus::Moving);
            return;
        }

        // Curvature of the arc through the lookahead point, radians per
        // millimetre
        let curvature = 2.0 * sin_alpha / chord;

        // Slowest of the speed cap, the braking constraint and the curvature
        // constraint (which keeps the implied angular speed within limits)
        let decel_limited = (2.0 * self.params.linear_deceleration * distance_to_goal).sqrt();
        let curvature_limited = if curvature.abs() > MIN_CURVATURE {
            deg_to_rad(self.params.max_angular_speed) / curvature.abs()
        } else {
            self.params.max_linear_speed
        };

        let target_speed = self
            .params
            .max_linear_speed
            .min(decel_limited)
            .min(curvature_limited);

        // Speed increases are rate limited, decreases apply immediately
        let mut linear_speed = if target_speed > current_speed {
            target_speed.min(current_speed + self.params.linear_acceleration)
        } else {
            target_speed
        };

        if go_backward {
            linear_speed = -linear_speed;
        }

        // Curvature is rad/mm and speed mm/period, the product is rad/period
        let angular_speed = rad_to_deg(linear_speed.abs() * curvature).clamp(
            -self.params.max_angular_speed,
            self.params.max_angular_speed,
        );

        io.set_float(Key::LinearSpeedOrder, linear_speed);
        io.set_float(Key::AngularSpeedOrder, angular_speed);
        io.set_status(Key::PoseReached, PoseStatus::Moving);
    }

    fn reset(&mut self) {
        self.state = PursuitState::RotatingToDirection;
        self.segment_index = 0;
        self.segment_param = 0.0;
        self.direction_locked = false;
        self.locked_backward = false;
        self.first_rotating_cycle = true;
        self.needs_path_init = true;
        self.target_direction_deg = 0.0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
