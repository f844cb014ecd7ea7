//! Closed-loop scenarios driving the pure pursuit controller over simulated
//! differential-drive kinematics.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use motion_ctrl::blackboard::{Blackboard, Key};
use motion_ctrl::controller::{Controller, NoOpController, Pipeline, TickInputs};
use motion_ctrl::path::{MotionDirection, Path, Waypoint};
use motion_ctrl::pursuit::{AdaptivePurePursuit, Params};
use motion_ctrl::wrappers::{ResetController, ThrottledController};
use util::maths::{deg_to_rad, wrap_angle_deg};

// ---------------------------------------------------------------------------
// SIMULATION HARNESS
// ---------------------------------------------------------------------------

/// A perfectly-actuated robot: speed orders are applied verbatim each period.
struct SimRobot {
    x_mm: f64,
    y_mm: f64,
    heading_deg: f64,
}

impl SimRobot {
    fn new(x_mm: f64, y_mm: f64, heading_deg: f64) -> Self {
        Self {
            x_mm,
            y_mm,
            heading_deg,
        }
    }

    /// Publish the robot state onto the blackboard.
    fn publish(&self, bb: &mut Blackboard) {
        bb.set_float(Key::CurrentPoseX, self.x_mm);
        bb.set_float(Key::CurrentPoseY, self.y_mm);
        bb.set_float(Key::CurrentPoseO, self.heading_deg);
    }

    /// Apply the speed orders from the blackboard for one period.
    fn apply_orders(&mut self, bb: &mut Blackboard) {
        let linear = bb.get_float(Key::LinearSpeedOrder);
        let angular = bb.get_float(Key::AngularSpeedOrder);

        self.heading_deg = wrap_angle_deg(self.heading_deg + angular);
        let heading_rad = deg_to_rad(self.heading_deg);
        self.x_mm += linear * heading_rad.cos();
        self.y_mm += linear * heading_rad.sin();

        bb.set_float(Key::LinearCurrentSpeed, linear);
        bb.set_float(Key::AngularCurrentSpeed, angular);
    }
}

fn waypoint(
    x_mm: f64,
    y_mm: f64,
    heading_deg: f64,
    motion_direction: MotionDirection,
    bypass_final_orientation: bool,
) -> Waypoint {
    let mut wp = Waypoint::at(x_mm, y_mm, heading_deg);
    wp.motion_direction = motion_direction;
    wp.bypass_final_orientation = bypass_final_orientation;
    wp
}

// ---------------------------------------------------------------------------
// SCENARIOS
// ---------------------------------------------------------------------------

#[test]
fn scenario_straight_line_forward() {
    let mut pursuit = AdaptivePurePursuit::new(Params::default()).unwrap();
    let mut robot = SimRobot::new(0.0, 0.0, 0.0);
    let mut bb = Blackboard::new();

    let mut path = Path::new();
    path.add_point(waypoint(500.0, 0.0, 0.0, MotionDirection::ForwardOnly, true));
    path.start();

    let mut complete = false;
    for _ in 0..2000 {
        robot.publish(&mut bb);
        pursuit.execute(&TickInputs::with_path(&path), &mut bb);

        if bb.get_bool(Key::PathComplete) {
            complete = true;
            break;
        }

        // Straight path: the robot never turns
        assert!(bb.get_float(Key::AngularSpeedOrder).abs() < 1e-9);
        assert!(bb.get_float(Key::LinearSpeedOrder) >= 0.0);

        robot.apply_orders(&mut bb);
    }

    assert!(complete, "path never completed");
    assert!((robot.x_mm - 500.0).abs() < 15.0);
    assert!(robot.y_mm.abs() < 1.0);
}

#[test]
fn scenario_initial_rotation_then_tracking() {
    let mut pursuit = AdaptivePurePursuit::new(Params::default()).unwrap();
    let mut robot = SimRobot::new(0.0, 0.0, 0.0);
    let mut bb = Blackboard::new();

    // Waypoint behind the robot, forwards travel enforced
    let mut path = Path::new();
    path.add_point(waypoint(
        -500.0,
        0.0,
        180.0,
        MotionDirection::ForwardOnly,
        true,
    ));
    path.start();

    // First period: the controller asks for an initial rotation
    robot.publish(&mut bb);
    pursuit.execute(&TickInputs::with_path(&path), &mut bb);

    assert!(bb.get_bool(Key::RotatingInPlace));
    assert!(bb.get_bool(Key::RecomputeAngularProfile));
    assert!(bb.get_float(Key::LinearSpeedOrder).abs() < 1e-9);
    assert!(bb.get_float(Key::AngularSpeedOrder).abs() < 1e-9);
    assert!((bb.get_float(Key::AngularPoseError).abs() - 180.0).abs() < 1e-6);

    let mut complete = false;
    for _ in 0..3000 {
        robot.publish(&mut bb);
        pursuit.execute(&TickInputs::with_path(&path), &mut bb);

        if bb.get_bool(Key::PathComplete) {
            complete = true;
            break;
        }

        if bb.get_bool(Key::RotatingInPlace) {
            // Stand in for the angular pose loop: turn towards the target
            let error = bb.get_float(Key::AngularPoseError);
            robot.heading_deg =
                wrap_angle_deg(robot.heading_deg + error.clamp(-3.0, 3.0));
        } else {
            // Forwards travel only once tracking starts
            assert!(bb.get_float(Key::LinearSpeedOrder) >= 0.0);
            robot.apply_orders(&mut bb);
        }
    }

    assert!(complete, "path never completed");
    assert!((robot.x_mm + 500.0).abs() < 15.0);
    assert!(robot.y_mm.abs() < 30.0);
}

#[test]
fn scenario_bidirectional_reverses_without_rotation() {
    let mut pursuit = AdaptivePurePursuit::new(Params::default()).unwrap();
    let mut robot = SimRobot::new(0.0, 0.0, 0.0);
    let mut bb = Blackboard::new();

    // Waypoint behind with free direction: reversing avoids any turn
    let mut path = Path::new();
    path.add_point(waypoint(
        -500.0,
        0.0,
        0.0,
        MotionDirection::Bidirectional,
        true,
    ));
    path.start();

    let mut complete = false;
    for _ in 0..2000 {
        robot.publish(&mut bb);
        pursuit.execute(&TickInputs::with_path(&path), &mut bb);

        if bb.get_bool(Key::PathComplete) {
            complete = true;
            break;
        }

        // The robot reverses the whole way, never rotating in place
        assert!(!bb.get_bool(Key::RotatingInPlace));
        assert!(bb.get_float(Key::LinearSpeedOrder) <= 0.0);

        robot.apply_orders(&mut bb);
    }

    assert!(complete, "path never completed");
    assert!((robot.x_mm + 500.0).abs() < 15.0);
    assert!((robot.heading_deg).abs() < 1.0);
}

#[test]
fn scenario_polyline_progress_never_regresses() {
    let mut pursuit = AdaptivePurePursuit::new(Params::default()).unwrap();
    let mut robot = SimRobot::new(0.0, 0.0, 0.0);
    let mut bb = Blackboard::new();

    let mut path = Path::new();
    path.add_point(waypoint(400.0, 0.0, 0.0, MotionDirection::ForwardOnly, false));
    path.add_point(waypoint(
        400.0,
        300.0,
        90.0,
        MotionDirection::ForwardOnly,
        false,
    ));
    path.add_point(waypoint(
        800.0,
        300.0,
        0.0,
        MotionDirection::ForwardOnly,
        true,
    ));
    path.start();

    let mut complete = false;
    let mut progress = pursuit.segment_progress();

    for _ in 0..5000 {
        robot.publish(&mut bb);
        pursuit.execute(&TickInputs::with_path(&path), &mut bb);

        let next = pursuit.segment_progress();
        let advanced = next.0 > progress.0 || (next.0 == progress.0 && next.1 >= progress.1);
        assert!(
            advanced,
            "progress regressed from {:?} to {:?}",
            progress, next
        );
        progress = next;

        if bb.get_bool(Key::PathComplete) {
            complete = true;
            break;
        }

        robot.apply_orders(&mut bb);
    }

    assert!(complete, "path never completed");
    // The goal distance is measured from the lookahead progress, so the
    // robot can still trail the goal by up to one lookahead on completion
    assert_eq!(progress.0, 2);
    assert!(robot.x_mm > 550.0);
    assert!((robot.y_mm - 300.0).abs() < 60.0);
}

#[test]
fn scenario_full_pipeline() {
    // A pipeline as the outer software would assemble it: a baseline reset
    // stage, a throttled placeholder stage and the pursuit controller
    let mut reset = ResetController::new();
    assert!(reset.add(Key::LinearSpeedOrder, 0.0));
    assert!(reset.add(Key::AngularSpeedOrder, 0.0));

    let mut pipeline = Pipeline::new();
    pipeline.add(reset);
    pipeline.add(ThrottledController::new(Box::new(NoOpController), 10));
    pipeline.add(AdaptivePurePursuit::new(Params::default()).unwrap());

    let mut robot = SimRobot::new(0.0, 0.0, 0.0);
    let mut bb = Blackboard::new();

    let mut path = Path::new();
    path.add_point(waypoint(300.0, 0.0, 0.0, MotionDirection::ForwardOnly, true));
    path.start();

    let mut complete = false;
    for _ in 0..2000 {
        robot.publish(&mut bb);
        pipeline.execute(&TickInputs::with_path(&path), &mut bb);

        if bb.get_bool(Key::PathComplete) {
            complete = true;
            break;
        }

        robot.apply_orders(&mut bb);
    }

    assert!(complete, "path never completed");
    assert!((robot.x_mm - 300.0).abs() < 15.0);

    // Resetting the pipeline resets every stage
    pipeline.reset();
}
