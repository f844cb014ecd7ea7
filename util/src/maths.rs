//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Wrap an angle in degrees into the range (-180, 180].
///
/// This function will return the representation of the angle with the
/// smallest magnitude, accounting for wrapping at +/-180.
pub fn wrap_angle_deg<T>(angle: T) -> T
where
    T: Float,
{
    let half_turn = T::from(180.0).unwrap();
    let full_turn = T::from(360.0).unwrap();

    let wrapped = rem_euclid(angle + half_turn, full_turn) - half_turn;

    // rem_euclid maps +180 onto -180, put it back on the +ve side
    if wrapped == -half_turn {
        half_turn
    } else {
        wrapped
    }
}

/// Convert an angle in degrees to radians.
pub fn deg_to_rad<T>(angle_deg: T) -> T
where
    T: Float,
{
    angle_deg * T::from(std::f64::consts::PI / 180.0).unwrap()
}

/// Convert an angle in radians to degrees.
pub fn rad_to_deg<T>(angle_rad: T) -> T
where
    T: Float,
{
    angle_rad * T::from(180.0 / std::f64::consts::PI).unwrap()
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() {
        r + rhs.abs()
    } else {
        r
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
