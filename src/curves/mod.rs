//! Performance curve computations
//!
//! - `validation`: shape rules every curve must satisfy (≥2 finite points,
//!   rate monotonic within tolerance)
//! - `intersection`: operating point of an inflow/lift pair
//! - `interpolation`: pressure at a given rate along one curve
//!
//! All functions are pure and allocate their own output, so they are safe to
//! call from any number of threads.

mod interpolation;
mod intersection;
mod validation;

pub use interpolation::interpolate_pressure;
pub use intersection::find_operating_point;
pub use validation::validate_points;
