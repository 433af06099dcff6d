pub mod invariants;

pub use invariants::{check, InvariantViolation};
