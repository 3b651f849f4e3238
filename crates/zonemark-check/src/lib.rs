//! # Zonemark Check
//!
//! Advisory validation for confirmed annotation geometry. The drawing tools
//! never clamp or reject what the user draws; consumers that persist lines
//! and zones for analytics engines run these checks first and decide what
//! to do with the findings.

pub mod checks;
pub mod violation;

pub use checks::{check_line, check_zone, has_errors};
pub use violation::{GeometryViolation, Severity, ViolationType};
