//! Check-in core: token rotation, the check-in workflow and its clock.

pub mod checkin;
pub mod clock;
pub mod error;
pub mod token_rotator;

pub use checkin::{CheckInService, SubmitAttendance};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CheckInError;
pub use token_rotator::{RotationConfig, RotationSnapshot, Token, TokenRotator};
