//! Governance-controlled parameter schedules.
//!
//! Two independent state machines gate parameter changes:
//!
//! - [`AmpSchedule`] ramps the amplification coefficient linearly over
//!   time with a bounded rate of change.
//! - [`GovernanceSchedule`] time-locks fee changes behind a
//!   commit/apply two-phase protocol.

mod amp_schedule;
mod governance;

pub use amp_schedule::AmpSchedule;
pub use governance::GovernanceSchedule;
