//! Voucher spin wheel module.
//!
//! Every segment is equally likely; prize value does not affect odds.

mod spin;
mod store;
mod wheel;

pub use spin::{
    SpinBudget, SpinEngine, SpinOutcome, SpinPhase, SpinRecord, SpinRecordStatus, SpinRejection,
    SpinTicket, DEFAULT_DAILY_SPINS,
};
pub use store::{VoucherState, VoucherStore};
pub use wheel::{Reward, Wheel, WheelSegment};
