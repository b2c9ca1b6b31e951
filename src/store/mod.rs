//! The shared attendance and schedule store, its clock and its seed data.

mod attendance_store;
mod clock_source;
mod seed;
mod subscribers;

pub use attendance_store::{AttendanceStore, StoreSnapshot};
pub use clock_source::{Clock, FixedClock, SystemClock};
pub use seed::SeedData;
pub use subscribers::Subscription;
