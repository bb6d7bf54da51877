//! Read entities definitions.

pub mod dashboard;
pub mod inquiry;
pub mod property;

pub use self::dashboard::Dashboard;
