//! Terminal presentation of the three user operations.

pub mod chart;
pub mod convert;
pub mod history;
pub mod interactive;
pub mod rate;
pub mod setup;
pub mod ui;
