//! Builds a monthly timesheet out of commits and pull request reviews.
//!
//! Raw records go through [`Normalizer`] (month and reviewer checks),
//! [`filter_by_author`], [`allocate`] and [`assemble`], and come out as CSV via
//! [`csv::serialize`]. [`Timesheet::build`] runs the whole chain.

mod allocation;
mod assemble;
pub mod csv;
mod domain;
mod error;
mod format;
mod normalize;
mod timesheet;

pub use allocation::*;
pub use assemble::assemble;
pub use domain::*;
pub use error::TimesheetError;
pub use format::*;
pub use normalize::*;
pub use timesheet::*;
