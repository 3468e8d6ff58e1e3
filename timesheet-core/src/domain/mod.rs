mod activity;
mod filters;
mod month;
mod row;

pub use activity::*;
pub use filters::*;
pub use month::*;
pub use row::*;
