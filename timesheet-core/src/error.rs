use thiserror::Error;

use crate::AllocationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimesheetError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error("allocation has {actual} durations but there are {expected} entries")]
    AllocationMismatch { expected: usize, actual: usize },
}
