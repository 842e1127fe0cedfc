use thiserror::Error;

use crate::util::constants::Floor;

/// Everything that can go wrong when asking a unit or the controller to do something.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Floor requested is invalid. Floor: {0}")]
    InvalidFloor(Floor),
    #[error("Elevator is full.")]
    AtCapacity,
    #[error("No elevator registered with id {0}.")]
    UnknownUnit(usize),
    /// Reserved for a rider-to-unit assignment policy. Nothing raises it.
    #[error("No elevator available.")]
    NoUnitAvailable,
    #[error("Elevator {0} is no longer running.")]
    UnitDisconnected(usize),
    #[error("Every elevator stopped reporting.")]
    ReportsClosed,
}
