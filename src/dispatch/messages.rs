use crossbeam_channel as cbc;
use serde;

use crate::elevator_unit::stop_list::StopList;
use crate::elevator_unit::unit::Status;
use crate::util::constants::Floor;
use crate::util::error::DispatchError;

/// Pickup call for `unit_id`, sent to the dispatch controller
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Request {
    pub unit_id: usize,
    pub floor: Floor,
}

/// Position announcement, emitted by every unit once per tick
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub unit_id: usize,
    pub floor: Floor,
}

/// Everything worth knowing about a unit at one instant.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UnitInfo {
    pub id: usize,
    pub floor: Floor,
    pub status: Status,
    pub pending_stops: StopList,
    pub occupancy: usize,
    pub capacity: usize,
}

/// Calls that need an answer from a running unit. The unit replies on the channel carried by the command.
#[derive(Debug)]
pub enum UnitCommand {
    RequestStop {
        floor: Floor,
        reply: cbc::Sender<Result<(), DispatchError>>,
    },
    Board {
        reply: cbc::Sender<Result<(), DispatchError>>,
    },
    Alight,
    Info {
        reply: cbc::Sender<UnitInfo>,
    },
}
