use log::info;
use serde;

use crate::dispatch::controller::DispatchController;
use crate::dispatch::messages::Report;
use crate::elevator_unit::runner::UnitHandle;
use crate::util::constants::Floor;
use crate::util::error::DispatchError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Progress {
    Waiting,
    Riding,
    Delivered,
}

/// A rider going from `current_floor` to `destination_floor`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Passenger {
    pub current_floor: Floor,
    pub destination_floor: Floor,
    pub requested_elevator: Option<usize>,
    pub progress: Progress,
}

impl Passenger {
    pub fn new(current_floor: Floor, destination_floor: Floor) -> Passenger {
        Passenger {
            current_floor: current_floor,
            destination_floor: destination_floor,
            requested_elevator: None,
            progress: Progress::Waiting,
        }
    }

    /// Calls elevator `unit_id` to the passenger's floor through the controller.
    pub fn call_elevator(&mut self, controller: &DispatchController, unit_id: usize) -> Result<(), DispatchError> {
        controller.handle_request(unit_id, self.current_floor)?;
        self.requested_elevator = Some(unit_id);
        info!("Passenger on floor {} called the elevator {}.", self.current_floor, unit_id);
        Ok(())
    }

    /// Selects the destination, then takes a place in the elevator.
    pub fn enter_elevator(&mut self, elevator: &UnitHandle) -> Result<(), DispatchError> {
        info!(
            "Passenger entering on floor {} and wants to go to floor {}",
            self.current_floor, self.destination_floor
        );
        elevator.request_stop(self.destination_floor)?;
        elevator.board()?;
        self.progress = Progress::Riding;
        Ok(())
    }

    pub fn leave_elevator(&mut self, elevator: &UnitHandle) -> Result<(), DispatchError> {
        elevator.alight()?;
        self.current_floor = self.destination_floor;
        self.progress = Progress::Delivered;
        info!("Passenger left elevator {} at floor {}.", elevator.id(), self.destination_floor);
        Ok(())
    }

    /// True if `report` says the called elevator is at the passenger's floor.
    pub fn is_picked_up_by(&self, report: &Report) -> bool {
        return self.progress == Progress::Waiting
            && self.requested_elevator == Some(report.unit_id)
            && self.current_floor == report.floor;
    }

    /// True if `report` says the passenger's elevator reached the destination.
    pub fn is_arriving(&self, report: &Report) -> bool {
        return self.progress == Progress::Riding
            && self.requested_elevator == Some(report.unit_id)
            && self.destination_floor == report.floor;
    }
}
