use crossbeam_channel as cbc;
use log::{debug, info, warn};
use serde;

use crate::dispatch::messages::{Report, UnitCommand, UnitInfo};
use crate::elevator_unit::direction_decider;
use crate::elevator_unit::runner::UnitHandle;
use crate::elevator_unit::stop_list::StopList;
use crate::util::constants::{Floor, GROUND_FLOOR};
use crate::util::error::DispatchError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, Hash)]
pub enum Status {
    Idle,
    MovingUp,
    MovingDown,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Status {
    /// `None` when idle
    pub fn direction(self) -> Option<Direction> {
        match self {
            Status::Idle => None,
            Status::MovingUp => Some(Direction::Up),
            Status::MovingDown => Some(Direction::Down),
        }
    }

    /// Idle stays idle.
    pub fn reversed(self) -> Status {
        match self {
            Status::Idle => Status::Idle,
            Status::MovingUp => Status::MovingDown,
            Status::MovingDown => Status::MovingUp,
        }
    }
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn step(self) -> Floor {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    pub fn moving_status(self) -> Status {
        match self {
            Direction::Up => Status::MovingUp,
            Direction::Down => Status::MovingDown,
        }
    }
}

/// One elevator and its scheduling state machine.
/// * `report_tx` the shared channel every tick's position is reported on
/// * `inbound_rx` low-level floor requests, at most one applied per tick
/// * `command_rx` calls that expect an answer, all answered every tick
///
/// The sending halves are kept so that handles can be made at any time. Dropping the unit disconnects them.
#[derive(Debug)]
pub struct ElevatorUnit {
    id: usize,
    floor: Floor,
    status: Status,
    stops: StopList,
    num_floors: Floor,
    capacity: usize,
    occupancy: usize,
    strict_inbound: bool,
    report_tx: cbc::Sender<Report>,
    inbound_tx: cbc::Sender<Floor>,
    inbound_rx: cbc::Receiver<Floor>,
    command_tx: cbc::Sender<UnitCommand>,
    command_rx: cbc::Receiver<UnitCommand>,
}

impl ElevatorUnit {
    /// Creates an idle, empty elevator on the ground floor.
    ///
    /// * `num_floors` - floors `0..num_floors` can be requested
    /// * `capacity` - number of riders the elevator can carry
    pub fn new(id: usize, num_floors: Floor, capacity: usize, report_tx: cbc::Sender<Report>) -> ElevatorUnit {
        let (inbound_tx, inbound_rx) = cbc::unbounded::<Floor>();
        let (command_tx, command_rx) = cbc::unbounded::<UnitCommand>();
        return ElevatorUnit {
            id: id,
            floor: GROUND_FLOOR,
            status: Status::Idle,
            stops: StopList::new(),
            num_floors: num_floors,
            capacity: capacity,
            occupancy: 0,
            strict_inbound: false,
            report_tx: report_tx,
            inbound_tx: inbound_tx,
            inbound_rx: inbound_rx,
            command_tx: command_tx,
            command_rx: command_rx,
        };
    }

    /// Makes inbound floors go through [`ElevatorUnit::request_stop`] instead of being appended unchecked.
    pub fn with_strict_inbound(mut self, strict: bool) -> ElevatorUnit {
        self.strict_inbound = strict;
        return self;
    }

    pub fn handle(&self) -> UnitHandle {
        return UnitHandle::new(self.id, self.inbound_tx.clone(), self.command_tx.clone());
    }

    pub fn get_id(&self) -> usize {
        return self.id;
    }
    pub fn get_floor(&self) -> Floor {
        return self.floor;
    }
    pub fn get_status(&self) -> Status {
        return self.status;
    }
    pub fn get_stops(&self) -> &[Floor] {
        return self.stops.as_slice();
    }
    pub fn get_occupancy(&self) -> usize {
        return self.occupancy;
    }
    pub fn get_info(&self) -> UnitInfo {
        return UnitInfo {
            id: self.id,
            floor: self.floor,
            status: self.status,
            pending_stops: self.stops.clone(),
            occupancy: self.occupancy,
            capacity: self.capacity,
        };
    }

    fn is_valid_floor(&self, floor: Floor) -> bool {
        return GROUND_FLOOR <= floor && floor < self.num_floors;
    }

    /// Adds a stop. Requesting a floor that is already pending does nothing.
    pub fn request_stop(&mut self, floor: Floor) -> Result<(), DispatchError> {
        if !self.is_valid_floor(floor) {
            return Err(DispatchError::InvalidFloor(floor));
        }
        if self.occupancy >= self.capacity {
            return Err(DispatchError::AtCapacity);
        }
        if self.stops.add(floor) {
            self.resort_pending_stops();
        }
        Ok(())
    }

    pub fn board(&mut self) -> Result<(), DispatchError> {
        if self.occupancy >= self.capacity {
            return Err(DispatchError::AtCapacity);
        }
        self.occupancy += 1;
        Ok(())
    }

    pub fn alight(&mut self) {
        if self.occupancy == 0 {
            warn!("Elevator {} has nobody to let off at floor {}", self.id, self.floor);
            return;
        }
        self.occupancy -= 1;
    }

    pub fn resort_pending_stops(&mut self) {
        self.stops.sort_for(self.status, self.floor);
    }

    /// Floor the elevator is heading for. May turn a moving elevator around.
    pub fn next_floor(&mut self) -> Floor {
        return direction_decider::next_floor(&mut self.status, self.floor, self.num_floors, &self.stops);
    }

    /// Moves one floor towards `target`, or goes idle if already there.
    pub fn move_towards(&mut self, target: Floor) {
        if self.floor == target {
            self.status = Status::Idle;
            return;
        }
        let dirn = if target > self.floor { Direction::Up } else { Direction::Down };
        let next = self.floor + dirn.step();
        if !self.is_valid_floor(next) {
            warn!("Elevator {} can not move past floor {}", self.id, self.floor);
            return;
        }
        self.floor = next;
        self.status = dirn.moving_status();
    }

    fn stop_at(&mut self, floor: Floor) {
        self.stops.remove(floor);
        info!("Elevator {} stopping at floor {}", self.id, floor);
        if self.stops.is_empty() {
            self.status = Status::Idle;
        }
    }

    /// Advances the elevator by one step of simulated time and reports where it is.
    ///
    /// The elevator moves at most one floor. When that floor, or the one it is already standing on,
    /// is the floor it was heading for, the stop is served in the same tick.
    pub fn tick(&mut self) -> Report {
        if self.stops.is_empty() {
            self.status = Status::Idle;
            return self.report();
        }

        let target = self.next_floor();
        if target != self.floor {
            self.move_towards(target);
        }
        if self.floor == target {
            self.stop_at(target);
        }
        self.resort_pending_stops();

        if self.status != Status::Idle {
            debug!("Elevator {} at floor {} heading for {}", self.id, self.floor, target);
        }
        return self.report();
    }

    fn report(&self) -> Report {
        let report = Report {
            unit_id: self.id,
            floor: self.floor,
        };
        if self.report_tx.send(report).is_err() {
            debug!("Elevator {} has nobody listening for reports", self.id);
        }
        return report;
    }

    /// Applies at most one floor from the inbound channel. Never blocks.
    pub fn drain_inbound(&mut self) {
        let floor = match self.inbound_rx.try_recv() {
            Ok(floor) => floor,
            Err(_) => return,
        };

        if self.strict_inbound {
            if let Err(e) = self.request_stop(floor) {
                warn!("Elevator {} dropped inbound request: {}", self.id, e);
            }
            return;
        }

        // Capacity is not checked on this path.
        if !self.is_valid_floor(floor) {
            warn!("Elevator {} dropped inbound request for floor {}", self.id, floor);
            return;
        }
        if floor != self.floor && self.stops.add(floor) {
            debug!("Elevator {} queued floor {}", self.id, floor);
            self.resort_pending_stops();
        }
    }

    /// Answers every queued command. Never blocks.
    pub fn process_commands(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            match command {
                UnitCommand::RequestStop { floor, reply } => {
                    let _ = reply.send(self.request_stop(floor));
                }
                UnitCommand::Board { reply } => {
                    let _ = reply.send(self.board());
                }
                UnitCommand::Alight => self.alight(),
                UnitCommand::Info { reply } => {
                    let _ = reply.send(self.get_info());
                }
            }
        }
    }
}
