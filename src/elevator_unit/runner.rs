use crossbeam_channel as cbc;
use log::{debug, info};
use std::thread::{self, JoinHandle};
use std::time;

use crate::dispatch::messages::{UnitCommand, UnitInfo};
use crate::elevator_unit::unit::ElevatorUnit;
use crate::util::constants::Floor;
use crate::util::error::DispatchError;

/// Sending side of a unit. Cheap to clone and safe to hand to other threads.
///
/// The blocking calls are answered by the unit at the start of its next tick.
#[derive(Clone, Debug)]
pub struct UnitHandle {
    id: usize,
    inbound_tx: cbc::Sender<Floor>,
    command_tx: cbc::Sender<UnitCommand>,
}

impl UnitHandle {
    pub(crate) fn new(id: usize, inbound_tx: cbc::Sender<Floor>, command_tx: cbc::Sender<UnitCommand>) -> UnitHandle {
        UnitHandle {
            id: id,
            inbound_tx: inbound_tx,
            command_tx: command_tx,
        }
    }

    pub fn id(&self) -> usize {
        return self.id;
    }

    /// Queues `floor` on the unit's inbound channel. The unit picks it up on a later tick without
    /// checking capacity.
    pub fn add_floor(&self, floor: Floor) -> Result<(), DispatchError> {
        return self
            .inbound_tx
            .send(floor)
            .map_err(|_| DispatchError::UnitDisconnected(self.id));
    }

    pub fn request_stop(&self, floor: Floor) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(UnitCommand::RequestStop { floor: floor, reply: reply_tx })?;
        return self.wait(reply_rx)?;
    }

    pub fn board(&self) -> Result<(), DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(UnitCommand::Board { reply: reply_tx })?;
        return self.wait(reply_rx)?;
    }

    pub fn alight(&self) -> Result<(), DispatchError> {
        return self.send(UnitCommand::Alight);
    }

    pub fn get_info(&self) -> Result<UnitInfo, DispatchError> {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.send(UnitCommand::Info { reply: reply_tx })?;
        return self.wait(reply_rx);
    }

    fn send(&self, command: UnitCommand) -> Result<(), DispatchError> {
        return self
            .command_tx
            .send(command)
            .map_err(|_| DispatchError::UnitDisconnected(self.id));
    }

    // Fails if the unit is dropped with the command still queued, since that drops the reply sender too.
    fn wait<T>(&self, reply_rx: cbc::Receiver<T>) -> Result<T, DispatchError> {
        return reply_rx.recv().map_err(|_| DispatchError::UnitDisconnected(self.id));
    }
}

/// Drives `unit` until `shutdown_rx` receives a message or disconnects.
///
/// Every round answers queued commands, applies at most one inbound floor, ticks and then waits
/// `tick_period`. Returns the final state of the unit, which is dropped.
///
/// The wait is the only place the loop notices a shutdown.
pub fn run(mut unit: ElevatorUnit, shutdown_rx: cbc::Receiver<()>, tick_period: time::Duration) -> UnitInfo {
    info!("Elevator {} started at floor {}", unit.get_id(), unit.get_floor());
    loop {
        unit.process_commands();
        unit.drain_inbound();
        unit.tick();

        cbc::select! {
            recv(shutdown_rx) -> _ => break,
            default(tick_period) => {}
        }
    }
    // Commands sent before the shutdown still get applied.
    unit.process_commands();
    debug!("Elevator {} shutting down", unit.get_id());
    return unit.get_info();
}

/// Starts `unit` on its own thread.
pub fn spawn(
    unit: ElevatorUnit,
    shutdown_rx: cbc::Receiver<()>,
    tick_period: time::Duration,
) -> (UnitHandle, JoinHandle<UnitInfo>) {
    let handle = unit.handle();
    let join = thread::spawn(move || run(unit, shutdown_rx, tick_period));
    return (handle, join);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dispatch::messages::Report;
    use crate::elevator_unit::unit::Status;

    const TICK: time::Duration = time::Duration::from_millis(1);
    const TIMEOUT: time::Duration = time::Duration::from_secs(5);

    #[test]
    fn it_reports_while_running() {
        let (report_tx, report_rx) = cbc::unbounded::<Report>();
        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let (_handle, join) = spawn(ElevatorUnit::new(2, 5, 1, report_tx), shutdown_rx, TICK);

        for _ in 0..3 {
            assert_eq!(report_rx.recv_timeout(TIMEOUT), Ok(Report { unit_id: 2, floor: 0 }));
        }
        drop(shutdown_tx);
        let info = join.join().unwrap();
        assert_eq!(info.status, Status::Idle);
    }

    #[test]
    fn it_travels_to_an_added_floor() {
        let (report_tx, report_rx) = cbc::unbounded::<Report>();
        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let (handle, join) = spawn(ElevatorUnit::new(0, 10, 4, report_tx), shutdown_rx, TICK);

        handle.add_floor(3).unwrap();
        loop {
            let report = report_rx.recv_timeout(TIMEOUT).unwrap();
            if report.floor == 3 {
                break;
            }
        }
        shutdown_tx.send(()).unwrap();
        let info = join.join().unwrap();
        assert_eq!(info.floor, 3);
        assert!(info.pending_stops.is_empty());
    }

    #[test]
    fn it_answers_request_stop_through_the_handle() {
        let (report_tx, _report_rx) = cbc::unbounded::<Report>();
        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let (handle, join) = spawn(ElevatorUnit::new(0, 10, 1, report_tx), shutdown_rx, TICK);

        assert_eq!(handle.request_stop(10), Err(DispatchError::InvalidFloor(10)));
        handle.board().unwrap();
        assert_eq!(handle.board(), Err(DispatchError::AtCapacity));
        assert_eq!(handle.request_stop(4), Err(DispatchError::AtCapacity));
        assert_eq!(handle.get_info().unwrap().occupancy, 1);

        drop(shutdown_tx);
        join.join().unwrap();
    }

    #[test]
    fn it_reports_disconnect_after_shutdown() {
        let (report_tx, _report_rx) = cbc::unbounded::<Report>();
        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let (handle, join) = spawn(ElevatorUnit::new(6, 10, 1, report_tx), shutdown_rx, TICK);

        drop(shutdown_tx);
        join.join().unwrap();
        assert_eq!(handle.request_stop(2), Err(DispatchError::UnitDisconnected(6)));
        assert_eq!(handle.add_floor(2), Err(DispatchError::UnitDisconnected(6)));
    }
}
