use crossbeam_channel as cbc;
use log::{debug, error, info, warn};
use std::collections::HashMap;

use crate::dispatch::messages::Request;
use crate::elevator_unit::runner::UnitHandle;
use crate::util::constants::Floor;
use crate::util::error::DispatchError;

/// Routes pickup calls to the unit they are meant for. Does no scheduling of its own.
#[derive(Debug)]
pub struct DispatchController {
    units: HashMap<usize, UnitHandle>,
    request_tx: cbc::Sender<Request>,
    request_rx: cbc::Receiver<Request>,
}

impl DispatchController {
    pub fn new() -> DispatchController {
        let (request_tx, request_rx) = cbc::unbounded::<Request>();
        DispatchController {
            units: HashMap::new(),
            request_tx: request_tx,
            request_rx: request_rx,
        }
    }

    /// Registering a second unit under an id already in use replaces the first one.
    pub fn register_unit(&mut self, handle: UnitHandle) {
        let id = handle.id();
        if self.units.insert(id, handle).is_some() {
            warn!("Elevator {} registered twice, keeping the latest", id);
        }
    }

    pub fn unit(&self, unit_id: usize) -> Option<&UnitHandle> {
        return self.units.get(&unit_id);
    }

    /// Registered ids in ascending order
    pub fn unit_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.units.keys().copied().collect();
        ids.sort_unstable();
        return ids;
    }

    /// Puts `floor` on the inbound channel of `unit_id`.
    pub fn route(&self, unit_id: usize, floor: Floor) -> Result<(), DispatchError> {
        let unit = self.unit(unit_id).ok_or(DispatchError::UnknownUnit(unit_id))?;
        debug!("Routing floor {} to elevator {}", floor, unit_id);
        return unit.add_floor(floor);
    }

    /// Queues a pickup call. It is routed once [`DispatchController::run`] is going.
    pub fn handle_request(&self, unit_id: usize, floor: Floor) -> Result<(), DispatchError> {
        if !self.units.contains_key(&unit_id) {
            return Err(DispatchError::UnknownUnit(unit_id));
        }
        self.request_tx
            .send(Request {
                unit_id: unit_id,
                floor: floor,
            })
            .map_err(|_| DispatchError::UnitDisconnected(unit_id))
    }

    /// Sender for the controller's request channel, for producers on other threads
    pub fn request_sender(&self) -> cbc::Sender<Request> {
        return self.request_tx.clone();
    }

    /// Routes requests until `shutdown_rx` receives a message or disconnects.
    pub fn run(self, shutdown_rx: cbc::Receiver<()>) {
        info!("Dispatch controller managing elevators {:?}", self.unit_ids());
        loop {
            cbc::select! {
                recv(self.request_rx) -> request => {
                    // The controller holds a sender itself, so the channel never disconnects.
                    if let Ok(request) = request {
                        if let Err(e) = self.route(request.unit_id, request.floor) {
                            error!("Could not route floor {} to elevator {}: {}", request.floor, request.unit_id, e);
                        }
                    }
                },
                recv(shutdown_rx) -> _ => break,
            }
        }
        debug!("Dispatch controller shutting down");
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dispatch::messages::Report;
    use crate::elevator_unit::unit::ElevatorUnit;
    use std::thread;
    use std::time::Duration;

    fn controller_with_units(n: usize) -> (DispatchController, Vec<ElevatorUnit>) {
        let (report_tx, _report_rx) = cbc::unbounded::<Report>();
        let mut controller = DispatchController::new();
        let mut units = Vec::new();
        for id in 0..n {
            let unit = ElevatorUnit::new(id, 10, 5, report_tx.clone());
            controller.register_unit(unit.handle());
            units.push(unit);
        }
        return (controller, units);
    }

    #[test]
    fn it_routes_to_the_right_unit() {
        let (controller, mut units) = controller_with_units(3);
        controller.route(1, 7).unwrap();
        for unit in units.iter_mut() {
            unit.drain_inbound();
        }
        assert!(units[0].get_stops().is_empty());
        assert_eq!(units[1].get_stops(), &[7]);
        assert!(units[2].get_stops().is_empty());
    }

    #[test]
    fn it_rejects_unknown_units() {
        let (controller, _units) = controller_with_units(2);
        assert_eq!(controller.route(5, 1), Err(DispatchError::UnknownUnit(5)));
        assert_eq!(controller.handle_request(5, 1), Err(DispatchError::UnknownUnit(5)));
    }

    #[test]
    fn it_lists_registered_ids() {
        let (controller, _units) = controller_with_units(3);
        assert_eq!(controller.unit_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn it_keeps_the_latest_registration() {
        let (report_tx, _report_rx) = cbc::unbounded::<Report>();
        let mut controller = DispatchController::new();
        let first = ElevatorUnit::new(4, 10, 5, report_tx.clone());
        let mut second = ElevatorUnit::new(4, 10, 5, report_tx);
        controller.register_unit(first.handle());
        controller.register_unit(second.handle());
        controller.route(4, 2).unwrap();
        second.drain_inbound();
        assert_eq!(second.get_stops(), &[2]);
        assert_eq!(controller.unit_ids(), vec![4]);
    }

    #[test]
    fn it_routes_queued_requests_when_running() {
        let (controller, mut units) = controller_with_units(2);
        controller.handle_request(0, 3).unwrap();
        controller.handle_request(1, 6).unwrap();

        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let join = thread::spawn(move || controller.run(shutdown_rx));

        let mut waited = Duration::from_millis(0);
        while (units[0].get_stops().is_empty() || units[1].get_stops().is_empty())
            && waited < Duration::from_secs(5)
        {
            for unit in units.iter_mut() {
                unit.drain_inbound();
            }
            thread::sleep(Duration::from_millis(1));
            waited += Duration::from_millis(1);
        }
        assert_eq!(units[0].get_stops(), &[3]);
        assert_eq!(units[1].get_stops(), &[6]);

        drop(shutdown_tx);
        join.join().unwrap();
    }
}
