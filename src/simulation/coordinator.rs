use crossbeam_channel as cbc;
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::thread::{self, JoinHandle};

use crate::dispatch::controller::DispatchController;
use crate::dispatch::messages::{Report, Request, UnitInfo};
use crate::elevator_unit::runner::{self, UnitHandle};
use crate::elevator_unit::unit::ElevatorUnit;
use crate::simulation::passenger::{Passenger, Progress};
use crate::util::config::Config;
use crate::util::constants::{Floor, GROUND_FLOOR};
use crate::util::error::DispatchError;

#[derive(Clone, Debug)]
pub struct SimulationSummary {
    pub delivered: usize,
    pub reports_seen: usize,
    pub units: Vec<UnitInfo>,
}

/// Runs one scenario: a set of elevators, a controller and the passengers using them.
#[derive(Debug)]
pub struct Simulation {
    config: Config,
}

struct Running {
    handles: HashMap<usize, UnitHandle>,
    request_tx: cbc::Sender<Request>,
    shutdown_tx: cbc::Sender<()>,
    controller: JoinHandle<()>,
    units: Vec<JoinHandle<UnitInfo>>,
}

impl Simulation {
    pub fn new(config: Config) -> anyhow::Result<Simulation> {
        config.validate()?;
        Ok(Simulation { config: config })
    }

    fn check_floor(&self, floor: Floor) -> Result<(), DispatchError> {
        if floor < GROUND_FLOOR || floor >= self.config.num_floors {
            return Err(DispatchError::InvalidFloor(floor));
        }
        Ok(())
    }

    /// Moves every passenger to their destination, then stops all elevators.
    ///
    /// Passengers with `requested_elevator` already set are forced onto that elevator, the rest are
    /// given a random one. The first error aborts the run.
    pub fn run(&self, mut passengers: Vec<Passenger>) -> Result<SimulationSummary, DispatchError> {
        for p in passengers.iter() {
            self.check_floor(p.current_floor)?;
            self.check_floor(p.destination_floor)?;
        }

        let (report_tx, report_rx) = cbc::unbounded::<Report>();
        let mut controller = DispatchController::new();
        let mut units = Vec::new();
        for id in 0..self.config.num_elevators {
            let unit = ElevatorUnit::new(id, self.config.num_floors, self.config.max_passengers, report_tx.clone())
                .with_strict_inbound(self.config.strict_inbound_requests);
            controller.register_unit(unit.handle());
            units.push(unit);
        }
        drop(report_tx);

        self.assign(&mut passengers, &controller)?;

        let running = self.start(controller, units);
        let result = self.serve(&mut passengers, &running, &report_rx);
        let finished = shutdown(running);

        let reports_seen = result?;
        Ok(SimulationSummary {
            delivered: passengers.iter().filter(|p| p.progress == Progress::Delivered).count(),
            reports_seen: reports_seen,
            units: finished,
        })
    }

    fn assign(&self, passengers: &mut [Passenger], controller: &DispatchController) -> Result<(), DispatchError> {
        let mut rng = match self.config.assignment_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        // `new` guarantees at least one elevator.
        let ids = controller.unit_ids();
        for p in passengers.iter_mut() {
            let id = match p.requested_elevator {
                Some(id) => id,
                None => ids[rng.gen_range(0..ids.len())],
            };
            p.call_elevator(controller, id)?;
        }
        Ok(())
    }

    fn start(&self, controller: DispatchController, units: Vec<ElevatorUnit>) -> Running {
        let (shutdown_tx, shutdown_rx) = cbc::unbounded::<()>();
        let request_tx = controller.request_sender();

        let controller_join = {
            let shutdown_rx = shutdown_rx.clone();
            thread::spawn(move || controller.run(shutdown_rx))
        };

        let mut handles = HashMap::new();
        let mut joins = Vec::new();
        for unit in units {
            let (handle, join) = runner::spawn(unit, shutdown_rx.clone(), self.config.tick_period());
            handles.insert(handle.id(), handle);
            joins.push(join);
        }
        info!("Started {} elevators", joins.len());

        return Running {
            handles: handles,
            request_tx: request_tx,
            shutdown_tx: shutdown_tx,
            controller: controller_join,
            units: joins,
        };
    }

    /// Consumes reports until every passenger is delivered. Returns the number of reports read.
    fn serve(
        &self,
        passengers: &mut [Passenger],
        running: &Running,
        report_rx: &cbc::Receiver<Report>,
    ) -> Result<usize, DispatchError> {
        let mut reports_seen = 0;
        let mut last_floor: HashMap<usize, Floor> = HashMap::new();

        while passengers.iter().any(|p| p.progress != Progress::Delivered) {
            let report = match report_rx.recv() {
                Ok(report) => report,
                Err(_) => return Err(DispatchError::ReportsClosed),
            };
            reports_seen += 1;
            let handle = running
                .handles
                .get(&report.unit_id)
                .ok_or(DispatchError::UnknownUnit(report.unit_id))?;
            let standing_still = last_floor.insert(report.unit_id, report.floor) == Some(report.floor);

            for p in passengers.iter_mut() {
                if p.is_arriving(&report) {
                    p.leave_elevator(handle)?;
                } else if p.is_picked_up_by(&report) {
                    p.enter_elevator(handle)?;
                    info!("Passenger entered the elevator to go to floor {}.", p.destination_floor);
                } else if standing_still && p.progress == Progress::Waiting && p.requested_elevator == Some(report.unit_id) {
                    // The pickup is dropped when the elevator stood on that floor as it was drained.
                    debug!("Calling elevator {} to floor {} again", report.unit_id, p.current_floor);
                    let request = Request {
                        unit_id: report.unit_id,
                        floor: p.current_floor,
                    };
                    running
                        .request_tx
                        .send(request)
                        .map_err(|_| DispatchError::UnitDisconnected(report.unit_id))?;
                }
            }
        }
        Ok(reports_seen)
    }
}

/// Signals every loop to stop and collects the final state of the elevators.
fn shutdown(running: Running) -> Vec<UnitInfo> {
    drop(running.shutdown_tx);
    if running.controller.join().is_err() {
        error!("Dispatch controller panicked");
    }
    let mut finished = Vec::new();
    for join in running.units {
        match join.join() {
            Ok(info) => finished.push(info),
            Err(_) => error!("An elevator thread panicked"),
        }
    }
    finished.sort_by_key(|info| info.id);
    return finished;
}
