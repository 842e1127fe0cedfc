pub mod elevator_unit {
    pub mod direction_decider;
    pub mod runner;
    pub mod stop_list;
    pub mod unit;
}

pub mod dispatch {
    pub mod controller;
    pub mod messages;
}

pub mod simulation {
    pub mod coordinator;
    pub mod passenger;
}

pub mod util {
    pub mod config;
    pub mod constants;
    pub mod error;
}
