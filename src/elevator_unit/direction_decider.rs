use crate::elevator_unit::stop_list::StopList;
use crate::elevator_unit::unit::{Direction, Status};
use crate::util::constants::{Floor, GROUND_FLOOR};

/// Picks the floor the elevator should head for next.
///
/// An idle elevator serves its own floor first, then the nearest stop above, then the nearest below.
/// A moving elevator keeps its direction as long as there is a stop ahead of it and turns around
/// otherwise, in which case `status` is reversed.
///
/// Falls back to `floor` when nothing can be found.
pub fn next_floor(status: &mut Status, floor: Floor, num_floors: Floor, stops: &StopList) -> Floor {
    let dirn = match status.direction() {
        None => {
            if stops.contains(floor) {
                return floor;
            }
            return stops
                .nearest_above(floor)
                .or_else(|| stops.nearest_below(floor))
                .unwrap_or(floor);
        }
        Some(dirn) => dirn,
    };

    if let Some(f) = first_stop_towards(dirn, floor, num_floors, stops) {
        return f;
    }

    *status = status.reversed();
    match first_stop_towards(dirn.opposite(), floor, num_floors, stops) {
        Some(f) => f,
        None => floor,
    }
}

/// First pending floor met when travelling from `floor` (exclusive) to the end of the shaft in `dirn`.
fn first_stop_towards(dirn: Direction, floor: Floor, num_floors: Floor, stops: &StopList) -> Option<Floor> {
    match dirn {
        Direction::Up => (floor + 1..num_floors).find(|&f| stops.contains(f)),
        Direction::Down => (GROUND_FLOOR..floor).rev().find(|&f| stops.contains(f)),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FLOORS: Floor = 20;

    #[test]
    fn it_serves_current_floor_first_when_idle() {
        let mut status = Status::Idle;
        let stops = StopList::from(vec![9, 4, 1]);
        assert_eq!(next_floor(&mut status, 4, FLOORS, &stops), 4);
        assert_eq!(status, Status::Idle);
    }

    #[test]
    fn it_prefers_going_up_when_idle() {
        let mut status = Status::Idle;
        let stops = StopList::from(vec![3, 9, 6]);
        assert_eq!(next_floor(&mut status, 5, FLOORS, &stops), 6);
    }

    #[test]
    fn it_goes_down_when_idle_and_nothing_above() {
        let mut status = Status::Idle;
        let stops = StopList::from(vec![1, 3]);
        assert_eq!(next_floor(&mut status, 5, FLOORS, &stops), 3);
    }

    #[test]
    fn it_keeps_direction_while_stops_are_ahead() {
        let mut status = Status::MovingDown;
        let stops = StopList::from(vec![8, 2, 4]);
        assert_eq!(next_floor(&mut status, 6, FLOORS, &stops), 4);
        assert_eq!(status, Status::MovingDown);
    }

    #[test]
    fn it_skips_stops_behind_a_moving_elevator() {
        let mut status = Status::MovingUp;
        let stops = StopList::from(vec![2, 12]);
        assert_eq!(next_floor(&mut status, 5, FLOORS, &stops), 12);
        assert_eq!(status, Status::MovingUp);
    }

    #[test]
    fn it_reverses_when_nothing_is_ahead() {
        let mut status = Status::MovingUp;
        let stops = StopList::from(vec![1]);
        assert_eq!(next_floor(&mut status, 3, FLOORS, &stops), 1);
        assert_eq!(status, Status::MovingDown);
    }

    #[test]
    fn it_falls_back_to_current_floor() {
        let mut status = Status::MovingDown;
        let stops = StopList::from(vec![7]);
        assert_eq!(next_floor(&mut status, 7, FLOORS, &stops), 7);
        assert_eq!(status, Status::MovingUp);
    }
}
