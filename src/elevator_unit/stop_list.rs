//! Ordered, duplicate free list of the floors an elevator still has to visit.
use serde;
use std::vec::Vec;

use crate::elevator_unit::unit::Status;
use crate::util::constants::Floor;

/// Utility struct for managing the pending stops of one elevator
///
/// # Example
/// ```rust
/// use elevator::elevator_unit::stop_list::StopList;
/// use elevator::elevator_unit::unit::Status;
/// let mut stops = StopList::new();
/// stops.add(6);
/// stops.add(4);
/// stops.add(6);
/// stops.sort_for(Status::MovingDown, 0);
/// assert_eq!(stops.as_slice(), &[6, 4]);
/// ```
///
#[derive(PartialEq, Eq, Clone, Debug, Default, serde::Serialize, serde::Deserialize, Hash)]
pub struct StopList {
    stops: Vec<Floor>,
}

impl StopList {
    pub fn new() -> StopList {
        StopList { stops: Vec::new() }
    }

    /// Appends `floor` unless it is already pending.
    ///
    /// Returns `true` if the floor was added.
    pub fn add(&mut self, floor: Floor) -> bool {
        if self.contains(floor) {
            return false;
        }
        self.stops.push(floor);
        return true;
    }

    /// Removes `floor` if it is pending.
    ///
    /// Returns `true` if the floor was removed.
    pub fn remove(&mut self, floor: Floor) -> bool {
        match self.stops.iter().position(|&f| f == floor) {
            Some(i) => {
                self.stops.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, floor: Floor) -> bool {
        return self.stops.contains(&floor);
    }

    pub fn is_empty(&self) -> bool {
        return self.stops.is_empty();
    }

    pub fn len(&self) -> usize {
        return self.stops.len();
    }

    pub fn as_slice(&self) -> &[Floor] {
        return &self.stops;
    }

    /// Closest pending floor strictly above `floor`
    pub fn nearest_above(&self, floor: Floor) -> Option<Floor> {
        return self.stops.iter().copied().filter(|&f| f > floor).min();
    }

    /// Closest pending floor strictly below `floor`
    pub fn nearest_below(&self, floor: Floor) -> Option<Floor> {
        return self.stops.iter().copied().filter(|&f| f < floor).max();
    }

    /// Orders the stops the way an elevator with `status` standing at `current_floor` would visit them.
    ///
    /// * `Idle` - nearest first, ties go to the lower floor
    /// * `MovingUp` - ascending
    /// * `MovingDown` - descending
    pub fn sort_for(&mut self, status: Status, current_floor: Floor) {
        match status {
            Status::Idle => self
                .stops
                .sort_by_key(|&f| ((f - current_floor).abs(), f)),
            Status::MovingUp => self.stops.sort_unstable(),
            Status::MovingDown => self.stops.sort_unstable_by(|a, b| b.cmp(a)),
        }
    }
}

impl From<Vec<Floor>> for StopList {
    /// Builds a list from `floors`, keeping the first occurrence of duplicates.
    fn from(floors: Vec<Floor>) -> StopList {
        let mut list = StopList::new();
        for f in floors {
            list.add(f);
        }
        return list;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_ignores_duplicates() {
        let mut stops = StopList::new();
        assert!(stops.add(3));
        assert!(!stops.add(3));
        assert_eq!(stops.as_slice(), &[3]);
    }

    #[test]
    fn it_removes_only_pending_floors() {
        let mut stops = StopList::from(vec![1, 5]);
        assert!(!stops.remove(2));
        assert!(stops.remove(5));
        assert_eq!(stops.as_slice(), &[1]);
    }

    #[test]
    fn it_sorts_idle_stops_by_distance() {
        let mut stops = StopList::from(vec![6, 4, 1, 9]);
        stops.sort_for(Status::Idle, 2);
        assert_eq!(stops.as_slice(), &[1, 4, 6, 9]);
    }

    #[test]
    fn it_breaks_idle_ties_towards_the_lower_floor() {
        let mut stops = StopList::from(vec![7, 3, 5]);
        stops.sort_for(Status::Idle, 5);
        assert_eq!(stops.as_slice(), &[5, 3, 7]);
    }

    #[test]
    fn it_finds_nearest_floors_on_each_side() {
        let stops = StopList::from(vec![0, 8, 3, 6]);
        assert_eq!(stops.nearest_above(4), Some(6));
        assert_eq!(stops.nearest_below(4), Some(3));
        assert_eq!(stops.nearest_above(8), None);
    }
}
