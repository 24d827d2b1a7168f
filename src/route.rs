use crate::math::Point2d;
use crate::reservation::ReservationTable;
use crate::search::{key_location, SearchKey, SearchOutcome};
use crate::{Agent, Network, RoadId};
use itertools::Itertools;

/// A single step of a route: a world coordinate and the road it lies on.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// World coordinate of the waypoint.
    pub coord: Point2d,
    /// The road the waypoint lies on.
    pub road: RoadId,
}

/// A chronological sequence of waypoints leading an agent from its start to
/// its destination. The starting location itself is not included; an agent
/// already at its destination receives an empty route.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    waypoints: Vec<Waypoint>,
    duration: f64,
}

impl Route {
    /// The waypoints of the route, in travel order.
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Absolute arrival time at the destination, in seconds from the
    /// agent's start.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// The number of waypoints.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns true if the route has no waypoints.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The roads the route passes over, deduplicated in travel order.
    pub fn roads(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.waypoints.iter().map(|w| w.road).dedup()
    }
}

/// Walks the backpointer chain from the destination back to the origin and
/// reverses it into a chronological route.
///
/// When a reservation table is given, every backpointer-recorded road
/// segment also writes `cost` occupancy per whole second of the interval
/// between its arrival timestamp and the next later one. Virtual pathway
/// hops carry no timestamp and are skipped for bookkeeping, not for
/// traceback.
pub(crate) fn trace_route(
    outcome: &SearchOutcome,
    agent: &Agent,
    network: &Network,
    mut reservations: Option<(&mut ReservationTable, u32)>,
) -> Route {
    let mut waypoints = Vec::new();
    let mut later: Option<f64> = None;
    let mut key = SearchKey::Destination;

    while let Some(link) = outcome.backpointers.get(&key) {
        let (road, position) = key_location(key, agent);
        waypoints.push(Waypoint {
            coord: network[road].coordinate_at(position),
            road,
        });
        if let Some((table, cost)) = reservations.as_mut() {
            match (link.arrival, later) {
                (Some(arrival), Some(later_time)) => {
                    let (used_road, _) = key_location(link.prev, agent);
                    table.reserve(used_road, arrival as u64..later_time as u64, *cost);
                    later = Some(arrival);
                }
                (Some(arrival), None) => later = Some(arrival),
                (None, _) => {}
            }
        }
        key = link.prev;
    }

    waypoints.reverse();
    Route {
        waypoints,
        duration: outcome.arrival,
    }
}
