//! The time-optimal search core shared by both routers.

use crate::error::RoutingError;
use crate::math::distance;
use crate::reservation::ReservationTable;
use crate::{Agent, Network, RoadId};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Discrete identity of a search state.
///
/// Road ends are their own state rather than a float position of 1.0, so
/// that backpointer lookups never compare floating-point keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) enum SearchKey {
    /// The agent's starting location.
    Origin,
    /// The start of a road, position 0.
    RoadStart(RoadId),
    /// The end of a road, position 1.
    RoadEnd(RoadId),
    /// The agent's destination location.
    Destination,
}

/// Resolves a search state to its (road, normalised position) location.
pub(crate) fn key_location(key: SearchKey, agent: &Agent) -> (RoadId, f64) {
    match key {
        SearchKey::Origin => (agent.road, agent.position),
        SearchKey::RoadStart(road) => (road, 0.0),
        SearchKey::RoadEnd(road) => (road, 1.0),
        SearchKey::Destination => (agent.destination_road, agent.destination_position),
    }
}

/// A link in the backpointer chain out of a finished search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Backpointer {
    /// The state this one was reached from.
    pub(crate) prev: SearchKey,
    /// Absolute arrival time at this state; `None` for virtual pathway
    /// hops, which carry no timestamp of their own.
    pub(crate) arrival: Option<f64>,
}

/// The result of a successful search.
pub(crate) struct SearchOutcome {
    /// Backpointers from the destination back to the origin.
    pub(crate) backpointers: HashMap<SearchKey, Backpointer>,
    /// Absolute arrival time at the destination.
    pub(crate) arrival: f64,
}

/// A node in the open queue.
struct SearchNode {
    key: SearchKey,
    road: RoadId,
    position: f64,
    /// Absolute elapsed time from the agent's start.
    g: f64,
    /// Optimistic remaining time to the destination.
    h: f64,
    /// `g + h`.
    f: f64,
    /// Insertion counter, the final tiebreak.
    seq: u64,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.h.total_cmp(&other.h))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

/// Runs a single agent's time-optimal search over the road network.
///
/// When `reservations` is given, crossing a signalised intersection
/// additionally costs the full light cycles implied by the occupancy the
/// table records for the current road at the arrival second.
pub(crate) fn shortest_time_search(
    network: &Network,
    agent: &Agent,
    average_speed: f64,
    reservations: Option<&ReservationTable>,
) -> Result<SearchOutcome, RoutingError> {
    let start_road = network
        .road(agent.road)
        .ok_or(RoutingError::InvalidRoad(agent.road))?;
    let destination_road = network
        .road(agent.destination_road)
        .ok_or(RoutingError::InvalidRoad(agent.destination_road))?;
    let destination = destination_road.coordinate_at(agent.destination_position);

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<SearchKey> = HashSet::new();
    let mut best_f: HashMap<SearchKey, f64> = HashMap::new();
    let mut backpointers: HashMap<SearchKey, Backpointer> = HashMap::new();
    let mut seq = 0u64;

    let h = distance(start_road.coordinate_at(agent.position), destination) / average_speed;
    open.push(Reverse(SearchNode {
        key: SearchKey::Origin,
        road: agent.road,
        position: agent.position,
        g: 0.0,
        h,
        f: h,
        seq,
    }));
    seq += 1;

    loop {
        let Some(Reverse(node)) = open.pop() else {
            return Err(RoutingError::NoPathFound);
        };
        closed.insert(node.key);

        // Destination reached exactly. When it coincides with a road start,
        // alias its backpointer so the traceback still finds the chain.
        if node.road == agent.destination_road && node.position == agent.destination_position {
            if let Some(link) = backpointers.get(&node.key).copied() {
                backpointers.insert(SearchKey::Destination, link);
            }
            return Ok(SearchOutcome {
                backpointers,
                arrival: node.g,
            });
        }

        // Destination lies further along the current road; it can be reached
        // without crossing another intersection.
        if node.road == agent.destination_road && node.position < agent.destination_position {
            let road = &network[node.road];
            let time = distance(road.coordinate_at(node.position), destination) / road.speed_limit();
            backpointers.insert(
                SearchKey::Destination,
                Backpointer {
                    prev: node.key,
                    arrival: Some(node.g + time),
                },
            );
            return Ok(SearchOutcome {
                backpointers,
                arrival: node.g + time,
            });
        }

        // A cheaper path already reached the end of this road.
        if closed.contains(&SearchKey::RoadEnd(node.road)) {
            continue;
        }

        let road = &network[node.road];
        let end = &network[road.end()];
        let entry = road.start();

        // Travel to the end of the road, then wait out the light.
        let mut time =
            distance(road.coordinate_at(node.position), road.coordinate_at(1.0)) / road.speed_limit();
        if end.neighbours().len() >= 3 {
            let wait = end
                .green_wait(entry, node.g + time)
                .ok_or(RoutingError::MissingPhase {
                    at: road.end(),
                    from: entry,
                })?;
            time += wait;
            if let Some(table) = reservations {
                // Each pass-through batch of queued occupants costs one more
                // full light cycle.
                let rate =
                    end.pass_through_rate(entry)
                        .ok_or(RoutingError::MissingPassThroughRate {
                            at: road.end(),
                            from: entry,
                        })?;
                let queued = table.occupancy(node.road, node.g as u64);
                let cycles = (queued / rate.get()) as f64;
                time += cycles * end.phase_duration() * end.neighbours().len() as f64;
            }
        }

        let g = node.g + time;
        backpointers.insert(
            SearchKey::RoadEnd(node.road),
            Backpointer {
                prev: node.key,
                arrival: Some(g),
            },
        );
        closed.insert(SearchKey::RoadEnd(node.road));

        // Fan out onto every road leaving the end intersection, except back
        // the way we came.
        for &neighbour in end.neighbours() {
            if neighbour == entry {
                continue; // no U-turns
            }
            let Some(next_road) = network.road_between(road.end(), neighbour) else {
                continue;
            };
            let key = SearchKey::RoadStart(next_road);
            if closed.contains(&key) {
                continue;
            }
            // The light wait is already paid for in `g`; a virtual pathway
            // only costs its fixed traversal time.
            let pathway = end
                .pathway(entry, neighbour)
                .ok_or(RoutingError::MissingPathway {
                    at: road.end(),
                    from: entry,
                    to: neighbour,
                })?;
            let next_g = g + pathway;
            let next_h = distance(network[next_road].coordinate_at(0.0), destination) / average_speed;
            let next_f = next_g + next_h;
            if next_f < best_f.get(&key).copied().unwrap_or(f64::INFINITY) {
                best_f.insert(key, next_f);
                backpointers.insert(
                    key,
                    Backpointer {
                        prev: SearchKey::RoadEnd(node.road),
                        arrival: None,
                    },
                );
                open.push(Reverse(SearchNode {
                    key,
                    road: next_road,
                    position: 0.0,
                    g: next_g,
                    h: next_h,
                    f: next_f,
                    seq,
                }));
                seq += 1;
            }
        }
    }
}
