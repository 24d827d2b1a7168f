use crate::RoadId;
use slotmap::SparseSecondaryMap;
use std::collections::HashMap;
use std::ops::Range;

/// A space-time occupancy table mapping (road, integer second) to the number
/// of cooperative agents expected on that road during that second.
///
/// The table is owned by one cooperative routing batch. It is read by the
/// congestion cost function and written during path reconstruction, never
/// for virtual intersection pathways. A re-routing pass must start from a
/// fresh table rather than reuse prior occupancy.
#[derive(Clone, Default)]
pub struct ReservationTable {
    /// Occupancy counts per road, keyed by absolute second.
    occupancy: SparseSecondaryMap<RoadId, HashMap<u64, u32>>,
}

impl ReservationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the occupancy count of a road during the given second.
    pub fn occupancy(&self, road: RoadId, second: u64) -> u32 {
        self.occupancy
            .get(road)
            .and_then(|seconds| seconds.get(&second))
            .copied()
            .unwrap_or(0)
    }

    /// Adds `cost` occupancy to a road for every second in the interval.
    pub fn reserve(&mut self, road: RoadId, seconds: Range<u64>, cost: u32) {
        if seconds.is_empty() {
            return;
        }
        let entries = self
            .occupancy
            .entry(road)
            .expect("road key was removed from the network")
            .or_insert_with(HashMap::new);
        for second in seconds {
            *entries.entry(second).or_insert(0) += cost;
        }
    }

    /// Removes all recorded occupancy.
    pub fn clear(&mut self) {
        self.occupancy.clear();
    }

    /// Returns an iterator over every (road, second, occupancy) entry.
    pub fn iter(&self) -> impl Iterator<Item = (RoadId, u64, u32)> + '_ {
        self.occupancy.iter().flat_map(|(road, seconds)| {
            seconds
                .iter()
                .map(move |(second, count)| (road, *second, *count))
        })
    }
}
