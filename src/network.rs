use crate::error::GraphError;
use crate::math::{Point2d, Vector2d};
use crate::{IntersectionId, IntersectionSet, RoadId, RoadSet};
use rand::seq::IteratorRandom;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::ops::Index;

/// The cardinal axis a road runs along.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// The unit vector pointing along the axis.
    pub fn unit(self) -> Vector2d {
        match self {
            Direction::North => Vector2d::new(0.0, 1.0),
            Direction::South => Vector2d::new(0.0, -1.0),
            Direction::East => Vector2d::new(1.0, 0.0),
            Direction::West => Vector2d::new(-1.0, 0.0),
        }
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

/// A point where two or more roads meet, gated by a cyclic traffic light
/// when three or more neighbours are present.
pub struct Intersection {
    /// The intersection ID.
    id: IntersectionId,
    /// Grid coordinates of the intersection.
    coords: (i32, i32),
    /// The adjacent intersections, at most four on a grid lattice.
    neighbours: SmallVec<[IntersectionId; 4]>,
    /// The duration of each green phase in seconds.
    phase_duration: f64,
    /// The slot each incoming neighbour holds in the light cycle.
    phase_index: HashMap<IntersectionId, usize>,
    /// Vehicles served per green phase, per incoming neighbour.
    pass_through: HashMap<IntersectionId, NonZeroU32>,
    /// Traversal time of the virtual pathway between an incoming and an
    /// outgoing neighbour, in seconds.
    pathways: HashMap<(IntersectionId, IntersectionId), f64>,
}

/// The attributes of an intersection.
pub struct IntersectionAttributes {
    /// Grid coordinates; must be unique within the network.
    pub coords: (i32, i32),
    /// The green phase duration in seconds.
    pub phase_duration: f64,
}

impl Intersection {
    fn new(id: IntersectionId, attribs: &IntersectionAttributes) -> Self {
        Self {
            id,
            coords: attribs.coords,
            neighbours: SmallVec::new(),
            phase_duration: attribs.phase_duration,
            phase_index: HashMap::new(),
            pass_through: HashMap::new(),
            pathways: HashMap::new(),
        }
    }

    /// Gets the intersection ID.
    pub fn id(&self) -> IntersectionId {
        self.id
    }

    /// Gets the grid coordinates of the intersection.
    pub fn coords(&self) -> (i32, i32) {
        self.coords
    }

    /// Gets the adjacent intersections.
    pub fn neighbours(&self) -> &[IntersectionId] {
        &self.neighbours
    }

    /// Gets the green phase duration in seconds.
    pub fn phase_duration(&self) -> f64 {
        self.phase_duration
    }

    /// Gets the light cycle slot assigned to the given incoming neighbour.
    pub fn phase_index(&self, from: IntersectionId) -> Option<usize> {
        self.phase_index.get(&from).copied()
    }

    /// Gets the pass-through rate for the given incoming neighbour.
    pub fn pass_through_rate(&self, from: IntersectionId) -> Option<NonZeroU32> {
        self.pass_through.get(&from).copied()
    }

    /// Gets the traversal time of the virtual pathway between two neighbours.
    pub fn pathway(&self, from: IntersectionId, to: IntersectionId) -> Option<f64> {
        self.pathways.get(&(from, to)).copied()
    }

    /// Computes the time an arrival from `from` at absolute time `at` must
    /// wait for its next green phase.
    ///
    /// An intersection with fewer than three neighbours is a through-road
    /// join and imposes no wait. Returns `None` when no phase slot has been
    /// assigned to the incoming neighbour.
    pub fn green_wait(&self, from: IntersectionId, at: f64) -> Option<f64> {
        let phases = self.neighbours.len();
        if phases < 3 {
            return Some(0.0);
        }
        let idx = self.phase_index(from)?;
        let cycle = phases as f64 * self.phase_duration;
        let t = at % cycle;
        let wait = if (idx + 1) as f64 * self.phase_duration > t {
            // Green phase is later in this cycle, or happening right now.
            (idx as f64 * self.phase_duration - t).max(0.0)
        } else {
            // Green phase has already passed; wait for the next cycle.
            cycle - t + idx as f64 * self.phase_duration
        };
        Some(wait)
    }
}

/// A one-way stretch of road between two intersections.
///
/// Roads are never bidirectional; each direction of travel between two
/// intersections is a distinct road with its own ID.
pub struct Road {
    /// The road ID.
    id: RoadId,
    /// The intersection the road starts from.
    start: IntersectionId,
    /// The intersection the road leads to.
    end: IntersectionId,
    /// The cardinal axis the road runs along.
    direction: Direction,
    /// Length in metres.
    length: f64,
    /// Speed limit in m/s.
    speed_limit: f64,
    /// World coordinate of the road's start.
    origin: Point2d,
}

/// The attributes of a road.
pub struct RoadAttributes {
    /// The intersection the road starts from.
    pub from: IntersectionId,
    /// The intersection the road leads to.
    pub to: IntersectionId,
    /// The cardinal axis the road runs along.
    pub direction: Direction,
    /// Length in metres.
    pub length: f64,
    /// Speed limit in m/s.
    pub speed_limit: f64,
    /// World coordinate of the road's start.
    pub origin: Point2d,
}

impl Road {
    fn new(id: RoadId, attribs: &RoadAttributes) -> Self {
        Self {
            id,
            start: attribs.from,
            end: attribs.to,
            direction: attribs.direction,
            length: attribs.length,
            speed_limit: attribs.speed_limit,
            origin: attribs.origin,
        }
    }

    /// Gets the road ID.
    pub fn id(&self) -> RoadId {
        self.id
    }

    /// Gets the intersection the road starts from.
    pub fn start(&self) -> IntersectionId {
        self.start
    }

    /// Gets the intersection the road leads to.
    pub fn end(&self) -> IntersectionId {
        self.end
    }

    /// Gets the cardinal axis the road runs along.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Gets the length of the road in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Gets the speed limit in m/s.
    pub fn speed_limit(&self) -> f64 {
        self.speed_limit
    }

    /// Maps a normalised position along the road to a world coordinate.
    ///
    /// Position 0 is the start intersection and position 1 the end.
    pub fn coordinate_at(&self, position: f64) -> Point2d {
        self.origin + self.direction.unit() * (self.length * position)
    }
}

/// A read-only view of intersections, the directed roads between them, and
/// the virtual turning pathways at each intersection.
///
/// The network must be fully supplied by the graph provider before any
/// routing call and is immutable for the duration of a routing batch.
#[derive(Default)]
pub struct Network {
    /// The intersections in the network.
    intersections: IntersectionSet,
    /// The roads in the network.
    roads: RoadSet,
    /// Road lookup by (start, end) intersection pair.
    roadmap: HashMap<(IntersectionId, IntersectionId), RoadId>,
}

impl Network {
    /// Creates an empty network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an intersection to the network.
    pub fn add_intersection(&mut self, attribs: &IntersectionAttributes) -> IntersectionId {
        self.intersections
            .insert_with_key(|id| Intersection::new(id, attribs))
    }

    /// Adds a one-way road between two intersections and records the
    /// adjacency between them.
    pub fn add_road(&mut self, attribs: &RoadAttributes) -> Result<RoadId, GraphError> {
        if !self.intersections.contains_key(attribs.from) {
            return Err(GraphError::UnknownIntersection(attribs.from));
        }
        if !self.intersections.contains_key(attribs.to) {
            return Err(GraphError::UnknownIntersection(attribs.to));
        }
        if self.roadmap.contains_key(&(attribs.from, attribs.to)) {
            return Err(GraphError::DuplicateRoad(attribs.from, attribs.to));
        }
        let id = self.roads.insert_with_key(|id| Road::new(id, attribs));
        self.roadmap.insert((attribs.from, attribs.to), id);
        if !self.intersections[attribs.from].neighbours.contains(&attribs.to) {
            self.intersections[attribs.from].neighbours.push(attribs.to);
        }
        if !self.intersections[attribs.to].neighbours.contains(&attribs.from) {
            self.intersections[attribs.to].neighbours.push(attribs.from);
        }
        Ok(id)
    }

    /// Connects two intersections with a pair of roads going in opposite
    /// directions. `origin` is the world coordinate of the `from` end.
    pub fn connect(
        &mut self,
        from: IntersectionId,
        to: IntersectionId,
        direction: Direction,
        length: f64,
        speed_limit: f64,
        origin: Point2d,
    ) -> Result<(RoadId, RoadId), GraphError> {
        let out = self.add_road(&RoadAttributes {
            from,
            to,
            direction,
            length,
            speed_limit,
            origin,
        })?;
        let back = self.add_road(&RoadAttributes {
            from: to,
            to: from,
            direction: direction.reversed(),
            length,
            speed_limit,
            origin: origin + direction.unit() * length,
        })?;
        Ok((out, back))
    }

    /// Assigns the light cycle slot of an incoming neighbour at an
    /// intersection.
    pub fn set_phase(
        &mut self,
        at: IntersectionId,
        from: IntersectionId,
        index: usize,
    ) -> Result<(), GraphError> {
        let intersection = self
            .intersections
            .get_mut(at)
            .ok_or(GraphError::UnknownIntersection(at))?;
        intersection.phase_index.insert(from, index);
        Ok(())
    }

    /// Sets the number of vehicles served per green phase for an incoming
    /// neighbour at an intersection. A rate of zero is rejected, as it would
    /// make the intersection impassable.
    pub fn set_pass_through_rate(
        &mut self,
        at: IntersectionId,
        from: IntersectionId,
        rate: u32,
    ) -> Result<(), GraphError> {
        let rate = NonZeroU32::new(rate).ok_or(GraphError::ZeroPassThroughRate(at))?;
        let intersection = self
            .intersections
            .get_mut(at)
            .ok_or(GraphError::UnknownIntersection(at))?;
        intersection.pass_through.insert(from, rate);
        Ok(())
    }

    /// Sets the traversal time of the virtual pathway between an incoming
    /// and an outgoing neighbour at an intersection.
    pub fn add_pathway(
        &mut self,
        at: IntersectionId,
        from: IntersectionId,
        to: IntersectionId,
        traversal_time: f64,
    ) -> Result<(), GraphError> {
        let intersection = self
            .intersections
            .get_mut(at)
            .ok_or(GraphError::UnknownIntersection(at))?;
        intersection.pathways.insert((from, to), traversal_time);
        Ok(())
    }

    /// Gets a reference to the road with the given ID.
    pub fn road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id)
    }

    /// Gets a reference to the intersection with the given ID.
    pub fn intersection(&self, id: IntersectionId) -> Option<&Intersection> {
        self.intersections.get(id)
    }

    /// Gets the road going from one intersection to another, if one exists.
    pub fn road_between(&self, from: IntersectionId, to: IntersectionId) -> Option<RoadId> {
        self.roadmap.get(&(from, to)).copied()
    }

    /// Returns an iterator over all the roads in the network.
    pub fn iter_roads(&self) -> impl Iterator<Item = &Road> {
        self.roads.values()
    }

    /// Returns an iterator over all the intersections in the network.
    pub fn iter_intersections(&self) -> impl Iterator<Item = &Intersection> {
        self.intersections.values()
    }

    /// The mean speed limit over all roads in m/s, used as the optimistic
    /// average network speed of the search heuristic.
    pub fn average_speed(&self) -> f64 {
        let count = self.roads.len();
        if count == 0 {
            return 0.0;
        }
        self.roads.values().map(|road| road.speed_limit).sum::<f64>() / count as f64
    }

    /// Picks a uniformly random (road, position) location, or `None` for an
    /// empty network.
    pub fn random_location(&self, rng: &mut impl Rng) -> Option<(RoadId, f64)> {
        let road = self.roads.keys().choose(rng)?;
        Some((road, rng.gen_range(0.0..1.0)))
    }
}

impl Index<RoadId> for Network {
    type Output = Road;

    fn index(&self, id: RoadId) -> &Road {
        &self.roads[id]
    }
}

impl Index<IntersectionId> for Network {
    type Output = Intersection;

    fn index(&self, id: IntersectionId) -> &Intersection {
        &self.intersections[id]
    }
}
