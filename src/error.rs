use crate::{IntersectionId, RoadId};

/// An error raised while constructing a [Network](crate::Network).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    #[error("intersection {0:?} is not in the network")]
    UnknownIntersection(IntersectionId),
    #[error("a road between {0:?} and {1:?} already exists")]
    DuplicateRoad(IntersectionId, IntersectionId),
    #[error("intersection {0:?} was given a pass-through rate of zero")]
    ZeroPassThroughRate(IntersectionId),
}

/// An error raised while routing a single agent.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingError {
    /// The open set was exhausted before the destination was reached.
    #[error("no path exists between the agent's start and destination")]
    NoPathFound,
    /// The agent's start or destination road is not in the network.
    #[error("road {0:?} is not in the network")]
    InvalidRoad(RoadId),
    /// The graph provider did not supply a pathway between two neighbours.
    #[error("intersection {at:?} has no pathway from {from:?} to {to:?}")]
    MissingPathway {
        at: IntersectionId,
        from: IntersectionId,
        to: IntersectionId,
    },
    /// The graph provider did not supply a phase slot for an incoming
    /// neighbour at a signalised intersection.
    #[error("intersection {at:?} has no phase slot for arrivals from {from:?}")]
    MissingPhase {
        at: IntersectionId,
        from: IntersectionId,
    },
    /// The graph provider did not supply a pass-through rate for an incoming
    /// neighbour at a signalised intersection.
    #[error("intersection {at:?} has no pass-through rate for arrivals from {from:?}")]
    MissingPassThroughRate {
        at: IntersectionId,
        from: IntersectionId,
    },
}

/// A failure within a fail-fast batch routing call.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("agent {agent} could not be routed: {source}")]
pub struct BatchError {
    /// Index of the failed agent within the batch.
    pub agent: usize,
    #[source]
    pub source: RoutingError,
}
