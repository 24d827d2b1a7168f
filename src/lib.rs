pub use agent::Agent;
pub use cgmath;
pub use error::{BatchError, GraphError, RoutingError};
pub use network::{Direction, Intersection, IntersectionAttributes, Network, Road, RoadAttributes};
pub use priority::{priority_order, RankFeatures, Ranker};
pub use reservation::ReservationTable;
pub use route::{Route, Waypoint};
pub use router::{CooperativeRouter, Router};
pub use slotmap::{Key, KeyData};

mod agent;
mod error;
pub mod math;
mod network;
mod priority;
mod reservation;
mod route;
mod router;
mod search;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Unique ID of a [Road].
    pub struct RoadId;
    /// Unique ID of an [Intersection].
    pub struct IntersectionId;
}

type RoadSet = SlotMap<RoadId, Road>;
type IntersectionSet = SlotMap<IntersectionId, Intersection>;
