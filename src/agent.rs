use crate::math::{distance, Point2d};
use crate::{Network, RoadId};
use rand::Rng;

/// A vehicle agent with a current location, a destination, and the
/// attributes that determine its priority among cooperative agents.
///
/// Fuelled and electric vehicles differ only in their emission rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    /// The road the agent is currently on.
    pub road: RoadId,
    /// Normalised position along the current road, in [0, 1].
    pub position: f64,
    /// The road the agent wants to reach.
    pub destination_road: RoadId,
    /// Normalised position along the destination road, in [0, 1].
    pub destination_position: f64,
    /// Number of passengers on board.
    pub passenger_count: u32,
    /// Carbon emission rate in g/km; zero for electric vehicles.
    pub emission_rate: f64,
}

impl Agent {
    /// Creates an agent with random placement and destination.
    ///
    /// Conventional vehicles emit 100-250 g/km; electric vehicles emit
    /// nothing. Passenger counts range from 1 to 6. Returns `None` for an
    /// empty network.
    pub fn random(network: &Network, electric: bool, rng: &mut impl Rng) -> Option<Agent> {
        let (road, position) = network.random_location(rng)?;
        let (destination_road, destination_position) = network.random_location(rng)?;
        Some(Agent {
            road,
            position,
            destination_road,
            destination_position,
            passenger_count: rng.gen_range(1..=6),
            emission_rate: if electric {
                0.0
            } else {
                rng.gen_range(100..=250) as f64
            },
        })
    }

    /// World coordinate of the agent's current location.
    pub fn start_coordinate(&self, network: &Network) -> Option<Point2d> {
        Some(network.road(self.road)?.coordinate_at(self.position))
    }

    /// World coordinate of the agent's destination.
    pub fn destination_coordinate(&self, network: &Network) -> Option<Point2d> {
        Some(
            network
                .road(self.destination_road)?
                .coordinate_at(self.destination_position),
        )
    }

    /// Straight-line distance from the agent's location to its destination.
    pub fn distance_to_destination(&self, network: &Network) -> Option<f64> {
        Some(distance(
            self.start_coordinate(network)?,
            self.destination_coordinate(network)?,
        ))
    }
}
