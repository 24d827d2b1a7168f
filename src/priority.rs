use crate::{Agent, Network};
use log::warn;

/// The per-agent features given to an external ranking collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankFeatures {
    /// Number of passengers on board.
    pub passenger_count: u32,
    /// Carbon emission rate in g/km.
    pub emission_rate: f64,
    /// Straight-line distance to the destination in metres.
    pub distance: f64,
}

/// An external learned ranking collaborator.
///
/// [`rank`](Ranker::rank) receives one feature set per agent, in baseline
/// priority order, and returns a permutation assigning each input its final
/// position: the agent behind `features[i]` is processed at position
/// `permutation[i]`. An empty input yields an empty permutation.
pub trait Ranker {
    fn rank(&self, features: &[RankFeatures]) -> Vec<usize>;
}

/// Orders cooperative agents for routing, returning indices into `agents`.
/// Agents earlier in the order claim contested space-time slots first.
///
/// The baseline favours fuller vehicles travelling farther; ties go to
/// higher emitters, which then obtain the less congested paths. When a
/// ranking collaborator is supplied, its permutation re-ranks the baseline
/// order; a malformed permutation falls back to the baseline.
pub fn priority_order(
    agents: &[Agent],
    network: &Network,
    ranker: Option<&dyn Ranker>,
) -> Vec<usize> {
    let distances: Vec<f64> = agents
        .iter()
        .map(|agent| agent.distance_to_destination(network).unwrap_or(0.0))
        .collect();

    let mut order: Vec<usize> = (0..agents.len()).collect();
    order.sort_by(|&a, &b| {
        let weight = |i: usize| distances[i] * agents[i].passenger_count as f64;
        weight(b)
            .total_cmp(&weight(a))
            .then(agents[b].emission_rate.total_cmp(&agents[a].emission_rate))
    });

    let Some(ranker) = ranker else {
        return order;
    };
    if order.is_empty() {
        return order;
    }

    let features: Vec<RankFeatures> = order
        .iter()
        .map(|&i| RankFeatures {
            passenger_count: agents[i].passenger_count,
            emission_rate: agents[i].emission_rate,
            distance: distances[i],
        })
        .collect();

    let permutation = ranker.rank(&features);
    if !is_permutation(&permutation, order.len()) {
        warn!("ranking collaborator returned a malformed permutation, keeping baseline order");
        return order;
    }

    let mut ranked = vec![0; order.len()];
    for (i, &position) in permutation.iter().enumerate() {
        ranked[position] = order[i];
    }
    ranked
}

/// Checks that `indices` is a permutation of `0..len`.
fn is_permutation(indices: &[usize], len: usize) -> bool {
    if indices.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &index in indices {
        if index >= len || seen[index] {
            return false;
        }
        seen[index] = true;
    }
    true
}
