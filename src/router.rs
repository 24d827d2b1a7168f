use crate::error::{BatchError, RoutingError};
use crate::priority::{priority_order, Ranker};
use crate::reservation::ReservationTable;
use crate::route::{trace_route, Route};
use crate::search::shortest_time_search;
use crate::{Agent, Network};

/// Routes agents independently of one another, aware only of traffic-light
/// cycles. Agents routed this way share no mutable state.
pub struct Router<'a> {
    /// The network to route over.
    network: &'a Network,
    /// Average network speed in m/s, used by the search heuristic.
    average_speed: f64,
}

impl<'a> Router<'a> {
    /// Creates a selfish router over the given network.
    pub fn new(network: &'a Network, average_speed: f64) -> Self {
        Self {
            network,
            average_speed,
        }
    }

    /// Computes the time-optimal route for a single agent.
    pub fn route(&self, agent: &Agent) -> Result<Route, RoutingError> {
        let outcome = shortest_time_search(self.network, agent, self.average_speed, None)?;
        Ok(trace_route(&outcome, agent, self.network, None))
    }

    /// Routes every agent in the slice, reporting per-agent failures.
    pub fn route_all(&self, agents: &[Agent]) -> Vec<Result<Route, RoutingError>> {
        agents.iter().map(|agent| self.route(agent)).collect()
    }
}

/// Routes cooperative agents sequentially through a shared space-time
/// reservation table, so that each agent's search is costed against the
/// occupancy every earlier agent has already claimed.
///
/// Agent order decides who claims contested slots first; no agent ever
/// re-plans another agent's finalised route.
pub struct CooperativeRouter<'a> {
    /// The network to route over.
    network: &'a Network,
    /// Average network speed in m/s, used by the search heuristic.
    average_speed: f64,
    /// Occupancy units written per agent-second of road usage.
    congestion_cost: u32,
    /// The reservation table of the current batch.
    reservations: ReservationTable,
}

impl<'a> CooperativeRouter<'a> {
    /// Creates a cooperative router over the given network with a fresh
    /// reservation table.
    pub fn new(network: &'a Network, average_speed: f64) -> Self {
        Self {
            network,
            average_speed,
            congestion_cost: 1,
            reservations: ReservationTable::new(),
        }
    }

    /// Sets the occupancy written per agent-second of road usage.
    /// The default is 1.
    pub fn set_congestion_cost(&mut self, cost: u32) {
        self.congestion_cost = cost;
    }

    /// Routes one agent against the current reservation table and commits
    /// its own occupancy back into the table.
    ///
    /// Calls are strictly sequential; the table carries the cumulative
    /// occupancy of every agent routed since the last [`reset`](Self::reset).
    pub fn route_agent(&mut self, agent: &Agent) -> Result<Route, RoutingError> {
        let outcome = shortest_time_search(
            self.network,
            agent,
            self.average_speed,
            Some(&self.reservations),
        )?;
        Ok(trace_route(
            &outcome,
            agent,
            self.network,
            Some((&mut self.reservations, self.congestion_cost)),
        ))
    }

    /// Routes a batch of agents in priority order, starting from a fresh
    /// reservation table.
    ///
    /// Results are returned in the input order of `agents`; failed agents
    /// are reported individually without aborting the rest of the batch.
    pub fn route_batch(
        &mut self,
        agents: &[Agent],
        ranker: Option<&dyn Ranker>,
    ) -> Vec<Result<Route, RoutingError>> {
        self.reservations.clear();
        let order = priority_order(agents, self.network, ranker);
        let mut results: Vec<Option<Result<Route, RoutingError>>> =
            agents.iter().map(|_| None).collect();
        let mut failures = 0;
        for index in order {
            let result = self.route_agent(&agents[index]);
            if result.is_err() {
                failures += 1;
            }
            results[index] = Some(result);
        }
        if failures > 0 {
            log::debug!("{failures} of {} agents could not be routed", agents.len());
        }
        results
            .into_iter()
            .map(|result| result.expect("priority order covers every agent"))
            .collect()
    }

    /// Fail-fast variant of [`route_batch`](Self::route_batch): stops at the
    /// first agent that cannot be routed. Agents already committed to the
    /// reservation table are not rolled back.
    pub fn try_route_batch(
        &mut self,
        agents: &[Agent],
        ranker: Option<&dyn Ranker>,
    ) -> Result<Vec<Route>, BatchError> {
        self.reservations.clear();
        let order = priority_order(agents, self.network, ranker);
        let mut results: Vec<Option<Route>> = agents.iter().map(|_| None).collect();
        for index in order {
            match self.route_agent(&agents[index]) {
                Ok(route) => results[index] = Some(route),
                Err(source) => return Err(BatchError {
                    agent: index,
                    source,
                }),
            }
        }
        Ok(results
            .into_iter()
            .map(|route| route.expect("priority order covers every agent"))
            .collect())
    }

    /// The reservation table accumulated by the batch so far.
    pub fn reservations(&self) -> &ReservationTable {
        &self.reservations
    }

    /// Consumes the router and returns its reservation table snapshot.
    pub fn into_reservations(self) -> ReservationTable {
        self.reservations
    }

    /// Discards all claimed occupancy, starting a new batch.
    pub fn reset(&mut self) {
        self.reservations.clear();
    }
}
