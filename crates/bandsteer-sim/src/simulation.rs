use rand::RngExt as _;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use bandsteer::{
    Band, ConnectionState, DefaultPolicy, MacAddr, NodeId, SignalThresholdTracker,
    SteeringScheduler, TargetBandSelector, TickOutcome, TransitionRequest,
};

use crate::scenario::Scenario;

/// A transition request together with when it was sent.
#[derive(Debug, Clone, Serialize)]
pub struct SentRequest {
    pub tick: u64,
    pub now_ms: u64,
    pub node_name: String,
    #[serde(flatten)]
    pub request: TransitionRequest,
}

/// A station following a request to the next band up.
#[derive(Debug, Clone, Serialize)]
pub struct Roam {
    pub tick: u64,
    pub station: MacAddr,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub name: String,
    pub band: Band,
    pub stations: Vec<MacAddr>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub seed: u64,
    pub ticks: u64,
    pub passes: u64,
    pub requests: Vec<SentRequest>,
    pub roams: Vec<Roam>,
    pub nodes: Vec<NodeSummary>,
}

/// Deterministic band-steering simulation.
///
/// Each [`step`](Self::step) is one measurement tick: connection events,
/// random-walk signals, threshold tracking on every node, then one
/// scheduler tick per node. Stations that obey transitions roam to the
/// first valid target right after their request is sent.
pub struct Simulation {
    scenario: Scenario,
    policy: DefaultPolicy,
    rng: StdRng,
    tick: u64,
    passes: u64,
    requests: Vec<SentRequest>,
    roams: Vec<Roam>,
}

impl Simulation {
    pub fn new(scenario: Scenario) -> Self {
        let rng = StdRng::seed_from_u64(scenario.seed);
        Simulation {
            scenario,
            policy: DefaultPolicy,
            rng,
            tick: 0,
            passes: 0,
            requests: Vec::new(),
            roams: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.tick.saturating_mul(self.scenario.config.tick_interval)
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Advance one measurement tick. Returns the requests sent during it.
    pub fn step(&mut self) -> anyhow::Result<Vec<TransitionRequest>> {
        self.tick += 1;
        let tick = self.tick;
        let now = self.now_ms();

        self.apply_connection_events(tick)?;
        self.walk_signals()?;

        let config = &self.scenario.config;
        let tracker = SignalThresholdTracker::new(config, &self.policy);
        for node in self.scenario.nodes.iter_mut() {
            tracker.update_node(node);
        }

        let scheduler = SteeringScheduler::new(config, &self.policy);
        let ids: Vec<NodeId> = self.scenario.nodes.ids().collect();
        let mut sent: Vec<TransitionRequest> = Vec::new();
        for id in ids {
            let before = sent.len();
            let outcome = scheduler.tick(&mut self.scenario.nodes, id, now, &mut sent)?;
            if let TickOutcome::Fired(_) = outcome {
                self.passes += 1;
            }
            let node_name = self.scenario.nodes.require(id)?.name.clone();
            for request in &sent[before..] {
                self.requests.push(SentRequest {
                    tick,
                    now_ms: now,
                    node_name: node_name.clone(),
                    request: *request,
                });
            }
        }

        for request in &sent {
            self.follow(tick, request)?;
        }

        Ok(sent)
    }

    pub fn run(mut self) -> anyhow::Result<SimReport> {
        while self.tick < self.scenario.ticks {
            self.step()?;
        }
        tracing::info!(
            ticks = self.tick,
            passes = self.passes,
            requests = self.requests.len(),
            roams = self.roams.len(),
            "simulation finished"
        );

        let nodes = self
            .scenario
            .nodes
            .iter()
            .map(|n| NodeSummary {
                name: n.name.clone(),
                band: n.band(),
                stations: n.stations.iter().map(|s| s.addr).collect(),
            })
            .collect();

        Ok(SimReport {
            seed: self.scenario.seed,
            ticks: self.tick,
            passes: self.passes,
            requests: self.requests,
            roams: self.roams,
            nodes,
        })
    }

    fn apply_connection_events(&mut self, tick: u64) -> anyhow::Result<()> {
        for walk in &self.scenario.walks {
            let state = if walk.disconnect_at == Some(tick) {
                ConnectionState::NotConnected
            } else if walk.reconnect_at == Some(tick) {
                ConnectionState::Connected
            } else {
                continue;
            };
            let node = self.scenario.nodes.require_mut(walk.node)?;
            let node_name = node.name.clone();
            if let Some(sta) = node.station_mut(walk.addr) {
                tracing::debug!(
                    station = %walk.addr,
                    node = %node_name,
                    ?state,
                    "connection change"
                );
                sta.set_connection(state);
            }
        }
        Ok(())
    }

    fn walk_signals(&mut self) -> anyhow::Result<()> {
        for walk in &mut self.scenario.walks {
            let delta = rand_signed(&mut self.rng, walk.step);
            walk.level = (walk.level + delta).clamp(walk.min, walk.max);
            if let Some(sta) = self.scenario.nodes.require_mut(walk.node)?.station_mut(walk.addr) {
                sta.record_signal(walk.level.round() as i32);
            }
        }
        Ok(())
    }

    /// Move an obedient station to the first valid target of its node.
    fn follow(&mut self, tick: u64, request: &TransitionRequest) -> anyhow::Result<()> {
        let Some(walk) = self
            .scenario
            .walks
            .iter_mut()
            .find(|w| w.addr == request.station)
        else {
            return Ok(());
        };
        if !walk.obeys_transition {
            return Ok(());
        }

        let nodes = &self.scenario.nodes;
        let selector = TargetBandSelector::new(&self.scenario.config, &self.policy);
        let current = nodes.require(request.node)?;
        let Some(target) = selector.targets(current, nodes).next() else {
            return Ok(());
        };
        let (from, to) = (current.name.clone(), target.name.clone());
        let target_id = target.id;

        self.scenario.nodes.move_station(request.station, request.node, target_id)?;
        if let Some(sta) = self
            .scenario
            .nodes
            .require_mut(target_id)?
            .station_mut(request.station)
        {
            sta.reassociate();
        }
        walk.node = target_id;
        walk.level = (walk.level + self.scenario.roam_signal_delta).clamp(walk.min, walk.max);

        tracing::info!(station = %request.station, %from, %to, "station roamed");
        self.roams.push(Roam {
            tick,
            station: request.station,
            from,
            to,
        });
        Ok(())
    }
}

fn rand_signed(rng: &mut StdRng, max_step: f64) -> f64 {
    if max_step <= 0.0 {
        return 0.0;
    }
    let mag = rng.random::<f64>() * max_step;
    if rng.random::<bool>() { mag } else { -mag }
}
