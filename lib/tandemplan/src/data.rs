use anyhow::{bail, Result};
use itertools::iproduct;
use ndarray::Array2;
use scenarios::{metrics, Scenario};

use crate::{Map, Set};

pub type Time = i64;
pub type Cost = f64;
pub type Node = usize;
pub type Tandem = usize;
pub type Demand = i64;

pub const DEPOT: Node = 0;

/// A validated relief instance: index sets, fleet scalars and the integer
/// travel-time matrices the model is built from.
///
/// `C` are the affected areas (`1..=n`), `VL` the candidate drone-launch
/// nodes (every node, depot included), `VR` the candidate rendezvous nodes
/// (every affected area). `VT` and `VD` split `C` into areas the road
/// network still reaches and areas only a drone can serve.
#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Instance {
    pub id: String,
    pub n: usize,
    pub C: Vec<Node>,
    pub VL: Vec<Node>,
    pub VR: Vec<Node>,
    pub VT: Set<Node>,
    pub VD: Set<Node>,
    pub K: Vec<Tandem>,
    pub horizon: Time,
    pub endurance: Time,
    pub truck_capacity: Demand,
    pub drone_capacity: Demand,
    pub truck_cost: Cost,
    pub drone_cost: Cost,
    pub demand: Vec<Demand>,
    pub deadline: Map<Node, Time>,
    pub delay_penalty: Map<Node, Cost>,
    pub unserved_penalty: Map<Node, Cost>,
    pub truck_time: Array2<Time>,
    pub drone_time: Array2<Time>,
}

impl Instance {
    /// Build an instance from a raw scenario, computing the road matrix
    /// with the grid metric and the flight matrix with the straight-line
    /// metric, both rounded to whole minutes.
    pub fn from_scenario(s: &Scenario) -> Result<Instance> {
        s.check()?;
        let nodes = s.num_nodes();
        let n = nodes - 1;

        let truck = metrics::time_matrix(metrics::Manhattan(), &s.coords, s.truck_speed);
        let drone = metrics::time_matrix(metrics::Euclidean(), &s.coords, s.drone_speed);
        let truck_time = Array2::from_shape_fn((nodes, nodes), |(i, j)| truck[&(i, j)]);
        let drone_time = Array2::from_shape_fn((nodes, nodes), |(i, j)| drone[&(i, j)]);

        #[allow(non_snake_case)]
        let VT: Set<Node> = s.truck_reachable.iter().copied().collect();
        #[allow(non_snake_case)]
        let VD: Set<Node> = (1..=n).filter(|i| !VT.contains(i)).collect();

        let data = Instance {
            id: s.id.clone(),
            n,
            C: (1..=n).collect(),
            VL: (0..=n).collect(),
            VR: (1..=n).collect(),
            VT,
            VD,
            K: (0..s.fleet).collect(),
            horizon: s.horizon,
            endurance: s.endurance,
            truck_capacity: s.truck_capacity,
            drone_capacity: s.drone_capacity,
            truck_cost: s.truck_cost,
            drone_cost: s.drone_cost,
            demand: s.demand.clone(),
            deadline: s.deadline.iter().map(|(&i, &d)| (i, d)).collect(),
            delay_penalty: (1..=n).map(|i| (i, s.delay_penalty)).collect(),
            unserved_penalty: (1..=n).map(|i| (i, s.unserved_penalty)).collect(),
            truck_time,
            drone_time,
        };
        data.validate()?;
        return Ok(data);
    }

    #[inline]
    pub fn num_nodes(&self) -> usize { self.n + 1 }

    #[inline]
    pub fn nodes(&self) -> std::ops::Range<Node> { 0..self.num_nodes() }

    #[inline]
    pub fn drone_only(&self, i: Node) -> bool { self.VD.contains(&i) }

    /// A sortie (launch `i`, serve `j`, rendezvous `l`) is legal when the
    /// three nodes are pairwise distinct and `j` is cut off from the road
    /// network.
    #[inline]
    pub fn sortie_ok(&self, i: Node, j: Node, l: Node) -> bool {
        return self.VD.contains(&j) && i != j && i != l && j != l;
    }

    pub fn legal_sorties(&self) -> impl Iterator<Item = (Node, Node, Node)> + '_ {
        iproduct!(
            self.VL.iter().copied(),
            self.C.iter().copied(),
            self.VR.iter().copied()
        )
        .filter(move |&(i, j, l)| self.sortie_ok(i, j, l))
    }

    /// Check the invariants every downstream component assumes. Matrices
    /// must be square over all nodes, non-negative, with a zero diagonal;
    /// demands, deadlines and penalties must line up with the index sets.
    pub fn validate(&self) -> Result<()> {
        let nodes = self.num_nodes();
        if self.n == 0 {
            bail!("instance {}: no affected areas", self.id);
        }
        if self.K.is_empty() {
            bail!("instance {}: no tandems", self.id);
        }
        if self.horizon < 0 || self.endurance < 0 {
            bail!("instance {}: negative horizon or endurance", self.id);
        }
        if self.demand.len() != nodes {
            bail!("instance {}: {} demand entries for {} nodes", self.id, self.demand.len(), nodes);
        }
        if self.demand[DEPOT] != 0 {
            bail!("instance {}: depot demand must be zero", self.id);
        }
        for &i in &self.C {
            if !self.deadline.contains_key(&i) {
                bail!("instance {}: area {} has no deadline", self.id, i);
            }
            if !self.delay_penalty.contains_key(&i) || !self.unserved_penalty.contains_key(&i) {
                bail!("instance {}: area {} has no penalty rates", self.id, i);
            }
        }
        for &i in self.VT.iter().chain(self.VD.iter()) {
            if i == DEPOT || i > self.n {
                bail!("instance {}: node {} cannot be an affected area", self.id, i);
            }
        }
        if self.VT.intersection(&self.VD).next().is_some() {
            bail!("instance {}: an area cannot be both road-served and cut off", self.id);
        }
        if self.VT.len() + self.VD.len() != self.n {
            bail!("instance {}: areas are not partitioned into road-served and cut off", self.id);
        }
        for (name, m) in &[("road", &self.truck_time), ("flight", &self.drone_time)] {
            if m.dim() != (nodes, nodes) {
                bail!("instance {}: {} matrix is {:?}, expected {} x {}", self.id, name, m.dim(), nodes, nodes);
            }
            for i in 0..nodes {
                if m[[i, i]] != 0 {
                    bail!("instance {}: {} matrix has nonzero diagonal at {}", self.id, name, i);
                }
                for j in 0..nodes {
                    if m[[i, j]] < 0 {
                        bail!("instance {}: negative {} time on arc {} -> {}", self.id, name, i, j);
                    }
                }
            }
        }
        Ok(())
    }
}
