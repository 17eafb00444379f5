use anyhow::{bail, Result};
use itertools::Itertools;
use crate::Map;

/// Raw description of a relief scenario, before any travel times are
/// computed: node coordinates (index 0 is the depot), per-node demand,
/// customer deadlines and the fleet scalars.
///
/// `truck_reachable` lists the customers the road network still reaches;
/// every other customer can only be served by drone.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
  pub id: String,
  pub coords: Vec<(f64, f64)>,
  pub demand: Vec<i64>,
  pub deadline: Map<usize, i64>,
  pub truck_reachable: Vec<usize>,
  pub fleet: usize,
  pub horizon: i64,
  pub endurance: i64,
  pub truck_capacity: i64,
  pub drone_capacity: i64,
  pub truck_speed: f64,
  pub drone_speed: f64,
  pub truck_cost: f64,
  pub drone_cost: f64,
  pub delay_penalty: f64,
  pub unserved_penalty: f64,
}

impl Scenario {
  pub fn num_nodes(&self) -> usize { self.coords.len() }

  /// Structural sanity checks; value-level validation happens when the
  /// scenario is turned into a model instance.
  pub fn check(&self) -> Result<()> {
    let n = self.num_nodes();
    if n < 2 {
      bail!("scenario {}: need a depot and at least one customer", self.id);
    }
    if self.demand.len() != n {
      bail!("scenario {}: {} demand entries for {} nodes", self.id, self.demand.len(), n);
    }
    if self.demand[0] != 0 {
      bail!("scenario {}: depot demand must be zero", self.id);
    }
    for i in 1..n {
      if !self.deadline.contains_key(&i) {
        bail!("scenario {}: customer {} has no deadline", self.id, i);
      }
    }
    if self.deadline.contains_key(&0) {
      bail!("scenario {}: depot cannot carry a deadline", self.id);
    }
    for &i in &self.truck_reachable {
      if i == 0 || i >= n {
        bail!("scenario {}: truck-reachable id {} is not a customer", self.id, i);
      }
    }
    if self.truck_reachable.iter().unique().count() != self.truck_reachable.len() {
      bail!("scenario {}: duplicate truck-reachable ids", self.id);
    }
    if self.fleet == 0 {
      bail!("scenario {}: fleet is empty", self.id);
    }
    if self.truck_speed <= 0.0 || self.drone_speed <= 0.0 {
      bail!("scenario {}: speeds must be positive", self.id);
    }
    if self.horizon < 0 || self.endurance < 0 {
      bail!("scenario {}: horizon and endurance must be non-negative", self.id);
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builtin;

  #[test]
  fn reference_is_well_formed() {
    builtin::reference().check().unwrap();
  }

  #[test]
  fn missing_deadline_rejected() {
    let mut s = builtin::reference();
    s.deadline.remove(&3);
    assert!(s.check().is_err());
  }

  #[test]
  fn depot_demand_rejected() {
    let mut s = builtin::reference();
    s.demand[0] = 4;
    assert!(s.check().is_err());
  }

  #[test]
  fn bad_reachable_id_rejected() {
    let mut s = builtin::reference();
    s.truck_reachable.push(0);
    assert!(s.check().is_err());
  }

  #[test]
  fn duplicate_reachable_id_rejected() {
    let mut s = builtin::reference();
    s.truck_reachable.push(1);
    assert!(s.check().is_err());
  }
}
