use std::path::Path;
use crate::{Result, Map};
use crate::raw::Scenario;
use super::{
  ParseScenario,
  nom_prelude::*
};

/// Whitespace text format for relief scenarios:
///
/// ```text
/// NUM_NODES FLEET HORIZON ENDURANCE TRUCK_CAP DRONE_CAP
/// TRUCK_SPEED DRONE_SPEED TRUCK_COST DRONE_COST DELAY_PENALTY UNSERVED_PENALTY
/// ID X Y DEMAND DEADLINE ROAD
/// ...
/// ```
///
/// One node row per node, depot first (its deadline and road flag are
/// ignored); ROAD is 1 when the road network still reaches the node.
#[derive(Debug, Copy, Clone)]
pub struct ReliefFmt<P>(pub P);

impl<P: AsRef<Path>> ParseScenario<ReliefFmt<P>> for Scenario {
  fn parse(path: ReliefFmt<P>) -> Result<Scenario> {
    let path = path.0.as_ref();
    let data = std::fs::read_to_string(path)?;
    let id = path.file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_default();
    match parsers::scenario(&data).finish() {
      Ok((_, mut s)) => {
        s.id = id;
        s.check()?;
        Ok(s)
      }
      Err(e) => Err(
        anyhow::Error::msg(e.to_string())
      ),
    }
  }
}


mod parsers {
  use super::*;
  use crate::parsers::common::*;

  pub fn scenario(input: &str) -> IResult<&str, Scenario, error::VerboseError<&str>> {
    let usize_space = |i| terminated(usize_, space1)(i);
    let i64_space = |i| terminated(i64_, space1)(i);
    let dbl_space = |i| terminated(double, space1)(i);

    let (input, (num_nodes, fleet, horizon, endurance, truck_capacity, drone_capacity)) =
      tuple((usize_space, usize_space, i64_space, i64_space, i64_space, terminated(i64_, newline)))(input)?;

    let (mut input, (truck_speed, drone_speed, truck_cost, drone_cost, delay_penalty, unserved_penalty)) =
      tuple((dbl_space, dbl_space, dbl_space, dbl_space, dbl_space, terminated(double, newline)))(input)?;

    //   3   4.0   2.0   1   35  0
    let mut parse_data_line = preceded(space0, tuple((
      usize_space, // ID
      dbl_space,   // x
      dbl_space,   // y
      i64_space,   // demand
      i64_space,   // deadline
      terminated(usize_, newline) // road flag
    )));

    let mut coords = Vec::with_capacity(num_nodes);
    let mut demand = Vec::with_capacity(num_nodes);
    let mut deadline: Map<usize, i64> = Map::default();
    let mut truck_reachable = Vec::new();

    for k in 0..num_nodes {
      let (i, (node, x, y, q, d, road)) = parse_data_line(input)?;
      debug_assert_eq!(node, k);
      input = i;
      coords.push((x, y));
      demand.push(q);
      if node > 0 {
        deadline.insert(node, d);
        if road == 1 {
          truck_reachable.push(node);
        }
      }
    }

    let (input, _) = eof(input)?;

    Ok((input, Scenario {
      id: String::new(),
      coords,
      demand,
      deadline,
      truck_reachable,
      fleet,
      horizon,
      endurance,
      truck_capacity,
      drone_capacity,
      truck_speed,
      drone_speed,
      truck_cost,
      drone_cost,
      delay_penalty,
      unserved_penalty,
    }))
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::builtin;

  #[test]
  fn reference_file_matches_builtin() -> Result<()> {
    let parsed = Scenario::parse(ReliefFmt("data/reference.txt"))?;
    assert_eq!(parsed, builtin::reference());
    Ok(())
  }
}
