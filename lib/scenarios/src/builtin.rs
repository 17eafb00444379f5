use crate::Map;
use crate::raw::Scenario;

/// The 8-node regression scenario: one depot, seven affected areas, two
/// truck-drone tandems. Areas 1, 2 and 6 are still reachable by road;
/// the rest are cut off and can only be served by drone.
///
/// The same data ships as `data/reference.txt`.
pub fn reference() -> Scenario {
  let deadline: Map<usize, i64> = [
    (1, 100),
    (2, 110),
    (3, 35),
    (4, 45),
    (5, 55),
    (6, 120),
    (7, 40),
  ].iter().copied().collect();

  Scenario {
    id: "reference".to_string(),
    coords: vec![
      (0.0, 0.0),   // depot
      (15.0, 3.0),
      (18.0, 7.0),
      (4.0, 2.0),
      (5.0, 4.0),
      (3.0, 6.0),
      (20.0, 10.0),
      (6.0, 1.0),
    ],
    demand: vec![0, 6, 7, 1, 2, 2, 8, 1],
    deadline,
    truck_reachable: vec![1, 2, 6],
    fleet: 2,
    horizon: 150,
    endurance: 35,
    truck_capacity: 15,
    drone_capacity: 5,
    truck_speed: 1.0,
    drone_speed: 1.5,
    truck_cost: 2.0,
    drone_cost: 1.0,
    delay_penalty: 5.0,
    unserved_penalty: 100.0,
  }
}
