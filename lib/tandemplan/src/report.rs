use std::io::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::Map;
use crate::data::{Instance, Node, Tandem, Time, DEPOT};
use crate::solve::Assignment;

/// One truck's tour, depot to depot, with the arrival time at each stop.
#[derive(Debug, Clone)]
pub struct TruckRoute {
    pub tandem: Tandem,
    pub path: Vec<Node>,
    pub arrival: Vec<Time>,
}

/// One drone sortie as flown: launch node, served area, rendezvous node,
/// and the clock at each.
#[derive(Debug, Clone)]
pub struct Flight {
    pub tandem: Tandem,
    pub launch: Node,
    pub serves: Node,
    pub meets: Node,
    pub launch_time: Time,
    pub service_time: Time,
    pub meet_time: Time,
}

/// The objective split into its four additive terms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Breakdown {
    pub travel: f64,
    pub flight: f64,
    pub delay: f64,
    pub unserved: f64,
}

impl Breakdown {
    pub fn total(&self) -> f64 {
        self.travel + self.flight + self.delay + self.unserved
    }

    pub fn compute(data: &Instance, asn: &Assignment) -> Breakdown {
        let mut travel = 0.0;
        for (&(_, i, j), &on) in &asn.truck_arcs {
            if on {
                travel += data.truck_time[[i, j]] as f64 * data.truck_cost;
            }
        }
        let mut flight = 0.0;
        for (&(_, i, j, l), &on) in &asn.flights {
            if on {
                flight += (data.drone_time[[i, j]] + data.drone_time[[j, l]]) as f64 * data.drone_cost;
            }
        }
        let mut delay = 0.0;
        for (&(_, i), &d) in &asn.delay {
            delay += data.delay_penalty[&i] * d as f64;
        }
        let mut unserved = 0.0;
        for &i in &data.C {
            if !served(asn, i) {
                unserved += data.unserved_penalty[&i];
            }
        }
        return Breakdown { travel, flight, delay, unserved };
    }
}

fn served(asn: &Assignment, area: Node) -> bool {
    let by_road = asn.truck_arcs.iter().any(|(&(_, _, to), &on)| on && to == area);
    let by_air = asn.flights.iter().any(|(&(_, _, serve, _), &on)| on && serve == area);
    return by_road || by_air;
}

/// Human-usable view of an assignment.
#[derive(Debug, Clone)]
pub struct Plan {
    pub routes: Vec<TruckRoute>,
    pub flights: Vec<Flight>,
    pub unserved: Vec<Node>,
    pub breakdown: Breakdown,
}

pub fn extract(data: &Instance, asn: &Assignment) -> Plan {
    let mut routes = Vec::new();
    for &k in &data.K {
        let mut next: Map<Node, Node> = Map::default();
        for (&(kk, i, j), &on) in &asn.truck_arcs {
            if kk == k && on {
                next.insert(i, j);
            }
        }
        let mut path = vec![DEPOT];
        let mut here = DEPOT;
        while let Some(&to) = next.get(&here) {
            path.push(to);
            if to == DEPOT || path.len() > data.num_nodes() + 1 {
                break;
            }
            here = to;
        }
        if path.len() > 1 {
            let arrival = path.iter().map(|&i| asn.truck_arrival[&(k, i)]).collect();
            routes.push(TruckRoute { tandem: k, path, arrival });
        }
    }

    let flights = asn.flights.iter()
        .filter(|(_, &on)| on)
        .map(|(&(k, i, j, l), _)| Flight {
            tandem: k,
            launch: i,
            serves: j,
            meets: l,
            launch_time: asn.truck_arrival[&(k, i)],
            service_time: asn.drone_arrival[&(k, j)],
            meet_time: asn.truck_arrival[&(k, l)],
        })
        .sorted_by_key(|f| (f.tandem, f.launch_time, f.launch))
        .collect_vec();

    let unserved = data.C.iter().copied().filter(|&i| !served(asn, i)).collect();

    return Plan {
        routes,
        flights,
        unserved,
        breakdown: Breakdown::compute(data, asn),
    };
}

impl Plan {
    pub fn to_json(&self) -> json::JsonValue {
        let routes: Vec<json::JsonValue> = self.routes.iter()
            .map(|r| json::object! {
                tandem: r.tandem,
                path: r.path.clone(),
                arrival: r.arrival.clone(),
            })
            .collect();
        let flights: Vec<json::JsonValue> = self.flights.iter()
            .map(|f| json::object! {
                tandem: f.tandem,
                launch: f.launch,
                serves: f.serves,
                meets: f.meets,
                launch_time: f.launch_time,
                service_time: f.service_time,
                meet_time: f.meet_time,
            })
            .collect();
        return json::object! {
            objective: self.breakdown.total(),
            travel_cost: self.breakdown.travel,
            flight_cost: self.breakdown.flight,
            delay_penalty: self.breakdown.delay,
            unserved_penalty: self.breakdown.unserved,
            routes: routes,
            flights: flights,
            unserved: self.unserved.clone(),
        };
    }

    pub fn write_json(&self, mut buf: impl Write) -> Result<()> {
        self.to_json().write_pretty(&mut buf, 2)?;
        return Ok(());
    }

    pub fn write_summary(&self, mut buf: impl Write) -> Result<()> {
        let b = &self.breakdown;
        writeln!(buf, "Objective: {}", b.total())?;
        writeln!(
            buf,
            "  travel {} + flights {} + delay {} + unserved {}",
            b.travel, b.flight, b.delay, b.unserved
        )?;
        for r in &self.routes {
            let stops = r.path.iter()
                .zip(&r.arrival)
                .map(|(n, t)| format!("{} (t={})", n, t))
                .join(" -> ");
            writeln!(buf, "Truck {}: {}", r.tandem, stops)?;
        }
        if self.routes.is_empty() {
            writeln!(buf, "No truck leaves the depot.")?;
        }
        for f in &self.flights {
            writeln!(
                buf,
                "Drone {}: launch {} t={}, serve {} t={}, meet {} t={}",
                f.tandem, f.launch, f.launch_time, f.serves, f.service_time, f.meets, f.meet_time
            )?;
        }
        if self.flights.is_empty() {
            writeln!(buf, "No drone flights.")?;
        }
        if self.unserved.is_empty() {
            writeln!(buf, "All areas served.")?;
        } else {
            writeln!(buf, "Unserved areas: {:?}", self.unserved)?;
        }
        return Ok(());
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Instance;
    use scenarios::builtin;

    fn toy_assignment(data: &Instance) -> Assignment {
        let mut asn = Assignment::default();
        for &k in &data.K {
            for i in data.nodes() {
                for j in data.nodes() {
                    if i != j {
                        asn.truck_arcs.insert((k, i, j), false);
                    }
                }
                asn.truck_arrival.insert((k, i), 0);
                asn.drone_arrival.insert((k, i), 0);
            }
            for &i in &data.C {
                asn.delay.insert((k, i), 0);
            }
        }
        asn
    }

    #[test]
    fn route_follows_arcs_from_the_depot() {
        let data = Instance::from_scenario(&builtin::reference()).unwrap();
        let mut asn = toy_assignment(&data);
        asn.truck_arcs.insert((0, 0, 1), true);
        asn.truck_arcs.insert((0, 1, 2), true);
        asn.truck_arcs.insert((0, 2, 0), true);
        asn.truck_arrival.insert((0, 1), 18);
        asn.truck_arrival.insert((0, 2), 25);
        asn.truck_arrival.insert((0, 0), 0);

        let plan = extract(&data, &asn);
        assert_eq!(plan.routes.len(), 1);
        assert_eq!(plan.routes[0].path, vec![0, 1, 2, 0]);
        assert_eq!(plan.routes[0].arrival, vec![0, 18, 25, 0]);
        // 1 and 2 are served by the arcs; everything else is not
        assert_eq!(plan.unserved, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn breakdown_prices_each_term() {
        let data = Instance::from_scenario(&builtin::reference()).unwrap();
        let mut asn = toy_assignment(&data);
        asn.truck_arcs.insert((0, 0, 1), true);
        asn.truck_arcs.insert((0, 1, 0), true);
        asn.flights.insert((0, 0, 3, 1), true);
        asn.delay.insert((0, 1), 2);

        let b = Breakdown::compute(&data, &asn);
        // grid distance 18 out and back, at 2 per minute
        assert_eq!(b.travel, (18 + 18) as f64 * 2.0);
        let legs = (data.drone_time[[0, 3]] + data.drone_time[[3, 1]]) as f64;
        assert_eq!(b.flight, legs);
        assert_eq!(b.delay, 10.0);
        // five areas untouched at 100 each
        assert_eq!(b.unserved, 500.0);
        assert_eq!(b.total(), b.travel + b.flight + b.delay + b.unserved);
    }

    #[test]
    fn writers_do_not_choke() {
        let data = Instance::from_scenario(&builtin::reference()).unwrap();
        let asn = toy_assignment(&data);
        let plan = extract(&data, &asn);
        let mut out = Vec::new();
        plan.write_summary(&mut out).unwrap();
        assert!(!out.is_empty());
        let mut out = Vec::new();
        plan.write_json(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("unserved_penalty"));
    }
}
