use good_lp::constraint;

use crate::data::DEPOT;
use super::ModelBuilder;
use super::bigm;
use super::vars::sum;

pub fn post(b: &mut ModelBuilder) {
    start_at_depot(b);
    horizon_return(b);
    truck_continuity(b);
    flight_continuity(b);
    launch_sync(b);
    rendezvous_sync(b);
    sequential_sorties(b);
}

/// Truck and drone clocks both start at zero at the depot.
pub fn start_at_depot(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        let a = b.vars.truck_arrival(k, DEPOT);
        let ap = b.vars.drone_arrival(k, DEPOT);
        b.post(constraint!(a == 0.0));
        b.post(constraint!(ap == 0.0));
    }
}

/// The truck is back at the depot within the planning horizon.
pub fn horizon_return(b: &mut ModelBuilder) {
    let data = b.data;
    let horizon = data.horizon as f64;
    for &k in &data.K {
        let a = b.vars.truck_arrival(k, DEPOT);
        b.post(constraint!(a <= horizon));
    }
}

/// Along a used road arc the clock moves forward by at least the travel
/// time; unused arcs leave the clocks alone.
pub fn truck_continuity(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.truck_leg;
    for &k in &data.K {
        for &i in &data.VL {
            for &j in &data.VR {
                if i == j {
                    continue;
                }
                let x = b.vars.x(k, i, j);
                let a_i = b.vars.truck_arrival(k, i);
                let a_j = b.vars.truck_arrival(k, j);
                let t = data.truck_time[[i, j]] as f64;
                b.post(bigm::implied_le(x.into(), a_i + t, a_j.into(), m));
            }
        }
    }
}

/// Drone clock propagation over the two legs of an active sortie: launch
/// to service, then service to rendezvous.
pub fn flight_continuity(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.drone_leg;
    for &k in &data.K {
        for &i in &data.VL {
            for &j in &data.C {
                if i == j {
                    continue;
                }
                let legs = b.vars.first_legs(data, k, i, j);
                if legs.is_empty() {
                    continue;
                }
                let a_i = b.vars.truck_arrival(k, i);
                let ap_j = b.vars.drone_arrival(k, j);
                let t = data.drone_time[[i, j]] as f64;
                b.post(bigm::implied_le(sum(&legs), a_i + t, ap_j.into(), m));
            }
        }
        for &j in &data.C {
            for &l in &data.VR {
                if j == l {
                    continue;
                }
                let legs = b.vars.second_legs(data, k, j, l);
                if legs.is_empty() {
                    continue;
                }
                let ap_j = b.vars.drone_arrival(k, j);
                let a_l = b.vars.truck_arrival(k, l);
                let t = data.drone_time[[j, l]] as f64;
                b.post(bigm::implied_le(sum(&legs), ap_j + t, a_l.into(), m));
            }
        }
    }
}

/// While a sortie launches at a node, the drone clock there agrees with
/// the truck clock, in both directions.
pub fn launch_sync(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.clock;
    for &k in &data.K {
        for &i in &data.VL {
            let trips = b.vars.sorties_launching_at(data, k, i);
            if trips.is_empty() {
                continue;
            }
            let g = sum(&trips);
            let a = b.vars.truck_arrival(k, i);
            let ap = b.vars.drone_arrival(k, i);
            b.post(bigm::implied_le(g.clone(), a.into(), ap.into(), m));
            b.post(bigm::implied_le(g, ap.into(), a.into(), m));
        }
    }
}

/// Same agreement at the node where the drone rejoins its truck.
pub fn rendezvous_sync(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.clock;
    for &k in &data.K {
        for &l in &data.VR {
            let trips = b.vars.sorties_meeting_at(data, k, l);
            if trips.is_empty() {
                continue;
            }
            let g = sum(&trips);
            let a = b.vars.truck_arrival(k, l);
            let ap = b.vars.drone_arrival(k, l);
            b.post(bigm::implied_le(g.clone(), a.into(), ap.into(), m));
            b.post(bigm::implied_le(g, ap.into(), a.into(), m));
        }
    }
}

/// A drone still out on a sortie cannot be launched again: when one
/// sortie ends at `l`, another launches at `later`, and the truck visits
/// `l` before `later`, the recovery time cannot exceed the next launch
/// time. All three conditions must hold before the row tightens.
pub fn sequential_sorties(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.clock;
    for &k in &data.K {
        for &i in &data.VL {
            for &l in &data.VR {
                for &later in &data.C {
                    if i == later || i == l || l == later {
                        continue;
                    }
                    let ending = b.vars.sorties_spanning(data, k, i, l);
                    let starting = b.vars.sorties_launching_at(data, k, later);
                    let p = b.vars.precedes(k, l, later);
                    let ap_l = b.vars.drone_arrival(k, l);
                    let ap_later = b.vars.drone_arrival(k, later);
                    let guards = vec![sum(&ending), sum(&starting), p.into()];
                    b.post(bigm::implied_le_all(guards, ap_l.into(), ap_later.into(), m));
                }
            }
        }
    }
}
