use good_lp::{constraint, Expression};

use crate::data::DEPOT;
use super::ModelBuilder;
use super::bigm;
use super::vars::sum;

pub fn post(b: &mut ModelBuilder) {
    visit_once(b);
    depot_degree(b);
    flow_conservation(b);
    forbidden_arcs(b);
    subtour_order(b);
    sequencing(b);
    capacity(b);
}

/// Each affected area is visited at most once, by either a truck or a
/// drone, across the whole fleet.
pub fn visit_once(b: &mut ModelBuilder) {
    let data = b.data;
    for &j in &data.C {
        let mut served = Vec::new();
        for &k in &data.K {
            served.extend(b.vars.arcs_into(data, k, j));
            served.extend(b.vars.sorties_serving(data, k, j));
        }
        b.post(constraint!(sum(&served) <= 1.0));
    }
}

/// At most one departure from and one return to the depot per tandem; an
/// unused tandem simply stays home.
pub fn depot_degree(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        let departures: Vec<_> = data.C.iter().map(|&j| b.vars.x(k, DEPOT, j)).collect();
        let returns: Vec<_> = data.C.iter().map(|&i| b.vars.x(k, i, DEPOT)).collect();
        b.post(constraint!(sum(&departures) <= 1.0));
        b.post(constraint!(sum(&returns) <= 1.0));
    }
}

/// A truck that enters an area leaves it again: incoming and outgoing arc
/// counts balance at every area, the depot counting on both sides.
pub fn flow_conservation(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &j in &data.C {
            let incoming = b.vars.arcs_into(data, k, j);
            let outgoing = b.vars.arcs_out_of(data, k, j);
            b.post(constraint!(sum(&incoming) == sum(&outgoing)));
        }
    }
}

/// No road arc between two cut-off areas, in either direction.
pub fn forbidden_arcs(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &i in &data.C {
            if !data.drone_only(i) {
                continue;
            }
            for &j in &data.C {
                if j == i || !data.drone_only(j) {
                    continue;
                }
                let x = b.vars.x(k, i, j);
                b.post(constraint!(x == 0.0));
            }
        }
    }
}

/// Order-based subtour elimination: a used arc forces the head's visit
/// position above the tail's, and a position is only available to areas
/// with an incoming arc. Cycles that never touch the depot cannot carry a
/// consistent labelling.
pub fn subtour_order(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.order;
    for &k in &data.K {
        for &i in &data.C {
            for &j in &data.C {
                if i == j {
                    continue;
                }
                let u_i = b.vars.order(k, i);
                let u_j = b.vars.order(k, j);
                let x = b.vars.x(k, i, j);
                b.post(bigm::implied_le(x.into(), u_i + 1.0, u_j.into(), m));
            }
        }
        for &j in &data.C {
            let u_j = b.vars.order(k, j);
            let incoming = b.vars.arcs_into(data, k, j);
            b.post(constraint!(u_j <= sum(&incoming) * m));
        }
    }
}

/// Tie the precedence indicator to the visit positions: `precedes(i, j)`
/// holds exactly when `j` takes a later position than `i`.
pub fn sequencing(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.order;
    for &k in &data.K {
        for &i in &data.C {
            for &j in &data.C {
                if i == j {
                    continue;
                }
                let u_i = b.vars.order(k, i);
                let u_j = b.vars.order(k, j);
                let p = b.vars.precedes(k, i, j);
                b.post(constraint!(u_j - u_i <= m * p));
                b.post(constraint!(u_j - u_i >= m * p - m + 1.0));
            }
        }
    }
}

/// Everything a tandem delivers, by road or by air, fits in its truck.
pub fn capacity(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        let mut load = Expression::from(0.0);
        for &j in &data.C {
            let w = data.demand[j] as f64;
            for v in b.vars.arcs_into(data, k, j) {
                load += w * v;
            }
        }
        for (i, j, l) in data.legal_sorties() {
            load += data.demand[j] as f64 * b.vars.sortie(k, i, j, l);
        }
        b.post(constraint!(load <= data.truck_capacity as f64));
    }
}
