use good_lp::{constraint, Expression};

use crate::data::Instance;
use super::ModelBuilder;
use super::vars::Vars;

pub fn post(b: &mut ModelBuilder) {
    lateness(b);
}

/// Lateness of each area against its deadline: at least the truck's
/// overage, at least the drone's, and never negative (domain). The
/// objective prices it, so any feasible optimum drives it down to the
/// larger of the two.
pub fn lateness(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &i in &data.C {
            let due = data.deadline[&i] as f64;
            let delay = b.vars.delay(k, i);
            let a = b.vars.truck_arrival(k, i);
            let ap = b.vars.drone_arrival(k, i);
            b.post(constraint!(delay >= a - due));
            b.post(constraint!(delay >= ap - due));
        }
    }
}

/// The scalar to minimise: road travel cost, flight cost, delay
/// penalties, and a penalty for every area no mode serves. The serving
/// sums are the same ones the visit-once rows cap at one, so the
/// unserved term of each area is 0 or 1 times its penalty.
pub fn total_cost(data: &Instance, vars: &Vars) -> Expression {
    let mut cost = Expression::from(0.0);

    for (&(_, i, j), &x) in &vars.x {
        cost += data.truck_time[[i, j]] as f64 * data.truck_cost * x;
    }

    for &k in &data.K {
        for (i, j, l) in data.legal_sorties() {
            let flight = (data.drone_time[[i, j]] + data.drone_time[[j, l]]) as f64;
            cost += flight * data.drone_cost * vars.sortie(k, i, j, l);
        }
    }

    for (&(_, i), &d) in &vars.delay {
        cost += data.delay_penalty[&i] * d;
    }

    for &i in &data.C {
        let penalty = data.unserved_penalty[&i];
        cost += penalty;
        for &k in &data.K {
            for v in vars.arcs_into(data, k, i) {
                cost += -penalty * v;
            }
            for v in vars.sorties_serving(data, k, i) {
                cost += -penalty * v;
            }
        }
    }

    return cost;
}
