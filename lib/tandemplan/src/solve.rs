use std::fmt;
use std::sync::mpsc;
use std::time::Duration;

use good_lp::{ResolutionError, Solution, Variable};
use tracing::*;

use crate::Map;
use crate::data::{Node, Tandem, Time};
use crate::model::vars::Vars;

/// What the solver reported. `Feasible` is reserved for backends that can
/// hand back an incumbent without an optimality proof; the bundled
/// backend always proves its answer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Optimal => "OPTIMAL",
            Status::Feasible => "FEASIBLE",
            Status::Infeasible => "INFEASIBLE",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SolveParams {
    /// Wall-clock budget for the search. `None` lets the solver run to a
    /// proof.
    pub time_limit: Option<Duration>,
}

/// Values of every variable family in a solved model.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    pub truck_arcs: Map<(Tandem, Node, Node), bool>,
    pub visit_order: Map<(Tandem, Node), i64>,
    pub flights: Map<(Tandem, Node, Node, Node), bool>,
    pub precedence: Map<(Tandem, Node, Node), bool>,
    pub truck_arrival: Map<(Tandem, Node), Time>,
    pub drone_arrival: Map<(Tandem, Node), Time>,
    pub delay: Map<(Tandem, Node), Time>,
}

impl Assignment {
    pub fn read(vars: &Vars, sol: &impl Solution) -> Assignment {
        let active = |v: Variable| sol.value(v) > 0.5;
        let int = |v: Variable| sol.value(v).round() as i64;
        Assignment {
            truck_arcs: vars.x.iter().map(|(&key, &v)| (key, active(v))).collect(),
            visit_order: vars.order.iter().map(|(&key, &v)| (key, int(v))).collect(),
            flights: vars.sortie.iter().map(|(&key, &v)| (key, active(v))).collect(),
            precedence: vars.precedes.iter().map(|(&key, &v)| (key, active(v))).collect(),
            truck_arrival: vars.truck_arrival.iter().map(|(&key, &v)| (key, int(v))).collect(),
            drone_arrival: vars.drone_arrival.iter().map(|(&key, &v)| (key, int(v))).collect(),
            delay: vars.delay.iter().map(|(&key, &v)| (key, int(v))).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Outcome {
    pub status: Status,
    pub assignment: Option<Assignment>,
}

/// Run the prepared solve closure, optionally on a worker thread under a
/// wall-clock budget. A budget that expires before any verdict maps to
/// `Unknown`; it is never reported as infeasibility.
pub(crate) fn execute<F>(run: F, params: &SolveParams) -> Outcome
where
    F: FnOnce() -> Result<Assignment, ResolutionError> + Send + 'static,
{
    let result = match params.time_limit {
        None => run(),
        Some(limit) => {
            let (tx, rx) = mpsc::channel();
            std::thread::spawn(move || {
                let _ = tx.send(run());
            });
            match rx.recv_timeout(limit) {
                Ok(r) => r,
                Err(_) => {
                    warn!(budget_secs = limit.as_secs_f64(), "time budget exhausted before any verdict");
                    return Outcome { status: Status::Unknown, assignment: None };
                }
            }
        }
    };

    match result {
        Ok(assignment) => {
            debug!("solver proved optimality");
            Outcome { status: Status::Optimal, assignment: Some(assignment) }
        }
        Err(ResolutionError::Infeasible) => Outcome { status: Status::Infeasible, assignment: None },
        Err(e) => {
            warn!(error = %e, "solver gave no verdict");
            Outcome { status: Status::Unknown, assignment: None }
        }
    }
}
