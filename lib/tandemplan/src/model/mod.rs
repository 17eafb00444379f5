use good_lp::{constraint, default_solver, Constraint, ProblemVariables, SolverModel, Variable, variables};
use tracing::*;

use crate::data::Instance;
use crate::solve::{self, Assignment, Outcome, SolveParams};

pub mod bigm;
pub mod vars;

pub mod objective;
pub mod routing;
pub mod sortie;
pub mod timing;

use vars::Vars;

/// Owns everything the model accumulates while it is being put together:
/// the variable pool, the sparse variable maps, the slack magnitudes and
/// the constraint rows posted so far. Constraint-family functions take the
/// builder by `&mut`, so the posting order is whatever the caller writes
/// down; `solve` consumes the builder, after which nothing can be added.
pub struct ModelBuilder<'a> {
    pub data: &'a Instance,
    pub big_m: bigm::BigM,
    pub vars: Vars,
    pool: ProblemVariables,
    constraints: Vec<Constraint>,
}

impl<'a> ModelBuilder<'a> {
    #[instrument(level = "debug", skip(data), fields(id = %data.id))]
    pub fn new(data: &'a Instance) -> ModelBuilder<'a> {
        let mut pool = variables!();
        let mut constraints = Vec::new();
        let vars = Vars::build(data, &mut pool, &mut constraints);
        let big_m = bigm::BigM::for_instance(data);
        debug!(linking_rows = constraints.len(), "variables created");
        ModelBuilder { data, big_m, vars, pool, constraints }
    }

    pub fn post(&mut self, c: Constraint) {
        self.constraints.push(c);
    }

    /// Pin a variable to a value; the per-family test harnesses drive
    /// scenarios through this.
    pub fn fix(&mut self, v: Variable, value: f64) {
        self.post(constraint!(v == value));
    }

    /// Post every constraint family.
    pub fn post_all(&mut self) {
        routing::post(self);
        sortie::post(self);
        timing::post(self);
        objective::post(self);
        info!(rows = self.constraints.len(), "model assembled");
    }

    /// Hand the model to the solver. The builder is consumed: the model is
    /// immutable from here on.
    pub fn solve(self, params: &SolveParams) -> Outcome {
        let ModelBuilder { data, vars, pool, constraints, .. } = self;
        let cost = objective::total_cost(data, &vars);
        let mut problem = pool.minimise(cost).using(default_solver);
        for c in constraints {
            problem = problem.with(c);
        }
        let run = move || problem.solve().map(|sol| Assignment::read(&vars, &sol));
        return solve::execute(run, params);
    }
}




#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::*;
    use crate::data::*;
    use crate::init_test_logging;
    use crate::report;
    use crate::solve::{SolveParams, Status};
    use scenarios::builtin;

    /// One road-served area, one cut-off area, one tandem: the truck
    /// drives to area 1 while the drone serves area 2 and meets it there.
    #[test]
    fn small_scenario_serves_everyone() {
        init_test_logging(None::<&str>);
        let data = line(2, &[2]);
        let mut b = ModelBuilder::new(&data);
        b.post_all();
        let outcome = b.solve(&SolveParams::default());
        assert_eq!(outcome.status, Status::Optimal);

        let asn = outcome.assignment.unwrap();
        let plan = report::extract(&data, &asn);
        assert_eq!(plan.breakdown.unserved, 0.0);
        assert!(plan.breakdown.travel > 0.0);
        assert!(plan.unserved.is_empty());
    }

    #[test]
    fn reference_scenario_is_optimal() {
        init_test_logging(None::<&str>);
        let data = Instance::from_scenario(&builtin::reference()).unwrap();
        let mut b = ModelBuilder::new(&data);
        b.post_all();
        let outcome = b.solve(&SolveParams::default());
        assert_eq!(outcome.status, Status::Optimal);

        let asn = outcome.assignment.unwrap();

        // every area served exactly once, by one mode
        for &j in &data.C {
            let truck_visits = asn.truck_arcs.iter()
                .filter(|(&(_, _, to), &on)| on && to == j)
                .count();
            let drone_visits = asn.flights.iter()
                .filter(|(&(_, _, serve, _), &on)| on && serve == j)
                .count();
            assert!(truck_visits + drone_visits <= 1, "area {} served twice", j);
        }

        // depot degrees
        for &k in &data.K {
            let out = asn.truck_arcs.iter()
                .filter(|(&(kk, from, _), &on)| on && kk == k && from == DEPOT)
                .count();
            let back = asn.truck_arcs.iter()
                .filter(|(&(kk, _, to), &on)| on && kk == k && to == DEPOT)
                .count();
            assert!(out <= 1 && back <= 1);
        }

        // no road arc between two cut-off areas
        for (&(_, i, j), &on) in &asn.truck_arcs {
            assert!(!(on && data.drone_only(i) && data.drone_only(j)));
        }

        // flights only fly legal sorties, within endurance
        for (&(_, i, j, l), &on) in &asn.flights {
            if on {
                assert!(data.sortie_ok(i, j, l));
                assert!(data.drone_time[[i, j]] + data.drone_time[[j, l]] <= data.endurance);
            }
        }

        let plan = report::extract(&data, &asn);
        assert_eq!(plan.breakdown.unserved, 0.0, "all areas should be worth serving");
        assert!(plan.breakdown.travel > 0.0);
        assert!(plan.unserved.is_empty());
    }
}
