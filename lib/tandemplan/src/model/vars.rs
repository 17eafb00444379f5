use good_lp::{constraint, Constraint, Expression, ProblemVariables, Variable, variable};

use crate::Map;
use crate::data::{Instance, Node, Tandem};

/// Sum a list of indicator variables into an expression.
pub fn sum(vars: &[Variable]) -> Expression {
    vars.iter().fold(Expression::from(0.0), |acc, &v| acc + v)
}

/// All decision-variable families, keyed by composite tuples. Lookups go
/// through the accessor methods, which panic on undeclared keys rather
/// than ever inventing a variable.
pub struct Vars {
    pub x: Map<(Tandem, Node, Node), Variable>,
    pub visit: Map<(Tandem, Node), Variable>,
    pub order: Map<(Tandem, Node), Variable>,
    pub sortie: Map<(Tandem, Node, Node, Node), Variable>,
    pub precedes: Map<(Tandem, Node, Node), Variable>,
    pub truck_arrival: Map<(Tandem, Node), Variable>,
    pub drone_arrival: Map<(Tandem, Node), Variable>,
    pub delay: Map<(Tandem, Node), Variable>,
}

impl Vars {
    /// Create every family over its index set. Sortie combinations that
    /// can never fly (launch, service and rendezvous not pairwise
    /// distinct, or a road-served service node) are created with a zero
    /// domain, so no later family has to re-derive legality to keep them
    /// out of its sums. Visit positions are tied to their activation
    /// indicator here as well.
    pub fn build(data: &Instance, pool: &mut ProblemVariables, linking: &mut Vec<Constraint>) -> Vars {
        let n = data.n as f64;
        let horizon = data.horizon as f64;

        let mut x = Map::default();
        for &k in &data.K {
            for i in data.nodes() {
                for j in data.nodes() {
                    if i != j {
                        let v = pool.add(variable().binary().name(format!("x_{}_{}_{}", k, i, j)));
                        x.insert((k, i, j), v);
                    }
                }
            }
        }

        let mut visit = Map::default();
        let mut order = Map::default();
        for &k in &data.K {
            for &i in &data.C {
                let y = pool.add(variable().binary().name(format!("visit_{}_{}", k, i)));
                let u = pool.add(variable().integer().min(0.0).max(n).name(format!("order_{}_{}", k, i)));
                linking.push(constraint!(u >= y));
                linking.push(constraint!(u <= n * y));
                visit.insert((k, i), y);
                order.insert((k, i), u);
            }
        }

        let mut sortie = Map::default();
        for &k in &data.K {
            for &i in &data.VL {
                for &j in &data.C {
                    for &l in &data.VR {
                        let def = if data.sortie_ok(i, j, l) {
                            variable().binary()
                        } else {
                            variable().integer().min(0.0).max(0.0)
                        };
                        let v = pool.add(def.name(format!("sortie_{}_{}_{}_{}", k, i, j, l)));
                        sortie.insert((k, i, j, l), v);
                    }
                }
            }
        }

        let mut precedes = Map::default();
        for &k in &data.K {
            for &i in &data.C {
                for &j in &data.C {
                    if i != j {
                        let v = pool.add(variable().binary().name(format!("precedes_{}_{}_{}", k, i, j)));
                        precedes.insert((k, i, j), v);
                    }
                }
            }
        }

        let mut truck_arrival = Map::default();
        let mut drone_arrival = Map::default();
        for &k in &data.K {
            for i in data.nodes() {
                let a = pool.add(variable().integer().min(0.0).max(horizon).name(format!("arrive_{}_{}", k, i)));
                let ap = pool.add(variable().integer().min(0.0).max(horizon).name(format!("fly_arrive_{}_{}", k, i)));
                truck_arrival.insert((k, i), a);
                drone_arrival.insert((k, i), ap);
            }
        }

        let mut delay = Map::default();
        for &k in &data.K {
            for &i in &data.C {
                let v = pool.add(variable().integer().min(0.0).max(horizon).name(format!("delay_{}_{}", k, i)));
                delay.insert((k, i), v);
            }
        }

        return Vars { x, visit, order, sortie, precedes, truck_arrival, drone_arrival, delay };
    }

    pub fn x(&self, k: Tandem, i: Node, j: Node) -> Variable {
        *self.x.get(&(k, i, j))
            .unwrap_or_else(|| panic!("undeclared truck arc variable ({}, {} -> {})", k, i, j))
    }

    pub fn visit(&self, k: Tandem, i: Node) -> Variable {
        *self.visit.get(&(k, i))
            .unwrap_or_else(|| panic!("undeclared visit variable ({}, {})", k, i))
    }

    pub fn order(&self, k: Tandem, i: Node) -> Variable {
        *self.order.get(&(k, i))
            .unwrap_or_else(|| panic!("undeclared visit-order variable ({}, {})", k, i))
    }

    pub fn sortie(&self, k: Tandem, i: Node, j: Node, l: Node) -> Variable {
        *self.sortie.get(&(k, i, j, l))
            .unwrap_or_else(|| panic!("undeclared sortie variable ({}, {} -> {} -> {})", k, i, j, l))
    }

    pub fn precedes(&self, k: Tandem, i: Node, j: Node) -> Variable {
        *self.precedes.get(&(k, i, j))
            .unwrap_or_else(|| panic!("undeclared precedence variable ({}, {} before {})", k, i, j))
    }

    pub fn truck_arrival(&self, k: Tandem, i: Node) -> Variable {
        *self.truck_arrival.get(&(k, i))
            .unwrap_or_else(|| panic!("undeclared truck arrival variable ({}, {})", k, i))
    }

    pub fn drone_arrival(&self, k: Tandem, i: Node) -> Variable {
        *self.drone_arrival.get(&(k, i))
            .unwrap_or_else(|| panic!("undeclared drone arrival variable ({}, {})", k, i))
    }

    pub fn delay(&self, k: Tandem, i: Node) -> Variable {
        *self.delay.get(&(k, i))
            .unwrap_or_else(|| panic!("undeclared delay variable ({}, {})", k, i))
    }

    pub fn arcs_into(&self, data: &Instance, k: Tandem, j: Node) -> Vec<Variable> {
        data.nodes().filter(|&i| i != j).map(|i| self.x(k, i, j)).collect()
    }

    pub fn arcs_out_of(&self, data: &Instance, k: Tandem, i: Node) -> Vec<Variable> {
        data.nodes().filter(|&j| j != i).map(|j| self.x(k, i, j)).collect()
    }

    /// Legal sorties of tandem `k` launching at `i`.
    pub fn sorties_launching_at(&self, data: &Instance, k: Tandem, i: Node) -> Vec<Variable> {
        let mut trips = Vec::new();
        for &j in &data.C {
            for &l in &data.VR {
                if data.sortie_ok(i, j, l) {
                    trips.push(self.sortie(k, i, j, l));
                }
            }
        }
        return trips;
    }

    /// Legal sorties of tandem `k` rejoining the truck at `l`.
    pub fn sorties_meeting_at(&self, data: &Instance, k: Tandem, l: Node) -> Vec<Variable> {
        let mut trips = Vec::new();
        for &i in &data.VL {
            for &j in &data.C {
                if data.sortie_ok(i, j, l) {
                    trips.push(self.sortie(k, i, j, l));
                }
            }
        }
        return trips;
    }

    /// Legal sorties of tandem `k` serving area `j`.
    pub fn sorties_serving(&self, data: &Instance, k: Tandem, j: Node) -> Vec<Variable> {
        let mut trips = Vec::new();
        for &i in &data.VL {
            for &l in &data.VR {
                if data.sortie_ok(i, j, l) {
                    trips.push(self.sortie(k, i, j, l));
                }
            }
        }
        return trips;
    }

    /// Legal sorties flying the outbound leg `i -> j`, any rendezvous.
    pub fn first_legs(&self, data: &Instance, k: Tandem, i: Node, j: Node) -> Vec<Variable> {
        data.VR.iter()
            .filter(|&&l| data.sortie_ok(i, j, l))
            .map(|&l| self.sortie(k, i, j, l))
            .collect()
    }

    /// Legal sorties flying the return leg `j -> l`, any launch.
    pub fn second_legs(&self, data: &Instance, k: Tandem, j: Node, l: Node) -> Vec<Variable> {
        data.VL.iter()
            .filter(|&&i| data.sortie_ok(i, j, l))
            .map(|&i| self.sortie(k, i, j, l))
            .collect()
    }

    /// Legal sorties launching at `i` and rejoining at `l`, any service.
    pub fn sorties_spanning(&self, data: &Instance, k: Tandem, i: Node, l: Node) -> Vec<Variable> {
        data.C.iter()
            .filter(|&&j| data.sortie_ok(i, j, l))
            .map(|&j| self.sortie(k, i, j, l))
            .collect()
    }
}
