use good_lp::{constraint, Constraint, Expression};

use crate::data::Instance;

/// `lhs <= rhs`, enforced only while `guard` evaluates to 1.
///
/// `guard` must be a 0/1 expression (a single indicator or a sum capped at
/// one elsewhere in the model) and `slack` must be at least the largest
/// value `lhs - rhs` can take over the variable domains, so the inequality
/// is vacuous whenever the guard is 0.
pub fn implied_le(guard: Expression, lhs: Expression, rhs: Expression, slack: f64) -> Constraint {
    constraint!(lhs <= rhs + (Expression::from(1.0) - guard) * slack)
}

/// `lhs <= rhs`, enforced only while every guard in `guards` evaluates to 1.
/// One missing guard relaxes the row by `slack`, two by `2 * slack`, and
/// so on.
pub fn implied_le_all(guards: Vec<Expression>, lhs: Expression, rhs: Expression, slack: f64) -> Constraint {
    let count = guards.len() as f64;
    let active = guards
        .into_iter()
        .fold(Expression::from(0.0), |acc, g| acc + g);
    constraint!(lhs <= rhs + (Expression::from(count) - active) * slack)
}

/// Slack magnitudes for the guarded rows, one per constraint family,
/// derived from the instance rather than guessed. Each bounds the largest
/// violation its family can reach:
///
/// * `order` — visit positions live in `[0, n]`, and a valid labelling
///   never opens a gap beyond `n`;
/// * `clock` — both sides of every synchronization and sequencing row lie
///   in `[0, horizon]`;
/// * `truck_leg` / `drone_leg` — an arrival plus one travel leg against an
///   arrival at zero;
/// * `flight` — the longest legal two-leg sortie, used by the endurance
///   rows.
#[derive(Debug, Copy, Clone)]
pub struct BigM {
    pub order: f64,
    pub clock: f64,
    pub truck_leg: f64,
    pub drone_leg: f64,
    pub flight: f64,
}

impl BigM {
    pub fn for_instance(data: &Instance) -> BigM {
        let horizon = data.horizon as f64;
        let max_truck = data.truck_time.iter().copied().max().unwrap_or(0) as f64;
        let max_drone = data.drone_time.iter().copied().max().unwrap_or(0) as f64;
        let flight = data
            .legal_sorties()
            .map(|(i, j, l)| data.drone_time[[i, j]] + data.drone_time[[j, l]])
            .max()
            .unwrap_or(0) as f64;
        return BigM {
            order: data.n as f64,
            clock: horizon,
            truck_leg: horizon + max_truck,
            drone_leg: horizon + max_drone,
            flight,
        };
    }
}
