use good_lp::{constraint, Expression};

use crate::data::DEPOT;
use super::ModelBuilder;
use super::bigm;
use super::vars::sum;

pub fn post(b: &mut ModelBuilder) {
    validity(b);
    launch_once(b);
    rendezvous_once(b);
    truck_support(b);
    depot_rendezvous_support(b);
    endurance(b);
}

/// Restate sortie legality as explicit rows: a sortie whose three nodes
/// collide, or whose service node the road still reaches, never flies.
/// The variables are already born zero-fixed; these rows keep the rule
/// part of the model itself.
pub fn validity(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &i in &data.VL {
            for &j in &data.C {
                for &l in &data.VR {
                    if !data.sortie_ok(i, j, l) {
                        let y = b.vars.sortie(k, i, j, l);
                        b.post(constraint!(y == 0.0));
                    }
                }
            }
        }
    }
}

/// A drone is launched at most once from any node.
pub fn launch_once(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &i in &data.VL {
            let trips = b.vars.sorties_launching_at(data, k, i);
            if !trips.is_empty() {
                b.post(constraint!(sum(&trips) <= 1.0));
            }
        }
    }
}

/// A drone is recovered at most once at any node.
pub fn rendezvous_once(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &l in &data.VR {
            let trips = b.vars.sorties_meeting_at(data, k, l);
            if !trips.is_empty() {
                b.post(constraint!(sum(&trips) <= 1.0));
            }
        }
    }
}

/// A sortie needs its truck on both ends: leaving the launch node and
/// entering the rendezvous node. The combined row forces both at once.
pub fn truck_support(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for (i, j, l) in data.legal_sorties() {
            let y = b.vars.sortie(k, i, j, l);
            let leave = sum(&b.vars.arcs_out_of(data, k, i));
            let enter = sum(&b.vars.arcs_into(data, k, l));
            b.post(constraint!(y <= leave.clone()));
            b.post(constraint!(y <= enter.clone()));
            b.post(constraint!(2.0 * y <= leave + enter));
        }
    }
}

/// A sortie launched straight from the depot still needs the truck to
/// drive into the rendezvous node from somewhere other than the service
/// node.
pub fn depot_rendezvous_support(b: &mut ModelBuilder) {
    let data = b.data;
    for &k in &data.K {
        for &j in &data.C {
            for &l in &data.VR {
                if j == l {
                    continue;
                }
                let y = b.vars.sortie(k, DEPOT, j, l);
                let support: Vec<_> = data
                    .nodes()
                    .filter(|&i| i != j && i != l)
                    .map(|i| b.vars.x(k, i, l))
                    .collect();
                b.post(constraint!(y <= sum(&support)));
            }
        }
    }
}

/// Both flight legs of an active sortie fit within the drone's endurance.
pub fn endurance(b: &mut ModelBuilder) {
    let data = b.data;
    let m = b.big_m.flight;
    let e = data.endurance as f64;
    for &k in &data.K {
        for (i, j, l) in data.legal_sorties() {
            let y = b.vars.sortie(k, i, j, l);
            let flight = (data.drone_time[[i, j]] + data.drone_time[[j, l]]) as f64;
            b.post(bigm::implied_le(y.into(), Expression::from(flight), Expression::from(e), m));
        }
    }
}


#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use proptest::prelude::*;

    use super::*;
    use crate::model::ModelBuilder;
    use crate::model::testing::*;
    use crate::solve::Status;

    #[test]
    fn legal_sorties_may_fly() {
        let data = line(3, &[2]);
        let mut b = ModelBuilder::new(&data);
        validity(&mut b);
        let y = b.vars.sortie(0, 0, 2, 3);
        b.fix(y, 1.0);
        assert_eq!(status_of(b), Status::Optimal);
    }

    #[test]
    fn road_served_area_cannot_be_flown() {
        let data = line(3, &[2]);
        let mut b = ModelBuilder::new(&data);
        validity(&mut b);
        let y = b.vars.sortie(0, 0, 1, 3); // area 1 is road-served
        b.fix(y, 1.0);
        assert_eq!(status_of(b), Status::Infeasible);
    }

    #[test]
    fn colliding_nodes_cannot_fly() {
        for &(i, j, l) in &[(2, 2, 3), (3, 2, 3), (1, 2, 1)] {
            let data = line(3, &[2]);
            let mut b = ModelBuilder::new(&data);
            validity(&mut b);
            let y = b.vars.sortie(0, i, j, l);
            b.fix(y, 1.0);
            assert_eq!(status_of(b), Status::Infeasible);
        }
    }

    #[test]
    #[should_panic(expected = "undeclared sortie variable")]
    fn undeclared_sortie_lookup_fails_loudly() {
        let data = line(3, &[2]);
        let b = ModelBuilder::new(&data);
        b.vars.sortie(0, 0, 0, 1); // the depot is not a service node
    }

    #[test]
    fn one_launch_per_node() {
        let data = line(4, &[2, 3]);
        let mut b = ModelBuilder::new(&data);
        launch_once(&mut b);
        let y1 = b.vars.sortie(0, 0, 2, 1);
        let y2 = b.vars.sortie(0, 0, 3, 4);
        b.fix(y1, 1.0);
        b.fix(y2, 1.0);
        assert_eq!(status_of(b), Status::Infeasible);

        let mut b = ModelBuilder::new(&data);
        launch_once(&mut b);
        let y1 = b.vars.sortie(0, 0, 2, 1);
        b.fix(y1, 1.0);
        assert_eq!(status_of(b), Status::Optimal);
    }

    #[test]
    fn one_rendezvous_per_node() {
        let data = line(4, &[2, 3]);
        let mut b = ModelBuilder::new(&data);
        rendezvous_once(&mut b);
        let y1 = b.vars.sortie(0, 0, 2, 1);
        let y2 = b.vars.sortie(0, 4, 3, 1);
        b.fix(y1, 1.0);
        b.fix(y2, 1.0);
        assert_eq!(status_of(b), Status::Infeasible);
    }

    #[test]
    fn sortie_needs_truck_on_both_ends() {
        let cases: &[(&[(usize, usize)], f64, Status)] = &[
            (&[(1, 2), (2, 3)], 1.0, Status::Optimal),
            (&[(1, 3)], 1.0, Status::Optimal),
            (&[(1, 2)], 1.0, Status::Infeasible), // leaves 1, never enters 3
            (&[(2, 3)], 1.0, Status::Infeasible), // enters 3, never leaves 1
            (&[], 1.0, Status::Infeasible),
            (&[], 0.0, Status::Optimal),
        ];
        for &(arcs, y_val, expected) in cases {
            let data = line(3, &[2]);
            let mut b = ModelBuilder::new(&data);
            truck_support(&mut b);
            let y = b.vars.sortie(0, 1, 2, 3);
            b.fix(y, y_val);
            pin_arcs(&mut b, 0, arcs);
            assert_eq!(status_of(b), expected);
        }
    }

    #[test]
    fn depot_launch_needs_an_arc_into_the_meeting_point() {
        let cases: &[(&[(usize, usize)], f64, Status)] = &[
            (&[(1, 3)], 1.0, Status::Optimal),
            (&[(2, 3)], 1.0, Status::Infeasible), // only from the service node
            (&[], 1.0, Status::Infeasible),
            (&[], 0.0, Status::Optimal),
        ];
        for &(arcs, y_val, expected) in cases {
            let data = line(3, &[2]);
            let mut b = ModelBuilder::new(&data);
            depot_rendezvous_support(&mut b);
            let y = b.vars.sortie(0, 0, 2, 3);
            b.fix(y, y_val);
            pin_arcs(&mut b, 0, arcs);
            assert_eq!(status_of(b), expected);
        }
    }

    fn endurance_fixture(leg1: i64, leg2: i64, e: i64) -> crate::data::Instance {
        let mut drone = Array2::zeros((3, 3));
        drone[[0, 1]] = leg1;
        drone[[1, 0]] = leg1;
        drone[[1, 2]] = leg2;
        drone[[2, 1]] = leg2;
        instance_with_times(Array2::zeros((3, 3)), drone, &[1], 1000, e)
    }

    #[test]
    fn flight_within_endurance() {
        let data = endurance_fixture(3, 4, 10);
        let mut b = ModelBuilder::new(&data);
        endurance(&mut b);
        let y = b.vars.sortie(0, 0, 1, 2);
        b.fix(y, 1.0);
        assert_eq!(status_of(b), Status::Optimal);
    }

    #[test]
    fn flight_beyond_endurance() {
        let data = endurance_fixture(6, 7, 10);
        let mut b = ModelBuilder::new(&data);
        endurance(&mut b);
        let y = b.vars.sortie(0, 0, 1, 2);
        b.fix(y, 1.0);
        assert_eq!(status_of(b), Status::Infeasible);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10))]
        #[test]
        /// A grounded sortie never trips the endurance rows, however long
        /// its legs would be.
        fn endurance_vacuous_when_grounded(leg1 in 0i64..200, leg2 in 0i64..200) {
            let data = endurance_fixture(leg1, leg2, 10);
            let mut b = ModelBuilder::new(&data);
            endurance(&mut b);
            let y = b.vars.sortie(0, 0, 1, 2);
            b.fix(y, 0.0);
            prop_assert_eq!(status_of(b), Status::Optimal);
        }
    }
}
