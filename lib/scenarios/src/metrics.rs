use num_traits::{AsPrimitive, Num};
use crate::Map;

pub trait Metric {
  const SYM: bool = false;

  fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64;
}

/// Straight-line distance, used for drone flight legs.
pub struct Euclidean();

impl Metric for Euclidean {
  const SYM: bool = true;

  fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64 {
    let a = p1.0.as_() - p2.0.as_();
    let b = p1.1.as_() - p2.1.as_();
    (a * a + b * b).sqrt()
  }
}

/// Grid distance, used for the road network.
pub struct Manhattan();

impl Metric for Manhattan {
  const SYM: bool = true;

  fn compute<T: Num + AsPrimitive<f64>>(p1: (T, T), p2: (T, T)) -> f64 {
    (p1.0.as_() - p2.0.as_()).abs() + (p1.1.as_() - p2.1.as_()).abs()
  }
}

/// Compute the distance matrix for the given coordinates.
#[inline]
#[allow(dead_code)]
pub fn dist_matrix<M, T>(_metric: M, coords: &[(T, T)]) -> Map<(usize, usize), f64>
  where
    M: Metric,
    T: Num + AsPrimitive<f64>
{
  dist_matrix_pp(_metric, coords, |x| x)
}

/// Like [`dist_matrix`], but allows a post-processing function to be supplied.
pub fn dist_matrix_pp<M, T, S>(_metric: M, coords: &[(T, T)], func: impl Fn(f64) -> S) -> Map<(usize, usize), S>
  where
    M: Metric,
    T: Num + AsPrimitive<f64>,
    S: Copy
{
  let mut matrix = Map::default();
  let n = coords.len();
  if M::SYM {
    for i in 0..n {
      let p1 = coords[i];
      for j in (i + 1)..n {
        let p2 = coords[j];
        let d = func(M::compute(p1, p2));
        matrix.insert((i, j), d);
        matrix.insert((j, i), d);
      }
      let d = func(M::compute(p1, p1));
      matrix.insert((i, i), d);
    }
  } else {
    for i in 0..n {
      let p1 = coords[i];
      for j in 0..n {
        let p2 = coords[j];
        let d = func(M::compute(p1, p2));
        matrix.insert((i, j), d);
      }
    }
  }

  matrix
}

/// Travel-time matrix in whole minutes: metric distance divided by `speed`
/// and rounded to the nearest integer.
pub fn time_matrix<M: Metric>(metric: M, coords: &[(f64, f64)], speed: f64) -> Map<(usize, usize), i64> {
  dist_matrix_pp(metric, coords, |d| (d / speed).round() as i64)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn manhattan_on_axis_points() {
    assert_eq!(Manhattan::compute((0.0, 0.0), (3.0, 4.0)), 7.0);
    assert_eq!(Euclidean::compute((0.0, 0.0), (3.0, 4.0)), 5.0);
  }

  #[test]
  fn time_matrix_is_symmetric_with_zero_diagonal() {
    let coords = [(0.0, 0.0), (15.0, 3.0), (4.0, 2.0)];
    let t = time_matrix(Manhattan(), &coords, 1.0);
    for i in 0..coords.len() {
      assert_eq!(t[&(i, i)], 0);
      for j in 0..coords.len() {
        assert_eq!(t[&(i, j)], t[&(j, i)]);
        assert!(t[&(i, j)] >= 0);
      }
    }
    assert_eq!(t[&(0, 1)], 18);
  }

  #[test]
  fn speed_scales_times() {
    let coords = [(0.0, 0.0), (0.0, 3.0)];
    let t = time_matrix(Euclidean(), &coords, 1.5);
    assert_eq!(t[&(0, 1)], 2);
  }
}
