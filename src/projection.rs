
use crate::error::{AnchorError, Result};
use log::debug;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::RandomExt;
use rand::distributions::Distribution;
use rand::{thread_rng, Rng};


/// Sparse sign distribution from Achlioptas (2001): -1 and +1 with probability 1/6 each, 0 otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct Achlioptas;

impl Distribution<f64> for Achlioptas {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match rng.gen_range(0..6) {
            0 => -1.0,
            5 => 1.0,
            _ => 0.0,
        }
    }
}

/// Builds the d x k projection matrix, scaled by sqrt(3) so every entry has unit second moment.
pub fn projection_matrix<R: Rng + ?Sized>(original_dim: usize, target_dim: usize, rng: &mut R) -> Array2<f64> {
    Array2::random_using((original_dim, target_dim), Achlioptas, rng) * 3f64.sqrt()
}

/// Randomly reduces the n x d matrix `a` to n x `target_dim`.
///
/// Squared distances between rows are preserved in expectation up to a factor of `target_dim`:
/// `E[|aR - bR|^2] = target_dim * |a - b|^2`. `a` is left untouched.
pub fn project<S, R>(a: &ArrayBase<S, Ix2>, target_dim: usize, rng: &mut R) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
    R: Rng + ?Sized,
{
    if target_dim == 0 {
        return Err(AnchorError::InvalidProjection { target_dim });
    }

    let (n_rows, n_cols) = a.dim();
    debug!("projecting {} x {} matrix onto {} dimensions", n_rows, n_cols, target_dim);

    let r = projection_matrix(n_cols, target_dim, rng);
    Ok(a.dot(&r))
}

/// [`project`] drawing from the thread-local random source.
pub fn project_thread_rng<S>(a: &ArrayBase<S, Ix2>, target_dim: usize) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    project(a, target_dim, &mut thread_rng())
}
