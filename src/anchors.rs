
// imports
use crate::error::{AnchorError, Result};
use crate::frequency::DocumentFrequency;
use crate::projection;

use log::{debug, info, trace, warn};
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};
use ndarray_stats::QuantileExt;
use rand::Rng;


/// The anchors chosen by [`GramSchmidt`]: row ids in selection order and the matching rows of the
/// input matrix, untouched by normalization or projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchors {
    indices: Vec<usize>,
    vectors: Array2<f64>,
}

impl Anchors {

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn vectors(&self) -> &Array2<f64> {
        &self.vectors
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn into_parts(self) -> (Vec<usize>, Array2<f64>) {
        (self.indices, self.vectors)
    }

    /// One single-token list per anchor, the same shape multiword anchors are built from.
    pub fn tokens(&self, vocab: &[String]) -> Result<Vec<Vec<String>>> {
        self.indices.iter().map(|i| {
            match vocab.get(*i) {
                Some(token) => Ok(vec![token.to_owned()]),
                None => Err(AnchorError::TypeOutOfRange { id: *i, rows: vocab.len() })
            }
        }).collect()
    }

}


/// Stabilized Gram-Schmidt anchor search parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GramSchmidt {
    k: usize,
    doc_threshold: usize,
    project_dim: Option<usize>,
}

impl GramSchmidt {

    /// `project_dim` of `None` or `Some(0)` searches the row-normalized matrix without projection.
    pub fn new(k: usize, doc_threshold: usize, project_dim: Option<usize>) -> Result<GramSchmidt> {
        if k < 2 {
            return Err(AnchorError::InvalidK { k });
        }
        Ok(Self {
            k,
            doc_threshold,
            project_dim: project_dim.filter(|p| *p > 0),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn doc_threshold(&self) -> usize {
        self.doc_threshold
    }

    pub fn project_dim(&self) -> Option<usize> {
        self.project_dim
    }

    /// Counts document frequencies over `documents` and selects anchors among the rows of `q`.
    pub fn select<D, S, R>(&self, documents: &[D], q: &ArrayBase<S, Ix2>, rng: &mut R) -> Result<Anchors>
    where
        D: AsRef<[usize]>,
        S: Data<Elem = f64>,
        R: Rng + ?Sized,
    {
        let frequency = DocumentFrequency::count(documents);
        self.select_with_frequency(&frequency, q, rng)
    }

    /// Like [`GramSchmidt::select`] with document frequencies computed by the caller.
    pub fn select_with_frequency<S, R>(&self, frequency: &DocumentFrequency, q: &ArrayBase<S, Ix2>, rng: &mut R) -> Result<Anchors>
    where
        S: Data<Elem = f64>,
        R: Rng + ?Sized,
    {
        let candidates = frequency.candidates(self.doc_threshold);
        info!("{} candidate rows appear in more than {} documents", candidates.len(), self.doc_threshold);

        if candidates.len() < self.k {
            return Err(AnchorError::InsufficientCandidates { found: candidates.len(), required: self.k });
        }
        let rows = q.nrows();
        if let Some(id) = candidates.iter().find(|id| **id >= rows) {
            return Err(AnchorError::TypeOutOfRange { id: *id, rows });
        }

        // the working copy only holds candidate rows, q itself is never written to
        let mut working = GramSchmidt::normalized_rows(q, &candidates)?;
        if let Some(project_dim) = self.project_dim {
            working = projection::project(&working, project_dim, rng)?;
        }

        let (local, _) = GramSchmidt::search(working, self.k)?;
        let indices: Vec<usize> = local.iter().map(|i| candidates[*i]).collect();
        info!("selected anchors {:?}", indices);

        let vectors = q.select(Axis(0), &indices);
        Ok(Anchors { indices, vectors })
    }

    fn normalized_rows<S>(q: &ArrayBase<S, Ix2>, candidates: &[usize]) -> Result<Array2<f64>>
    where
        S: Data<Elem = f64>,
    {
        // each candidate row is divided by its sum so that it becomes a distribution over columns
        let mut working = q.select(Axis(0), candidates);
        for (local, mut row) in working.axis_iter_mut(Axis(0)).enumerate() {
            let total = row.sum();
            if total == 0.0 || !total.is_finite() {
                return Err(AnchorError::DegenerateRow { row: candidates[local] });
            }
            row.mapv_inplace(|x| x / total);
        }
        Ok(working)
    }

    fn farthest(distances: &mut Array1<f64>, selected: &[bool], anchor: usize) -> Result<(usize, f64)> {

        // rows already chosen never win again, argmax keeps the first maximum it meets
        for (i, taken) in selected.iter().enumerate() {
            if *taken {
                distances[i] = f64::NEG_INFINITY;
            }
        }
        let best = distances.argmax().map_err(|_| AnchorError::NonFiniteDistance { anchor })?;
        Ok((best, distances[best]))
    }

    fn unit(row: ArrayView1<f64>, norm: f64, anchor: usize) -> Array1<f64> {
        if norm > 0.0 {
            &row / norm
        } else {
            warn!("residual subspace exhausted at anchor {}, keeping a zero basis row", anchor);
            Array1::zeros(row.len())
        }
    }

    /// Runs the farthest-point search over the rows of `working` and returns the chosen row
    /// positions in selection order together with the basis built along the way.
    pub(crate) fn search(mut working: Array2<f64>, k: usize) -> Result<(Vec<usize>, Array2<f64>)> {

        let (n_rows, dim) = working.dim();
        if k < 2 {
            return Err(AnchorError::InvalidK { k });
        }
        if n_rows < k {
            return Err(AnchorError::InsufficientCandidates { found: n_rows, required: k });
        }

        let mut indices: Vec<usize> = Vec::with_capacity(k);
        let mut selected = vec![false; n_rows];
        let mut basis: Array2<f64> = Array2::zeros((k - 1, dim));

        // farthest point from the origin
        let mut norms = working.map_axis(Axis(1), |row| row.dot(&row).sqrt());
        let (first, max_dist) = GramSchmidt::farthest(&mut norms, &selected, 0)?;
        debug!("anchor 0 is row {} at distance {}", first, max_dist);
        indices.push(first);
        selected[first] = true;

        // move the origin onto the first anchor
        let origin = working.row(first).to_owned();
        for mut row in working.axis_iter_mut(Axis(0)) {
            row -= &origin;
        }

        // farthest point from the first anchor spans the first basis direction
        let mut norms = working.map_axis(Axis(1), |row| row.dot(&row).sqrt());
        let (second, max_dist) = GramSchmidt::farthest(&mut norms, &selected, 1)?;
        debug!("anchor 1 is row {} at distance {}", second, max_dist);
        indices.push(second);
        selected[second] = true;
        basis.row_mut(0).assign(&GramSchmidt::unit(working.row(second), max_dist, 1));

        // each pass removes the newest basis direction from every row, the rows already carry
        // no component along the older ones
        for j in 1..k - 1 {

            let direction = basis.row(j - 1).to_owned();
            let mut residuals: Array1<f64> = Array1::zeros(n_rows);
            for (i, mut row) in working.axis_iter_mut(Axis(0)).enumerate() {
                let coef = row.dot(&direction);
                row.scaled_add(-coef, &direction);
                residuals[i] = row.dot(&row);
            }

            let (next, max_dist) = GramSchmidt::farthest(&mut residuals, &selected, j + 1)?;
            trace!("pass {}: largest squared residual {}", j, max_dist);
            debug!("anchor {} is row {} at squared residual {}", j + 1, next, max_dist);
            indices.push(next);
            selected[next] = true;
            basis.row_mut(j).assign(&GramSchmidt::unit(working.row(next), max_dist.sqrt(), j + 1));
        }

        Ok((indices, basis))
    }

}


/// Selects `k` anchor rows of `q` among the types seen in more than `doc_threshold` documents.
///
/// `documents` holds the type ids of each document; repeats inside a document are ignored. When
/// `project_dim` is set to a positive value the search runs on a random projection drawn from
/// `rng`, otherwise the result is fully determined by the inputs.
pub fn select_anchors<D, S, R>(
    documents: &[D],
    q: &ArrayBase<S, Ix2>,
    k: usize,
    doc_threshold: usize,
    project_dim: Option<usize>,
    rng: &mut R,
) -> Result<Anchors>
where
    D: AsRef<[usize]>,
    S: Data<Elem = f64>,
    R: Rng + ?Sized,
{
    GramSchmidt::new(k, doc_threshold, project_dim)?.select(documents, q, rng)
}
