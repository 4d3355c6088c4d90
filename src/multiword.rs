
use std::collections::HashMap;
use crate::error::{AnchorError, Result};
use log::debug;
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};


/// Builds anchors from user supplied token groups: each anchor is the mean of the rows of `q`
/// belonging to its tokens.
pub fn multiword_anchors<S>(q: &ArrayBase<S, Ix2>, vocab: &[String], anchor_tokens: &[Vec<String>]) -> Result<Array2<f64>>
where
    S: Data<Elem = f64>,
{
    let t2i: HashMap<&str, usize> = vocab.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();
    let rows = q.nrows();

    let mut anchors: Array2<f64> = Array2::zeros((anchor_tokens.len(), q.ncols()));
    for (a, tokens) in anchor_tokens.iter().enumerate() {

        let mut ids: Vec<usize> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match t2i.get(token.as_str()) {
                Some(i) if *i < rows => ids.push(*i),
                Some(i) => return Err(AnchorError::TypeOutOfRange { id: *i, rows }),
                None => return Err(AnchorError::UnknownToken(token.to_owned()))
            }
        }

        let mean = q.select(Axis(0), &ids).mean_axis(Axis(0)).ok_or(AnchorError::EmptyAnchor { anchor: a })?;
        debug!("anchor {} built from {} tokens", a, ids.len());
        anchors.row_mut(a).assign(&mean);
    }

    Ok(anchors)
}


#[cfg(test)]
mod tests {

    use super::multiword_anchors;
    use crate::error::AnchorError;
    use ndarray::array;

    fn vocab() -> Vec<String> {
        ["space", "nasa", "orbit", "hockey"].iter().map(|t| t.to_string()).collect()
    }

    fn groups(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter().map(|g| g.iter().map(|t| t.to_string()).collect()).collect()
    }

    #[test]
    fn mean_of_token_rows() {
        let q = array![[1.0, 0.0, 2.0], [3.0, 2.0, 0.0], [2.0, 4.0, 1.0], [0.0, 0.0, 9.0]];
        let anchor_tokens = groups(&[&["space", "nasa", "orbit"], &["hockey"]]);

        let anchors = multiword_anchors(&q, &vocab(), &anchor_tokens).unwrap();

        assert_eq!(anchors, array![[2.0, 2.0, 1.0], [0.0, 0.0, 9.0]]);
    }

    #[test]
    fn single_token_anchor_is_its_row() {
        let q = array![[1.0, 0.5], [0.25, 4.0], [3.0, 3.0], [7.0, 0.0]];
        let anchors = multiword_anchors(&q, &vocab(), &groups(&[&["nasa"]])).unwrap();
        assert_eq!(anchors.row(0), q.row(1));
    }

    #[test]
    fn unknown_token() {
        let q = array![[1.0], [1.0], [1.0], [1.0]];
        match multiword_anchors(&q, &vocab(), &groups(&[&["space", "baseball"]])) {
            Err(AnchorError::UnknownToken(token)) => assert_eq!(token, "baseball"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn empty_anchor() {
        let q = array![[1.0], [1.0], [1.0], [1.0]];
        match multiword_anchors(&q, &vocab(), &groups(&[&["space"], &[]])) {
            Err(AnchorError::EmptyAnchor { anchor }) => assert_eq!(anchor, 1),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn vocabulary_larger_than_matrix() {
        let q = array![[1.0], [1.0]];
        match multiword_anchors(&q, &vocab(), &groups(&[&["orbit"]])) {
            Err(AnchorError::TypeOutOfRange { id, rows }) => {
                assert_eq!(id, 2);
                assert_eq!(rows, 2);
            },
            other => panic!("unexpected result {:?}", other),
        }
    }

}
