
// imports
use std::collections::{HashMap, HashSet};
use log::debug;
use rayon::prelude::*;


/// Number of distinct documents each type id appears in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentFrequency {
    counts: HashMap<usize, usize>,
}

impl DocumentFrequency {

    fn accumulate(document: &[usize], type2count: &mut HashMap<usize, usize>) {

        // a type is counted once per document, no matter how often it repeats in it
        let distinct: HashSet<usize> = document.iter().copied().collect();
        for type_id in distinct {
            let val = type2count.entry(type_id).or_insert(0);
            *val += 1;
        }
    }

    fn merge(mut left: HashMap<usize, usize>, right: HashMap<usize, usize>) -> HashMap<usize, usize> {
        for (type_id, count) in right {
            *left.entry(type_id).or_insert(0) += count;
        }
        left
    }

    pub fn count<D: AsRef<[usize]>>(documents: &[D]) -> DocumentFrequency {

        let mut counts: HashMap<usize, usize> = HashMap::new();
        for document in documents {
            DocumentFrequency::accumulate(document.as_ref(), &mut counts);
        }

        debug!("counted {} distinct types over {} documents", counts.len(), documents.len());
        Self { counts }
    }

    /// Same result as [`DocumentFrequency::count`], spread over the current rayon pool.
    pub fn count_par<D: AsRef<[usize]> + Sync>(documents: &[D]) -> DocumentFrequency {

        let counts = documents
        .par_iter()
        .fold(HashMap::new, |mut acc, document| {
            DocumentFrequency::accumulate(document.as_ref(), &mut acc);
            acc
        })
        .reduce(HashMap::new, DocumentFrequency::merge);

        debug!("counted {} distinct types over {} documents", counts.len(), documents.len());
        Self { counts }
    }

    pub fn get(&self, type_id: usize) -> usize {
        self.counts.get(&type_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Type ids seen in strictly more than `doc_threshold` documents, ascending.
    pub fn candidates(&self, doc_threshold: usize) -> Vec<usize> {
        let mut candidates: Vec<usize> = self.counts
        .iter()
        .filter(|(_, count)| **count > doc_threshold)
        .map(|(type_id, _)| *type_id)
        .collect();
        candidates.sort_unstable();
        candidates
    }

}


#[cfg(test)]
mod tests {

    use super::DocumentFrequency;

    fn toy_corpus() -> Vec<Vec<usize>> {
        vec![
            vec![0, 1, 2, 2, 2],
            vec![1, 1, 3],
            vec![1, 2, 4, 4],
            vec![5],
        ]
    }

    #[test]
    fn repeated_type_counts_once_per_document() {
        let documents = vec![vec![7, 7, 7, 7, 7], vec![3]];
        let df = DocumentFrequency::count(&documents);
        assert_eq!(df.get(7), 1);
        assert_eq!(df.get(3), 1);
        assert_eq!(df.get(11), 0);
    }

    #[test]
    fn frequency_test() {
        let df = DocumentFrequency::count(&toy_corpus());
        assert_eq!(df.len(), 6);
        assert_eq!(df.get(0), 1);
        assert_eq!(df.get(1), 3);
        assert_eq!(df.get(2), 2);
        assert_eq!(df.get(4), 1);
    }

    #[test]
    fn threshold_is_strict() {
        let df = DocumentFrequency::count(&toy_corpus());
        assert_eq!(df.candidates(0), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(df.candidates(1), vec![1, 2]);
        assert_eq!(df.candidates(2), vec![1]);
        assert!(df.candidates(3).is_empty());
    }

    #[test]
    fn raising_threshold_never_adds_candidates() {
        let df = DocumentFrequency::count(&toy_corpus());
        let mut previous = df.candidates(0);
        for threshold in 1..6 {
            let current = df.candidates(threshold);
            assert!(current.len() <= previous.len());
            assert!(current.iter().all(|c| previous.contains(c)));
            previous = current;
        }
    }

    #[test]
    fn parallel_count_matches_sequential() {
        let documents: Vec<Vec<usize>> = (0..500)
        .map(|i| (0..(i % 17)).map(|j| (i * j) % 31).collect())
        .collect();
        assert_eq!(DocumentFrequency::count(&documents), DocumentFrequency::count_par(&documents));
    }

    #[test]
    fn empty_corpus() {
        let documents: Vec<Vec<usize>> = Vec::new();
        let df = DocumentFrequency::count(&documents);
        assert!(df.is_empty());
        assert!(df.candidates(0).is_empty());
    }

}
