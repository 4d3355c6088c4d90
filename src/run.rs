
use crate::anchors::GramSchmidt;
use crate::config::{self, AnchorReport, Config, JsonTypes};
use crate::frequency::DocumentFrequency;
use crate::multiword::multiword_anchors;

use log::info;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::ThreadPoolBuilder;
use std::env;
use std::error::Error;
use std::time::Instant;


pub struct Run {}

impl Run {

    pub fn run() -> Result<(), Box<dyn Error>> {

        info!("entering program...");
        let args: Vec<String> = env::args().collect();

        info!("building parameters...");
        let params = Config::new(&args)?.get_params();
        info!("{}", params);

        Run::run_with(&params)?;
        Ok(())
    }

    /// Selects (or builds, when `user_anchors` is set) the anchors described by `params` and
    /// writes `anchors.npy` and `anchors.json` to the output folder.
    pub fn run_with(params: &JsonTypes) -> Result<AnchorReport, Box<dyn Error>> {

        let timer = Instant::now();
        let q = config::read_input::<Array2<f64>>(&params.matrix_file)?;
        info!("loaded {} x {} matrix from {}", q.nrows(), q.ncols(), params.matrix_file);

        let vocab = match &params.vocab_file {
            Some(vocab_file) => Some(config::read_input::<Vec<String>>(vocab_file)?),
            None => None
        };

        let (anchors, report) = match (&params.user_anchors, &vocab) {
            (Some(user_anchors), Some(vocab)) => {
                info!("building {} anchors from user tokens", user_anchors.len());
                let anchors = multiword_anchors(&q, vocab, user_anchors)?;
                (anchors, AnchorReport { indices: Vec::new(), tokens: Some(user_anchors.clone()) })
            },
            _ => {
                let documents = config::read_input::<Vec<Vec<usize>>>(&params.documents_file)?;
                info!("loaded {} documents", documents.len());

                // document frequencies are counted in parallel, the anchor search itself is sequential
                let pool = ThreadPoolBuilder::new().num_threads(params.num_threads).build()?;
                let frequency = pool.install(|| DocumentFrequency::count_par(&documents));

                let mut rng = match params.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy()
                };
                let selector = GramSchmidt::new(params.k, params.doc_threshold, params.project_dim)?;
                let selected = selector.select_with_frequency(&frequency, &q, &mut rng)?;

                let tokens = match &vocab {
                    Some(vocab) => Some(selected.tokens(vocab)?),
                    None => None
                };
                let (indices, anchors) = selected.into_parts();
                (anchors, AnchorReport { indices, tokens })
            }
        };

        config::save_output(&params.output_dir, "anchors", &anchors)?;
        config::save_output(&params.output_dir, "anchors", &report)?;
        info!("saved {} anchors to {}, took {} seconds ...", anchors.nrows(), params.output_dir, timer.elapsed().as_secs());

        Ok(report)
    }

}


#[cfg(test)]
mod tests {

    use super::Run;
    use crate::config::{self, JsonTypes};
    use ndarray::{array, Array2};
    use ndarray_npy::write_npy;
    use std::fs;
    use tempfile::tempdir;

    fn params_in(dir: &std::path::Path) -> JsonTypes {
        let q = array![[0.0, 0.0], [5.0, 0.0], [0.0, 5.0], [1.0, 1.0]];
        write_npy(dir.join("q.npy"), &q).unwrap();
        fs::write(dir.join("docs.txt"), "1 2 3\n0 1 1 2 3\n").unwrap();
        fs::write(dir.join("vocab.json"), r#"["zero", "east", "north", "diagonal"]"#).unwrap();

        JsonTypes {
            matrix_file: dir.join("q.npy").display().to_string(),
            documents_file: dir.join("docs.txt").display().to_string(),
            output_dir: dir.join("out").display().to_string(),
            vocab_file: Some(dir.join("vocab.json").display().to_string()),
            k: 3,
            doc_threshold: 1,
            project_dim: None,
            seed: Some(1),
            num_threads: 2,
            user_anchors: None,
        }
    }

    #[test]
    fn gram_schmidt_run() {
        crate::init();
        let dir = tempdir().unwrap();
        let params = params_in(dir.path());

        let report = Run::run_with(&params).unwrap();

        assert_eq!(report.indices, vec![1, 2, 3]);
        assert_eq!(report.tokens.unwrap(), vec![vec!["east".to_string()], vec!["north".to_string()], vec!["diagonal".to_string()]]);
        let saved: Array2<f64> = config::read_input(&format!("{}/anchors.npy", params.output_dir)).unwrap();
        assert_eq!(saved, array![[5.0, 0.0], [0.0, 5.0], [1.0, 1.0]]);
    }

    #[test]
    fn user_anchor_run() {
        crate::init();
        let dir = tempdir().unwrap();
        let mut params = params_in(dir.path());
        params.user_anchors = Some(vec![vec!["east".to_string(), "north".to_string()], vec!["diagonal".to_string()]]);

        let report = Run::run_with(&params).unwrap();

        assert!(report.indices.is_empty());
        let saved: Array2<f64> = config::read_input(&format!("{}/anchors.npy", params.output_dir)).unwrap();
        assert_eq!(saved, array![[2.5, 2.5], [1.0, 1.0]]);
    }

    #[test]
    fn failing_run_reports_error() {
        let dir = tempdir().unwrap();
        let mut params = params_in(dir.path());
        params.doc_threshold = 5;

        let err = Run::run_with(&params).unwrap_err();
        assert!(err.to_string().contains("candidate rows"), "{}", err);
    }

}
