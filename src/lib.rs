
//! Anchor selection for anchor-based topic models: a sparse random projection followed by a
//! stabilized Gram-Schmidt farthest-point search over the rows of a co-occurrence matrix.

mod run;
mod config;
mod error;
mod frequency;
mod projection;
mod anchors;
mod multiword;

pub use run::Run;
pub use config::{read_input, save_output, AnchorReport, Config, JsonTypes, ReadFile, SaveFile};
pub use error::{AnchorError, Result};
pub use frequency::DocumentFrequency;
pub use projection::{project, project_thread_rng, projection_matrix, Achlioptas};
pub use anchors::{select_anchors, Anchors, GramSchmidt};
pub use multiword::multiword_anchors;

/// Installs the `env_logger` backend, `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
