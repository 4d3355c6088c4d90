
use crate::error::{AnchorError, Result};
use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use serde::{Deserialize, Serialize};
use std::{fs::{self, File}, fmt::Display, io::{BufRead, BufReader, BufWriter, Read}, path::Path};
use flate2::read::GzDecoder;


fn default_k() -> usize { 20 }
fn default_doc_threshold() -> usize { 500 }
fn default_project_dim() -> Option<usize> { Some(1000) }
fn default_num_threads() -> usize { 4 }

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct JsonTypes {
    pub matrix_file: String,
    pub documents_file: String,
    pub output_dir: String,
    #[serde(default)]
    pub vocab_file: Option<String>,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_doc_threshold")]
    pub doc_threshold: usize,
    #[serde(default = "default_project_dim")]
    pub project_dim: Option<usize>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_num_threads")]
    pub num_threads: usize,
    #[serde(default)]
    pub user_anchors: Option<Vec<Vec<String>>>,
}

impl Display for JsonTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        matrix_file: {}
        documents_file: {}
        output_dir: {}
        vocab_file: {:?}
        k: {}
        doc_threshold: {}
        project_dim: {:?}
        seed: {:?}
        num_threads: {}
        user_anchors: {:?}",
        self.matrix_file, self.documents_file, self.output_dir, self.vocab_file, self.k,
        self.doc_threshold, self.project_dim, self.seed, self.num_threads, self.user_anchors)
    }
}

pub struct Config {
    params: JsonTypes
}

impl Config {

    pub fn get_params(&self) -> JsonTypes {
        self.params.clone()
    }

    /// Expects the program name followed by a path to a json file.
    pub fn new(args: &[String]) -> Result<Config> {

        if args.len() != 2 {
            return Err(AnchorError::Config("input should be a path to json file only".to_string()));
        }

        let f = BufReader::new(File::open(&args[1])?);
        let params: JsonTypes = serde_json::from_reader(f)?;
        Config::validate(&params)?;

        Ok(Self { params })
    }

    fn validate(params: &JsonTypes) -> Result<()> {
        if params.k < 2 {
            return Err(AnchorError::Config(format!("k must be at least 2, got {}", params.k)));
        }
        if params.num_threads == 0 {
            return Err(AnchorError::Config("num_threads must be positive".to_string()));
        }
        if params.user_anchors.is_some() && params.vocab_file.is_none() {
            return Err(AnchorError::Config("user_anchors require a vocab_file".to_string()));
        }
        Ok(())
    }

}


/// Result of a run as written to `anchors.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AnchorReport {
    pub indices: Vec<usize>,
    pub tokens: Option<Vec<Vec<String>>>,
}


pub fn read_input<R: ReadFile>(file_path: &str) -> Result<R> {
    R::read_file(file_path)
}

pub fn save_output<S: SaveFile>(output_dir: &str, file_name: &str, item: &S) -> Result<()> {

    // create output folder
    fs::create_dir_all(output_dir)?;
    item.save_file(output_dir, file_name)
}

pub trait ReadFile: Sized {
    fn read_file(file_path: &str) -> Result<Self>;
}

impl ReadFile for Array2<f64> {
    fn read_file(file_path: &str) -> Result<Self> {
        Ok(read_npy(file_path)?)
    }
}

/// Vocabulary, a json array of tokens indexed by row id.
impl ReadFile for Vec<String> {
    fn read_file(file_path: &str) -> Result<Self> {
        let f = BufReader::new(File::open(file_path)?);
        Ok(serde_json::from_reader(f)?)
    }
}

/// Documents, one per line as whitespace separated type ids. Gzipped when the path ends in `.gz`.
impl ReadFile for Vec<Vec<usize>> {
    fn read_file(file_path: &str) -> Result<Self> {

        let f = File::open(file_path)?;
        let reader: Box<dyn Read> = if file_path.ends_with(".gz") {
            Box::new(GzDecoder::new(f))
        } else {
            Box::new(f)
        };

        let mut documents: Vec<Vec<usize>> = Vec::new();
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            documents.push(parse_document(&line?, i + 1)?);
        }
        Ok(documents)
    }
}

fn parse_document(line: &str, line_number: usize) -> Result<Vec<usize>> {
    line.split_whitespace().map(|token| {
        token.parse::<usize>().map_err(|_| AnchorError::InvalidDocument { line: line_number, token: token.to_owned() })
    }).collect()
}

pub trait SaveFile {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()>;
}

impl SaveFile for Array2<f64> {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
        let out = Path::new(output_dir).join(format!("{}.npy", file_name));
        write_npy(out, self)?;
        Ok(())
    }
}

impl SaveFile for AnchorReport {
    fn save_file(&self, output_dir: &str, file_name: &str) -> Result<()> {
        let out = Path::new(output_dir).join(format!("{}.json", file_name));
        let f = BufWriter::new(File::create(out)?);
        serde_json::to_writer_pretty(f, self)?;
        Ok(())
    }
}
