//! Reader for the binary word2vec format
//!
//! Layout: an ASCII header `"<vocab> <dim>\n"` followed, per word, by the
//! token bytes terminated by a space, `dim` little-endian f32 values and an
//! optional newline. Vectors are normalised on load so that a dot product
//! is the cosine similarity.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::{EmbeddingModel, ModelError, ModelLoader, Neighbor};

/// Largest vector dimension accepted from a header
pub const MAX_DIM: usize = 1 << 16;

const PREALLOC_WORDS: usize = 1 << 16;
const PREALLOC_VALUES: usize = 1 << 20;

#[derive(Debug)]
pub struct Word2VecModel {
    dim: usize,
    words: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<f32>,
}

impl Word2VecModel {
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, ModelError> {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let mut fields = header.split_whitespace();
        let size = parse_header_field(fields.next(), "vocabulary size")?;
        let dim = parse_header_field(fields.next(), "dimension")?;
        if dim == 0 || dim > MAX_DIM {
            return Err(ModelError::Format(format!(
                "vector dimension must be between 1 and {}, got {}",
                MAX_DIM, dim
            )));
        }
        let total = size.checked_mul(dim).ok_or_else(|| {
            ModelError::Format(format!("model too large: {} x {}", size, dim))
        })?;

        // The header is untrusted; grow past the preallocation only as data arrives.
        let mut words = Vec::with_capacity(size.min(PREALLOC_WORDS));
        let mut index = HashMap::with_capacity(size.min(PREALLOC_WORDS));
        let mut vectors = Vec::with_capacity(total.min(PREALLOC_VALUES));
        let mut raw = vec![0u8; dim * 4];

        for position in 0..size {
            let word = read_token(&mut reader)?;
            reader.read_exact(&mut raw).map_err(|e| {
                ModelError::Format(format!("truncated vector for '{}': {}", word, e))
            })?;

            let start = vectors.len();
            vectors.extend(
                raw.chunks_exact(4)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
            normalize(&mut vectors[start..]);

            index.entry(word.clone()).or_insert(position);
            words.push(word);
        }

        debug!(size, dim, "word2vec model parsed");
        Ok(Self {
            dim,
            words,
            index,
            vectors,
        })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn vector(&self, position: usize) -> &[f32] {
        &self.vectors[position * self.dim..(position + 1) * self.dim]
    }
}

impl EmbeddingModel for Word2VecModel {
    fn nearest(&self, expr: &str, k: usize) -> Result<Vec<Neighbor>, ModelError> {
        let position = *self
            .index
            .get(expr)
            .ok_or_else(|| ModelError::WordNotFound(expr.to_string()))?;
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.vector(position);

        let mut scored: Vec<(usize, f32)> = (0..self.words.len())
            .map(|i| (i, dot(query, self.vector(i))))
            .collect();

        // Ties are broken by vocabulary position so results are reproducible.
        let by_score = |a: &(usize, f32), b: &(usize, f32)| {
            b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        };
        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, by_score);
            scored.truncate(k);
        }
        scored.sort_by(by_score);

        Ok(scored
            .into_iter()
            .map(|(i, score)| Neighbor {
                word: self.words[i].clone(),
                score,
            })
            .collect())
    }

    fn size(&self) -> usize {
        self.words.len()
    }
}

/// Opens word2vec binary files from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct Word2VecLoader;

impl ModelLoader for Word2VecLoader {
    fn open(&self, path: &Path) -> Result<Arc<dyn EmbeddingModel>, ModelError> {
        let file = File::open(path)?;
        let model = Word2VecModel::from_reader(BufReader::new(file))?;
        Ok(Arc::new(model))
    }
}

fn parse_header_field(field: Option<&str>, name: &str) -> Result<usize, ModelError> {
    field
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ModelError::Format(format!("invalid header: missing {}", name)))
}

fn read_token<R: BufRead>(reader: &mut R) -> Result<String, ModelError> {
    let mut bytes = Vec::new();
    reader.read_until(b' ', &mut bytes)?;
    if bytes.pop() != Some(b' ') {
        return Err(ModelError::Format("unexpected end of vocabulary".into()));
    }
    // the newline closing the previous vector, if the writer emitted one
    let start = bytes.iter().take_while(|b| **b == b'\n').count();
    Ok(String::from_utf8_lossy(&bytes[start..]).into_owned())
}

fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
