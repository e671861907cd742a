use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: usize,
    pub distance: f32,
}

/// Exact (flat) L2 nearest-neighbor index: every query is compared against
/// every stored vector. No approximation, no partitioning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Add a vector; its id is its insertion position
    pub fn add(&mut self, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            anyhow::bail!(
                "Vector dimension mismatch: expected {}, got {}",
                self.dimension,
                vector.len()
            );
        }

        self.vectors.push(vector);
        Ok(())
    }

    /// Return the `k` nearest stored vectors by Euclidean distance,
    /// closest first. `k` is capped at the number of stored vectors.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            anyhow::bail!(
                "Query dimension mismatch: expected {}, got {}",
                self.dimension,
                query.len()
            );
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| SearchHit {
                id,
                distance: l2_distance(query, vector),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(k);

        Ok(hits)
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
