//! Deterministic k-medoids over the dissimilarity `1 − M`.
//!
//! Seeding: the most central trace first, then farthest-first. Refinement
//! alternates assignment and medoid update until the medoids are stable.

use tracecluster_core::errors::ProviderError;
use tracecluster_core::traits::Partitioner;
use tracecluster_core::types::{DistanceMatrix, SimilarityMatrix};

const NAME: &str = "kmedoids";
const DEFAULT_MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, Copy)]
pub struct KMedoids {
    max_iterations: usize,
}

impl Default for KMedoids {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl KMedoids {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
        }
    }
}

impl Partitioner for KMedoids {
    fn partition(&self, matrix: &SimilarityMatrix, k: usize) -> Result<Vec<usize>, ProviderError> {
        let n = matrix.size();
        if k < 2 || k > n {
            return Err(ProviderError::failed(
                NAME,
                format!("cannot split {n} traces into {k} clusters"),
            ));
        }

        let d = matrix.dissimilarity();
        let mut medoids = seed(&d, k);
        let mut labels = assign(&d, &medoids);

        for _ in 0..self.max_iterations {
            let updated = update(&d, &labels, &medoids);
            if updated == medoids {
                break;
            }
            medoids = updated;
            labels = assign(&d, &medoids);
        }

        Ok(labels)
    }

    fn name(&self) -> &str {
        NAME
    }
}

fn seed(d: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = d.size();
    let central = (0..n)
        .map(|i| (i, d.row(i).iter().sum::<f64>()))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
        .0;

    let mut medoids = vec![central];
    let mut nearest: Vec<f64> = d.row(central).to_vec();
    while medoids.len() < k {
        let mut next = None;
        let mut far = f64::NEG_INFINITY;
        for (i, &dist) in nearest.iter().enumerate() {
            if !medoids.contains(&i) && dist > far {
                far = dist;
                next = Some(i);
            }
        }
        let Some(next) = next else { break };
        medoids.push(next);
        for (i, slot) in nearest.iter_mut().enumerate() {
            *slot = slot.min(d.get(next, i));
        }
    }
    medoids
}

/// Nearest medoid per trace; a medoid always labels itself.
fn assign(d: &DistanceMatrix, medoids: &[usize]) -> Vec<usize> {
    (0..d.size())
        .map(|i| {
            if let Some(own) = medoids.iter().position(|&m| m == i) {
                return own;
            }
            let mut best = 0;
            for (c, &m) in medoids.iter().enumerate().skip(1) {
                if d.get(i, m) < d.get(i, medoids[best]) {
                    best = c;
                }
            }
            best
        })
        .collect()
}

fn update(d: &DistanceMatrix, labels: &[usize], medoids: &[usize]) -> Vec<usize> {
    medoids
        .iter()
        .enumerate()
        .map(|(c, &current)| {
            let members: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == c).collect();
            let cost = |candidate: usize| members.iter().map(|&j| d.get(candidate, j)).sum::<f64>();
            let mut best = current;
            let mut best_cost = cost(current);
            for &m in &members {
                let c = cost(m);
                if c < best_cost {
                    best = m;
                    best_cost = c;
                }
            }
            best
        })
        .collect()
}
