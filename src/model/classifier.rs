//! One-vs-rest logistic regression over sparse TF-IDF features.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use tracing::debug;

use super::encoder::SparseVector;
use crate::config::{ClassifierConfig, MIN_ITERATIONS};
use crate::error::{ClassifierError, ClassifyError};
use crate::intent::Tag;

/// A single binary "this class vs the rest" model.
#[derive(Debug, Clone)]
struct BinaryModel {
    weights: Vec<f64>,
    intercept: f64,
}

impl BinaryModel {
    fn margin(&self, x: &SparseVector) -> f64 {
        x.dot(&self.weights) + self.intercept
    }
}

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Sorted, unique class labels.
    classes: Vec<Tag>,
    /// One model per class, parallel to `classes`. Empty for a single-class corpus.
    models: Vec<BinaryModel>,
    dim: usize,
}

impl LogisticRegression {
    pub fn fit(
        features: &[SparseVector],
        labels: &[Tag],
        config: &ClassifierConfig,
    ) -> Result<Self, ClassifierError> {
        if features.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if features.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                features: features.len(),
                labels: labels.len(),
            });
        }

        let classes: Vec<Tag> = labels.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let dim = features.iter().map(SparseVector::dim).max().unwrap_or(0);
        for (row, x) in features.iter().enumerate() {
            if let Some(&(index, _)) = x.entries().last() {
                if index >= x.dim() {
                    return Err(ClassifierError::IndexOutOfRange { row, index, dim: x.dim() });
                }
            }
        }

        if classes.len() == 1 {
            return Ok(Self {
                classes,
                models: Vec::new(),
                dim,
            });
        }

        let models = classes
            .iter()
            .enumerate()
            .map(|(k, class)| {
                let targets: Vec<f64> = labels
                    .iter()
                    .map(|l| if l == class { 1.0 } else { 0.0 })
                    .collect();
                let seed = config.seed.wrapping_add(k as u64);
                let model = train_binary(features, &targets, dim, seed, config);
                debug!(class = %class, intercept = model.intercept, "Binary model trained");
                model
            })
            .collect();

        Ok(Self { classes, models, dim })
    }

    pub fn classes(&self) -> &[Tag] {
        &self.classes
    }

    pub fn dimensions(&self) -> usize {
        self.dim
    }

    /// Per-class probabilities, parallel to [`classes`](Self::classes), summing to 1.
    pub fn predict_proba(&self, x: &SparseVector) -> Result<Vec<f64>, ClassifyError> {
        if x.dim() != self.dim {
            return Err(ClassifyError::DimensionMismatch {
                expected: self.dim,
                got: x.dim(),
            });
        }
        if self.models.is_empty() {
            return Ok(vec![1.0]);
        }

        let scores: Vec<f64> = self.models.iter().map(|m| sigmoid(m.margin(x))).collect();
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(ClassifyError::Classifier("non-finite class score".to_string()));
        }
        let total: f64 = scores.iter().sum();
        if total <= 0.0 {
            let uniform = 1.0 / scores.len() as f64;
            return Ok(vec![uniform; scores.len()]);
        }
        Ok(scores.into_iter().map(|s| s / total).collect())
    }

    /// Most probable class. Ties go to the earliest label in sorted order.
    pub fn predict(&self, x: &SparseVector) -> Result<&str, ClassifyError> {
        let proba = self.predict_proba(x)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate().skip(1) {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes
            .get(best)
            .map(String::as_str)
            .ok_or_else(|| ClassifyError::Classifier("model has no classes".to_string()))
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn log_loss(margin: f64, y: f64) -> f64 {
    // log(1 + exp(-s)) with s = +-margin, computed without overflow.
    let s = if y > 0.5 { margin } else { -margin };
    if s > 0.0 {
        (-s).exp().ln_1p()
    } else {
        -s + s.exp().ln_1p()
    }
}

/// L2-regularized SGD. The weight vector is kept as `scale * v` so that shrinkage costs
/// O(1) per step and each update only touches the sample's non-zero features.
fn train_binary(
    xs: &[SparseVector],
    ys: &[f64],
    dim: usize,
    seed: u64,
    config: &ClassifierConfig,
) -> BinaryModel {
    let n = xs.len();
    let lambda = 1.0 / (config.c * n as f64);
    let max_iter = config.max_iter.max(MIN_ITERATIONS);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..n).collect();
    let mut v = vec![0.0f64; dim];
    let mut scale = 1.0f64;
    let mut intercept = 0.0f64;
    let mut step: u64 = 0;
    let mut prev_loss = f64::INFINITY;

    for epoch in 0..max_iter {
        order.shuffle(&mut rng);

        for &i in &order {
            let eta = (config.learning_rate / (1.0 + config.learning_rate * lambda * step as f64))
                .min(0.5 / lambda);
            step += 1;

            scale *= 1.0 - eta * lambda;
            let x = &xs[i];
            let margin = scale * x.dot(&v) + intercept;
            let g = sigmoid(margin) - ys[i];

            for &(j, xj) in x.entries() {
                v[j] -= eta * g * xj / scale;
            }
            intercept -= eta * g;

            if scale < 1e-9 {
                for w in v.iter_mut() {
                    *w *= scale;
                }
                scale = 1.0;
            }
        }

        let sq_norm: f64 = v.iter().map(|w| w * w).sum::<f64>() * scale * scale;
        let data_loss: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, &y)| log_loss(scale * x.dot(&v) + intercept, y))
            .sum::<f64>()
            / n as f64;
        let loss = data_loss + 0.5 * lambda * sq_norm;

        if (prev_loss - loss).abs() < config.tol {
            debug!(epoch, loss, "Binary model converged");
            break;
        }
        prev_loss = loss;
    }

    let weights = v.into_iter().map(|w| w * scale).collect();
    BinaryModel { weights, intercept }
}
