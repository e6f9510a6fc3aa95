use crate::align::optimal::FeatureSet;
use crate::engine::GazeEngine;
use crate::error::GtResult;
use crate::loader::TrainingExample;
use crate::ranking::rank_of;
use serde::Serialize;
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, TypedBuilder)]
pub struct TrainerParams {
    #[builder(default = 0.001)]
    pub learning_rate: f64,
    #[builder(default = 20)]
    pub max_epochs: usize,
    /// Visit examples in a seeded random order each epoch.
    #[builder(default, setter(strip_option))]
    pub shuffle_seed: Option<u64>,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub mistakes: usize,
    pub updates: usize,
    /// Mean 1-based rank of the gold word among examples where it was ranked.
    pub mean_gold_rank: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub epochs: Vec<EpochStats>,
    pub converged: bool,
    pub weights: Vec<f64>,
}

/// Structured perceptron over the weighted alignment score: when the top
/// ranked word is wrong, weights move toward the gold alignment's features
/// and away from the prediction's.
pub struct StructuredPerceptron {
    weights: Vec<f64>,
    params: TrainerParams,
}

impl StructuredPerceptron {
    pub fn new(weights: Vec<f64>, params: TrainerParams) -> Self {
        Self { weights, params }
    }

    /// Starting point: reward distance covered by UP moves, penalize LEFT.
    pub fn initial_weights(features: FeatureSet) -> Vec<f64> {
        let per = features.per_direction();
        let mut w = vec![0.0; 2 * per];
        w[0] = 1.0;
        w[per] = -1.0;
        w
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn train(
        &mut self,
        engine: &mut GazeEngine,
        examples: &[TrainingExample],
    ) -> GtResult<TrainingReport> {
        let mut epochs = Vec::new();
        let mut converged = false;
        let mut order: Vec<usize> = (0..examples.len()).collect();

        for epoch in 1..=self.params.max_epochs {
            if let Some(seed) = self.params.shuffle_seed {
                fastrand::Rng::with_seed(seed.wrapping_add(epoch as u64)).shuffle(&mut order);
            }

            let stats = self.run_epoch(engine, examples, &order, epoch)?;
            info!(
                "Epoch {}: {} mistakes, {} updates, mean gold rank {:.2}",
                epoch, stats.mistakes, stats.updates, stats.mean_gold_rank
            );
            let done = stats.mistakes == 0;
            epochs.push(stats);
            if done {
                converged = true;
                break;
            }
        }

        Ok(TrainingReport {
            epochs,
            converged,
            weights: self.weights.clone(),
        })
    }

    fn run_epoch(
        &mut self,
        engine: &mut GazeEngine,
        examples: &[TrainingExample],
        order: &[usize],
        epoch: usize,
    ) -> GtResult<EpochStats> {
        let mut mistakes = 0;
        let mut updates = 0;
        let mut rank_sum = 0usize;
        let mut ranked = 0usize;

        for &idx in order {
            let example = &examples[idx];
            if !engine.vocabulary().contains(&example.word) {
                warn!("Gold word '{}' is not in the vocabulary", example.word);
                continue;
            }

            let ranking = engine.weighted_rank(&example.samples, &self.weights)?;
            let Some(top) = ranking.first() else {
                debug!("Epoch {}: nothing ranked for '{}'", epoch, example.word);
                continue;
            };

            if let Some(rank) = rank_of(&ranking, &example.word) {
                rank_sum += rank;
                ranked += 1;
            }
            if top.word == example.word {
                continue;
            }

            mistakes += 1;
            let predicted = top.word.clone();
            let gold_phi = engine.dp_phi(&example.samples, &example.word, &self.weights)?;
            let pred_phi = engine.dp_phi(&example.samples, &predicted, &self.weights)?;

            if let (Some(gold), Some(pred)) = (gold_phi, pred_phi) {
                for (w, (g, p)) in self.weights.iter_mut().zip(gold.iter().zip(&pred)) {
                    *w += self.params.learning_rate * (g - p);
                }
                updates += 1;
                debug!(
                    "Update on '{}' (predicted '{}'): {:?}",
                    example.word, predicted, self.weights
                );
            } else {
                warn!(
                    "Epoch {}: no feature vector to update '{}' against '{}'",
                    epoch, example.word, predicted
                );
            }
        }

        Ok(EpochStats {
            epoch,
            mistakes,
            updates,
            mean_gold_rank: if ranked > 0 {
                rank_sum as f64 / ranked as f64
            } else {
                0.0
            },
        })
    }
}
