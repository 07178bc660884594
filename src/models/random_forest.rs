//! Случайный лес поверх деревьев linfa
//!
//! Каждое дерево учится на бутстрап-выборке строк и случайном
//! подмножестве колонок, предсказание - голосование большинством.

use std::collections::BTreeMap;

use linfa::prelude::*;
use linfa::Dataset;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, StressError};
use crate::models::{StressClassifier, StressDataset};

struct ForestMember {
    tree: DecisionTree<f64, usize>,
    features: Vec<usize>,
}

pub struct RandomForest {
    n_trees: usize,
    max_depth: Option<usize>,
    feature_subsample: f64,
    seed: u64,
    n_features: usize,
    members: Vec<ForestMember>,
}

impl RandomForest {
    pub fn new(n_trees: usize, max_depth: Option<usize>, feature_subsample: f64, seed: u64) -> Self {
        Self {
            n_trees,
            max_depth,
            feature_subsample: feature_subsample.clamp(f64::EPSILON, 1.0),
            seed,
            n_features: 0,
            members: Vec::new(),
        }
    }

    pub fn n_trees(&self) -> usize {
        self.n_trees
    }

    fn sample_features(&self, rng: &mut StdRng, n_features: usize) -> Vec<usize> {
        let k = ((n_features as f64 * self.feature_subsample).round() as usize).clamp(1, n_features);
        if k == n_features {
            return (0..n_features).collect();
        }
        let mut features = rand::seq::index::sample(rng, n_features, k).into_vec();
        features.sort_unstable();
        features
    }
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100, None, 1.0, 42)
    }
}

impl StressClassifier for RandomForest {
    fn name(&self) -> &'static str {
        "random_forest"
    }

    fn fit(&mut self, dataset: &StressDataset) -> Result<()> {
        let records = &dataset.records;
        let targets = &dataset.targets;
        let n_samples = records.nrows();
        let n_features = records.ncols();

        if n_samples == 0 || n_features == 0 {
            return Err(StressError::EmptyDataset);
        }
        if self.n_trees == 0 {
            return Err(StressError::InvalidInput(
                "random forest needs at least one tree".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut members = Vec::with_capacity(self.n_trees);

        for _ in 0..self.n_trees {
            // Бутстрап строк
            let rows: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
            let features = self.sample_features(&mut rng, n_features);

            let sample = Dataset::new(
                records.select(Axis(0), &rows).select(Axis(1), &features),
                targets.select(Axis(0), &rows),
            );

            let tree = DecisionTree::<f64, usize>::params()
                .max_depth(self.max_depth)
                .fit(&sample)
                .map_err(|e| StressError::Model(e.to_string()))?;

            members.push(ForestMember { tree, features });
        }

        self.n_features = n_features;
        self.members = members;
        tracing::debug!("Random forest fitted: {} trees on {} samples", self.n_trees, n_samples);
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        if self.members.is_empty() {
            return Err(StressError::NotTrained);
        }
        if records.ncols() != self.n_features {
            return Err(StressError::InvalidInput(format!(
                "expected {} features, got {}",
                self.n_features,
                records.ncols()
            )));
        }

        let mut votes: Vec<BTreeMap<usize, usize>> = vec![BTreeMap::new(); records.nrows()];
        for member in &self.members {
            let subset = records.select(Axis(1), &member.features);
            let predictions = member.tree.predict(&subset);
            for (row, &label) in predictions.iter().enumerate() {
                *votes[row].entry(label).or_default() += 1;
            }
        }

        // При равенстве голосов побеждает меньшая метка
        let labels = votes
            .iter()
            .map(|counts| {
                counts
                    .iter()
                    .fold((0, 0), |best, (&label, &count)| {
                        if count > best.1 {
                            (label, count)
                        } else {
                            best
                        }
                    })
                    .0
            })
            .collect();

        Ok(labels)
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        if self.members.is_empty() {
            return None;
        }

        let mut importance = vec![0.0; self.n_features];
        for member in &self.members {
            for (local, value) in member.tree.feature_importance().into_iter().enumerate() {
                importance[member.features[local]] += value;
            }
        }

        let total: f64 = importance.iter().sum();
        if total > 0.0 {
            importance.iter_mut().for_each(|v| *v /= total);
        }
        Some(importance)
    }

    fn fresh(&self) -> Box<dyn StressClassifier> {
        Box::new(Self::new(self.n_trees, self.max_depth, self.feature_subsample, self.seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Метка определяется первым признаком, второй - шум
    fn separable() -> StressDataset {
        let mut records = Array2::zeros((40, 2));
        let mut targets = Array1::zeros(40);
        for i in 0..40 {
            let positive = i % 2 == 0;
            records[[i, 0]] = if positive { 1.0 } else { 0.0 };
            records[[i, 1]] = (i % 7) as f64;
            targets[i] = usize::from(positive);
        }
        Dataset::new(records, targets)
    }

    #[test]
    fn test_learns_separable_problem() {
        let mut forest = RandomForest::new(15, Some(4), 1.0, 7);
        forest.fit(&separable()).unwrap();

        let predictions = forest.predict(&array![[1.0, 3.0], [0.0, 3.0]]).unwrap();
        assert_eq!(predictions.to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_importance_points_at_informative_feature() {
        let mut forest = RandomForest::new(15, Some(4), 1.0, 7);
        forest.fit(&separable()).unwrap();

        let importance = forest.feature_importance().unwrap();
        assert_eq!(importance.len(), 2);
        assert!(importance[0] > importance[1]);
    }

    #[test]
    fn test_predict_before_fit() {
        let forest = RandomForest::default();
        assert!(matches!(
            forest.predict(&array![[1.0, 0.0]]),
            Err(StressError::NotTrained)
        ));
        assert!(forest.feature_importance().is_none());
    }

    #[test]
    fn test_zero_trees_rejected() {
        let mut forest = RandomForest::new(0, None, 1.0, 1);
        assert_eq!(forest.n_trees(), 0);
        assert!(matches!(
            forest.fit(&separable()),
            Err(StressError::InvalidInput(_))
        ));
        assert!(matches!(
            forest.predict(&array![[1.0, 0.0]]),
            Err(StressError::NotTrained)
        ));
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut forest = RandomForest::new(3, Some(2), 1.0, 1);
        forest.fit(&separable()).unwrap();
        assert!(matches!(
            forest.predict(&array![[1.0, 0.0, 0.0]]),
            Err(StressError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_same_seed_same_predictions() {
        let data = separable();
        let mut a = RandomForest::new(5, Some(3), 0.5, 11);
        let mut b = RandomForest::new(5, Some(3), 0.5, 11);
        a.fit(&data).unwrap();
        b.fit(&data).unwrap();
        assert_eq!(
            a.predict(&data.records).unwrap(),
            b.predict(&data.records).unwrap()
        );
    }
}
