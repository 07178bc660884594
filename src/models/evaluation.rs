//! Метрики качества бинарного классификатора

use linfa::Dataset;
use ndarray::{s, Array1};

use crate::error::{Result, StressError};
use crate::models::{StressClassifier, StressDataset};
use crate::types::{ConfusionCounts, FeatureImportance, LearningCurvePoint};

impl ConfusionCounts {
    /// Класс 1 считается положительным
    pub fn from_predictions(predicted: &Array1<usize>, actual: &Array1<usize>) -> Result<Self> {
        if predicted.len() != actual.len() {
            return Err(StressError::InvalidInput(format!(
                "{} predictions for {} targets",
                predicted.len(),
                actual.len()
            )));
        }

        let mut counts = ConfusionCounts::default();
        for (&p, &a) in predicted.iter().zip(actual.iter()) {
            match (p == 1, a == 1) {
                (true, true) => counts.true_positive += 1,
                (true, false) => counts.false_positive += 1,
                (false, true) => counts.false_negative += 1,
                (false, false) => counts.true_negative += 1,
            }
        }
        Ok(counts)
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1_score(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }
}

// Деление на ноль дает 0
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn accuracy(classifier: &dyn StressClassifier, dataset: &StressDataset) -> Result<f64> {
    let predicted = classifier.predict(&dataset.records)?;
    Ok(ConfusionCounts::from_predictions(&predicted, &dataset.targets)?.accuracy())
}

/// Кривая обучения: свежая модель на растущей доле обучающей выборки,
/// точность на ней же и на отложенной выборке
pub fn learning_curve(
    classifier: &dyn StressClassifier,
    train: &StressDataset,
    test: &StressDataset,
    steps: usize,
) -> Vec<LearningCurvePoint> {
    let n_train = train.records.nrows();
    if n_train == 0 || steps == 0 {
        return Vec::new();
    }

    let mut points: Vec<LearningCurvePoint> = Vec::with_capacity(steps);
    for step in 0..steps {
        // Доли от 0.1 до 1.0 с равным шагом
        let fraction = if step + 1 == steps {
            1.0
        } else {
            0.1 + 0.9 * step as f64 / (steps - 1) as f64
        };
        let size = ((n_train as f64 * fraction).floor() as usize).clamp(1, n_train);
        if points.last().is_some_and(|p| p.train_size == size) {
            continue;
        }

        let subset = Dataset::new(
            train.records.slice(s![..size, ..]).to_owned(),
            train.targets.slice(s![..size]).to_owned(),
        );

        let mut model = classifier.fresh();
        if let Err(e) = model.fit(&subset) {
            tracing::warn!("Learning curve step {} skipped: {}", size, e);
            continue;
        }

        match (accuracy(model.as_ref(), &subset), accuracy(model.as_ref(), test)) {
            (Ok(train_accuracy), Ok(test_accuracy)) => points.push(LearningCurvePoint {
                train_size: size,
                train_accuracy,
                test_accuracy,
            }),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Learning curve step {} skipped: {}", size, e);
            }
        }
    }

    points
}

/// Топ-k признаков по убыванию важности
pub fn top_features(importance: &[f64], columns: &[String], k: usize) -> Vec<FeatureImportance> {
    let mut ranked: Vec<FeatureImportance> = columns
        .iter()
        .zip(importance.iter())
        .map(|(feature, &importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(k);
    ranked
}
