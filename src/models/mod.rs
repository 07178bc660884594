/// ML модели

pub mod evaluation;
pub mod naive_bayes;
pub mod random_forest;

use linfa::Dataset;
use ndarray::{Array1, Array2, Ix1};
use serde::Deserialize;

use crate::error::Result;

pub use evaluation::{learning_curve, top_features};
pub use naive_bayes::NaiveBayes;
pub use random_forest::RandomForest;

/// Признаки f64 и одномерные метки классов
pub type StressDataset = Dataset<f64, usize, Ix1>;

/// Бинарный классификатор "Growing Stress"
///
/// Пайплайн не знает конкретного алгоритма и работает через этот трейт.
pub trait StressClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn fit(&mut self, dataset: &StressDataset) -> Result<()>;

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>>;

    /// Важность признаков в порядке колонок, если модель ее дает
    fn feature_importance(&self) -> Option<Vec<f64>> {
        None
    }

    /// Необученная копия с теми же гиперпараметрами
    fn fresh(&self) -> Box<dyn StressClassifier>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    #[default]
    RandomForest,
    NaiveBayes,
}
