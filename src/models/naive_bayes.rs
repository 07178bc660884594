//! Мультиномиальный наивный Байес (linfa-bayes)

use linfa::prelude::*;
use linfa_bayes::MultinomialNb;
use ndarray::{Array1, Array2};

use crate::error::{Result, StressError};
use crate::models::{StressClassifier, StressDataset};

pub struct NaiveBayes {
    alpha: f64,
    model: Option<MultinomialNb<f64, usize>>,
}

impl NaiveBayes {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, model: None }
    }
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl StressClassifier for NaiveBayes {
    fn name(&self) -> &'static str {
        "naive_bayes"
    }

    fn fit(&mut self, dataset: &StressDataset) -> Result<()> {
        if dataset.records.nrows() == 0 {
            return Err(StressError::EmptyDataset);
        }
        // Мультиномиальная модель принимает только счетчики
        if dataset.records.iter().any(|&v| v < 0.0) {
            return Err(StressError::InvalidInput(
                "multinomial naive bayes requires non-negative features".to_string(),
            ));
        }

        let model = MultinomialNb::<f64, usize>::params()
            .alpha(self.alpha)
            .fit(dataset)
            .map_err(|e| StressError::Model(e.to_string()))?;

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<usize>> {
        let model = self.model.as_ref().ok_or(StressError::NotTrained)?;
        Ok(model.predict(records))
    }

    fn fresh(&self) -> Box<dyn StressClassifier> {
        Box::new(Self::new(self.alpha))
    }
}
