//! Конфигурация: необязательный TOML-файл и переменные окружения `STRESS__*`

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::models::{ModelKind, NaiveBayes, RandomForest, StressClassifier};

pub const DEFAULT_CONFIG_PATH: &str = "config/stress.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub csv_path: String,
    pub target_column: String,
    pub positive_label: String,
    pub drop_columns: Vec<String>,
    /// Куда сохранить схему признаков после обучения
    pub schema_path: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: "data/mental_health.csv".to_string(),
            target_column: "Growing_Stress".to_string(),
            positive_label: "Yes".to_string(),
            drop_columns: vec!["Timestamp".to_string()],
            schema_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub feature_subsample: f64,
    /// Сглаживание Лапласа для наивного Байеса
    pub alpha: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::RandomForest,
            n_trees: 100,
            max_depth: None,
            feature_subsample: 0.7,
            alpha: 1.0,
        }
    }
}

impl ModelConfig {
    pub fn build(&self, seed: u64) -> Box<dyn StressClassifier> {
        match self.kind {
            ModelKind::RandomForest => Box::new(RandomForest::new(
                self.n_trees,
                self.max_depth,
                self.feature_subsample,
                seed,
            )),
            ModelKind::NaiveBayes => Box::new(NaiveBayes::new(self.alpha)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub test_ratio: f64,
    pub seed: u64,
    pub learning_curve_steps: usize,
    pub top_features: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            learning_curve_steps: 5,
            top_features: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Файл необязателен; `STRESS__MODEL__KIND=naive_bayes` и т.п. перекрывают его
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix("STRESS").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
