//! Пайплайн обучения и предсказания Growing Stress
//!
//! Загрузка -> заполнение пропусков -> схема признаков -> кодирование ->
//! перемешивание и разбиение -> обучение -> оценка. Алгоритм передается
//! снаружи через `StressClassifier`.

use std::path::Path;

use chrono::Utc;
use linfa::Dataset;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{AppConfig, DataConfig, TrainingConfig};
use crate::error::{Result, StressError};
use crate::models::evaluation::{learning_curve, top_features};
use crate::models::{StressClassifier, StressDataset};
use crate::preprocessing::{FeatureSchema, ModeImputer, SurveyTable};
use crate::types::{
    AlignedFeatures, ConfusionCounts, EvaluationReport, PredictionOutput, RawExample,
};

pub struct StressPipeline {
    schema: FeatureSchema,
    classifier: Box<dyn StressClassifier>,
    report: EvaluationReport,
}

impl StressPipeline {
    /// Полный цикл из конфигурации: CSV с диска и модель из `model.kind`
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let table = SurveyTable::from_path(&config.data.csv_path)?;
        let classifier = config.model.build(config.training.seed);
        let pipeline = Self::train(table, classifier, &config.data, &config.training)?;

        if let Some(ref path) = config.data.schema_path {
            pipeline.schema.save(Path::new(path))?;
        }

        Ok(pipeline)
    }

    pub fn train(
        mut table: SurveyTable,
        mut classifier: Box<dyn StressClassifier>,
        data: &DataConfig,
        training: &TrainingConfig,
    ) -> Result<Self> {
        if table.is_empty() {
            return Err(StressError::EmptyDataset);
        }
        if !(0.0..1.0).contains(&training.test_ratio) {
            return Err(StressError::InvalidInput(format!(
                "test_ratio must be in [0, 1), got {}",
                training.test_ratio
            )));
        }

        table.drop_columns(&data.drop_columns);

        let mut imputer = ModeImputer::new();
        let filled = imputer.fit_transform(&mut table)?;
        tracing::info!("Imputed {} missing cells with column modes", filled);

        let schema = FeatureSchema::fit(&table, &data.target_column, &data.positive_label)?;
        let (records, targets) = schema.encode(&table)?;
        tracing::info!(
            "Encoded {} rows into {} features",
            records.nrows(),
            records.ncols()
        );

        let columns = schema.expected_columns();
        let mut rng = StdRng::seed_from_u64(training.seed);
        let (train, test) = Dataset::new(records, targets)
            .with_feature_names(columns.clone())
            .shuffle(&mut rng)
            .split_with_ratio((1.0 - training.test_ratio) as f32);

        if train.records.nrows() == 0 {
            return Err(StressError::InvalidInput(
                "not enough rows for a training split".to_string(),
            ));
        }

        classifier.fit(&train)?;
        tracing::info!(
            "{} trained on {} samples",
            classifier.name(),
            train.records.nrows()
        );

        let report = evaluate(classifier.as_ref(), &train, &test, &columns, training)?;

        Ok(Self {
            schema,
            classifier,
            report,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    pub fn model_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn align(&self, raw: &RawExample) -> AlignedFeatures {
        AlignedFeatures {
            columns: self.schema.expected_columns(),
            values: self.schema.align(raw).to_vec(),
        }
    }

    pub fn predict(&self, raw: &RawExample) -> Result<PredictionOutput> {
        let features = self.schema.align(raw).insert_axis(ndarray::Axis(0));
        let label = self
            .classifier
            .predict(&features)?
            .first()
            .copied()
            .ok_or_else(|| StressError::Model("empty prediction".to_string()))?;

        Ok(PredictionOutput {
            label,
            growing_stress: label == 1,
            model: self.classifier.name().to_string(),
        })
    }
}

fn evaluate(
    classifier: &dyn StressClassifier,
    train: &StressDataset,
    test: &StressDataset,
    columns: &[String],
    training: &TrainingConfig,
) -> Result<EvaluationReport> {
    // Без тестовой выборки оцениваем на обучающей
    let holdout = if test.records.nrows() == 0 {
        tracing::warn!("Empty test split, evaluating on training data");
        train
    } else {
        test
    };

    let predicted = classifier.predict(&holdout.records)?;
    let confusion = ConfusionCounts::from_predictions(&predicted, &holdout.targets)?;

    let curve = learning_curve(classifier, train, holdout, training.learning_curve_steps);
    let top = classifier
        .feature_importance()
        .map(|importance| top_features(&importance, columns, training.top_features))
        .unwrap_or_default();

    Ok(EvaluationReport {
        model: classifier.name().to_string(),
        trained_at: Utc::now(),
        train_samples: train.records.nrows(),
        test_samples: test.records.nrows(),
        accuracy: confusion.accuracy(),
        precision: confusion.precision(),
        recall: confusion.recall(),
        f1_score: confusion.f1_score(),
        confusion,
        learning_curve: curve,
        top_features: top,
    })
}

/// Пишет отчет в лог в читаемом виде
pub fn log_report(report: &EvaluationReport) {
    let c = &report.confusion;
    tracing::info!(
        "{}: accuracy {:.3}, precision {:.3}, recall {:.3}, f1 {:.3} ({} train / {} test)",
        report.model,
        report.accuracy,
        report.precision,
        report.recall,
        report.f1_score,
        report.train_samples,
        report.test_samples
    );
    tracing::info!(
        "Confusion matrix [[tn fp] [fn tp]]: [[{} {}] [{} {}]]",
        c.true_negative,
        c.false_positive,
        c.false_negative,
        c.true_positive
    );
    for point in &report.learning_curve {
        tracing::info!(
            "Learning curve: {} samples -> train {:.3}, test {:.3}",
            point.train_size,
            point.train_accuracy,
            point.test_accuracy
        );
    }
    for feature in &report.top_features {
        tracing::info!("Feature importance: {} = {:.4}", feature.feature, feature.importance);
    }
}
