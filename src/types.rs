/// Типы данных для ML модуля

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Сырое значение поля анкеты: число или категория
///
/// `null`, булевы значения и вложенные структуры попадают в `Unsupported`
/// и при кодировании пропускаются, как отсутствующее поле.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Unsupported(serde_json::Value),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

/// Пример для предсказания: имя исходного поля -> значение
pub type RawExample = HashMap<String, RawValue>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionOutput {
    pub label: usize,
    pub growing_stress: bool,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignedFeatures {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningCurvePoint {
    pub train_size: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub model: String,
    pub trained_at: DateTime<Utc>,
    pub train_samples: usize,
    pub test_samples: usize,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub confusion: ConfusionCounts,
    pub learning_curve: Vec<LearningCurvePoint>,
    #[serde(default)]
    pub top_features: Vec<FeatureImportance>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_untagged_json() {
        let example: RawExample =
            serde_json::from_str(r#"{"age": 30, "Gender": "Male"}"#).unwrap();
        assert_eq!(example.get("age"), Some(&RawValue::Number(30.0)));
        assert_eq!(example.get("Gender"), Some(&RawValue::Text("Male".to_string())));
    }

    #[test]
    fn test_null_and_bool_fields_deserialize() {
        let example: RawExample =
            serde_json::from_str(r#"{"Gender": null, "self_employed": true, "Country": "Canada"}"#)
                .unwrap();
        assert_eq!(
            example.get("Gender"),
            Some(&RawValue::Unsupported(serde_json::Value::Null))
        );
        assert_eq!(
            example.get("self_employed"),
            Some(&RawValue::Unsupported(serde_json::Value::Bool(true)))
        );
        assert_eq!(example.get("Country"), Some(&RawValue::from("Canada")));
    }
}
