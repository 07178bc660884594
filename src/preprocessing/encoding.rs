//! One-hot кодирование анкеты и схема признаков модели
//!
//! Схема строится один раз при обучении и хранит упорядоченный набор
//! колонок, который ожидает модель, вместе с типом каждой колонки.
//! Числовые поля идут первыми в порядке полей, затем dummy-колонки
//! категориальных полей (категории по возрастанию, первая отброшена).

use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StressError};
use crate::preprocessing::alignment;
use crate::preprocessing::SurveyTable;
use crate::types::{RawExample, RawValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericType {
    Integer,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// 0/1 индикатор категории
    Dummy,
    /// Числовое поле без изменений
    Numeric(NumericType),
}

impl ColumnKind {
    /// Приведение значения к типу колонки на этапе обучения
    pub fn coerce(self, value: f64) -> f64 {
        match self {
            ColumnKind::Dummy => {
                if value != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ColumnKind::Numeric(NumericType::Integer) => value.trunc(),
            ColumnKind::Numeric(NumericType::Float) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum FieldEncoding {
    Numeric { name: String, dtype: NumericType },
    /// `categories[0]` отброшена и кодируется нулями
    Categorical { name: String, categories: Vec<String> },
}

impl FieldEncoding {
    pub fn name(&self) -> &str {
        match self {
            FieldEncoding::Numeric { name, .. } | FieldEncoding::Categorical { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    target: String,
    positive_label: String,
    fields: Vec<FieldEncoding>,
    columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    pub fn fit(table: &SurveyTable, target: &str, positive_label: &str) -> Result<Self> {
        if table.is_empty() {
            return Err(StressError::EmptyDataset);
        }
        if table.column_index(target).is_none() {
            return Err(StressError::MissingColumn(target.to_string()));
        }

        let mut fields = Vec::new();
        for (idx, name) in table.columns().iter().enumerate() {
            if name == target {
                continue;
            }
            let values: Vec<&str> = table.column(idx).flatten().collect();
            fields.push(infer_field(name, &values));
        }

        let mut columns = Vec::new();
        // Сначала числовые поля, затем dummy-колонки
        for field in &fields {
            if let FieldEncoding::Numeric { name, dtype } = field {
                columns.push(ColumnSpec {
                    name: name.clone(),
                    kind: ColumnKind::Numeric(*dtype),
                });
            }
        }
        for field in &fields {
            if let FieldEncoding::Categorical { name, categories } = field {
                for category in categories.iter().skip(1) {
                    columns.push(ColumnSpec {
                        name: dummy_name(name, category),
                        kind: ColumnKind::Dummy,
                    });
                }
            }
        }

        tracing::debug!(
            "Feature schema: {} fields -> {} columns",
            fields.len(),
            columns.len()
        );

        Ok(Self {
            target: target.to_string(),
            positive_label: positive_label.to_string(),
            fields,
            columns,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn fields(&self) -> &[FieldEncoding] {
        &self.fields
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn expected_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Вектор признаков для одного сырого примера
    pub fn align(&self, raw: &RawExample) -> Array1<f64> {
        alignment::align_columns(&self.columns, raw)
    }

    /// Кодирует всю таблицу: матрица признаков и бинарные метки
    pub fn encode(&self, table: &SurveyTable) -> Result<(Array2<f64>, Array1<usize>)> {
        let target_idx = table
            .column_index(&self.target)
            .ok_or_else(|| StressError::MissingColumn(self.target.clone()))?;

        let kinds: HashMap<&str, &FieldEncoding> =
            self.fields.iter().map(|f| (f.name(), f)).collect();

        let mut records = Array2::zeros((table.n_rows(), self.n_features()));
        let mut targets = Array1::zeros(table.n_rows());

        for (i, row) in table.rows().iter().enumerate() {
            let mut raw = RawExample::new();
            for (col, name) in table.columns().iter().enumerate() {
                if col == target_idx {
                    continue;
                }
                let (Some(field), Some(cell)) = (kinds.get(name.as_str()), row[col].as_deref())
                else {
                    continue;
                };
                raw.insert(name.clone(), raw_value(field, cell));
            }

            records.row_mut(i).assign(&self.align(&raw));
            targets[i] = usize::from(row[target_idx].as_deref() == Some(self.positive_label.as_str()));
        }

        Ok((records, targets))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(writer, self)?;
        tracing::info!("Feature schema saved to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub fn dummy_name(field: &str, category: &str) -> String {
    format!("{}_{}", field, category)
}

fn infer_field(name: &str, values: &[&str]) -> FieldEncoding {
    let numeric = !values.is_empty() && values.iter().all(|v| v.parse::<f64>().is_ok());

    if numeric {
        let dtype = if values.iter().all(|v| v.parse::<i64>().is_ok()) {
            NumericType::Integer
        } else {
            NumericType::Float
        };
        return FieldEncoding::Numeric {
            name: name.to_string(),
            dtype,
        };
    }

    let categories: BTreeSet<&str> = values.iter().copied().collect();
    FieldEncoding::Categorical {
        name: name.to_string(),
        categories: categories.into_iter().map(str::to_string).collect(),
    }
}

fn raw_value(field: &FieldEncoding, cell: &str) -> RawValue {
    match field {
        FieldEncoding::Numeric { .. } => cell
            .parse::<f64>()
            .map(RawValue::Number)
            .unwrap_or_else(|_| RawValue::Text(cell.to_string())),
        FieldEncoding::Categorical { .. } => RawValue::Text(cell.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> SurveyTable {
        let csv = "Gender,age,Country,score,Growing_Stress\n\
                   Male,30,United States,0.5,Yes\n\
                   Female,41,Canada,1.5,No\n\
                   Male,25,Poland,2,Maybe\n";
        SurveyTable::from_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_columns_numeric_first_then_dummies_drop_first() {
        let schema = FeatureSchema::fit(&survey(), "Growing_Stress", "Yes").unwrap();
        assert_eq!(
            schema.expected_columns(),
            vec![
                "age",
                "score",
                "Gender_Male",
                "Country_Poland",
                "Country_United States"
            ]
        );
        assert_eq!(schema.columns()[0].kind, ColumnKind::Numeric(NumericType::Integer));
        assert_eq!(schema.columns()[1].kind, ColumnKind::Numeric(NumericType::Float));
        assert_eq!(schema.columns()[2].kind, ColumnKind::Dummy);
    }

    #[test]
    fn test_encode_table() {
        let table = survey();
        let schema = FeatureSchema::fit(&table, "Growing_Stress", "Yes").unwrap();
        let (records, targets) = schema.encode(&table).unwrap();

        assert_eq!(records.dim(), (3, 5));
        assert_eq!(records.row(0).to_vec(), vec![30.0, 0.5, 1.0, 0.0, 1.0]);
        // Canada и Female - базовые категории
        assert_eq!(records.row(1).to_vec(), vec![41.0, 1.5, 0.0, 0.0, 0.0]);
        assert_eq!(targets.to_vec(), vec![1, 0, 0]);
    }

    #[test]
    fn test_missing_target_column() {
        let result = FeatureSchema::fit(&survey(), "treatment", "Yes");
        assert!(matches!(result, Err(StressError::MissingColumn(c)) if c == "treatment"));
    }

    #[test]
    fn test_schema_json_roundtrip() {
        let schema = FeatureSchema::fit(&survey(), "Growing_Stress", "Yes").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");

        schema.save(&path).unwrap();
        let loaded = FeatureSchema::load(&path).unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(ColumnKind::Dummy.coerce(3.0), 1.0);
        assert_eq!(ColumnKind::Dummy.coerce(0.0), 0.0);
        assert_eq!(ColumnKind::Numeric(NumericType::Integer).coerce(30.9), 30.0);
        assert_eq!(ColumnKind::Numeric(NumericType::Float).coerce(30.9), 30.9);
    }
}
