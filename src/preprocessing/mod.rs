/// Модуль предобработки данных

pub mod alignment;
pub mod dataset;
pub mod encoding;
pub mod imputation;

pub use alignment::{align, align_columns, encode_example};
pub use dataset::SurveyTable;
pub use encoding::{ColumnKind, ColumnSpec, FeatureSchema, FieldEncoding, NumericType};
pub use imputation::ModeImputer;
