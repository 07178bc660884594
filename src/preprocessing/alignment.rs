//! Выравнивание сырого примера по колонкам обученной модели
//!
//! Пример кодируется так же, как обучающая таблица: текстовое значение
//! `v` поля `f` превращается в колонку `f_v` со значением 1, число
//! проходит под именем поля. Колонки без совпадения остаются нулевыми.
//! Это касается и отброшенной базовой категории, и категорий, которых
//! не было при обучении: оба случая дают одинаковые нули и ошибкой не
//! считаются. Поле со значением `null` или `true`/`false` ведет себя как
//! отсутствующее.

use std::collections::HashMap;

use ndarray::Array1;

use crate::preprocessing::encoding::{dummy_name, ColumnKind, ColumnSpec, NumericType};
use crate::types::{RawExample, RawValue};

/// One-hot кодирование одного примера: имя колонки -> значение
pub fn encode_example(raw: &RawExample) -> HashMap<String, f64> {
    let mut encoded: HashMap<String, f64> = HashMap::with_capacity(raw.len());

    for (field, value) in raw {
        let (name, value) = match value {
            RawValue::Text(category) => (dummy_name(field, category), 1.0),
            RawValue::Number(n) if n.is_finite() => (field.clone(), *n),
            RawValue::Number(_) | RawValue::Unsupported(_) => continue,
        };

        // Коллизия имен (например `Gender` и `Gender_Male`): берем большее,
        // чтобы результат не зависел от порядка ключей
        encoded
            .entry(name)
            .and_modify(|v| *v = v.max(value))
            .or_insert(value);
    }

    encoded
}

/// Выравнивание по типизированным колонкам схемы
pub fn align_columns(columns: &[ColumnSpec], raw: &RawExample) -> Array1<f64> {
    let encoded = encode_example(raw);
    let mut features = Array1::zeros(columns.len());

    for (i, column) in columns.iter().enumerate() {
        if let Some(&value) = encoded.get(&column.name) {
            features[i] = column.kind.coerce(value);
        }
    }

    features
}

/// Выравнивание по голому списку колонок, все колонки считаются float
pub fn align(expected_columns: &[String], raw: &RawExample) -> Array1<f64> {
    let columns: Vec<ColumnSpec> = expected_columns
        .iter()
        .map(|name| ColumnSpec {
            name: name.clone(),
            kind: ColumnKind::Numeric(NumericType::Float),
        })
        .collect();
    align_columns(&columns, raw)
}
