//! Заполнение пропусков модой колонки

use std::collections::BTreeMap;

use crate::error::{Result, StressError};
use crate::preprocessing::SurveyTable;

pub struct ModeImputer {
    modes: Vec<Option<String>>,
    columns: Vec<String>,
    is_fitted: bool,
}

impl ModeImputer {
    pub fn new() -> Self {
        Self {
            modes: Vec::new(),
            columns: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn fit(&mut self, table: &SurveyTable) -> Result<()> {
        if table.is_empty() {
            return Err(StressError::EmptyDataset);
        }

        self.columns = table.columns().to_vec();
        self.modes = (0..self.columns.len())
            .map(|idx| column_mode(table.column(idx)))
            .collect();
        self.is_fitted = true;
        Ok(())
    }

    pub fn transform(&self, table: &mut SurveyTable) -> Result<usize> {
        if !self.is_fitted {
            return Err(StressError::NotTrained);
        }

        let mut filled = 0;
        for (col, name) in table.columns().to_vec().iter().enumerate() {
            let mode = match self.mode_of(name) {
                Some(mode) => mode.to_string(),
                // Колонка целиком пустая или не видна при обучении
                None => continue,
            };
            for row in 0..table.n_rows() {
                let cell = table.cell_mut(row, col);
                if cell.is_none() {
                    *cell = Some(mode.clone());
                    filled += 1;
                }
            }
        }

        Ok(filled)
    }

    pub fn fit_transform(&mut self, table: &mut SurveyTable) -> Result<usize> {
        self.fit(table)?;
        self.transform(table)
    }

    pub fn mode_of(&self, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.modes[idx].as_deref()
    }
}

impl Default for ModeImputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Самое частое значение колонки
///
/// При равенстве частот побеждает меньшее значение: численно, если все
/// значения колонки - числа, иначе лексикографически.
fn column_mode<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let max = counts.values().copied().max()?;
    let numeric: Option<Vec<f64>> = counts.keys().map(|v| parse_finite(v)).collect();
    // BTreeMap идет по возрастанию, поэтому первый из равных - наименьший лексикографически
    let mut tied = counts
        .iter()
        .enumerate()
        .filter(|(_, (_, count))| **count == max)
        .map(|(idx, (&value, _))| (idx, value));

    let best = match numeric {
        Some(numbers) => tied.min_by(|(a, _), (b, _)| numbers[*a].total_cmp(&numbers[*b])),
        None => tied.next(),
    };

    best.map(|(_, value)| value.to_string())
}

fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}
