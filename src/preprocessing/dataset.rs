//! Загрузка табличных данных анкеты
//!
//! Пропуском считается пустая ячейка и стандартные маркеры отсутствия
//! значения (`NA`, `N/A`, `NaN`, `null`, `None` и т.п.) после обрезки пробелов.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{Result, StressError};

/// Маркеры пропуска, совпадают с набором по умолчанию у pandas.read_csv
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

/// Таблица анкеты: заголовки и строки с опциональными ячейками
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl SurveyTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        if let Some(row) = rows.iter().find(|r| r.len() != columns.len()) {
            return Err(StressError::InvalidInput(format!(
                "row has {} cells, expected {}",
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let table = Self::from_reader(file)?;
        tracing::info!(
            "Loaded {} rows x {} columns from {}",
            table.n_rows(),
            table.columns.len(),
            path.as_ref().display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if is_missing(cell) {
                        None
                    } else {
                        Some(cell.trim().to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows.iter().map(move |row| row[idx].as_deref())
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut Option<String> {
        &mut self.rows[row][col]
    }

    /// Удаляет колонки по имени; отсутствующие имена пропускаются
    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i]))
            .collect();

        if keep.len() == self.columns.len() {
            return;
        }

        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].take()).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Timestamp,Gender,self_employed,Growing_Stress\n\
                       2014-08-27 11:29,Female,,Yes\n\
                       2014-08-27 11:31,Male,No,No\n";

    #[test]
    fn test_from_reader_marks_empty_cells_missing() {
        let table = SurveyTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.columns().len(), 4);
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows()[0][2], None);
        assert_eq!(table.rows()[1][2].as_deref(), Some("No"));
    }

    #[test]
    fn test_na_markers_are_missing() {
        let csv = "Gender,self_employed,Country,Growing_Stress\n\
                   Female,NA,NaN,Yes\n\
                   Male, null ,N/A,No\n\
                   Male,None,#N/A,nan\n\
                   Female,No,Namibia,NAN\n";
        let table = SurveyTable::from_reader(csv.as_bytes()).unwrap();

        for row in 0..3 {
            assert_eq!(table.rows()[row][1], None);
            assert_eq!(table.rows()[row][2], None);
        }
        assert_eq!(table.rows()[2][3], None);
        assert_eq!(table.rows()[3][1].as_deref(), Some("No"));
        assert_eq!(table.rows()[3][2].as_deref(), Some("Namibia"));
        // Регистр важен: "NAN" не маркер
        assert_eq!(table.rows()[3][3].as_deref(), Some("NAN"));
    }

    #[test]
    fn test_drop_columns() {
        let mut table = SurveyTable::from_reader(CSV.as_bytes()).unwrap();
        table.drop_columns(&["Timestamp".to_string(), "Unknown".to_string()]);
        assert_eq!(table.columns(), &["Gender", "self_employed", "Growing_Stress"]);
        assert_eq!(table.rows()[1][0].as_deref(), Some("Male"));
        assert_eq!(table.column_index("Timestamp"), None);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = SurveyTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![Some("1".to_string())]],
        );
        assert!(matches!(result, Err(StressError::InvalidInput(_))));
    }
}
