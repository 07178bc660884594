#![allow(dead_code)]

use stress_ml::config::{DataConfig, TrainingConfig};
use stress_ml::{RawExample, RawValue, SurveyTable};

const GENDERS: [&str; 2] = ["Female", "Male"];
const COUNTRIES: [&str; 5] = ["Canada", "Poland", "United Kingdom", "United States", "India"];
const OCCUPATIONS: [&str; 3] = ["Corporate", "Housewife", "Student"];
const DAYS_INDOORS: [&str; 3] = ["1-14 days", "Go out Every day", "More than 2 months"];

/// Синтетическая анкета: Growing_Stress = Yes ровно когда Coping_Struggles = Yes
pub fn survey_csv(n_rows: usize) -> String {
    let mut csv = String::from(
        "Timestamp,Gender,Country,Occupation,self_employed,Days_Indoors,Growing_Stress,Coping_Struggles\n",
    );
    for i in 0..n_rows {
        let coping = if i % 2 == 0 { "Yes" } else { "No" };
        let stress = match (coping, i % 4) {
            ("Yes", _) => "Yes",
            (_, 1) => "Maybe",
            _ => "No",
        };
        let self_employed = if i % 5 == 0 { "" } else if i % 3 == 0 { "Yes" } else { "No" };
        csv.push_str(&format!(
            "2014-08-27 11:{:02},{},{},{},{},{},{},{}\n",
            i % 60,
            GENDERS[i % 3 % 2],
            COUNTRIES[i % 5],
            OCCUPATIONS[i % 7 % 3],
            self_employed,
            DAYS_INDOORS[i % 3],
            stress,
            coping,
        ));
    }
    csv
}

pub fn survey_table(n_rows: usize) -> SurveyTable {
    SurveyTable::from_reader(survey_csv(n_rows).as_bytes()).unwrap()
}

/// Поля строки `i` синтетической анкеты
pub fn row_example(i: usize) -> RawExample {
    let coping = if i % 2 == 0 { "Yes" } else { "No" };
    [
        ("Gender", GENDERS[i % 3 % 2]),
        ("Country", COUNTRIES[i % 5]),
        ("Occupation", OCCUPATIONS[i % 7 % 3]),
        ("self_employed", "No"),
        ("Days_Indoors", DAYS_INDOORS[i % 3]),
        ("Coping_Struggles", coping),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), RawValue::from(v)))
    .collect()
}

pub fn data_config() -> DataConfig {
    DataConfig::default()
}

pub fn training_config() -> TrainingConfig {
    TrainingConfig {
        test_ratio: 0.2,
        seed: 7,
        learning_curve_steps: 4,
        top_features: 5,
    }
}
