//! Shape rows into the JSON bodies returned to callers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::warehouse::RowSet;

/// The generic tabular body: `{ columns, rows }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

/// Columns are the fields of the first row. No rows means no columns either; the schema is
/// not consulted.
pub fn envelope(row_set: RowSet) -> Envelope {
    if row_set.is_empty() {
        return Envelope {
            columns: vec![],
            rows: vec![],
        };
    }
    let columns = row_set.columns.clone();
    Envelope {
        columns,
        rows: row_set.into_records(),
    }
}

/// The latest capture for a trap key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestCapture {
    /// `YYYY-MM-DD`, or `null` when nothing has been captured yet.
    pub sk_data: Option<String>,
    /// Passed through as the view returns it, `null` included.
    #[serde(deserialize_with = "nullable_integer")]
    pub qtd: Option<i64>,
}

impl LatestCapture {
    pub fn none() -> Self {
        Self {
            sk_data: None,
            qtd: Some(0),
        }
    }
}

/// The first row, or `{ sk_data: null, qtd: 0 }` when there is none.
pub fn latest_capture(row_set: RowSet) -> Result<LatestCapture, Error> {
    match row_set.into_records().into_iter().next() {
        None => Ok(LatestCapture::none()),
        Some(record) => decode(record),
    }
}

/// Capture totals for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekTotal {
    #[serde(deserialize_with = "integer")]
    pub ano: i64,
    #[serde(deserialize_with = "integer")]
    pub semana: i64,
    #[serde(deserialize_with = "nullable_integer")]
    pub qtd: Option<i64>,
}

/// The weekly series body. `series` is always present, also in error bodies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySeries {
    pub series: Vec<WeekTotal>,
}

/// Every row, in the order the warehouse returned them.
pub fn weekly_series(row_set: RowSet) -> Result<WeeklySeries, Error> {
    let series = row_set
        .into_records()
        .into_iter()
        .map(decode)
        .collect::<Result<Vec<WeekTotal>, Error>>()?;
    Ok(WeeklySeries { series })
}

fn decode<T: serde::de::DeserializeOwned>(record: Map<String, Value>) -> Result<T, Error> {
    serde_json::from_value(Value::Object(record)).map_err(|err| Error::UnexpectedRow(err.to_string()))
}

/// Integers may come back as numbers or as numeric text (e.g. `NUMERIC` columns).
fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    nullable_integer(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("unexpected null integer"))
}

fn nullable_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Integer {
        Number(i64),
        Text(String),
        Null(()),
    }

    match Integer::deserialize(deserializer)? {
        Integer::Number(value) => Ok(Some(value)),
        Integer::Null(()) => Ok(None),
        Integer::Text(text) => text
            .parse::<i64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("{text:?} is not an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use similar_asserts::assert_eq;

    fn week(ano: i64, semana: i64, qtd: i64) -> Vec<Value> {
        vec![json!(ano), json!(semana), json!(qtd)]
    }

    #[test]
    fn envelope_takes_columns_from_the_rows() {
        let row_set = RowSet::new(
            vec!["CHAVE".into(), "QTD".into()],
            vec![vec![json!("A1"), json!(3)], vec![json!("A2"), Value::Null]],
        );

        let body = serde_json::to_value(envelope(row_set)).unwrap();

        assert_eq!(
            body,
            json!({
                "columns": ["CHAVE", "QTD"],
                "rows": [
                    {"CHAVE": "A1", "QTD": 3},
                    {"CHAVE": "A2", "QTD": null},
                ]
            })
        );
    }

    #[test]
    fn empty_results_have_no_columns() {
        let row_set = RowSet::new(vec!["CHAVE".into(), "QTD".into()], vec![]);

        let body = serde_json::to_value(envelope(row_set)).unwrap();

        assert_eq!(body, json!({"columns": [], "rows": []}));
    }

    #[test]
    fn latest_capture_reads_the_first_row() {
        let row_set = RowSet::new(
            vec!["sk_data".into(), "qtd".into()],
            vec![vec![json!("2024-05-03"), json!(7)]],
        );

        assert_eq!(
            latest_capture(row_set).unwrap(),
            LatestCapture {
                sk_data: Some("2024-05-03".into()),
                qtd: Some(7)
            }
        );
    }

    #[test]
    fn no_capture_yet_is_not_an_error() {
        let row_set = RowSet::new(vec!["sk_data".into(), "qtd".into()], vec![]);

        let body = serde_json::to_value(latest_capture(row_set).unwrap()).unwrap();

        assert_eq!(body, json!({"sk_data": null, "qtd": 0}));
    }

    #[test]
    fn counts_may_be_numeric_text() {
        let row_set = RowSet::new(
            vec!["sk_data".into(), "qtd".into()],
            vec![vec![json!("2024-05-03"), json!("12")]],
        );

        assert_eq!(latest_capture(row_set).unwrap().qtd, Some(12));
    }

    #[test]
    fn null_counts_are_passed_through() {
        let row_set = RowSet::new(
            vec!["sk_data".into(), "qtd".into()],
            vec![vec![json!("2024-05-03"), Value::Null]],
        );

        let body = serde_json::to_value(latest_capture(row_set).unwrap()).unwrap();

        assert_eq!(body, json!({"sk_data": "2024-05-03", "qtd": null}));
    }

    #[test]
    fn null_weekly_counts_stay_null() {
        let row_set = RowSet::new(
            vec!["ano".into(), "semana".into(), "qtd".into()],
            vec![vec![json!(2024), json!(3), Value::Null]],
        );

        let body = serde_json::to_value(weekly_series(row_set).unwrap()).unwrap();

        assert_eq!(body, json!({"series": [{"ano": 2024, "semana": 3, "qtd": null}]}));
    }

    #[test]
    fn weekly_series_keeps_the_row_order() {
        let row_set = RowSet::new(
            vec!["ano".into(), "semana".into(), "qtd".into()],
            vec![week(2023, 52, 4), week(2024, 1, 0), week(2024, 2, 9)],
        );

        let body = serde_json::to_value(weekly_series(row_set).unwrap()).unwrap();

        assert_eq!(
            body,
            json!({"series": [
                {"ano": 2023, "semana": 52, "qtd": 4},
                {"ano": 2024, "semana": 1, "qtd": 0},
                {"ano": 2024, "semana": 2, "qtd": 9},
            ]})
        );
    }

    #[test]
    fn rows_of_the_wrong_shape_are_upstream_errors() {
        let row_set = RowSet::new(vec!["ano".into()], vec![vec![json!("twenty")]]);

        let err = weekly_series(row_set).unwrap_err();

        assert!(matches!(err, Error::UnexpectedRow(_)), "{err:?}");
    }
}
