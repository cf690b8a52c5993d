//! Run statements on BigQuery.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use gcp_bigquery_client::model::get_query_results_parameters::GetQueryResultsParameters;
use gcp_bigquery_client::model::get_query_results_response::GetQueryResultsResponse;
use gcp_bigquery_client::model::job_reference::JobReference;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::QueryResponse;
use gcp_bigquery_client::model::table_cell::TableCell;
use gcp_bigquery_client::model::table_field_schema::TableFieldSchema;
use gcp_bigquery_client::model::table_row::TableRow;
use gcp_bigquery_client::model::table_schema::TableSchema;
use gcp_bigquery_client::model::{query_parameter, query_parameter_type, query_parameter_value};
use serde_json::{Map, Value};

use query_engine_sql::sql::string::{Param, SQL};

use crate::error::Error;
use crate::warehouse::{RowSet, Warehouse};

/// A warehouse backed by a BigQuery client.
///
/// The client is created once at startup and shared by every request.
pub struct BigQuery {
    client: gcp_bigquery_client::Client,
    project_id: String,
    location: Option<String>,
}

impl BigQuery {
    /// Jobs are created in `project_id` and run in `location` when one is given.
    pub fn new(
        client: gcp_bigquery_client::Client,
        project_id: impl Into<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            client,
            project_id: project_id.into(),
            location,
        }
    }
}

#[async_trait]
impl Warehouse for BigQuery {
    async fn run(&self, query: &SQL) -> Result<RowSet, Error> {
        let query_request = make_query_request(query, self.location.as_deref());

        let rs = self
            .client
            .job()
            .query(&self.project_id, query_request)
            .await
            .map_err(|err| Error::Warehouse(err.to_string()))?;

        read_all_pages(rs.query_response().clone().into(), self).await
    }
}

#[async_trait]
impl PageSource for BigQuery {
    async fn next_page(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<ResultPage, Error> {
        let job_id = job.job_id.as_deref().ok_or(Error::MissingJobReference)?;
        let project_id = job.project_id.as_deref().unwrap_or(&self.project_id);
        let parameters = GetQueryResultsParameters {
            location: job.location.clone().or_else(|| self.location.clone()),
            page_token: page_token.map(str::to_string),
            ..GetQueryResultsParameters::default()
        };

        let response = self
            .client
            .job()
            .get_query_results(project_id, job_id, parameters)
            .await
            .map_err(|err| Error::Warehouse(err.to_string()))?;

        Ok(response.into())
    }
}

/// Build the request for a statement, binding each parameter by name with its type.
pub fn make_query_request(query: &SQL, location: Option<&str>) -> QueryRequest {
    let mut query_request = QueryRequest::new(query.sql.clone());
    query_request.location = location.map(str::to_string);

    if !query.params.is_empty() {
        query_request.parameter_mode = Some("NAMED".to_string());
        query_request.query_parameters = Some(
            query
                .params
                .iter()
                .map(|(name, param)| make_query_parameter(name, param))
                .collect(),
        );
    }

    query_request
}

fn make_query_parameter(name: &str, param: &Param) -> query_parameter::QueryParameter {
    let value = query_parameter_value::QueryParameterValue {
        array_values: None,
        struct_values: None,
        // an absent value is a NULL of the declared type
        value: param.value().map(str::to_string),
    };
    let value_type = query_parameter_type::QueryParameterType {
        array_type: None,
        struct_types: None,
        r#type: param.type_name().to_string(),
    };
    query_parameter::QueryParameter {
        name: Some(name.to_string()),
        parameter_type: Some(value_type),
        parameter_value: Some(value),
    }
}

/// One page of results of a query job, from `jobs.query` or `jobs.getQueryResults`.
#[derive(Debug, Clone, Default)]
pub struct ResultPage {
    pub job_complete: Option<bool>,
    pub job_reference: Option<JobReference>,
    pub page_token: Option<String>,
    pub schema: Option<TableSchema>,
    pub rows: Option<Vec<TableRow>>,
}

impl From<QueryResponse> for ResultPage {
    fn from(response: QueryResponse) -> Self {
        ResultPage {
            job_complete: response.job_complete,
            job_reference: response.job_reference,
            page_token: response.page_token,
            schema: response.schema,
            rows: response.rows,
        }
    }
}

impl From<GetQueryResultsResponse> for ResultPage {
    fn from(response: GetQueryResultsResponse) -> Self {
        ResultPage {
            job_complete: response.job_complete,
            job_reference: response.job_reference,
            page_token: response.page_token,
            schema: response.schema,
            rows: response.rows,
        }
    }
}

/// Fetches the results of a query job after its first response.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Without a page token this waits for the job and returns its first page.
    async fn next_page(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<ResultPage, Error>;
}

/// Wait until the job is complete, then read every page of its results.
pub async fn read_all_pages(first: ResultPage, source: &dyn PageSource) -> Result<RowSet, Error> {
    let job_reference = first.job_reference.clone();
    let mut page = first;
    let mut fields: Option<Vec<TableFieldSchema>> = None;
    let mut rows: Vec<TableRow> = vec![];

    loop {
        // rows and page tokens are only meaningful once the job is complete
        if page.job_complete != Some(false) {
            if fields.is_none() {
                fields = page.schema.take().and_then(|schema| schema.fields);
            }
            rows.extend(page.rows.take().unwrap_or_default());
            if page.page_token.is_none() {
                break;
            }
        }

        let job = job_reference.as_ref().ok_or(Error::MissingJobReference)?;
        let page_token = page.page_token.take();
        tracing::debug!(
            job_id = ?job.job_id,
            ?page_token,
            rows_so_far = rows.len(),
            "fetching more query results"
        );
        page = source.next_page(job, page_token.as_deref()).await?;
    }

    row_set(&fields.unwrap_or_default(), rows)
}

fn row_set(fields: &[TableFieldSchema], rows: Vec<TableRow>) -> Result<RowSet, Error> {
    let columns = fields.iter().map(|field| field.name.clone()).collect();
    let rows = rows
        .into_iter()
        .map(|row| convert_row(fields, row.columns.unwrap_or_default()))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(RowSet { columns, rows })
}

fn convert_row(fields: &[TableFieldSchema], cells: Vec<TableCell>) -> Result<Vec<Value>, Error> {
    if cells.len() != fields.len() {
        return Err(Error::UnexpectedRow(format!(
            "expected {} cells, got {}",
            fields.len(),
            cells.len()
        )));
    }
    fields
        .iter()
        .zip(cells)
        .map(|(field, cell)| convert_field(field, cell.value))
        .collect()
}

/// Convert the value of one field to JSON, following the field's schema.
///
/// Repeated fields arrive as `[{"v": ...}, ...]` and become arrays. Records arrive as
/// `{"f": [{"v": ...}, ...]}` and become objects keyed by the nested field names.
pub fn convert_field(field: &TableFieldSchema, value: Option<Value>) -> Result<Value, Error> {
    let value = match value {
        None | Some(Value::Null) => return Ok(Value::Null),
        Some(value) => value,
    };

    if field.mode.as_deref() != Some("REPEATED") {
        return convert_single(field, value);
    }

    let Value::Array(items) = value else {
        return Err(Error::UnexpectedRow(format!(
            "repeated field {} is not an array",
            field.name
        )));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut cell) => match cell.remove("v") {
                None | Some(Value::Null) => Ok(Value::Null),
                Some(value) => convert_single(field, value),
            },
            other => convert_single(field, other),
        })
        .collect::<Result<Vec<_>, Error>>()
        .map(Value::Array)
}

fn convert_single(field: &TableFieldSchema, value: Value) -> Result<Value, Error> {
    match CellType::of(field) {
        CellType::Record => convert_record(field, value),
        cell_type => Ok(convert_cell(cell_type, value)),
    }
}

fn convert_record(field: &TableFieldSchema, value: Value) -> Result<Value, Error> {
    let fields = field.fields.as_deref().unwrap_or_default();
    let row: TableRow = serde_json::from_value(value).map_err(|err| {
        Error::UnexpectedRow(format!("record field {} is malformed: {err}", field.name))
    })?;
    let cells = row.columns.unwrap_or_default();
    if cells.len() != fields.len() {
        return Err(Error::UnexpectedRow(format!(
            "record field {} has {} cells, expected {}",
            field.name,
            cells.len(),
            fields.len()
        )));
    }

    let mut record = Map::new();
    for (nested, cell) in fields.iter().zip(cells) {
        record.insert(nested.name.clone(), convert_field(nested, cell.value)?);
    }
    Ok(Value::Object(record))
}

/// How a scalar cell should be converted to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Integer,
    Float,
    Boolean,
    /// Seconds since the epoch, rendered as RFC 3339 in UTC.
    Timestamp,
    /// Nested fields.
    Record,
    /// Anything else keeps its textual form.
    Text,
}

impl CellType {
    fn of(field: &TableFieldSchema) -> CellType {
        match serde_json::to_value(&field.r#type) {
            Ok(Value::String(name)) => CellType::from_type_name(&name),
            _ => CellType::Text,
        }
    }

    pub fn from_type_name(name: &str) -> CellType {
        match name {
            "INTEGER" | "INT64" => CellType::Integer,
            "FLOAT" | "FLOAT64" => CellType::Float,
            "BOOLEAN" | "BOOL" => CellType::Boolean,
            "TIMESTAMP" => CellType::Timestamp,
            "RECORD" | "STRUCT" => CellType::Record,
            _ => CellType::Text,
        }
    }
}

/// Scalar cells arrive as strings. Numbers, booleans and timestamps are decoded; a value
/// that does not parse is kept as it was.
pub fn convert_cell(cell_type: CellType, value: Value) -> Value {
    let Value::String(text) = value else {
        return value;
    };

    match cell_type {
        CellType::Integer => text
            .parse::<i64>()
            .map_or(Value::String(text), Value::from),
        CellType::Float => text
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::String(text), Value::Number),
        CellType::Boolean => match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        CellType::Timestamp => Value::String(timestamp(&text).unwrap_or(text)),
        CellType::Record | CellType::Text => Value::String(text),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp(seconds: &str) -> Option<String> {
    let seconds = seconds.parse::<f64>().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    // microseconds are the finest precision the warehouse stores
    let micros = (seconds * 1_000_000.0).round() as i64;
    DateTime::from_timestamp_micros(micros)
        .map(|time| time.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::json;
    use similar_asserts::assert_eq;

    fn page(response: Value) -> ResultPage {
        serde_json::from_value::<QueryResponse>(response)
            .unwrap()
            .into()
    }

    fn field(schema: Value) -> TableFieldSchema {
        serde_json::from_value(schema).unwrap()
    }

    /// Answers with queued pages and remembers the tokens it was asked for.
    #[derive(Default)]
    struct Pages {
        pages: Mutex<VecDeque<ResultPage>>,
        requested: Mutex<Vec<Option<String>>>,
    }

    impl Pages {
        fn new(pages: Vec<ResultPage>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requested: Mutex::default(),
            }
        }

        fn requested(&self) -> Vec<Option<String>> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageSource for Pages {
        async fn next_page(
            &self,
            job: &JobReference,
            page_token: Option<&str>,
        ) -> Result<ResultPage, Error> {
            assert_eq!(job.job_id.as_deref(), Some("job_42"));
            self.requested
                .lock()
                .unwrap()
                .push(page_token.map(str::to_string));
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::Warehouse("no more pages".into()))
        }
    }

    const JOB: &str = "job_42";

    fn schema() -> Value {
        json!({"fields": [{"name": "x", "type": "INTEGER", "mode": "NULLABLE"}]})
    }

    #[test]
    fn parameters_are_named_and_typed() {
        let mut sql = SQL::new();
        sql.append_syntax("SELECT 1 FROM t WHERE chave = ");
        sql.append_param("ch", Param::String("ABC123".into()));
        sql.append_syntax(" AND d >= ");
        sql.append_param("s", Param::Date(None));

        let request = make_query_request(&sql, Some("southamerica-east1"));

        assert_eq!(request.query, sql.sql);
        assert_eq!(request.location.as_deref(), Some("southamerica-east1"));
        assert_eq!(request.parameter_mode.as_deref(), Some("NAMED"));
        let params = request.query_parameters.unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.as_deref(), Some("ch"));
        assert_eq!(params[0].parameter_type.as_ref().unwrap().r#type, "STRING");
        assert_eq!(
            params[0].parameter_value.as_ref().unwrap().value.as_deref(),
            Some("ABC123")
        );
        assert_eq!(params[1].name.as_deref(), Some("s"));
        assert_eq!(params[1].parameter_type.as_ref().unwrap().r#type, "DATE");
        assert_eq!(params[1].parameter_value.as_ref().unwrap().value, None);
    }

    #[test]
    fn statements_without_parameters_send_none() {
        let mut sql = SQL::new();
        sql.append_syntax("SELECT 1 AS ok");

        let request = make_query_request(&sql, None);

        assert!(request.query_parameters.is_none());
        assert!(request.parameter_mode.is_none());
        assert!(request.location.is_none());
    }

    #[tokio::test]
    async fn a_single_page_needs_no_further_requests() {
        let source = Pages::default();
        let first = page(json!({
            "jobComplete": true,
            "jobReference": {"jobId": JOB},
            "schema": schema(),
            "totalRows": "2",
            "rows": [{"f": [{"v": "1"}]}, {"f": [{"v": null}]}],
        }));

        let row_set = read_all_pages(first, &source).await.unwrap();

        assert_eq!(
            row_set,
            RowSet::new(vec!["x".into()], vec![vec![json!(1)], vec![Value::Null]])
        );
        assert!(source.requested().is_empty());
    }

    #[tokio::test]
    async fn every_page_is_read() {
        let source = Pages::new(vec![
            page(json!({
                "jobComplete": true,
                "pageToken": "page-3",
                "rows": [{"f": [{"v": "2"}]}],
            })),
            page(json!({
                "jobComplete": true,
                "rows": [{"f": [{"v": "3"}]}],
            })),
        ]);
        let first = page(json!({
            "jobComplete": true,
            "jobReference": {"jobId": JOB},
            "schema": schema(),
            "totalRows": "3",
            "pageToken": "page-2",
            "rows": [{"f": [{"v": "1"}]}],
        }));

        let row_set = read_all_pages(first, &source).await.unwrap();

        assert_eq!(
            row_set.rows,
            vec![vec![json!(1)], vec![json!(2)], vec![json!(3)]]
        );
        assert_eq!(
            source.requested(),
            vec![Some("page-2".to_string()), Some("page-3".to_string())]
        );
    }

    #[tokio::test]
    async fn incomplete_jobs_are_waited_for() {
        let source = Pages::new(vec![
            page(json!({"jobComplete": false})),
            page(json!({
                "jobComplete": true,
                "schema": schema(),
                "rows": [{"f": [{"v": "7"}]}],
            })),
        ]);
        let first = page(json!({
            "jobComplete": false,
            "jobReference": {"jobId": JOB, "location": "southamerica-east1"},
        }));

        let row_set = read_all_pages(first, &source).await.unwrap();

        assert_eq!(row_set, RowSet::new(vec!["x".into()], vec![vec![json!(7)]]));
        assert_eq!(source.requested(), vec![None, None]);
    }

    #[tokio::test]
    async fn failures_while_paging_are_reported() {
        let source = Pages::default();
        let first = page(json!({
            "jobComplete": true,
            "jobReference": {"jobId": JOB},
            "schema": schema(),
            "pageToken": "page-2",
            "rows": [{"f": [{"v": "1"}]}],
        }));

        let err = read_all_pages(first, &source).await.unwrap_err();

        assert_eq!(err, Error::Warehouse("no more pages".into()));
    }

    #[tokio::test]
    async fn more_pages_without_a_job_are_an_error() {
        let first = page(json!({"jobComplete": false}));

        let err = read_all_pages(first, &Pages::default()).await.unwrap_err();

        assert_eq!(err, Error::MissingJobReference);
    }

    #[tokio::test]
    async fn rows_must_match_the_schema() {
        let first = page(json!({
            "jobComplete": true,
            "schema": schema(),
            "rows": [{"f": [{"v": "1"}, {"v": "2"}]}],
        }));

        let err = read_all_pages(first, &Pages::default()).await.unwrap_err();

        assert!(matches!(err, Error::UnexpectedRow(_)), "{err:?}");
    }

    #[test]
    fn cells_follow_their_column_type() {
        assert_eq!(convert_cell(CellType::Integer, json!("42")), json!(42));
        assert_eq!(convert_cell(CellType::Float, json!("4.5")), json!(4.5));
        assert_eq!(convert_cell(CellType::Boolean, json!("true")), json!(true));
        assert_eq!(
            convert_cell(CellType::Text, json!("2024-01-05")),
            json!("2024-01-05")
        );
        let column = field(json!({"name": "n", "type": "INTEGER"}));
        assert_eq!(convert_field(&column, None).unwrap(), Value::Null);
        assert_eq!(convert_field(&column, Some(Value::Null)).unwrap(), Value::Null);
    }

    #[test]
    fn unparseable_values_keep_their_text() {
        assert_eq!(convert_cell(CellType::Integer, json!("n/a")), json!("n/a"));
        assert_eq!(convert_cell(CellType::Float, json!("NaN")), json!("NaN"));
        assert_eq!(
            convert_cell(CellType::Timestamp, json!("soon")),
            json!("soon")
        );
    }

    #[test]
    fn timestamps_are_rfc3339() {
        assert_eq!(
            convert_cell(CellType::Timestamp, json!("1.7146944E9")),
            json!("2024-05-03T00:00:00Z")
        );
        assert_eq!(
            convert_cell(CellType::Timestamp, json!("1714694400.25")),
            json!("2024-05-03T00:00:00.250Z")
        );
    }

    #[test]
    fn records_become_objects() {
        let column = field(json!({
            "name": "armadilha",
            "type": "RECORD",
            "fields": [
                {"name": "chave", "type": "STRING"},
                {"name": "qtd", "type": "INTEGER"},
                {"name": "lida_em", "type": "TIMESTAMP"},
            ],
        }));

        let value = convert_field(
            &column,
            Some(json!({"f": [{"v": "ARM-0001"}, {"v": "5"}, {"v": "1.7146944E9"}]})),
        )
        .unwrap();

        assert_eq!(
            value,
            json!({"chave": "ARM-0001", "qtd": 5, "lida_em": "2024-05-03T00:00:00Z"})
        );
    }

    #[test]
    fn repeated_fields_become_arrays() {
        let counts = field(json!({"name": "qtds", "type": "INTEGER", "mode": "REPEATED"}));
        assert_eq!(
            convert_field(&counts, Some(json!([{"v": "1"}, {"v": "2"}]))).unwrap(),
            json!([1, 2])
        );

        let weeks = field(json!({
            "name": "semanas",
            "type": "RECORD",
            "mode": "REPEATED",
            "fields": [
                {"name": "semana", "type": "INTEGER"},
                {"name": "qtd", "type": "INTEGER"},
            ],
        }));
        assert_eq!(
            convert_field(
                &weeks,
                Some(json!([
                    {"v": {"f": [{"v": "1"}, {"v": "3"}]}},
                    {"v": {"f": [{"v": "2"}, {"v": null}]}},
                ]))
            )
            .unwrap(),
            json!([{"semana": 1, "qtd": 3}, {"semana": 2, "qtd": null}])
        );
    }

    #[test]
    fn type_names_cover_legacy_and_standard_spellings() {
        assert_eq!(CellType::from_type_name("INT64"), CellType::Integer);
        assert_eq!(CellType::from_type_name("INTEGER"), CellType::Integer);
        assert_eq!(CellType::from_type_name("FLOAT64"), CellType::Float);
        assert_eq!(CellType::from_type_name("BOOL"), CellType::Boolean);
        assert_eq!(CellType::from_type_name("STRUCT"), CellType::Record);
        assert_eq!(CellType::from_type_name("TIMESTAMP"), CellType::Timestamp);
        assert_eq!(CellType::from_type_name("NUMERIC"), CellType::Text);
        assert_eq!(CellType::from_type_name("DATE"), CellType::Text);
    }
}
