use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use super::error::DataError;
use super::model::{parse_item_column, Attribute, Respondent, SurveyTable};

/// Header of the respondent identifier column.
pub const ID_COLUMN: &str = "ID";

// ---------------------------------------------------------------------------
// Source address
// ---------------------------------------------------------------------------

/// Where the survey CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local file.
    Path(PathBuf),
    /// `http://` or `https://` address fetched with a single GET.
    Url(String),
}

impl DataSource {
    /// Interpret a configured address. Anything without an http(s) scheme
    /// is a filesystem path.
    pub fn parse(address: &str) -> Self {
        let trimmed = address.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(p) => write!(f, "{}", p.display()),
            DataSource::Url(u) => write!(f, "{u}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch and parse the survey table from `source`.
///
/// Item cells that are not numbers become missing; only an unreachable
/// source or a document that is not a CSV table fails.
pub fn load(source: &DataSource) -> std::result::Result<SurveyTable, DataError> {
    let table = read_source(source).map_err(|e| {
        log::error!("Failed to load survey from {source}: {e:#}");
        DataError::unavailable(source.to_string(), format!("{e:#}"))
    })?;
    log::info!(
        "Loaded {} respondents from {source} with columns {:?}",
        table.len(),
        table.columns
    );
    Ok(table)
}

/// Parse a survey CSV from any reader.
pub fn parse_csv<R: Read>(reader: R) -> std::result::Result<SurveyTable, DataError> {
    parse_table(reader).map_err(|e| DataError::unavailable("<reader>", format!("{e:#}")))
}

fn read_source(source: &DataSource) -> Result<SurveyTable> {
    match source {
        DataSource::Path(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            parse_table(file)
        }
        DataSource::Url(url) => {
            let body = fetch_url(url)?;
            parse_table(body.as_bytes())
        }
    }
}

fn fetch_url(url: &str) -> Result<String> {
    let response = reqwest::blocking::get(url)
        .context("sending request")?
        .error_for_status()
        .context("server returned an error status")?;
    response.text().context("reading response body")
}

// ---------------------------------------------------------------------------
// CSV parsing
// ---------------------------------------------------------------------------

/// What the loader does with each source column.
#[derive(Debug, Clone, PartialEq)]
enum ColumnRole {
    Id,
    Attribute(Attribute),
    /// 1-based item number.
    Item(usize),
    Extra(String),
}

fn column_roles(headers: &[String]) -> Vec<ColumnRole> {
    let mut roles: Vec<ColumnRole> = Vec::with_capacity(headers.len());
    for name in headers {
        let role = if name == ID_COLUMN {
            ColumnRole::Id
        } else if let Some(attr) = Attribute::from_column(name) {
            ColumnRole::Attribute(attr)
        } else if let Some(n) = parse_item_column(name) {
            ColumnRole::Item(n)
        } else {
            ColumnRole::Extra(name.clone())
        };
        // A repeated header keeps only its first occurrence meaningful.
        let role = if role != ColumnRole::Extra(name.clone()) && roles.contains(&role) {
            ColumnRole::Extra(name.clone())
        } else {
            role
        };
        roles.push(role);
    }
    roles
}

/// Coerce one item cell; anything that is not a finite number is missing.
fn parse_item(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_table<R: Read>(reader: R) -> Result<SurveyTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        bail!("document has no header row");
    }

    let roles = column_roles(&headers);
    let mut item_columns: Vec<usize> = roles
        .iter()
        .filter_map(|r| match r {
            ColumnRole::Item(n) => Some(*n),
            _ => None,
        })
        .collect();
    item_columns.sort_unstable();

    let mut respondents = Vec::new();
    let mut coerced = 0usize;

    for (i, result) in reader.records().enumerate() {
        // 1-based data row, header excluded.
        let row_no = i + 1;
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut respondent = Respondent::new(String::new());
        for (cell, role) in record.iter().zip(&roles) {
            match role {
                ColumnRole::Id => respondent.id = cell.trim().to_string(),
                ColumnRole::Attribute(attr) => {
                    let value = cell.trim();
                    if !value.is_empty() {
                        respondent.attributes.insert(*attr, value.to_string());
                    }
                }
                ColumnRole::Item(n) => {
                    let value = parse_item(cell);
                    if value.is_none() && !cell.trim().is_empty() {
                        coerced += 1;
                    }
                    respondent.items[n - 1] = value;
                }
                ColumnRole::Extra(name) => {
                    respondent.extra.insert(name.clone(), cell.to_string());
                }
            }
        }
        if respondent.id.is_empty() {
            respondent.id = format!("row {row_no}");
        }
        respondents.push(respondent);
    }

    if coerced > 0 {
        log::warn!("{coerced} item cells were not numeric and are treated as missing");
    }

    Ok(SurveyTable::from_respondents(headers, item_columns, respondents))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID,Gender,AgeGroup,Department,Tenure,Q1,Q2,Q3,Q4,Q5,Q6,Q7,Q8,Q9,Q10,Q11,Q12,Q13";

    fn csv_doc(rows: &[&str]) -> String {
        let mut doc = String::from(HEADER);
        for row in rows {
            doc.push('\n');
            doc.push_str(row);
        }
        doc.push('\n');
        doc
    }

    #[test]
    fn parses_full_schema() {
        let doc = csv_doc(&[
            "E001,Female,30-39,Sales,2-5 years,4,2,3,3,5,5,4,4,3,3,2,3,4",
            "E002,Male,22-29,IT,0-1 year,5,5,4,4,3,3,2,2,1,1,5,5,5",
        ]);
        let table = parse_csv(doc.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.item_columns, (1..=13).collect::<Vec<_>>());
        let first = &table.respondents[0];
        assert_eq!(first.id, "E001");
        assert_eq!(first.attribute(Attribute::Department), Some("Sales"));
        assert_eq!(first.item(1), Some(4.0));
        assert_eq!(first.item(13), Some(4.0));
        assert_eq!(table.options(Attribute::AgeGroup), ["22-29", "30-39"]);
    }

    #[test]
    fn malformed_item_cells_become_missing_and_row_is_kept() {
        let doc = csv_doc(&[
            "E001,Female,30-39,Sales,2-5 years,four,,3,NaN,5,5,4,4,3,3,2,3,4",
            "E002,Male,22-29,IT,0-1 year, 5 ,5,4,4,3,3,2,2,1,1,5,5,inf",
        ]);
        let table = parse_csv(doc.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.respondents[0];
        assert_eq!(first.item(1), None);
        assert_eq!(first.item(2), None);
        assert_eq!(first.item(3), Some(3.0));
        assert_eq!(first.item(4), None);
        let second = &table.respondents[1];
        assert_eq!(second.item(1), Some(5.0));
        assert_eq!(second.item(13), None);
    }

    #[test]
    fn absent_columns_are_not_synthesized_and_extras_carry_through() {
        let doc = "ID,Department,Q1,Q2,Site\nA,Sales,4,2,Berlin\nB,IT,1,1,Paris\n";
        let table = parse_csv(doc.as_bytes()).unwrap();

        assert_eq!(table.item_columns, vec![1, 2]);
        assert!(!table.has_column("Gender"));
        assert!(table.options(Attribute::Gender).is_empty());
        let a = &table.respondents[0];
        assert_eq!(a.attribute(Attribute::Gender), None);
        assert_eq!(a.item(3), None);
        assert_eq!(a.extra.get("Site").map(String::as_str), Some("Berlin"));
    }

    #[test]
    fn missing_identifier_falls_back_to_row_number() {
        let doc = "ID,Q1\n,3\nX,4\n";
        let table = parse_csv(doc.as_bytes()).unwrap();
        assert_eq!(table.respondents[0].id, "row 1");
        assert_eq!(table.respondents[1].id, "X");

        let no_id = "Q1\n3\n";
        let table = parse_csv(no_id.as_bytes()).unwrap();
        assert_eq!(table.respondents[0].id, "row 1");
    }

    #[test]
    fn empty_attribute_cell_means_no_value() {
        let doc = "ID,Gender,Q1\nA,,3\n";
        let table = parse_csv(doc.as_bytes()).unwrap();
        assert_eq!(table.respondents[0].attribute(Attribute::Gender), None);
        assert!(table.options(Attribute::Gender).is_empty());
    }

    #[test]
    fn attribute_cells_are_trimmed_and_blank_means_no_value() {
        let doc = "ID,Department,Q1\nA,Sales,3\nB, ,3\nC,Sales ,3\n";
        let table = parse_csv(doc.as_bytes()).unwrap();
        assert_eq!(table.options(Attribute::Department), ["Sales"]);
        assert_eq!(table.respondents[1].attribute(Attribute::Department), None);
        assert_eq!(table.respondents[2].attribute(Attribute::Department), Some("Sales"));
    }

    #[test]
    fn fallback_id_and_error_context_share_row_numbering() {
        let doc = "ID,Q1\nA,1\n,2\nC\n";
        let err = parse_csv(doc.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("CSV row 3"), "{err}");

        let table = parse_csv("ID,Q1\nA,1\n,2\n".as_bytes()).unwrap();
        assert_eq!(table.respondents[1].id, "row 2");
    }

    #[test]
    fn ragged_rows_are_unavailable() {
        let doc = "ID,Gender,Q1\nA,Female,3\nB,Male\n";
        let err = parse_csv(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn empty_document_is_unavailable() {
        let err = parse_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn header_only_document_is_an_empty_table() {
        let table = parse_csv(HEADER.as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 18);
    }

    #[test]
    fn repeated_item_header_keeps_first_column() {
        let doc = "ID,Q1,Q1\nA,4,1\n";
        let table = parse_csv(doc.as_bytes()).unwrap();
        assert_eq!(table.respondents[0].item(1), Some(4.0));
        assert_eq!(table.respondents[0].extra.get("Q1").map(String::as_str), Some("1"));
    }

    #[test]
    fn source_address_detection() {
        assert_eq!(
            DataSource::parse("https://example.com/export?format=csv"),
            DataSource::Url("https://example.com/export?format=csv".to_string())
        );
        assert_eq!(
            DataSource::parse(" data/survey.csv "),
            DataSource::Path(PathBuf::from("data/survey.csv"))
        );
    }

    #[test]
    fn load_reads_local_file() {
        let path = std::env::temp_dir().join(format!("perma_loader_{}.csv", std::process::id()));
        std::fs::write(&path, csv_doc(&["E1,Female,40-49,HR,10+ years,1,2,3,4,5,1,2,3,4,5,1,2,3"]))
            .unwrap();

        let table = load(&DataSource::Path(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert_eq!(table.respondents[0].attribute(Attribute::Tenure), Some("10+ years"));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let source = DataSource::parse("/definitely/not/here/survey.csv");
        match load(&source) {
            Err(DataError::DataUnavailable { source_addr, .. }) => {
                assert_eq!(source_addr, "/definitely/not/here/survey.csv");
            }
            other => panic!("expected DataUnavailable, got {other:?}"),
        }
    }
}
