//! Spreadsheet report generation.
//!
//! This module turns sorted records into review rows and writes them as an
//! Excel workbook whose Status column only accepts the review statuses.
//! A JSON rendition of the same rows is available for tooling.

use crate::models::{Record, Status};
use anyhow::{ensure, Context, Result};
use rust_xlsxwriter::{DataValidation, Format, Workbook};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Column headers, in output order.
pub const HEADERS: [&str; 5] = [
    "Folder Path",
    "Script Name",
    "Test Case ID",
    "Status",
    "Bug # (if applicable)",
];

/// Zero-based index of the Status column.
pub const STATUS_COLUMN: u16 = 3;

const COLUMN_WIDTHS: [f64; 5] = [24.0, 40.0, 14.0, 12.0, 22.0];

/// One review row of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Folder Path")]
    pub folder_path: String,
    #[serde(rename = "Script Name")]
    pub script_name: String,
    #[serde(rename = "Test Case ID")]
    pub test_case_id: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<Status>,
    #[serde(rename = "Bug # (if applicable)")]
    pub bug: Option<String>,
}

impl From<&Record> for ReportRow {
    fn from(record: &Record) -> Self {
        Self {
            folder_path: record.folder_name.clone(),
            script_name: record.script_name.clone(),
            test_case_id: record.test_case_id.as_ref().map(|id| id.to_string()),
            status: None,
            bug: None,
        }
    }
}

impl ReportRow {
    /// Cell values in column order; `None` is an empty cell.
    pub fn cells(&self) -> [Option<String>; 5] {
        [
            Some(self.folder_path.clone()),
            Some(self.script_name.clone()),
            self.test_case_id.clone(),
            self.status.map(|s| s.to_string()),
            self.bug.clone(),
        ]
    }
}

/// List restriction applied to the Status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusValidation {
    pub choices: Vec<Status>,
    pub allow_blank: bool,
    pub error_title: String,
    pub error_message: String,
    pub prompt_title: String,
    pub prompt_message: String,
}

impl Default for StatusValidation {
    fn default() -> Self {
        Self {
            choices: Status::ALL.to_vec(),
            allow_blank: true,
            error_title: "Invalid Input".to_string(),
            error_message: "Invalid status selected".to_string(),
            prompt_title: "Status Selection".to_string(),
            prompt_message: "Select a status".to_string(),
        }
    }
}

impl StatusValidation {
    /// Whether `value` may be entered in a Status cell.
    pub fn accepts(&self, value: &str) -> bool {
        (value.is_empty() && self.allow_blank)
            || self.choices.iter().any(|choice| choice.to_string() == value)
    }

    fn to_data_validation(&self) -> Result<DataValidation> {
        let choices: Vec<String> = self.choices.iter().map(|s| s.to_string()).collect();

        let validation = DataValidation::new()
            .allow_list_strings(choices.as_slice())
            .context("Invalid status list")?
            .ignore_blank(self.allow_blank)
            .set_error_title(&self.error_title)
            .context("Invalid validation error title")?
            .set_error_message(&self.error_message)
            .context("Invalid validation error message")?
            .set_input_title(&self.prompt_title)
            .context("Invalid validation prompt title")?
            .set_input_message(&self.prompt_message)
            .context("Invalid validation prompt message")?;

        Ok(validation)
    }
}

/// Workbook layout settings.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Name of the single worksheet.
    pub sheet_name: String,
    /// Restriction on the Status column.
    pub status_validation: StatusValidation,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            status_validation: StatusValidation::default(),
        }
    }
}

impl From<&crate::config::ReportConfig> for ReportOptions {
    fn from(config: &crate::config::ReportConfig) -> Self {
        Self {
            sheet_name: config.sheet_name.clone(),
            status_validation: StatusValidation {
                choices: config.status_choices.clone(),
                ..StatusValidation::default()
            },
        }
    }
}

/// Tabulate records, one row each, with blank review columns.
pub fn build_rows(records: &[Record]) -> Vec<ReportRow> {
    records.iter().map(ReportRow::from).collect()
}

/// Write the rows to an Excel workbook at `path`.
pub fn write_xlsx_report(rows: &[ReportRow], path: &Path, options: &ReportOptions) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&options.sheet_name)
        .with_context(|| format!("Invalid worksheet name: {}", options.sheet_name))?;

    let header_format = Format::new().set_bold();
    for (col, header) in (0u16..).zip(HEADERS) {
        worksheet.write_string_with_format(0, col, header, &header_format)?;
    }
    for (col, width) in (0u16..).zip(COLUMN_WIDTHS) {
        worksheet.set_column_width(col, width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (i, row) in rows.iter().enumerate() {
        if let Some(status) = row.status {
            ensure!(
                options.status_validation.accepts(&status.to_string()),
                "Status {} is not one of the allowed choices",
                status
            );
        }

        let row_num = u32::try_from(i + 1).context("Too many rows for a worksheet")?;
        for (col, cell) in (0u16..).zip(row.cells()) {
            if let Some(value) = cell {
                worksheet
                    .write_string(row_num, col, value)
                    .with_context(|| format!("Failed to write row {}", row_num + 1))?;
            }
        }
    }

    if !rows.is_empty() {
        let last_row = u32::try_from(rows.len()).context("Too many rows for a worksheet")?;
        let validation = options.status_validation.to_data_validation()?;
        worksheet.add_data_validation(1, STATUS_COLUMN, last_row, STATUS_COLUMN, &validation)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write spreadsheet to {}", path.display()))?;

    Ok(())
}

/// Generate a JSON report of the rows.
pub fn generate_json_report(rows: &[ReportRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(rows: &[ReportRow], path: &Path) -> Result<()> {
    let content = generate_json_report(rows)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}
