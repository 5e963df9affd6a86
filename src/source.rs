use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rayon::prelude::*;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::{info, warn};
use url::Url;

use crate::error::{PipelineError, Result};
use crate::record::{RawRecord, Record, DATE_FORMAT};

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";
const USER_AGENT: &str = concat!("coopstats/", env!("CARGO_PKG_VERSION"));

/// One independently retrievable worksheet of the registration workbook.
#[derive(Debug, Clone)]
pub struct SheetSource {
    pub section: String,
    pub url: Url,
}

/// One CSV-export locator per worksheet name.
pub fn sheet_sources(sheet_id: &str, worksheets: &[String]) -> Result<Vec<SheetSource>> {
    worksheets
        .iter()
        .map(|name| {
            let mut url = Url::parse(&format!("{EXPORT_BASE}/{sheet_id}/gviz/tq")).map_err(|e| {
                PipelineError::SourceUnavailable {
                    section: name.clone(),
                    reason: format!("invalid sheet locator: {e}"),
                }
            })?;
            url.query_pairs_mut()
                .append_pair("tqx", "out:csv")
                .append_pair("sheet", name);
            Ok(SheetSource {
                section: name.clone(),
                url,
            })
        })
        .collect()
}

pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(Policy::limited(10))
        .timeout(timeout)
        .build()
}

/// Retrieves one worksheet as CSV text. Every failure mode (connect,
/// timeout, HTTP error status, truncated body) surfaces as `SourceUnavailable`.
pub fn fetch_table(client: &Client, source: &SheetSource) -> Result<String> {
    let start_time = Instant::now();
    info!(action = "start", component = "source_fetch", section = source.section.as_str(), url = source.url.as_str(), "Fetching source table");

    let unavailable = |reason: String| PipelineError::SourceUnavailable {
        section: source.section.clone(),
        reason,
    };

    let response = client
        .get(source.url.clone())
        .send()
        .map_err(|e| unavailable(e.to_string()))?
        .error_for_status()
        .map_err(|e| unavailable(e.to_string()))?;
    let text = response.text().map_err(|e| unavailable(e.to_string()))?;

    info!(
        action = "complete",
        component = "source_fetch",
        section = source.section.as_str(),
        bytes = text.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Fetched source table"
    );
    Ok(text)
}

/// Fetches every source, in parallel across sources. The collect is a
/// join-all barrier: any failed fetch aborts the whole build and nothing
/// downstream sees partial data. Output preserves source order.
pub fn fetch_all(
    client: &Client,
    sources: &[SheetSource],
    max_workers: Option<usize>,
) -> Result<Vec<(String, String)>> {
    let start_time = Instant::now();
    info!(action = "start", component = "source_fetch", source_count = sources.len(), "Fetching source tables");

    let workers = max_workers.unwrap_or_else(|| sources.len().min(num_cpus::get().min(8)));
    info!(action = "configure", component = "source_fetch", worker_count = workers, "Using workers for fetching");

    let fetch = || {
        sources
            .par_iter()
            .map(|source| fetch_table(client, source).map(|text| (source.section.clone(), text)))
            .collect::<Result<Vec<(String, String)>>>()
    };
    let tables = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool.install(fetch),
        Err(e) => {
            warn!(action = "configure", component = "source_fetch", error = %e, "Falling back to the global thread pool");
            fetch()
        }
    }?;

    info!(
        action = "complete",
        component = "source_fetch",
        source_count = tables.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "All source tables fetched"
    );
    Ok(tables)
}

/// Parses one worksheet's CSV text into typed records.
///
/// Dates must match `DD/MM/YYYY` exactly; a non-matching value (including
/// an impossible calendar date or a blank cell) fails the source rather
/// than coercing.
pub fn parse_table(section: &str, csv_text: &str) -> Result<Vec<Record>> {
    let start_time = Instant::now();

    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut records = Vec::new();
    for (index, raw) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = raw.map_err(|e| PipelineError::TableParse {
            section: section.to_string(),
            source: e,
        })?;

        let registered_on = NaiveDate::parse_from_str(raw.registered_on.trim(), DATE_FORMAT)
            .map_err(|_| PipelineError::MalformedDate {
                section: section.to_string(),
                row: index + 2, // the header occupies row 1
                value: raw.registered_on.clone(),
            })?;

        records.push(Record {
            society: raw.society.trim().to_string(),
            state: raw.state.trim().to_string(),
            district: raw.district.trim().to_string(),
            sector: raw.sector.trim().to_string(),
            registered_on,
        });
    }

    info!(
        action = "parse",
        component = "source_parse",
        section = section,
        record_count = records.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Parsed source table"
    );
    Ok(records)
}

/// Concatenates per-source record vectors into the canonical dataset:
/// source order, then source-internal order. Duplicates across sources are
/// kept; the union is a straight concatenation.
pub fn merge_tables(per_source: Vec<Vec<Record>>) -> Vec<Record> {
    let source_count = per_source.len();
    let merged: Vec<Record> = per_source.into_iter().flatten().collect();
    info!(
        action = "merge",
        component = "dataset_merge",
        source_count,
        record_count = merged.len(),
        "Merged source tables into canonical dataset"
    );
    merged
}

/// Parses every fetched table and merges them. Parsing aborts on the first
/// bad source, so a malformed table never contributes partial records.
pub fn build_dataset(tables: &[(String, String)]) -> Result<Vec<Record>> {
    let per_source = tables
        .iter()
        .map(|(section, text)| parse_table(section, text))
        .collect::<Result<Vec<_>>>()?;
    Ok(merge_tables(per_source))
}
