use std::fmt;
use log::{info, warn};
use scraper::Html;
use crate::error::{Result, VaultKeyError};
use crate::http::{HttpRequest, RequestGateway};
use crate::sources::{cell_at, cell_text, selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftSource {
    Orcz,
}

impl ShiftSource {
    pub const ALL: [ShiftSource; 1] = [ShiftSource::Orcz];

    pub fn url(&self) -> &'static str {
        match self {
            ShiftSource::Orcz => "http://orcz.com/Borderlands_3:_Shift_Codes",
        }
    }

    fn table_selector(&self) -> &'static str {
        match self {
            ShiftSource::Orcz => ".wikitable",
        }
    }

    fn code_column(&self) -> usize {
        match self {
            ShiftSource::Orcz => 4,
        }
    }
}

impl Default for ShiftSource {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for ShiftSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftSource::Orcz => write!(f, "orcz"),
        }
    }
}

/// Codes from the first matching table, header row skipped.
pub fn extract_shift_codes(source: ShiftSource, html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let table = document
        .select(&selector(source.table_selector())?)
        .next()
        .ok_or_else(|| VaultKeyError::ScrapeLayout(format!("{}: no {} table", source, source.table_selector())))?;

    let rows = selector("tr")?;
    let cells = selector("td")?;
    let mut codes = Vec::new();
    for (index, row) in table.select(&rows).enumerate().skip(1) {
        let row_cells: Vec<_> = row.select(&cells).collect();
        let cell = cell_at(&row_cells, source.code_column(), index, &source.to_string())?;
        codes.push(cell_text(cell));
    }
    Ok(codes)
}

pub async fn fetch_shift_codes(gateway: &RequestGateway, source: ShiftSource) -> Result<Vec<String>> {
    let response = gateway.request(HttpRequest::get(source.url())).await.map_err(|e| {
        warn!("Could not fetch {}: {}", source.url(), e);
        VaultKeyError::SourceUnavailable(source.to_string())
    })?;
    let codes = extract_shift_codes(source, &response.body)?;
    info!("Scraped {} SHiFT codes from {}", codes.len(), source);
    Ok(codes)
}
