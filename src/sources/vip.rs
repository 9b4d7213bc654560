use std::fmt;
use log::{info, warn};
use scraper::Html;
use crate::error::{Result, VaultKeyError};
use crate::http::{HttpRequest, RequestGateway};
use crate::sources::{cell_at, cell_text, selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VipSource {
    Reddit,
}

struct VipLayout {
    table: &'static str,
    code_column: usize,
    valid_column: usize,
    type_column: usize,
}

impl VipSource {
    pub const ALL: [VipSource; 1] = [VipSource::Reddit];

    pub fn url(&self) -> &'static str {
        match self {
            VipSource::Reddit => "https://www.reddit.com/r/borderlands3/comments/bxgq5p/borderlands_vip_program_codes/",
        }
    }

    fn layout(&self) -> VipLayout {
        match self {
            VipSource::Reddit => VipLayout {
                table: "[data-test-id='post-content'] tbody",
                code_column: 0,
                valid_column: 2,
                type_column: 3,
            },
        }
    }
}

impl Default for VipSource {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for VipSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VipSource::Reddit => write!(f, "reddit"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedVipCode {
    /// Lower-cased type column, e.g. "vault".
    pub code_type: String,
    pub code: String,
    pub valid: bool,
}

/// Every row of the code table; only rows not marked "No"/"Nullified"/... are kept.
pub fn extract_vip_codes(source: VipSource, html: &str) -> Result<Vec<ScrapedVipCode>> {
    let layout = source.layout();
    let document = Html::parse_document(html);
    let table = document
        .select(&selector(layout.table)?)
        .next()
        .ok_or_else(|| VaultKeyError::ScrapeLayout(format!("{}: no {} table", source, layout.table)))?;

    let rows = selector("tr")?;
    let cells = selector("td")?;
    let name = source.to_string();
    let mut codes = Vec::new();
    for (index, row) in table.select(&rows).enumerate() {
        let row_cells: Vec<_> = row.select(&cells).collect();
        let code = cell_text(cell_at(&row_cells, layout.code_column, index, &name)?);
        let validity = cell_text(cell_at(&row_cells, layout.valid_column, index, &name)?);
        let code_type = cell_text(cell_at(&row_cells, layout.type_column, index, &name)?).to_lowercase();
        let valid = !validity.to_lowercase().starts_with('n');
        if valid {
            codes.push(ScrapedVipCode { code_type, code, valid });
        }
    }
    Ok(codes)
}

pub async fn fetch_vip_codes(gateway: &RequestGateway, source: VipSource) -> Result<Vec<ScrapedVipCode>> {
    let response = gateway.request(HttpRequest::get(source.url())).await.map_err(|e| {
        warn!("Could not fetch {}: {}", source.url(), e);
        VaultKeyError::SourceUnavailable(source.to_string())
    })?;
    let codes = extract_vip_codes(source, &response.body)?;
    info!("Scraped {} valid VIP codes from {}", codes.len(), source);
    Ok(codes)
}
