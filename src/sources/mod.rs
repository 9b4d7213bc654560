//! Third-party pages listing codes, and how to read codes out of them.
//!
//! Extraction is purely positional (a table selector and cell indices), so a
//! layout change upstream surfaces as `ScrapeLayout` instead of wrong codes.

pub mod shift;
pub mod vip;

use std::fmt;
use std::str::FromStr;
use scraper::{ElementRef, Selector};
use crate::error::{Result, VaultKeyError};

pub use shift::{extract_shift_codes, fetch_shift_codes, ShiftSource};
pub use vip::{extract_vip_codes, fetch_vip_codes, ScrapedVipCode, VipSource};

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| VaultKeyError::ScrapeLayout(format!("bad selector {}: {}", css, e)))
}

/// Visible text of a cell with surrounding whitespace removed.
pub(crate) fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

pub(crate) fn cell_at<'a>(cells: &'a [ElementRef<'a>], index: usize, row: usize, source: &str) -> Result<&'a ElementRef<'a>> {
    cells.get(index).ok_or_else(|| {
        VaultKeyError::ScrapeLayout(format!(
            "{}: row {} has {} cells, expected at least {}",
            source,
            row,
            cells.len(),
            index + 1
        ))
    })
}

/// Shared name lookup for the static source registries.
pub(crate) fn parse_source<T: Copy + fmt::Display>(all: &[T], kind: &'static str, name: &str) -> Result<T> {
    all.iter()
        .copied()
        .find(|source| source.to_string() == name)
        .ok_or_else(|| VaultKeyError::UnknownSource { kind, name: name.to_string() })
}

impl FromStr for ShiftSource {
    type Err = VaultKeyError;

    fn from_str(s: &str) -> Result<Self> {
        parse_source(&ShiftSource::ALL, "SHiFT", s)
    }
}

impl FromStr for VipSource {
    type Err = VaultKeyError;

    fn from_str(s: &str) -> Result<Self> {
        parse_source(&VipSource::ALL, "VIP", s)
    }
}
