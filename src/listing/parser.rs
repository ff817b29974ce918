//! Directory listing page parsing.
//!
//! The page is expected to hold a table whose body rows each name one file in
//! their first cell:
//!
//! ```html
//! <table>
//!   <thead><tr><th>Name</th><th>Size</th></tr></thead>
//!   <tbody>
//!     <tr><td><a href="...">GMAO_MERRA2.20230628T100000.MET.nc</a></td><td>1.2M</td></tr>
//!   </tbody>
//! </table>
//! ```

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::ListingError;

/// Extracts filenames from the first table's body, in page order.
///
/// Returns an empty vector when the table or its body is missing. Rows without
/// a `td` cell, or whose first cell is blank, are skipped. Duplicates are kept.
///
/// # Errors
///
/// Returns [`ListingError::Selector`] only if a built-in selector fails to compile.
pub fn parse_listing(html: &str) -> Result<Vec<String>, ListingError> {
    let table = selector("table")?;
    let tbody = selector("tbody")?;
    let row = selector("tr")?;
    let cell = selector("td")?;

    let document = Html::parse_document(html);
    let Some(table) = document.select(&table).next() else {
        debug!("no table element in listing page");
        return Ok(Vec::new());
    };
    let Some(body) = table.select(&tbody).next() else {
        debug!("table has no body");
        return Ok(Vec::new());
    };

    Ok(body
        .select(&row)
        .filter_map(|r| r.select(&cell).next())
        .map(cell_text)
        .filter(|name| !name.is_empty())
        .collect())
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn selector(css: &'static str) -> Result<Selector, ListingError> {
    Selector::parse(css).map_err(|e| ListingError::Selector {
        selector: css,
        reason: e.to_string(),
    })
}
