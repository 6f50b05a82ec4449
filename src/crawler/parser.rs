//! HTML extractor for category listing pages
//!
//! This module handles parsing a listing page to extract:
//! - One `DocumentRecord` per qualifying row of the documents table
//! - The last page number advertised by the pager
//!
//! Columns are positional: name+link, size, downloads, modified, uploader.

use crate::catalog::{local_path_for, Category, DocumentRecord};
use scraper::{ElementRef, Html, Selector};

/// Rows of the documents table
const DOCUMENT_ROW_SELECTOR: &str = "table tbody tr";

/// The pager's "last page" link
const LAST_PAGE_SELECTOR: &str = "a.ModulePager.LastPage";

/// Query parameter carrying the page number in pager links
const PAGE_NUMBER_PARAM: &str = "pagenumber=";

/// Parses a listing page and extracts its document records
///
/// Rows whose first cell has no link text are skipped. Missing trailing
/// columns yield empty strings. `download_url` is the raw `href`.
///
/// # Example
///
/// ```
/// use netco_harvest::catalog::Category;
/// use netco_harvest::crawler::extract_documents;
///
/// let html = r#"<table><tbody><tr>
///     <td><a href="/files/dl.pdf">Dieu le 2023</a></td><td>1 MB</td>
/// </tr></tbody></table>"#;
/// let docs = extract_documents(html, Category::CompanyCharter).unwrap();
/// assert_eq!(docs.len(), 1);
/// assert_eq!(docs[0].size, "1 MB");
/// assert_eq!(docs[0].downloads, "");
/// ```
pub fn extract_documents(html: &str, category: Category) -> Result<Vec<DocumentRecord>, String> {
    let document = Html::parse_document(html);
    let row_selector = parse_selector(DOCUMENT_ROW_SELECTOR)?;
    let link_selector = parse_selector("a")?;

    let mut records = Vec::new();
    for row in document.select(&row_selector) {
        if let Some(record) = extract_row(row, &link_selector, category) {
            records.push(record);
        }
    }

    Ok(records)
}

/// Builds a record from one table row, or None if the row does not qualify
fn extract_row(row: ElementRef<'_>, link_selector: &Selector, category: Category) -> Option<DocumentRecord> {
    let cells: Vec<ElementRef<'_>> = row
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| child.value().name() == "td")
        .collect();

    let link = cells.first()?.select(link_selector).next()?;
    let name = element_text(link);
    if name.is_empty() {
        return None;
    }

    let column = |index: usize| cells.get(index).map(|cell| element_text(*cell)).unwrap_or_default();

    Some(DocumentRecord {
        local_path: local_path_for(category, &name),
        download_url: link.value().attr("href").unwrap_or_default().to_string(),
        size: column(1),
        downloads: column(2),
        modified: column(3),
        uploaded_by: column(4),
        category,
        name,
    })
}

/// Parses the last page number from the pager of a listing page
///
/// Returns 1 when there is no pager link or its page number is missing,
/// unparsable or zero.
///
/// # Example
///
/// ```
/// use netco_harvest::crawler::parse_max_page;
///
/// let html = r#"<a class="ModulePager LastPage" href="/bao-cao-tai-chinh?pagenumber=3">»</a>"#;
/// assert_eq!(parse_max_page(html), 3);
/// assert_eq!(parse_max_page("<p>no pager</p>"), 1);
/// ```
pub fn parse_max_page(html: &str) -> u32 {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse(LAST_PAGE_SELECTOR) else {
        return 1;
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(page_number_from_href)
        .last()
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

/// Reads the integer that follows `pagenumber=` in a pager href
fn page_number_from_href(href: &str) -> Option<u32> {
    let (_, tail) = href.split_once(PAGE_NUMBER_PARAM)?;
    let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(selector: &str) -> Result<Selector, String> {
    Selector::parse(selector).map_err(|e| format!("invalid selector '{}': {:?}", selector, e))
}
