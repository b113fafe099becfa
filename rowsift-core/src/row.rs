//! Cell splitting for a single row

use crate::error::{ExtractError, Result};
use html_escape::decode_html_entities;
use regex::Regex;

/// Splits a row's markup into cleaned cell texts
#[derive(Debug, Clone)]
pub struct CellSplitter {
    open: Regex,
    close: Regex,
    markup: Regex,
}

impl CellSplitter {
    /// Build a splitter for cells with the given tag name (e.g. `td`)
    pub fn new(cell_tag: &str) -> Result<Self> {
        let tag = regex::escape(cell_tag);
        let compile = |pattern: String| {
            Regex::new(&pattern).map_err(|e| ExtractError::InvalidSchema {
                reason: format!("bad cell tag '{cell_tag}': {e}"),
            })
        };

        Ok(Self {
            open: compile(format!(r"(?i)<{tag}(?:[\s/][^>]*)?>"))?,
            close: compile(format!(r"(?i)</{tag}\s*>"))?,
            markup: compile(r"<[^>]*>".to_string())?,
        })
    }

    /// Cell texts of `row`, in order.
    ///
    /// A cell ends at its close tag, the next cell open, or the end of the
    /// row, so omitted close tags are tolerated. Nested markup is removed,
    /// entities decoded and surrounding whitespace trimmed.
    pub fn split(&self, row: &str) -> Vec<String> {
        let opens: Vec<_> = self.open.find_iter(row).collect();
        let mut cells = Vec::with_capacity(opens.len());

        for (i, open) in opens.iter().enumerate() {
            let limit = opens.get(i + 1).map_or(row.len(), |next| next.start());
            let body = &row[open.end()..limit];
            let body = match self.close.find(body) {
                Some(close) => &body[..close.start()],
                None => body,
            };
            cells.push(self.clean(body));
        }

        cells
    }

    fn clean(&self, body: &str) -> String {
        let text = self.markup.replace_all(body, "");
        decode_html_entities(&text).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn td() -> CellSplitter {
        CellSplitter::new("td").unwrap()
    }

    #[test]
    fn test_plain_cells() {
        let cells = td().split("<tr><td>1</td><td> x </td></tr>");
        assert_eq!(cells, vec!["1", "x"]);
    }

    #[test]
    fn test_header_cells_are_not_data() {
        assert!(td().split("<tr><th>A</th><th>B</th></tr>").is_empty());
    }

    #[test]
    fn test_attributes_case_and_nested_markup() {
        let cells = td().split(r#"<tr class="r"><TD align="right"><b>4062</b></TD><td/></tr>"#);
        assert_eq!(cells, vec!["4062", ""]);
    }

    #[test]
    fn test_entities_decoded() {
        let cells = td().split("<tr><td>A &amp; B</td><td>&nbsp;</td></tr>");
        assert_eq!(cells, vec!["A & B", ""]);
    }

    #[test]
    fn test_missing_close_tags() {
        let cells = td().split("<tr><td>1<td>2\n</tr>");
        assert_eq!(cells, vec!["1", "2"]);
    }

    #[test]
    fn test_similar_tag_names_ignored() {
        let cells = td().split("<tr><tdx>no</tdx><td>yes</td></tr>");
        assert_eq!(cells, vec!["yes"]);
    }
}
