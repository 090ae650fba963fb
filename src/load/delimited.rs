use csv::ReaderBuilder;
use std::borrow::Cow;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::process::RawTable;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// UTF-8 when valid, otherwise ISO-8859-1 (every byte is one code point).
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => {
            debug!("input is not UTF-8, decoding as ISO-8859-1");
            Cow::Owned(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

/// Header-line bytes outside double-quoted fields.
fn unquoted_bytes(header: &str) -> impl Iterator<Item = u8> + '_ {
    let mut quoted = false;
    header.bytes().filter(move |&b| {
        if b == b'"' {
            quoted = !quoted;
        }
        !quoted && b != b'"'
    })
}

/// Pick the candidate delimiter that occurs most often on the header line,
/// ignoring anything inside quotes.
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or_default();
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .map(|d| (d, unquoted_bytes(header).filter(|&b| b == d).count()))
        .filter(|&(_, n)| n > 0)
        .max_by_key(|&(_, n)| n)
        .map_or(b',', |(d, _)| d)
}

/// Parse CSV / TXT bytes with a header row.
pub fn read_delimited(bytes: &[u8]) -> Result<RawTable> {
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(DashboardError::parse("delimited", "file is empty"));
    }
    let delimiter = sniff_delimiter(&text);

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| DashboardError::parse("delimited", e))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .map_err(|e| DashboardError::parse("delimited", format!("record {}: {}", idx, e)))?;
        // Skip rows that are nothing but separators.
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::canonical_token;

    #[test]
    fn reads_quoted_csv() -> anyhow::Result<()> {
        let data: &[u8] = b"Order Date,City,Sales\n\
            \"11/8/2016\",\"Henderson, KY\",261.96\n\n\
            2016-01-01,Akron,1\n";
        let table = read_delimited(data)?;
        assert_eq!(table.headers, vec!["Order Date", "City", "Sales"]);
        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.cell(0, 1), Some("Henderson, KY"));
        Ok(())
    }

    #[test]
    fn latin1_fallback_keeps_accents() -> anyhow::Result<()> {
        // "Región,Sales\nMéxico,1\n" in ISO-8859-1.
        let table = read_delimited(b"Regi\xf3n,Sales\nM\xe9xico,1\n")?;
        assert_eq!(table.headers[0], "Región");
        assert_eq!(table.cell(0, 0), Some("México"));
        Ok(())
    }

    #[test]
    fn sniffs_tab_and_semicolon() -> anyhow::Result<()> {
        assert_eq!(sniff_delimiter("a\tb\tc\n1\t2\t3"), b'\t');
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("single"), b',');

        let table = read_delimited(b"Region\tSales\nEast\t3\n")?;
        assert_eq!(table.headers, vec!["Region", "Sales"]);
        assert_eq!(table.cell(0, 1), Some("3"));
        Ok(())
    }

    #[test]
    fn commas_inside_quoted_headers_do_not_count() -> anyhow::Result<()> {
        assert_eq!(sniff_delimiter("\"Region, Name\"\tSales\n"), b'\t');
        assert_eq!(sniff_delimiter("\"a;b;c\",\"d;e\",f"), b',');
        assert_eq!(sniff_delimiter("\"only, quoted, commas\""), b',');

        let table = read_delimited(b"\"Region, Name\"\tSales\n\"East, Upper\"\t3\n")?;
        assert_eq!(table.headers, vec!["Region, Name", "Sales"]);
        assert_eq!(table.cell(0, 0), Some("East, Upper"));
        Ok(())
    }

    #[test]
    fn bom_header_still_normalizes() -> anyhow::Result<()> {
        let table = read_delimited("\u{feff}Order Date,Sales\n2016-01-01,1\n".as_bytes())?;
        assert_eq!(canonical_token(&table.headers[0]), "order_date");
        Ok(())
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        let err = read_delimited(b"  \n").unwrap_err();
        assert!(matches!(err, DashboardError::Parse { .. }));
    }
}
