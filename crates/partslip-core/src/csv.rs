//! Line-oriented CSV parsing.
//!
//! The parser works in two passes: the text is split into lines first, then
//! each line is split into cells. A quoted cell that contains a newline is
//! therefore NOT reassembled across the line break; each half ends up in its
//! own row. Sheet exports used by partslip never contain such cells.

use crate::error::CoreError;

/// Parsed rows of trimmed string cells. Rows may differ in length.
pub type Grid = Vec<Vec<String>>;

/// Parse CSV text into a grid.
///
/// Empty text gives an empty grid and a trailing newline does not add a
/// row. Interior blank lines come back as a single empty cell.
pub fn parse(text: &str) -> Grid {
    text.lines().map(parse_line).collect()
}

/// View raw bytes as text, or fail with `MalformedInput`.
pub fn decode_text(bytes: &[u8]) -> Result<&str, CoreError> {
    std::str::from_utf8(bytes)
        .map_err(|e| CoreError::MalformedInput(format!("input is not UTF-8 text ({})", e)))
}

fn parse_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Read a cell, treating anything past the end of a short row as empty.
pub fn cell(grid: &Grid, row: usize, col: usize) -> &str {
    grid.get(row)
        .and_then(|r| r.get(col))
        .map(String::as_str)
        .unwrap_or("")
}

/// True when every cell in the row is empty or whitespace.
pub fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    /// Write a grid the way a spreadsheet export does: quote only where
    /// needed, doubling internal quotes.
    fn write_csv(grid: &Grid) -> String {
        let mut writer = ::csv::WriterBuilder::new()
            .flexible(true)
            .quote_style(::csv::QuoteStyle::Necessary)
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        for row in grid {
            writer.write_record(row).expect("record writes");
        }
        let bytes = writer.into_inner().expect("writer flushes");
        String::from_utf8(bytes).expect("utf8")
    }

    #[test]
    fn test_parse_quote_escaping() {
        let grid = parse(r#"a,"b,c","d""e""#);
        assert_eq!(grid, vec![row(&["a", "b,c", "d\"e"])]);
    }

    #[test]
    fn test_parse_trims_cells() {
        let grid = parse("  JANUARY 5-11 ,  3 HXQ  ,\" padded \"");
        assert_eq!(grid, vec![row(&["JANUARY 5-11", "3 HXQ", "padded"])]);
    }

    #[test]
    fn test_parse_ragged_rows_and_crlf() {
        let grid = parse("h1,h2,h3\r\n3 A\r\n,4 B,5 C\r\n");
        assert_eq!(
            grid,
            vec![row(&["h1", "h2", "h3"]), row(&["3 A"]), row(&["", "4 B", "5 C"])]
        );
        assert_eq!(cell(&grid, 1, 2), "");
        assert_eq!(cell(&grid, 9, 0), "");
        assert_eq!(cell(&grid, 2, 1), "4 B");
    }

    #[test]
    fn test_parse_empty_and_blank_lines() {
        assert!(parse("").is_empty());

        let grid = parse("a,b\n\nc,d");
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1], row(&[""]));
        assert!(row_is_blank(&grid[1]));
        assert!(row_is_blank(&row(&["", "  ", "\t"])));
        assert!(!row_is_blank(&grid[0]));
    }

    #[test]
    fn test_quoted_newline_is_not_reassembled() {
        let grid = parse("\"first\nsecond\",x");
        assert_eq!(grid, vec![row(&["first"]), row(&["second", "x"])]);
    }

    #[test]
    fn test_decode_text_rejects_non_utf8() {
        assert_eq!(decode_text(b"a,b").unwrap(), "a,b");
        assert!(matches!(
            decode_text(&[0x61, 0xff, 0xfe]),
            Err(CoreError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let grids: Vec<Grid> = vec![
            vec![row(&["JANUARY 5-11", "JANUARY 12-18"]), row(&["3 HXQ", "4 Alice / Bob"])],
            vec![row(&["say \"hi\"", "a,b,c", ""]), row(&["x"]), row(&["", "", "y"])],
            vec![row(&["\"\"", ",", "plain"])],
        ];

        for grid in grids {
            assert_eq!(parse(&write_csv(&grid)), grid);
        }
    }

    #[test]
    fn test_parses_exported_quoting() {
        let grid = vec![row(&["a", "b,c", "d\"e"])];
        let text = write_csv(&grid);
        assert_eq!(text, "a,\"b,c\",\"d\"\"e\"\n");
        assert_eq!(parse(&text), grid);
    }
}
