use crate::models::Candle;

/// A simple text-based table generator for terminal output
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
    right_aligned: Vec<bool>,
}

impl Table {
    /// Create a new table with the given headers
    pub fn new(headers: Vec<&str>) -> Self {
        let col_widths = headers.iter().map(|h| h.len()).collect();
        let right_aligned = vec![false; headers.len()];
        let headers = headers.iter().map(|h| h.to_string()).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
            right_aligned,
        }
    }

    /// Right-align a column (numbers)
    pub fn align_right(mut self, col: usize) -> Self {
        if let Some(flag) = self.right_aligned.get_mut(col) {
            *flag = true;
        }
        self
    }

    /// Add a row to the table
    pub fn add_row(&mut self, row: Vec<String>) {
        // Update column widths if needed
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(col.len());
            }
        }

        self.rows.push(row);
    }

    /// Render the table as a formatted string
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }

        output
    }

    /// Render a single row with proper spacing
    fn render_row(&self, row: &[String]) -> String {
        let mut line = String::new();
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                let width = self.col_widths[i];
                if self.right_aligned[i] {
                    line.push_str(&format!("{:>width$}", col, width = width));
                } else {
                    line.push_str(&format!("{:<width$}", col, width = width));
                }
                if i < row.len() - 1 {
                    line.push_str(" | ");
                }
            }
        }
        line.trim_end().to_string()
    }

    /// Render a separator line
    fn render_separator(&self) -> String {
        let mut line = String::new();
        for (i, &width) in self.col_widths.iter().enumerate() {
            line.push_str(&"-".repeat(width));
            if i < self.col_widths.len() - 1 {
                line.push_str("-+-");
            }
        }
        line
    }
}

/// Table of the most recent `limit` candles, oldest first
pub fn candle_table(candles: &[Candle], limit: usize) -> Table {
    let mut table = Table::new(vec!["Date", "Open", "High", "Low", "Close", "Volume"])
        .align_right(1)
        .align_right(2)
        .align_right(3)
        .align_right(4)
        .align_right(5);

    let skip = candles.len().saturating_sub(limit);
    for candle in &candles[skip..] {
        table.add_row(vec![
            candle.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", candle.open),
            format!("{:.2}", candle.high),
            format!("{:.2}", candle.low),
            format!("{:.2}", candle.close),
            format!("{:.0}", candle.volume),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(vec!["Name", "Age", "City"]).align_right(1);
        table.add_row(vec!["Alice".to_string(), "30".to_string(), "NYC".to_string()]);
        table.add_row(vec!["Bob".to_string(), "5".to_string(), "LA".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Name  | Age | City");
        assert_eq!(lines[1], "------+-----+-----");
        assert_eq!(lines[2], "Alice |  30 | NYC");
        assert_eq!(lines[3], "Bob   |   5 | LA");
    }

    #[test]
    fn test_candle_table_keeps_latest_rows() {
        let candles: Vec<Candle> = (1..=4)
            .map(|d| Candle {
                date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
                volume: 1000.0,
            })
            .collect();

        let rendered = candle_table(&candles, 2).render();
        assert_eq!(rendered.lines().count(), 4);
        assert!(!rendered.contains("2024-01-02"));
        assert!(rendered.contains("2024-01-03"));
        assert!(rendered.contains("2024-01-04"));
    }
}
