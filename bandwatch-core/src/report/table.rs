use owo_colors::OwoColorize;

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

struct Row {
    cells: Vec<String>,
    bold: Vec<bool>,
}

/// Borderless, whitespace-separated text table.
///
/// Headers are always left aligned; body cells follow their column's
/// alignment. Bold cells are only styled when rendering with color.
pub struct TextTable {
    headers: Vec<&'static str>,
    aligns: Vec<Align>,
    rows: Vec<Row>,
}

impl TextTable {
    pub fn new(columns: &[(&'static str, Align)]) -> Self {
        Self {
            headers: columns.iter().map(|(h, _)| *h).collect(),
            aligns: columns.iter().map(|(_, a)| *a).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, cells: Vec<String>, bold: Vec<bool>) {
        self.rows.push(Row { cells, bold });
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn render(&self, color: bool) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w, Align::Left))
            .collect();
        push_line(&mut out, &header);

        for row in &self.rows {
            let cells: Vec<String> = row
                .cells
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths.get(i).copied().unwrap_or_default();
                    let align = self.aligns.get(i).copied().unwrap_or(Align::Left);
                    let padded = pad(cell, width, align);
                    if color && row.bold.get(i).copied().unwrap_or(false) {
                        padded.bold().to_string()
                    } else {
                        padded
                    }
                })
                .collect();
            push_line(&mut out, &cells);
        }

        out
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{cell:<width$}"),
        Align::Right => format!("{cell:>width$}"),
    }
}

fn push_line(out: &mut String, cells: &[String]) {
    let line = cells.join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}
