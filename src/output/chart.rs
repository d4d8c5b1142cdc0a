//! ASCII line chart for the trailing download series.

/// Chart body width in columns.
const CHART_WIDTH: usize = 60;
/// Chart body height in rows.
const CHART_HEIGHT: usize = 12;

/// Maps data coordinates onto a character grid.
struct ChartGrid {
    height: usize,
    min_y: f64,
    max_y: f64,
}

impl ChartGrid {
    /// Rows count down from the top, so the y mapping is inverted.
    fn map_y(&self, y: f64) -> usize {
        let range = self.max_y - self.min_y;
        let scaled = (y - self.min_y) / range * (self.height - 1) as f64;
        let row = (self.height - 1) as f64 - scaled;
        row.round() as usize
    }
}

/// Renders the trailing download series as a small line chart with the
/// series maximum and minimum labelled on the left axis.
///
/// Returns `None` when the series has fewer than two points.
pub fn downloads_chart(series: &[u64]) -> Option<String> {
    if series.len() < 2 {
        return None;
    }

    let max = *series.iter().max()?;
    let min = *series.iter().min()?;
    let (min_y, max_y) = widened_bounds(min, max);

    let grid = ChartGrid {
        height: CHART_HEIGHT,
        min_y,
        max_y,
    };

    let mut cells = vec![[' '; CHART_WIDTH]; CHART_HEIGHT];
    let max_x = (series.len() - 1) as f64;

    // One plotted point per column, linearly interpolated between samples.
    for column in 0..CHART_WIDTH {
        let x = max_x * column as f64 / (CHART_WIDTH - 1) as f64;
        let left = x.floor() as usize;
        let right = (left + 1).min(series.len() - 1);
        let t = x - left as f64;
        let y = series[left] as f64 * (1.0 - t) + series[right] as f64 * t;
        cells[grid.map_y(y)][column] = '•';
    }

    let max_label = axis_label(max_y);
    let min_label = axis_label(min_y);
    let gutter = max_label.len().max(min_label.len());

    let mut lines = Vec::with_capacity(CHART_HEIGHT + 1);
    for (row, cells_row) in cells.iter().enumerate() {
        let label = match row {
            0 => max_label.as_str(),
            r if r == CHART_HEIGHT - 1 => min_label.as_str(),
            _ => "",
        };
        let body: String = cells_row.iter().collect();
        lines.push(format!("{:>gutter$} │{}", label, body, gutter = gutter));
    }
    lines.push(format!(
        "{:>gutter$} └{}",
        "",
        "─".repeat(CHART_WIDTH),
        gutter = gutter
    ));

    Some(lines.join("\n"))
}

/// Flat series get an artificial range so the line sits mid-chart
/// instead of dividing by zero.
fn widened_bounds(min: u64, max: u64) -> (f64, f64) {
    if min == max {
        let low = if min <= 5 { 0 } else { min - 5 };
        (low as f64, (max + 5) as f64)
    } else {
        (min as f64, max as f64)
    }
}

fn axis_label(value: f64) -> String {
    if value.abs() > 1000.0 {
        format!("{}k", (value / 1000.0).round())
    } else {
        format!("{}", value.round())
    }
}
