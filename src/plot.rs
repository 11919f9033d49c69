use crate::stats::IntervalRow;
use svg::Document;
use svg::node::element::{Line, Rectangle, Text};

const W: f32 = 900.0;
const H: f32 = 500.0;
const MARGIN_LEFT: f32 = 60.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 60.0;

/// Bar chart of the fragment-length histogram.
pub fn histogram_svg(rows: &[IntervalRow], title: &str) -> String {
    let plot_width = W - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = H - MARGIN_TOP - MARGIN_BOTTOM;
    let baseline = H - MARGIN_BOTTOM;
    let max_count = rows
        .iter()
        .map(|row| row.count.fragments)
        .max()
        .unwrap_or(0)
        .max(1) as f32;

    let mut doc = Document::new()
        .set("viewBox", (0, 0, W, H))
        .set("width", W)
        .set("height", H)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", W)
                .set("height", H)
                .set("fill", "#ffffff"),
        );

    doc = doc.add(
        Text::new(title)
            .set("x", W / 2.0)
            .set("y", 28)
            .set("text-anchor", "middle")
            .set("font-family", "monospace")
            .set("font-size", 16)
            .set("fill", "#111111"),
    );

    let bar_slot = plot_width / rows.len().max(1) as f32;
    for (i, row) in rows.iter().enumerate() {
        let height = plot_height * row.count.fragments as f32 / max_count;
        let x = MARGIN_LEFT + i as f32 * bar_slot;
        doc = doc.add(
            Rectangle::new()
                .set("x", x + bar_slot * 0.1)
                .set("y", baseline - height)
                .set("width", bar_slot * 0.8)
                .set("height", height)
                .set("fill", "#4472c4"),
        );
        doc = doc.add(
            Text::new(format!("{}-{}", row.lower, row.upper))
                .set("x", x + bar_slot / 2.0)
                .set("y", baseline + 16.0)
                .set("text-anchor", "middle")
                .set("font-family", "monospace")
                .set("font-size", 10)
                .set("fill", "#444444"),
        );
        if row.count.fragments > 0 {
            doc = doc.add(
                Text::new(row.count.fragments.to_string())
                    .set("x", x + bar_slot / 2.0)
                    .set("y", baseline - height - 4.0)
                    .set("text-anchor", "middle")
                    .set("font-family", "monospace")
                    .set("font-size", 10)
                    .set("fill", "#111111"),
            );
        }
    }

    doc = doc.add(
        Line::new()
            .set("x1", MARGIN_LEFT)
            .set("y1", baseline)
            .set("x2", W - MARGIN_RIGHT)
            .set("y2", baseline)
            .set("stroke", "#000000")
            .set("stroke-width", 1),
    );

    doc.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::IntervalCount;

    fn row(lower: usize, upper: usize, fragments: u64) -> IntervalRow {
        IntervalRow {
            lower,
            upper,
            count: IntervalCount {
                fragments,
                with_n: 0,
            },
        }
    }

    #[test]
    fn test_histogram_svg() {
        let rows = [row(1, 25, 3), row(26, 50, 0), row(51, 75, 7)];
        let text = histogram_svg(&rows, "Distribution of fragments");
        assert!(text.contains("<svg"));
        assert!(text.contains("Distribution of fragments"));
        assert!(text.contains("51-75"));
        // one bar per row, plus the background rectangle
        assert_eq!(text.matches("<rect").count(), 4);
    }

    #[test]
    fn test_histogram_svg_empty() {
        let text = histogram_svg(&[], "empty");
        assert!(text.contains("<svg"));
    }
}
