//! SVG scatter plot of a `Report` on the (breadth, strength) z-score plane.

use analytics::Report;
use core_types::Quadrant;

/// The plot always spans at least ±3 standard deviations on both axes.
const MIN_EXTENT: f64 = 3.0;

const HISTORY_COLOR: &str = "gray";
const LATEST_COLOR: &str = "red";

/// Pixel layout of the chart. The plot area is square.
#[derive(Debug, Clone, Copy)]
pub struct ScatterChart {
    pub size: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
}

impl Default for ScatterChart {
    fn default() -> Self {
        Self {
            size: 640.0,
            margin_left: 70.0,
            margin_right: 20.0,
            margin_top: 20.0,
            margin_bottom: 60.0,
        }
    }
}

/// Maps z-scores to pixels for one render.
struct Frame {
    left: f64,
    top: f64,
    side: f64,
    extent: f64,
}

impl Frame {
    fn x(&self, z: f64) -> f64 {
        self.left + (z + self.extent) / (2.0 * self.extent) * self.side
    }

    fn y(&self, z: f64) -> f64 {
        self.top + (self.extent - z) / (2.0 * self.extent) * self.side
    }
}

impl ScatterChart {
    fn width(&self) -> f64 {
        self.size + self.margin_left + self.margin_right
    }

    fn height(&self) -> f64 {
        self.size + self.margin_top + self.margin_bottom
    }

    /// Half-width of the plotted range: the smallest whole number covering every point.
    pub fn extent_for(report: &Report) -> f64 {
        report
            .points
            .iter()
            .flat_map(|p| [p.point.z_breadth.abs(), p.point.z_strength.abs()])
            .filter(|v| v.is_finite())
            .fold(MIN_EXTENT, f64::max)
            .ceil()
    }

    pub fn render(&self, report: &Report) -> String {
        let frame = Frame {
            left: self.margin_left,
            top: self.margin_top,
            side: self.size,
            extent: Self::extent_for(report),
        };

        let mut svg = self.open();
        svg.push_str(&self.quadrants(&frame));
        svg.push_str(&self.grid(&frame));

        for p in report.history() {
            svg.push_str(&format!(
                r#"<circle class="history" cx="{:.2}" cy="{:.2}" r="6" fill="{HISTORY_COLOR}" fill-opacity="0.4"><title>{} ({}): breadth {:.2}, strength {:.2}</title></circle>"#,
                frame.x(p.point.z_breadth),
                frame.y(p.point.z_strength),
                p.point.date,
                p.quadrant,
                p.point.z_breadth,
                p.point.z_strength,
            ));
            svg.push('\n');
        }

        let latest = &report.latest;
        svg.push_str(&format!(
            r#"<circle class="latest" cx="{:.2}" cy="{:.2}" r="13" fill="{LATEST_COLOR}" stroke="black" stroke-width="1.5"><title>Today {} ({}): breadth {:.2}, strength {:.2}</title></circle>"#,
            frame.x(latest.point.z_breadth),
            frame.y(latest.point.z_strength),
            latest.point.date,
            latest.quadrant,
            latest.point.z_breadth,
            latest.point.z_strength,
        ));
        svg.push('\n');

        svg.push_str(&self.legend(&frame, report.history().len()));
        svg.push_str("</svg>\n");
        svg
    }

    /// A chart-sized placeholder carrying `message` instead of data.
    pub fn render_fallback(&self, message: &str) -> String {
        let mut svg = self.open();
        svg.push_str(&format!(
            r#"<text class="fallback" x="{:.2}" y="{:.2}" text-anchor="middle" font-size="16" fill="firebrick">{}</text>"#,
            self.width() / 2.0,
            self.height() / 2.0,
            escape(message),
        ));
        svg.push_str("\n</svg>\n");
        svg
    }

    fn open(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<rect width="{w}" height="{h}" fill="white"/>
"#,
            w = self.width(),
            h = self.height(),
        )
    }

    fn quadrants(&self, f: &Frame) -> String {
        let (x0, y0) = (f.x(0.0), f.y(0.0));
        let (left, right) = (f.x(-f.extent), f.x(f.extent));
        let (top, bottom) = (f.y(f.extent), f.y(-f.extent));

        let mut out = String::new();
        for quadrant in Quadrant::ALL {
            let (x, y, w, h, label_x, anchor, label_y) = match quadrant {
                Quadrant::Greed => (x0, top, right - x0, y0 - top, right - 8.0, "end", top + 22.0),
                Quadrant::Mixed => (left, top, x0 - left, y0 - top, left + 8.0, "start", top + 22.0),
                Quadrant::Fear => (left, y0, x0 - left, bottom - y0, left + 8.0, "start", bottom - 10.0),
                Quadrant::Recovery => (x0, y0, right - x0, bottom - y0, right - 8.0, "end", bottom - 10.0),
            };
            out.push_str(&format!(
                r#"<rect class="quadrant" data-quadrant="{q}" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{c}" fill-opacity="0.1"/>
<text x="{label_x:.2}" y="{label_y:.2}" text-anchor="{anchor}" font-size="15" font-weight="bold" fill="{c}" fill-opacity="0.7">{q}</text>
"#,
                q = quadrant.label(),
                c = quadrant.color(),
            ));
        }
        out
    }

    fn grid(&self, f: &Frame) -> String {
        let mut out = String::new();
        let extent = f.extent as i64;
        let (left, right) = (f.x(-f.extent), f.x(f.extent));
        let (top, bottom) = (f.y(f.extent), f.y(-f.extent));

        for tick in -extent..=extent {
            let (tx, ty) = (f.x(tick as f64), f.y(tick as f64));
            out.push_str(&format!(
                r##"<line x1="{tx:.2}" y1="{top:.2}" x2="{tx:.2}" y2="{bottom:.2}" stroke="#ddd" stroke-width="0.5"/>
<line x1="{left:.2}" y1="{ty:.2}" x2="{right:.2}" y2="{ty:.2}" stroke="#ddd" stroke-width="0.5"/>
<text x="{tx:.2}" y="{:.2}" text-anchor="middle" font-size="12">{tick}</text>
<text x="{:.2}" y="{:.2}" text-anchor="end" font-size="12">{tick}</text>
"##,
                bottom + 18.0,
                left - 8.0,
                ty + 4.0,
            ));
        }

        // Zero axes on top of the grid.
        out.push_str(&format!(
            r#"<line class="axis" x1="{left:.2}" y1="{y0:.2}" x2="{right:.2}" y2="{y0:.2}" stroke="black" stroke-width="1"/>
<line class="axis" x1="{x0:.2}" y1="{top:.2}" x2="{x0:.2}" y2="{bottom:.2}" stroke="black" stroke-width="1"/>
<rect x="{left:.2}" y="{top:.2}" width="{side:.2}" height="{side:.2}" fill="none" stroke="black" stroke-width="1"/>
<text x="{cx:.2}" y="{xl:.2}" text-anchor="middle" font-size="14">Stock Price Breadth (Z-score)</text>
<text x="{yl:.2}" y="{cy:.2}" text-anchor="middle" font-size="14" transform="rotate(-90 {yl:.2} {cy:.2})">Stock Price Strength (Z-score)</text>
"#,
            x0 = f.x(0.0),
            y0 = f.y(0.0),
            side = f.side,
            cx = f.left + f.side / 2.0,
            cy = f.top + f.side / 2.0,
            xl = bottom + 44.0,
            yl = left - 44.0,
        ));
        out
    }

    fn legend(&self, f: &Frame, history_len: usize) -> String {
        let x = f.x(-f.extent) + 12.0;
        let y = f.y(f.extent) + 44.0;
        format!(
            r##"<g class="legend">
<rect x="{x:.2}" y="{:.2}" width="150" height="52" fill="white" fill-opacity="0.85" stroke="#999"/>
<circle cx="{:.2}" cy="{:.2}" r="6" fill="{HISTORY_COLOR}" fill-opacity="0.4"/>
<text x="{:.2}" y="{:.2}" font-size="13">Last {history_len} Days</text>
<circle cx="{:.2}" cy="{:.2}" r="8" fill="{LATEST_COLOR}" stroke="black"/>
<text x="{:.2}" y="{:.2}" font-size="13">Today</text>
</g>
"##,
            y - 14.0,
            x + 16.0,
            y,
            x + 32.0,
            y + 4.0,
            x + 16.0,
            y + 24.0,
            x + 32.0,
            y + 28.0,
        )
    }
}

/// Escapes text for use inside SVG/HTML element content and attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{AnalyticsEngine, LabeledSeries};

    const DAY_MS: f64 = 86_400_000.0;
    const JAN_1: f64 = 1_704_067_200_000.0;

    fn report(strength: &[f64], breadth: &[f64]) -> Report {
        let series = |label: &str, values: &[f64]| {
            LabeledSeries::from_millis(
                label,
                values
                    .iter()
                    .enumerate()
                    .map(|(i, &v)| (JAN_1 + i as f64 * DAY_MS, v)),
            )
            .unwrap()
        };
        AnalyticsEngine::default()
            .calculate(&series("strength", strength), &series("breadth", breadth))
            .unwrap()
    }

    #[test]
    fn draws_quadrants_points_and_legend() {
        let strength: Vec<f64> = (0..20).map(|i| (i as f64 * 0.9).sin()).collect();
        let breadth: Vec<f64> = (0..20).map(|i| (i as f64 * 0.4).cos()).collect();
        let svg = ScatterChart::default().render(&report(&strength, &breadth));

        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="quadrant""#).count(), 4);
        for q in Quadrant::ALL {
            assert!(svg.contains(&format!(r#"data-quadrant="{}""#, q.label())));
        }
        assert_eq!(svg.matches(r#"class="history""#).count(), 19);
        assert_eq!(svg.matches(r#"class="latest""#).count(), 1);
        assert!(svg.contains("Last 19 Days"));
        assert!(svg.contains("Today 2024-01-20"));
        assert!(svg.contains("Stock Price Breadth (Z-score)"));
        assert!(svg.contains("Stock Price Strength (Z-score)"));
    }

    #[test]
    fn extent_grows_to_fit_outliers() {
        let small = report(&[1.0, 2.0, 3.0], &[3.0, 1.0, 2.0]);
        assert_eq!(ScatterChart::extent_for(&small), 3.0);

        // One spike among flat values sits ~4.2 deviations out.
        let mut strength = vec![0.0; 19];
        strength.push(100.0);
        let breadth: Vec<f64> = (0..20).map(|i| i as f64).collect();
        assert_eq!(ScatterChart::extent_for(&report(&strength, &breadth)), 5.0);
    }

    #[test]
    fn origin_maps_to_plot_centre() {
        let frame = Frame {
            left: 70.0,
            top: 20.0,
            side: 600.0,
            extent: 3.0,
        };
        assert_eq!(frame.x(0.0), 370.0);
        assert_eq!(frame.y(0.0), 320.0);
        assert_eq!(frame.x(-3.0), 70.0);
        assert_eq!(frame.y(3.0), 20.0);
    }

    #[test]
    fn fallback_has_message_and_no_points() {
        let svg = ScatterChart::default().render_fallback("Feed <down> & out");
        assert!(svg.contains("Feed &lt;down&gt; &amp; out"));
        assert!(!svg.contains("class=\"latest\""));
        assert!(!svg.contains("class=\"quadrant\""));
    }
}
