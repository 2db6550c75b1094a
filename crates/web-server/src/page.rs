//! The HTML shell around the chart.

use crate::chart::escape;
use crate::pipeline::DashboardView;
use analytics::Report;
use configuration::DashboardConfig;
use core_types::Quadrant;

/// Renders the full dashboard around an already-rendered chart.
pub fn render_dashboard(config: &DashboardConfig, view: &DashboardView, chart_svg: &str) -> String {
    let latest = &view.report.latest;
    let mut status = format!(
        r#"<p class="status success">Last updated: {}</p>
<p class="reading">Latest reading: <strong style="color: {}">{}</strong> ({}). Breadth z = {:.2}, strength z = {:.2}.</p>"#,
        escape(&view.report.as_of_date),
        latest.quadrant.color(),
        latest.quadrant,
        latest.quadrant.description(),
        latest.point.z_breadth,
        latest.point.z_strength,
    );
    status.push_str(&format!(
        "\n<p class=\"counts\">{}</p>",
        quadrant_counts(&view.report)
    ));
    if let Some(headline) = &view.headline {
        status.push_str(&format!(
            "\n<p class=\"headline\">Fear &amp; Greed index: {:.0} ({})</p>",
            headline.score,
            escape(&headline.rating),
        ));
    }
    if let Some(ratings) = indicator_ratings(view) {
        status.push_str(&format!(
            "\n<p class=\"ratings\">Feed ratings: {}</p>",
            escape(&ratings)
        ));
    }

    let body = format!(
        "<figure>\n{chart_svg}</figure>\n{status}\n<p class=\"note\">Z-scores over the last {} trading days (window {}). Feed fetched {}.</p>",
        view.report.points.len(),
        view.report.window_size,
        view.fetched_at.format("%Y-%m-%d %H:%M UTC"),
    );
    shell(config, &body)
}

/// Days per quadrant over the window, e.g. `Greed 7 · Mixed 3 · Fear 6 · Recovery 4`.
pub fn quadrant_counts(report: &Report) -> String {
    Quadrant::ALL
        .iter()
        .map(|q| format!("{} {}", q.label(), report.count_in(*q)))
        .collect::<Vec<_>>()
        .join(" · ")
}

/// The feed's ratings for the two indicators, when it sent any.
pub fn indicator_ratings(view: &DashboardView) -> Option<String> {
    let parts: Vec<String> = [
        ("strength", &view.strength_rating),
        ("breadth", &view.breadth_rating),
    ]
    .into_iter()
    .filter_map(|(name, rating)| rating.as_ref().map(|r| format!("{name} {r}")))
    .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Renders the page shown when no report could be produced.
pub fn render_fallback(config: &DashboardConfig) -> String {
    let body = format!(
        r#"<p class="status error">{}</p>"#,
        escape(&config.fallback_message)
    );
    shell(config, &body)
}

fn shell(config: &DashboardConfig, body: &str) -> String {
    let refresh = if config.refresh_interval.is_zero() {
        String::new()
    } else {
        format!(
            "<meta http-equiv=\"refresh\" content=\"{}\">\n",
            config.refresh_interval.as_secs().max(1)
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{title}</title>
<style>
body {{ font-family: sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #222; }}
figure {{ margin: 0; }}
svg {{ max-width: 100%; height: auto; }}
.status {{ padding: 0.75rem 1rem; border-radius: 0.4rem; }}
.success {{ background: #e6f4ea; color: #1e4620; }}
.error {{ background: #fdecea; color: #611a15; }}
.note {{ color: #666; font-size: 0.9rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(&config.title),
    )
}
