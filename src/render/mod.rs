//! HTML rendering of an assembled report
//! Plain string assembly; the renderer consumes the typed model and never
//! re-derives sentiment or price math.

use crate::report::Report;

const STYLES: &str = "\
body { font-family: Arial, sans-serif; background-color: #ffffff; padding: 20px; color: #333; }\n\
h2, h3 { margin-top: 30px; color: #111; }\n\
.headline { font-size: 16px; font-weight: bold; }\n\
.sentiment-line { font-size: 14px; margin-top: 4px; color: #666; }\n\
.positive { color: #27ae60; }\n\
.negative { color: #c0392b; }\n\
.neutral { color: #f39c12; }\n\
.tile { display: inline-block; color: white; padding: 15px 10px; min-width: 100px; \
text-align: center; font-weight: bold; font-family: monospace; border-radius: 8px; margin: 4px; }\n\
a { text-decoration: none; color: #000000; }\n";

/// Render the brief as a self-contained HTML document
pub fn render_html(report: &Report) -> String {
    let mut html = String::new();
    html.push_str("<html>\n<head><style>");
    html.push_str(STYLES);
    html.push_str("</style></head>\n<body>\n");
    html.push_str(&format!(
        "<h2>Morning Market Brief - {}</h2>\n",
        report.generated_at.format("%A, %d %B %Y")
    ));

    html.push_str("<h3>Top Finance Headlines</h3>\n");
    if report.headlines.is_empty() {
        html.push_str("<p>No headlines available.</p>\n");
    }
    for headline in &report.headlines {
        html.push_str(&format!(
            "<div class=\"headline\"><a href=\"{}\">{}</a></div>\n",
            escape(&headline.url),
            escape(&headline.title)
        ));
        match &headline.sentiment {
            Some(score) => {
                let line = match &score.distribution {
                    Some(dist) => format!(
                        "<span class='negative'>Negative: {:.1}%</span> | \
                         <span class='neutral'>Neutral: {:.1}%</span> | \
                         <span class='positive'>Positive: {:.1}%</span>",
                        dist.negative * 100.0,
                        dist.neutral * 100.0,
                        dist.positive * 100.0
                    ),
                    None => format!(
                        "<span class='{}'>{} ({:.0}%)</span>",
                        score.label.as_str(),
                        score.label,
                        score.confidence * 100.0
                    ),
                };
                html.push_str(&format!("<div class=\"sentiment-line\">{}</div>\n", line));
            }
            None => {
                html.push_str("<div class=\"sentiment-line\">sentiment unavailable</div>\n");
            }
        }
    }

    html.push_str("<h3>Stock Price Summary</h3>\n<div>\n");
    if report.quotes.is_empty() {
        html.push_str("<p>No price data available.</p>\n");
    }
    for quote in &report.quotes {
        let change = quote.percent_change_rounded();
        let bg_color = if change > 0.0 {
            "#27ae60"
        } else if change < 0.0 {
            "#c0392b"
        } else {
            "#f39c12"
        };
        let change_str = if change > 0.0 {
            format!("+{}%", change)
        } else {
            format!("{}%", change)
        };
        html.push_str(&format!(
            "<div class=\"tile\" style=\"background-color: {};\">{}<br>{}</div>\n",
            bg_color,
            escape(&quote.ticker),
            change_str
        ));
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Emerging Stocks</h3>\n");
    if report.emerging.is_empty() {
        html.push_str("<p>No major moves.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for entry in &report.emerging {
            html.push_str(&format!(
                "<li>{}: +{}% (close {:.2})</li>\n",
                escape(&entry.ticker),
                entry.percent_change_rounded(),
                entry.latest_close
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Minimal HTML escaping for externally sourced text
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
