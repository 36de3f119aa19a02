//! HTML rendering for dip digest emails.

use super::notifications_model::EmailMessage;
use crate::alerts::DipAlert;

/// Builds one digest email covering all of an owner's triggered dips.
///
/// Callers guarantee `alerts` is non-empty and sorted deepest dip first.
pub fn render_dip_digest(to: &str, alerts: &[DipAlert]) -> EmailMessage {
    let subject = if alerts.len() == 1 {
        format!(
            "Dip alert: {} is {}% below its 52-week high",
            alerts[0].symbol, alerts[0].dip_percent
        )
    } else {
        format!("Dip alert: {} symbols on your watchlist", alerts.len())
    };

    let mut rows = String::new();
    for alert in alerts {
        rows.push_str(&format!(
            "<tr>\
             <td style=\"padding:6px 12px;font-weight:bold\">{}</td>\
             <td style=\"padding:6px 12px\">{}</td>\
             <td style=\"padding:6px 12px\">{}</td>\
             <td style=\"padding:6px 12px;color:#c0392b\">-{}%</td>\
             </tr>",
            escape_html(&alert.symbol),
            alert.current_price,
            alert.reference_high,
            alert.dip_percent,
        ));
    }

    let html = format!(
        "<div style=\"font-family:sans-serif;max-width:560px\">\
         <h2>Watchlist dip alert</h2>\
         <p>The following symbols dropped below your dip threshold:</p>\
         <table style=\"border-collapse:collapse;width:100%\">\
         <tr>\
         <th style=\"text-align:left;padding:6px 12px\">Symbol</th>\
         <th style=\"text-align:left;padding:6px 12px\">Price</th>\
         <th style=\"text-align:left;padding:6px 12px\">52w high</th>\
         <th style=\"text-align:left;padding:6px 12px\">Dip</th>\
         </tr>{}</table>\
         <p style=\"color:#888;font-size:12px\">\
         You receive at most one alert per symbol per day.</p>\
         </div>",
        rows
    );

    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
