use super::ui;
use crate::core::{Source, derive_statistics};
use crate::dashboard::{Dashboard, SourceOutcome};
use anyhow::Result;
use comfy_table::{Cell, Color};

/// One row per source; sources that failed keep their row and show the
/// error instead of rates.
pub fn render_board(outcomes: &[SourceOutcome], baseline: Option<f64>) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Fuente"),
        ui::header_cell("Compra"),
        ui::header_cell("Venta"),
        ui::header_cell("Promedio"),
        ui::header_cell("Spread"),
        ui::header_cell("Compra vs base"),
        ui::header_cell("Estado"),
    ]);

    let mut failures = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(quote) => {
                let stats = derive_statistics(Some(quote), baseline);
                table.add_row(vec![
                    Cell::new(outcome.source.label()),
                    ui::rate_cell(quote.buy_price),
                    ui::rate_cell(quote.sell_price),
                    ui::rate_cell(stats.average),
                    ui::spread_cell(stats.spread),
                    stats.buy_change_pct.map_or(ui::na_cell(false), ui::change_cell),
                    Cell::new("OK").fg(Color::Green),
                ]);
            }
            Err(e) => {
                failures += 1;
                table.add_row(vec![
                    Cell::new(outcome.source.label()),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    ui::na_cell(true),
                    Cell::new(format!("{e:#}")).fg(Color::Red),
                ]);
            }
        }
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Dólar observado USD/CLP", ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    if failures > 0 {
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(
                &format!("{failures} de {} fuentes no respondieron", outcomes.len()),
                ui::StyleType::Error
            )
        ));
    }
    output
}

pub async fn run(dashboard: &Dashboard) -> Result<()> {
    let pb = ui::new_progress_bar(Source::LIVE.len() as u64, "Consultando fuentes...");
    let outcomes = dashboard.live_quotes(&|| pb.inc(1)).await;
    pb.finish_and_clear();

    println!(
        "{}",
        render_board(&outcomes, dashboard.config().baseline_price)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Quote, QuoteDate};
    use chrono::Utc;

    #[test]
    fn test_render_board_mixed_outcomes() {
        let now = Utc::now();
        let outcomes = vec![
            SourceOutcome {
                source: Source::Mindicador,
                result: Err(anyhow::anyhow!("HTTP error: 503 Service Unavailable")),
            },
            SourceOutcome {
                source: Source::Investing,
                result: Ok(Quote {
                    source: Source::Investing,
                    buy_price: 848.25,
                    sell_price: 852.90,
                    date: QuoteDate::Instant(now),
                    retrieved_at: now,
                    detail: None,
                }),
            },
        ];

        let output = console::strip_ansi_codes(&render_board(&outcomes, None)).to_string();
        assert!(output.contains("Mindicador"));
        assert!(output.contains("503 Service Unavailable"));
        assert!(output.contains("Investing.com"));
        assert!(output.contains("848.25"));
        assert!(output.contains("4.65"));
        assert!(output.contains("1 de 2 fuentes no respondieron"));
    }
}
