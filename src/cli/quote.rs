use super::ui;
use crate::core::{Quote, Source, Statistics};
use crate::dashboard::Dashboard;
use anyhow::Result;
use comfy_table::Cell;

/// Renders a quote, its statistics and, for bank quotes, the per-bank
/// rates.
pub fn render_quote(quote: &Quote, stats: &Statistics) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Compra (CLP)"),
        ui::header_cell("Venta (CLP)"),
        ui::header_cell("Fecha"),
    ]);
    table.add_row(vec![
        ui::rate_cell(quote.buy_price),
        ui::rate_cell(quote.sell_price),
        Cell::new(quote.date.to_string()),
    ]);

    let mut stats_table = ui::new_styled_table();
    stats_table.set_header(vec![
        ui::header_cell("Máximo"),
        ui::header_cell("Mínimo"),
        ui::header_cell("Promedio"),
        ui::header_cell("Spread"),
        ui::header_cell("Compra vs base"),
        ui::header_cell("Venta vs base"),
    ]);
    stats_table.add_row(vec![
        ui::rate_cell(stats.max),
        ui::rate_cell(stats.min),
        ui::rate_cell(stats.average),
        ui::spread_cell(stats.spread),
        stats.buy_change_pct.map_or(ui::na_cell(false), ui::change_cell),
        stats.sell_change_pct.map_or(ui::na_cell(false), ui::change_cell),
    ]);

    let mut output = format!(
        "Fuente: {}\n\n",
        ui::style_text(quote.source.label(), ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str("\n\n");
    output.push_str(&stats_table.to_string());

    if !quote.institutions().is_empty() {
        let mut banks_table = ui::new_styled_table();
        banks_table.set_header(vec![
            ui::header_cell("Banco"),
            ui::header_cell("Compra"),
            ui::header_cell("Venta"),
        ]);
        for rate in quote.institutions() {
            banks_table.add_row(vec![
                Cell::new(&rate.institution),
                ui::rate_cell(rate.buy),
                ui::rate_cell(rate.sell),
            ]);
        }
        output.push_str("\n\n");
        output.push_str(&banks_table.to_string());
    }

    output.push_str(&format!(
        "\n\n{}",
        ui::style_text(
            &format!(
                "Actualizado: {}",
                quote.retrieved_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            ui::StyleType::Subtle
        )
    ));
    output
}

pub async fn run(dashboard: &Dashboard, source: Source) -> Result<()> {
    let pb = ui::new_spinner(&format!("Cargando desde {}...", source.label()));
    let result = dashboard.quote(source).await;
    pb.finish_and_clear();

    let quote = result?;
    let stats = dashboard.statistics(&quote);
    println!("{}", render_quote(&quote, &stats));
    Ok(())
}
