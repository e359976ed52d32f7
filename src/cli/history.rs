use super::{quote, ui};
use crate::core::{HistoricalTable, derive_statistics};
use crate::dashboard::Dashboard;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// Renders the whole table, oldest day first, with the change of each
/// day's buy price against the oldest one.
pub fn render_table(history: &HistoricalTable) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Fecha"),
        ui::header_cell("Compra"),
        ui::header_cell("Venta"),
        ui::header_cell("Mínimo"),
        ui::header_cell("Máximo"),
        ui::header_cell("Spread"),
        ui::header_cell("Cambio"),
    ]);

    let baseline = history.earliest().map(|(_, entry)| entry.buy);
    for (date, entry) in history.iter() {
        let stats = derive_statistics(Some(entry), baseline);
        table.add_row(vec![
            Cell::new(date.format("%Y-%m-%d")),
            ui::rate_cell(entry.buy),
            ui::rate_cell(entry.sell),
            ui::rate_cell(stats.min),
            ui::rate_cell(stats.max),
            ui::spread_cell(stats.spread),
            stats.buy_change_pct.map_or(ui::na_cell(false), ui::change_cell),
        ]);
    }

    let range = match (history.earliest(), history.latest()) {
        (Some((first, _)), Some((last, _))) => format!("{first} a {last}"),
        _ => "sin datos".to_string(),
    };
    let mut output = format!(
        "Histórico {}\n\n",
        ui::style_text(&range, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output
}

pub async fn run(dashboard: &Dashboard, date: Option<NaiveDate>) -> Result<()> {
    match date {
        Some(date) => {
            let quote = dashboard.historical_quote(date).await?;
            let stats = dashboard.statistics(&quote);
            println!("{}", quote::render_quote(&quote, &stats));
        }
        None => println!("{}", render_table(dashboard.history())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generate_historical_table;

    #[test]
    fn test_render_table() {
        let seed = NaiveDate::from_ymd_opt(2026, 2, 12).unwrap();
        let history = generate_historical_table(seed, 3);
        let output = console::strip_ansi_codes(&render_table(&history)).to_string();

        assert!(output.contains("2026-02-10 a 2026-02-12"));
        assert!(output.contains("848.30"));
        assert!(output.contains("845.50"));
        // 843.00 against 848.00 on the oldest day
        assert!(output.contains("-0.59%"));
        assert!(output.contains("0.00%"));
    }

    #[test]
    fn test_render_empty_table() {
        let history = HistoricalTable::default();
        let output = console::strip_ansi_codes(&render_table(&history)).to_string();
        assert!(output.contains("sin datos"));
    }
}
