use super::ui;
use crate::core::{Conversion, Source};
use crate::dashboard::Dashboard;
use anyhow::Result;
use tracing::debug;

/// Where the rate of a conversion came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateOrigin {
    Explicit,
    Quoted(Source),
}

pub struct ConversionResult {
    pub conversion: Conversion,
    pub amount: f64,
    pub rate: f64,
    pub origin: RateOrigin,
    pub converted: f64,
}

impl ConversionResult {
    pub fn render(&self) -> String {
        let origin = match self.origin {
            RateOrigin::Explicit => "tasa manual".to_string(),
            RateOrigin::Quoted(source) => source.label().to_string(),
        };
        format!(
            "{} = {}\n{}",
            ui::format_currency(self.amount, self.conversion.from_currency()),
            ui::style_text(
                &ui::format_currency(self.converted, self.conversion.to_currency()),
                ui::StyleType::Value
            ),
            ui::style_text(
                &format!("Tasa: {} ({origin})", ui::format_rate(self.rate)),
                ui::StyleType::Subtle
            )
        )
    }
}

/// Converts `amount` with `rate` when given, otherwise with the rate of a
/// fresh quote from `source` (or the configured default source).
pub async fn convert(
    dashboard: &Dashboard,
    conversion: Conversion,
    amount: f64,
    rate: Option<f64>,
    source: Option<Source>,
) -> Result<ConversionResult> {
    let (rate, origin) = match rate {
        Some(rate) => (rate, RateOrigin::Explicit),
        None => {
            let source = source.unwrap_or(dashboard.config().default_source);
            let pb = ui::new_spinner(&format!("Cargando desde {}...", source.label()));
            let quote = dashboard.quote(source).await;
            pb.finish_and_clear();
            (conversion.rate_from(&quote?), RateOrigin::Quoted(source))
        }
    };
    debug!(%conversion, amount, rate, "Converting");

    let converted = conversion.convert(amount, rate)?;
    Ok(ConversionResult {
        conversion,
        amount,
        rate,
        origin,
        converted,
    })
}

pub async fn run(
    dashboard: &Dashboard,
    conversion: Conversion,
    amount: f64,
    rate: Option<f64>,
    source: Option<Source>,
) -> Result<()> {
    let result = convert(dashboard, conversion, amount, rate, source).await?;
    println!("{}", result.render());
    Ok(())
}
