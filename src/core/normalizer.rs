//! Turns raw source payloads into canonical [`Quote`]s.
//!
//! Each source publishes a different shape. The normalizer only checks and
//! reshapes what it is given: it never fetches, renders or notifies.

use crate::core::clock::Clock;
use crate::core::error::QuoteError;
use crate::core::history::HistoricalTable;
use crate::core::quote::{InstitutionRate, Quote, QuoteDate, QuoteDetail, Source};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

/// Fixed `(buy, sell)` pair published for the central bank.
pub const CENTRAL_BANK_RATES: (f64, f64) = (845.50, 850.75);
/// Fixed `(buy, sell)` pair published for Investing.com.
pub const INVESTING_RATES: (f64, f64) = (848.25, 852.90);

#[derive(Deserialize, Debug)]
struct MindicadorIndicator {
    valor: f64,
    fecha: String,
}

#[derive(Deserialize, Debug)]
struct BankRate {
    buy: f64,
    sell: f64,
}

#[derive(Deserialize, Debug)]
struct NamedBankRate {
    name: String,
    buy: f64,
    sell: f64,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum BankTable {
    ByName(BTreeMap<String, BankRate>),
    Listed(Vec<NamedBankRate>),
}

impl BankTable {
    fn into_rates(self) -> Vec<InstitutionRate> {
        match self {
            BankTable::ByName(map) => map
                .into_iter()
                .map(|(institution, r)| InstitutionRate {
                    institution,
                    buy: r.buy,
                    sell: r.sell,
                })
                .collect(),
            BankTable::Listed(list) => list
                .into_iter()
                .map(|r| InstitutionRate {
                    institution: r.name,
                    buy: r.buy,
                    sell: r.sell,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct HistoricalLookup {
    #[serde(alias = "date")]
    fecha: String,
}

fn parse_payload<T: DeserializeOwned>(source: Source, payload: &Value) -> Result<T, QuoteError> {
    <T as Deserialize>::deserialize(payload)
        .map_err(|e| QuoteError::malformed(source.label(), e.to_string()))
}

fn check_price(source: Source, field: &str, value: f64) -> Result<f64, QuoteError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(QuoteError::malformed(
            source.label(),
            format!("`{field}` must be a non-negative number, got {value}"),
        ))
    }
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Accepts RFC 3339 timestamps as well as plain days.
fn parse_quote_date(value: &str) -> Option<QuoteDate> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| QuoteDate::Instant(ts.with_timezone(&Utc)))
        .or_else(|| parse_day(value).map(QuoteDate::Day))
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let count = values.len() as f64;
    values.sum::<f64>() / count
}

pub struct Normalizer<'a> {
    history: &'a HistoricalTable,
    clock: &'a dyn Clock,
}

impl<'a> Normalizer<'a> {
    pub fn new(history: &'a HistoricalTable, clock: &'a dyn Clock) -> Self {
        Normalizer { history, clock }
    }

    /// Normalizes a payload for the source named by `source_id`.
    pub fn normalize(&self, source_id: &str, payload: &Value) -> Result<Quote, QuoteError> {
        let source = source_id.parse::<Source>()?;
        self.normalize_source(source, payload)
    }

    pub fn normalize_source(&self, source: Source, payload: &Value) -> Result<Quote, QuoteError> {
        match source {
            Source::Mindicador => self.from_mindicador(payload),
            Source::CentralBank => Ok(self.fixed_pair(source, CENTRAL_BANK_RATES)),
            Source::Investing => Ok(self.fixed_pair(source, INVESTING_RATES)),
            Source::Banks => self.from_banks(payload),
            Source::Historical => self.from_history(payload),
        }
    }

    fn live_quote(&self, source: Source, buy: f64, sell: f64, date: QuoteDate) -> Quote {
        Quote {
            source,
            buy_price: buy,
            sell_price: sell,
            date,
            retrieved_at: self.clock.now(),
            detail: None,
        }
    }

    fn fixed_pair(&self, source: Source, (buy, sell): (f64, f64)) -> Quote {
        self.live_quote(source, buy, sell, QuoteDate::Instant(self.clock.now()))
    }

    fn from_mindicador(&self, payload: &Value) -> Result<Quote, QuoteError> {
        let source = Source::Mindicador;
        // The full API response nests the rate under `dolar`
        let indicator = payload.get("dolar").unwrap_or(payload);
        let raw: MindicadorIndicator = parse_payload(source, indicator)?;

        let valor = check_price(source, "valor", raw.valor)?;
        let date = parse_quote_date(&raw.fecha).ok_or_else(|| {
            QuoteError::malformed(source.label(), format!("invalid `fecha`: {}", raw.fecha))
        })?;

        // Only one rate is published, it serves both sides
        Ok(self.live_quote(source, valor, valor, date))
    }

    fn from_banks(&self, payload: &Value) -> Result<Quote, QuoteError> {
        let source = Source::Banks;
        let table = payload.get("banks").unwrap_or(payload);
        let rates = parse_payload::<BankTable>(source, table)?.into_rates();

        if rates.is_empty() {
            return Err(QuoteError::malformed(source.label(), "no institutions"));
        }
        for rate in &rates {
            check_price(source, &format!("{}.buy", rate.institution), rate.buy)?;
            check_price(source, &format!("{}.sell", rate.institution), rate.sell)?;
        }

        let buy = mean(rates.iter().map(|r| r.buy));
        let sell = mean(rates.iter().map(|r| r.sell));
        let mut quote = self.live_quote(source, buy, sell, QuoteDate::Instant(self.clock.now()));
        quote.detail = Some(QuoteDetail::Banks(rates));
        Ok(quote)
    }

    fn from_history(&self, payload: &Value) -> Result<Quote, QuoteError> {
        let source = Source::Historical;
        let lookup: HistoricalLookup = parse_payload(source, payload)?;
        let day = parse_day(&lookup.fecha).ok_or_else(|| {
            QuoteError::malformed(source.label(), format!("invalid date: {}", lookup.fecha))
        })?;

        if day > self.clock.today() {
            return Err(QuoteError::FutureDate(day));
        }
        let entry = self
            .history
            .get(&day)
            .ok_or(QuoteError::NoHistoricalData(day))?;

        Ok(Quote {
            source,
            buy_price: entry.buy,
            sell_price: entry.sell,
            date: QuoteDate::Day(day),
            retrieved_at: self.clock.now(),
            detail: Some(QuoteDetail::Historical {
                min: entry.min,
                max: entry.max,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::core::history::generate_historical_table;
    use crate::core::statistics::derive_statistics;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 12).unwrap()
    }

    fn fixtures() -> (HistoricalTable, FixedClock) {
        (
            generate_historical_table(today(), 30),
            FixedClock::at_day(today()),
        )
    }

    #[test]
    fn test_mindicador_api_response() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        let payload = json!({
            "version": "1.7.0",
            "autor": "mindicador.cl",
            "fecha": "2026-02-12T20:00:00.000Z",
            "dolar": {
                "codigo": "dolar",
                "nombre": "Dólar observado",
                "unidad_medida": "Pesos",
                "fecha": "2026-02-12T03:00:00.000Z",
                "valor": 851.27
            }
        });

        let quote = normalizer.normalize("mindicador", &payload).unwrap();
        assert_eq!(quote.source, Source::Mindicador);
        assert_eq!(quote.buy_price, 851.27);
        assert_eq!(quote.sell_price, 851.27);
        assert_eq!(quote.date.day(), today());
        assert!(matches!(quote.date, QuoteDate::Instant(_)));
        assert_eq!(quote.retrieved_at, clock.now());
        assert!(quote.detail.is_none());
    }

    #[test]
    fn test_mindicador_bare_indicator() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        let payload = json!({"valor": 850, "fecha": "2026-02-11"});

        let quote = normalizer.normalize("Mindicador", &payload).unwrap();
        assert_eq!(quote.buy_price, 850.0);
        assert_eq!(
            quote.date,
            QuoteDate::Day(NaiveDate::from_ymd_opt(2026, 2, 11).unwrap())
        );
    }

    #[test]
    fn test_mindicador_malformed() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);

        for payload in [
            json!({}),
            json!({"dolar": {"fecha": "2026-02-12"}}),
            json!({"dolar": {"valor": "850", "fecha": "2026-02-12"}}),
            json!({"dolar": {"valor": 850.0}}),
            json!({"dolar": {"valor": 850.0, "fecha": "yesterday"}}),
            json!({"dolar": {"valor": -1.0, "fecha": "2026-02-12"}}),
        ] {
            let result = normalizer.normalize("mindicador", &payload);
            assert!(
                matches!(result, Err(QuoteError::MalformedPayload { .. })),
                "payload {payload} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_fixed_pairs() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);

        let central = normalizer.normalize("sbif", &Value::Null).unwrap();
        assert_eq!(central.source, Source::CentralBank);
        assert_eq!((central.buy_price, central.sell_price), (845.50, 850.75));
        assert_eq!(central.date, QuoteDate::Instant(clock.now()));

        let investing = normalizer.normalize("investing", &json!({})).unwrap();
        assert_eq!(investing.source, Source::Investing);
        assert_eq!((investing.buy_price, investing.sell_price), (848.25, 852.90));
        assert!(investing.sell_price > investing.buy_price);
    }

    #[test]
    fn test_banks_mean() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        let payload = json!({
            "Banco de Chile": {"buy": 850.00, "sell": 855.00},
            "Santander": {"buy": 851.00, "sell": 856.00},
            "BCI": {"buy": 850.50, "sell": 855.50},
            "Scotiabank": {"buy": 851.50, "sell": 856.50}
        });

        let quote = normalizer.normalize("banks", &payload).unwrap();
        assert_eq!(quote.source, Source::Banks);
        assert!((quote.buy_price - 850.75).abs() < 1e-9);
        assert!((quote.sell_price - 855.75).abs() < 1e-9);
        assert_eq!(quote.institutions().len(), 4);
        assert_eq!(quote.institutions()[0].institution, "BCI");
    }

    #[test]
    fn test_banks_sell_below_buy_is_accepted() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        let payload = json!({"X": {"buy": 852, "sell": 850}});

        let quote = normalizer.normalize("banks", &payload).unwrap();
        assert_eq!((quote.buy_price, quote.sell_price), (852.0, 850.0));

        let stats = derive_statistics(Some(&quote), None);
        assert_eq!(stats.spread, -2.0);
        assert_eq!(stats.max, 852.0);
        assert_eq!(stats.min, 850.0);
    }

    #[test]
    fn test_banks_listed_form() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        let payload = json!({
            "banks": [
                {"name": "Banco de Chile", "buy": 844.00, "sell": 854.00},
                {"name": "Santander", "buy": 843.50, "sell": 854.50},
                {"name": "BCI", "buy": 844.10, "sell": 853.90}
            ]
        });

        let quote = normalizer.normalize("bancos", &payload).unwrap();
        assert!((quote.buy_price - (844.00 + 843.50 + 844.10) / 3.0).abs() < 1e-9);
        assert!((quote.sell_price - 854.13333333333).abs() < 1e-6);
        assert_eq!(quote.institutions()[0].institution, "Banco de Chile");
    }

    #[test]
    fn test_banks_malformed() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);

        for payload in [
            json!({}),
            json!([]),
            json!({"BCI": {"buy": 850.0}}),
            json!({"BCI": {"buy": 850.0, "sell": -3.0}}),
            json!("banks"),
        ] {
            let result = normalizer.normalize("banks", &payload);
            assert!(
                matches!(result, Err(QuoteError::MalformedPayload { .. })),
                "payload {payload} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_historical_lookup() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);

        let quote = normalizer
            .normalize("historical", &json!({"fecha": "2026-02-11"}))
            .unwrap();
        assert_eq!(quote.source, Source::Historical);
        assert_eq!(quote.buy_price, 845.50);
        assert_eq!(quote.sell_price, 850.80);
        assert_eq!(
            quote.date,
            QuoteDate::Day(NaiveDate::from_ymd_opt(2026, 2, 11).unwrap())
        );
        assert_eq!(quote.retrieved_at, clock.now());
        assert_eq!(
            quote.detail,
            Some(QuoteDetail::Historical {
                min: 842.50,
                max: 848.50
            })
        );

        let quote = normalizer
            .normalize("historical", &json!({"date": "2026-02-12"}))
            .unwrap();
        assert_eq!(quote.buy_price, 843.00);
    }

    #[test]
    fn test_historical_errors() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);

        assert_eq!(
            normalizer.normalize("historical", &json!({"fecha": "2026-02-13"})),
            Err(QuoteError::FutureDate(
                NaiveDate::from_ymd_opt(2026, 2, 13).unwrap()
            ))
        );
        assert_eq!(
            normalizer.normalize("historical", &json!({"fecha": "2025-12-01"})),
            Err(QuoteError::NoHistoricalData(
                NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
            ))
        );
        assert!(matches!(
            normalizer.normalize("historical", &json!({"fecha": "12/02/2026"})),
            Err(QuoteError::MalformedPayload { .. })
        ));
        assert!(matches!(
            normalizer.normalize("historical", &json!({})),
            Err(QuoteError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_unknown_source() {
        let (table, clock) = fixtures();
        let normalizer = Normalizer::new(&table, &clock);
        assert_eq!(
            normalizer.normalize("coinbase", &json!({})),
            Err(QuoteError::UnknownSource("coinbase".to_string()))
        );
    }
}
