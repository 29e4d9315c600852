//! Persisted pricing report (pricing.json).

use crate::appstore::PriceRecord;
use anyhow::{Context, Result};
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::info;

/// Writes the final record set as a JSON array, overwriting any previous report.
///
/// When `home_currency` is given, every record carries a dynamically keyed
/// conversion field ("priceUSD" etc.), `null` for unconvertible entries. When
/// the rate fetch failed the caller passes `None` and the field is omitted
/// entirely.
pub fn write_report(
    path: impl AsRef<Path>,
    records: &[PriceRecord],
    home_currency: Option<&str>,
) -> Result<()> {
    let path = path.as_ref();
    let home_key = home_currency.map(|c| format!("price{}", c.to_uppercase()));

    let entries: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut entry = Map::new();
            entry.insert("country".to_string(), Value::String(record.region.clone()));
            entry.insert("price".to_string(), json_number(record.price));
            entry.insert("currency".to_string(), Value::String(record.currency.clone()));

            if let Some(key) = &home_key {
                let converted =
                    record.home_price.map(json_number).unwrap_or(Value::Null);
                entry.insert(key.clone(), converted);
            }

            Value::Object(entry)
        })
        .collect();

    let body = serde_json::to_string_pretty(&Value::Array(entries))?;
    std::fs::write(path, body)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn json_number(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_record(region: &str, price: f64, currency: &str, home: Option<f64>) -> PriceRecord {
        PriceRecord {
            region: region.to_string(),
            price,
            currency: currency.to_string(),
            home_price: home,
        }
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_report_with_conversion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        let records = vec![
            make_record("Turkey", 89.99, "TRY", Some(2.74)),
            make_record("Venezuela", 100.0, "VES", None),
        ];

        write_report(&path, &records, Some("usd")).unwrap();

        let parsed = read_json(&path);
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0]["country"], "Turkey");
        assert_eq!(entries[0]["price"], 89.99);
        assert_eq!(entries[0]["currency"], "TRY");
        assert_eq!(entries[0]["priceUSD"], 2.74);

        // Unconvertible entries carry an explicit null.
        assert!(entries[1]["priceUSD"].is_null());
    }

    #[test]
    fn test_report_without_conversion_omits_home_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        let records = vec![make_record("Japan", 1200.0, "JPY", None)];
        write_report(&path, &records, None).unwrap();

        let parsed = read_json(&path);
        let entry = &parsed.as_array().unwrap()[0];
        assert_eq!(entry["country"], "Japan");
        assert!(entry.get("priceJPY").is_none());
        assert!(entry.as_object().unwrap().keys().all(|k| !k.starts_with("price") || k == "price"));
    }

    #[test]
    fn test_report_key_uses_uppercased_currency() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        let records = vec![make_record("France", 9.99, "EUR", Some(9.99))];
        write_report(&path, &records, Some("eur")).unwrap();

        let parsed = read_json(&path);
        assert_eq!(parsed[0]["priceEUR"], 9.99);
    }

    #[test]
    fn test_report_overwrites_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        write_report(&path, &[make_record("A", 1.0, "USD", Some(1.0))], Some("USD")).unwrap();
        write_report(&path, &[make_record("B", 2.0, "USD", Some(2.0))], Some("USD")).unwrap();

        let parsed = read_json(&path);
        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["country"], "B");
    }

    #[test]
    fn test_report_empty_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pricing.json");

        write_report(&path, &[], Some("USD")).unwrap();
        assert_eq!(read_json(&path), serde_json::json!([]));
    }

    #[test]
    fn test_report_unwritable_path_errors() {
        let result = write_report("/nonexistent/dir/pricing.json", &[], None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to write report"));
    }
}
