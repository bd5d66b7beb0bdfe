//! # CSV Export
//!
//! Pass-through writers for report data. Amounts are written as plain
//! decimals (`150.00`) without a currency symbol so spreadsheets can sum
//! them.
//!
//! | Export      | Columns                                                  |
//! |-------------|----------------------------------------------------------|
//! | invoices    | Invoice Number, Party Name, Date, Total Amount, Status   |
//! | inventory   | Item Name, SKU, Price, Stock Qty, Total Value            |
//! | trend       | Period, Total Amount, Invoice Count                      |
//! | rankings    | Label, Value                                             |

use serde::Serialize;
use std::io;

use bizledger_core::analytics::{RankedEntry, TrendPoint};
use bizledger_core::{InvoiceSummary, Item};

use crate::error::ApiError;

#[derive(Serialize)]
struct InvoiceRow<'a> {
    #[serde(rename = "Invoice Number")]
    invoice_number: &'a str,
    #[serde(rename = "Party Name")]
    party_name: &'a str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Total Amount")]
    total_amount: String,
    #[serde(rename = "Status")]
    status: &'static str,
}

#[derive(Serialize)]
struct InventoryRow<'a> {
    #[serde(rename = "Item Name")]
    name: &'a str,
    #[serde(rename = "SKU")]
    sku: &'a str,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Stock Qty")]
    stock_quantity: i64,
    #[serde(rename = "Total Value")]
    total_value: String,
}

#[derive(Serialize)]
struct TrendRow<'a> {
    #[serde(rename = "Period")]
    period: &'a str,
    #[serde(rename = "Total Amount")]
    total_amount: String,
    #[serde(rename = "Invoice Count")]
    invoice_count: i64,
}

#[derive(Serialize)]
struct RankingRow<'a> {
    #[serde(rename = "Label")]
    label: &'a str,
    #[serde(rename = "Value")]
    value: String,
}

/// Invoice register. Rows are written in the order given.
pub fn write_invoices<W: io::Write>(out: W, invoices: &[InvoiceSummary]) -> Result<(), ApiError> {
    let mut writer = csv::Writer::from_writer(out);
    if invoices.is_empty() {
        writer.write_record(["Invoice Number", "Party Name", "Date", "Total Amount", "Status"])?;
    }
    for invoice in invoices {
        writer.serialize(InvoiceRow {
            invoice_number: &invoice.invoice_number,
            party_name: invoice.party_name.as_deref().unwrap_or(""),
            date: invoice.date.format("%Y-%m-%d").to_string(),
            total_amount: invoice.total_amount().to_decimal_string(),
            status: invoice.status.as_str(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Stock valuation: price × stock per item.
pub fn write_inventory<W: io::Write>(out: W, items: &[Item]) -> Result<(), ApiError> {
    let mut writer = csv::Writer::from_writer(out);
    if items.is_empty() {
        writer.write_record(["Item Name", "SKU", "Price", "Stock Qty", "Total Value"])?;
    }
    for item in items {
        writer.serialize(InventoryRow {
            name: &item.name,
            sku: item.sku.as_deref().unwrap_or(""),
            price: item.price().to_decimal_string(),
            stock_quantity: item.stock_quantity,
            total_value: item.stock_value().to_decimal_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_trend<W: io::Write>(out: W, points: &[TrendPoint]) -> Result<(), ApiError> {
    let mut writer = csv::Writer::from_writer(out);
    if points.is_empty() {
        writer.write_record(["Period", "Total Amount", "Invoice Count"])?;
    }
    for point in points {
        writer.serialize(TrendRow {
            period: &point.bucket_label,
            total_amount: point.total_amount().to_decimal_string(),
            invoice_count: point.invoice_count,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_rankings<W: io::Write>(out: W, entries: &[RankedEntry]) -> Result<(), ApiError> {
    let mut writer = csv::Writer::from_writer(out);
    if entries.is_empty() {
        writer.write_record(["Label", "Value"])?;
    }
    for entry in entries {
        writer.serialize(RankingRow {
            label: &entry.label,
            value: entry.value().to_decimal_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizledger_core::InvoiceStatus;
    use chrono::{NaiveDate, Utc};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<(), ApiError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_invoice_register() {
        let invoices = vec![InvoiceSummary {
            id: "x".into(),
            invoice_number: "INV-1".into(),
            party_id: "p".into(),
            party_name: Some("Acme, Ltd".into()),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            total_amount_cents: 15000,
            status: InvoiceStatus::Final,
            created_at: Utc::now(),
        }];

        let csv = render(|buf| write_invoices(buf, &invoices));
        assert_eq!(
            csv,
            "Invoice Number,Party Name,Date,Total Amount,Status\n\
             INV-1,\"Acme, Ltd\",2025-01-15,150.00,final\n"
        );
    }

    #[test]
    fn test_inventory_valuation() {
        let items = vec![Item {
            id: "i".into(),
            name: "Widget".into(),
            sku: None,
            price_cents: 5000,
            stock_quantity: 7,
            tax_rate_bps: 1800,
            created_at: Utc::now(),
        }];

        let csv = render(|buf| write_inventory(buf, &items));
        assert_eq!(
            csv,
            "Item Name,SKU,Price,Stock Qty,Total Value\nWidget,,50.00,7,350.00\n"
        );
    }

    #[test]
    fn test_empty_exports_still_have_headers() {
        assert_eq!(
            render(|buf| write_trend(buf, &[])),
            "Period,Total Amount,Invoice Count\n"
        );
        assert_eq!(render(|buf| write_rankings(buf, &[])), "Label,Value\n");
    }

    #[test]
    fn test_rankings() {
        let entries = vec![
            RankedEntry { label: "Gadget".into(), value_cents: 50000 },
            RankedEntry { label: "Widget".into(), value_cents: 30000 },
        ];
        assert_eq!(
            render(|buf| write_rankings(buf, &entries)),
            "Label,Value\nGadget,500.00\nWidget,300.00\n"
        );
    }
}
