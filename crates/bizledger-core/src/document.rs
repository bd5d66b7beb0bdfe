//! # Invoice Documents
//!
//! Plain records handed to whatever renders an invoice (PDF, print, JSON).
//! Layout is the renderer's business; this module only assembles the data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Invoice, InvoiceLine, Item, Party, TaxRate};

/// One printed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentLine {
    pub name: String,
    pub qty: i64,
    pub rate: Money,
    /// Item tax rate as a percentage, e.g. `18.0`.
    pub tax_percent: f64,
    pub total: Money,
}

/// Everything a renderer needs for one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub party_name: String,
    pub party_phone: Option<String>,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub total_amount: Money,
    pub lines: Vec<DocumentLine>,
}

impl InvoiceDocument {
    /// Joins a committed invoice with its party and item master data.
    ///
    /// Lines keep their committed order. Fails with `ItemNotFound` if a line
    /// refers to an item missing from `items`.
    pub fn assemble(
        invoice: &Invoice,
        party: &Party,
        lines: &[InvoiceLine],
        items: &HashMap<String, Item>,
    ) -> CoreResult<Self> {
        let mut ordered: Vec<&InvoiceLine> = lines.iter().collect();
        ordered.sort_by_key(|l| l.line_no);

        let lines = ordered
            .into_iter()
            .map(|line| {
                let item = items
                    .get(&line.item_id)
                    .ok_or_else(|| CoreError::ItemNotFound(line.item_id.clone()))?;
                Ok(DocumentLine {
                    name: item.name.clone(),
                    qty: line.quantity,
                    rate: line.rate(),
                    tax_percent: item.tax_rate().percentage(),
                    total: line.total(),
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(InvoiceDocument {
            invoice_number: invoice.invoice_number.clone(),
            party_name: party.name.clone(),
            party_phone: party.phone.clone(),
            date: invoice.date,
            total_amount: invoice.total_amount(),
            lines,
        })
    }

    /// Tax contained in the invoice, summed per line at its item's rate.
    ///
    /// Line rates are entered tax-inclusive, so this is the share already
    /// inside `total_amount`, not an amount on top of it.
    pub fn tax_total(&self) -> Money {
        self.lines
            .iter()
            .map(|l| l.total.included_tax(TaxRate::from_percentage(l.tax_percent)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InvoiceStatus;
    use chrono::Utc;

    #[test]
    fn test_assemble_orders_lines_and_copies_party() {
        let party = Party {
            id: "p".into(),
            name: "Acme".into(),
            phone: Some("555-0100".into()),
            created_at: Utc::now(),
        };
        let widget = Item {
            id: "w".into(),
            name: "Widget".into(),
            sku: None,
            price_cents: 5000,
            stock_quantity: 5,
            tax_rate_bps: 1800,
            created_at: Utc::now(),
        };
        let invoice = Invoice {
            id: "inv".into(),
            invoice_number: "INV-7".into(),
            party_id: "p".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            total_amount_cents: 20000,
            status: InvoiceStatus::Final,
            created_at: Utc::now(),
        };
        let line = |no: i64, qty: i64| InvoiceLine {
            id: format!("l{no}"),
            invoice_id: "inv".into(),
            item_id: "w".into(),
            line_no: no,
            quantity: qty,
            rate_cents: 5000,
            total_cents: qty * 5000,
        };
        let items: HashMap<_, _> = [("w".to_string(), widget)].into_iter().collect();

        let doc = InvoiceDocument::assemble(&invoice, &party, &[line(2, 1), line(1, 3)], &items)
            .unwrap();

        assert_eq!(doc.party_name, "Acme");
        assert_eq!(doc.party_phone.as_deref(), Some("555-0100"));
        assert_eq!(doc.lines[0].qty, 3);
        assert_eq!(doc.lines[1].qty, 1);
        assert_eq!(doc.lines[0].tax_percent, 18.0);
        assert_eq!(doc.total_amount.cents(), 20000);
        // 150.00 + 50.00 at 18% inclusive: 22.88 + 7.63
        assert_eq!(doc.tax_total().cents(), 3051);

        let one_line = InvoiceDocument {
            total_amount: Money::from_cents(11800),
            lines: vec![DocumentLine {
                name: "Widget".into(),
                qty: 1,
                rate: Money::from_cents(11800),
                tax_percent: 18.0,
                total: Money::from_cents(11800),
            }],
            ..doc.clone()
        };
        assert_eq!(one_line.tax_total().cents(), 1800);

        let missing = InvoiceDocument::assemble(&invoice, &party, &[line(1, 1)], &HashMap::new());
        assert!(matches!(missing, Err(CoreError::ItemNotFound(_))));
    }
}
