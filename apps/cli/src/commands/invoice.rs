//! # Invoice Commands
//!
//! `create_invoice` hands the request to the invoice engine; every rule
//! (totals, stock, atomicity) is enforced there. This module only turns
//! command-line strings into an [`InvoiceRequest`].
//!
//! ## Line Syntax
//! ```text
//! --line ITEM_ID:QTY          rate = item list price
//! --line ITEM_ID:QTY:RATE     rate as given, e.g. 45.00
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bizledger_core::document::InvoiceDocument;
use bizledger_core::invoice::{CreatedInvoice, InvoiceRequest, LineRequest};
use bizledger_core::validation::parse_date;
use bizledger_core::{InvoiceSummary, Money};
use bizledger_db::InvoiceFilter;

use crate::cli::InvoiceListArgs;
use crate::error::ApiError;
use crate::state::{ConfigState, DbState};

/// One parsed `--line` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub item_id: String,
    pub quantity: i64,
    pub rate: Option<Money>,
}

pub fn parse_line_spec(spec: &str) -> Result<LineSpec, ApiError> {
    let invalid = || ApiError::validation(format!("line '{}' must be ITEM_ID:QTY[:RATE]", spec));

    let mut parts = spec.split(':').map(str::trim);
    let item_id = parts.next().filter(|s| !s.is_empty()).ok_or_else(invalid)?;
    let quantity = parts
        .next()
        .and_then(|q| q.parse::<i64>().ok())
        .ok_or_else(invalid)?;
    let rate = parts.next().map(Money::parse).transpose()?;

    if parts.next().is_some() {
        return Err(invalid());
    }

    Ok(LineSpec {
        item_id: item_id.to_string(),
        quantity,
        rate,
    })
}

/// Optional `YYYY-MM-DD` argument, defaulting to today (UTC).
pub fn date_or_today(field: &str, value: Option<&str>) -> Result<NaiveDate, ApiError> {
    match value {
        Some(v) => Ok(parse_date(field, v)?),
        None => Ok(Utc::now().date_naive()),
    }
}

pub async fn create_invoice(
    db: &DbState,
    config: &ConfigState,
    party_id: String,
    invoice_number: String,
    date: Option<&str>,
    lines: &[String],
) -> Result<CreatedInvoice, ApiError> {
    debug!(party_id = %party_id, invoice_number = %invoice_number, "create_invoice command");

    let date = date_or_today("date", date)?;

    let mut requests = Vec::with_capacity(lines.len());
    for spec in lines {
        let spec = parse_line_spec(spec)?;
        let rate = match spec.rate {
            Some(rate) => rate,
            // Unknown ids fall through; the engine reports them.
            None => db
                .inner()
                .items()
                .get_by_id(&spec.item_id)
                .await?
                .map(|item| item.price())
                .unwrap_or_default(),
        };
        requests.push(LineRequest::new(spec.item_id, spec.quantity, rate));
    }

    let request = InvoiceRequest {
        party_id,
        invoice_number,
        date,
        lines: requests,
    };

    let created = db
        .inner()
        .invoice_engine(config.engine_config())
        .create_invoice(&request)
        .await?;

    for warning in &created.warnings {
        warn!(%warning, "Invoice warning");
    }

    Ok(created)
}

pub async fn list_invoices(
    db: &DbState,
    args: &InvoiceListArgs,
) -> Result<Vec<InvoiceSummary>, ApiError> {
    let from = args.from.as_deref().map(|v| parse_date("from", v)).transpose()?;
    let to = args.to.as_deref().map(|v| parse_date("to", v)).transpose()?;

    let mut filter = InvoiceFilter::default().between(from, to);
    if let Some(party) = &args.party {
        filter = filter.party(party);
    }
    if let Some(number) = &args.number {
        filter = filter.number(number);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    }

    Ok(db.inner().invoices().list(&filter).await?)
}

/// Document payload plus the issuing company.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub company_name: String,
    pub document: InvoiceDocument,
    pub tax_total: Money,
    pub total_display: String,
}

pub async fn show_invoice(
    db: &DbState,
    config: &ConfigState,
    invoice_id: &str,
) -> Result<InvoiceView, ApiError> {
    let document = db
        .inner()
        .invoices()
        .document(invoice_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Invoice", invoice_id))?;

    Ok(InvoiceView {
        company_name: config.company_name.clone(),
        tax_total: document.tax_total(),
        total_display: config.format_currency(document.total_amount),
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{item, party, test_support};
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_line_spec() {
        assert_eq!(
            parse_line_spec("abc:3").unwrap(),
            LineSpec {
                item_id: "abc".into(),
                quantity: 3,
                rate: None
            }
        );
        assert_eq!(
            parse_line_spec("abc:2:45.50").unwrap().rate,
            Some(Money::from_cents(4550))
        );
        assert!(parse_line_spec("abc").is_err());
        assert!(parse_line_spec(":3").is_err());
        assert!(parse_line_spec("abc:x").is_err());
        assert!(parse_line_spec("abc:1:2:3").is_err());
    }

    #[test]
    fn test_date_defaults_to_utc_today() {
        let before = Utc::now().date_naive();
        let date = date_or_today("date", None).unwrap();
        let after = Utc::now().date_naive();
        assert!(date == before || date == after);

        assert_eq!(
            date_or_today("date", Some("2025-01-15")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_list_show() {
        let db = test_support::db().await;
        let config = ConfigState::default();
        let acme = party::add_party(&db, "Acme".into(), None).await.unwrap();
        let widget = item::add_item(&db, "Widget".into(), None, "50.00", 10, 18.0)
            .await
            .unwrap();

        let created = create_invoice(
            &db,
            &config,
            acme.id.clone(),
            "INV-1".into(),
            Some("2025-01-15"),
            &[format!("{}:3", widget.id), format!("{}:1:45.00", widget.id)],
        )
        .await
        .unwrap();
        assert_eq!(created.total_amount.cents(), 19500);

        let listed = list_invoices(
            &db,
            &InvoiceListArgs {
                from: Some("2025-01-01".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);

        let view = show_invoice(&db, &config, &created.invoice_id).await.unwrap();
        assert_eq!(view.document.lines.len(), 2);
        assert_eq!(view.total_display, "$195.00");
        // rates include tax: 22.88 + 6.86
        assert_eq!(view.tax_total.cents(), 2974);
        assert_eq!(view.company_name, "BizLedger");
    }

    #[tokio::test]
    async fn test_create_with_unknown_item_is_not_found() {
        let db = test_support::db().await;
        let acme = party::add_party(&db, "Acme".into(), None).await.unwrap();

        let err = create_invoice(
            &db,
            &ConfigState::default(),
            acme.id,
            "INV-1".into(),
            None,
            &["ghost:1".to_string()],
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
