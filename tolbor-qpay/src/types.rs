//! Gateway types and data structures

use crate::money::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum rows per payment-list page, imposed by the gateway
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Invoice creation request
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest {
    /// Merchant invoice template code; filled from the client when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_code: Option<String>,
    /// Merchant-side invoice number, unique per checkout
    pub sender_invoice_no: String,
    /// Receiver (payer) code on the merchant side
    pub invoice_receiver_code: String,
    /// Human-readable description shown in the payer's app
    pub invoice_description: String,
    /// Amount due
    pub amount: Decimal,
    /// URL the gateway calls back once the payment settles
    pub callback_url: String,
}

impl InvoiceRequest {
    /// Create an invoice request
    pub fn new(
        sender_invoice_no: impl Into<String>,
        receiver_code: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            invoice_code: None,
            sender_invoice_no: sender_invoice_no.into(),
            invoice_receiver_code: receiver_code.into(),
            invoice_description: description.into(),
            amount,
            callback_url: callback_url.into(),
        }
    }

    /// Override the merchant invoice template code
    pub fn invoice_code(mut self, code: impl Into<String>) -> Self {
        self.invoice_code = Some(code.into());
        self
    }
}

/// Created invoice with its payable references
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Gateway-assigned invoice identifier
    pub invoice_id: String,
    /// QR payload for in-app scanning
    #[serde(default)]
    pub qr_text: Option<String>,
    /// Base64 QR image
    #[serde(default)]
    pub qr_image: Option<String>,
    /// Hosted payment short URL
    #[serde(rename = "qPay_shortUrl", default)]
    pub short_url: Option<String>,
    /// Bank app deep links
    #[serde(default)]
    pub urls: Vec<DeepLink>,
}

/// Bank app deep link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepLink {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub link: String,
}

/// Invoice details as reported by the gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    pub invoice_id: String,
    #[serde(default)]
    pub invoice_status: Option<String>,
    #[serde(default)]
    pub sender_invoice_no: Option<String>,
    #[serde(default)]
    pub invoice_description: Option<String>,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub callback_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Gateway reports `NEW` for freshly created payments
    #[serde(alias = "NEW")]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Payment settled successfully
    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }

    /// Terminal states that will not transition further
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Object a payment list or check is scoped to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectType {
    #[default]
    Invoice,
    Qr,
    Item,
}

/// One payment as reported by the gateway, in callbacks and list rows alike.
///
/// `payment_id`, `payment_status` and `object_id` are required; a payload
/// missing any of them does not deserialize. Everything else is payer
/// metadata the gateway may omit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Gateway-assigned payment identifier
    pub payment_id: String,
    #[serde(rename = "payment_status")]
    pub status: PaymentStatus,
    #[serde(rename = "payment_amount", default)]
    pub amount: Decimal,
    #[serde(rename = "payment_currency", default)]
    pub currency: Currency,
    /// Paying wallet, when the gateway reports one
    #[serde(rename = "payment_wallet", default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<String>,
    /// Payer display name
    #[serde(rename = "payment_name", default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(rename = "payment_date", default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub object_type: ObjectType,
    /// Invoice this payment belongs to. Not unique: the gateway may retry
    /// callbacks and deliver several records per invoice.
    #[serde(rename = "object_id")]
    pub invoice_id: String,
}

/// Filter for listing payments against an object
#[derive(Debug, Clone)]
pub struct PaymentListFilter {
    pub object_type: ObjectType,
    pub object_id: String,
    pub page_number: u32,
    pub page_limit: u32,
}

impl PaymentListFilter {
    /// List payments for an invoice, first page, gateway-maximum page size
    pub fn invoice(object_id: impl Into<String>) -> Self {
        Self {
            object_type: ObjectType::Invoice,
            object_id: object_id.into(),
            page_number: 1,
            page_limit: MAX_PAGE_LIMIT,
        }
    }

    /// Select a page
    pub fn page(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    /// Request a page size. Clamped to the gateway ceiling when sent.
    pub fn page_limit(mut self, page_limit: u32) -> Self {
        self.page_limit = page_limit;
        self
    }
}

/// One page of payment records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPage {
    /// Total matching rows on the gateway side
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub rows: Vec<PaymentRecord>,
}

/// Refund confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Refund {
    pub payment_id: String,
    #[serde(rename = "payment_status")]
    pub status: PaymentStatus,
}
