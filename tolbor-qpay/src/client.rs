//! QPay gateway client

use crate::{
    error::{QPayError, QPayResult},
    types::*,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use url::Url;

/// Gateway client configuration
#[derive(Debug, Clone)]
pub struct QPayConfig {
    /// Gateway base URL, e.g. `https://merchant.qpay.mn/v2`
    pub base_url: String,
    /// Merchant username for the token endpoint
    pub username: String,
    /// Merchant password for the token endpoint
    pub password: SecretString,
    /// Default invoice template code for created invoices
    pub invoice_code: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl QPayConfig {
    /// Create a configuration with default timeouts
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        invoice_code: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: SecretString::new(password.into().into()),
            invoice_code: invoice_code.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// QPay gateway client with an in-process token cache.
///
/// Every outbound call carries the explicit timeouts from [`QPayConfig`];
/// no call blocks past them.
pub struct QPayClient {
    base_url: Url,
    username: String,
    password: SecretString,
    invoice_code: String,
    client: Client,
    access_token: RwLock<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: chrono::DateTime<Utc>,
}

impl QPayClient {
    /// Create a new gateway client
    pub fn new(config: QPayConfig) -> QPayResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| QPayError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            username: config.username,
            password: config.password,
            invoice_code: config.invoice_code,
            client,
            access_token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Get or refresh the bearer token.
    ///
    /// Returns the cached token while it has more than a minute of life
    /// left; otherwise re-exchanges credentials and caches the result.
    pub async fn access_token(&self) -> QPayResult<String> {
        {
            let token = self.access_token.read().await;
            if let Some(ref t) = *token {
                if t.expires_at > Utc::now() {
                    return Ok(t.token.clone());
                }
            }
        }

        let credentials = STANDARD.encode(format!(
            "{}:{}",
            self.username,
            self.password.expose_secret()
        ));

        let response = self
            .client
            .post(self.endpoint("/auth/token"))
            .header("Authorization", format!("Basic {credentials}"))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(QPayError::Authentication(format!(
                "token endpoint rejected credentials (status {status})"
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        let new_token = CachedToken {
            token: token_response.access_token.clone(),
            // 60s margin so a token never expires mid-request
            expires_at: Utc::now()
                + chrono::Duration::seconds(token_response.expires_in as i64 - 60),
        };

        let mut token = self.access_token.write().await;
        *token = Some(new_token);

        Ok(token_response.access_token)
    }

    /// Build an authenticated request
    async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> QPayResult<reqwest::RequestBuilder> {
        let token = self.access_token().await?;
        Ok(self
            .client
            .request(method, self.endpoint(path))
            .bearer_auth(token))
    }

    async fn gateway_error(response: reqwest::Response) -> QPayError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        QPayError::Gateway { status, body }
    }

    /// Create an invoice.
    ///
    /// The client's default invoice template code is applied when the
    /// request does not carry its own.
    pub async fn create_invoice(&self, mut request: InvoiceRequest) -> QPayResult<Invoice> {
        if request.invoice_code.is_none() {
            request.invoice_code = Some(self.invoice_code.clone());
        }

        let response = self
            .request(reqwest::Method::POST, "/invoice")
            .await?
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch invoice details
    pub async fn get_invoice(&self, invoice_id: &str) -> QPayResult<InvoiceDetail> {
        let response = self
            .request(reqwest::Method::GET, &format!("/invoice/{invoice_id}"))
            .await?
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QPayError::NotFound(format!("invoice {invoice_id}")));
        }
        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Void an invoice that will not be paid
    pub async fn cancel_invoice(&self, invoice_id: &str) -> QPayResult<()> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/invoice/{invoice_id}"))
            .await?
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QPayError::NotFound(format!("invoice {invoice_id}")));
        }
        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(())
    }

    /// List payments for an object, one page at a time.
    ///
    /// The requested page size is clamped to [`MAX_PAGE_LIMIT`] before the
    /// request goes out; the gateway rejects anything larger.
    pub async fn payment_list(&self, filter: PaymentListFilter) -> QPayResult<PaymentPage> {
        let body = PaymentQuery::from_filter(&filter);

        let response = self
            .request(reqwest::Method::POST, "/payment/list")
            .await?
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Gateway-side payment check for one invoice.
    ///
    /// Manual and ops flows only. The polling path reads local state and
    /// never calls this.
    pub async fn check_payment(&self, invoice_id: &str) -> QPayResult<PaymentPage> {
        let body = PaymentQuery::from_filter(&PaymentListFilter::invoice(invoice_id));

        let response = self
            .request(reqwest::Method::POST, "/payment/check")
            .await?
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Request a refund.
    ///
    /// A payment the gateway will not refund (already refunded, disputed)
    /// surfaces as [`QPayError::Gateway`] with the gateway's body.
    pub async fn refund_payment(
        &self,
        payment_id: &str,
        callback_url: &str,
        note: Option<&str>,
    ) -> QPayResult<Refund> {
        let body = RefundBody {
            callback_url,
            note,
        };

        let response = self
            .request(
                reqwest::Method::DELETE,
                &format!("/payment/refund/{payment_id}"),
            )
            .await?
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QPayError::NotFound(format!("payment {payment_id}")));
        }
        if !response.status().is_success() {
            return Err(Self::gateway_error(response).await);
        }

        Ok(response.json().await?)
    }
}

// Gateway wire types

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Serialize)]
struct PaymentQuery {
    object_type: ObjectType,
    object_id: String,
    offset: PageOffset,
}

#[derive(Debug, Serialize)]
struct PageOffset {
    page_number: u32,
    page_limit: u32,
}

impl PaymentQuery {
    fn from_filter(filter: &PaymentListFilter) -> Self {
        Self {
            object_type: filter.object_type,
            object_id: filter.object_id.clone(),
            offset: PageOffset {
                page_number: filter.page_number.max(1),
                page_limit: filter.page_limit.min(MAX_PAGE_LIMIT),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RefundBody<'a> {
    callback_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a str>,
}
