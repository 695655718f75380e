// core/src/client.rs

use crate::checksum::{status_path, ChecksumSigner, PAY_PATH};
use crate::config::GatewayConfig;
use crate::error::{PaygateError, PaygateResult};
use crate::wire::{PayPayload, PayResponse, PaymentRequest, SealedPayRequest, StatusResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

pub const X_VERIFY: &str = "X-VERIFY";
pub const X_MERCHANT_ID: &str = "X-MERCHANT-ID";

/// The two gateway operations the checkout flow depends on.
///
/// Both return the gateway's decoded answer even when it reports failure
/// (`success: false`); `Err` is reserved for calls that could not be made or
/// whose response could not be read.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn pay(&self, request: &PaymentRequest) -> PaygateResult<PayResponse>;

    async fn status(&self, merchant_transaction_id: &str) -> PaygateResult<StatusResponse>;
}

pub struct PhonePeClient {
    config: GatewayConfig,
    signer: ChecksumSigner,
    http: reqwest::Client,
}

impl PhonePeClient {
    pub fn new(config: GatewayConfig) -> PaygateResult<Self> {
        let signer = ChecksumSigner::from_config(&config)?;
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| PaygateError::Transport {
                endpoint: config.base_url().to_string(),
                source,
            })?;
        info!(
            merchant_id = %config.merchant_id(),
            base_url = %config.base_url(),
            timeout_secs = config.request_timeout().as_secs(),
            "Gateway client ready."
        );
        Ok(Self { config, signer, http })
    }

    pub fn sealed_pay_request(&self, request: &PaymentRequest) -> PaygateResult<SealedPayRequest> {
        let payload = PayPayload::for_pay_page(self.config.merchant_id(), request);
        SealedPayRequest::seal(&payload, &self.signer)
    }
}

#[async_trait]
impl PaymentGateway for PhonePeClient {
    #[instrument(name = "gateway::pay", skip(self, request), fields(merchant_transaction_id = %request.merchant_transaction_id, amount_minor = request.amount_minor))]
    async fn pay(&self, request: &PaymentRequest) -> PaygateResult<PayResponse> {
        let sealed = self.sealed_pay_request(request)?;
        let endpoint = self.config.endpoint(PAY_PATH);
        debug!("Submitting pay request to {}", endpoint);

        let response = self
            .http
            .post(&endpoint)
            .header(X_VERIFY, &sealed.x_verify)
            .json(&sealed.envelope)
            .send()
            .await
            .map_err(|source| PaygateError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let decoded: PayResponse = decode_body(&endpoint, response).await?;
        if !decoded.success {
            warn!(code = ?decoded.code, message = ?decoded.message, "Gateway declined pay request.");
        }
        Ok(decoded)
    }

    #[instrument(name = "gateway::status", skip(self))]
    async fn status(&self, merchant_transaction_id: &str) -> PaygateResult<StatusResponse> {
        let path = status_path(self.config.merchant_id(), merchant_transaction_id);
        let x_verify = self.signer.sign_status_query(self.config.merchant_id(), merchant_transaction_id);
        let endpoint = self.config.endpoint(&path);

        let response = self
            .http
            .get(&endpoint)
            .header(X_VERIFY, x_verify)
            .header(X_MERCHANT_ID, self.config.merchant_id())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| PaygateError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let decoded: StatusResponse = decode_body(&endpoint, response).await?;
        info!(
            success = decoded.success,
            state = ?decoded.state(),
            code = ?decoded.code,
            "Gateway status fetched."
        );
        Ok(decoded)
    }
}

// The gateway answers errors with a JSON body and a 4xx status, so the body is
// decoded whatever the status code says.
async fn decode_body<T: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> PaygateResult<T> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(|source| PaygateError::Transport {
        endpoint: endpoint.to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| PaygateError::UnexpectedResponse {
        endpoint: endpoint.to_string(),
        status,
        source: anyhow::Error::new(e).context(format!("{} byte body did not match the expected schema", bytes.len())),
    })
}
