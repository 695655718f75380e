// storefront/src/services/verifier.rs

use paygate::transaction_id;
use paygate::{CallbackEnvelope, ChecksumSigner, PaymentGateway, StatusResponse};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::models::{OrderStatus, StatusUpdate};
use crate::store::{OrderStore, UpdateOutcome};

/// A server-to-server callback body together with its `X-VERIFY` header.
#[derive(Debug, Clone)]
pub struct SignedCallback {
  pub envelope: CallbackEnvelope,
  pub x_verify: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
  /// Status derived from the gateway, or `None` when verification was abandoned.
  pub status: Option<OrderStatus>,
  pub redirect_url: String,
}

/// Gateway state to order status. Only a successful query reporting
/// COMPLETED completes an order; an unsuccessful query fails it; anything
/// else stays PENDING for a later callback or manual reconciliation.
pub fn map_gateway_status(response: &StatusResponse) -> OrderStatus {
  if !response.success {
    OrderStatus::Failed
  } else if response.is_completed() {
    OrderStatus::Completed
  } else {
    OrderStatus::Pending
  }
}

/// What the audit made of a server-to-server callback body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallbackAudit {
  Verified,
  BadSignature,
  Undecodable,
  OtherTransaction,
}

pub struct PaymentVerifier {
  gateway: Arc<dyn PaymentGateway>,
  store: Arc<dyn OrderStore>,
  config: Arc<AppConfig>,
  signer: ChecksumSigner,
}

impl PaymentVerifier {
  pub fn new(gateway: Arc<dyn PaymentGateway>, store: Arc<dyn OrderStore>, config: Arc<AppConfig>) -> Result<Self> {
    let signer = ChecksumSigner::from_config(&config.gateway)?;
    Ok(Self {
      gateway,
      store,
      config,
      signer,
    })
  }

  /// Handles a gateway callback. Never fails: every problem ends in the
  /// failure redirect, and store errors are logged without changing the
  /// redirect the gateway's answer calls for.
  #[instrument(name = "service::verify_payment", skip(self, callback))]
  pub async fn verify_callback(
    &self,
    merchant_transaction_id: Option<&str>,
    callback: Option<SignedCallback>,
  ) -> VerificationOutcome {
    let merchant_transaction_id = match merchant_transaction_id.map(str::trim) {
      Some(id) if transaction_id::is_valid(id) => id,
      Some(id) => {
        warn!("Rejecting callback with malformed merchant transaction id ({} chars).", id.len());
        return self.failed();
      }
      None => {
        warn!("Callback arrived without a merchant transaction id.");
        return self.failed();
      }
    };

    if let Some(callback) = callback {
      let audit = self.audit_callback(merchant_transaction_id, &callback);
      debug!(?audit, "Callback body audited; querying gateway status.");
    }

    let update = match self.query_status(merchant_transaction_id).await {
      Ok(update) => update,
      Err(e) => {
        error!(error = %e, "Status query failed; order left as is.");
        return self.failed();
      }
    };
    let status = update.status;

    match self.store.apply_status(merchant_transaction_id, update).await {
      Ok(UpdateOutcome::Applied(order)) => {
        info!(order_id = %order.id, status = status.as_str(), "Order status reconciled.");
      }
      Ok(UpdateOutcome::AlreadyFinal(order)) => {
        info!(
          order_id = %order.id,
          stored = order.status.as_str(),
          reported = status.as_str(),
          "Order already final; repeated callback ignored."
        );
      }
      Ok(UpdateOutcome::NotFound) => {
        warn!("No order matches this merchant transaction id.");
      }
      Err(e) => {
        error!(error = %e, "Error updating order; continuing with redirect.");
      }
    }

    VerificationOutcome {
      status: Some(status),
      redirect_url: match status {
        OrderStatus::Completed => self.config.success_redirect(merchant_transaction_id),
        OrderStatus::Pending | OrderStatus::Failed => self.config.failure_redirect(),
      },
    }
  }

  /// Manual reconciliation: re-queries the gateway and applies the result,
  /// surfacing store failures to the caller.
  #[instrument(name = "service::reconcile_payment", skip(self))]
  pub async fn reconcile(&self, merchant_transaction_id: &str) -> Result<UpdateOutcome> {
    let update = self.query_status(merchant_transaction_id).await?;
    Ok(self.store.apply_status(merchant_transaction_id, update).await?)
  }

  async fn query_status(&self, merchant_transaction_id: &str) -> Result<StatusUpdate> {
    let response = self.gateway.status(merchant_transaction_id).await.map_err(AppError::from)?;
    Ok(StatusUpdate {
      status: map_gateway_status(&response),
      phonepe_transaction_id: response.transaction_id().map(str::to_string),
    })
  }

  // The status query decides the outcome; the callback's own signature and
  // contents are only checked for the log.
  fn audit_callback(&self, merchant_transaction_id: &str, callback: &SignedCallback) -> CallbackAudit {
    if !self.signer.verify(&callback.envelope.response, "", &callback.x_verify) {
      warn!("Callback X-VERIFY does not match its body.");
      return CallbackAudit::BadSignature;
    }
    match callback.envelope.decode() {
      Ok(reported) => {
        let reported_id = reported.data.as_ref().and_then(|d| d.merchant_transaction_id.as_deref());
        if reported_id.is_some_and(|id| id != merchant_transaction_id) {
          warn!(reported_id = ?reported_id, "Signed callback names a different transaction.");
          CallbackAudit::OtherTransaction
        } else {
          info!(state = ?reported.state(), "Signed callback received.");
          CallbackAudit::Verified
        }
      }
      Err(e) => {
        warn!(error = %e, "Signed callback body could not be decoded.");
        CallbackAudit::Undecodable
      }
    }
  }

  fn failed(&self) -> VerificationOutcome {
    VerificationOutcome {
      status: None,
      redirect_url: self.config.failure_redirect(),
    }
  }
}
