// storefront/src/test_support.rs

//! Fixtures shared by the unit tests: a scripted gateway and sample data.

use async_trait::async_trait;
use parking_lot::Mutex;
use paygate::wire::{InstrumentResponse, PayResponseData, RedirectInfo, StatusData};
use paygate::{GatewayConfig, PayResponse, PaygateError, PaygateResult, PaymentGateway, PaymentRequest, StatusResponse};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::config::{AppConfig, OrderStoreBackend};
use crate::models::{NewOrder, OrderItem};
use crate::services::CheckoutRequest;

pub const MERCHANT_ID: &str = "MERCHANTUAT";
pub const SALT_KEY: &str = "test-salt-key";
pub const SALT_INDEX: &str = "1";

pub fn test_config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 8080,
    app_base_url: "http://shop.test".to_string(),
    public_api_url: "http://api.shop.test".to_string(),
    order_store: OrderStoreBackend::Memory,
    database_url: None,
    run_migrations: false,
    gateway: GatewayConfig::new(MERCHANT_ID, SALT_KEY, SALT_INDEX, "https://gw.test").expect("complete config"),
    auth_user_header: "X-User-ID".to_string(),
  }
}

pub fn items() -> Vec<OrderItem> {
  vec![
    OrderItem {
      id: "1".to_string(),
      name: "Espresso Cup".to_string(),
      price: dec!(25.00),
      quantity: 2,
    },
    OrderItem {
      id: "sku-7".to_string(),
      name: "Grinder".to_string(),
      price: dec!(50.00),
      quantity: 1,
    },
  ]
}

pub fn checkout_request(amount: Decimal) -> CheckoutRequest {
  CheckoutRequest {
    amount,
    customer_name: "Asha Rao".to_string(),
    customer_email: "asha@example.com".to_string(),
    customer_phone: "9999999999".to_string(),
    items: items(),
  }
}

pub fn new_order(merchant_transaction_id: &str) -> NewOrder {
  new_order_for(merchant_transaction_id, Uuid::new_v4())
}

pub fn new_order_for(merchant_transaction_id: &str, user_id: Uuid) -> NewOrder {
  NewOrder {
    user_id,
    merchant_transaction_id: merchant_transaction_id.to_string(),
    amount: dec!(100.00),
    items: items(),
    customer_name: "Asha Rao".to_string(),
    customer_email: "asha@example.com".to_string(),
    customer_phone: "9999999999".to_string(),
    payment_url: format!("https://pay.test/page/{}", merchant_transaction_id),
  }
}

pub fn status_reply(success: bool, state: Option<&str>, transaction_id: Option<&str>) -> StatusResponse {
  StatusResponse {
    success,
    code: None,
    message: None,
    data: Some(StatusData {
      merchant_id: Some(MERCHANT_ID.to_string()),
      merchant_transaction_id: None,
      transaction_id: transaction_id.map(str::to_string),
      amount: Some(10_000),
      state: state.map(str::to_string),
      response_code: None,
    }),
  }
}

fn outage() -> PaygateError {
  PaygateError::UnexpectedResponse {
    endpoint: "https://gw.test".to_string(),
    status: 503,
    source: anyhow::anyhow!("scripted outage"),
  }
}

/// In-process [`PaymentGateway`] with scripted replies that records every call.
///
/// A `None` reply simulates an unreachable gateway. Without a scripted pay
/// reply the gateway accepts and issues `https://pay.test/page/<txn>`.
pub struct ScriptedGateway {
  pay_reply: Mutex<Option<Option<PayResponse>>>,
  status_reply: Mutex<Option<StatusResponse>>,
  pay_calls: Mutex<Vec<PaymentRequest>>,
  status_calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
  pub fn new() -> Self {
    Self {
      pay_reply: Mutex::new(None),
      status_reply: Mutex::new(Some(status_reply(true, Some("COMPLETED"), Some("PPT1")))),
      pay_calls: Mutex::new(Vec::new()),
      status_calls: Mutex::new(Vec::new()),
    }
  }

  pub fn set_pay_reply(&self, reply: Option<PayResponse>) {
    *self.pay_reply.lock() = Some(reply);
  }

  pub fn set_status_reply(&self, reply: Option<StatusResponse>) {
    *self.status_reply.lock() = reply;
  }

  pub fn pay_calls(&self) -> Vec<PaymentRequest> {
    self.pay_calls.lock().clone()
  }

  pub fn status_calls(&self) -> Vec<String> {
    self.status_calls.lock().clone()
  }
}

fn accepted(merchant_transaction_id: &str) -> PayResponse {
  PayResponse {
    success: true,
    code: Some("PAYMENT_INITIATED".to_string()),
    message: Some("Payment initiated".to_string()),
    data: Some(PayResponseData {
      merchant_id: Some(MERCHANT_ID.to_string()),
      merchant_transaction_id: Some(merchant_transaction_id.to_string()),
      instrument_response: Some(InstrumentResponse {
        kind: Some("PAY_PAGE".to_string()),
        redirect_info: Some(RedirectInfo {
          url: format!("https://pay.test/page/{}", merchant_transaction_id),
          method: Some("GET".to_string()),
        }),
      }),
    }),
  }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
  async fn pay(&self, request: &PaymentRequest) -> PaygateResult<PayResponse> {
    self.pay_calls.lock().push(request.clone());
    match self.pay_reply.lock().clone() {
      None => Ok(accepted(&request.merchant_transaction_id)),
      Some(Some(reply)) => Ok(reply),
      Some(None) => Err(outage()),
    }
  }

  async fn status(&self, merchant_transaction_id: &str) -> PaygateResult<StatusResponse> {
    self.status_calls.lock().push(merchant_transaction_id.to_string());
    self.status_reply.lock().clone().ok_or_else(outage)
  }
}
