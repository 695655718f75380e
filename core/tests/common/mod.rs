// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use once_cell::sync::Lazy;
use paygate::{ChecksumSigner, GatewayConfig, PaymentRequest};
use sha2::{Digest, Sha256};
use tracing::Level;

pub const MERCHANT_ID: &str = "PGTESTPAYUAT";
pub const SALT_KEY: &str = "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399";
pub const SALT_INDEX: &str = "1";
pub const BASE_URL: &str = "https://api-preprod.phonepe.com/apis/pg-sandbox";

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn gateway_config() -> GatewayConfig {
  GatewayConfig::new(MERCHANT_ID, SALT_KEY, SALT_INDEX, BASE_URL).expect("test config is complete")
}

pub fn signer() -> ChecksumSigner {
  ChecksumSigner::new(SALT_KEY, SALT_INDEX).expect("test salt is complete")
}

/// Independent rendition of the checksum formula for cross-checking.
pub fn reference_checksum(content: &str, path: &str, salt_key: &str, salt_index: &str) -> String {
  let digest = Sha256::digest(format!("{}{}{}", content, path, salt_key).as_bytes());
  let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
  format!("{}###{}", hex, salt_index)
}

pub fn sample_request(merchant_transaction_id: &str) -> PaymentRequest {
  PaymentRequest {
    merchant_transaction_id: merchant_transaction_id.to_string(),
    merchant_user_id: "3f2b8a1e-6c1d-4e0a-9a43-0d6a3b7c9e21".to_string(),
    amount_minor: 10_000,
    redirect_url: "http://localhost:3000/cart?payment=success".to_string(),
    callback_url: format!(
      "http://localhost:8080/api/v1/payments/verify?merchantTransactionId={}",
      merchant_transaction_id
    ),
    mobile_number: "9999999999".to_string(),
  }
}

// --- One-shot HTTP stub standing in for the gateway ---

#[derive(Debug)]
pub struct CapturedRequest {
  pub method: String,
  pub path: String,
  pub headers: Vec<(String, String)>,
  pub body: Vec<u8>,
}

impl CapturedRequest {
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

/// Serves exactly one request with the given status and JSON body, then
/// hands back what it received. Returns the stub's base URL.
pub async fn one_shot_gateway(
  status: u16,
  body: &'static str,
) -> (String, tokio::task::JoinHandle<CapturedRequest>) {
  use tokio::io::{AsyncReadExt, AsyncWriteExt};

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
  let addr = listener.local_addr().expect("stub addr");

  let handle = tokio::spawn(async move {
    let (mut socket, _) = listener.accept().await.expect("accept");
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
      let n = socket.read(&mut chunk).await.expect("read");
      assert!(n > 0, "client closed before sending headers");
      buf.extend_from_slice(&chunk[..n]);
      if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        break pos + 4;
      }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
      .filter_map(|l| l.split_once(':'))
      .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
      .collect();

    let content_length = headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
      .and_then(|(_, v)| v.parse::<usize>().ok())
      .unwrap_or(0);
    while buf.len() < header_end + content_length {
      let n = socket.read(&mut chunk).await.expect("read body");
      if n == 0 {
        break;
      }
      buf.extend_from_slice(&chunk[..n]);
    }
    let body_bytes = buf[header_end..].to_vec();

    let reply = format!(
      "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
      status,
      body.len(),
      body
    );
    socket.write_all(reply.as_bytes()).await.expect("write");
    socket.shutdown().await.ok();

    CapturedRequest {
      method,
      path,
      headers,
      body: body_bytes,
    }
  });

  (format!("http://{}", addr), handle)
}
