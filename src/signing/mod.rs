//! EVM signing for `exact` x402 payments.

pub mod account;
pub mod eip712;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::RngCore;
use thiserror::Error;

use crate::domain::network::chain_id;
use crate::domain::payment::{Authorization, ExactEvmPayload, PaymentPayload, X402_VERSION};
use crate::domain::{PaymentError, PaymentRequirements, SettleResponse};

pub use account::EvmAccount;
use account::{parse_address, to_checksum};
use eip712::{signing_hash, Eip712Domain, TransferAuthorization};

/// Seconds of clock skew tolerated on the facilitator side.
const VALID_AFTER_SKEW_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    #[error("unsupported network: {0}")]
    UnsupportedNetwork(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("signing failed: {0}")]
    Signature(String),
    #[error(transparent)]
    Requirements(#[from] PaymentError),
}

pub fn random_nonce() -> [u8; 32] {
    let mut nonce = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut nonce);
    nonce
}

/// Sign an EIP-3009 authorization paying `requirement` in full.
pub fn sign_exact_payment(
    account: &EvmAccount,
    requirement: &PaymentRequirements,
    now_unix: i64,
    nonce: [u8; 32],
) -> Result<PaymentPayload, SigningError> {
    let chain = chain_id(&requirement.network)
        .ok_or_else(|| SigningError::UnsupportedNetwork(requirement.network.clone()))?;
    let (name, version) = requirement.token_domain()?;
    let value = requirement
        .max_amount()
        .ok_or_else(|| SigningError::InvalidAmount(requirement.max_amount_required.clone()))?;
    let now = u64::try_from(now_unix).unwrap_or(0);
    let valid_after = now.saturating_sub(VALID_AFTER_SKEW_SECS);
    let valid_before = now.saturating_add(requirement.max_timeout_seconds);

    let auth = TransferAuthorization {
        from: account.address(),
        to: parse_address(&requirement.pay_to)?,
        value,
        valid_after,
        valid_before,
        nonce,
    };
    let domain = Eip712Domain {
        name,
        version,
        chain_id: chain,
        verifying_contract: parse_address(&requirement.asset)?,
    };
    let signature = account.sign_hash(&signing_hash(&domain, &auth))?;

    Ok(PaymentPayload {
        x402_version: X402_VERSION,
        scheme: requirement.scheme.clone(),
        network: requirement.network.clone(),
        payload: ExactEvmPayload {
            signature: format!("0x{}", hex::encode(signature)),
            authorization: Authorization {
                from: account.checksum_address(),
                to: to_checksum(&auth.to),
                value: value.to_string(),
                valid_after: valid_after.to_string(),
                valid_before: valid_before.to_string(),
                nonce: format!("0x{}", hex::encode(nonce)),
            },
        },
    })
}

/// Value of the `X-PAYMENT` request header.
pub fn encode_payment_header(payload: &PaymentPayload) -> Result<String, SigningError> {
    let json = serde_json::to_vec(payload).map_err(|e| SigningError::Signature(e.to_string()))?;
    Ok(BASE64.encode(json))
}

/// Parse the `X-PAYMENT-RESPONSE` response header.
pub fn decode_payment_response(header: &str) -> Result<SettleResponse, PaymentError> {
    let bytes = BASE64
        .decode(header.trim())
        .map_err(|e| PaymentError::Malformed(format!("payment response is not base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| PaymentError::Malformed(format!("payment response is not JSON: {e}")))
}
