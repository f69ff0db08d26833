//! Basic tokenization example demonstrating the full checkout flow.
//!
//! This example walks a card payment from a server-delivered product
//! definition through masking and validation to an encrypted payload.
//!
//! # Running this example
//!
//! ```bash
//! cargo run --example basic_tokenization
//! ```

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::str_to_string,
    clippy::uninlined_format_args,
    reason = "examples are allowed to use println and simple formatting"
)]

use chrono::Datelike;
use checkout_vault::{
    DeviceInformation, EncryptionKey, Encryptor, PaymentProduct, PaymentRequest, SessionDetails,
    StaticDeviceInformationSource, StaticKeySource,
};

/// A demo RSA public key in the base64 DER form the client API serves.
///
/// In production the key arrives from `GET /crypto/publickey` together with
/// its key id; never bake a production key into a binary.
const DEMO_PUBLIC_KEY: &str = concat!(
    "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAu1SU1LfVLPHCozMxH2Mo",
    "4lgOEePzNm0tRgeLezV6ffAt0gunVTLw7onLRnrq0/IzW7yWR7QkrmBL7jTKEn5u",
    "+qKhbwKfBstIs+bMY2Zkp18gnTxKLxoS2tFczGkPLPgizskuemMghRniWaoLcyeh",
    "kd3qqGElvW/VDL5AaWTg0nLVkjRo9z+40RQzuVaE8AkAFmxZzow3x+VJYKdjykkJ",
    "0iT9wCS0DRTXu269V264Vf/3jvredZiKRkgwlL9xNAwxXFg0x/XFw005UWVRIkdg",
    "cKWTjpBP2dPwVZ4WWC+9aGVd+Gyn1o0CLelf4rEjGoXbAAEgAqeGUxrcIlbjXfbc",
    "mwIDAQAB",
);

/// A card product definition as the client API would return it.
const CARD_PRODUCT_JSON: &str = r#"{
    "id": 1,
    "fields": [
        {
            "id": "cardNumber",
            "displayHints": {"mask": "{{9999}} {{9999}} {{9999}} {{9999}}"},
            "dataRestrictions": {
                "isRequired": true,
                "validators": {
                    "luhn": {},
                    "length": {"minLength": 12, "maxLength": 19}
                }
            }
        },
        {
            "id": "expiryDate",
            "displayHints": {"mask": "{{99}}/{{99}}"},
            "dataRestrictions": {
                "isRequired": true,
                "validators": {"expirationDate": {}}
            }
        },
        {
            "id": "cvv",
            "displayHints": {"mask": "{{999}}"},
            "dataRestrictions": {
                "isRequired": true,
                "validators": {"regularExpression": {"regularExpression": "[0-9]{3,4}"}}
            }
        }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Checkout Vault: Basic Tokenization Example\n");

    // Step 1: Parse the product definition the client API returned
    println!("1. Loading payment product definition...");
    let product: PaymentProduct = serde_json::from_str(CARD_PRODUCT_JSON)?;
    let mut request = PaymentRequest::for_product(product)?;
    println!("   ✓ Registered fields: {}", request.field_ids().collect::<Vec<_>>().join(", "));

    // Step 2: Take customer input, masked for display as typed
    println!("\n2. Collecting customer input...");
    let expiry = {
        let today = chrono::Local::now().date_naive();
        format!("{:02}/{:02}", today.month(), (today.year() + 2) % 100)
    };
    request.set_value("cardNumber", request.apply_mask("cardNumber", "4111111111111112")?)?;
    request.set_value("expiryDate", expiry)?;
    request.set_value("cvv", "123")?;
    println!("   Display value: {}", request.masked_value("cardNumber")?);

    // Step 3: Validate; a typo in the card number shows up here
    println!("\n3. Validating (card number has a deliberate typo)...");
    for failure in request.validate().failures() {
        println!("   ✗ {}: {}", failure.field_id, failure.error_message_id);
    }

    println!("\n4. Correcting the card number and revalidating...");
    request.set_value("cardNumber", request.apply_mask("cardNumber", "4111111111111111")?)?;
    assert!(request.validate().is_valid());
    println!("   ✓ Request is valid");

    // Step 5: Seal the unmasked values under the backend's public key
    println!("\n5. Encrypting payment request...");
    let session = SessionDetails::new("b4e4350f5c474fa18d551cbcbdd96c63", "cust-8841");
    let encryptor = Encryptor::for_session(
        &session,
        StaticKeySource::new(EncryptionKey::new("demo-key-1", DEMO_PUBLIC_KEY)),
        StaticDeviceInformationSource::new(DeviceInformation::new("en-GB", 60)),
    )?;

    match encryptor.encrypt(&request).await {
        Ok(sealed) => {
            println!("   ✓ Encrypted payload ({} bytes):", sealed.len());
            println!("   {}…", &sealed[..sealed.len().min(64)]);
            println!("\n   Hand this blob to the merchant backend as the encrypted");
            println!("   customer input; only the payment platform can open it.");
        }
        Err(e) => {
            eprintln!("   ✗ Encryption failed: {}", e);
        }
    }

    println!("\n✓ Example complete");
    Ok(())
}
