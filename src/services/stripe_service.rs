// ==================== PAYMENT GATEWAY ====================
// Creates card-payable payment intents. Capture happens client-side with
// the returned client secret; this service never touches card data.

use serde::Deserialize;
use std::env;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// Requests a card payment intent for an amount in minor currency units.
/// Amount bounds are the gateway's problem, not ours.
pub async fn create_payment_intent(amount_in_cents: i64) -> Result<PaymentIntent, String> {
    let secret_key = env::var("STRIPE_SECRET_KEY")
        .map_err(|_| "STRIPE_SECRET_KEY not found in environment".to_string())?;

    log::info!("💳 Creating payment intent for {} cents", amount_in_cents);

    let params = [
        ("amount", amount_in_cents.to_string()),
        ("currency", "usd".to_string()),
        ("payment_method_types[]", "card".to_string()),
    ];

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/payment_intents", STRIPE_API_BASE))
        .basic_auth(&secret_key, None::<&str>)
        .form(&params)
        .timeout(std::time::Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| format!("Failed to reach payment gateway: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Payment gateway error {}: {}", status, body));
    }

    let intent: PaymentIntent = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse gateway response: {}", e))?;

    log::info!("✅ Payment intent created: {}", intent.id);

    Ok(intent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_gateway_intent_response() {
        let body = serde_json::json!({
            "id": "pi_3OaXYZabc",
            "object": "payment_intent",
            "amount": 500,
            "currency": "usd",
            "status": "requires_payment_method",
            "client_secret": "pi_3OaXYZabc_secret_K9y"
        });

        let intent: PaymentIntent = serde_json::from_value(body).unwrap();
        assert_eq!(intent.id, "pi_3OaXYZabc");
        assert_eq!(intent.amount, 500);
        assert!(!intent.client_secret.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires a live STRIPE_SECRET_KEY
    async fn test_create_payment_intent_live() {
        dotenv::dotenv().ok();

        let intent = create_payment_intent(500).await.unwrap();
        assert!(!intent.client_secret.is_empty());
        assert_eq!(intent.amount, 500);
    }
}
