use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Payment record persisted after a successful gateway confirmation.
/// Field names match the wire/storage format used by the frontend.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "parcelId")]
    pub parcel_id: String,
    pub email: String,
    pub amount: f64,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
    pub paid_at: BsonDateTime,
    pub paid_at_string: String,
}

impl Payment {
    /// Builds a record stamped with the current time in both representations.
    pub fn new(
        parcel_id: String,
        email: String,
        amount: f64,
        payment_method: String,
        transaction_id: String,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: None,
            parcel_id,
            email,
            amount,
            payment_method,
            transaction_id,
            paid_at: BsonDateTime::from_millis(now.timestamp_millis()),
            paid_at_string: now.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stamps_both_time_representations() {
        let payment = Payment::new(
            "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            "sender@example.com".to_string(),
            1200.0,
            "card".to_string(),
            "pi_3OaXYZ_secret".to_string(),
        );

        assert!(payment.id.is_none());
        assert!(!payment.paid_at_string.is_empty());

        // paid_at_string is the RFC 3339 rendering of paid_at
        let parsed = chrono::DateTime::parse_from_rfc3339(&payment.paid_at_string);
        assert!(parsed.is_ok());
        let diff =
            (parsed.unwrap().timestamp_millis() - payment.paid_at.timestamp_millis()).abs();
        assert!(diff < 1000);
    }

    #[test]
    fn test_serializes_with_wire_field_names() {
        let payment = Payment::new(
            "65a1b2c3d4e5f6a7b8c9d0e1".to_string(),
            "sender@example.com".to_string(),
            1200.0,
            "card".to_string(),
            "pi_3OaXYZ".to_string(),
        );

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["parcelId"], "65a1b2c3d4e5f6a7b8c9d0e1");
        assert_eq!(json["paymentMethod"], "card");
        assert_eq!(json["transactionId"], "pi_3OaXYZ");
        assert!(json.get("_id").is_none());
    }
}
