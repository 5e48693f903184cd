//! Paid services, client inquiries and orders.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::user::User;

/// How a service is priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    #[default]
    Fixed,
    Hourly,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    pub price_type: PriceType,
    #[serde(default)]
    pub price_from: Option<u64>,
    #[serde(default)]
    pub price_to: Option<u64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default)]
    pub estimated_days: Option<u32>,
    pub sort_order: i32,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceCreate {
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub price_type: PriceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_to: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Progress of a client inquiry through the sales pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Contacted,
    Quoted,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: i64,
    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub service: Option<Service>,
    pub project_type: String,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    pub description: String,
    pub status: InquiryStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InquiryCreate {
    pub client_name: String,
    pub client_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InquiryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InquiryStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Working,
    Reviewing,
    Completed,
    Cancelled,
}

/// A confirmed piece of work. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub client_id: i64,
    #[serde(default)]
    pub client: Option<User>,
    pub service_id: i64,
    #[serde(default)]
    pub service: Option<Service>,
    pub status: OrderStatus,
    pub total_amount: u64,
    #[serde(default)]
    pub deposit: u64,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderCreate {
    pub service_id: i64,
    pub total_amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<u64>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_deserializes_with_nested_service() {
        let order: Order = serde_json::from_value(json!({
            "id": 9,
            "order_no": "ORD-20240501-0009",
            "client_id": 3,
            "service_id": 2,
            "service": {
                "id": 2, "name": "Web app", "slug": "web-app", "description": "Full stack",
                "price_type": "hourly", "sort_order": 0, "active": true,
                "created_at": "2024-04-01T00:00:00"
            },
            "status": "working",
            "total_amount": 5000,
            "deposit": 1000,
            "description": "Build a dashboard",
            "start_date": null,
            "created_at": "2024-05-01T10:00:00",
            "updated_at": "2024-05-02T10:00:00"
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Working);
        assert_eq!(order.service.unwrap().price_type, PriceType::Hourly);
        assert!(order.start_date.is_none());
    }

    #[test]
    fn test_inquiry_update_serializes_lowercase_status() {
        let update = InquiryUpdate {
            status: Some(InquiryStatus::Quoted),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "quoted"})
        );
    }
}
