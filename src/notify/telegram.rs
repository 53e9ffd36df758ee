use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::OrderNotifier;
use crate::modules::orders::entities::{delivery_order, order_item};

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: String,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            client: Client::new(),
        }
    }
}

fn format_order_message(order: &delivery_order::Model, item: &order_item::Model) -> String {
    format!(
        "New order {}\n{} x{}\nTotal: {}\nAddress: {}\nPhone: {}",
        order.order_code,
        item.product_name,
        item.quantity,
        order.total_amount,
        order.delivery_address,
        order.contact_phone,
    )
}

#[async_trait]
impl OrderNotifier for TelegramNotifier {
    async fn order_created(&self, order: &delivery_order::Model, item: &order_item::Model) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        let result = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": format_order_message(order, item),
            }))
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    status = %response.status(),
                    "Telegram rejected notification for order {}",
                    order.order_code
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(
                    "Telegram notification for order {} failed: {}",
                    order.order_code,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::orders::entities::enums::OrderStatus;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn message_carries_code_product_and_address() {
        let order = delivery_order::Model {
            id: 1,
            order_code: "ORD-20260807142301000".to_owned(),
            user_id: 2,
            courier_id: None,
            status: OrderStatus::Pending,
            total_amount: Decimal::new(25000, 2),
            delivery_address: "10 Main St".to_owned(),
            contact_phone: "+100000000".to_owned(),
            created_at: Utc::now().naive_utc(),
            assigned_at: None,
            delivered_at: None,
            cancelled_at: None,
        };
        let item = order_item::Model {
            id: 1,
            order_id: 1,
            product_id: 5,
            product_name: "Vitamin C 500mg".to_owned(),
            quantity: 2,
            unit_price: Decimal::new(12500, 2),
            total_price: Decimal::new(25000, 2),
        };

        let message = format_order_message(&order, &item);
        assert!(message.contains("ORD-20260807142301000"));
        assert!(message.contains("Vitamin C 500mg x2"));
        assert!(message.contains("Total: 250.00"));
        assert!(message.contains("10 Main St"));
    }
}
