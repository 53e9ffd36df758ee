use async_trait::async_trait;

use crate::modules::orders::entities::{delivery_order, order_item};

pub mod telegram;

/// Outbound dispatcher-channel notifications. Delivery is best-effort;
/// implementations log failures instead of surfacing them.
#[async_trait]
pub trait OrderNotifier: Send + Sync {
    async fn order_created(&self, order: &delivery_order::Model, item: &order_item::Model);
}

pub struct NoopNotifier;

#[async_trait]
impl OrderNotifier for NoopNotifier {
    async fn order_created(&self, order: &delivery_order::Model, _item: &order_item::Model) {
        tracing::debug!(
            "No dispatcher channel configured; order {} not relayed",
            order.order_code
        );
    }
}
