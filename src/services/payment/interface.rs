use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Approved { transaction_id: String },
    Declined { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefundReceipt {
    pub refund_id: String,
    pub message: String,
}

/// Card processor seam. Declines are ordinary outcomes, not errors.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: f64, method: &str) -> ChargeOutcome;
    async fn refund(&self, transaction_id: &str, amount: f64) -> RefundReceipt;
}
