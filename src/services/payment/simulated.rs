use async_trait::async_trait;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::{Mutex, PoisonError};

use super::interface::{ChargeOutcome, PaymentGateway, RefundReceipt};

pub const DECLINE_MESSAGE: &str = "Payment failed - insufficient funds";

/// Stand-in processor that approves a fixed share of charges at random.
pub struct SimulatedGateway {
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(success_rate: f64, seed: u64) -> Self {
        Self {
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn reference(&self, prefix: &str) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        format!("{}_{}", prefix, rng.gen_range(100000..=999999))
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, amount: f64, method: &str) -> ChargeOutcome {
        let approved = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen::<f64>() < self.success_rate
        };

        if approved {
            let transaction_id = self.reference("txn");
            info!("Charged ${:.2} via {} ({})", amount, method, transaction_id);
            ChargeOutcome::Approved { transaction_id }
        } else {
            info!("Declined ${:.2} via {}", amount, method);
            ChargeOutcome::Declined {
                error: DECLINE_MESSAGE.to_string(),
            }
        }
    }

    async fn refund(&self, transaction_id: &str, amount: f64) -> RefundReceipt {
        let refund_id = self.reference("ref");
        info!("Refunded ${:.2} for {} ({})", amount, transaction_id, refund_id);
        RefundReceipt {
            refund_id,
            message: format!("Refund of ${} processed successfully", amount),
        }
    }
}
