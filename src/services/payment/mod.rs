pub mod interface;
pub mod simulated;

pub use interface::{ChargeOutcome, PaymentGateway, RefundReceipt};
pub use simulated::SimulatedGateway;
