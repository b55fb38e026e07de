use std::sync::Arc;

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::AppConfig;
use db::TripStore;
use services::chatbot_service::TravelChatbot;
use services::payment::{PaymentGateway, SimulatedGateway};
use services::trip_planner_service::{GenAiTripPlanner, ItineraryPlanner};

/// Everything the handlers share, registered once as `web::Data<AppState>`.
pub struct AppState {
    pub store: Arc<dyn TripStore>,
    pub planner: Arc<dyn ItineraryPlanner>,
    pub payments: Arc<dyn PaymentGateway>,
    pub chatbot: TravelChatbot,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn TripStore>) -> Self {
        Self {
            store,
            planner: Arc::new(GenAiTripPlanner::new()),
            payments: Arc::new(SimulatedGateway::new(config.payment_success_rate)),
            chatbot: TravelChatbot::new(config.chat_history_limit),
            config,
        }
    }

    pub fn with_planner(mut self, planner: Arc<dyn ItineraryPlanner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_payments(mut self, payments: Arc<dyn PaymentGateway>) -> Self {
        self.payments = payments;
        self
    }
}
