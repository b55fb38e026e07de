pub mod account_service;
pub mod chatbot_service;
pub mod insight_service;
pub mod optimizer_service;
pub mod payment;
pub mod trip_planner_service;
