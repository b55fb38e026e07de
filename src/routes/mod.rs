use actix_cors::Cors;
use actix_web::web;

use crate::error::ApiError;
use crate::middleware::auth::AuthMiddleware;
use crate::AppState;

pub mod account;
pub mod booking;
pub mod hackathon;
pub mod health;
pub mod itinerary;
pub mod payment;

/// Malformed bodies and queries answer with the same `{"detail"}` shape as
/// handler errors.
fn reject<E: std::fmt::Display>(err: E) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

/// Browser access for the configured frontend origin.
pub fn cors_policy(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Registers every route. Protected routes sit behind `AuthMiddleware`.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let secret = state.config.jwt_secret.clone();

        cfg.app_data(state)
            .app_data(web::JsonConfig::default().error_handler(|err, _| reject(err)))
            .app_data(web::FormConfig::default().error_handler(|err, _| reject(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| reject(err)))
            .app_data(web::PathConfig::default().error_handler(|err, _| reject(err)))
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(account::register))
                    .route("/login", web::post().to(account::login))
                    .service(
                        web::resource("/me")
                            .wrap(AuthMiddleware::new(&secret))
                            .route(web::get().to(account::me)),
                    ),
            )
            .service(
                web::scope("/hackathon/ai")
                    .route("/chat", web::post().to(hackathon::chat))
                    .route("/chat/history", web::get().to(hackathon::chat_history))
                    .route(
                        "/optimize-realtime",
                        web::post().to(hackathon::optimize_realtime),
                    )
                    .route("/insights/{trip_id}", web::get().to(hackathon::insights))
                    .route(
                        "/market-intelligence",
                        web::get().to(hackathon::market_intelligence),
                    )
                    .route(
                        "/generate-alternatives",
                        web::post().to(hackathon::generate_alternatives),
                    )
                    .route(
                        "/sustainability-report/{trip_id}",
                        web::get().to(hackathon::sustainability_report),
                    ),
            )
            // Protected routes, each under its own prefix so unknown paths
            // still fall through to 404.
            .service(
                web::scope("/itinerary")
                    .wrap(AuthMiddleware::new(&secret))
                    .route("/generate", web::post().to(itinerary::generate))
                    .route("/update/{trip_id}", web::put().to(itinerary::update)),
            )
            .service(
                web::scope("/trips")
                    .wrap(AuthMiddleware::new(&secret))
                    .route("", web::get().to(itinerary::list_trips))
                    .route(
                        "/{trip_id}/itinerary",
                        web::get().to(itinerary::trip_itinerary),
                    ),
            )
            .service(
                web::resource("/book")
                    .wrap(AuthMiddleware::new(&secret))
                    .route(web::post().to(booking::book)),
            )
            .service(
                web::scope("/payment")
                    .wrap(AuthMiddleware::new(&secret))
                    .route("", web::post().to(payment::pay))
                    .route("/{payment_id}/refund", web::post().to(payment::refund)),
            );
    }
}
