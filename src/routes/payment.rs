use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::db::Sequence;
use crate::error::ApiError;
use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::bookings::{Booking, Payment, PaymentInput, PaymentStatus};
use crate::routes::itinerary::owned_trip;
use crate::services::payment::ChargeOutcome;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub message: String,
    pub status: PaymentStatus,
    pub payment_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RefundResponse {
    pub message: String,
    pub status: PaymentStatus,
    pub refund_id: String,
}

/// Loads a booking whose trip belongs to `user_id`.
async fn owned_booking(
    state: &AppState,
    booking_id: i64,
    user_id: i64,
) -> Result<Booking, ApiError> {
    let booking = state
        .store
        .find_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Booking not found"))?;

    owned_trip(state, booking.trip_id, user_id)
        .await
        .map_err(|_| ApiError::not_found("Booking not found"))?;

    Ok(booking)
}

pub async fn pay(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    input: web::Json<PaymentInput>,
) -> Result<HttpResponse, ApiError> {
    let input = input.into_inner();
    let booking = owned_booking(&state, input.booking_id, user.user_id).await?;

    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(ApiError::bad_request("Amount must be positive"));
    }
    let method = input.method.trim().to_string();
    if method.is_empty() {
        return Err(ApiError::bad_request("Payment method is required"));
    }

    let outcome = state.payments.charge(input.amount, &method).await;

    let (status, transaction_id, error) = match outcome {
        ChargeOutcome::Approved { transaction_id } => {
            (PaymentStatus::Completed, Some(transaction_id), None)
        }
        ChargeOutcome::Declined { error } => (PaymentStatus::Failed, None, Some(error)),
    };

    let payment = Payment {
        id: state.store.next_id(Sequence::Payments).await?,
        booking_id: booking.id,
        amount: input.amount,
        method,
        status,
        transaction_id: transaction_id.clone(),
        refund_id: None,
        timestamp: Utc::now(),
    };
    state.store.insert_payment(&payment).await?;

    if status == PaymentStatus::Completed {
        info!("Payment {} completed for booking {}", payment.id, booking.id);
        Ok(HttpResponse::Ok().json(PaymentReceipt {
            message: "Payment processed successfully".to_string(),
            status,
            payment_id: payment.id,
            transaction_id,
            error: None,
        }))
    } else {
        warn!("Payment {} declined for booking {}", payment.id, booking.id);
        Ok(HttpResponse::PaymentRequired().json(PaymentReceipt {
            message: "Payment processing failed".to_string(),
            status,
            payment_id: payment.id,
            transaction_id: None,
            error,
        }))
    }
}

pub async fn refund(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let payment = state
        .store
        .find_payment(path.into_inner())
        .await?
        .ok_or_else(|| ApiError::not_found("Payment not found"))?;
    owned_booking(&state, payment.booking_id, user.user_id)
        .await
        .map_err(|_| ApiError::not_found("Payment not found"))?;

    let transaction_id = match (payment.status, payment.transaction_id.as_deref()) {
        (PaymentStatus::Completed, Some(transaction_id)) => transaction_id,
        _ => {
            return Err(ApiError::Conflict(format!(
                "Payment is {} and cannot be refunded",
                payment.status.as_str()
            )))
        }
    };

    let receipt = state
        .payments
        .refund(transaction_id, payment.amount)
        .await;
    let refunded = state
        .store
        .update_payment_refund(payment.id, &receipt.refund_id)
        .await?;
    if !refunded {
        return Err(ApiError::Conflict(
            "Payment was already refunded".to_string(),
        ));
    }

    info!("Payment {} refunded as {}", payment.id, receipt.refund_id);
    Ok(HttpResponse::Ok().json(RefundResponse {
        message: receipt.message,
        status: PaymentStatus::Refunded,
        refund_id: receipt.refund_id,
    }))
}
