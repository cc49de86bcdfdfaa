use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;

use wildstays_booking::{CancelOutcome, NewReservation, cancel_reservation, create_reservation};
use wildstays_types::api::{Claims, CreateReservationRequest, MyReservation, PlaceQuery};

use crate::convert;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, blocking};

/// POST /listings/{id}/reservations
pub async fn create(
    State(state): State<AppState>,
    ApiPath(listing_id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<CreateReservationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new = NewReservation {
        listing_id,
        renter_id: claims.sub.to_string(),
        start_date: req.start_date,
        end_date: req.end_date,
    };
    let today = Local::now().date_naive();

    let row = blocking(&state, move |db| Ok(create_reservation(db, &new, today)?)).await?;

    Ok((StatusCode::CREATED, Json(convert::reservation(row))))
}

/// GET /me/reservations
pub async fn my_reservations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let renter = claims.sub.to_string();
    let rows = blocking(&state, move |db| Ok(db.get_reservations_by_renter(&renter)?)).await?;

    let reservations: Vec<MyReservation> = rows
        .into_iter()
        .map(|row| MyReservation {
            reservation: convert::reservation(row.reservation),
            listing_name: row.listing_name,
        })
        .collect();

    Ok(Json(reservations))
}

/// GET /reservations?place=Bergen
pub async fn by_place(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PlaceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = blocking(&state, move |db| Ok(db.get_reservations_by_place(&query.place)?)).await?;
    Ok(Json(rows.into_iter().map(convert::reservation).collect::<Vec<_>>()))
}

/// DELETE /me/reservations/{id}
pub async fn cancel(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let renter = claims.sub.to_string();
    let outcome = blocking(&state, move |db| Ok(cancel_reservation(db, &renter, id)?)).await?;

    match outcome {
        CancelOutcome::Cancelled => Ok(StatusCode::NO_CONTENT),
        CancelOutcome::NotFound => Err(ApiError::NotFound("Reservation")),
        CancelOutcome::NotOwner => Err(ApiError::Forbidden("reservation")),
    }
}
