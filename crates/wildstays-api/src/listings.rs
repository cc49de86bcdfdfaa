use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{info, warn};

use wildstays_booking::{ListingFilter, check_date_order, filter_listings, validate_listing};
use wildstays_db::Database;
use wildstays_db::models::{ListingDraft, ListingRow};
use wildstays_types::api::{
    Claims, CreatedResponse, ListingDetailsResponse, ListingQuery, ListingRequest,
};

use crate::convert;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, blocking};

/// GET /listings: browse with optional filters, ordered by id.
pub async fn browse(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        if !check_date_order(start, end) {
            return Err(ApiError::Validation(
                "End date must be after the start date.".into(),
            ));
        }
    }

    let filter = ListingFilter {
        place: query.place.filter(|p| !p.trim().is_empty()),
        min_guests: query.guests,
        min_bathrooms: query.bathrooms,
        min_bedrooms: query.bedrooms,
        min_price: query.min_price,
        max_price: query.max_price,
        start_date: query.start_date,
        end_date: query.end_date,
    };

    let (rows, images) = blocking(&state, move |db| {
        let rows = filter_listings(db, &filter)?;
        let ids: Vec<i64> = rows.iter().map(|l| l.id).collect();
        let images = db.get_images_for_listings(&ids)?;
        Ok((rows, images))
    })
    .await?;

    Ok(Json(convert::listings_with_images(rows, images)))
}

/// GET /listings/{id}: listing with its images and reservations.
pub async fn details(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let (row, images, reservations) = blocking(&state, move |db| {
        let row = db.get_listing(id)?.ok_or(ApiError::NotFound("Listing"))?;
        let images = db.get_images_for_listing(id)?;
        let reservations = db.get_reservations_for_listing(id)?;
        Ok((row, images, reservations))
    })
    .await?;

    Ok(Json(ListingDetailsResponse {
        listing: convert::listing(row, images),
        reservations: reservations.into_iter().map(convert::reservation).collect(),
    }))
}

/// GET /me/listings: listings owned by the caller.
pub async fn my_listings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let owner = claims.sub.to_string();
    let (rows, images) = blocking(&state, move |db| {
        let rows = db.get_listings_by_owner(&owner)?;
        let ids: Vec<i64> = rows.iter().map(|l| l.id).collect();
        let images = db.get_images_for_listings(&ids)?;
        Ok((rows, images))
    })
    .await?;

    Ok(Json(convert::listings_with_images(rows, images)))
}

/// POST /me/listings
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<ListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = draft_from(req);
    validate_listing(&draft)?;

    let owner = claims.sub.to_string();
    let id = blocking(&state, move |db| Ok(db.insert_listing(&owner, &draft)?)).await?;

    info!("Listing {} created by {}", id, claims.username);
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// PUT /me/listings/{id}
pub async fn update_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<ListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = draft_from(req);
    validate_listing(&draft)?;

    let (row, images) = blocking(&state, move |db| {
        owned_listing(db, id, &claims)?;
        if !db.update_listing(id, &draft)? {
            return Err(ApiError::NotFound("Listing"));
        }
        let row = db.get_listing(id)?.ok_or(ApiError::NotFound("Listing"))?;
        let images = db.get_images_for_listing(id)?;
        Ok((row, images))
    })
    .await?;

    info!("Listing {} updated", id);
    Ok(Json(convert::listing(row, images)))
}

/// DELETE /me/listings/{id}: removes the listing, its reservations and its
/// images. Rows are committed first, files removed afterwards.
pub async fn delete_listing(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let images = blocking(&state, move |db| {
        owned_listing(db, id, &claims)?;
        db.delete_listing(id)?.ok_or(ApiError::NotFound("Listing"))
    })
    .await?;

    for image in &images {
        if let Err(e) = state.images.delete(&image.file_path).await {
            warn!("Listing {} deleted but image {} was left on disk: {}", id, image.file_path, e);
        }
    }

    info!("Listing {} deleted with {} images", id, images.len());
    Ok(StatusCode::NO_CONTENT)
}

/// Load a listing and make sure the caller owns it.
pub(crate) fn owned_listing(db: &Database, id: i64, claims: &Claims) -> Result<ListingRow, ApiError> {
    let row = db.get_listing(id)?.ok_or(ApiError::NotFound("Listing"))?;
    if row.owner_id != claims.sub.to_string() {
        return Err(ApiError::Forbidden("listing"));
    }
    Ok(row)
}

fn draft_from(req: ListingRequest) -> ListingDraft {
    ListingDraft {
        name: req.name.trim().to_string(),
        description: req.description,
        kind: req.kind,
        place: req.place.trim().to_string(),
        price: req.price,
        guests: req.guests,
        bedrooms: req.bedrooms,
        bathrooms: req.bathrooms,
        start_date: req.start_date,
        end_date: req.end_date,
    }
}
