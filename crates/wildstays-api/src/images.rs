use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, warn};

use wildstays_types::api::{Claims, UploadImageQuery, UploadImageResponse};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, ImageBody};
use crate::listings::owned_listing;
use crate::state::{AppState, blocking};

/// POST /me/listings/{id}/images?filename=cabin.jpg: accepts the raw image
/// bytes, saves them under the upload dir, inserts the image row. Bodies over
/// the size limit are turned away by [`ImageBody`].
pub async fn upload_image(
    State(state): State<AppState>,
    ApiPath(listing_id): ApiPath<i64>,
    Extension(claims): Extension<Claims>,
    ApiQuery(query): ApiQuery<UploadImageQuery>,
    ImageBody(bytes): ImageBody,
) -> Result<impl IntoResponse, ApiError> {
    if bytes.is_empty() {
        warn!("Skipped an empty image upload for listing {}", listing_id);
        return Err(ApiError::Validation("Image file is empty.".into()));
    }

    blocking(&state, move |db| owned_listing(db, listing_id, &claims).map(|_| ())).await?;

    let file_path = state.images.save(query.filename.as_deref(), &bytes).await?;

    let path = file_path.clone();
    let inserted = blocking(&state, move |db| Ok(db.insert_image(listing_id, &path)?)).await;

    let id = match inserted {
        Ok(id) => id,
        Err(e) => {
            // Don't leave a file nothing points at
            if let Err(cleanup) = state.images.delete(&file_path).await {
                error!("Failed to remove orphaned image {}: {}", file_path, cleanup);
            }
            return Err(e);
        }
    };

    info!("Image uploaded: {}, listing {}", file_path, listing_id);
    Ok((
        StatusCode::CREATED,
        Json(UploadImageResponse {
            id,
            file_path,
            size: bytes.len() as u64,
        }),
    ))
}

/// DELETE /me/listings/{id}/images/{image_id}: removes the row, then the file.
pub async fn delete_image(
    State(state): State<AppState>,
    ApiPath((listing_id, image_id)): ApiPath<(i64, i64)>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let image = blocking(&state, move |db| {
        owned_listing(db, listing_id, &claims)?;

        let image = db
            .get_image(image_id)?
            .filter(|img| img.listing_id == listing_id)
            .ok_or(ApiError::NotFound("Image"))?;

        if !db.delete_image(image_id)? {
            return Err(ApiError::NotFound("Image"));
        }
        Ok(image)
    })
    .await?;

    // Row is gone; a failure here only leaves an orphaned file behind.
    if let Err(e) = state.images.delete(&image.file_path).await {
        warn!("Image row {} deleted but file {} remains: {}", image_id, image.file_path, e);
    }

    Ok(StatusCode::NO_CONTENT)
}
