//! Handlers for the `/listings` resource (pets offered for adoption).
//!
//! Listing `status` never changes through these routes: reserve/release
//! belong to the adoption workflow, and the only owner-facing transition is
//! the conditional withdraw.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::ROLE_ADMIN;
use pawhaven_core::status::{ListingStatus, LISTING_AVAILABLE};
use pawhaven_core::types::DbId;
use pawhaven_core::validation::{validate_required, MAX_LISTING_PHOTOS};
use pawhaven_db::models::listing::{
    CreatePetListing, ListingFilter, PetListing, UpdatePetListing,
};
use pawhaven_db::repositories::{ListingDelete, ListingRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::uploads::{store_file, UploadKind};

/// Query parameters for `GET /listings`.
#[derive(Debug, serde::Deserialize)]
pub struct ListingQuery {
    pub status: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub owner_id: Option<DbId>,
}

/// POST /api/v1/listings
///
/// Accepts a multipart form: text fields `species`, `breed`, `gender`,
/// `age`, `caption`, repeatable `medical_history`; file fields `photos`
/// (1 to 4 images) and optional `documents` (medical PDFs).
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<PetListing>)> {
    let mut species = String::new();
    let mut breed = String::new();
    let mut gender = String::new();
    let mut age: Option<i32> = None;
    let mut caption = String::new();
    let mut medical_history: Vec<String> = Vec::new();
    let mut photos: Vec<(String, Vec<u8>)> = Vec::new();
    let mut documents: Vec<(String, Vec<u8>)> = Vec::new();

    // 1. Drain the form into memory.
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "species" => species = read_text(field).await?,
            "breed" => breed = read_text(field).await?,
            "gender" => gender = read_text(field).await?,
            "caption" => caption = read_text(field).await?,
            "age" => {
                let text = read_text(field).await?;
                let parsed = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::BadRequest("'age' must be a whole number".into()))?;
                age = Some(parsed);
            }
            "medical_history" => medical_history.push(read_text(field).await?),
            "photos" => {
                let filename = field.file_name().unwrap_or("photo").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                photos.push((filename, data.to_vec()));
            }
            "documents" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                documents.push((filename, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    // 2. Validate before anything touches disk or the database.
    validate_required("species", &species)?;
    validate_required("breed", &breed)?;
    validate_required("gender", &gender)?;
    validate_required("caption", &caption)?;
    let age = age.ok_or_else(|| AppError::BadRequest("Missing required 'age' field".into()))?;
    if age < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "'age' must not be negative".into(),
        )));
    }
    if photos.is_empty() {
        return Err(AppError::BadRequest(
            "At least one photo is required".into(),
        ));
    }
    if photos.len() > MAX_LISTING_PHOTOS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A listing can carry at most {MAX_LISTING_PHOTOS} photos"
        ))));
    }

    // 3. Persist the files.
    let mut photo_paths = Vec::with_capacity(photos.len());
    for (filename, data) in &photos {
        let path =
            store_file(&state.config.upload_dir, UploadKind::Image, filename, data).await?;
        photo_paths.push(path);
    }
    let mut document_paths = Vec::with_capacity(documents.len());
    for (filename, data) in &documents {
        let path =
            store_file(&state.config.upload_dir, UploadKind::Document, filename, data).await?;
        document_paths.push(path);
    }

    // 4. Create the row in `available` status.
    let input = CreatePetListing {
        owner_id: auth_user.user_id,
        species,
        breed,
        gender,
        age,
        caption,
        medical_history,
        photo_paths,
        document_paths,
    };
    let listing = ListingRepo::create(&state.pool, &input).await?;
    tracing::info!(listing_id = listing.id, owner_id = listing.owner_id, "Listing created");

    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /api/v1/listings
///
/// Public browse. `status` defaults to `available`; `species`, `breed`,
/// and `owner_id` narrow the result further.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<PetListing>>> {
    let status = match query.status {
        Some(s) => ListingStatus::from_str(&s)?.as_str().to_string(),
        None => LISTING_AVAILABLE.to_string(),
    };

    let filter = ListingFilter {
        status: Some(status),
        species: query.species,
        breed: query.breed,
        owner_id: query.owner_id,
    };
    let listings = ListingRepo::list(&state.pool, &filter).await?;
    Ok(Json(listings))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<PetListing>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;
    Ok(Json(listing))
}

/// PUT /api/v1/listings/{id}
///
/// Partial update of attribute fields by the owner or an admin. Status is
/// not editable here.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
    Json(input): Json<UpdatePetListing>,
) -> AppResult<Json<PetListing>> {
    ensure_owner_or_admin(&state, &auth_user, id).await?;

    let listing = ListingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;
    Ok(Json(listing))
}

/// POST /api/v1/listings/{id}/withdraw
///
/// Take the pet off the adoption market: `available -> withdrawn`. A
/// reserved listing cannot be withdrawn while a request claims it.
pub async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<Json<PetListing>> {
    ensure_owner_or_admin(&state, &auth_user, id).await?;

    let transitioned = ListingRepo::withdraw(&state.pool, id).await?;
    if !transitioned {
        // The ownership check just saw the row, so this is a status problem.
        return Err(AppError::Core(CoreError::Conflict(
            "Only an available listing can be withdrawn".into(),
        )));
    }

    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;
    tracing::info!(listing_id = id, "Listing withdrawn");
    Ok(Json(listing))
}

/// DELETE /api/v1/listings/{id}
///
/// Remove a listing unless a pending adoption request references it.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    auth_user: AuthUser,
) -> AppResult<StatusCode> {
    ensure_owner_or_admin(&state, &auth_user, id).await?;

    match ListingRepo::delete(&state.pool, id).await? {
        ListingDelete::Deleted => Ok(StatusCode::NO_CONTENT),
        ListingDelete::NotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        })),
        ListingDelete::Claimed => Err(AppError::Core(CoreError::Conflict(
            "A pending adoption request references this listing".into(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a multipart text field, mapping stream errors to 400.
async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Allow the listing's owner and admins; 404 when the listing is missing.
async fn ensure_owner_or_admin(
    state: &AppState,
    auth_user: &AuthUser,
    id: DbId,
) -> Result<(), AppError> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;

    if listing.owner_id != auth_user.user_id && auth_user.role != ROLE_ADMIN {
        return Err(AppError::Core(CoreError::Forbidden(
            "You may only manage your own listings".into(),
        )));
    }
    Ok(())
}
