//! Pet listing entity model, DTOs, and list filter.

use pawhaven_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row from the `pet_listings` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PetListing {
    pub id: DbId,
    pub owner_id: DbId,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub age: i32,
    pub caption: String,
    /// Free-text medical history entries, oldest first.
    pub medical_history: Vec<String>,
    /// Relative references into the upload store, display order.
    pub photo_paths: Vec<String>,
    pub document_paths: Vec<String>,
    pub status: String,
    /// Moderation flag reserved for admin curation; never gates the
    /// adoption workflow.
    pub approved: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact listing view embedded in adoption-request responses.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ListingSummary {
    pub id: DbId,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub age: i32,
    pub caption: String,
    pub status: String,
    pub photo_paths: Vec<String>,
}

/// DTO for creating a pet listing. Status starts `available`.
#[derive(Debug)]
pub struct CreatePetListing {
    pub owner_id: DbId,
    pub species: String,
    pub breed: String,
    pub gender: String,
    pub age: i32,
    pub caption: String,
    pub medical_history: Vec<String>,
    pub photo_paths: Vec<String>,
    pub document_paths: Vec<String>,
}

/// DTO for updating a pet listing's attributes. Status is absent here;
/// only the workflow engine and the withdraw operation move it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePetListing {
    pub species: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub caption: Option<String>,
    pub medical_history: Option<Vec<String>>,
}

/// Filter for listing queries. `None` fields match everything.
#[derive(Debug, Default, Deserialize)]
pub struct ListingFilter {
    pub status: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub owner_id: Option<DbId>,
}
