use serde::{Deserialize, Serialize};

use crate::listings::repo::{Listing, ListingStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateListingRequest {
    /// Service type, request type or rental category.
    pub category: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub contact: Option<String>,
    pub availability: Option<String>,
}

/// Partial update for an owned resource. Absent fields are untouched,
/// present fields are applied as given; unknown fields are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListingPatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub contact: Option<String>,
    pub availability: Option<String>,
    pub status: Option<ListingStatus>,
}

#[derive(Debug, Serialize)]
pub struct CreatedListingResponse {
    pub message: String,
    pub listing: Listing,
}

#[derive(Debug, Serialize)]
pub struct UpdatedListingResponse {
    pub message: String,
    pub listing: Listing,
}

#[derive(Debug, Serialize)]
pub struct DeletedListingResponse {
    pub message: String,
}

/// Opt-in pagination. Without query params the full result set comes
/// back; `limit` only caps the page when the client asks for one.
#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_rejects_unknown_fields() {
        assert!(serde_json::from_str::<ListingPatch>(r#"{"ownerId":"abc"}"#).is_err());
        assert!(serde_json::from_str::<ListingPatch>(r#"{"nope":1}"#).is_err());
    }

    #[test]
    fn patch_rejects_unknown_status() {
        assert!(serde_json::from_str::<ListingPatch>(r#"{"status":"weird"}"#).is_err());
        let patch: ListingPatch = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(patch.status, Some(ListingStatus::Completed));
    }

    #[test]
    fn patch_absent_fields_stay_none() {
        let patch: ListingPatch = serde_json::from_str(r#"{"contact":"017"}"#).unwrap();
        assert_eq!(patch.contact.as_deref(), Some("017"));
        assert!(patch.category.is_none());
        assert!(patch.status.is_none());
    }

    #[test]
    fn create_requires_category() {
        assert!(serde_json::from_str::<CreateListingRequest>(r#"{}"#).is_err());
        let req: CreateListingRequest =
            serde_json::from_str(r#"{"category":"plumbing","district":"Dhaka"}"#).unwrap();
        assert_eq!(req.category, "plumbing");
        assert!(req.contact.is_none());
    }

    #[test]
    fn pagination_is_unbounded_unless_asked_for() {
        let p: Pagination = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.limit, None);
        assert_eq!(p.offset, 0);

        let p: Pagination = serde_json::from_str(r#"{"limit":5,"offset":10}"#).unwrap();
        assert_eq!(p.limit, Some(5));
        assert_eq!(p.offset, 10);
    }
}
