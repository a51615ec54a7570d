use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// The three owned-resource kinds share one lifecycle and one table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "listing_kind", rename_all = "lowercase")]
pub enum ListingKind {
    Service,
    Request,
    Rental,
}

impl ListingKind {
    /// URL segment the kind lives under.
    pub fn route_base(self) -> &'static str {
        match self {
            ListingKind::Service => "services",
            ListingKind::Request => "requests",
            ListingKind::Rental => "rents",
        }
    }

    pub fn initial_status(self) -> ListingStatus {
        match self {
            ListingKind::Rental => ListingStatus::Available,
            _ => ListingStatus::Pending,
        }
    }
}

/// Closed status set, validated on write. There is deliberately no
/// transition table: any enum value may follow any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "listing_status", rename_all = "lowercase")]
pub enum ListingStatus {
    Pending,
    Available,
    Accepted,
    Completed,
    Cancelled,
}

/// An owned resource: service offer, service request or rental listing.
/// `owner_id` is immutable after creation; owner name/avatar are
/// denormalized from the profile at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub kind: ListingKind,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_avatar: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub contact: Option<String>,
    pub availability: Option<String>,
    pub status: ListingStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

const LISTING_COLUMNS: &str = "id, kind, owner_id, owner_name, owner_avatar, category, \
     description, price, district, upazila, contact, availability, status, \
     created_at, updated_at";

pub struct NewListing {
    pub kind: ListingKind,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_avatar: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub contact: Option<String>,
    pub availability: Option<String>,
    pub status: ListingStatus,
}

/// Partial update. Absent fields stay untouched; present fields are
/// written as given.
#[derive(Debug, Default)]
pub struct ListingChanges {
    pub category: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub district: Option<String>,
    pub upazila: Option<String>,
    pub contact: Option<String>,
    pub availability: Option<String>,
    pub status: Option<ListingStatus>,
}

impl Listing {
    pub async fn create(db: &PgPool, new: &NewListing) -> sqlx::Result<Listing> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            r#"
            INSERT INTO listings (kind, owner_id, owner_name, owner_avatar, category,
                                  description, price, district, upazila, contact,
                                  availability, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(new.kind)
        .bind(new.owner_id)
        .bind(&new.owner_name)
        .bind(&new.owner_avatar)
        .bind(&new.category)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.district)
        .bind(&new.upazila)
        .bind(&new.contact)
        .bind(&new.availability)
        .bind(new.status)
        .fetch_one(db)
        .await?;
        Ok(listing)
    }

    /// Lookup scoped by kind so ids cannot leak across route families.
    pub async fn find_by_id(
        db: &PgPool,
        kind: ListingKind,
        id: Uuid,
    ) -> sqlx::Result<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1 AND kind = $2"
        ))
        .bind(id)
        .bind(kind)
        .fetch_optional(db)
        .await?;
        Ok(listing)
    }

    /// Newest first; the id tiebreak makes the order total and stable.
    /// A `None` limit binds as LIMIT NULL, which Postgres reads as
    /// LIMIT ALL, so the owner's full set is returned.
    pub async fn list_by_owner(
        db: &PgPool,
        kind: ListingKind,
        owner_id: Uuid,
        limit: Option<i64>,
        offset: i64,
    ) -> sqlx::Result<Vec<Listing>> {
        let rows = sqlx::query_as::<_, Listing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings
            WHERE kind = $1 AND owner_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(kind)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_all(
        db: &PgPool,
        kind: ListingKind,
        limit: Option<i64>,
        offset: i64,
    ) -> sqlx::Result<Vec<Listing>> {
        let rows = sqlx::query_as::<_, Listing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM listings
            WHERE kind = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(kind)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Partial update; stamps `updated_at`. The owner reference is never
    /// part of the SET list.
    pub async fn update(db: &PgPool, id: Uuid, changes: &ListingChanges) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE listings SET
                category     = COALESCE($2, category),
                description  = COALESCE($3, description),
                price        = COALESCE($4, price),
                district     = COALESCE($5, district),
                upazila      = COALESCE($6, upazila),
                contact      = COALESCE($7, contact),
                availability = COALESCE($8, availability),
                status       = COALESCE($9, status),
                updated_at   = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.category)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.district)
        .bind(&changes.upazila)
        .bind(&changes.contact)
        .bind(&changes.availability)
        .bind(changes.status)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_bases() {
        assert_eq!(ListingKind::Service.route_base(), "services");
        assert_eq!(ListingKind::Request.route_base(), "requests");
        assert_eq!(ListingKind::Rental.route_base(), "rents");
    }

    #[test]
    fn initial_statuses() {
        assert_eq!(ListingKind::Service.initial_status(), ListingStatus::Pending);
        assert_eq!(ListingKind::Request.initial_status(), ListingStatus::Pending);
        assert_eq!(
            ListingKind::Rental.initial_status(),
            ListingStatus::Available
        );
    }

    #[test]
    fn status_is_a_closed_set() {
        assert!(serde_json::from_str::<ListingStatus>(r#""pending""#).is_ok());
        assert!(serde_json::from_str::<ListingStatus>(r#""whatever""#).is_err());
    }

    #[test]
    fn listing_serializes_camel_case() {
        let listing = Listing {
            id: Uuid::new_v4(),
            kind: ListingKind::Rental,
            owner_id: Uuid::new_v4(),
            owner_name: "Karim".into(),
            owner_avatar: None,
            category: "flat".into(),
            description: None,
            price: Some(12000),
            district: Some("Dhaka".into()),
            upazila: None,
            contact: None,
            availability: None,
            status: ListingStatus::Available,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let json = serde_json::to_string(&listing).unwrap();
        assert!(json.contains("ownerId"));
        assert!(json.contains("ownerName"));
        assert!(json.contains(r#""status":"available""#));
    }
}
