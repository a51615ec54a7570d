use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::session::Session,
    error::ApiError,
    listings::{
        dto::{
            CreateListingRequest, CreatedListingResponse, DeletedListingResponse, ListingPatch,
            Pagination, UpdatedListingResponse,
        },
        repo::{Listing, ListingChanges, ListingKind, NewListing},
    },
    policy,
    state::AppState,
    users::{handlers::current_user, repo::User},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(routes_for(ListingKind::Service))
        .merge(routes_for(ListingKind::Request))
        .merge(routes_for(ListingKind::Rental))
}

/// One route family per kind; the kind rides along as an extension so a
/// single set of handlers serves services, requests and rentals alike.
fn routes_for(kind: ListingKind) -> Router<AppState> {
    let base = kind.route_base();
    Router::new()
        .route(&format!("/{base}"), post(create_listing))
        .route(&format!("/my-{base}"), get(list_mine))
        .route(&format!("/{base}/admin"), get(list_all_admin))
        .route(
            &format!("/{base}/:id"),
            patch(update_listing).delete(delete_listing),
        )
        .route(&format!("/{base}/admin/:id"), delete(admin_delete_listing))
        .layer(Extension(kind))
}

/// Decision core for owner-scoped mutations. Existence wins over
/// ownership: a missing record is 404 for every caller; only then does
/// the owner-or-admin rule run.
fn locate_owned(existing: Option<Listing>, actor: &User) -> Result<Listing, ApiError> {
    let listing = existing.ok_or_else(|| ApiError::not_found("Not found"))?;
    policy::authorize_mutation(actor, listing.owner_id)?;
    Ok(listing)
}

/// Same ordering for the admin-forced routes; owning the record is no
/// substitute for the admin role.
fn locate_for_admin(existing: Option<Listing>, actor: &User) -> Result<Listing, ApiError> {
    let listing = existing.ok_or_else(|| ApiError::not_found("Not found"))?;
    policy::require_admin(actor)?;
    Ok(listing)
}

#[instrument(skip(state, session, payload))]
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Json(payload): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<CreatedListingResponse>), ApiError> {
    let user = current_user(&state.db, &session).await?;

    // Location and contact fall back to the owner's profile; name and
    // avatar are denormalized at creation time.
    let new = NewListing {
        kind,
        owner_id: user.id,
        owner_name: user.name.clone(),
        owner_avatar: user.avatar_url.clone(),
        category: payload.category,
        description: payload.description,
        price: payload.price,
        district: payload.district.or(user.district),
        upazila: payload.upazila.or(user.upazila),
        contact: payload.contact.or(user.phone),
        availability: payload.availability,
        status: kind.initial_status(),
    };
    let listing = Listing::create(&state.db, &new).await?;

    info!(listing_id = %listing.id, owner_id = %listing.owner_id, kind = ?kind, "listing created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedListingResponse {
            message: "Created successfully".into(),
            listing,
        }),
    ))
}

#[instrument(skip(state, session))]
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let user = current_user(&state.db, &session).await?;
    let rows = Listing::list_by_owner(&state.db, kind, user.id, p.limit, p.offset).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, session))]
pub async fn list_all_admin(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    policy::require_admin(&actor)?;
    let rows = Listing::list_all(&state.db, kind, p.limit, p.offset).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, session, patch))]
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(patch): Json<ListingPatch>,
) -> Result<Json<UpdatedListingResponse>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    let existing = locate_owned(Listing::find_by_id(&state.db, kind, id).await?, &actor)?;

    let changes = ListingChanges {
        category: patch.category,
        description: patch.description,
        price: patch.price,
        district: patch.district,
        upazila: patch.upazila,
        contact: patch.contact,
        availability: patch.availability,
        status: patch.status,
    };
    Listing::update(&state.db, existing.id, &changes).await?;

    let listing = Listing::find_by_id(&state.db, kind, existing.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    info!(listing_id = %listing.id, actor_id = %actor.id, "listing updated");
    Ok(Json(UpdatedListingResponse {
        message: "Updated successfully".into(),
        listing,
    }))
}

#[instrument(skip(state, session))]
pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedListingResponse>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    let existing = locate_owned(Listing::find_by_id(&state.db, kind, id).await?, &actor)?;

    Listing::delete(&state.db, existing.id).await?;

    info!(listing_id = %existing.id, actor_id = %actor.id, "listing deleted");
    Ok(Json(DeletedListingResponse {
        message: "Deleted successfully".into(),
    }))
}

#[instrument(skip(state, session))]
pub async fn admin_delete_listing(
    State(state): State<AppState>,
    Extension(kind): Extension<ListingKind>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedListingResponse>, ApiError> {
    let actor = current_user(&state.db, &session).await?;
    let existing = locate_for_admin(Listing::find_by_id(&state.db, kind, id).await?, &actor)?;

    Listing::delete(&state.db, existing.id).await?;

    info!(listing_id = %existing.id, admin_id = %actor.id, "listing force-deleted");
    Ok(Json(DeletedListingResponse {
        message: "Deleted successfully".into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::repo::ListingStatus;
    use crate::users::repo::{Role, UserStatus};
    use time::OffsetDateTime;

    fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "u@example.com".into(),
            name: "U".into(),
            phone: None,
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            avatar_url: None,
            blood_group: None,
            district: None,
            upazila: None,
            rating_sum: 0,
            rating_count: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn listing_owned_by(owner_id: Uuid) -> Listing {
        Listing {
            id: Uuid::new_v4(),
            kind: ListingKind::Service,
            owner_id,
            owner_name: "Owner".into(),
            owner_avatar: None,
            category: "plumbing".into(),
            description: None,
            price: None,
            district: None,
            upazila: None,
            contact: None,
            availability: None,
            status: ListingStatus::Pending,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn missing_record_is_not_found_for_every_caller() {
        // 404 wins over 403: a stranger, an owner and an admin all see
        // the same answer for an id that does not exist.
        let stranger = user_with_role(Role::User);
        let admin = user_with_role(Role::Admin);
        assert!(matches!(
            locate_owned(None, &stranger).unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            locate_owned(None, &admin).unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            locate_for_admin(None, &stranger).unwrap_err(),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            locate_for_admin(None, &admin).unwrap_err(),
            ApiError::NotFound(_)
        ));
    }

    #[test]
    fn stranger_is_forbidden_on_an_existing_record() {
        let owner = user_with_role(Role::User);
        let stranger = user_with_role(Role::User);
        let listing = listing_owned_by(owner.id);
        assert!(matches!(
            locate_owned(Some(listing), &stranger).unwrap_err(),
            ApiError::Forbidden(_)
        ));
    }

    #[test]
    fn owner_and_admin_may_mutate() {
        let owner = user_with_role(Role::User);
        let admin = user_with_role(Role::Admin);
        let found = locate_owned(Some(listing_owned_by(owner.id)), &owner).expect("owner");
        assert_eq!(found.owner_id, owner.id);
        assert!(locate_owned(Some(listing_owned_by(owner.id)), &admin).is_ok());
    }

    #[test]
    fn admin_route_rejects_the_owner() {
        let owner = user_with_role(Role::User);
        let admin = user_with_role(Role::Admin);
        let listing = listing_owned_by(owner.id);
        assert!(matches!(
            locate_for_admin(Some(listing.clone()), &owner).unwrap_err(),
            ApiError::Forbidden(_)
        ));
        assert!(locate_for_admin(Some(listing), &admin).is_ok());
    }
}
