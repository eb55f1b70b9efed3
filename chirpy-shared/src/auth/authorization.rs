/// Ownership checks
///
/// A caller may mutate a resource only if it owns it: the resource's owner
/// ID must equal the authenticated user ID exactly. There are no roles and
/// no admin override.
///
/// # Example
///
/// ```no_run
/// use chirpy_shared::auth::authorization::require_resource_owner;
/// use chirpy_shared::auth::middleware::AuthContext;
/// use chirpy_shared::store::Store;
/// use uuid::Uuid;
///
/// async fn check(store: &dyn Store, auth: &AuthContext, chirp_id: Uuid) -> Result<(), String> {
///     require_resource_owner(store, chirp_id, auth)
///         .await
///         .map_err(|e| e.to_string())
/// }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;
use crate::store::{Store, StoreError};

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller is authenticated but does not own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,

    /// Resource does not exist
    #[error("Resource not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Allows the call only if `caller` is `resource_owner`
pub fn authorize_ownership(resource_owner: Uuid, caller: Uuid) -> Result<(), AuthzError> {
    if resource_owner != caller {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}

/// Checks that the authenticated caller owns a resource
pub fn require_ownership(auth: &AuthContext, resource_owner: Uuid) -> Result<(), AuthzError> {
    authorize_ownership(resource_owner, auth.user_id)
}

/// Looks up a chirp's owner and checks it against the caller
///
/// # Errors
///
/// - `NotFound` if the chirp does not exist
/// - `NotOwner` if someone else wrote it
/// - `Store` if the lookup fails
pub async fn require_resource_owner(
    store: &dyn Store,
    chirp_id: Uuid,
    auth: &AuthContext,
) -> Result<(), AuthzError> {
    let owner = store
        .find_chirp_owner(chirp_id)
        .await?
        .ok_or(AuthzError::NotFound)?;

    require_ownership(auth, owner).map_err(|e| {
        tracing::debug!(%chirp_id, user_id = %auth.user_id, owner = %owner, "Ownership check failed");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{chirp::CreateChirp, user::CreateUser};
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_authorize_ownership() {
        let owner = Uuid::new_v4();
        assert!(authorize_ownership(owner, owner).is_ok());
        assert!(matches!(
            authorize_ownership(owner, Uuid::new_v4()),
            Err(AuthzError::NotOwner)
        ));
    }

    #[tokio::test]
    async fn test_require_resource_owner() {
        let store = MemoryStore::new();
        let alice = store
            .create_user(CreateUser {
                email: "alice@example.com".to_string(),
                hashed_password: "hash".to_string(),
            })
            .await
            .unwrap();
        let chirp = store
            .create_chirp(CreateChirp {
                body: "hello".to_string(),
                user_id: alice.id,
            })
            .await
            .unwrap();

        let owner_ctx = AuthContext::new(alice.id);
        assert!(require_resource_owner(&store, chirp.id, &owner_ctx).await.is_ok());

        let stranger = AuthContext::new(Uuid::new_v4());
        assert!(matches!(
            require_resource_owner(&store, chirp.id, &stranger).await,
            Err(AuthzError::NotOwner)
        ));

        assert!(matches!(
            require_resource_owner(&store, Uuid::new_v4(), &owner_ctx).await,
            Err(AuthzError::NotFound)
        ));
    }
}
