//! User repository trait defining the read-only principal lookup contract.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::AuthResult;

/// Repository trait for principal lookups
///
/// The auth core never writes users; account management belongs to the
/// identity subsystem. Lookups return the full row including the credential
/// hash and the joined role.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with this id
    /// * `Err(AuthError::Lookup)` - Store I/O failure
    async fn find_by_id(&self, id: Uuid) -> AuthResult<Option<User>>;

    /// Find a user by email, used by the sign-in flow
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;
}
