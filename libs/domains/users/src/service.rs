use std::sync::Arc;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, UserPatch, UserResponse};
use crate::policy::{self, ListScope};
use crate::store::UserStore;

/// Orchestrates the access-control engine over the identity store.
///
/// Every operation follows the same fixed order: resolve the caller,
/// authorize the intent, check target existence, apply payload-level guards,
/// then delegate the mutation to the store. The service holds no state of
/// its own and may be invoked concurrently.
#[derive(Debug, Clone)]
pub struct DirectoryService<S: UserStore> {
    store: Arc<S>,
}

impl<S: UserStore> DirectoryService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// List the directory. Guests get a singleton of their own record; any
    /// other resolved caller gets the full list in insertion order.
    pub async fn list_users(&self, caller: Option<Uuid>) -> UserResult<Vec<UserResponse>> {
        let caller = self.resolve_caller(caller).await?;

        match policy::list_scope(&caller) {
            ListScope::All => {
                let users = self.store.list().await?;
                Ok(users.into_iter().map(Into::into).collect())
            }
            ListScope::SelfOnly => Ok(vec![caller.into()]),
        }
    }

    /// Read a single record.
    pub async fn get_user(&self, caller: Option<Uuid>, id: Uuid) -> UserResult<UserResponse> {
        let caller = self.resolve_caller(caller).await?;
        policy::authorize_read(&caller, id)?;

        let user = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;

        Ok(user.into())
    }

    /// Create a record. The registration path requires no caller identity;
    /// required-field and email-uniqueness checks happen here because the
    /// store itself validates nothing.
    pub async fn create_user(&self, fields: NewUser) -> UserResult<UserResponse> {
        if fields.email.is_empty() || fields.password_hash.is_empty() {
            return Err(UserError::Validation(
                "Missing required fields email and password".to_string(),
            ));
        }

        if self.store.get_by_email(&fields.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(fields.email));
        }

        let created = self.store.add(fields).await?;
        Ok(created.into())
    }

    /// Partially update a record.
    pub async fn patch_user(
        &self,
        caller: Option<Uuid>,
        id: Uuid,
        patch: UserPatch,
    ) -> UserResult<UserResponse> {
        let caller = self.resolve_caller(caller).await?;
        policy::authorize_update(&caller, id)?;

        let target = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;
        policy::authorize_role_change(caller.role, target.role, patch.role)?;
        if let Some(ref email) = patch.email {
            self.check_email_free(email, &target.email).await?;
        }

        let updated = self.store.patch(id, patch).await?;
        Ok(updated.into())
    }

    /// Fully replace a record.
    pub async fn replace_user(
        &self,
        caller: Option<Uuid>,
        id: Uuid,
        fields: NewUser,
    ) -> UserResult<UserResponse> {
        let caller = self.resolve_caller(caller).await?;
        policy::authorize_update(&caller, id)?;

        let target = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))?;
        policy::authorize_role_change(caller.role, target.role, Some(fields.role))?;
        self.check_email_free(&fields.email, &target.email).await?;

        let replaced = self.store.replace(id, fields).await?;
        Ok(replaced.into())
    }

    /// Delete a record. Admin-only; the store reports absence, so an
    /// authorized delete of an unknown id surfaces as `NotFound`.
    pub async fn delete_user(&self, caller: Option<Uuid>, id: Uuid) -> UserResult<()> {
        let caller = self.resolve_caller(caller).await?;
        policy::authorize_delete(&caller)?;

        self.store.remove(id).await
    }

    /// Resolve the asserted caller id against the store. A missing id and an
    /// id that resolves to nothing are the same denial: there is no silent
    /// anonymous access.
    async fn resolve_caller(&self, caller: Option<Uuid>) -> UserResult<crate::models::User> {
        let id = caller.ok_or(UserError::Unauthenticated)?;
        self.store
            .get_by_id(id)
            .await?
            .ok_or(UserError::Unauthenticated)
    }

    /// Email uniqueness on update, enforced only when the email actually
    /// changes so self-replacement stays idempotent.
    async fn check_email_free(&self, proposed: &str, current: &str) -> UserResult<()> {
        if proposed != current && self.store.get_by_email(proposed).await?.is_some() {
            return Err(UserError::DuplicateEmail(proposed.to_string()));
        }
        Ok(())
    }
}
