//! Access-control decisions for directory operations.
//!
//! Every function here is a pure decision over (caller, operation, target,
//! proposed changes). Nothing in this module touches the store; the service
//! layer resolves records, asks for a decision, and only then executes.
//!
//! Evaluation order across the service is fixed: authenticate, authorize the
//! intent, check target existence, then apply payload-level guards. That
//! order is what makes "admin deletes unknown id" report `NotFound` while
//! "user deletes unknown id" reports `Forbidden`.

use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{Role, User};

/// How much of the directory a list call may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Full directory, insertion order
    All,
    /// Narrowed to a singleton of the caller's own record
    SelfOnly,
}

/// Guests may list, but the result is narrowed to their own record. The
/// call still succeeds, preserving the list contract under least privilege.
pub fn list_scope(caller: &User) -> ListScope {
    match caller.role {
        Role::Guest => ListScope::SelfOnly,
        Role::User | Role::Admin => ListScope::All,
    }
}

/// Reading a record: admins may read anyone, everyone else only themselves.
pub fn authorize_read(caller: &User, target_id: Uuid) -> UserResult<()> {
    if is_self_or_admin(caller, target_id) {
        Ok(())
    } else {
        Err(UserError::Forbidden(
            "You may only read your own record".to_string(),
        ))
    }
}

/// Patching or replacing a record: admins may update anyone, everyone else
/// only themselves. Payload-level guards come separately in
/// [`authorize_role_change`] once the target record is known.
pub fn authorize_update(caller: &User, target_id: Uuid) -> UserResult<()> {
    if is_self_or_admin(caller, target_id) {
        Ok(())
    } else {
        Err(UserError::Forbidden(
            "You may only update your own record".to_string(),
        ))
    }
}

/// Deleting a record is admin-only, self included.
pub fn authorize_delete(caller: &User) -> UserResult<()> {
    match caller.role {
        Role::Admin => Ok(()),
        Role::Guest | Role::User => Err(UserError::Forbidden(
            "Admin access required to delete users".to_string(),
        )),
    }
}

/// Guards on a proposed `role` value, evaluated against the target's current
/// role after the target is known to exist.
///
/// - No caller, admins included, may set a role to `GUEST`; that value is
///   only reachable at creation. The guard fires on the proposed value
///   alone, even when the target is already a guest.
/// - A non-admin proposing a role different from the current one is denied,
///   self or not. Re-stating the current role is not a change, which keeps
///   full replacement idempotent.
pub fn authorize_role_change(
    caller_role: Role,
    current: Role,
    proposed: Option<Role>,
) -> UserResult<()> {
    let Some(proposed) = proposed else {
        return Ok(());
    };

    if proposed == Role::Guest {
        return Err(UserError::Forbidden(
            "Users cannot be demoted to GUEST".to_string(),
        ));
    }

    if proposed != current && caller_role != Role::Admin {
        return Err(UserError::Forbidden(
            "Admin access required to change roles".to_string(),
        ));
    }

    Ok(())
}

fn is_self_or_admin(caller: &User, target_id: Uuid) -> bool {
    caller.role == Role::Admin || caller.id == target_id
}
