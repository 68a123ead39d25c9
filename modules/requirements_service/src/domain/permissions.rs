//! Access rules evaluated before an operation runs

use crate::contract::{Owned, RequirementsError, User};

/// A single access rule
///
/// `has_permission` runs for every request; `has_object_permission` runs
/// once the target record has been loaded.
pub trait Permission: Send + Sync {
    fn has_permission(&self, user: Option<&User>) -> bool;

    fn has_object_permission(&self, user: Option<&User>, _object: &dyn Owned) -> bool {
        self.has_permission(user)
    }
}

/// Grants everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl Permission for AllowAny {
    fn has_permission(&self, _user: Option<&User>) -> bool {
        true
    }

    fn has_object_permission(&self, _user: Option<&User>, _object: &dyn Owned) -> bool {
        true
    }
}

/// Requires a resolved, non-deleted caller
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
    fn has_permission(&self, user: Option<&User>) -> bool {
        user.is_some_and(|u| !u.is_deleted)
    }
}

/// Requires the caller to own the target record
#[derive(Debug, Clone, Copy, Default)]
pub struct IsOwner;

impl Permission for IsOwner {
    fn has_permission(&self, user: Option<&User>) -> bool {
        user.is_some()
    }

    fn has_object_permission(&self, user: Option<&User>, object: &dyn Owned) -> bool {
        user.is_some_and(|u| u.id == object.owner_id())
    }
}

/// Runs a list of permissions, failing on the first denial
pub struct PermissionChecker {
    permissions: Vec<Box<dyn Permission>>,
}

impl PermissionChecker {
    pub fn new(permissions: Vec<Box<dyn Permission>>) -> Self {
        Self { permissions }
    }

    /// Authenticated callers only
    pub fn authenticated() -> Self {
        Self::new(vec![Box::new(IsAuthenticated)])
    }

    /// Authenticated owners only
    pub fn owner() -> Self {
        Self::new(vec![Box::new(IsAuthenticated), Box::new(IsOwner)])
    }

    pub fn check(&self, user: Option<&User>) -> Result<(), RequirementsError> {
        if self.permissions.iter().all(|p| p.has_permission(user)) {
            Ok(())
        } else {
            Err(RequirementsError::Forbidden)
        }
    }

    pub fn check_object(
        &self,
        user: Option<&User>,
        object: &dyn Owned,
    ) -> Result<(), RequirementsError> {
        self.check(user)?;
        if self
            .permissions
            .iter()
            .all(|p| p.has_object_permission(user, object))
        {
            Ok(())
        } else {
            Err(RequirementsError::Forbidden)
        }
    }
}
