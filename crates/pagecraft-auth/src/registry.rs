//! Role to permission mapping and the authorization gate.
//!
//! The registry is built once at startup and shared read-only through
//! application state behind an `Arc`.

use std::collections::{BTreeMap, HashMap, HashSet};

use pagecraft_core::permissions::{self, PERMISSION_DESCRIPTIONS};

use crate::error::AuthError;
use crate::role::Role;

const EDITOR_PERMISSIONS: &[&str] = &[
    permissions::CONTENT_VIEW,
    permissions::CONTENT_CREATE,
    permissions::CONTENT_EDIT,
    permissions::CONTENT_DELETE,
    permissions::CONTENT_PUBLISH,
    permissions::CONTENT_REVISE,
    permissions::MEDIA_VIEW,
    permissions::MEDIA_UPLOAD,
    permissions::MEDIA_DELETE,
    permissions::ANALYTICS_VIEW,
    permissions::PUBLIC_VIEW,
];

const PUBLIC_PERMISSIONS: &[&str] = &[permissions::PUBLIC_VIEW];

#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    roles: HashMap<&'static str, HashSet<&'static str>>,
    empty: HashSet<&'static str>,
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionRegistry {
    pub fn new() -> Self {
        let all: HashSet<&'static str> = PERMISSION_DESCRIPTIONS.iter().map(|(p, _)| *p).collect();

        let mut roles = HashMap::new();
        roles.insert(Role::Admin.as_str(), all);
        roles.insert(
            Role::Editor.as_str(),
            EDITOR_PERMISSIONS.iter().copied().collect(),
        );
        roles.insert(
            Role::Public.as_str(),
            PUBLIC_PERMISSIONS.iter().copied().collect(),
        );

        Self {
            roles,
            empty: HashSet::new(),
        }
    }

    /// Permissions granted to `role`. Unknown roles get the empty set.
    pub fn permissions_for(&self, role: &str) -> &HashSet<&'static str> {
        self.roles.get(role).unwrap_or(&self.empty)
    }

    pub fn has_permission(&self, role: &str, permission: &str) -> bool {
        self.permissions_for(role).contains(permission)
    }

    /// `{permission: description}` for every permission `role` holds.
    pub fn describe(&self, role: &str) -> BTreeMap<String, String> {
        let granted = self.permissions_for(role);
        PERMISSION_DESCRIPTIONS
            .iter()
            .filter(|(name, _)| granted.contains(name))
            .map(|(name, desc)| (name.to_string(), desc.to_string()))
            .collect()
    }

    /// Any-match gate: succeeds when `role` holds at least one of `required`.
    pub fn authorize(&self, role: &str, required: &[&str]) -> Result<(), AuthError> {
        let granted = self.permissions_for(role);
        if required.iter().any(|p| granted.contains(p)) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                required: required.iter().map(|p| p.to_string()).collect(),
            })
        }
    }
}
