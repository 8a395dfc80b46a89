//! Permission string constants.
//!
//! Permissions are `resource.action` identifiers. Use these constants instead
//! of string literals so a typo is a compile error.
//!
//! ```ignore
//! use pagecraft_core::permissions;
//!
//! registry.authorize(&user.role, &[permissions::CONTENT_EDIT])?;
//! ```

// =============================================================================
// Users
// =============================================================================

pub const USERS_VIEW: &str = "users.view";
pub const USERS_CREATE: &str = "users.create";
pub const USERS_EDIT: &str = "users.edit";
pub const USERS_DELETE: &str = "users.delete";
pub const USERS_MANAGE_ROLES: &str = "users.manage_roles";

// =============================================================================
// Content (pages, page blocks, revisions)
// =============================================================================

pub const CONTENT_VIEW: &str = "content.view";
pub const CONTENT_CREATE: &str = "content.create";
pub const CONTENT_EDIT: &str = "content.edit";
pub const CONTENT_DELETE: &str = "content.delete";
pub const CONTENT_PUBLISH: &str = "content.publish";
pub const CONTENT_REVISE: &str = "content.revise";

// =============================================================================
// Media
// =============================================================================

pub const MEDIA_VIEW: &str = "media.view";
pub const MEDIA_UPLOAD: &str = "media.upload";
pub const MEDIA_DELETE: &str = "media.delete";

// =============================================================================
// Site settings
// =============================================================================

pub const SITE_SETTINGS_VIEW: &str = "site.settings.view";
pub const SITE_SETTINGS_EDIT: &str = "site.settings.edit";

// =============================================================================
// Analytics and audit
// =============================================================================

pub const ANALYTICS_VIEW: &str = "analytics.view";
pub const AUDIT_VIEW: &str = "audit.view";
pub const AUDIT_DELETE: &str = "audit.delete";

// =============================================================================
// Public
// =============================================================================

pub const PUBLIC_VIEW: &str = "public.view";

/// Every known permission with its human-readable description.
pub const PERMISSION_DESCRIPTIONS: &[(&str, &str)] = &[
    (USERS_VIEW, "View user accounts"),
    (USERS_CREATE, "Create new users"),
    (USERS_EDIT, "Edit existing users"),
    (USERS_DELETE, "Delete users"),
    (USERS_MANAGE_ROLES, "Manage user roles"),
    (CONTENT_VIEW, "View content"),
    (CONTENT_CREATE, "Create content"),
    (CONTENT_EDIT, "Edit content"),
    (CONTENT_DELETE, "Delete content"),
    (CONTENT_PUBLISH, "Publish content"),
    (CONTENT_REVISE, "Revise content"),
    (MEDIA_VIEW, "View media"),
    (MEDIA_UPLOAD, "Upload media"),
    (MEDIA_DELETE, "Delete media"),
    (SITE_SETTINGS_VIEW, "View site settings"),
    (SITE_SETTINGS_EDIT, "Edit site settings"),
    (ANALYTICS_VIEW, "View analytics"),
    (AUDIT_VIEW, "View audit logs"),
    (AUDIT_DELETE, "Delete audit log entries"),
    (PUBLIC_VIEW, "View public content"),
];

pub fn description(permission: &str) -> Option<&'static str> {
    PERMISSION_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == permission)
        .map(|(_, desc)| *desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn permission_names_are_unique() {
        let names: HashSet<_> = PERMISSION_DESCRIPTIONS.iter().map(|(n, _)| n).collect();
        assert_eq!(names.len(), PERMISSION_DESCRIPTIONS.len());
    }

    #[test]
    fn permissions_follow_resource_action_format() {
        for (name, _) in PERMISSION_DESCRIPTIONS {
            let (resource, action) = name.rsplit_once('.').unwrap();
            assert!(!resource.is_empty() && !action.is_empty(), "{name}");
        }
    }

    #[test]
    fn description_lookup() {
        assert_eq!(description(CONTENT_PUBLISH), Some("Publish content"));
        assert_eq!(description("content.unknown"), None);
    }
}
