//! Well-known permission names.

pub const EVENTS_CREATE: &str = "events.create";
pub const EVENTS_READ: &str = "events.read";
pub const EVENTS_UPDATE: &str = "events.update";
pub const EVENTS_DELETE: &str = "events.delete";
pub const EVENTS_ADMIN: &str = "events.admin";

pub const USERS_CREATE: &str = "users.create";
pub const USERS_READ: &str = "users.read";
pub const USERS_UPDATE: &str = "users.update";
pub const USERS_DELETE: &str = "users.delete";
pub const USERS_ADMIN: &str = "users.admin";

/// Names the password reset capability. Reset tokens are told apart by
/// their purpose claim, and the name cannot be created through the admin API.
pub const PASSWORD_RESET: &str = "password.reset";

/// Names the admin API refuses to create.
pub const RESERVED: [&str; 1] = [PASSWORD_RESET];

pub fn is_reserved(name: &str) -> bool {
    RESERVED.iter().any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Any one of these opens the admin surface.
pub const ADMIN_PERMISSIONS: [&str; 2] = [EVENTS_ADMIN, USERS_ADMIN];

/// Every grantable permission with its description.
pub const CATALOGUE: [(&str, &str); 10] = [
    (EVENTS_CREATE, "Create events"),
    (EVENTS_READ, "Read events"),
    (EVENTS_UPDATE, "Update events"),
    (EVENTS_DELETE, "Delete events"),
    (EVENTS_ADMIN, "Administer events"),
    (USERS_CREATE, "Create users"),
    (USERS_READ, "Read users"),
    (USERS_UPDATE, "Update users"),
    (USERS_DELETE, "Delete users"),
    (USERS_ADMIN, "Administer users and roles"),
];
