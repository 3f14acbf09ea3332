//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Member Roles
// =============================================================================

/// Default role assigned to new members
pub const ROLE_MEMBER: &str = "member";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_MEMBER, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Board
// =============================================================================

/// View counter assigned to new boards
pub const INITIAL_VIEW_COUNT: i64 = 0;

// =============================================================================
// Todo
// =============================================================================

/// Sort position assigned when a todo is created without one
pub const DEFAULT_TODO_ORDER: i64 = 0;
