//! Role-based authorization. Every role-gated operation asks [`authorize`]
//! rather than comparing roles inline.

use crate::domain::error::DomainError;
use crate::domain::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    DeleteProduct,
    /// Edit products listed by other users.
    ManageAnyProduct,
}

impl Capability {
    fn granted_to(self, role: Role) -> bool {
        match self {
            Capability::DeleteProduct | Capability::ManageAnyProduct => role == Role::Admin,
        }
    }

    fn denial_message(self) -> &'static str {
        match self {
            Capability::DeleteProduct => "Access denied. Admin only.",
            Capability::ManageAnyProduct => "Access denied. Only the seller or an admin may edit this product.",
        }
    }
}

pub fn can(user: &User, capability: Capability) -> bool {
    capability.granted_to(user.role)
}

pub fn authorize(user: &User, capability: Capability) -> Result<(), DomainError> {
    if can(user, capability) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(capability.denial_message().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_with(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            favorites: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_may_delete_products() {
        assert!(authorize(&user_with(Role::Admin), Capability::DeleteProduct).is_ok());
    }

    #[test]
    fn test_regular_user_may_not_delete_products() {
        let err = authorize(&user_with(Role::User), Capability::DeleteProduct).unwrap_err();
        match err {
            DomainError::Forbidden(msg) => assert_eq!(msg, "Access denied. Admin only."),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_manage_any_product_is_admin_only() {
        assert!(can(&user_with(Role::Admin), Capability::ManageAnyProduct));
        assert!(!can(&user_with(Role::User), Capability::ManageAnyProduct));
    }
}
