use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Agent,
    Admin,
}

impl Role {
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Agent | Role::Admin)
    }
}

/// The authenticated caller, as established by the transport layer.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// Only the single configured master-admin identity may alter roles.
    pub is_master_admin: bool,
}

/// Everything an actor can ask the engine to do.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    ViewBooking { owner: Uuid },
    ConfirmPayment { owner: Uuid },
    CancelBooking { owner: Uuid },
    OverrideBookingStatus,
    ViewAllBookings,
    ManagePackages,
    ViewSalesReport,
    ViewWallet { owner: Uuid },
    UpdateUserRole,
}

/// Single authorization choke point. Handlers never compare role strings.
pub fn authorize(actor: &Actor, action: Action) -> DomainResult<()> {
    let allowed = match action {
        Action::ViewBooking { owner } | Action::ViewWallet { owner } => {
            actor.id == owner || actor.role.is_staff()
        }
        // Payment confirmation is strictly an owner action; staff use the
        // status override path instead.
        Action::ConfirmPayment { owner } => actor.id == owner,
        Action::CancelBooking { owner } => actor.id == owner || actor.role.is_staff(),
        Action::OverrideBookingStatus
        | Action::ViewAllBookings
        | Action::ManagePackages
        | Action::ViewSalesReport => actor.role.is_staff(),
        Action::UpdateUserRole => actor.is_master_admin,
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden(forbidden_message(action)))
    }
}

fn forbidden_message(action: Action) -> String {
    match action {
        Action::ConfirmPayment { .. } => "Not the owner of this booking".to_string(),
        Action::CancelBooking { .. } | Action::ViewBooking { .. } => {
            "Not the owner of this booking".to_string()
        }
        Action::ViewWallet { .. } => "Not the owner of this wallet".to_string(),
        Action::UpdateUserRole => "Only the master admin may change roles".to_string(),
        _ => "Insufficient privileges".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            role,
            is_master_admin: false,
        }
    }

    #[test]
    fn owner_may_cancel_own_booking() {
        let user = actor(Role::User);
        assert!(authorize(&user, Action::CancelBooking { owner: user.id }).is_ok());
    }

    #[test]
    fn stranger_may_not_cancel() {
        let user = actor(Role::User);
        let result = authorize(&user, Action::CancelBooking { owner: Uuid::new_v4() });
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[test]
    fn agent_may_cancel_any_booking() {
        let agent = actor(Role::Agent);
        assert!(authorize(&agent, Action::CancelBooking { owner: Uuid::new_v4() }).is_ok());
    }

    #[test]
    fn payment_is_owner_only_even_for_admins() {
        let admin = actor(Role::Admin);
        let result = authorize(&admin, Action::ConfirmPayment { owner: Uuid::new_v4() });
        assert!(result.is_err());
    }

    #[test]
    fn role_updates_require_master_admin() {
        let admin = actor(Role::Admin);
        assert!(authorize(&admin, Action::UpdateUserRole).is_err());

        let master = Actor {
            is_master_admin: true,
            ..actor(Role::Admin)
        };
        assert!(authorize(&master, Action::UpdateUserRole).is_ok());
    }
}
