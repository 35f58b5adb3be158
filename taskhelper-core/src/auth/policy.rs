//! Route access policy.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

use super::{directory::Principal, role::Role};
use crate::routes;

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Let the request through.
    Allow,
    /// Anonymous request to a guarded route.
    LoginRequired,
    /// Authenticated, but the principal lacks `required`.
    Forbidden {
        /// Role the route demands.
        required: Role,
    },
}

/// A route template guarded by a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    /// Route template, e.g. `/tasks/{id}/application`.
    pub route: String,
    /// Role a principal needs for the route.
    pub required: Role,
}

impl AccessRule {
    /// Rule guarding `route` with `required`.
    pub fn new(route: impl Into<String>, required: Role) -> Self {
        Self {
            route: route.into(),
            required,
        }
    }
}

/// Which policy the server applies; selected by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessPolicyKind {
    /// Everything is open.
    #[default]
    PermitAll,
    /// Guard account and helper pages by role.
    RoleBased,
}

/// Input that names no known policy.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown access policy '{0}' (expected 'permit-all' or 'role-based')")]
pub struct ParseAccessPolicyError(pub String);

impl FromStr for AccessPolicyKind {
    type Err = ParseAccessPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "permit-all" => Ok(AccessPolicyKind::PermitAll),
            "role-based" => Ok(AccessPolicyKind::RoleBased),
            _ => Err(ParseAccessPolicyError(s.to_string())),
        }
    }
}

impl fmt::Display for AccessPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPolicyKind::PermitAll => f.write_str("permit-all"),
            AccessPolicyKind::RoleBased => f.write_str("role-based"),
        }
    }
}

/// Authorization policy evaluated against the matched route template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Every request is allowed regardless of authentication or role.
    #[default]
    PermitAll,
    /// Routes named by a rule need the rule's role; all others are open.
    RoleBased(Vec<AccessRule>),
}

impl AccessPolicy {
    /// Policy for a configured kind, with the built-in role rules.
    pub fn for_kind(kind: AccessPolicyKind) -> Self {
        match kind {
            AccessPolicyKind::PermitAll => AccessPolicy::PermitAll,
            AccessPolicyKind::RoleBased => Self::default_role_rules(),
        }
    }

    /// Account pages need `USER`, helper pages need `HELPER`.
    pub fn default_role_rules() -> Self {
        AccessPolicy::RoleBased(vec![
            AccessRule::new(routes::DASHBOARD, Role::User),
            AccessRule::new(routes::tasks::CREATE, Role::User),
            AccessRule::new(routes::tasks::MY, Role::User),
            AccessRule::new(routes::tasks::APPLICATION, Role::User),
            AccessRule::new(routes::tasks::HELPER, Role::Helper),
            AccessRule::new(routes::helper::EARNINGS, Role::Helper),
        ])
    }

    /// Kind this policy was built from.
    pub fn kind(&self) -> AccessPolicyKind {
        match self {
            AccessPolicy::PermitAll => AccessPolicyKind::PermitAll,
            AccessPolicy::RoleBased(_) => AccessPolicyKind::RoleBased,
        }
    }

    /// Role needed for `route`, if any.
    pub fn required_role(&self, route: &str) -> Option<Role> {
        match self {
            AccessPolicy::PermitAll => None,
            AccessPolicy::RoleBased(rules) => rules
                .iter()
                .find(|rule| rule.route == route)
                .map(|rule| rule.required),
        }
    }

    /// Decide access to `route` for an optional principal.
    pub fn decide(&self, route: &str, principal: Option<&Principal>) -> AccessDecision {
        let Some(required) = self.required_role(route) else {
            return AccessDecision::Allow;
        };

        match principal {
            None => AccessDecision::LoginRequired,
            Some(principal) if principal.has_role(required) => AccessDecision::Allow,
            Some(_) => AccessDecision::Forbidden { required },
        }
    }
}
