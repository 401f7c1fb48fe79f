//! crates/bgy_core/src/roles.rs
//! Closed set of account roles and the page each one lands on after sign-in.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Route used for any role string outside the known set.
pub const FALLBACK_ROUTE: &str = "/index";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Role {
    Admin,
    Staff,
    #[cfg_attr(feature = "serde", serde(rename = "Super Admin"))]
    SuperAdmin,
    Youth,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Staff, Role::SuperAdmin, Role::Youth];

    /// Stored spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Staff => "Staff",
            Role::SuperAdmin => "Super Admin",
            Role::Youth => "Youth",
        }
    }

    pub fn landing_route(self) -> &'static str {
        match self {
            Role::Admin => "/index",
            Role::Staff => "/Pwd-form",
            Role::SuperAdmin => "/index-superadmin",
            Role::Youth => "/index-youth",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    /// Exact match against the stored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::InvalidToken(s.to_string()))
    }
}

/// Landing route for a raw stored role string; unknown roles go to [`FALLBACK_ROUTE`].
pub fn landing_route_for(raw: &str) -> &'static str {
    raw.parse::<Role>().map(Role::landing_route).unwrap_or(FALLBACK_ROUTE)
}
