use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role held by an employee.
///
/// Roles form a strict hierarchy: `Director > Manager > Employee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Director,
}

impl Role {
    /// Position in the hierarchy; higher means more privileged.
    pub fn rank(self) -> u8 {
        match self {
            Role::Employee => 0,
            Role::Manager => 1,
            Role::Director => 2,
        }
    }

    /// Whether a holder of `self` may hand out `other`.
    ///
    /// Equal rank is allowed; only strictly higher roles are refused.
    pub fn can_assign(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Director => "director",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "director" => Ok(Role::Director),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}
