//! Path-based group authorization
//!
//! A request path is matched against an ordered table of substring patterns.
//! The first matching rule names the group the caller must belong to. Paths
//! that match no rule carry no group restriction and are allowed.

use crate::claims::Claims;
use serde::Serialize;

/// A single `pattern -> group` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupRule {
    pattern: String,
    group: String,
    #[serde(skip)]
    pattern_lower: String,
}

impl GroupRule {
    pub fn new(pattern: impl Into<String>, group: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let pattern_lower = pattern.to_lowercase();
        Self {
            pattern,
            group: group.into(),
            pattern_lower,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Case-insensitive substring match against a lowercased path
    fn matches_lower(&self, path_lower: &str) -> bool {
        path_lower.contains(&self.pattern_lower)
    }
}

/// Ordered rule table. Earlier rules win when several match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRules {
    rules: Vec<GroupRule>,
}

impl GroupRules {
    pub fn new(rules: Vec<GroupRule>) -> Self {
        Self { rules }
    }

    /// The admin panel's built-in table
    pub fn hotel_defaults() -> Self {
        Self::new(vec![
            GroupRule::new("listadminhotels+", "Admin"),
            GroupRule::new("admin+", "Admins"),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupRule> {
        self.rules.iter()
    }

    /// First rule whose pattern occurs in `path`, ignoring case
    pub fn first_match(&self, path: &str) -> Option<&GroupRule> {
        let path_lower = path.to_lowercase();
        self.rules.iter().find(|rule| rule.matches_lower(&path_lower))
    }

    /// Decide whether `claims` may access `path`.
    ///
    /// No matching rule allows the request. A matching rule allows it only if
    /// one of the token's groups equals the rule's group, ignoring case; a
    /// token without a group claim is denied.
    pub fn authorize(&self, claims: &Claims, path: &str) -> Decision {
        match self.first_match(path) {
            None => Decision::Allow {
                principal_id: claims.subject.clone(),
                matched_rule: None,
            },
            Some(rule) => {
                let mut decision = require_group(claims, rule.group());
                decision.set_matched_rule(rule.clone());
                decision
            }
        }
    }
}

impl Default for GroupRules {
    fn default() -> Self {
        Self::hotel_defaults()
    }
}

/// Why a request was denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenyReason {
    /// The token carries groups, none of which is the required one
    GroupMismatch {
        required: String,
        presented: Vec<String>,
    },
    /// The token has no group claim at all
    MissingGroupClaim { required: String },
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GroupMismatch { required, presented } => write!(
                f,
                "group '{required}' required, token has [{}]",
                presented.join(", ")
            ),
            Self::MissingGroupClaim { required } => {
                write!(f, "group '{required}' required, token has no group claim")
            }
        }
    }
}

/// Outcome of an authorization check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Decision {
    Allow {
        principal_id: Option<String>,
        matched_rule: Option<GroupRule>,
    },
    Deny {
        principal_id: Option<String>,
        matched_rule: Option<GroupRule>,
        reason: DenyReason,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    pub fn principal_id(&self) -> Option<&str> {
        match self {
            Self::Allow { principal_id, .. } | Self::Deny { principal_id, .. } => {
                principal_id.as_deref()
            }
        }
    }

    pub fn matched_rule(&self) -> Option<&GroupRule> {
        match self {
            Self::Allow { matched_rule, .. } | Self::Deny { matched_rule, .. } => {
                matched_rule.as_ref()
            }
        }
    }

    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Allow { .. } => None,
            Self::Deny { reason, .. } => Some(reason),
        }
    }

    /// Convert a deny into [`crate::AuthError::Forbidden`]
    pub fn into_result(self) -> crate::Result<Self> {
        match self {
            Self::Deny { reason, .. } => Err(crate::AuthError::Forbidden(reason.to_string())),
            allow => Ok(allow),
        }
    }

    fn set_matched_rule(&mut self, rule: GroupRule) {
        match self {
            Self::Allow { matched_rule, .. } | Self::Deny { matched_rule, .. } => {
                *matched_rule = Some(rule);
            }
        }
    }
}

/// Allow only if `claims` carries `group`, ignoring case
pub fn require_group(claims: &Claims, group: &str) -> Decision {
    let principal_id = claims.subject.clone();
    let Some(groups) = claims.groups.as_ref() else {
        return Decision::Deny {
            principal_id,
            matched_rule: None,
            reason: DenyReason::MissingGroupClaim {
                required: group.to_string(),
            },
        };
    };

    if groups.iter().any(|g| g.to_lowercase() == group.to_lowercase()) {
        Decision::Allow {
            principal_id,
            matched_rule: None,
        }
    } else {
        Decision::Deny {
            principal_id,
            matched_rule: None,
            reason: DenyReason::GroupMismatch {
                required: group.to_string(),
                presented: groups.iter().cloned().collect(),
            },
        }
    }
}
