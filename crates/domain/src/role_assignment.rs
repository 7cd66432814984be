use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskgate_core::AppError;

/// Scope in which a role assignment was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    /// Organisational role, such as a caseworker or judge.
    Organisation,
    /// Role granted on a specific case.
    Case,
}

/// Security classification shared by roles and tasks.
///
/// Levels are ordered by restrictiveness: a higher level may see every lower
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Visible to any role.
    Public,
    /// Visible to PRIVATE and RESTRICTED roles.
    Private,
    /// Visible to RESTRICTED roles only.
    Restricted,
}

impl Classification {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::Restricted => "RESTRICTED",
        }
    }

    /// Returns the task classifications a role at this level may see.
    #[must_use]
    pub fn visible_classifications(&self) -> &'static [Self] {
        match self {
            Self::Restricted => &[Self::Restricted, Self::Private, Self::Public],
            Self::Private => &[Self::Private, Self::Public],
            Self::Public => &[Self::Public],
        }
    }

    /// Parses a role classification, falling back to PUBLIC for unknown values.
    #[must_use]
    pub fn from_role_value(value: &str) -> Self {
        Self::from_str(value.trim()).unwrap_or(Self::Public)
    }
}

impl FromStr for Classification {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PUBLIC" => Ok(Self::Public),
            "PRIVATE" => Ok(Self::Private),
            "RESTRICTED" => Ok(Self::Restricted),
            _ => Err(AppError::Validation(format!(
                "unknown classification '{value}'"
            ))),
        }
    }
}

/// How the scope of a role assignment is matched against tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrantType {
    /// Baseline access with no scoped authorisations.
    Basic,
    /// Access granted on one specific case.
    Specific,
    /// Standard organisational access.
    Standard,
    /// Access gated by the role's authorisation list.
    Challenged,
    /// Exclusion grant.
    Excluded,
}

impl GrantType {
    /// Returns the compiler family this grant type belongs to.
    #[must_use]
    pub fn family(&self) -> GrantTypeFamily {
        match self {
            Self::Basic | Self::Specific => GrantTypeFamily::BasicOrSpecific,
            Self::Standard | Self::Challenged => GrantTypeFamily::StandardOrChallenged,
            Self::Excluded => GrantTypeFamily::Excluded,
        }
    }
}

/// Grant types that share one predicate builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrantTypeFamily {
    /// BASIC and SPECIFIC grants.
    BasicOrSpecific,
    /// STANDARD and CHALLENGED grants.
    StandardOrChallenged,
    /// EXCLUDED grants.
    Excluded,
}

impl GrantTypeFamily {
    /// Returns all families in compilation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::BasicOrSpecific,
            Self::StandardOrChallenged,
            Self::Excluded,
        ]
    }
}

/// Known keys of the role assignment attribute map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleAttributeKey {
    /// Jurisdiction the role is limited to.
    Jurisdiction,
    /// Case the role is limited to.
    CaseId,
    /// Case type the role is limited to.
    CaseType,
    /// Region the role is limited to.
    Region,
    /// Base location the role is limited to.
    BaseLocation,
}

impl RoleAttributeKey {
    /// Returns the attribute map key.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jurisdiction => "jurisdiction",
            Self::CaseId => "caseId",
            Self::CaseType => "caseType",
            Self::Region => "region",
            Self::BaseLocation => "baseLocation",
        }
    }
}

/// A resolved, time-bounded role assignment for the calling actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignment {
    /// Actor the role is assigned to.
    pub actor_id: String,
    /// Scope the role was granted in.
    pub role_type: RoleType,
    /// Role name matched against task role rows.
    pub role_name: String,
    /// Highest task classification this role may see.
    #[serde(
        default = "default_role_classification",
        deserialize_with = "deserialize_role_classification"
    )]
    pub classification: Classification,
    /// Grant type deciding the matching rules.
    pub grant_type: GrantType,
    /// Optional role category, such as `LEGAL_OPERATIONS`.
    #[serde(default)]
    pub role_category: Option<String>,
    /// Optional scoped authorisations.
    #[serde(default)]
    pub authorisations: Option<BTreeSet<String>>,
    /// Attribute constraints keyed by [`RoleAttributeKey`] names.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Optional start of validity.
    #[serde(default)]
    pub begin_time: Option<DateTime<Utc>>,
    /// Optional end of validity.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl RoleAssignment {
    /// Creates an unbounded role assignment with no attributes.
    #[must_use]
    pub fn new(
        actor_id: impl Into<String>,
        role_name: impl Into<String>,
        role_type: RoleType,
        grant_type: GrantType,
        classification: Classification,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            role_type,
            role_name: role_name.into(),
            classification,
            grant_type,
            role_category: None,
            authorisations: None,
            attributes: BTreeMap::new(),
            begin_time: None,
            end_time: None,
        }
    }

    /// Returns a copy with one attribute set.
    #[must_use]
    pub fn with_attribute(mut self, key: RoleAttributeKey, value: impl Into<String>) -> Self {
        self.attributes.insert(key.as_str().to_owned(), value.into());
        self
    }

    /// Returns a copy with the given authorisations.
    #[must_use]
    pub fn with_authorisations<I, S>(mut self, authorisations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorisations = Some(authorisations.into_iter().map(Into::into).collect());
        self
    }

    /// Returns a copy with the given validity window.
    #[must_use]
    pub fn with_validity(
        mut self,
        begin_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.begin_time = begin_time;
        self.end_time = end_time;
        self
    }

    /// Returns a non-blank attribute value.
    #[must_use]
    pub fn attribute(&self, key: RoleAttributeKey) -> Option<&str> {
        self.attributes
            .get(key.as_str())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Returns the non-blank authorisations held by this role.
    #[must_use]
    pub fn scoped_authorisations(&self) -> Vec<String> {
        self.authorisations
            .iter()
            .flatten()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

fn default_role_classification() -> Classification {
    Classification::Public
}

fn deserialize_role_classification<'de, D>(deserializer: D) -> Result<Classification, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .map(Classification::from_role_value)
        .unwrap_or_else(default_role_classification))
}
