use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use taskgate_core::{AppError, AppResult};
use taskgate_domain::PermissionType;

const DEFAULT_OFFSET: i64 = 0;
const DEFAULT_LIMIT: i64 = 25;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStoreConfig {
    Memory { fixture_path: Option<PathBuf> },
    Postgres { database_url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchView {
    Tasks,
    Summaries,
}

impl FromStr for SearchView {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tasks" => Ok(Self::Tasks),
            "summaries" => Ok(Self::Summaries),
            other => Err(AppError::Validation(format!(
                "SEARCH_VIEW must be either 'tasks' or 'summaries', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub store: TaskStoreConfig,
    pub search_request_path: PathBuf,
    pub role_assignments_path: PathBuf,
    pub offset: i64,
    pub limit: i64,
    pub permissions: Vec<PermissionType>,
    pub view: SearchView,
}

impl SearchConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let optional = |name: &str| optional_value(&lookup, name);
        let required = |name: &str| required_value(&lookup, name);

        let store = match optional("TASK_STORE")
            .unwrap_or_else(|| "memory".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => TaskStoreConfig::Memory {
                fixture_path: optional("TASK_FIXTURE_PATH").map(PathBuf::from),
            },
            "postgres" => TaskStoreConfig::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "TASK_STORE must be either 'memory' or 'postgres', got '{other}'"
                )));
            }
        };

        let offset = optional("SEARCH_OFFSET")
            .map(|value| parse_integer("SEARCH_OFFSET", value.as_str()))
            .transpose()?
            .unwrap_or(DEFAULT_OFFSET);
        let limit = optional("SEARCH_LIMIT")
            .map(|value| parse_integer("SEARCH_LIMIT", value.as_str()))
            .transpose()?
            .unwrap_or(DEFAULT_LIMIT);

        let permissions = match optional("SEARCH_PERMISSIONS") {
            Some(value) => parse_permissions(value.as_str())?,
            None => vec![PermissionType::Read],
        };

        let view = optional("SEARCH_VIEW")
            .map(|value| SearchView::from_str(value.as_str()))
            .transpose()?
            .unwrap_or(SearchView::Tasks);

        Ok(Self {
            store,
            search_request_path: PathBuf::from(required("SEARCH_REQUEST_PATH")?),
            role_assignments_path: PathBuf::from(required("ROLE_ASSIGNMENTS_PATH")?),
            offset,
            limit,
            permissions,
            view,
        })
    }
}

pub fn required_env(name: &str) -> AppResult<String> {
    required_value(&|name: &str| env::var(name).ok(), name)
}

fn optional_value(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_value(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    optional_value(lookup, name)
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}

fn parse_integer(name: &str, value: &str) -> AppResult<i64> {
    value
        .parse::<i64>()
        .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
}

fn parse_permissions(value: &str) -> AppResult<Vec<PermissionType>> {
    let permissions = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PermissionType::from_str)
        .collect::<AppResult<Vec<_>>>()?;

    if permissions.is_empty() {
        return Err(AppError::Validation(
            "SEARCH_PERMISSIONS must name at least one permission".to_owned(),
        ));
    }

    Ok(permissions)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use taskgate_core::AppError;
    use taskgate_domain::PermissionType;

    use super::{SearchConfig, SearchView, TaskStoreConfig, required_value};

    fn load(pairs: &[(&str, &str)]) -> Result<SearchConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        SearchConfig::from_lookup(|name| values.get(name).cloned())
    }

    const INPUTS: [(&str, &str); 2] = [
        ("SEARCH_REQUEST_PATH", "demos/search_request.json"),
        ("ROLE_ASSIGNMENTS_PATH", "demos/role_assignments.json"),
    ];

    #[test]
    fn defaults_apply_when_only_inputs_are_set() {
        let Ok(config) = load(&INPUTS) else {
            panic!("config should load");
        };

        assert_eq!(config.store, TaskStoreConfig::Memory { fixture_path: None });
        assert_eq!(config.offset, 0);
        assert_eq!(config.limit, 25);
        assert_eq!(config.permissions, vec![PermissionType::Read]);
        assert_eq!(config.view, SearchView::Tasks);
        assert_eq!(
            config.search_request_path,
            PathBuf::from("demos/search_request.json")
        );
    }

    #[test]
    fn postgres_store_requires_database_url() {
        let mut pairs = INPUTS.to_vec();
        pairs.push(("TASK_STORE", "postgres"));

        assert!(matches!(load(&pairs), Err(AppError::Validation(_))));

        pairs.push(("DATABASE_URL", "postgres://localhost/taskgate"));
        assert!(matches!(
            load(&pairs),
            Ok(SearchConfig {
                store: TaskStoreConfig::Postgres { .. },
                ..
            })
        ));
    }

    #[test]
    fn permissions_and_view_are_parsed() {
        let mut pairs = INPUTS.to_vec();
        pairs.push(("SEARCH_PERMISSIONS", "own, EXECUTE"));
        pairs.push(("SEARCH_VIEW", "Summaries"));

        let Ok(config) = load(&pairs) else {
            panic!("config should load");
        };
        assert_eq!(
            config.permissions,
            vec![PermissionType::Own, PermissionType::Execute]
        );
        assert_eq!(config.view, SearchView::Summaries);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (name, value) in [
            ("SEARCH_LIMIT", "ten"),
            ("SEARCH_VIEW", "table"),
            ("SEARCH_PERMISSIONS", "read,approve"),
            ("SEARCH_PERMISSIONS", " , "),
            ("TASK_STORE", "redis"),
        ] {
            let mut pairs = INPUTS.to_vec();
            pairs.push((name, value));
            assert!(
                matches!(load(&pairs), Err(AppError::Validation(_))),
                "{name}={value} should be rejected"
            );
        }
    }

    #[test]
    fn blank_database_url_is_rejected() {
        let mut pairs = INPUTS.to_vec();
        pairs.push(("TASK_STORE", "postgres"));
        pairs.push(("DATABASE_URL", "   "));
        assert!(matches!(load(&pairs), Err(AppError::Validation(_))));

        let blank = |_: &str| Some(" ".to_owned());
        assert!(matches!(
            required_value(&blank, "DATABASE_URL"),
            Err(AppError::Validation(message)) if message == "DATABASE_URL is required"
        ));

        let padded = |_: &str| Some(" postgres://localhost/taskgate ".to_owned());
        assert!(matches!(
            required_value(&padded, "DATABASE_URL").as_deref(),
            Ok("postgres://localhost/taskgate")
        ));
    }

    #[test]
    fn missing_inputs_are_rejected() {
        assert!(matches!(load(&[]), Err(AppError::Validation(_))));
    }
}
