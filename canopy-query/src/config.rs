//! Configuration file parsing for `canopy.toml`.
//!
//! ```toml
//! [pagination]
//! default_page_limit = 20
//! page_variable = "size"
//! named_sizes = { small = 5, large = 50 }
//!
//! [sorting]
//! default_choice = "a-z"
//! mode = "query"
//!
//! [filters]
//! mode = "nested"
//! allow_user_input = true
//!
//! [attribute_filters.handlers]
//! ezprice = "int"
//!
//! [scope]
//! parent_node_id = ${CANOPY_ROOT_NODE}
//! ```
//!
//! `${VAR}` references are replaced with environment variables before
//! parsing; unknown variables are left as they are.

use std::path::Path;

use indexmap::IndexMap;
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::content::DEFAULT_PARENT_NODE_ID;
use crate::error::{QueryError, QueryResult};
use crate::field_filter::{FilterKind, FilterMode, FilterType};
use crate::pagination::PageParams;
use crate::sort::SortMode;
use crate::store::{DepthOperator, QueryScope};
use crate::traits::{AttributeFilterMapper, ClassAttribute, PageSizeProvider, QueryServices};

/// Conventional file name.
pub const CONFIG_FILE_NAME: &str = "canopy.toml";

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_LIMIT: u64 = 10;

/// Main configuration structure for `canopy.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CanopyConfig {
    /// Page sizes.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Sort choice selection.
    #[serde(default)]
    pub sorting: SortingConfig,

    /// Filter emission.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Attribute type to filter kind mapping.
    #[serde(default)]
    pub attribute_filters: AttributeFiltersConfig,

    /// Default tree scope.
    #[serde(default)]
    pub scope: ScopeConfig,
}

impl CanopyConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> QueryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            QueryError::configuration(format!("Failed to read {}: {}", path.display(), e))
                .with_source(e)
        })?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// Symbolic values (modes, operators, filter kinds) are validated here
    /// so a bad file fails at load time.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> QueryResult<Self> {
        let expanded = expand_env_vars(content);
        let config: Self = toml::from_str(&expanded).map_err(|e| {
            QueryError::configuration(format!("Invalid {}: {}", CONFIG_FILE_NAME, e.message()))
                .with_source(e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check every symbolic value.
    pub fn validate(&self) -> QueryResult<()> {
        self.sorting.sort_mode()?;
        self.filters.filter_mode()?;
        self.scope.depth_operator()?;
        self.attribute_filters.mapper()?;
        Ok(())
    }

    /// Services with the configured attribute mapper installed.
    pub fn services(&self) -> QueryResult<QueryServices> {
        let mapper = self.attribute_filters.mapper()?;
        Ok(QueryServices::default().with_attribute_mapper(std::sync::Arc::new(mapper)))
    }
}

/// `[pagination]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaginationConfig {
    /// Page size when neither an explicit limit nor a settings key applies.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: u64,

    /// Settings key consulted through the page size provider.
    #[serde(default)]
    pub limit_setting: Option<String>,

    /// Query parameter naming one of `named_sizes`.
    #[serde(default)]
    pub page_variable: Option<String>,

    /// Page sizes by name.
    #[serde(default)]
    pub named_sizes: IndexMap<String, u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_limit: DEFAULT_PAGE_LIMIT,
            limit_setting: None,
            page_variable: None,
            named_sizes: IndexMap::new(),
        }
    }
}

impl PaginationConfig {
    /// Paginator parameters, when a page variable is configured.
    pub fn page_params(&self) -> Option<PageParams> {
        let variable = self.page_variable.as_ref()?;
        Some(PageParams {
            page_variable: Some(variable.clone()),
            named_sizes: self.named_sizes.clone(),
        })
    }
}

fn default_page_limit() -> u64 {
    DEFAULT_PAGE_LIMIT
}

/// `[sorting]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SortingConfig {
    /// Choice used when no token decodes.
    #[serde(default = "default_sort_choice")]
    pub default_choice: String,

    /// Query parameter read in `query` mode.
    #[serde(default = "default_sort_query_name")]
    pub query_name: String,

    /// `property` or `query`.
    #[serde(default = "default_sort_mode")]
    pub mode: String,

    /// Restrict the choice table to these names.
    #[serde(default)]
    pub choice_names: Option<Vec<String>>,
}

impl Default for SortingConfig {
    fn default() -> Self {
        Self {
            default_choice: default_sort_choice(),
            query_name: default_sort_query_name(),
            mode: default_sort_mode(),
            choice_names: None,
        }
    }
}

impl SortingConfig {
    /// Parsed sort mode.
    pub fn sort_mode(&self) -> QueryResult<SortMode> {
        self.mode.parse()
    }
}

fn default_sort_choice() -> String {
    "newest".to_string()
}

fn default_sort_query_name() -> String {
    "sort".to_string()
}

fn default_sort_mode() -> String {
    SortMode::Property.as_str().to_string()
}

/// `[filters]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    /// `attribute` or `nested`.
    #[serde(default = "default_filter_mode")]
    pub mode: String,

    /// Resolve filter selections from query parameters.
    #[serde(default)]
    pub allow_user_input: bool,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            mode: default_filter_mode(),
            allow_user_input: false,
        }
    }
}

impl FiltersConfig {
    /// Parsed filter mode.
    pub fn filter_mode(&self) -> QueryResult<FilterMode> {
        self.mode.parse()
    }
}

fn default_filter_mode() -> String {
    FilterMode::Attribute.as_str().to_string()
}

/// `[attribute_filters]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeFiltersConfig {
    /// Attribute data type to filter kind (`int`, `bool`, `string`).
    #[serde(default)]
    pub handlers: IndexMap<String, String>,
}

impl AttributeFiltersConfig {
    /// Mapper for the configured handlers.
    pub fn mapper(&self) -> QueryResult<ConfiguredAttributeMapper> {
        let handlers = self
            .handlers
            .iter()
            .map(|(data_type, kind)| {
                kind.parse::<FilterKind>()
                    .map(|kind| (data_type.clone(), kind))
                    .map_err(|e| e.with_field(format!("attribute_filters.handlers.{}", data_type)))
            })
            .collect::<QueryResult<IndexMap<_, _>>>()?;
        Ok(ConfiguredAttributeMapper { handlers })
    }
}

/// `[scope]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Root of the searched sub-tree.
    #[serde(default = "default_parent_node_id")]
    pub parent_node_id: u64,

    /// Depth limit.
    #[serde(default)]
    pub depth: Option<u32>,

    /// Depth comparison.
    #[serde(default = "default_depth_operator")]
    pub depth_operator: String,

    /// Skip default visibility rules.
    #[serde(default)]
    pub ignore_visibility: bool,

    /// Only main node placements.
    #[serde(default)]
    pub main_node_only: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            parent_node_id: DEFAULT_PARENT_NODE_ID,
            depth: None,
            depth_operator: default_depth_operator(),
            ignore_visibility: false,
            main_node_only: false,
        }
    }
}

impl ScopeConfig {
    /// Parsed depth operator.
    pub fn depth_operator(&self) -> QueryResult<DepthOperator> {
        self.depth_operator.parse()
    }

    /// Query scope for these settings.
    pub fn query_scope(&self) -> QueryResult<QueryScope> {
        Ok(QueryScope {
            parent_node_id: self.parent_node_id,
            depth: self.depth,
            depth_operator: self.depth_operator()?,
            ignore_visibility: self.ignore_visibility,
            main_node_only: self.main_node_only,
            ..Default::default()
        })
    }
}

fn default_parent_node_id() -> u64 {
    DEFAULT_PARENT_NODE_ID
}

fn default_depth_operator() -> String {
    DepthOperator::default().as_str().to_string()
}

/// Attribute mapper backed by `[attribute_filters.handlers]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfiguredAttributeMapper {
    handlers: IndexMap<String, FilterKind>,
}

impl ConfiguredAttributeMapper {
    /// Map a data type to a filter kind.
    pub fn with_handler(mut self, data_type: impl Into<String>, kind: FilterKind) -> Self {
        self.handlers.insert(data_type.into(), kind);
        self
    }
}

impl AttributeFilterMapper for ConfiguredAttributeMapper {
    fn filter_for(&self, _class_identifier: &str, attribute: &ClassAttribute) -> Option<FilterType> {
        self.handlers
            .get(&attribute.data_type)
            .map(|kind| FilterType::from(*kind))
    }
}

/// Page sizes by settings key, for callers that load settings themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPageSize {
    sizes: IndexMap<String, u64>,
}

impl SettingsPageSize {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size for a key.
    pub fn with(mut self, key: impl Into<String>, size: u64) -> Self {
        self.sizes.insert(key.into(), size);
        self
    }
}

impl PageSizeProvider for SettingsPageSize {
    fn page_size(&self, key: &str) -> Option<u64> {
        self.sizes.get(key).copied()
    }
}

/// Expand environment variables in the format `${VAR_NAME}`.
fn expand_env_vars(content: &str) -> String {
    let Ok(pattern) = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}") else {
        return content.to_string();
    };
    pattern
        .replace_all(content, |caps: &Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = CanopyConfig::default();
        assert_eq!(config.pagination.default_page_limit, 10);
        assert_eq!(config.sorting.default_choice, "newest");
        assert_eq!(config.sorting.query_name, "sort");
        assert_eq!(config.scope.parent_node_id, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [pagination]
            default_page_limit = 20
            limit_setting = "ListLimit"
            page_variable = "size"
            named_sizes = { small = 5, large = 50 }

            [sorting]
            default_choice = "a-z"
            mode = "query"
            choice_names = ["a-z", "z-a"]

            [filters]
            mode = "nested"
            allow_user_input = true

            [attribute_filters.handlers]
            ezprice = "int"

            [scope]
            parent_node_id = 43
            depth = 2
            depth_operator = "eq"
            main_node_only = true
        "#;
        let config = CanopyConfig::from_str(toml).unwrap();
        assert_eq!(config.pagination.default_page_limit, 20);
        assert_eq!(config.sorting.sort_mode().unwrap(), SortMode::Query);
        assert_eq!(config.filters.filter_mode().unwrap(), FilterMode::Nested);

        let params = config.pagination.page_params().unwrap();
        assert_eq!(params.named_sizes.get("large"), Some(&50));

        let scope = config.scope.query_scope().unwrap();
        assert_eq!(scope.parent_node_id, 43);
        assert_eq!(scope.depth_operator, DepthOperator::Eq);
        assert!(scope.main_node_only);

        let mapper = config.attribute_filters.mapper().unwrap();
        let price = ClassAttribute::new("price", "ezprice");
        assert!(matches!(mapper.filter_for("product", &price), Some(FilterType::Kind(k)) if k == "int"));
        assert!(mapper.filter_for("product", &ClassAttribute::new("x", "ezstring")).is_none());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = CanopyConfig::from_str("[pagination]\npage_size = 3\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[test]
    fn test_symbolic_values_validated() {
        let err = CanopyConfig::from_str("[sorting]\nmode = \"random\"\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedSortMode);

        let err = CanopyConfig::from_str("[scope]\ndepth_operator = \"~\"\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDepthOperator);

        let err = CanopyConfig::from_str("[attribute_filters.handlers]\nezprice = \"money\"\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::FilterType);
    }

    #[test]
    fn test_env_var_expansion() {
        // SAFETY: the variable name is unique to this test.
        unsafe {
            std::env::set_var("CANOPY_TEST_ROOT_NODE", "61");
        }
        let config = CanopyConfig::from_str("[scope]\nparent_node_id = ${CANOPY_TEST_ROOT_NODE}\n").unwrap();
        assert_eq!(config.scope.parent_node_id, 61);
        assert_eq!(expand_env_vars("x = \"${CANOPY_TEST_UNSET_VAR}\""), "x = \"${CANOPY_TEST_UNSET_VAR}\"");
        unsafe {
            std::env::remove_var("CANOPY_TEST_ROOT_NODE");
        }
    }

    #[test]
    fn test_settings_page_size() {
        let sizes = SettingsPageSize::new().with("ListLimit", 25);
        assert_eq!(sizes.page_size("ListLimit"), Some(25));
        assert_eq!(sizes.page_size("Other"), None);
    }
}
