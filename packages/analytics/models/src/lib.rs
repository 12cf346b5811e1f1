#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grouping, search, and summary types for production report analytics.
//!
//! Defines the inputs (grouping key, ordering, search criteria) and outputs
//! (per-group and grand summaries) of the aggregation stage. Summaries
//! serialize as `camelCase` JSON for machine-readable output.

use std::collections::BTreeMap;

use prod_report_production_models::{Metric, Metrics, TypedRecord};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Account group name → store-name substrings it expands to.
///
/// Keys are matched case-insensitively (they are stored lowercase).
pub type AccountGroups = BTreeMap<String, Vec<String>>;

/// The record field summaries are grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Group by the owning employee.
    #[strum(serialize = "Employee")]
    Owner,
    /// Group by the store / location label.
    #[strum(serialize = "Store")]
    Location,
}

impl GroupBy {
    /// Returns the grouping key of a record.
    #[must_use]
    pub fn key_of(self, record: &TypedRecord) -> &str {
        match self {
            Self::Owner => &record.owner,
            Self::Location => &record.location,
        }
    }

    /// The field shown alongside the key in per-group detail tables.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Owner => Self::Location,
            Self::Location => Self::Owner,
        }
    }
}

/// Ordering of group summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Group key, ascending.
    #[default]
    KeyAscending,
    /// One metric's average, highest first. Groups without data sort last.
    MetricDescending(Metric),
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeyAscending => f.write_str("alphabetical"),
            Self::MetricDescending(metric) => write!(f, "{metric} (highest first)"),
        }
    }
}

/// Averages for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// The owner or location this group represents.
    pub group_key: String,
    /// Mean of the positive readings of each metric; `None` means no data.
    pub averages: Metrics,
    /// Number of records in the group, including zero readings.
    pub member_count: usize,
}

/// Averages across all groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandSummary {
    /// Mean of the per-group averages of each metric.
    pub averages: Metrics,
    /// Number of groups.
    pub group_count: usize,
    /// Number of records across all groups.
    pub member_count: usize,
}

/// The full output of an aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    /// What the groups are keyed by.
    pub group_by: GroupBy,
    /// How `groups` is ordered.
    pub order: SortOrder,
    /// Per-group summaries, in `order`.
    pub groups: Vec<GroupSummary>,
    /// Averages across groups.
    pub grand: GrandSummary,
}

impl AggregateReport {
    /// Returns `true` when no records were aggregated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Employee and store filters for a report.
///
/// Terms are matched as case-insensitive substrings; an empty list matches
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Employee-name substrings.
    #[serde(default)]
    pub employees: Vec<String>,
    /// Store-name substrings or account group names.
    #[serde(default)]
    pub stores: Vec<String>,
}

impl SearchCriteria {
    /// Builds criteria from comma-separated employee and store lists,
    /// dropping blank terms.
    #[must_use]
    pub fn from_lists(employees: &str, stores: &str) -> Self {
        Self {
            employees: split_terms(employees),
            stores: split_terms(stores),
        }
    }

    /// Replaces every store term that names an account group with the
    /// group's members.
    #[must_use]
    pub fn expand_stores(mut self, groups: &AccountGroups) -> Self {
        self.stores = self
            .stores
            .into_iter()
            .flat_map(|term| {
                groups
                    .get(&term.to_lowercase())
                    .map_or_else(|| vec![term], Clone::clone)
            })
            .collect();
        self
    }

    /// Store grouping when specific employees are requested (to compare
    /// their stores), employee grouping otherwise.
    #[must_use]
    pub const fn default_group_by(&self) -> GroupBy {
        if self.employees.is_empty() {
            GroupBy::Owner
        } else {
            GroupBy::Location
        }
    }

    /// File-name stem describing the search, e.g. `Jane_Doe_pick_metro` or
    /// `All_All`.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let part = |terms: &[String]| {
            if terms.is_empty() {
                "All".to_owned()
            } else {
                terms.join("_").replace(' ', "_")
            }
        };
        format!("{}_{}", part(&self.employees), part(&self.stores))
    }
}

fn split_terms(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> AccountGroups {
        let mut groups = AccountGroups::new();
        groups.insert(
            "kroger".to_owned(),
            vec!["pick".to_owned(), "mariano".to_owned(), "metro".to_owned()],
        );
        groups
    }

    #[test]
    fn splits_comma_lists() {
        let criteria = SearchCriteria::from_lists(" Jane Doe, ,Bob ", "");
        assert_eq!(criteria.employees, vec!["Jane Doe", "Bob"]);
        assert!(criteria.stores.is_empty());
    }

    #[test]
    fn expands_account_groups_case_insensitively() {
        let criteria = SearchCriteria::from_lists("", "Kroger, Festival").expand_stores(&groups());
        assert_eq!(criteria.stores, vec!["pick", "mariano", "metro", "Festival"]);
    }

    #[test]
    fn default_grouping_follows_employee_terms() {
        assert_eq!(SearchCriteria::default().default_group_by(), GroupBy::Owner);
        assert_eq!(
            SearchCriteria::from_lists("Jane", "").default_group_by(),
            GroupBy::Location
        );
    }

    #[test]
    fn file_stem_uses_all_for_empty_lists() {
        assert_eq!(SearchCriteria::default().file_stem(), "All_All");
        assert_eq!(
            SearchCriteria::from_lists("Jane Doe,Bob", "pick").file_stem(),
            "Jane_Doe_Bob_pick"
        );
    }

    #[test]
    fn group_by_captions() {
        assert_eq!(GroupBy::Owner.to_string(), "Employee");
        assert_eq!(GroupBy::Location.counterpart(), GroupBy::Owner);
        assert_eq!("Store".parse::<GroupBy>(), Ok(GroupBy::Location));
        assert_eq!(
            "Owner".parse::<GroupBy>(),
            Err(strum::ParseError::VariantNotFound)
        );
    }

    #[test]
    fn summaries_serialize_camel_case() {
        let summary = GroupSummary {
            group_key: "Jane".to_owned(),
            averages: Metrics {
                pieces: Some(110.0),
                dollars: None,
                skus: None,
            },
            member_count: 2,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["groupKey"], "Jane");
        assert_eq!(json["memberCount"], 2);
        assert_eq!(json["averages"]["pieces"], 110.0);
        assert!(json["averages"]["dollars"].is_null());
    }
}
