//! Employee and store search.

use prod_report_analytics_models::SearchCriteria;
use prod_report_production_models::TypedRecord;

/// Lowercased search terms, prepared once per search.
struct Matcher {
    employees: Vec<String>,
    stores: Vec<String>,
}

impl Matcher {
    fn new(criteria: &SearchCriteria) -> Self {
        let lower = |terms: &[String]| -> Vec<String> {
            terms.iter().map(|t| t.to_lowercase()).collect()
        };
        Self {
            employees: lower(&criteria.employees),
            stores: lower(&criteria.stores),
        }
    }

    fn matches(&self, record: &TypedRecord) -> bool {
        contains_any(&record.owner, &self.employees) && contains_any(&record.location, &self.stores)
    }
}

/// An empty term list matches everything.
fn contains_any(haystack: &str, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = haystack.to_lowercase();
    terms.iter().any(|t| haystack.contains(t.as_str()))
}

/// Returns `true` if the record's owner contains any employee term and its
/// location contains any store term (case-insensitive).
///
/// Account groups must already be expanded with
/// [`SearchCriteria::expand_stores`].
#[must_use]
pub fn matches(criteria: &SearchCriteria, record: &TypedRecord) -> bool {
    Matcher::new(criteria).matches(record)
}

/// Keeps the records matching `criteria`, in order.
#[must_use]
pub fn filter_records(records: Vec<TypedRecord>, criteria: &SearchCriteria) -> Vec<TypedRecord> {
    let matcher = Matcher::new(criteria);
    let before = records.len();
    let kept: Vec<TypedRecord> = records.into_iter().filter(|r| matcher.matches(r)).collect();
    log::info!(
        "Search matched {} of {before} records (employees: {}, stores: {})",
        kept.len(),
        describe(&criteria.employees),
        describe(&criteria.stores),
    );
    kept
}

fn describe(terms: &[String]) -> String {
    if terms.is_empty() {
        "All".to_owned()
    } else {
        terms.join(", ")
    }
}
