//! Per-group and grand averages.
//!
//! Only present, positive readings count towards an average: a zero means
//! "not measured this period", so it is left out of both the sum and the
//! count. A group with no positive readings for a metric has no average for
//! it (`None`), never `0.0`.
//!
//! The grand average is a mean of the per-group averages, so every group
//! weighs the same no matter how many records it has.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use prod_report_analytics_models::{
    AggregateReport, GrandSummary, GroupBy, GroupSummary, SortOrder,
};
use prod_report_production_models::{Metric, Metrics, TypedRecord};

/// Running sums for one group.
#[derive(Debug, Default)]
struct Accumulator {
    sums: [f64; 3],
    counts: [usize; 3],
    members: usize,
}

impl Accumulator {
    fn add(&mut self, metrics: &Metrics) {
        self.members += 1;
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            if let Some(value) = metrics.get(metric)
                && value > 0.0
            {
                self.sums[i] += value;
                self.counts[i] += 1;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn averages(&self) -> Metrics {
        let mut averages = Metrics::default();
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            let average = (self.counts[i] > 0).then(|| self.sums[i] / self.counts[i] as f64);
            averages.set(metric, average);
        }
        averages
    }
}

/// Mean of the present values, or `None` if there are none.
#[allow(clippy::cast_precision_loss)]
fn mean_of_present(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Descending by value with missing values last.
fn descending_present_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn sort_groups(groups: &mut [GroupSummary], order: SortOrder) {
    match order {
        SortOrder::KeyAscending => groups.sort_by(|a, b| a.group_key.cmp(&b.group_key)),
        SortOrder::MetricDescending(metric) => groups.sort_by(|a, b| {
            descending_present_first(a.averages.get(metric), b.averages.get(metric))
        }),
    }
}

/// Groups records and computes per-group and grand averages.
///
/// Sorting is stable: groups that compare equal stay in the order they were
/// first seen in `records`.
#[must_use]
pub fn aggregate(records: &[TypedRecord], group_by: GroupBy, order: SortOrder) -> AggregateReport {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut accumulators: Vec<(&str, Accumulator)> = Vec::new();

    for record in records {
        let key = group_by.key_of(record);
        let slot = *index.entry(key).or_insert_with(|| {
            accumulators.push((key, Accumulator::default()));
            accumulators.len() - 1
        });
        accumulators[slot].1.add(&record.metrics);
    }

    let mut groups: Vec<GroupSummary> = accumulators
        .iter()
        .map(|(key, acc)| GroupSummary {
            group_key: (*key).to_owned(),
            averages: acc.averages(),
            member_count: acc.members,
        })
        .collect();

    let mut grand_averages = Metrics::default();
    for metric in Metric::ALL {
        grand_averages.set(
            metric,
            mean_of_present(groups.iter().map(|g| g.averages.get(metric))),
        );
    }
    let grand = GrandSummary {
        averages: grand_averages,
        group_count: groups.len(),
        member_count: records.len(),
    };

    sort_groups(&mut groups, order);

    log::debug!(
        "Aggregated {} records into {} groups by {group_by} ({order})",
        records.len(),
        groups.len()
    );

    AggregateReport {
        group_by,
        order,
        groups,
        grand,
    }
}

/// Ranks employees by average Pieces/Hr, highest first.
#[must_use]
pub fn rank(records: &[TypedRecord]) -> AggregateReport {
    aggregate(
        records,
        GroupBy::Owner,
        SortOrder::MetricDescending(Metric::Pieces),
    )
}
