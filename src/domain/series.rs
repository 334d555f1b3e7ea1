// Series builder - label/value series ready for chart widgets
use super::aggregation::AggregationBucket;
use super::asset::AssetRecord;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Index-aligned labels and values. Labels are unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<L> {
    labels: Vec<L>,
    values: Vec<f64>,
}

impl<L> Series<L> {
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<L: Clone + Eq + Hash> Series<L> {
    /// Build from label/value pairs. A repeated label keeps its first value.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, f64)>,
    {
        let mut seen = HashSet::new();
        let mut series = Self::empty();
        for (label, value) in pairs {
            if seen.insert(label.clone()) {
                series.labels.push(label);
                series.values.push(value);
            }
        }
        series
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelOrder {
    #[default]
    FirstSeen,
    Sorted,
}

#[derive(Default)]
struct Tally {
    sum: f64,
    count: usize,
}

impl Tally {
    fn add(&mut self, bucket: &AggregationBucket) {
        self.sum += bucket.sum_risk_rating;
        self.count += bucket.count;
    }

    fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Average risk rating per category over category x year buckets, optionally
/// narrowed to one year and/or one category. Sums and counts are recombined
/// before dividing. Buckets without a category are ignored.
pub fn by_category_average(
    buckets: &[AggregationBucket],
    year: Option<i32>,
    category: Option<&str>,
    order: LabelOrder,
) -> Series<String> {
    let mut labels: Vec<&str> = Vec::new();
    let mut tallies: BTreeMap<&str, Tally> = BTreeMap::new();

    for bucket in buckets {
        let Some(bucket_category) = bucket.business_category() else {
            continue;
        };
        if year.is_some_and(|year| bucket.year() != Some(year)) {
            continue;
        }
        if category.is_some_and(|category| bucket_category != category) {
            continue;
        }

        let tally = tallies.entry(bucket_category).or_insert_with(|| {
            labels.push(bucket_category);
            Tally::default()
        });
        tally.add(bucket);
    }

    if order == LabelOrder::Sorted {
        labels.sort_unstable();
    }

    Series::from_pairs(labels.into_iter().filter_map(|label| {
        tallies
            .get(label)
            .and_then(Tally::average)
            .map(|average| (label.to_string(), average))
    }))
}

/// Average risk rating per year, ascending. Buckets without a year are ignored.
pub fn average_by_year(buckets: &[AggregationBucket]) -> Series<i32> {
    let mut tallies: BTreeMap<i32, Tally> = BTreeMap::new();
    for bucket in buckets {
        if let Some(year) = bucket.year() {
            tallies.entry(year).or_default().add(bucket);
        }
    }

    Series::from_pairs(
        tallies
            .into_iter()
            .filter_map(|(year, tally)| tally.average().map(|average| (year, average))),
    )
}

/// Record count per category, categories sorted lexicographically.
pub fn count_by_category<'a, I>(records: I) -> Series<String>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.business_category.as_str()).or_default() += 1;
    }

    Series::from_pairs(
        counts
            .into_iter()
            .map(|(category, count)| (category.to_string(), count as f64)),
    )
}

/// Number of risk-factor entries per year (not a sum of severities), years ascending.
pub fn risk_factor_total_by_year<'a, I>(records: I) -> Series<i32>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let mut totals: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records {
        *totals.entry(record.year).or_default() += record.risk_factor_count();
    }

    Series::from_pairs(
        totals
            .into_iter()
            .map(|(year, total)| (year, total as f64)),
    )
}
