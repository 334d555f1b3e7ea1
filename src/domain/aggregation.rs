// Aggregator - groups records and reduces them into additive buckets
use super::asset::AssetRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    Category,
    Year,
    CategoryAndYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregationKey {
    Category(String),
    Year(i32),
    CategoryAndYear(String, i32),
}

impl AggregationKey {
    fn for_record(record: &AssetRecord, group_by: GroupBy) -> Self {
        match group_by {
            GroupBy::Category => Self::Category(record.business_category.clone()),
            GroupBy::Year => Self::Year(record.year),
            GroupBy::CategoryAndYear => {
                Self::CategoryAndYear(record.business_category.clone(), record.year)
            }
        }
    }

    pub fn business_category(&self) -> Option<&str> {
        match self {
            Self::Category(category) | Self::CategoryAndYear(category, _) => Some(category),
            Self::Year(_) => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Year(year) | Self::CategoryAndYear(_, year) => Some(*year),
            Self::Category(_) => None,
        }
    }
}

/// Pure additive accumulator. `count` is always >= 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationBucket {
    pub key: AggregationKey,
    pub sum_risk_rating: f64,
    pub count: usize,
}

impl AggregationBucket {
    fn open(key: AggregationKey, record: &AssetRecord) -> Self {
        Self {
            key,
            sum_risk_rating: record.risk_rating,
            count: 1,
        }
    }

    fn absorb(&mut self, record: &AssetRecord) {
        self.sum_risk_rating += record.risk_rating;
        self.count += 1;
    }

    pub fn business_category(&self) -> Option<&str> {
        self.key.business_category()
    }

    pub fn year(&self) -> Option<i32> {
        self.key.year()
    }
}

/// Group records by the requested dimension. Buckets come back in the order their
/// key was first seen; sums accumulate in input order.
pub fn aggregate<'a, I>(records: I, group_by: GroupBy) -> Vec<AggregationBucket>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let mut index: HashMap<AggregationKey, usize> = HashMap::new();
    let mut buckets: Vec<AggregationBucket> = Vec::new();

    for record in records {
        let key = AggregationKey::for_record(record, group_by);
        match index.get(&key) {
            Some(&slot) => buckets[slot].absorb(record),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push(AggregationBucket::open(key, record));
            }
        }
    }

    buckets
}

/// Combine bucket lists produced from disjoint record sets, summing matching keys.
/// Keys keep first-seen order across `left` then `right`.
pub fn merge_buckets(
    left: Vec<AggregationBucket>,
    right: Vec<AggregationBucket>,
) -> Vec<AggregationBucket> {
    let mut index: HashMap<AggregationKey, usize> = HashMap::new();
    let mut merged: Vec<AggregationBucket> = Vec::with_capacity(left.len() + right.len());

    for bucket in left.into_iter().chain(right) {
        match index.get(&bucket.key) {
            Some(&slot) => {
                merged[slot].sum_risk_rating += bucket.sum_risk_rating;
                merged[slot].count += bucket.count;
            }
            None => {
                index.insert(bucket.key.clone(), merged.len());
                merged.push(bucket);
            }
        }
    }

    merged
}
