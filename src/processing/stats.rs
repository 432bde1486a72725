//! Statistics over materialized numeric sequences.
//!
//! These are pure functions over slices; [`crate::dataset::ColumnView`] extracts a column's
//! non-null values and dispatches here. Empty input fails with [`DataError::EmptyData`]
//! rather than returning a sentinel.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{DataError, DataResult};

/// A scalar the statistics functions can work on.
pub trait Numeric: Copy + PartialOrd + Default {
    fn to_f64(self) -> f64;

    /// Hashable identity of the value (used for counting distinct values).
    fn key(self) -> u64;

    /// Addition that reports integer overflow as `None`.
    fn checked_add(self, rhs: Self) -> Option<Self>;
}

impl Numeric for i64 {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        i64::checked_add(self, rhs)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn key(self) -> u64 {
        self as u64
    }
}

impl Numeric for i32 {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        i32::checked_add(self, rhs)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn key(self) -> u64 {
        i64::from(self) as u64
    }
}

impl Numeric for u32 {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        u32::checked_add(self, rhs)
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }

    fn key(self) -> u64 {
        u64::from(self)
    }
}

impl Numeric for f64 {
    fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(self + rhs)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn key(self) -> u64 {
        // -0.0 and 0.0 are the same value.
        if self == 0.0 { 0 } else { self.to_bits() }
    }
}

fn total_order<T: PartialOrd>(a: &T, b: &T) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Sum of all values, seeded with `T::default()`.
///
/// Fails with [`DataError::Overflow`] when an integer sum does not fit in `T`.
pub fn sum<T: Numeric>(data: &[T]) -> DataResult<T> {
    data.iter()
        .try_fold(T::default(), |acc, &v| acc.checked_add(v))
        .ok_or(DataError::Overflow)
}

/// Arithmetic mean.
pub fn mean<T: Numeric>(data: &[T]) -> DataResult<f64> {
    if data.is_empty() {
        return Err(DataError::EmptyData);
    }
    let total: f64 = data.iter().map(|v| v.to_f64()).sum();
    Ok(total / data.len() as f64)
}

/// Lower median: the element at index `(n - 1) / 2` of the sorted data.
///
/// Takes the data by value and partially reorders it (selection, not a full sort).
pub fn median<T: Numeric>(mut data: Vec<T>) -> DataResult<T> {
    if data.is_empty() {
        return Err(DataError::EmptyData);
    }
    let mid = (data.len() - 1) / 2;
    let (_, median, _) = data.select_nth_unstable_by(mid, total_order);
    Ok(*median)
}

/// Most frequent value.
///
/// Ties go to the value that occurs first in `data`. Fails with
/// [`DataError::NoModeExists`] when every value occurs exactly once.
pub fn mode<T: Numeric>(data: &[T]) -> DataResult<T> {
    if data.is_empty() {
        return Err(DataError::EmptyData);
    }

    let mut counts: HashMap<u64, usize> = HashMap::with_capacity(data.len());
    for v in data {
        *counts.entry(v.key()).or_insert(0) += 1;
    }

    let max = counts.values().copied().max().unwrap_or(0);
    if max <= 1 {
        return Err(DataError::NoModeExists);
    }
    data.iter()
        .copied()
        .find(|v| counts.get(&v.key()) == Some(&max))
        .ok_or(DataError::NoModeExists)
}

/// Population standard deviation (divisor `n`).
pub fn standard_deviation<T: Numeric>(data: &[T]) -> DataResult<f64> {
    let mean = mean(data)?;
    let sum_squared_differences: f64 = data
        .iter()
        .map(|v| {
            let d = mean - v.to_f64();
            d * d
        })
        .sum();
    Ok((sum_squared_differences / data.len() as f64).sqrt())
}

pub fn min<T: Numeric>(data: &[T]) -> DataResult<T> {
    data.iter()
        .copied()
        .min_by(total_order)
        .ok_or(DataError::EmptyData)
}

pub fn max<T: Numeric>(data: &[T]) -> DataResult<T> {
    data.iter()
        .copied()
        .max_by(total_order)
        .ok_or(DataError::EmptyData)
}

/// Number of distinct values.
pub fn count_unique<T: Numeric>(data: &[T]) -> usize {
    data.iter().map(|v| v.key()).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_median_mode_of_small_integer_column() {
        let data: Vec<i64> = vec![193, 2982, 193];
        assert!((mean(&data).unwrap() - 1122.666_666_666_666_7).abs() < 1e-9);
        assert_eq!(median(data.clone()).unwrap(), 193);
        assert_eq!(mode(&data).unwrap(), 193);
        assert_eq!(sum(&data).unwrap(), 3368);
    }

    #[test]
    fn median_uses_lower_middle_for_even_counts() {
        assert_eq!(median(vec![4_i64, 1, 3, 2]).unwrap(), 2);
        assert_eq!(median(vec![10.5, 2.5]).unwrap(), 2.5);
        assert_eq!(median(vec![7_i64]).unwrap(), 7);
    }

    #[test]
    fn empty_data_is_an_error() {
        assert!(matches!(median::<f64>(vec![]), Err(DataError::EmptyData)));
        assert!(matches!(mean::<f64>(&[]), Err(DataError::EmptyData)));
        assert!(matches!(mode::<f64>(&[]), Err(DataError::EmptyData)));
        assert!(matches!(standard_deviation::<f64>(&[]), Err(DataError::EmptyData)));
        assert!(matches!(min::<i64>(&[]), Err(DataError::EmptyData)));
        assert!(matches!(max::<i64>(&[]), Err(DataError::EmptyData)));
        assert_eq!(sum::<i64>(&[]).unwrap(), 0);
    }

    #[test]
    fn integer_sum_overflow_is_an_error() {
        assert!(matches!(sum(&[i64::MAX, 1]), Err(DataError::Overflow)));
        assert!(matches!(sum(&[i32::MIN, -1]), Err(DataError::Overflow)));
        assert_eq!(sum(&[i64::MAX, -1, 1]).unwrap(), i64::MAX);
        assert_eq!(sum(&[f64::MAX, f64::MAX]).unwrap(), f64::INFINITY);
    }

    #[test]
    fn mode_requires_a_repeated_value() {
        let err = mode(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap_err();
        assert!(matches!(err, DataError::NoModeExists));
    }

    #[test]
    fn mode_ties_go_to_first_occurrence() {
        assert_eq!(mode(&[5_i64, 9, 9, 5, 1]).unwrap(), 5);
        assert_eq!(mode(&[9_i64, 5, 9, 5, 1]).unwrap(), 9);
        assert_eq!(mode(&[1.5, 2.5, 2.5]).unwrap(), 2.5);
    }

    #[test]
    fn population_standard_deviation() {
        assert_eq!(
            standard_deviation(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap(),
            2.0
        );
        assert_eq!(
            standard_deviation(&[2_i32, 4, 4, 4, 5, 5, 7, 9]).unwrap(),
            2.0
        );
        assert_eq!(standard_deviation(&[3_u32]).unwrap(), 0.0);
    }

    #[test]
    fn min_max_and_unique() {
        let data = [22.345, 83.326, 83.326];
        assert_eq!(min(&data).unwrap(), 22.345);
        assert_eq!(max(&data).unwrap(), 83.326);
        assert_eq!(count_unique(&data), 2);
        assert_eq!(count_unique(&[0.0, -0.0]), 1);
        assert_eq!(count_unique(&[-1_i64, 1, -1]), 2);
    }
}
