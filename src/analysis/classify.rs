//! WHO blood pressure classification
//!
//! Readings are classified with an ordered threshold table, first match
//! wins. Isolated systolic hypertension is flagged separately and can
//! accompany any category.

use crate::analysis::error::{StatsError, StatsResult};
use crate::storage::Measurement;
use serde::Serialize;
use std::fmt;

/// WHO blood pressure category, ordered from lowest to highest
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BpClass {
    Optimal,
    Normal,
    HighNormal,
    MildHypertension,
    ModerateHypertension,
    SevereHypertension,
}

/// `(systolic below, diastolic below, class)`, checked in order
///
/// A reading falling through every row is [`BpClass::SevereHypertension`].
pub const WHO_THRESHOLDS: &[(i32, i32, BpClass)] = &[
    (120, 80, BpClass::Optimal),
    (130, 85, BpClass::Normal),
    (140, 90, BpClass::HighNormal),
    (160, 100, BpClass::MildHypertension),
    (180, 110, BpClass::ModerateHypertension),
];

/// Isolated systolic hypertension: systolic at or above, diastolic below
const ISOLATED_SYSTOLIC: (i32, i32) = (140, 90);

impl BpClass {
    /// Get all categories, lowest first
    pub fn all() -> &'static [BpClass] {
        &[
            BpClass::Optimal,
            BpClass::Normal,
            BpClass::HighNormal,
            BpClass::MildHypertension,
            BpClass::ModerateHypertension,
            BpClass::SevereHypertension,
        ]
    }

    /// Position in [`BpClass::all`]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Category at `ordinal`, clamped to the highest one
    pub fn from_ordinal(ordinal: usize) -> BpClass {
        let all = Self::all();
        all[ordinal.min(all.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            BpClass::Optimal => "Optimal",
            BpClass::Normal => "Normal",
            BpClass::HighNormal => "High-Normal",
            BpClass::MildHypertension => "Mild Hypertension",
            BpClass::ModerateHypertension => "Moderate Hypertension",
            BpClass::SevereHypertension => "Severe Hypertension",
        }
    }
}

impl fmt::Display for BpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a single reading
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub class: BpClass,
    /// Isolated systolic hypertension
    pub isolated_systolic: bool,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class)?;
        if self.isolated_systolic {
            write!(f, " (Isolated Systolic Hypertension)")?;
        }
        Ok(())
    }
}

/// Classify a reading by its systolic and diastolic pressure
pub fn classify(m: &Measurement) -> Classification {
    let class = WHO_THRESHOLDS
        .iter()
        .find(|(systolic, diastolic, _)| m.systolic < *systolic && m.diastolic < *diastolic)
        .map(|(_, _, class)| *class)
        .unwrap_or(BpClass::SevereHypertension);

    let isolated_systolic =
        m.systolic >= ISOLATED_SYSTOLIC.0 && m.diastolic < ISOLATED_SYSTOLIC.1;

    Classification {
        class,
        isolated_systolic,
    }
}

/// Number and share of readings in one category
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ClassCount {
    pub class: BpClass,
    pub count: usize,
    pub percent: f64,
}

/// Distribution of categories over a measurement set
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassDistribution {
    pub total: usize,
    /// One entry per category, lowest first, including empty ones
    pub classes: Vec<ClassCount>,
    /// Readings flagged with isolated systolic hypertension
    pub isolated_systolic: usize,
    /// Mean category ordinal, each isolated systolic flag adding 0.5
    pub average_ordinal: f64,
    /// `average_ordinal` rounded to the nearest category
    pub average_class: BpClass,
}

/// Count readings per category and compute the average category
pub fn class_distribution(items: &[Measurement]) -> StatsResult<ClassDistribution> {
    if items.is_empty() {
        return Err(StatsError::EmptySet);
    }

    let mut counts = vec![0usize; BpClass::all().len()];
    let mut isolated_systolic = 0;
    let mut ordinal_sum = 0.0;

    for m in items {
        let c = classify(m);
        counts[c.class.ordinal()] += 1;
        ordinal_sum += c.class.ordinal() as f64;
        if c.isolated_systolic {
            isolated_systolic += 1;
            ordinal_sum += 0.5;
        }
    }

    let total = items.len();
    let classes = BpClass::all()
        .iter()
        .zip(counts)
        .map(|(class, count)| ClassCount {
            class: *class,
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect();

    let average_ordinal = ordinal_sum / total as f64;
    let average_class = BpClass::from_ordinal(average_ordinal.round() as usize);

    Ok(ClassDistribution {
        total,
        classes,
        isolated_systolic,
        average_ordinal,
        average_class,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(systolic: i32, diastolic: i32) -> Measurement {
        Measurement::new(systolic, diastolic, 70)
    }

    #[test]
    fn test_classify_table() {
        assert_eq!(classify(&bp(115, 75)).class, BpClass::Optimal);
        assert_eq!(classify(&bp(125, 75)).class, BpClass::Normal);
        // Diastolic alone can raise the category
        assert_eq!(classify(&bp(115, 82)).class, BpClass::Normal);
        assert_eq!(classify(&bp(135, 88)).class, BpClass::HighNormal);
        assert_eq!(classify(&bp(150, 95)).class, BpClass::MildHypertension);
        assert_eq!(classify(&bp(170, 105)).class, BpClass::ModerateHypertension);
        assert_eq!(classify(&bp(185, 105)).class, BpClass::SevereHypertension);
        assert_eq!(classify(&bp(120, 115)).class, BpClass::SevereHypertension);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(&bp(119, 79)).class, BpClass::Optimal);
        assert_eq!(classify(&bp(120, 79)).class, BpClass::Normal);
        assert_eq!(classify(&bp(119, 80)).class, BpClass::Normal);
        assert_eq!(classify(&bp(179, 109)).class, BpClass::ModerateHypertension);
        assert_eq!(classify(&bp(180, 109)).class, BpClass::SevereHypertension);
    }

    #[test]
    fn test_isolated_systolic() {
        let c = classify(&bp(145, 85));
        assert_eq!(c.class, BpClass::MildHypertension);
        assert!(c.isolated_systolic);
        assert_eq!(
            c.to_string(),
            "Mild Hypertension (Isolated Systolic Hypertension)"
        );

        assert!(classify(&bp(185, 70)).isolated_systolic);
        assert!(!classify(&bp(145, 90)).isolated_systolic);
        assert!(!classify(&bp(139, 70)).isolated_systolic);
    }

    #[test]
    fn test_class_labels() {
        assert_eq!(BpClass::HighNormal.to_string(), "High-Normal");
        assert_eq!(BpClass::from_ordinal(3), BpClass::MildHypertension);
        assert_eq!(BpClass::from_ordinal(42), BpClass::SevereHypertension);
    }

    #[test]
    fn test_class_distribution() {
        let items = vec![bp(115, 75), bp(115, 75), bp(125, 75), bp(145, 85)];
        let dist = class_distribution(&items).unwrap();

        assert_eq!(dist.total, 4);
        assert_eq!(dist.classes.len(), 6);
        assert_eq!(dist.classes[0].count, 2);
        assert!((dist.classes[0].percent - 50.0).abs() < 1e-9);
        assert_eq!(dist.classes[1].count, 1);
        assert_eq!(dist.classes[3].count, 1);
        assert_eq!(dist.classes[5].count, 0);
        assert_eq!(dist.isolated_systolic, 1);

        // (0 + 0 + 1 + 3 + 0.5) / 4
        assert!((dist.average_ordinal - 1.125).abs() < 1e-9);
        assert_eq!(dist.average_class, BpClass::Normal);
    }

    #[test]
    fn test_class_distribution_empty() {
        assert_eq!(class_distribution(&[]), Err(StatsError::EmptySet));
    }
}
