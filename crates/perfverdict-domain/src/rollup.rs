//! Reduce per-KPI conclusions to a single case conclusion.

use perfverdict_error::StructuralError;
use perfverdict_types::{Conclusion, KeyTuple, UnresolvedCasePolicy};

/// The most severe conclusion present, or `None` for an empty set.
///
/// The result depends only on which conclusions are present, never on
/// their order.
pub fn roll_up<I>(conclusions: I) -> Option<Conclusion>
where
    I: IntoIterator<Item = Conclusion>,
{
    conclusions.into_iter().min_by_key(|c| c.priority())
}

/// Roll up rendered labels; full labels and two-letter codes are equivalent.
///
/// Blank or unrecognized labels (a filled NaN cell, for example) are
/// treated as "not applicable" and skipped.
pub fn roll_up_labels<'a, I>(labels: I) -> Option<Conclusion>
where
    I: IntoIterator<Item = &'a str>,
{
    roll_up(labels.into_iter().filter_map(Conclusion::parse))
}

/// Case-level conclusion for one case.
///
/// A case with no classifiable KPI is resolved by `policy`: either
/// reported as Invalid Data, or rejected as a structural error.
pub fn roll_up_case(
    key: &KeyTuple,
    conclusions: &[Option<Conclusion>],
    policy: UnresolvedCasePolicy,
) -> Result<Conclusion, StructuralError> {
    match roll_up(conclusions.iter().flatten().copied()) {
        Some(c) => Ok(c),
        None => match policy {
            UnresolvedCasePolicy::InvalidData => Ok(Conclusion::InvalidData),
            UnresolvedCasePolicy::Error => Err(StructuralError::UnresolvedCase {
                case: key.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfverdict_types::Value;

    #[test]
    fn regression_beats_everything() {
        let c = roll_up([
            Conclusion::DramaticImprovement,
            Conclusion::ModerateRegression,
            Conclusion::HighVariance,
        ]);
        assert_eq!(c, Some(Conclusion::ModerateRegression));
    }

    #[test]
    fn moderate_improvement_outranks_dramatic_improvement() {
        let c = roll_up([
            Conclusion::DramaticImprovement,
            Conclusion::ModerateImprovement,
        ]);
        assert_eq!(c, Some(Conclusion::ModerateImprovement));
    }

    #[test]
    fn no_significance_is_the_weakest() {
        let c = roll_up([Conclusion::NoSignificance, Conclusion::NegligibleChanges]);
        assert_eq!(c, Some(Conclusion::NegligibleChanges));
        assert_eq!(roll_up(std::iter::empty()), None);
    }

    #[test]
    fn labels_and_codes_are_equivalent() {
        assert_eq!(
            roll_up_labels(["Moderate Improvement", "HV", ""]),
            Some(Conclusion::HighVariance)
        );
        assert_eq!(
            roll_up_labels(["MI", "High Variance"]),
            roll_up_labels(["Moderate Improvement", "HV"])
        );
        assert_eq!(roll_up_labels(["", "n/a"]), None);
    }

    #[test]
    fn unresolved_case_follows_policy() {
        let key = KeyTuple(vec!["read".into(), Value::Number(4.0)]);
        let all_nan = [None, None];

        assert_eq!(
            roll_up_case(&key, &all_nan, UnresolvedCasePolicy::InvalidData).unwrap(),
            Conclusion::InvalidData
        );

        let err = roll_up_case(&key, &all_nan, UnresolvedCasePolicy::Error).unwrap_err();
        assert_eq!(
            err,
            StructuralError::UnresolvedCase {
                case: "(read, 4)".into()
            }
        );
    }

    #[test]
    fn not_applicable_kpis_are_skipped() {
        let key = KeyTuple(vec!["read".into()]);
        let c = roll_up_case(
            &key,
            &[None, Some(Conclusion::NegligibleChanges)],
            UnresolvedCasePolicy::Error,
        )
        .unwrap();
        assert_eq!(c, Conclusion::NegligibleChanges);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn conclusion() -> impl Strategy<Value = Conclusion> {
        prop::sample::select(Conclusion::ALL.to_vec())
    }

    proptest! {
        /// Permuting the KPI list never changes the roll-up.
        #[test]
        fn order_independent(
            mut set in prop::collection::vec(conclusion(), 1..10),
            shift in 0usize..10,
        ) {
            let before = roll_up(set.iter().copied());
            let n = set.len();
            set.rotate_left(shift % n);
            set.reverse();
            prop_assert_eq!(roll_up(set.iter().copied()), before);
        }

        /// Rendering with codes and parsing back does not change the roll-up.
        #[test]
        fn abbreviation_is_pure_relabeling(set in prop::collection::vec(conclusion(), 1..10)) {
            let full: Vec<&str> = set.iter().map(|c| c.render(false)).collect();
            let abbr: Vec<&str> = set.iter().map(|c| c.render(true)).collect();
            prop_assert_eq!(roll_up_labels(full), roll_up_labels(abbr));
        }

        /// The winner is always a member of the input set.
        #[test]
        fn result_is_present(set in prop::collection::vec(conclusion(), 1..10)) {
            let winner = roll_up(set.iter().copied()).unwrap();
            prop_assert!(set.contains(&winner));
            prop_assert!(set.iter().all(|c| c.priority() >= winner.priority()));
        }
    }
}
