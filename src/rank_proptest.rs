//! Property-based tests for the ranking primitives.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::rank::{similarity, trigrams, version_sort_key};
    use proptest::prelude::*;

    proptest! {
        /// Property: similarity is always within [0, 1]
        #[test]
        fn similarity_is_bounded(a in ".*", b in ".*") {
            let s = similarity(&trigrams(&a), &trigrams(&b));
            prop_assert!((0.0..=1.0).contains(&s), "similarity {} out of range", s);
        }

        /// Property: similarity is symmetric
        #[test]
        fn similarity_is_symmetric(a in ".*", b in ".*") {
            let (ta, tb) = (trigrams(&a), trigrams(&b));
            prop_assert_eq!(similarity(&ta, &tb), similarity(&tb, &ta));
        }

        /// Property: a string is maximally similar to itself
        #[test]
        fn similarity_to_self_is_one(a in ".{3,40}") {
            let t = trigrams(&a);
            prop_assert_eq!(similarity(&t, &t), 1.0);
        }

        /// Property: short strings never cause a division by zero
        #[test]
        fn similarity_of_short_strings_is_zero(a in ".{0,2}", b in ".{0,2}") {
            prop_assert_eq!(similarity(&trigrams(&a), &trigrams(&b)), 0.0);
        }

        /// Property: trigram count is char count minus two, for distinct
        /// windows at most
        #[test]
        fn trigram_count_is_bounded(a in ".*") {
            let chars = a.chars().count();
            let expected_max = chars.saturating_sub(2);
            prop_assert!(trigrams(&a).len() <= expected_max);
        }
    }

    proptest! {
        /// Property: version key extraction is deterministic
        #[test]
        fn version_key_is_deterministic(name in "[a-zA-Z0-9_.]{0,30}") {
            prop_assert_eq!(version_sort_key(&name), version_sort_key(&name));
        }

        /// Property: key extraction is case-insensitive
        #[test]
        fn version_key_ignores_case(name in "[a-zA-Z0-9_.]{0,30}") {
            prop_assert_eq!(
                version_sort_key(&name.to_uppercase()),
                version_sort_key(&name.to_lowercase())
            );
        }

        /// Property: a stable ref of a version outranks any numbered ref
        /// of the same version
        #[test]
        fn stable_outranks_numbered(major in 1u32..100, minor in 0u32..100) {
            let stable = version_sort_key(&format!("REL_{}_STABLE", major));
            let numbered = version_sort_key(&format!("REL_{}_{}", major, minor));
            prop_assert!(stable > numbered);
        }

        /// Property: pre-release refs sink below the released ref
        #[test]
        fn prerelease_ranks_below_release(major in 1u32..100, n in 1u32..10) {
            let release = version_sort_key(&format!("REL_{}_0", major));
            let rc = version_sort_key(&format!("REL_{}_RC{}", major, n));
            let beta = version_sort_key(&format!("REL_{}_BETA{}", major, n));
            let alpha = version_sort_key(&format!("REL_{}_ALPHA{}", major, n));

            prop_assert!(release > rc);
            prop_assert!(rc > beta);
            prop_assert!(beta > alpha);
        }
    }
}
