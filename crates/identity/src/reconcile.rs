//! Matching, primary election, and merge planning.
//!
//! All functions take the match set produced by the store's identifier
//! query, which is ordered ascending by `created_at` (id as tie-break) and
//! already excludes soft-deleted rows. That ordering is a precondition:
//! "earliest" below always means "first in the slice".

use linkwise_core::{Contact, ContactId};

/// Determine the id of the cluster primary for a non-empty match set.
///
/// The primary is the earliest matched contact that is itself a primary.
/// When the match set holds only secondaries, every matched row belongs to
/// one established cluster; the earliest match's `linked_id` already names
/// that cluster's primary, so the election follows it rather than treating
/// a secondary as a cluster head (which would create link chains on the
/// next write).
///
/// Returns `None` for an empty match set, or when the store handed back a
/// secondary without a `linked_id` — the latter is a broken store
/// invariant the caller surfaces as a store failure.
pub fn elect_primary(matches: &[Contact]) -> Option<ContactId> {
    if let Some(primary) = matches.iter().find(|c| c.is_primary()) {
        return Some(primary.id);
    }
    matches.first().and_then(|c| c.linked_id)
}

/// True when the request carries an identifier value unseen across the
/// whole match set.
///
/// This is the trigger for recording a new secondary touchpoint: a new
/// email OR a new phone qualifies, even when the other field matched.
pub fn introduces_new_information(
    matches: &[Contact],
    email: Option<&str>,
    phone: Option<&str>,
) -> bool {
    let new_email = email
        .is_some_and(|e| !matches.iter().any(|c| c.email.as_deref() == Some(e)));
    let new_phone = phone
        .is_some_and(|p| !matches.iter().any(|c| c.phone_number.as_deref() == Some(p)));
    new_email || new_phone
}

/// Matched primaries that must be demoted under `surviving_primary`.
///
/// When one request bridges previously independent clusters, every matched
/// primary except the overall-earliest loses its primary role. This
/// generalizes past two colliding primaries: keep the minimum by creation
/// order, demote the rest.
pub fn demotion_targets(matches: &[Contact], surviving_primary: ContactId) -> Vec<ContactId> {
    matches
        .iter()
        .filter(|c| c.is_primary() && c.id != surviving_primary)
        .map(|c| c.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use linkwise_core::LinkPrecedence;
    use proptest::prelude::*;

    fn at(offset_secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + offset_secs, 0).unwrap()
    }

    fn primary(id: i64, email: Option<&str>, phone: Option<&str>) -> Contact {
        Contact {
            id: ContactId(id),
            email: email.map(String::from),
            phone_number: phone.map(String::from),
            link_precedence: LinkPrecedence::Primary,
            linked_id: None,
            created_at: at(id),
            updated_at: at(id),
            deleted_at: None,
        }
    }

    fn secondary(id: i64, linked_to: i64, email: Option<&str>, phone: Option<&str>) -> Contact {
        Contact {
            linked_id: Some(ContactId(linked_to)),
            link_precedence: LinkPrecedence::Secondary,
            ..primary(id, email, phone)
        }
    }

    #[test]
    fn elects_earliest_primary_among_matches() {
        let matches = [
            secondary(2, 1, Some("b@x"), None),
            primary(3, Some("c@x"), Some("111")),
            primary(5, Some("d@x"), Some("111")),
        ];
        assert_eq!(elect_primary(&matches), Some(ContactId(3)));
    }

    #[test]
    fn matched_only_secondaries_resolve_through_linked_id() {
        let matches = [
            secondary(4, 1, Some("b@x"), None),
            secondary(6, 1, None, Some("111")),
        ];
        assert_eq!(elect_primary(&matches), Some(ContactId(1)));
    }

    #[test]
    fn empty_match_set_elects_nobody() {
        assert_eq!(elect_primary(&[]), None);
    }

    #[test]
    fn unlinked_secondary_is_reported_as_no_election() {
        // A secondary without linked_id is a store inconsistency; election
        // refuses to guess.
        let mut broken = secondary(2, 1, Some("b@x"), None);
        broken.linked_id = None;
        assert_eq!(elect_primary(&[broken]), None);
    }

    #[test]
    fn new_email_with_matched_phone_is_new_information() {
        let matches = [primary(1, Some("a@x"), Some("111"))];
        assert!(introduces_new_information(
            &matches,
            Some("b@x"),
            Some("111")
        ));
    }

    #[test]
    fn verbatim_repeat_is_not_new_information() {
        let matches = [primary(1, Some("a@x"), Some("111"))];
        assert!(!introduces_new_information(
            &matches,
            Some("a@x"),
            Some("111")
        ));
    }

    #[test]
    fn absent_field_never_counts_as_new() {
        let matches = [primary(1, Some("a@x"), Some("111"))];
        assert!(!introduces_new_information(&matches, None, Some("111")));
    }

    #[test]
    fn value_known_on_any_matched_row_is_not_new() {
        // The new value may live on a secondary, not the primary.
        let matches = [
            primary(1, Some("a@x"), Some("111")),
            secondary(2, 1, Some("b@x"), Some("111")),
        ];
        assert!(!introduces_new_information(
            &matches,
            Some("b@x"),
            Some("111")
        ));
    }

    #[test]
    fn demotes_every_matched_primary_except_the_survivor() {
        let matches = [
            primary(1, Some("a@x"), Some("111")),
            primary(4, Some("b@x"), Some("111")),
            primary(7, Some("c@x"), Some("111")),
            secondary(9, 1, Some("d@x"), None),
        ];
        assert_eq!(
            demotion_targets(&matches, ContactId(1)),
            vec![ContactId(4), ContactId(7)]
        );
    }

    #[test]
    fn single_cluster_match_set_needs_no_demotion() {
        let matches = [
            primary(1, Some("a@x"), Some("111")),
            secondary(2, 1, Some("b@x"), Some("111")),
        ];
        assert!(demotion_targets(&matches, ContactId(1)).is_empty());
    }

    // Generator for match sets that respect the store's ordering contract:
    // ascending creation order, secondaries linked to some earlier primary.
    fn arb_match_set() -> impl Strategy<Value = Vec<Contact>> {
        prop::collection::vec(any::<bool>(), 1..12).prop_map(|precedences| {
            let mut rows: Vec<Contact> = Vec::with_capacity(precedences.len());
            let mut primaries: Vec<i64> = Vec::new();
            for (i, is_primary) in precedences.into_iter().enumerate() {
                let id = i as i64 + 1;
                if is_primary || primaries.is_empty() {
                    primaries.push(id);
                    rows.push(primary(id, Some("shared@x"), None));
                } else {
                    let linked_to = primaries[id as usize % primaries.len()];
                    rows.push(secondary(id, linked_to, Some("shared@x"), None));
                }
            }
            rows
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the elected primary is always the earliest primary in
        /// the match set (the generator guarantees one exists).
        #[test]
        fn election_picks_the_earliest_primary(matches in arb_match_set()) {
            let earliest = matches.iter().find(|c| c.is_primary()).map(|c| c.id);
            prop_assert_eq!(elect_primary(&matches), earliest);
        }

        /// Property: demotion never targets the survivor, targets only
        /// primaries, and covers every other matched primary exactly once.
        #[test]
        fn demotion_covers_all_non_surviving_primaries(matches in arb_match_set()) {
            let survivor = elect_primary(&matches).unwrap();
            let targets = demotion_targets(&matches, survivor);

            prop_assert!(!targets.contains(&survivor));
            for t in &targets {
                let row = matches.iter().find(|c| c.id == *t).unwrap();
                prop_assert!(row.is_primary());
            }
            let expected = matches
                .iter()
                .filter(|c| c.is_primary() && c.id != survivor)
                .count();
            prop_assert_eq!(targets.len(), expected);
        }
    }
}
