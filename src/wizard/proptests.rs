//! Property-based tests for the wizard engine
//!
//! These verify engine invariants across arbitrary sessions, payloads,
//! and text input, including hostile query strings.

use super::state::*;
use super::transition::*;
use super::*;
use crate::menu;
use chrono::NaiveDate;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context(registered: bool) -> WizardContext {
    WizardContext::new(registered, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap())
}

fn is_store_effect(effect: &Effect) -> bool {
    !matches!(effect, Effect::Reply { .. })
}

/// Session produced by the transition's store effects, if any.
fn written_session(result: &TransitionResult) -> Option<Session> {
    result.effects.iter().find_map(|effect| match effect {
        Effect::PutSession { session } | Effect::UpdateSession { session } => {
            Some(session.clone())
        }
        _ => None,
    })
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_item() -> impl Strategy<Value = String> {
    let catalog: Vec<String> = menu::EVENT_ITEMS
        .iter()
        .chain(menu::PERSONAL_ITEMS)
        .map(|s| (*s).to_string())
        .collect();
    proptest::sample::select(catalog)
}

fn arb_location() -> impl Strategy<Value = String> {
    let locations: Vec<String> = menu::LOCATIONS.iter().map(|s| (*s).to_string()).collect();
    proptest::sample::select(locations)
}

fn arb_category() -> impl Strategy<Value = String> {
    proptest::sample::select(vec![
        menu::EVENT_CATEGORY.to_string(),
        menu::PERSONAL_CATEGORY.to_string(),
    ])
}

fn arb_date() -> impl Strategy<Value = String> {
    "[0-9]{8}"
}

/// Item lists without duplicates, matching what toggling can build.
fn arb_unique_items() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(arb_item(), 0..6).prop_map(|items| {
        let mut unique: Vec<String> = Vec::new();
        for item in items {
            if !unique.contains(&item) {
                unique.push(item);
            }
        }
        unique
    })
}

fn arb_selecting_session() -> impl Strategy<Value = Session> {
    (arb_location(), arb_date(), arb_category(), arb_unique_items()).prop_map(
        |(location, date, category, items)| Session::SelectingItems {
            location,
            date,
            category,
            items,
        },
    )
}

fn arb_session() -> impl Strategy<Value = Session> {
    prop_oneof![
        Just(Session::Registering),
        arb_selecting_session(),
        (arb_location(), arb_date(), arb_category(), "[ -~]{0,20}").prop_map(
            |(location, date, category, items)| Session::AwaitingDescription {
                location,
                date,
                category,
                items,
            }
        ),
    ]
}

/// Query strings from well-formed to outright noise.
fn arb_query() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,40}",
        "[%0-9a-fA-F=&+]{0,30}",
        (
            proptest::sample::select(vec![
                "select_loc",
                "set_date",
                "select_cat",
                "toggle_item",
                "confirm_items",
                "launch",
                "",
            ]),
            arb_item(),
        )
            .prop_map(|(action, val)| format!("action={}&val={}", action, val)),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[ -~]{0,30}",
        arb_item(),
        Just(REGISTER_TRIGGER.to_string()),
        Just(REPORT_TRIGGER.to_string()),
        Just("無".to_string()),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_text().prop_map(|text| Event::text(&text)),
        (arb_query(), proptest::option::of("[0-9]{4}-[0-9]{2}-[0-9]{2}"))
            .prop_map(|(data, date_param)| Event::postback(&data, date_param)),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Invariant 1: the engine is total - any (session, event, context)
    // yields a result, and a small one.
    #[test]
    fn prop_transition_is_total_and_bounded(
        session in proptest::option::of(arb_session()),
        event in arb_event(),
        registered in any::<bool>(),
    ) {
        let result = transition(session.as_ref(), &test_context(registered), event);
        prop_assert!(result.effects.len() <= 3, "oversized result: {:?}", result.effects);
    }

    // Invariant 2: at most one reply per event (reply tokens are single-use)
    #[test]
    fn prop_at_most_one_reply(
        session in proptest::option::of(arb_session()),
        event in arb_event(),
        registered in any::<bool>(),
    ) {
        let result = transition(session.as_ref(), &test_context(registered), event);
        let replies = result
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Reply { .. }))
            .count();
        prop_assert!(replies <= 1, "multiple replies: {:?}", result.effects);
    }

    // Invariant 3: store writes come before the reply, never after
    #[test]
    fn prop_store_effects_precede_reply(
        session in proptest::option::of(arb_session()),
        event in arb_event(),
        registered in any::<bool>(),
    ) {
        let result = transition(session.as_ref(), &test_context(registered), event);
        if let Some(reply_at) = result
            .effects
            .iter()
            .position(|e| matches!(e, Effect::Reply { .. }))
        {
            let late_store = result.effects.iter().skip(reply_at).any(is_store_effect);
            prop_assert!(!late_store, "store effect after reply: {:?}", result.effects);
        }
    }

    // Invariant 4: the payload parser is deterministic and never panics
    #[test]
    fn prop_parser_deterministic(query in arb_query()) {
        let first = PostbackData::parse(&query);
        let second = PostbackData::parse(&query);
        prop_assert_eq!(first.get("action"), second.get("action"));
        prop_assert_eq!(first.get("val"), second.get("val"));
        prop_assert_eq!(first.len(), second.len());
    }

    // Invariant 5: toggling an unselected item twice restores the list
    #[test]
    fn prop_toggle_twice_is_identity(
        session in arb_selecting_session(),
        item in arb_item(),
    ) {
        let Session::SelectingItems { items, .. } = &session else {
            unreachable!();
        };
        prop_assume!(!items.contains(&item));

        let context = test_context(true);
        let data = format!("action=toggle_item&val={}", item);

        let once = transition(Some(&session), &context, Event::postback(&data, None));
        let mid = written_session(&once).expect("toggle must write the session");
        let twice = transition(Some(&mid), &context, Event::postback(&data, None));
        let back = written_session(&twice).expect("toggle must write the session");

        prop_assert_eq!(back, session);
    }

    // Invariant 6: removal keeps the relative order of everything else
    #[test]
    fn prop_toggle_removal_preserves_order(session in arb_selecting_session()) {
        let Session::SelectingItems { items, .. } = &session else {
            unreachable!();
        };
        prop_assume!(!items.is_empty());
        let target = items[0].clone();
        let expected: Vec<String> = items.iter().skip(1).cloned().collect();

        let result = transition(
            Some(&session),
            &test_context(true),
            Event::postback(&format!("action=toggle_item&val={}", target), None),
        );
        let Some(Session::SelectingItems { items: updated, .. }) = written_session(&result) else {
            prop_assert!(false, "expected a selecting_items write: {:?}", result.effects);
            return Ok(());
        };
        prop_assert_eq!(updated, expected);
    }

    // Invariant 7: confirm joins items in selection order, or stores the
    // sentinel when nothing was picked
    #[test]
    fn prop_confirm_preserves_selection_order(session in arb_selecting_session()) {
        let Session::SelectingItems { items, .. } = &session else {
            unreachable!();
        };
        let expected = if items.is_empty() {
            NO_ITEMS.to_string()
        } else {
            items.join(",")
        };

        let result = transition(
            Some(&session),
            &test_context(true),
            Event::postback("action=confirm_items", None),
        );
        let Some(Session::AwaitingDescription { items: joined, .. }) = written_session(&result)
        else {
            prop_assert!(false, "expected an awaiting_description write: {:?}", result.effects);
            return Ok(());
        };
        prop_assert_eq!(joined, expected);
    }

    // Invariant 8: registration accepts exactly three words
    #[test]
    fn prop_registration_needs_three_words(
        words in proptest::collection::vec("[a-z]{1,6}", 1..6),
    ) {
        let text = words.join(" ");
        let result = transition(
            Some(&Session::Registering),
            &test_context(false),
            Event::text(&text),
        );

        if words.len() == 3 {
            prop_assert!(
                matches!(result.effects.first(), Some(Effect::CreateProfile { .. })),
                "three words should register: {:?}",
                result.effects
            );
            prop_assert!(result.effects.contains(&Effect::DeleteSession));
        } else {
            prop_assert_eq!(
                &result.effects,
                &vec![Effect::reply_text(REPLY_REGISTER_FORMAT)]
            );
        }
    }

    // Invariant 9: the description step stores the text verbatim and
    // always ends the session
    #[test]
    fn prop_description_saved_verbatim(
        location in arb_location(),
        date in arb_date(),
        category in arb_category(),
        items in "[ -~]{0,20}",
        description in "[a-z0-9 ]{0,30}",
    ) {
        let session = Session::AwaitingDescription {
            location: location.clone(),
            date: date.clone(),
            category: category.clone(),
            items: items.clone(),
        };
        let result = transition(Some(&session), &test_context(true), Event::text(&description));

        let Some(Effect::AppendRecord { record }) = result.effects.first() else {
            prop_assert!(false, "expected a record append: {:?}", result.effects);
            return Ok(());
        };
        prop_assert_eq!(&record.location, &location);
        prop_assert_eq!(&record.date, &date);
        prop_assert_eq!(&record.category, &category);
        prop_assert_eq!(&record.items, &items);
        prop_assert_eq!(record.description.as_str(), description.trim());
        prop_assert!(result.effects.contains(&Effect::DeleteSession));
    }

    // Invariant 10: sessions survive a JSON round trip unchanged
    #[test]
    fn prop_sessions_round_trip_json(session in arb_session()) {
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, session);
    }

    // Invariant 11: every catalog value survives the menu -> postback trip
    #[test]
    fn prop_catalog_round_trips_through_payload(item in arb_item()) {
        let data = format!("action=toggle_item&val={}", item);
        let parsed = PostbackData::parse(&data);
        prop_assert_eq!(parsed.get("val"), Some(item.as_str()));
    }
}
