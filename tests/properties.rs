//! Property tests for sequencing and state transitions.

use proptest::prelude::*;
use rocket_telemetry::{
    Event, EventKind, KeyedStore, MemoryStore, ProcessStatus, Rocket, Sequencer, EXPLODED_MISSION,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

fn sequencer() -> Sequencer<MemoryStore<Rocket>> {
    Sequencer::new(Arc::new(MemoryStore::new()))
}

fn arb_kind_and_payload() -> impl Strategy<Value = (EventKind, serde_json::Value)> {
    prop_oneof![
        (0i64..1000, "[A-Z]{3,8}").prop_map(|(speed, mission)| (
            EventKind::Launched,
            json!({"type": "Falcon-9", "launchSpeed": speed, "mission": mission})
        )),
        (0i64..500).prop_map(|by| (EventKind::SpeedIncreased, json!({"by": by}))),
        (0i64..500).prop_map(|by| (EventKind::SpeedDecreased, json!({"by": by}))),
        "[a-z_]{1,12}".prop_map(|reason| (EventKind::Exploded, json!({"reason": reason}))),
        "[A-Z]{3,8}".prop_map(|m| (EventKind::MissionChanged, json!({"newMission": m}))),
        Just((EventKind::Unrecognized("RocketDocked".into()), json!({}))),
    ]
}

fn arb_event(channel: &'static str) -> impl Strategy<Value = Event> {
    (1u64..20, arb_kind_and_payload())
        .prop_map(move |(seq, (kind, payload))| Event::json(channel, seq, kind, &payload).unwrap())
}

/// Events for one rocket with strictly increasing sequence numbers.
fn arb_ordered_stream(channel: &'static str) -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec(arb_kind_and_payload(), 0..15).prop_map(move |items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (kind, payload))| {
                Event::json(channel, i as u64 + 1, kind, &payload).unwrap()
            })
            .collect()
    })
}

fn assert_explosion_invariant(rocket: &Rocket) {
    if rocket.exploded {
        assert_eq!(rocket.speed, 0);
        assert_eq!(rocket.mission, EXPLODED_MISSION);
    }
}

proptest! {
    #[test]
    fn exploded_rockets_stay_grounded(events in prop::collection::vec(arb_event("r"), 1..40)) {
        let seq = sequencer();
        for event in &events {
            seq.process(event).unwrap();
            assert_explosion_invariant(&seq.store().get("r").unwrap());
        }
    }

    #[test]
    fn stale_events_never_mutate(
        events in prop::collection::vec(arb_event("r"), 1..30),
        stale in arb_event("r"),
    ) {
        let seq = sequencer();
        for event in &events {
            seq.process(event).unwrap();
        }
        let before = seq.store().get("r").unwrap();
        let before_json = serde_json::to_vec(&before).unwrap();
        prop_assume!(stale.sequence < before.last_sequence());

        prop_assert_eq!(seq.process(&stale).unwrap(), ProcessStatus::IgnoringOldMessage);

        let after = seq.store().get("r").unwrap();
        prop_assert_eq!(serde_json::to_vec(&after).unwrap(), before_json);
        prop_assert_eq!(after, before);
    }

    #[test]
    fn sequence_never_goes_backwards(events in prop::collection::vec(arb_event("r"), 1..40)) {
        let seq = sequencer();
        let mut high = 0;
        for event in &events {
            seq.process(event).unwrap();
            let last = seq.store().get("r").unwrap().last_sequence().0;
            prop_assert!(last >= high);
            high = last;
        }
    }

    #[test]
    fn duplicate_overwrites_match_single_delivery(
        prefix in arb_ordered_stream("r"),
        (kind, payload) in arb_kind_and_payload(),
    ) {
        // Field overwrites and explosions land in the same state when replayed
        prop_assume!(!matches!(kind, EventKind::SpeedIncreased | EventKind::SpeedDecreased));

        let event = Event::json("r", prefix.len() as u64 + 1, kind, &payload).unwrap();

        let once = sequencer();
        for e in &prefix {
            once.process(e).unwrap();
        }
        once.process(&event).unwrap();

        let twice = sequencer();
        for e in &prefix {
            twice.process(e).unwrap();
        }
        twice.process(&event).unwrap();
        prop_assert_eq!(twice.process(&event).unwrap(), ProcessStatus::ReprocessedDuplicate);

        prop_assert_eq!(twice.store().get("r").unwrap(), once.store().get("r").unwrap());
    }

    #[test]
    fn interleaving_rockets_does_not_matter(
        a in arb_ordered_stream("alpha"),
        b in arb_ordered_stream("beta"),
        c in arb_ordered_stream("gamma"),
        schedule in prop::collection::vec(0usize..3, 0..60),
    ) {
        let streams = [a, b, c];

        // Each rocket on its own
        let mut isolated = HashMap::new();
        for stream in &streams {
            let seq = sequencer();
            for event in stream {
                seq.process(event).unwrap();
            }
            for rocket in seq.store().get_all().unwrap() {
                isolated.insert(rocket.channel.clone(), rocket);
            }
        }

        // All rockets through one sequencer, interleaved by the schedule
        let shared = sequencer();
        let mut cursors = [0usize; 3];
        for pick in schedule.into_iter().chain([0, 1, 2].into_iter().cycle().take(45)) {
            if let Some(event) = streams[pick].get(cursors[pick]) {
                shared.process(event).unwrap();
                cursors[pick] += 1;
            }
        }
        for (cursor, stream) in cursors.iter().zip(&streams) {
            prop_assert_eq!(*cursor, stream.len());
        }

        let combined = shared.store().get_all().unwrap();
        prop_assert_eq!(combined.len(), isolated.len());
        for rocket in combined {
            prop_assert_eq!(Some(&rocket), isolated.get(&rocket.channel));
        }
    }
}
