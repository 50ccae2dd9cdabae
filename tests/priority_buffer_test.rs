//! Randomized ordering and spacing checks for the priority buffer.

use std::collections::HashMap;

use engagement_scheduler::core::{Message, MessageStatus, PriorityBuffer, PriorityScore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOPICS: [&str; 4] = ["sleep", "walk", "hydrate", "meds"];
const FAR_FUTURE_MS: i64 = 4_000_000_000_000;

fn random_buffer(rng: &mut StdRng, count: usize) -> PriorityBuffer {
    let priorities: HashMap<&str, PriorityScore> = TOPICS
        .iter()
        .map(|topic| (*topic, PriorityScore::new(rng.random_range(0..=3))))
        .collect();
    let mut buffer = PriorityBuffer::new();
    for i in 0..count {
        let topic = TOPICS[rng.random_range(0..TOPICS.len())];
        let message = Message::new(
            format!("m{i}"),
            topic,
            MessageStatus::Ready,
            rng.random_range(0..5_000),
            FAR_FUTURE_MS,
        )
        .unwrap();
        buffer.add_message(message, priorities[topic]);
    }
    buffer
}

#[test]
fn test_pop_order_is_time_then_priority() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut buffer = random_buffer(&mut rng, 200);

    let mut popped = Vec::new();
    while let Some(message) = buffer.get_next_message() {
        popped.push(message);
    }
    assert_eq!(popped.len(), 200);
    assert!(buffer.is_empty());
    for pair in popped.windows(2) {
        assert!(pair[0].delivery_day_time() <= pair[1].delivery_day_time());
    }
}

#[test]
fn test_same_topic_spacing_holds_without_ceilings() {
    let threshold = 300;
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let buffer = random_buffer(&mut rng, 60);
        let topic_of: HashMap<String, String> = buffer
            .messages_in_order()
            .into_iter()
            .map(|m| (m.message_id().to_string(), m.topic_id().to_string()))
            .collect();

        let scheduled = buffer.get_scheduled_messages_with_adjusted_delivery_times(threshold, 0, 1_000);
        assert_eq!(scheduled.len(), 60);

        let mut per_topic: HashMap<&str, Vec<i64>> = HashMap::new();
        for record in &scheduled {
            let secs = record.delivery_date_ms / 1000;
            assert!(secs >= 1_000 + threshold, "seed {seed}: {secs} is in the past");
            per_topic
                .entry(topic_of[&record.message_id].as_str())
                .or_default()
                .push(secs);
        }
        for (topic, mut times) in per_topic {
            times.sort_unstable();
            for pair in times.windows(2) {
                assert!(
                    pair[1] - pair[0] >= threshold,
                    "seed {seed}: {topic} delivered {} and {}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }
}

#[test]
fn test_random_removals_leave_remaining_messages_schedulable() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut buffer = random_buffer(&mut rng, 100);

    let doomed: Vec<String> = (0..100)
        .filter(|_| rng.random_bool(0.3))
        .map(|i| format!("m{i}"))
        .collect();
    let removed = buffer.remove_messages_by_ids(doomed.as_slice());
    assert_eq!(removed, doomed.len());
    assert_eq!(buffer.len(), 100 - doomed.len());

    let scheduled = buffer.get_scheduled_messages_with_adjusted_delivery_times(60, 0, 0);
    assert_eq!(scheduled.len(), buffer.len());
    assert!(scheduled.iter().all(|m| !doomed.contains(&m.message_id)));

    let restored = PriorityBuffer::restore(buffer.snapshot());
    assert_eq!(
        restored.get_scheduled_messages_with_adjusted_delivery_times(60, 0, 0),
        scheduled
    );
}
