//! Topic-aware priority buffer with lazy deletion.
//!
//! Entries are ordered by `(scheduled_time, -priority, sequence)`: earliest
//! requested delivery first, higher priority first within the same time, and
//! insertion order for exact ties. Removal marks the entry's slot as removed
//! instead of rebalancing the heap; removed slots are skipped when popped.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::core::{
    Message, MessageStatus, PriorityCalculator, PriorityScore, ScheduledMessage, ScoredPhrase,
    SchedulerError,
};

/// Heap key. The message itself lives in the slot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    scheduled_time: i64,
    priority: PriorityScore,
    sequence: u64,
}

impl HeapEntry {
    /// Ascending scheduling order.
    fn schedule_order(&self, other: &Self) -> Ordering {
        self.scheduled_time
            .cmp(&other.scheduled_time)
            // Higher priority first
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap.
        other.schedule_order(self)
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Live {
        message: Message,
        priority: PriorityScore,
    },
    Removed,
}

/// Serializable form of one buffer entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrySnapshot {
    /// Requested delivery time, seconds from midnight.
    #[serde(default)]
    pub scheduled_time: Option<i64>,
    /// Topic priority the entry was inserted with.
    #[serde(default)]
    pub priority: PriorityScore,
    /// Insertion sequence number.
    pub sequence: u64,
    /// `None` for a removed entry.
    #[serde(default)]
    pub message: Option<Message>,
}

/// Serializable form of the whole buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferSnapshot {
    /// Next sequence number to hand out.
    #[serde(default)]
    pub next_sequence: u64,
    /// Live entries in scheduling order.
    #[serde(default)]
    pub entries: Vec<EntrySnapshot>,
}

/// Time- and priority-ordered view over the active message set.
#[derive(Debug, Clone, Default)]
pub struct PriorityBuffer {
    heap: BinaryHeap<HeapEntry>,
    slots: HashMap<u64, Slot>,
    entry_finder: HashMap<String, u64>,
    next_sequence: u64,
}

impl PriorityBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Number of live messages. Removed entries are not counted.
    pub fn len(&self) -> usize {
        self.entry_finder.len()
    }

    /// Whether the buffer holds no live messages.
    pub fn is_empty(&self) -> bool {
        self.entry_finder.is_empty()
    }

    /// Removed entries still occupying heap slots.
    pub fn tombstone_count(&self) -> usize {
        self.heap.len() - self.entry_finder.len()
    }

    /// Insert a message, replacing any live entry with the same id.
    pub fn add_message(&mut self, message: Message, priority: PriorityScore) {
        if let Some(old) = self.entry_finder.remove(message.message_id()) {
            self.slots.insert(old, Slot::Removed);
        }
        let sequence = self.next_sequence();
        self.heap.push(HeapEntry {
            scheduled_time: message.delivery_day_time(),
            priority,
            sequence,
        });
        self.entry_finder
            .insert(message.message_id().to_string(), sequence);
        self.slots.insert(sequence, Slot::Live { message, priority });
    }

    /// Mark a tracked message as removed.
    pub fn remove_message(&mut self, message: &Message) -> Result<(), SchedulerError> {
        self.remove_by_id(message.message_id())
    }

    fn remove_by_id(&mut self, message_id: &str) -> Result<(), SchedulerError> {
        let sequence = self
            .entry_finder
            .remove(message_id)
            .ok_or_else(|| SchedulerError::UnknownMessage(message_id.to_string()))?;
        self.slots.insert(sequence, Slot::Removed);
        Ok(())
    }

    /// Remove every listed id that is tracked. Returns how many were removed.
    pub fn remove_messages_by_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> usize {
        ids.iter()
            .filter(|id| self.remove_by_id(id.as_ref()).is_ok())
            .count()
    }

    /// Remove every live message whose topic is listed. Returns how many were
    /// removed.
    pub fn remove_messages_by_topic_ids<S: AsRef<str>>(&mut self, topic_ids: &[S]) -> usize {
        let doomed: Vec<String> = self
            .live_messages()
            .filter(|(m, _)| topic_ids.iter().any(|t| t.as_ref() == m.topic_id()))
            .map(|(m, _)| m.message_id().to_string())
            .collect();
        self.remove_messages_by_ids(doomed.as_slice())
    }

    /// Pop the earliest live message, discarding removed entries on the way.
    pub fn get_next_message(&mut self) -> Option<Message> {
        while let Some(entry) = self.heap.pop() {
            if let Some(Slot::Live { message, .. }) = self.slots.remove(&entry.sequence) {
                self.entry_finder.remove(message.message_id());
                return Some(message);
            }
        }
        None
    }

    /// Peek at the earliest live message without removing it. Removed
    /// entries are skipped but left in place.
    pub fn get_closest_scheduled_message(&self) -> Option<&Message> {
        self.heap
            .iter()
            .filter_map(|entry| match self.slots.get(&entry.sequence) {
                Some(Slot::Live { message, .. }) => Some((entry, message)),
                _ => None,
            })
            .min_by(|(a, _), (b, _)| a.schedule_order(b))
            .map(|(_, message)| message)
    }

    /// Live message with the given id.
    pub fn find_message_by_id(&self, message_id: &str) -> Option<&Message> {
        let sequence = self.entry_finder.get(message_id)?;
        match self.slots.get(sequence) {
            Some(Slot::Live { message, .. }) => Some(message),
            _ => None,
        }
    }

    /// Priority shared by the live messages of a topic.
    ///
    /// When entries of one topic carry different priorities, the earliest
    /// entry in scheduling order wins.
    pub fn get_priority_of_topic(&self, topic_id: &str) -> Option<PriorityScore> {
        self.live_entries_in_order()
            .into_iter()
            .find(|(_, m)| m.topic_id() == topic_id)
            .map(|(entry, _)| entry.priority)
    }

    /// Priority of the topic `message` belongs to.
    pub fn get_priority_of_topic_by_message(&self, message: &Message) -> Option<PriorityScore> {
        self.get_priority_of_topic(message.topic_id())
    }

    /// Replace a tracked message, keeping its priority unless a new one is given.
    pub fn update_message(
        &mut self,
        new_message: Message,
        new_priority: Option<PriorityScore>,
    ) -> Result<(), SchedulerError> {
        let old_priority = self
            .entry_finder
            .get(new_message.message_id())
            .and_then(|sequence| match self.slots.get(sequence) {
                Some(Slot::Live { priority, .. }) => Some(*priority),
                _ => None,
            })
            .ok_or_else(|| SchedulerError::UnknownMessage(new_message.message_id().to_string()))?;
        self.remove_by_id(new_message.message_id())?;
        self.add_message(new_message, new_priority.unwrap_or(old_priority));
        Ok(())
    }

    /// Drop every entry and reset the sequence counter.
    pub fn clear_buffer(&mut self) {
        self.heap.clear();
        self.slots.clear();
        self.entry_finder.clear();
        self.next_sequence = 0;
    }

    /// Score messages per topic and upsert them.
    ///
    /// Delivered messages are skipped. Every message of a topic receives the
    /// mean of its members' phrase scores. Returns how many were inserted.
    pub fn add_messages_with_priority<C>(
        &mut self,
        messages: Vec<Message>,
        scored_phrases: &[ScoredPhrase],
        calculator: &C,
    ) -> usize
    where
        C: PriorityCalculator + ?Sized,
    {
        // Topics keep first-seen order so sequence numbers stay reproducible.
        let mut topic_index: HashMap<String, usize> = HashMap::new();
        let mut topics: Vec<Vec<Message>> = Vec::new();
        for message in messages {
            if message.status() == MessageStatus::Delivered {
                continue;
            }
            match topic_index.entry(message.topic_id().to_string()) {
                Entry::Occupied(slot) => topics[*slot.get()].push(message),
                Entry::Vacant(slot) => {
                    slot.insert(topics.len());
                    topics.push(vec![message]);
                }
            }
        }

        let mut inserted = 0;
        for members in topics {
            let priority = PriorityScore::mean(
                members
                    .iter()
                    .map(|m| calculator.calculate(&m.priority_phrase(), scored_phrases)),
            )
            .unwrap_or_default();
            if let Some(first) = members.first() {
                tracing::debug!(
                    topic = first.topic_id(),
                    priority = priority.level(),
                    members = members.len(),
                    "scored topic"
                );
            }
            for message in members {
                self.add_message(message, priority);
                inserted += 1;
            }
        }
        inserted
    }

    /// Assign conflict-free delivery times to every ready message.
    ///
    /// Entries are visited in scheduling order. A ready message is moved to
    /// at least one threshold after now, then at least one threshold after
    /// the previous message of its topic, but never past its own
    /// `max_delivery_time`. Non-ready messages only reserve their topic slot.
    /// The buffer is left untouched, so repeated calls agree.
    pub fn get_scheduled_messages_with_adjusted_delivery_times(
        &self,
        time_threshold: i64,
        midnight_timestamp: i64,
        current_timestamp: i64,
    ) -> Vec<ScheduledMessage> {
        // Saturating: restored entries bypass construction-time bounds.
        let earliest = current_timestamp
            .saturating_sub(midnight_timestamp)
            .saturating_add(time_threshold);
        let mut last_delivery_time_per_topic: HashMap<&str, i64> = HashMap::new();
        let mut scheduled = Vec::new();

        for (_, message) in self.live_entries_in_order() {
            let topic = message.topic_id();
            let mut delivery_date = message.delivery_day_time();

            if message.status() == MessageStatus::Ready {
                if earliest > delivery_date {
                    delivery_date = earliest;
                }
                if let Some(&last) = last_delivery_time_per_topic.get(topic) {
                    if delivery_date.saturating_sub(last) < time_threshold {
                        let ceiling = (message.max_delivery_time() / 1000)
                            .saturating_sub(midnight_timestamp);
                        delivery_date = last.saturating_add(time_threshold).min(ceiling);
                    }
                }
                tracing::debug!(
                    message_id = message.message_id(),
                    topic,
                    requested = message.delivery_day_time(),
                    delivery_date,
                    "scheduled message"
                );
                scheduled.push(ScheduledMessage {
                    message_id: message.message_id().to_string(),
                    status: MessageStatus::Scheduled,
                    delivery_date_ms: midnight_timestamp
                        .saturating_add(delivery_date)
                        .saturating_mul(1000),
                });
            }

            last_delivery_time_per_topic
                .entry(topic)
                .and_modify(|last| *last = (*last).max(delivery_date))
                .or_insert(delivery_date);
        }
        scheduled
    }

    fn live_messages(&self) -> impl Iterator<Item = (&Message, PriorityScore)> {
        self.slots.values().filter_map(|slot| match slot {
            Slot::Live { message, priority } => Some((message, *priority)),
            Slot::Removed => None,
        })
    }

    fn live_entries_in_order(&self) -> Vec<(HeapEntry, &Message)> {
        let mut entries: Vec<(HeapEntry, &Message)> = self
            .heap
            .iter()
            .filter_map(|entry| match self.slots.get(&entry.sequence) {
                Some(Slot::Live { message, .. }) => Some((*entry, message)),
                _ => None,
            })
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.schedule_order(b));
        entries
    }

    /// Live messages in scheduling order.
    pub fn messages_in_order(&self) -> Vec<&Message> {
        self.live_entries_in_order()
            .into_iter()
            .map(|(_, m)| m)
            .collect()
    }

    /// Serializable copy of the live entries.
    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            next_sequence: self.next_sequence,
            entries: self
                .live_entries_in_order()
                .into_iter()
                .map(|(entry, message)| EntrySnapshot {
                    scheduled_time: Some(entry.scheduled_time),
                    priority: entry.priority,
                    sequence: entry.sequence,
                    message: Some(message.clone()),
                })
                .collect(),
        }
    }

    /// Rebuild a buffer from a snapshot.
    ///
    /// Removed entries, entries without a timestamp, and duplicate ids or
    /// sequences are dropped and logged rather than failing the restore.
    pub fn restore(snapshot: BufferSnapshot) -> Self {
        let mut buffer = Self::new();
        let mut max_sequence = None;
        for entry in snapshot.entries {
            let Some(message) = entry.message else {
                continue;
            };
            let Some(scheduled_time) = entry.scheduled_time else {
                tracing::warn!(
                    message_id = message.message_id(),
                    "dropping persisted entry without scheduled_time"
                );
                continue;
            };
            if message.message_id().trim().is_empty()
                || buffer.entry_finder.contains_key(message.message_id())
                || buffer.slots.contains_key(&entry.sequence)
            {
                tracing::warn!(
                    message_id = message.message_id(),
                    sequence = entry.sequence,
                    "dropping corrupted persisted entry"
                );
                continue;
            }
            buffer.heap.push(HeapEntry {
                scheduled_time,
                priority: entry.priority,
                sequence: entry.sequence,
            });
            buffer
                .entry_finder
                .insert(message.message_id().to_string(), entry.sequence);
            buffer.slots.insert(
                entry.sequence,
                Slot::Live {
                    message,
                    priority: entry.priority,
                },
            );
            max_sequence = max_sequence.max(Some(entry.sequence));
        }
        buffer.next_sequence = snapshot
            .next_sequence
            .max(max_sequence.map_or(0, |s| s + 1));
        buffer
    }
}
