use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::domain::Quiz;

pub const GUEST_SESSION_COOKIE: &str = "quizcraft_session";

struct GuestSlot {
    quiz: Quiz,
    touched_at: DateTime<Utc>,
}

/// One quiz slot per anonymous session, kept in memory.
///
/// Slots expire `ttl` after their last use. Expired slots are dropped lazily
/// on access and by `purge_expired`.
pub struct GuestSessionStore {
    ttl: Duration,
    slots: RwLock<HashMap<String, GuestSlot>>,
}

impl GuestSessionStore {
    pub fn new(ttl_minutes: i64) -> Self {
        Self::with_ttl(Duration::minutes(ttl_minutes))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn new_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn is_expired(&self, slot: &GuestSlot, now: DateTime<Utc>) -> bool {
        now - slot.touched_at >= self.ttl
    }

    /// Stores `quiz`, replacing whatever the session held before.
    pub async fn put(&self, session_id: &str, quiz: Quiz) {
        let mut slots = self.slots.write().await;
        slots.insert(
            session_id.to_string(),
            GuestSlot {
                quiz,
                touched_at: Utc::now(),
            },
        );
    }

    pub async fn get(&self, session_id: &str) -> Option<Quiz> {
        let now = Utc::now();
        let mut slots = self.slots.write().await;

        let expired = match slots.get_mut(session_id) {
            Some(slot) if !self.is_expired(slot, now) => {
                slot.touched_at = now;
                return Some(slot.quiz.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            slots.remove(session_id);
        }
        None
    }

    /// Drops every expired slot and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut slots = self.slots.write().await;
        let before = slots.len();
        slots.retain(|_, slot| !self.is_expired(slot, now));
        before - slots.len()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.slots.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuizType;

    fn quiz(title: &str) -> Quiz {
        Quiz::new(title, QuizType::ShortAnswer, 5, vec![], None)
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = GuestSessionStore::new(30);
        store.put("s1", quiz("First")).await;

        assert_eq!(store.get("s1").await.unwrap().title, "First");
        assert!(store.get("s2").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_the_slot() {
        let store = GuestSessionStore::new(30);
        store.put("s1", quiz("First")).await;
        store.put("s1", quiz("Second")).await;

        assert_eq!(store.get("s1").await.unwrap().title, "Second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_slots_are_invisible_and_purged() {
        let store = GuestSessionStore::with_ttl(Duration::zero());
        store.put("s1", quiz("Gone")).await;
        store.put("s2", quiz("Gone too")).await;

        assert!(store.get("s1").await.is_none());
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 0);
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(
            GuestSessionStore::new_session_id(),
            GuestSessionStore::new_session_id()
        );
    }
}
