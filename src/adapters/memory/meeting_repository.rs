//! In-memory MeetingRepository for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{CycleId, DomainError, ErrorCode, MeetingId, MeetingStatus};
use crate::domain::meeting::Meeting;
use crate::ports::MeetingRepository;

/// In-memory meeting store with error injection.
///
/// For tests only; production uses the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryMeetingRepository {
    meetings: Mutex<HashMap<MeetingId, Meeting>>,
    fail_writes: Mutex<bool>,
}

impl InMemoryMeetingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with meetings.
    pub fn with_meetings(meetings: impl IntoIterator<Item = Meeting>) -> Self {
        let repo = Self::new();
        {
            let mut store = repo.meetings.lock().expect("lock poisoned");
            for meeting in meetings {
                store.insert(meeting.id(), meeting);
            }
        }
        repo
    }

    /// Makes every subsequent write fail with `DatabaseError`.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().expect("lock poisoned") = true;
    }

    /// Returns a snapshot of a stored meeting (for test assertions).
    pub fn get(&self, id: &MeetingId) -> Option<Meeting> {
        self.meetings.lock().expect("lock poisoned").get(id).cloned()
    }

    /// Returns the number of stored meetings (for test assertions).
    pub fn len(&self) -> usize {
        self.meetings.lock().expect("lock poisoned").len()
    }

    /// Returns true when the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if *self.fail_writes.lock().expect("lock poisoned") {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated write failure",
            ));
        }
        Ok(())
    }

    fn of_cycle(&self, cycle_id: &CycleId) -> Vec<Meeting> {
        let mut meetings: Vec<Meeting> = self
            .meetings
            .lock()
            .expect("lock poisoned")
            .values()
            .filter(|m| m.cycle_id() == *cycle_id)
            .cloned()
            .collect();
        meetings.sort_by_key(|m| (m.date(), m.start_time()));
        meetings
    }
}

#[async_trait]
impl MeetingRepository for InMemoryMeetingRepository {
    async fn save(&self, meeting: &Meeting) -> Result<(), DomainError> {
        self.check_writable()?;
        self.meetings
            .lock()
            .expect("lock poisoned")
            .insert(meeting.id(), meeting.clone());
        Ok(())
    }

    async fn save_all(&self, meetings: &[Meeting]) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut store = self.meetings.lock().expect("lock poisoned");
        for meeting in meetings {
            store.insert(meeting.id(), meeting.clone());
        }
        Ok(())
    }

    async fn update(&self, meeting: &Meeting) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut store = self.meetings.lock().expect("lock poisoned");
        if !store.contains_key(&meeting.id()) {
            return Err(DomainError::new(
                ErrorCode::MeetingNotFound,
                format!("Meeting not found: {}", meeting.id()),
            ));
        }
        store.insert(meeting.id(), meeting.clone());
        Ok(())
    }

    async fn save_postponement(
        &self,
        original: &Meeting,
        successor: &Meeting,
    ) -> Result<(), DomainError> {
        self.check_writable()?;
        let mut store = self.meetings.lock().expect("lock poisoned");
        store.insert(original.id(), original.clone());
        store.insert(successor.id(), successor.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &MeetingId) -> Result<Option<Meeting>, DomainError> {
        Ok(self.get(id))
    }

    async fn find_by_cycle_id(&self, cycle_id: &CycleId) -> Result<Vec<Meeting>, DomainError> {
        Ok(self.of_cycle(cycle_id))
    }

    async fn latest_date_for_cycle(
        &self,
        cycle_id: &CycleId,
    ) -> Result<Option<NaiveDate>, DomainError> {
        Ok(self.of_cycle(cycle_id).last().map(|m| m.date()))
    }

    async fn count_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        Ok(self.of_cycle(cycle_id).len() as u32)
    }

    async fn count_completed_by_cycle_id(&self, cycle_id: &CycleId) -> Result<u32, DomainError> {
        Ok(self
            .of_cycle(cycle_id)
            .iter()
            .filter(|m| m.status() == MeetingStatus::Completed)
            .count() as u32)
    }

    async fn find_scheduled_after(
        &self,
        cycle_id: &CycleId,
        after: NaiveDate,
    ) -> Result<Vec<Meeting>, DomainError> {
        Ok(self
            .of_cycle(cycle_id)
            .into_iter()
            .filter(|m| m.status() == MeetingStatus::Scheduled && m.date() > after)
            .collect())
    }

    async fn delete(&self, id: &MeetingId) -> Result<(), DomainError> {
        self.check_writable()?;
        self.meetings.lock().expect("lock poisoned").remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    use crate::domain::foundation::{ActivityType, InstructorRole, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn meeting_on(cycle_id: CycleId, d: NaiveDate) -> Meeting {
        Meeting::schedule(
            cycle_id,
            d,
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            None,
            InstructorRole::Lead,
            ActivityType::Frontal,
        )
    }

    #[tokio::test]
    async fn find_by_cycle_is_ordered_by_date() {
        let cycle_id = CycleId::new();
        let repo = InMemoryMeetingRepository::with_meetings([
            meeting_on(cycle_id, date(2025, 1, 20)),
            meeting_on(cycle_id, date(2025, 1, 6)),
            meeting_on(cycle_id, date(2025, 1, 13)),
        ]);

        let meetings = repo.find_by_cycle_id(&cycle_id).await.unwrap();
        let dates: Vec<NaiveDate> = meetings.iter().map(|m| m.date()).collect();

        assert_eq!(
            dates,
            vec![date(2025, 1, 6), date(2025, 1, 13), date(2025, 1, 20)]
        );
    }

    #[tokio::test]
    async fn latest_date_reflects_all_statuses() {
        let cycle_id = CycleId::new();
        let mut cancelled = meeting_on(cycle_id, date(2025, 2, 3));
        cancelled.cancel("holiday closure").unwrap();

        let repo = InMemoryMeetingRepository::with_meetings([
            meeting_on(cycle_id, date(2025, 1, 6)),
            cancelled,
        ]);

        let latest = repo.latest_date_for_cycle(&cycle_id).await.unwrap();
        assert_eq!(latest, Some(date(2025, 2, 3)));
    }

    #[tokio::test]
    async fn scheduled_after_excludes_terminal_and_past() {
        let cycle_id = CycleId::new();
        let mut done = meeting_on(cycle_id, date(2025, 3, 3));
        done.complete(UserId::new("admin").unwrap(), 0).unwrap();

        let repo = InMemoryMeetingRepository::with_meetings([
            meeting_on(cycle_id, date(2025, 1, 6)),
            meeting_on(cycle_id, date(2025, 2, 10)),
            done,
        ]);

        let upcoming = repo
            .find_scheduled_after(&cycle_id, date(2025, 1, 31))
            .await
            .unwrap();

        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].date(), date(2025, 2, 10));
    }

    #[tokio::test]
    async fn counts_track_completion() {
        let cycle_id = CycleId::new();
        let mut done = meeting_on(cycle_id, date(2025, 1, 6));
        done.complete(UserId::new("admin").unwrap(), 0).unwrap();

        let repo = InMemoryMeetingRepository::with_meetings([
            done,
            meeting_on(cycle_id, date(2025, 1, 13)),
        ]);

        assert_eq!(repo.count_by_cycle_id(&cycle_id).await.unwrap(), 2);
        assert_eq!(
            repo.count_completed_by_cycle_id(&cycle_id).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let cycle_id = CycleId::new();
        let meeting = meeting_on(cycle_id, date(2025, 1, 6));
        let id = meeting.id();
        let repo = InMemoryMeetingRepository::with_meetings([meeting]);

        repo.delete(&id).await.unwrap();

        assert!(repo.find_by_id(&id).await.unwrap().is_none());
    }
}
