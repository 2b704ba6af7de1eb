use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::persistence::{self, ReportSlot};
use crate::report::{Report, ReportDraft, ReportId};

pub type Clock = fn() -> DateTime<Utc>;

/// Hands out time-derived ids that never repeat, even when the clock
/// stalls or runs behind ids restored from storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdAllocator {
    last: Option<u64>,
}

impl IdAllocator {
    pub fn observe(&mut self, id: ReportId) {
        self.last = Some(self.last.map_or(id.0, |last| last.max(id.0)));
    }

    /// `None` once the id space above the highest observed id is used up.
    pub fn next(&mut self, now_ms: u64) -> Option<ReportId> {
        let id = match self.last {
            Some(last) => now_ms.max(last.checked_add(1)?),
            None => now_ms,
        };
        self.last = Some(id);
        Some(ReportId(id))
    }
}

/// Owns the canonical, append-only report collection and its slot.
#[derive(Debug)]
pub struct ReportStore<S> {
    slot: S,
    reports: Vec<Report>,
    ids: IdAllocator,
    clock: Clock,
}

impl<S: ReportSlot> ReportStore<S> {
    /// Restores whatever the slot holds; corrupt or missing data starts empty.
    pub fn initialize(slot: S) -> Self {
        let reports = persistence::load(&slot);
        let mut ids = IdAllocator::default();
        for report in &reports {
            ids.observe(report.id);
        }

        Self {
            slot,
            reports,
            ids,
            clock: Utc::now,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Appends a new report and persists the whole collection.
    ///
    /// A failed write is logged; the report stays in memory.
    pub fn add(&mut self, draft: ReportDraft) -> Report {
        let now_ms = u64::try_from(self.now().timestamp_millis()).unwrap_or(0);
        let id = match self.ids.next(now_ms) {
            Some(id) => id,
            None => self.lowest_free_id(),
        };
        let report = Report::from_draft(id, draft);
        self.reports.push(report.clone());

        match persistence::save(&mut self.slot, &self.reports) {
            Ok(()) => info!(id = %report.id, count = self.reports.len(), "report added"),
            Err(e) => error!(error = %e, id = %report.id, "failed to persist reports"),
        }

        report
    }

    /// Restored ids can sit at the top of the id space; reuse a gap instead.
    fn lowest_free_id(&self) -> ReportId {
        let taken: HashSet<u64> = self.reports.iter().map(|r| r.id.value()).collect();
        // The collection is far smaller than the id space, so a gap exists.
        let id = (0..=u64::MAX).find(|candidate| !taken.contains(candidate)).unwrap_or(0);
        warn!(id, "id space exhausted above restored ids; using lowest free id");
        ReportId(id)
    }

    pub fn all(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }
}

impl<S: ReportSlot + Default> Default for ReportStore<S> {
    fn default() -> Self {
        Self::initialize(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemorySlot, SlotError};
    use crate::report::{Coordinate, Severity};
    use proptest::prelude::*;

    fn fixed_clock() -> DateTime<Utc> {
        "2025-01-01T00:00:00Z".parse().unwrap()
    }

    fn draft(title: &str) -> ReportDraft {
        ReportDraft {
            title: title.into(),
            description: "x".into(),
            severity: Severity::Low,
            timestamp: fixed_clock(),
            location: Coordinate::new(41.0, 29.0).unwrap(),
        }
    }

    struct BrokenSlot;

    impl ReportSlot for BrokenSlot {
        fn read(&self) -> Result<Option<Vec<u8>>, SlotError> {
            Err(SlotError::Storage("unavailable".into()))
        }

        fn write(&mut self, _bytes: Vec<u8>) -> Result<(), SlotError> {
            Err(SlotError::Storage("read-only".into()))
        }
    }

    #[test]
    fn add_appends_in_creation_order() {
        let mut store = ReportStore::initialize(MemorySlot::new());

        let a = store.add(draft("a"));
        let b = store.add(draft("b"));

        let titles: Vec<_> = store.all().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a", "b"]);
        assert_eq!(store.get(a.id), Some(&a));
        assert_eq!(store.get(b.id), Some(&b));
    }

    #[test]
    fn ids_stay_unique_with_a_frozen_clock() {
        let mut store = ReportStore::initialize(MemorySlot::new()).with_clock(fixed_clock);

        let ids: Vec<_> = (0..5).map(|i| store.add(draft(&i.to_string())).id).collect();

        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn ids_never_reuse_restored_ids() {
        let mut first = ReportStore::initialize(MemorySlot::new()).with_clock(fixed_clock);
        let old = first.add(draft("old"));

        let slot = first.slot().clone();
        let mut second = ReportStore::initialize(slot).with_clock(fixed_clock);
        let new = second.add(draft("new"));

        assert!(new.id > old.id);
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn allocator_stops_at_the_top_of_the_id_space() {
        let mut ids = IdAllocator::default();
        ids.observe(ReportId(u64::MAX));

        assert_eq!(ids.next(0), None);
    }

    #[test]
    fn restored_max_id_is_not_reused() {
        let json = format!(
            r#"[{{"id":{},"title":"old","description":"x","severity":"Low","timestamp":"2025-01-01T00:00:00Z","lat":41.0,"lng":29.0}}]"#,
            u64::MAX
        );
        let mut store = ReportStore::initialize(MemorySlot::with_bytes(json)).with_clock(fixed_clock);
        assert_eq!(store.len(), 1);

        let first = store.add(draft("first"));
        let second = store.add(draft("second"));

        let ids: HashSet<_> = store.all().iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(first.id, ReportId(u64::MAX));
        assert_ne!(second.id, first.id);
        assert_eq!(persistence::load(store.slot()), store.all());
    }

    #[test]
    fn every_add_persists_the_full_collection() {
        let mut store = ReportStore::initialize(MemorySlot::new());
        store.add(draft("a"));
        store.add(draft("b"));

        let persisted = persistence::load(store.slot());
        assert_eq!(persisted, store.all());
    }

    #[test]
    fn corrupt_slot_starts_empty_and_accepts_adds() {
        let mut store = ReportStore::initialize(MemorySlot::with_bytes("not json"));
        assert!(store.is_empty());

        let report = store.add(draft("a"));

        assert_eq!(store.all(), [report]);
        assert_eq!(persistence::load(store.slot()).len(), 1);
    }

    #[test]
    fn write_failure_keeps_report_in_memory() {
        let mut store = ReportStore::initialize(BrokenSlot);

        store.add(draft("a"));

        assert_eq!(store.len(), 1);
    }

    proptest! {
        #[test]
        fn ids_unique_for_any_clock_sequence(times in proptest::collection::vec(0u64..5_000, 1..40)) {
            let mut ids = IdAllocator::default();
            let mut seen = HashSet::new();
            for t in times {
                let id = ids.next(t);
                prop_assert!(id.is_some());
                prop_assert!(seen.insert(id));
            }
        }
    }
}
