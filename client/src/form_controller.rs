//! Entry form reconciliation controller.
//!
//! On every committed date change the form resolves which stored entry
//! should pre-populate it: the exact entry for that day when one exists,
//! otherwise the most recent earlier entry, otherwise a blank form. The
//! controller owns the two-step `by-date` → `before-date` sequencing and
//! the generation bookkeeping that lets a newer committed date win over
//! any lookup still in flight for an older one; the async driver owns
//! timers and HTTP.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use shared::{CreateEntryRequest, Entry};

use crate::date_utils::{display_to_wire, wire_to_display};

/// The two lookups the resolution sequence needs, abstracted so tests can
/// substitute a scripted server.
#[async_trait]
pub trait EntryResolveApi: Send + Sync {
    /// Exact-match lookup; Ok(None) when no entry exists on that day.
    async fn entry_by_date(&self, profile_id: &str, date: &str) -> Result<Option<Entry>, String>;

    /// Nearest strictly-earlier lookup; Ok(None) when nothing precedes.
    async fn entry_before_date(
        &self,
        profile_id: &str,
        date: &str,
    ) -> Result<Option<Entry>, String>;
}

/// Resolution lifecycle of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionState {
    Idle,
    /// A committed date is being resolved (wire format).
    Loading { date: String },
    Resolved(Resolution),
}

/// How the last committed date resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An entry exists on the requested day.
    Exact,
    /// Values were taken from an earlier entry.
    Fallback,
    /// No entry at or before the requested day; the form is blank.
    None,
}

/// User-facing notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    EntryLoaded,
    PreviousEntryLoaded,
    Error,
}

/// A notification to surface as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Handle for a keystroke awaiting its debounce quiet period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputToken(u64);

/// Handle for one resolution cycle. Results carrying a ticket whose
/// generation is no longer current are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    generation: u64,
    /// The committed date, wire format.
    pub date: String,
}

/// Outcome of feeding a lookup result into the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A newer date was committed while this lookup was in flight; the
    /// result was discarded and the form untouched.
    Stale,
    /// The form was populated; surface the notice.
    Loaded(Notice),
    /// The exact lookup missed; run the before-date lookup next.
    NeedFallback,
    /// Nothing at or before the date; the form was reset blank, with no
    /// notification (the normal "first entry for this date" case).
    Blank,
}

/// Editable state of the entry form. Monetary fields are the raw input
/// strings, formatted to two decimals when populated from a resolved
/// entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    /// Date field text, display format (`DD/MM/YYYY`).
    pub entry_date: String,
    pub cash: String,
    pub checking: String,
    pub savings: String,
    pub fixed_deposits: String,
    pub brokerage: String,
    pub stocks: String,
    pub bonds: String,
    pub mutual_funds: String,
    pub etfs: String,
    pub retirement: String,
    pub pension: String,
    pub crypto: String,
    pub gold: String,
    pub real_estate: String,
    pub vehicles: String,
    pub collectibles: String,
    pub receivables: String,
    pub other_assets: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        let mut form = Self {
            entry_date: String::new(),
            cash: String::new(),
            checking: String::new(),
            savings: String::new(),
            fixed_deposits: String::new(),
            brokerage: String::new(),
            stocks: String::new(),
            bonds: String::new(),
            mutual_funds: String::new(),
            etfs: String::new(),
            retirement: String::new(),
            pension: String::new(),
            crypto: String::new(),
            gold: String::new(),
            real_estate: String::new(),
            vehicles: String::new(),
            collectibles: String::new(),
            receivables: String::new(),
            other_assets: String::new(),
        };
        form.clear_values();
        form
    }
}

impl EntryForm {
    fn field_texts(&self) -> [&str; 18] {
        [
            &self.cash,
            &self.checking,
            &self.savings,
            &self.fixed_deposits,
            &self.brokerage,
            &self.stocks,
            &self.bonds,
            &self.mutual_funds,
            &self.etfs,
            &self.retirement,
            &self.pension,
            &self.crypto,
            &self.gold,
            &self.real_estate,
            &self.vehicles,
            &self.collectibles,
            &self.receivables,
            &self.other_assets,
        ]
    }

    fn field_slots(&mut self) -> [&mut String; 18] {
        [
            &mut self.cash,
            &mut self.checking,
            &mut self.savings,
            &mut self.fixed_deposits,
            &mut self.brokerage,
            &mut self.stocks,
            &mut self.bonds,
            &mut self.mutual_funds,
            &mut self.etfs,
            &mut self.retirement,
            &mut self.pension,
            &mut self.crypto,
            &mut self.gold,
            &mut self.real_estate,
            &mut self.vehicles,
            &mut self.collectibles,
            &mut self.receivables,
            &mut self.other_assets,
        ]
    }

    /// Populate the monetary fields from a resolved entry. The date field
    /// is left alone: it shows the user's selection, which for a fallback
    /// differs from the entry's own date.
    pub fn set_values(&mut self, entry: &Entry) {
        let values = entry.asset_values();
        for (slot, value) in self.field_slots().into_iter().zip(values) {
            *slot = format!("{:.2}", value);
        }
    }

    /// Reset every monetary field to a zeroed state.
    pub fn clear_values(&mut self) {
        for slot in self.field_slots() {
            *slot = "0.00".to_string();
        }
    }

    /// Build the create request for submission.
    ///
    /// Fields parse as plain decimal numbers; an empty field counts as 0.
    pub fn to_request(&self) -> Result<CreateEntryRequest, String> {
        let entry_date = display_to_wire(&self.entry_date)
            .ok_or_else(|| format!("'{}' is not a complete DD/MM/YYYY date", self.entry_date))?;

        let names = [
            "cash",
            "checking",
            "savings",
            "fixed_deposits",
            "brokerage",
            "stocks",
            "bonds",
            "mutual_funds",
            "etfs",
            "retirement",
            "pension",
            "crypto",
            "gold",
            "real_estate",
            "vehicles",
            "collectibles",
            "receivables",
            "other_assets",
        ];
        let mut values = [0.0f64; 18];
        for (index, text) in self.field_texts().into_iter().enumerate() {
            let text = text.trim();
            let value = if text.is_empty() {
                0.0
            } else {
                text.parse::<f64>()
                    .map_err(|_| format!("'{}' is not a valid amount for {}", text, names[index]))?
            };
            if value < 0.0 {
                return Err(format!("{} must not be negative", names[index]));
            }
            values[index] = value;
        }

        Ok(CreateEntryRequest {
            entry_date,
            cash: values[0],
            checking: values[1],
            savings: values[2],
            fixed_deposits: values[3],
            brokerage: values[4],
            stocks: values[5],
            bonds: values[6],
            mutual_funds: values[7],
            etfs: values[8],
            retirement: values[9],
            pension: values[10],
            crypto: values[11],
            gold: values[12],
            real_estate: values[13],
            vehicles: values[14],
            collectibles: values[15],
            receivables: values[16],
            other_assets: values[17],
        })
    }
}

/// The reconciliation state machine behind the entry form's date field.
#[derive(Debug)]
pub struct EntryFormController {
    /// Monotonic keystroke counter; only the newest keystroke survives
    /// its debounce quiet period.
    input_seq: u64,
    pending_input: String,
    /// Monotonic resolution counter; bumped on every committed date.
    generation: u64,
    committed_date: Option<String>,
    state: ResolutionState,
    pub form: EntryForm,
}

impl EntryFormController {
    pub fn new() -> Self {
        Self {
            input_seq: 0,
            pending_input: String::new(),
            generation: 0,
            committed_date: None,
            state: ResolutionState::Idle,
            form: EntryForm::default(),
        }
    }

    pub fn state(&self) -> &ResolutionState {
        &self.state
    }

    /// Record a keystroke in the date field. The returned token commits
    /// the text after the debounce quiet period, unless a newer keystroke
    /// has arrived by then.
    pub fn note_input(&mut self, text: &str) -> InputToken {
        self.input_seq += 1;
        self.pending_input = text.to_string();
        self.form.entry_date = text.to_string();
        InputToken(self.input_seq)
    }

    /// Commit the pending input once its quiet period has elapsed.
    ///
    /// Returns None when the keystroke was superseded, when the text is
    /// not a complete valid date (inert by design), or when it names the
    /// date already committed.
    pub fn commit_pending(&mut self, token: InputToken) -> Option<ResolveTicket> {
        if token.0 != self.input_seq {
            return None;
        }
        let wire = display_to_wire(&self.pending_input)?;
        if self.committed_date.as_deref() == Some(wire.as_str()) {
            return None;
        }

        self.generation += 1;
        self.committed_date = Some(wire.clone());
        self.state = ResolutionState::Loading { date: wire.clone() };
        Some(ResolveTicket {
            generation: self.generation,
            date: wire,
        })
    }

    /// Commit a date input immediately, without debouncing. Convenience
    /// for tests and non-interactive callers.
    pub fn commit_date_input(&mut self, text: &str) -> Option<ResolveTicket> {
        let token = self.note_input(text);
        self.commit_pending(token)
    }

    fn is_stale(&self, ticket: &ResolveTicket) -> bool {
        ticket.generation != self.generation
    }

    /// Feed the `by-date` result into the controller.
    pub fn apply_exact_result(
        &mut self,
        ticket: &ResolveTicket,
        result: Option<Entry>,
    ) -> StepOutcome {
        if self.is_stale(ticket) {
            return StepOutcome::Stale;
        }

        match result {
            Some(entry) => {
                self.form.set_values(&entry);
                self.state = ResolutionState::Resolved(Resolution::Exact);
                StepOutcome::Loaded(Notice {
                    kind: NoticeKind::EntryLoaded,
                    message: format!("Entry Loaded for {}", wire_to_display(&ticket.date)),
                })
            }
            None => StepOutcome::NeedFallback,
        }
    }

    /// Feed the `before-date` result into the controller.
    ///
    /// The notice references the fallback entry's own date, not the
    /// requested one: the user must know the displayed numbers are stale
    /// relative to their selection.
    pub fn apply_fallback_result(
        &mut self,
        ticket: &ResolveTicket,
        result: Option<Entry>,
    ) -> StepOutcome {
        if self.is_stale(ticket) {
            return StepOutcome::Stale;
        }

        match result {
            Some(entry) => {
                self.form.set_values(&entry);
                self.state = ResolutionState::Resolved(Resolution::Fallback);
                StepOutcome::Loaded(Notice {
                    kind: NoticeKind::PreviousEntryLoaded,
                    message: format!(
                        "Previous Entry Loaded from {}",
                        wire_to_display(&entry.entry_date)
                    ),
                })
            }
            None => {
                self.form.clear_values();
                self.state = ResolutionState::Resolved(Resolution::None);
                StepOutcome::Blank
            }
        }
    }

    /// Feed a failed lookup into the controller. The form keeps its
    /// last-good state; no retry is attempted.
    pub fn apply_error(&mut self, ticket: &ResolveTicket, error: &str) -> Option<Notice> {
        if self.is_stale(ticket) {
            return None;
        }

        // Allow the same date to be committed again after a failure.
        self.committed_date = None;
        self.state = ResolutionState::Idle;
        Some(Notice {
            kind: NoticeKind::Error,
            message: format!("Failed to load entry: {}", error),
        })
    }
}

impl Default for EntryFormController {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one resolution cycle for a committed ticket: `by-date` first,
/// `before-date` only on a miss. Returns the notice to surface, if any.
pub async fn run_resolution<A: EntryResolveApi>(
    api: &A,
    profile_id: &str,
    controller: &Mutex<EntryFormController>,
    ticket: ResolveTicket,
) -> Option<Notice> {
    let exact = api.entry_by_date(profile_id, &ticket.date).await;

    let outcome = match exact {
        Err(error) => return controller.lock().unwrap().apply_error(&ticket, &error),
        Ok(result) => controller.lock().unwrap().apply_exact_result(&ticket, result),
    };

    match outcome {
        StepOutcome::Loaded(notice) => Some(notice),
        StepOutcome::Stale | StepOutcome::Blank => None,
        StepOutcome::NeedFallback => {
            let fallback = api.entry_before_date(profile_id, &ticket.date).await;
            match fallback {
                Err(error) => controller.lock().unwrap().apply_error(&ticket, &error),
                Ok(result) => {
                    match controller
                        .lock()
                        .unwrap()
                        .apply_fallback_result(&ticket, result)
                    {
                        StepOutcome::Loaded(notice) => Some(notice),
                        _ => None,
                    }
                }
            }
        }
    }
}

/// Debounced keystroke entry point: waits the quiet period, commits the
/// text if no newer keystroke arrived, then resolves it.
pub async fn handle_date_input<A: EntryResolveApi>(
    api: std::sync::Arc<A>,
    profile_id: String,
    controller: std::sync::Arc<Mutex<EntryFormController>>,
    text: String,
    debounce: Duration,
) -> Option<Notice> {
    let token = controller.lock().unwrap().note_input(&text);
    tokio::time::sleep(debounce).await;

    let ticket = controller.lock().unwrap().commit_pending(token)?;
    run_resolution(api.as_ref(), &profile_id, controller.as_ref(), ticket).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn entry(date: &str, cash: f64) -> Entry {
        Entry {
            id: format!("entry-{}", date),
            profile_id: "p1".to_string(),
            entry_date: date.to_string(),
            cash,
            checking: 0.0,
            savings: 0.0,
            fixed_deposits: 0.0,
            brokerage: 0.0,
            stocks: 0.0,
            bonds: 0.0,
            mutual_funds: 0.0,
            etfs: 0.0,
            retirement: 0.0,
            pension: 0.0,
            crypto: 0.0,
            gold: 0.0,
            real_estate: 0.0,
            vehicles: 0.0,
            collectibles: 0.0,
            receivables: 0.0,
            other_assets: 0.0,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    /// Scripted server double with per-step delays and call counters.
    struct MockApi {
        by_date: HashMap<String, Option<Entry>>,
        before_date: HashMap<String, Option<Entry>>,
        by_date_delay: Duration,
        before_date_delay: Duration,
        by_date_calls: AtomicUsize,
        before_date_calls: AtomicUsize,
        fail: bool,
    }

    impl MockApi {
        fn new() -> Self {
            Self {
                by_date: HashMap::new(),
                before_date: HashMap::new(),
                by_date_delay: Duration::ZERO,
                before_date_delay: Duration::ZERO,
                by_date_calls: AtomicUsize::new(0),
                before_date_calls: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl EntryResolveApi for MockApi {
        async fn entry_by_date(
            &self,
            _profile_id: &str,
            date: &str,
        ) -> Result<Option<Entry>, String> {
            self.by_date_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.by_date_delay).await;
            if self.fail {
                return Err("connection refused".to_string());
            }
            Ok(self.by_date.get(date).cloned().flatten())
        }

        async fn entry_before_date(
            &self,
            _profile_id: &str,
            date: &str,
        ) -> Result<Option<Entry>, String> {
            self.before_date_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.before_date_delay).await;
            if self.fail {
                return Err("connection refused".to_string());
            }
            Ok(self.before_date.get(date).cloned().flatten())
        }
    }

    #[test]
    fn test_incomplete_input_never_commits() {
        let mut controller = EntryFormController::new();

        for text in ["", "1", "15/01", "15/01/202", "2024-01-15"] {
            assert!(
                controller.commit_date_input(text).is_none(),
                "input {:?} must be inert",
                text
            );
        }
        assert_eq!(controller.state(), &ResolutionState::Idle);
    }

    #[test]
    fn test_same_date_does_not_recommit() {
        let mut controller = EntryFormController::new();

        assert!(controller.commit_date_input("15/01/2024").is_some());
        assert!(controller.commit_date_input("15/01/2024").is_none());
        assert!(controller.commit_date_input("16/01/2024").is_some());
    }

    #[test]
    fn test_exact_result_populates_and_notifies() {
        let mut controller = EntryFormController::new();
        let ticket = controller.commit_date_input("20/01/2024").unwrap();

        let outcome = controller.apply_exact_result(&ticket, Some(entry("2024-01-20", 200.0)));
        match outcome {
            StepOutcome::Loaded(notice) => {
                assert_eq!(notice.kind, NoticeKind::EntryLoaded);
                assert!(notice.message.contains("20/01/2024"), "{}", notice.message);
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
        assert_eq!(controller.state(), &ResolutionState::Resolved(Resolution::Exact));
        assert_eq!(controller.form.cash, "200.00");
    }

    #[test]
    fn test_fallback_notice_references_fallback_date() {
        let mut controller = EntryFormController::new();
        let ticket = controller.commit_date_input("15/01/2024").unwrap();

        assert_eq!(
            controller.apply_exact_result(&ticket, None),
            StepOutcome::NeedFallback
        );

        let outcome = controller.apply_fallback_result(&ticket, Some(entry("2024-01-10", 100.0)));
        match outcome {
            StepOutcome::Loaded(notice) => {
                assert_eq!(notice.kind, NoticeKind::PreviousEntryLoaded);
                assert!(
                    notice.message.contains("10/01/2024"),
                    "notice must carry the fallback's own date: {}",
                    notice.message
                );
                assert!(!notice.message.contains("15/01/2024"));
            }
            other => panic!("expected Loaded, got {:?}", other),
        }
        assert_eq!(
            controller.state(),
            &ResolutionState::Resolved(Resolution::Fallback)
        );
        // The date field still shows the user's selection.
        assert_eq!(controller.form.entry_date, "15/01/2024");
        assert_eq!(controller.form.cash, "100.00");
    }

    #[test]
    fn test_nothing_found_blanks_form_without_notice() {
        let mut controller = EntryFormController::new();
        controller.form.cash = "999.00".to_string();
        let ticket = controller.commit_date_input("05/01/2024").unwrap();

        assert_eq!(
            controller.apply_exact_result(&ticket, None),
            StepOutcome::NeedFallback
        );
        assert_eq!(
            controller.apply_fallback_result(&ticket, None),
            StepOutcome::Blank
        );
        assert_eq!(controller.state(), &ResolutionState::Resolved(Resolution::None));
        assert_eq!(controller.form.cash, "0.00");
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = EntryFormController::new();
        let old_ticket = controller.commit_date_input("15/01/2024").unwrap();
        let new_ticket = controller.commit_date_input("20/01/2024").unwrap();

        // The newer date resolves first.
        controller.apply_exact_result(&new_ticket, Some(entry("2024-01-20", 200.0)));

        // The older resolution arrives late and must not touch the form.
        assert_eq!(
            controller.apply_exact_result(&old_ticket, Some(entry("2024-01-15", 150.0))),
            StepOutcome::Stale
        );
        assert_eq!(
            controller.apply_fallback_result(&old_ticket, Some(entry("2024-01-10", 100.0))),
            StepOutcome::Stale
        );
        assert_eq!(controller.form.cash, "200.00");
    }

    #[test]
    fn test_error_keeps_last_good_form() {
        let mut controller = EntryFormController::new();
        let ticket = controller.commit_date_input("20/01/2024").unwrap();
        controller.apply_exact_result(&ticket, Some(entry("2024-01-20", 200.0)));

        let ticket = controller.commit_date_input("21/01/2024").unwrap();
        let notice = controller.apply_error(&ticket, "connection refused").unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(controller.form.cash, "200.00", "form keeps last-good values");

        // The failed date can be committed again (no automatic retry).
        assert!(controller.commit_date_input("21/01/2024").is_some());
    }

    #[test]
    fn test_form_to_request() {
        let mut form = EntryForm::default();
        form.entry_date = "15/01/2024".to_string();
        form.cash = "100.50".to_string();
        form.stocks = "".to_string();

        let request = form.to_request().unwrap();
        assert_eq!(request.entry_date, "2024-01-15");
        assert_eq!(request.cash, 100.50);
        assert_eq!(request.stocks, 0.0, "empty field counts as zero");

        form.bonds = "abc".to_string();
        assert!(form.to_request().is_err());

        form.bonds = "-1".to_string();
        assert!(form.to_request().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_resolution_cycle_with_fallback() {
        let mut api = MockApi::new();
        api.before_date
            .insert("2024-01-15".to_string(), Some(entry("2024-01-10", 100.0)));
        let api = Arc::new(api);
        let controller = Arc::new(Mutex::new(EntryFormController::new()));

        let notice = handle_date_input(
            api.clone(),
            "p1".to_string(),
            controller.clone(),
            "15/01/2024".to_string(),
            Duration::from_millis(300),
        )
        .await
        .unwrap();

        assert_eq!(notice.kind, NoticeKind::PreviousEntryLoaded);
        assert_eq!(api.by_date_calls.load(Ordering::SeqCst), 1);
        assert_eq!(api.before_date_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.lock().unwrap().form.cash, "100.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_keystrokes() {
        let mut api = MockApi::new();
        api.by_date
            .insert("2024-01-20".to_string(), Some(entry("2024-01-20", 200.0)));
        let api = Arc::new(api);
        let controller = Arc::new(Mutex::new(EntryFormController::new()));

        let first = tokio::spawn(handle_date_input(
            api.clone(),
            "p1".to_string(),
            controller.clone(),
            "15/01/2024".to_string(),
            Duration::from_millis(300),
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;

        let second = tokio::spawn(handle_date_input(
            api.clone(),
            "p1".to_string(),
            controller.clone(),
            "20/01/2024".to_string(),
            Duration::from_millis(300),
        ));

        let (first, second) = (first.await.unwrap(), second.await.unwrap());

        assert!(first.is_none(), "superseded keystroke never fires");
        assert_eq!(second.unwrap().kind, NoticeKind::EntryLoaded);
        assert_eq!(
            api.by_date_calls.load(Ordering::SeqCst),
            1,
            "one request despite two keystrokes"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fallback_never_overwrites_newer_exact_match() {
        // Date A misses by-date quickly but its before-date answer is
        // slow; date B is committed meanwhile and resolves exactly. A's
        // late fallback must not clobber B's values.
        let mut api = MockApi::new();
        api.by_date
            .insert("2024-01-20".to_string(), Some(entry("2024-01-20", 200.0)));
        api.before_date
            .insert("2024-01-15".to_string(), Some(entry("2024-01-10", 100.0)));
        api.by_date_delay = Duration::from_millis(50);
        api.before_date_delay = Duration::from_millis(500);
        let api = Arc::new(api);
        let controller = Arc::new(Mutex::new(EntryFormController::new()));

        let ticket_a = controller
            .lock()
            .unwrap()
            .commit_date_input("15/01/2024")
            .unwrap();
        let task_a = {
            let api = api.clone();
            let controller = controller.clone();
            tokio::spawn(async move {
                run_resolution(api.as_ref(), "p1", controller.as_ref(), ticket_a).await
            })
        };

        // The user edits the date while A is still resolving.
        tokio::time::sleep(Duration::from_millis(100)).await;
        let ticket_b = controller
            .lock()
            .unwrap()
            .commit_date_input("20/01/2024")
            .unwrap();
        let task_b = {
            let api = api.clone();
            let controller = controller.clone();
            tokio::spawn(async move {
                run_resolution(api.as_ref(), "p1", controller.as_ref(), ticket_b).await
            })
        };

        let notice_a = task_a.await.unwrap();
        let notice_b = task_b.await.unwrap();

        assert!(notice_a.is_none(), "the superseded cycle surfaces nothing");
        assert_eq!(notice_b.unwrap().kind, NoticeKind::EntryLoaded);
        assert_eq!(
            api.before_date_calls.load(Ordering::SeqCst),
            1,
            "A's fallback did fire, and was discarded on arrival"
        );

        let controller = controller.lock().unwrap();
        assert_eq!(controller.form.cash, "200.00", "B's exact values stand");
        assert_eq!(
            controller.state(),
            &ResolutionState::Resolved(Resolution::Exact)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_surfaces_one_error_notice() {
        let mut api = MockApi::new();
        api.fail = true;
        let api = Arc::new(api);
        let controller = Arc::new(Mutex::new(EntryFormController::new()));

        let notice = handle_date_input(
            api.clone(),
            "p1".to_string(),
            controller.clone(),
            "15/01/2024".to_string(),
            Duration::from_millis(300),
        )
        .await
        .unwrap();

        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(
            api.before_date_calls.load(Ordering::SeqCst),
            0,
            "no fallback attempt after a failed exact lookup"
        );
        assert_eq!(controller.lock().unwrap().form.cash, "0.00");
    }
}
