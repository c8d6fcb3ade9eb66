//! Outcome view state.
//!
//! `OutcomeView` is the single owner of everything the outcome page shows:
//! the case store snapshot, the derived cards, the side-state keyed off the
//! active card, and the verdict orchestration memory. All derived values are
//! recomputed synchronously after each mutation.

pub mod render;
pub mod theme;

pub use render::render;

use outcomes_adapters::{CaseStore, Config, VerdictTicket};
use outcomes_core::guard::{check_mount, resolve_case_id, Alert, MountDecision, Navigation};
use outcomes_core::status::{build_cards, Card, Completion};
use outcomes_core::verdict::classify::primary_text;
use outcomes_core::verdict::{
    classify_verdict, OrchestratorInputs, VerdictAction, VerdictDisplay,
    VerdictOrchestrator, WarningContent, WarningExtractor,
};
use outcomes_core::view::{
    annotation_images, card_badge, fraud_image, kpi_view, result_panel, CardBadge,
    ExpansionState, FraudImageToggle, KpiView, ResultPage, ResultPanel, SelectionState,
    StatusPopover,
};
use outcomes_core::{FetchError, VerdictData};
use tracing::info;

// ═══════════════════════════════════════════════════════════════════════════
//  VIEW STATE
// ═══════════════════════════════════════════════════════════════════════════

pub struct OutcomeView {
    // Core data
    store: CaseStore,
    navigation_case_id: Option<String>,

    // Derived from the store
    cards: Vec<Card>,
    completion: Completion,

    // Side-state
    selection: SelectionState,
    expansion: ExpansionState,
    fraud_image: FraudImageToggle,
    page: ResultPage,
    status_popover: StatusPopover,

    // Verdict
    orchestrator: VerdictOrchestrator,
    warnings: WarningExtractor,
    replenish_upload_count: u32,

    // Mount guard outcome, evaluated once
    mount: MountDecision,
    pending_navigation: Option<Navigation>,
}

impl OutcomeView {
    /// Build the view and run the mount guard against `route_case_id`.
    pub fn new(
        store: CaseStore,
        navigation_case_id: Option<String>,
        route_case_id: Option<&str>,
        config: &Config,
    ) -> Self {
        let cards = build_cards(store.document_groups(), store.upload_statuses());
        let completion = Completion::of(&cards);
        let selection = SelectionState::new(store.document_groups());
        let active_case = resolve_case_id(navigation_case_id.as_deref(), store.upload_summary());
        let mount = check_mount(route_case_id, active_case.as_deref());
        let pending_navigation = match &mount {
            MountDecision::Redirect { navigation, .. } => Some(navigation.clone()),
            MountDecision::Allowed => None,
        };

        let mut view = Self {
            store,
            navigation_case_id,
            cards,
            completion,
            selection,
            expansion: ExpansionState::default(),
            fraud_image: FraudImageToggle::default(),
            page: ResultPage::default(),
            status_popover: StatusPopover::default(),
            orchestrator: VerdictOrchestrator::new(),
            warnings: WarningExtractor::new(config.warning_swap_threshold),
            replenish_upload_count: config.replenish_upload_count,
            mount,
            pending_navigation,
        };
        view.observe_fraud_gate();
        view
    }

    pub fn mount_decision(&self) -> &MountDecision {
        &self.mount
    }

    pub fn alert(&self) -> Option<&Alert> {
        match &self.mount {
            MountDecision::Redirect { alert, .. } => Some(alert),
            MountDecision::Allowed => None,
        }
    }

    /// Navigation requested by the view that the host has not acted on yet.
    pub fn take_navigation(&mut self) -> Option<Navigation> {
        self.pending_navigation.take()
    }

    pub fn store(&self) -> &CaseStore {
        &self.store
    }

    /// Apply an external store change and recompute everything derived.
    pub fn update_store(&mut self, update: impl FnOnce(&mut CaseStore)) {
        update(&mut self.store);
        self.refresh();
    }

    pub fn case_id(&self) -> Option<String> {
        resolve_case_id(self.navigation_case_id.as_deref(), self.store.upload_summary())
    }

    fn refresh(&mut self) {
        self.cards = build_cards(self.store.document_groups(), self.store.upload_statuses());
        self.completion = Completion::of(&self.cards);
        if self.selection.reconcile(self.store.document_groups()) {
            self.on_selection_changed();
        }
        self.observe_fraud_gate();
    }

    fn on_selection_changed(&mut self) {
        self.fraud_image.hide();
        self.status_popover.close();
    }

    fn observe_fraud_gate(&mut self) {
        let key = self.selection.active_key().map(str::to_string);
        let image = fraud_image(key.as_deref(), self.active_card()).cloned();
        self.fraud_image.observe(key.as_deref(), image.as_ref());
    }

    // ── Cards and selection ─────────────────────────────────────────────

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn active_key(&self) -> Option<&str> {
        self.selection.active_key()
    }

    /// The selected card, falling back to the first one.
    pub fn active_card(&self) -> Option<&Card> {
        self.active_key()
            .and_then(|key| self.cards.iter().find(|card| card.key == key))
            .or_else(|| self.cards.first())
    }

    pub fn select(&mut self, key: &str) -> bool {
        if !self.selection.select(key, self.store.document_groups()) {
            return false;
        }
        self.on_selection_changed();
        self.observe_fraud_gate();
        true
    }

    pub fn is_expanded(&self) -> bool {
        self.active_card()
            .is_some_and(|card| self.expansion.is_expanded(&card.key))
    }

    pub fn toggle_expanded(&mut self) -> bool {
        let Some(key) = self.active_card().map(|card| card.key.clone()) else {
            return false;
        };
        self.expansion.toggle(&key)
    }

    pub fn status_popover_open(&self) -> bool {
        self.status_popover.is_open()
    }

    pub fn toggle_status_popover(&mut self) -> bool {
        self.status_popover.toggle()
    }

    // ── Fraud image and result pages ────────────────────────────────────

    pub fn can_toggle_fraud_image(&self) -> bool {
        self.fraud_image.can_toggle()
    }

    pub fn fraud_image_revealed(&self) -> bool {
        self.fraud_image.is_revealed()
    }

    /// Show the alternate image on the annotations page.
    pub fn reveal_fraud_image(&mut self) -> bool {
        if !self.fraud_image.reveal() {
            return false;
        }
        self.page = ResultPage::Annotations;
        true
    }

    pub fn hide_fraud_image(&mut self) {
        self.fraud_image.hide();
    }

    pub fn page(&self) -> ResultPage {
        self.page
    }

    pub fn flip_page(&mut self) -> ResultPage {
        self.fraud_image.hide();
        self.page = self.page.flip();
        self.page
    }

    /// The KPI page is height-clamped unless the card is expanded.
    pub fn content_clamped(&self) -> bool {
        self.page == ResultPage::Kpis && !self.is_expanded()
    }

    pub fn badge(&self) -> Option<CardBadge> {
        self.active_card()
            .map(|card| card_badge(card, self.can_toggle_fraud_image()))
    }

    pub fn result_panel(&self) -> Option<ResultPanel> {
        self.active_card().map(result_panel)
    }

    pub fn kpi_view(&self) -> KpiView {
        kpi_view(self.active_key(), self.active_card())
    }

    pub fn annotation_images(&self) -> Vec<String> {
        let card = self.active_card();
        let revealed = if self.fraud_image_revealed() {
            fraud_image(self.active_key(), card)
        } else {
            None
        };
        annotation_images(card, revealed)
    }

    // ── Verdict ─────────────────────────────────────────────────────────

    pub fn orchestrator_inputs(&self) -> OrchestratorInputs {
        let verdict = self.store.final_verdict();
        OrchestratorInputs {
            case_id: self.case_id(),
            all_completed: self.completion.all_completed,
            status: verdict.status,
            verdict_uuid: verdict.verdict_uuid().map(str::to_string),
        }
    }

    /// Evaluate the fetch rule against the current state and start a fetch
    /// if it asks for one.
    pub fn reconcile_verdict(&mut self) -> Option<VerdictTicket> {
        let inputs = self.orchestrator_inputs();
        let action = self.orchestrator.reconcile(&inputs);
        self.dispatch(action)
    }

    /// User-initiated retry.
    pub fn retry_verdict(&mut self) -> Option<VerdictTicket> {
        let inputs = self.orchestrator_inputs();
        let action = self.orchestrator.retry(&inputs);
        self.dispatch(action)
    }

    fn dispatch(&mut self, action: VerdictAction) -> Option<VerdictTicket> {
        let VerdictAction::Fetch { case_id, reason } = action else {
            return None;
        };
        let ticket = self.store.request_verdict(&case_id)?;
        let dispatched = self.orchestrator_inputs();
        self.orchestrator.record_dispatch(&dispatched);
        info!(
            case_id = %case_id,
            request_id = ticket.request_id,
            reason = reason.as_str(),
            "dispatching verdict fetch"
        );
        Some(ticket)
    }

    pub fn complete_verdict(
        &mut self,
        request_id: u64,
        outcome: Result<VerdictData, FetchError>,
    ) -> bool {
        self.store.complete_verdict(request_id, outcome)
    }

    /// Fail the in-flight fetch when its task died without reporting back.
    pub fn abandon_verdict_request(&mut self, detail: String) -> bool {
        let Some(request_id) = self.store.active_request().map(|t| t.request_id) else {
            return false;
        };
        self.store
            .complete_verdict(request_id, Err(FetchError::Aborted(detail)))
    }

    pub fn verdict_in_flight(&self) -> bool {
        self.store.active_request().is_some()
    }

    pub fn verdict_display(&self) -> VerdictDisplay {
        classify_verdict(self.completion.all_completed, self.store.final_verdict())
    }

    pub fn warning_content(&self) -> WarningContent {
        let verdict = self.store.final_verdict();
        let verdict_text = primary_text(verdict.data.as_ref());
        self.warnings.extract(verdict.error.as_ref(), &verdict_text)
    }

    // ── Leaving the view ────────────────────────────────────────────────

    /// Keep the case, grant more uploads and go back to the upload page.
    pub fn try_another_document(&mut self) -> Navigation {
        self.store.set_remaining_count(self.replenish_upload_count);
        Navigation::home()
    }

    /// Drop the case entirely and go back to the upload page.
    pub fn restart(&mut self) -> Navigation {
        self.store.reset_case();
        self.store.set_remaining_count(0);
        self.navigation_case_id = None;
        self.orchestrator.reset();
        self.refresh();
        Navigation::home()
    }
}
