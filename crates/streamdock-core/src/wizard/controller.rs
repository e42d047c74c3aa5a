//! The create/attach stream wizard: state, navigation, search, host events.
//!
//! All mutable state sits behind one mutex that is never held across an
//! await, so host events and searches can interleave with a pending commit.
//! Commit protocols live in `commit.rs`.

use std::sync::mpsc::Receiver;
use std::sync::{Mutex, MutexGuard, PoisonError};

use streamdock_config::ConnectorConfig;
use tracing::{debug, error, info, warn};

use super::errors::SessionError;
use super::events::{CloseReason, ControllerEvent, EventBus};
use super::loading::LoadingState;
use super::notifications::Notifications;
use super::types::{Draft, Operation, WizardStep};
use super::validation::validate_stream_name;
use crate::collaborators::CollaboratorSet;
use crate::errors::ConnectorError;
use crate::filters::{FilterCatalog, FilterKind};
use crate::host::{AccountProvider, HostEvent, HostSelectionProvider};
use crate::registry::AttachedStreamRegistry;
use crate::remote::{Account, RemoteStream, RemoteStreamClient, UserRef};
use crate::search::{DebouncedSearch, SearchOutcome};

pub(super) struct ControllerState {
    pub(super) step: WizardStep,
    pub(super) draft: Draft,
    pub(super) catalog: FilterCatalog,
    pub(super) account: Option<Account>,
    pub(super) stream_query: String,
    pub(super) selected_stream: Option<RemoteStream>,
    pub(super) user_query: String,
    pub(super) selected_user: Option<UserRef>,
    pub(super) selection_count: usize,
    pub(super) active_view_name: String,
    pub(super) loading: LoadingState,
    pub(super) notifications: Notifications,
    pub(super) closed: bool,
}

/// Drives one create/attach dialog from first keystroke to commit.
///
/// Collaborators are injected; the controller holds no global state. Every
/// user-facing failure is returned to the caller, pushed as a notification,
/// and leaves the wizard on a step the user can retry from.
pub struct SessionController<C, H, A> {
    pub(super) client: C,
    pub(super) host: H,
    pub(super) accounts: A,
    pub(super) registry: AttachedStreamRegistry,
    pub(super) config: ConnectorConfig,
    pub(super) state: Mutex<ControllerState>,
    pub(super) stream_search: DebouncedSearch<RemoteStream>,
    pub(super) user_search: DebouncedSearch<UserRef>,
    pub(super) events: EventBus,
}

impl<C, H, A> SessionController<C, H, A>
where
    C: RemoteStreamClient,
    H: HostSelectionProvider,
    A: AccountProvider,
{
    pub fn new(
        client: C,
        host: H,
        accounts: A,
        registry: AttachedStreamRegistry,
        config: ConnectorConfig,
    ) -> Self {
        let catalog = FilterCatalog::from_host(&host);
        let selection_count = host.current_selection_ids().len();
        let active_view_name = host.active_view_name();
        let account = accounts.default_account();

        info!(
            event = "core.session.wizard_opened",
            filter_count = catalog.filters().len(),
            attached_count = registry.len(),
            has_account = account.is_some()
        );

        Self {
            stream_search: DebouncedSearch::from_config(&config.search),
            user_search: DebouncedSearch::from_config(&config.search),
            state: Mutex::new(ControllerState {
                step: WizardStep::Name,
                draft: Draft::default(),
                catalog,
                account,
                stream_query: String::new(),
                selected_stream: None,
                user_query: String::new(),
                selected_user: None,
                selection_count,
                active_view_name,
                loading: LoadingState::new(),
                notifications: Notifications::new(config.notifications.ttl()),
                closed: false,
            }),
            client,
            host,
            accounts,
            registry,
            config,
            events: EventBus::new(),
        }
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscribe(&self) -> Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn registry(&self) -> &AttachedStreamRegistry {
        &self.registry
    }

    pub fn step(&self) -> WizardStep {
        self.lock().step
    }

    pub fn draft(&self) -> Draft {
        self.lock().draft.clone()
    }

    pub fn catalog(&self) -> FilterCatalog {
        self.lock().catalog.clone()
    }

    pub fn collaborators(&self) -> CollaboratorSet {
        self.lock().draft.collaborators.clone()
    }

    pub fn stream_query(&self) -> String {
        self.lock().stream_query.clone()
    }

    pub fn user_query(&self) -> String {
        self.lock().user_query.clone()
    }

    pub fn selected_stream(&self) -> Option<RemoteStream> {
        self.lock().selected_stream.clone()
    }

    pub fn stream_search_results(&self) -> Vec<RemoteStream> {
        self.stream_search.results()
    }

    pub fn user_search_results(&self) -> Vec<UserRef> {
        self.user_search.results()
    }

    /// Notifications that have not yet expired.
    pub fn notifications(&self) -> Vec<String> {
        self.lock().notifications.active()
    }

    pub fn selection_count(&self) -> usize {
        self.lock().selection_count
    }

    pub fn active_view_name(&self) -> String {
        self.lock().active_view_name.clone()
    }

    pub fn active_view_objects(&self) -> Vec<String> {
        self.host.objects_in_active_view()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.list_accounts()
    }

    pub fn account(&self) -> Option<Account> {
        self.lock().account.clone()
    }

    pub fn is_create_in_progress(&self) -> bool {
        self.lock().loading.is_loading(Operation::Create)
    }

    pub fn is_attach_in_progress(&self) -> bool {
        self.lock().loading.is_loading(Operation::Attach)
    }

    pub fn can_attach_existing(&self) -> bool {
        let state = self.lock();
        !state.closed && state.selected_stream.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Account for remote calls: the chosen one, else the provider's default.
    pub(super) fn active_account(&self) -> Option<Account> {
        let chosen = self.lock().account.clone();
        chosen.or_else(|| self.accounts.default_account())
    }

    /// Log a failure, queue it as a notification, and flag validation failures.
    pub(super) fn report(&self, error: &SessionError) {
        if error.is_user_error() {
            warn!(
                event = "core.session.operation_rejected",
                error_code = error.error_code(),
                error = %error
            );
        } else {
            error!(
                event = "core.session.operation_failed",
                error_code = error.error_code(),
                error = %error
            );
        }

        self.lock().notifications.push(error.to_string());

        if let SessionError::Validation { message } = error {
            self.events.publish(ControllerEvent::ValidationFailed {
                message: message.clone(),
            });
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.lock().closed {
            return Err(SessionError::DialogClosed);
        }
        Ok(())
    }

    pub(super) fn with_report<T>(&self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }

    /// Move to `target`. Only explicit navigation changes the step.
    ///
    /// Leaving the Name step requires a valid stream name, taken from the
    /// stream query. Committing can only be entered by a commit, and no
    /// navigation is allowed while one is running.
    pub fn change_step(&self, target: WizardStep) -> Result<(), SessionError> {
        let result = self.try_change_step(target);
        self.with_report(result)
    }

    fn try_change_step(&self, target: WizardStep) -> Result<(), SessionError> {
        let from = {
            let mut state = self.lock();
            if state.closed {
                return Err(SessionError::DialogClosed);
            }
            if state.loading.is_busy() || state.step == WizardStep::Committing {
                return Err(SessionError::CommitStepLocked);
            }
            if target == WizardStep::Committing {
                return Err(SessionError::validation(
                    "Use create or attach to commit the stream",
                ));
            }
            if state.step == target {
                return Ok(());
            }
            if state.step == WizardStep::Name {
                let name = validate_stream_name(&state.stream_query)?;
                state.draft.name = name;
            }

            let from = state.step;
            state.step = target;
            from
        };

        debug!(event = "core.session.step_changed", from = ?from, to = ?target);
        self.events
            .publish(ControllerEvent::StepChanged { from, to: target });
        Ok(())
    }

    /// Name step "continue": take the query as the new stream's name and
    /// move on to filter selection.
    pub fn continue_stream_create(&self) -> Result<(), SessionError> {
        self.change_step(WizardStep::Filter)?;

        let default_account = self.accounts.default_account();
        {
            let mut state = self.lock();
            if state.account.is_none() {
                state.account = default_account;
            }
            state.selected_stream = None;
        }
        self.stream_search.supersede();
        Ok(())
    }

    pub fn set_description(&self, description: Option<String>) {
        self.lock().draft.description = description.filter(|d| !d.trim().is_empty());
    }

    pub fn set_public(&self, is_public: bool) {
        self.lock().draft.is_public = is_public;
    }

    pub fn choose_filter(&self, kind: FilterKind) -> Result<(), SessionError> {
        let result = self.ensure_open().and_then(|()| {
            let mut state = self.lock();
            if !state.catalog.contains(kind) {
                return Err(SessionError::validation(format!(
                    "Filter '{}' is not available",
                    kind
                )));
            }
            state.draft.filter_choice = Some(kind);
            Ok(())
        });

        if result.is_ok() {
            debug!(event = "core.session.filter_chosen", filter = %kind);
        }
        self.with_report(result)
    }

    /// Remove one entry from the Category filter.
    pub fn remove_category_item(&self, name: &str) -> bool {
        self.remove_filter_item(FilterKind::Category, name)
    }

    /// Remove one entry from the View filter.
    pub fn remove_view_item(&self, name: &str) -> bool {
        self.remove_filter_item(FilterKind::View, name)
    }

    fn remove_filter_item(&self, kind: FilterKind, name: &str) -> bool {
        let removed = self.lock().catalog.remove_list_item(kind, name);
        debug!(
            event = "core.session.filter_item_removed",
            filter = %kind,
            item = name,
            removed = removed
        );
        removed
    }

    pub fn select_account(&self, account_id: &str) -> Result<(), SessionError> {
        let result = self.ensure_open().and_then(|()| {
            let account = self
                .accounts
                .list_accounts()
                .into_iter()
                .find(|a| a.id == account_id)
                .ok_or_else(|| {
                    SessionError::validation(format!("Unknown account '{}'", account_id))
                })?;
            self.lock().account = Some(account);
            Ok(())
        });
        self.with_report(result)
    }

    /// Update the stream query and search existing streams.
    ///
    /// Clearing the text clears the selection and results. Text equal to
    /// the selected stream's name does not search again.
    pub async fn set_stream_query(&self, text: &str) {
        let should_search = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.stream_query = text.to_string();

            let matches_selection = state
                .selected_stream
                .as_ref()
                .is_some_and(|s| s.name == text);
            if !matches_selection {
                state.selected_stream = None;
            }
            !text.is_empty() && !matches_selection
        };

        if text.is_empty() {
            self.stream_search.clear();
            return;
        }

        if should_search {
            self.run_stream_search(text).await;
        }
    }

    async fn run_stream_search(&self, query: &str) {
        let Some(account) = self.active_account() else {
            debug!(event = "core.search.streams_skipped", reason = "no account");
            self.stream_search.clear();
            return;
        };

        let client = &self.client;
        let outcome = self
            .stream_search
            .search(query, move |q| async move {
                client.search_streams(&q, &account).await
            })
            .await;

        match outcome {
            Ok(SearchOutcome::Applied(results)) => {
                debug!(
                    event = "core.search.streams_completed",
                    result_count = results.len()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(event = "core.search.streams_failed", error = %e);
            }
        }
    }

    /// Pick a stream from the results. Sets the query to its name without
    /// searching again.
    pub fn select_stream(&self, stream: RemoteStream) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.stream_query = stream.name.clone();
            debug!(event = "core.session.stream_selected", stream_id = %stream.id);
            state.selected_stream = Some(stream);
        }
        self.stream_search.supersede();
    }

    /// Update the collaborator query and search users.
    pub async fn set_user_query(&self, text: &str) {
        let should_search = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.user_query = text.to_string();

            let matches_selection = state
                .selected_user
                .as_ref()
                .is_some_and(|u| u.name == text);
            if !matches_selection {
                state.selected_user = None;
            }
            !text.is_empty() && !matches_selection
        };

        if text.is_empty() {
            self.user_search.clear();
            return;
        }

        if should_search {
            self.run_user_search(text).await;
        }
    }

    async fn run_user_search(&self, query: &str) {
        let Some(account) = self.active_account() else {
            debug!(event = "core.search.users_skipped", reason = "no account");
            self.user_search.clear();
            return;
        };

        let client = &self.client;
        let outcome = self
            .user_search
            .search(query, move |q| async move {
                client.search_users(&q, &account).await
            })
            .await;

        match outcome {
            Ok(SearchOutcome::Applied(results)) => {
                debug!(
                    event = "core.search.users_completed",
                    result_count = results.len()
                );
            }
            Ok(_) => {}
            Err(e) => {
                warn!(event = "core.search.users_failed", error = %e);
            }
        }
    }

    /// Pick a user from the results and add them as a collaborator.
    pub fn select_user(&self, user: UserRef) {
        let added = {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.user_query = user.name.clone();
            let added = state.draft.collaborators.add(user.clone());
            state.selected_user = Some(user);
            added
        };
        self.user_search.supersede();
        debug!(event = "core.session.collaborator_selected", added = added);
    }

    pub fn remove_collaborator(&self, user_id: &str) -> bool {
        self.lock().draft.collaborators.remove(user_id)
    }

    /// Apply an event pushed by the host. Never changes the wizard step,
    /// except that a closed document closes the dialog.
    pub fn handle_host_event(&self, event: HostEvent) {
        if self.is_closed() {
            debug!(event = "core.session.host_event_ignored", reason = "dialog closed");
            return;
        }

        match event {
            HostEvent::SelectionChanged { ids } => {
                let count = ids.len();
                let mut state = self.lock();
                state.catalog.set_candidates(FilterKind::Selection, ids);
                state.selection_count = count;
                debug!(event = "core.session.selection_updated", count = count);
            }
            HostEvent::ViewActivated => {
                let name = self.host.active_view_name();
                let objects = self.host.objects_in_active_view();
                let mut state = self.lock();
                debug!(
                    event = "core.session.view_activated",
                    view = %name,
                    object_count = objects.len()
                );
                state.active_view_name = name;
                state.catalog.set_candidates(FilterKind::View, objects);
            }
            HostEvent::DocumentClosed => self.close(CloseReason::DocumentClosed),
            HostEvent::FilteredObjectsRetrieved { objects } => {
                debug!(
                    event = "core.session.placeholders_updated",
                    count = objects.len()
                );
                self.lock().draft.placeholders = objects;
            }
        }
    }

    /// Discard the draft and close the dialog.
    pub fn cancel(&self) {
        self.close(CloseReason::Cancelled);
    }

    pub(super) fn close(&self, reason: CloseReason) {
        {
            let mut state = self.lock();
            if state.closed {
                return;
            }
            state.closed = true;
            state.draft = Draft::default();
            state.stream_query.clear();
            state.user_query.clear();
            state.selected_stream = None;
            state.selected_user = None;
            state.notifications.clear();
        }
        self.stream_search.clear();
        self.user_search.clear();

        info!(event = "core.session.dialog_closed", reason = ?reason);
        self.events.publish(ControllerEvent::DialogClosed { reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAccounts, MockHost, MockRemoteClient, RemoteCall, test_account};

    type TestController = SessionController<MockRemoteClient, MockHost, MockAccounts>;

    fn config() -> ConnectorConfig {
        let mut config = ConnectorConfig::default();
        config.search.settle_delay_ms = 0;
        config
    }

    fn host() -> MockHost {
        MockHost::new()
            .with_selection(&["s1", "s2"])
            .with_view("Level 1", &["v1", "v2", "v3"])
            .with_categories(&["Walls", "Doors"])
    }

    fn controller_with(client: MockRemoteClient) -> TestController {
        SessionController::new(
            client,
            host(),
            MockAccounts::single(test_account("acc-1")),
            AttachedStreamRegistry::new(),
            config(),
        )
    }

    fn controller() -> TestController {
        controller_with(MockRemoteClient::new())
    }

    fn drain(rx: &Receiver<ControllerEvent>) -> Vec<ControllerEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_new_reads_host_state() {
        let c = controller();
        assert_eq!(c.step(), WizardStep::Name);
        assert_eq!(c.selection_count(), 2);
        assert_eq!(c.active_view_name(), "Level 1");
        assert_eq!(c.account().unwrap().id, "acc-1");
        assert_eq!(c.draft(), Draft::default());
        assert!(!c.is_create_in_progress());
    }

    #[test]
    fn test_leaving_name_requires_two_chars() {
        let c = controller();
        let rx = c.subscribe();
        smol::block_on(c.set_stream_query("R"));

        let result = c.change_step(WizardStep::Filter);

        assert!(matches!(result, Err(SessionError::Validation { .. })));
        assert_eq!(c.step(), WizardStep::Name);
        assert_eq!(
            c.notifications(),
            vec!["Please choose a name for your stream!"]
        );
        assert!(drain(&rx).contains(&ControllerEvent::ValidationFailed {
            message: "Please choose a name for your stream!".to_string()
        }));
    }

    #[test]
    fn test_continue_sets_name_and_moves_to_filter() {
        let c = controller();
        let rx = c.subscribe();
        smol::block_on(c.set_stream_query("  Roof Plan "));

        c.continue_stream_create().unwrap();

        assert_eq!(c.step(), WizardStep::Filter);
        assert_eq!(c.draft().name, "Roof Plan");
        assert!(c.selected_stream().is_none());
        assert_eq!(
            drain(&rx),
            vec![ControllerEvent::StepChanged {
                from: WizardStep::Name,
                to: WizardStep::Filter
            }]
        );
    }

    #[test]
    fn test_cannot_navigate_to_committing() {
        let c = controller();
        smol::block_on(c.set_stream_query("Roof Plan"));
        c.change_step(WizardStep::Filter).unwrap();

        let result = c.change_step(WizardStep::Committing);
        assert!(matches!(result, Err(SessionError::Validation { .. })));
        assert_eq!(c.step(), WizardStep::Filter);
    }

    #[test]
    fn test_navigation_back_to_name_is_allowed() {
        let c = controller();
        smol::block_on(c.set_stream_query("Roof Plan"));
        c.change_step(WizardStep::CollaboratorsOrAttach).unwrap();
        c.change_step(WizardStep::Name).unwrap();
        assert_eq!(c.step(), WizardStep::Name);
    }

    #[test]
    fn test_choose_filter_must_be_offered() {
        let c = controller();
        c.choose_filter(FilterKind::View).unwrap();
        assert_eq!(c.draft().filter_choice, Some(FilterKind::View));

        let result = c.choose_filter(FilterKind::List);
        assert!(matches!(result, Err(SessionError::Validation { .. })));
        assert_eq!(c.draft().filter_choice, Some(FilterKind::View));
    }

    #[test]
    fn test_remove_items_touch_only_their_filter() {
        let c = controller();
        assert!(c.remove_category_item("Walls"));
        assert!(!c.remove_category_item("Walls"));
        assert!(c.remove_view_item("v2"));

        let catalog = c.catalog();
        assert_eq!(catalog.candidate_count(FilterKind::Category), 1);
        assert_eq!(catalog.candidate_count(FilterKind::View), 2);
        assert_eq!(catalog.candidate_count(FilterKind::Selection), 2);
    }

    #[test]
    fn test_stream_query_searches_and_selection_suppresses() {
        let client = MockRemoteClient::new().with_stream_results(
            "Roof",
            vec![RemoteStream::new("s9", "Roof"), RemoteStream::new("s8", "Roofing")],
        );
        let c = controller_with(client);

        smol::block_on(c.set_stream_query("Roof"));
        assert_eq!(c.stream_search_results().len(), 2);

        c.select_stream(RemoteStream::new("s8", "Roofing"));
        assert_eq!(c.stream_query(), "Roofing");
        assert!(c.can_attach_existing());

        smol::block_on(c.set_stream_query("Roofing"));
        assert_eq!(
            c.client()
                .count_calls(|call| matches!(call, RemoteCall::SearchStreams { .. })),
            1
        );
    }

    #[test]
    fn test_editing_query_drops_stream_selection() {
        let c = controller();
        c.select_stream(RemoteStream::new("s8", "Roofing"));

        smol::block_on(c.set_stream_query("Roofin"));

        assert!(c.selected_stream().is_none());
        assert!(!c.can_attach_existing());
        assert_eq!(
            c.client().calls(),
            vec![RemoteCall::SearchStreams {
                query: "Roofin".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_query_clears_results() {
        let client = MockRemoteClient::new()
            .with_stream_results("Roof", vec![RemoteStream::new("s9", "Roof")]);
        let c = controller_with(client);
        smol::block_on(c.set_stream_query("Roof"));
        c.select_stream(RemoteStream::new("s9", "Roof"));

        smol::block_on(c.set_stream_query(""));

        assert!(c.stream_search_results().is_empty());
        assert!(c.selected_stream().is_none());
    }

    #[test]
    fn test_short_queries_make_no_calls() {
        let c = controller();
        smol::block_on(async {
            c.set_stream_query("R").await;
            c.set_stream_query("Ro").await;
            c.set_user_query("ad").await;
        });
        assert!(c.client().calls().is_empty());
    }

    #[test]
    fn test_search_failure_degrades_to_no_results() {
        let client = MockRemoteClient::new().with_failing_search("offline");
        let c = controller_with(client);

        smol::block_on(c.set_user_query("ada"));

        assert!(c.user_search_results().is_empty());
        assert!(c.notifications().is_empty());
        assert_eq!(c.step(), WizardStep::Name);
    }

    #[test]
    fn test_stale_stream_search_is_dropped() {
        let client = MockRemoteClient::new()
            .with_stream_results("Roo", vec![RemoteStream::new("old", "Roo")])
            .with_stream_results("Roof", vec![RemoteStream::new("new", "Roof")]);
        let c = controller_with(client);
        let gate = c.client().gate_search("Roo");

        smol::block_on(async {
            let older = c.set_stream_query("Roo");
            let newer = async {
                smol::future::yield_now().await;
                c.set_stream_query("Roof").await;
                let _ = gate.send(());
            };
            futures::join!(older, newer);
        });

        let ids: Vec<String> = c.stream_search_results().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["new"]);
    }

    #[test]
    fn test_select_user_adds_collaborator_once() {
        let client = MockRemoteClient::new()
            .with_user_results("ada", vec![UserRef::new("u1", "ada lovelace")]);
        let c = controller_with(client);

        smol::block_on(c.set_user_query("ada"));
        let user = c.user_search_results().remove(0);
        c.select_user(user.clone());
        c.select_user(user);

        assert_eq!(c.user_query(), "ada lovelace");
        assert_eq!(c.collaborators().len(), 1);

        smol::block_on(c.set_user_query("ada lovelace"));
        assert_eq!(
            c.client()
                .count_calls(|call| matches!(call, RemoteCall::SearchUsers { .. })),
            1
        );

        assert!(c.remove_collaborator("u1"));
        assert!(c.collaborators().is_empty());
    }

    #[test]
    fn test_selection_changed_updates_count_and_candidates() {
        let c = controller();
        c.handle_host_event(HostEvent::SelectionChanged {
            ids: vec!["n1".to_string(), "n2".to_string(), "n3".to_string()],
        });

        assert_eq!(c.selection_count(), 3);
        assert_eq!(c.catalog().candidate_count(FilterKind::Selection), 3);
        assert_eq!(c.step(), WizardStep::Name);
    }

    #[test]
    fn test_view_activated_refreshes_view() {
        let c = controller();
        c.host().set_active_view("Section A", &["x1"]);

        c.handle_host_event(HostEvent::ViewActivated);

        assert_eq!(c.active_view_name(), "Section A");
        assert_eq!(c.active_view_objects(), vec!["x1"]);
        assert_eq!(c.catalog().candidate_count(FilterKind::View), 1);
    }

    #[test]
    fn test_host_events_do_not_change_step() {
        let c = controller();
        smol::block_on(c.set_stream_query("Roof Plan"));
        c.change_step(WizardStep::Filter).unwrap();

        c.handle_host_event(HostEvent::SelectionChanged { ids: vec![] });
        c.handle_host_event(HostEvent::ViewActivated);

        assert_eq!(c.step(), WizardStep::Filter);
    }

    #[test]
    fn test_document_closed_closes_from_any_step() {
        let c = controller();
        let rx = c.subscribe();
        smol::block_on(c.set_stream_query("Roof Plan"));
        c.change_step(WizardStep::CollaboratorsOrAttach).unwrap();
        drain(&rx);

        c.handle_host_event(HostEvent::DocumentClosed);

        assert!(c.is_closed());
        assert_eq!(c.draft(), Draft::default());
        assert_eq!(
            drain(&rx),
            vec![ControllerEvent::DialogClosed {
                reason: CloseReason::DocumentClosed
            }]
        );
        assert!(matches!(
            c.change_step(WizardStep::Filter),
            Err(SessionError::DialogClosed)
        ));

        c.handle_host_event(HostEvent::DocumentClosed);
        assert!(drain(&rx).is_empty());
    }

    #[test]
    fn test_cancel_discards_draft() {
        let c = controller();
        c.choose_filter(FilterKind::Selection).unwrap();
        c.select_user(UserRef::new("u1", "Ada"));

        c.cancel();

        assert!(c.is_closed());
        assert_eq!(c.draft(), Draft::default());
        assert!(!c.can_attach_existing());
    }

    #[test]
    fn test_placeholders_recorded_on_draft() {
        let c = controller();
        c.handle_host_event(HostEvent::FilteredObjectsRetrieved {
            objects: vec![crate::host::ObjectPlaceholder {
                application_id: "wall-1".to_string(),
                type_name: Some("Wall".to_string()),
            }],
        });
        assert_eq!(c.draft().placeholders.len(), 1);
    }

    #[test]
    fn test_select_account() {
        let accounts = MockAccounts::new(vec![test_account("acc-1"), test_account("acc-2")]);
        let c = SessionController::new(
            MockRemoteClient::new(),
            host(),
            accounts,
            AttachedStreamRegistry::new(),
            config(),
        );

        c.select_account("acc-2").unwrap();
        assert_eq!(c.account().unwrap().id, "acc-2");
        assert_eq!(c.accounts().len(), 2);

        assert!(c.select_account("acc-9").is_err());
        assert_eq!(c.account().unwrap().id, "acc-2");
    }

    #[test]
    fn test_description_blank_is_none() {
        let c = controller();
        c.set_description(Some("   ".to_string()));
        assert_eq!(c.draft().description, None);
        c.set_description(Some("Level 3 roof".to_string()));
        c.set_public(true);
        let draft = c.draft();
        assert_eq!(draft.description.as_deref(), Some("Level 3 roof"));
        assert!(draft.is_public);
    }

    #[test]
    fn test_search_without_account_invalidates_results() {
        let c = SessionController::new(
            MockRemoteClient::new(),
            host(),
            MockAccounts::empty(),
            AttachedStreamRegistry::new(),
            config(),
        );
        let streams_before = c.stream_search.generation();
        let users_before = c.user_search.generation();

        smol::block_on(async {
            c.set_stream_query("Roof").await;
            c.set_user_query("ada").await;
        });

        assert!(c.stream_search.generation() > streams_before);
        assert!(c.user_search.generation() > users_before);
        assert!(c.stream_search_results().is_empty());
        assert!(c.client().calls().is_empty());
    }

    #[test]
    fn test_close_drops_pending_notifications() {
        let c = controller();
        assert!(c.choose_filter(FilterKind::List).is_err());
        assert_eq!(c.notifications().len(), 1);

        c.cancel();

        assert!(c.notifications().is_empty());
    }
}

