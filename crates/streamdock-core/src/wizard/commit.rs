//! Commit protocols: create a new stream, or attach an existing one.
//!
//! Both run under a `CommitGuard`, so at most one commit is in flight and
//! the busy flag is released on every exit path. A stream that was created
//! but could not be fully set up is deleted again before the error returns.
//! Local validation runs before the slot is claimed, so a rejected commit
//! leaves the step and busy flags untouched.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::controller::{ControllerState, SessionController};
use super::errors::SessionError;
use super::events::{CloseReason, ControllerEvent, EventBus};
use super::types::{Draft, Operation, WizardStep};
use super::validation::validate_stream_name;
use crate::filters::FilterKind;
use crate::host::{AccountProvider, HostSelectionProvider};
use crate::registry::Session;
use crate::remote::{Account, RemoteError, RemoteStreamClient};

/// Display name of the list filter built from the active view's objects.
pub const ACTIVE_VIEW_LIST_NAME: &str = "Active view";

/// Holds the commit slot for one operation.
///
/// On drop the slot is released and, if nothing moved the wizard off the
/// Committing step, the step it was entered from is restored.
struct CommitGuard<'a> {
    state: &'a Mutex<ControllerState>,
    events: &'a EventBus,
    operation: Operation,
    previous_step: WizardStep,
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        let restored = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.loading.finish(self.operation);
            if state.step == WizardStep::Committing {
                state.step = self.previous_step;
                true
            } else {
                false
            }
        };

        if restored {
            self.events.publish(ControllerEvent::StepChanged {
                from: WizardStep::Committing,
                to: self.previous_step,
            });
        }
        self.events.publish(ControllerEvent::BusyStateChanged {
            operation: self.operation,
            busy: false,
        });
    }
}

impl<C, H, A> SessionController<C, H, A>
where
    C: RemoteStreamClient,
    H: HostSelectionProvider,
    A: AccountProvider,
{
    /// Reject a commit before validation if the dialog is gone or busy.
    fn ensure_commit_allowed(&self) -> Result<(), SessionError> {
        let state = self.lock();
        if state.closed {
            return Err(SessionError::DialogClosed);
        }
        if state.loading.is_busy() {
            return Err(SessionError::CommitInProgress);
        }
        Ok(())
    }

    fn begin_commit(&self, operation: Operation) -> Result<CommitGuard<'_>, SessionError> {
        let previous_step = {
            let mut state = self.lock();
            if state.closed {
                return Err(SessionError::DialogClosed);
            }
            if !state.loading.begin(operation) {
                return Err(SessionError::CommitInProgress);
            }
            let previous = state.step;
            state.step = WizardStep::Committing;
            previous
        };

        self.events.publish(ControllerEvent::BusyStateChanged {
            operation,
            busy: true,
        });
        self.events.publish(ControllerEvent::StepChanged {
            from: previous_step,
            to: WizardStep::Committing,
        });

        Ok(CommitGuard {
            state: &self.state,
            events: &self.events,
            operation,
            previous_step,
        })
    }

    /// Create a stream from the draft and attach it to the document.
    ///
    /// Runs create, one grant per collaborator, fetch, then register. If
    /// anything after create fails, the new stream is deleted once (best
    /// effort) and the registry is left untouched.
    pub async fn create_new(&self) -> Result<Session, SessionError> {
        let result = self.try_create_new().await;
        self.with_report(result)
    }

    async fn try_create_new(&self) -> Result<Session, SessionError> {
        self.ensure_commit_allowed()?;

        let (draft, account) = {
            let state = self.lock();
            (state.draft.clone(), state.account.clone())
        };

        let name = validate_stream_name(&draft.name)?;
        let filter_kind = draft
            .filter_choice
            .ok_or_else(|| SessionError::validation("Please select a filter for your stream"))?;
        if !self.lock().catalog.contains(filter_kind) {
            return Err(SessionError::validation(format!(
                "Filter '{}' is not available",
                filter_kind
            )));
        }
        let account = account
            .or_else(|| self.accounts.default_account())
            .ok_or(SessionError::NoAccount)?;
        let draft = Draft { name, ..draft };

        let _guard = self.begin_commit(Operation::Create)?;
        let commit_id = Uuid::new_v4();

        info!(
            event = "core.session.create_started",
            commit_id = %commit_id,
            stream_name = %draft.name,
            account_id = %account.id,
            filter = %filter_kind,
            collaborator_count = draft.collaborators.len()
        );

        let stream_id = self
            .client
            .create_stream(&draft, &account)
            .await
            .map_err(|source| SessionError::CreationFailed {
                stream_id: None,
                source,
            })?;

        debug!(
            event = "core.session.stream_created",
            commit_id = %commit_id,
            stream_id = %stream_id
        );

        match self
            .finish_creation(&stream_id, &draft, &account, filter_kind)
            .await
        {
            Ok(session) => {
                self.complete_commit(&session);
                info!(
                    event = "core.session.create_completed",
                    commit_id = %commit_id,
                    stream_id = %stream_id
                );
                Ok(session)
            }
            Err(source) => {
                self.rollback_creation(&stream_id, &account, commit_id).await;
                Err(SessionError::CreationFailed {
                    stream_id: Some(stream_id),
                    source,
                })
            }
        }
    }

    /// Everything after the stream exists. Any error here triggers rollback.
    async fn finish_creation(
        &self,
        stream_id: &str,
        draft: &Draft,
        account: &Account,
        filter_kind: FilterKind,
    ) -> Result<Session, RemoteError> {
        let role = &self.config.collaborators.default_role;
        for user in &draft.collaborators {
            self.client
                .grant_permission(stream_id, &user.id, role, account)
                .await?;
            debug!(
                event = "core.session.permission_granted",
                stream_id = stream_id,
                user_id = %user.id,
                role = %role
            );
        }

        // Candidates stay live until here; the session gets its own copy.
        let (filter, placeholders) = {
            let mut state = self.lock();
            let filter = state.catalog.get(filter_kind).cloned();
            state.draft.filter_snapshot = filter.clone();
            (filter, state.draft.placeholders.clone())
        };

        let stream = self.client.get_stream(stream_id, account).await?;

        let mut session = Session::new(stream, account.clone());
        session.filter = filter;
        session.placeholders = placeholders;

        self.registry
            .register(session.clone())
            .map_err(|e| RemoteError::new(e.to_string()))?;

        Ok(session)
    }

    async fn rollback_creation(&self, stream_id: &str, account: &Account, commit_id: Uuid) {
        warn!(
            event = "core.session.create_rollback_started",
            commit_id = %commit_id,
            stream_id = stream_id
        );

        match self.client.delete_stream(stream_id, account).await {
            Ok(()) => info!(
                event = "core.session.create_rollback_completed",
                commit_id = %commit_id,
                stream_id = stream_id
            ),
            Err(e) => error!(
                event = "core.session.create_rollback_failed",
                commit_id = %commit_id,
                stream_id = stream_id,
                error = %e
            ),
        }
    }

    /// Announce the attached stream and end the wizard.
    fn complete_commit(&self, session: &Session) {
        self.events.publish(ControllerEvent::StreamAttached {
            session: session.clone(),
        });
        self.close(CloseReason::Completed);
    }

    /// Attach the selected existing stream to the document.
    ///
    /// A stream that is already attached is rejected before any remote call.
    pub async fn attach_existing(&self) -> Result<Session, SessionError> {
        let result = self.try_attach_existing().await;
        self.with_report(result)
    }

    async fn try_attach_existing(&self) -> Result<Session, SessionError> {
        self.ensure_commit_allowed()?;

        let (selected, account) = {
            let state = self.lock();
            (state.selected_stream.clone(), state.account.clone())
        };
        let selected =
            selected.ok_or_else(|| SessionError::validation("Please select a stream to attach"))?;

        if self.registry.contains(&selected.id) {
            return Err(SessionError::DuplicateAttachment {
                stream_id: selected.id,
            });
        }

        let account = account
            .or_else(|| self.accounts.default_account())
            .ok_or(SessionError::NoAccount)?;

        let _guard = self.begin_commit(Operation::Attach)?;

        info!(
            event = "core.session.attach_started",
            stream_id = %selected.id,
            account_id = %account.id
        );

        let stream = self.client.get_stream(&selected.id, &account).await?;

        let mut session = Session::new(stream, account);
        session.server_updates_enabled = true;
        self.registry.register(session.clone())?;

        self.complete_commit(&session);

        info!(
            event = "core.session.attach_completed",
            stream_id = session.stream_id()
        );
        Ok(session)
    }

    /// Shortcut: create a stream from the host's current selection, named
    /// after the stream query.
    pub async fn create_from_selection(&self) -> Result<Session, SessionError> {
        let ids = self.host.current_selection_ids();
        let default_account = self.accounts.default_account();
        {
            let mut state = self.lock();
            if !state.closed && !state.loading.is_busy() {
                state.selection_count = ids.len();
                state.catalog.set_candidates(FilterKind::Selection, ids);
                state.draft.filter_choice = Some(FilterKind::Selection);
                let name = state.stream_query.trim().to_string();
                state.draft.name = name;
                if state.account.is_none() {
                    state.account = default_account;
                }
                state.selected_stream = None;
            }
        }
        self.create_new().await
    }

    /// Shortcut: create a stream from every object in the active view.
    pub async fn create_from_view(&self) -> Result<Session, SessionError> {
        let objects = self.host.objects_in_active_view();
        let default_account = self.accounts.default_account();
        {
            let mut state = self.lock();
            if !state.closed && !state.loading.is_busy() {
                state
                    .catalog
                    .upsert_list(ACTIVE_VIEW_LIST_NAME, objects);
                state.draft.filter_choice = Some(FilterKind::List);
                if state.draft.name.is_empty() {
                    let name = state.stream_query.trim().to_string();
                    state.draft.name = name;
                }
                if state.account.is_none() {
                    state.account = default_account;
                }
                state.selected_stream = None;
            }
        }
        self.create_new().await
    }
}
