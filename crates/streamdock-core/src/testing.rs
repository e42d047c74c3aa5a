//! In-memory fakes of the remote client, host, and account capabilities.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! downstream integration tests. Remote calls are recorded in order and can
//! be made to fail or to wait on a gate.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::channel::oneshot;

use crate::filters::FilterKind;
use crate::host::{AccountProvider, HostSelectionProvider};
use crate::remote::{Account, RemoteError, RemoteStream, RemoteStreamClient, UserRef};
use crate::wizard::Draft;

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    CreateStream {
        name: String,
        account_id: String,
    },
    GetStream {
        stream_id: String,
    },
    DeleteStream {
        stream_id: String,
    },
    GrantPermission {
        stream_id: String,
        user_id: String,
        role: String,
    },
    SearchStreams {
        query: String,
    },
    SearchUsers {
        query: String,
    },
}

impl RemoteCall {
    pub fn is_search(&self) -> bool {
        matches!(
            self,
            RemoteCall::SearchStreams { .. } | RemoteCall::SearchUsers { .. }
        )
    }
}

#[derive(Default)]
struct MockRemoteState {
    calls: Vec<RemoteCall>,
    next_ids: VecDeque<String>,
    created: usize,
    streams: HashMap<String, RemoteStream>,
    fail_create: Option<String>,
    fail_get: Option<String>,
    fail_delete: Option<String>,
    fail_search: Option<String>,
    failing_grants: HashSet<String>,
    stream_results: HashMap<String, Vec<RemoteStream>>,
    user_results: HashMap<String, Vec<UserRef>>,
    create_gate: Option<oneshot::Receiver<()>>,
    search_gates: HashMap<String, oneshot::Receiver<()>>,
}

/// Fake remote service backed by a map of streams.
#[derive(Default)]
pub struct MockRemoteClient {
    state: Mutex<MockRemoteState>,
}

impl MockRemoteClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockRemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Id handed out by the next `create_stream`. Queued ids are used in order.
    pub fn with_next_stream_id(self, id: &str) -> Self {
        self.lock().next_ids.push_back(id.to_string());
        self
    }

    /// Make a stream known to the server.
    pub fn with_stream(self, stream: RemoteStream) -> Self {
        self.lock().streams.insert(stream.id.clone(), stream);
        self
    }

    pub fn with_failing_create(self, message: &str) -> Self {
        self.lock().fail_create = Some(message.to_string());
        self
    }

    pub fn with_failing_get(self, message: &str) -> Self {
        self.lock().fail_get = Some(message.to_string());
        self
    }

    pub fn with_failing_delete(self, message: &str) -> Self {
        self.lock().fail_delete = Some(message.to_string());
        self
    }

    pub fn with_failing_search(self, message: &str) -> Self {
        self.lock().fail_search = Some(message.to_string());
        self
    }

    /// Granting any role to this user fails.
    pub fn with_failing_grant(self, user_id: &str) -> Self {
        self.lock().failing_grants.insert(user_id.to_string());
        self
    }

    pub fn with_stream_results(self, query: &str, results: Vec<RemoteStream>) -> Self {
        self.lock()
            .stream_results
            .insert(query.to_string(), results);
        self
    }

    pub fn with_user_results(self, query: &str, results: Vec<UserRef>) -> Self {
        self.lock().user_results.insert(query.to_string(), results);
        self
    }

    /// Hold the next `create_stream` until the returned sender fires.
    pub fn gate_create(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().create_gate = Some(rx);
        tx
    }

    /// Hold the next stream or user search for `query` until the sender fires.
    pub fn gate_search(&self, query: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock().search_gates.insert(query.to_string(), rx);
        tx
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    /// Recorded calls excluding searches.
    pub fn commit_calls(&self) -> Vec<RemoteCall> {
        self.calls().into_iter().filter(|c| !c.is_search()).collect()
    }

    pub fn count_calls(&self, predicate: impl Fn(&RemoteCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    pub fn has_stream(&self, stream_id: &str) -> bool {
        self.lock().streams.contains_key(stream_id)
    }

    fn record(&self, call: RemoteCall) {
        self.lock().calls.push(call);
    }

    async fn wait_for_search_gate(&self, query: &str) {
        let gate = { self.lock().search_gates.remove(query) };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

impl RemoteStreamClient for MockRemoteClient {
    async fn create_stream(
        &self,
        draft: &Draft,
        account: &Account,
    ) -> Result<String, RemoteError> {
        self.record(RemoteCall::CreateStream {
            name: draft.name.clone(),
            account_id: account.id.clone(),
        });

        let gate = { self.lock().create_gate.take() };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut state = self.lock();
        if let Some(message) = &state.fail_create {
            return Err(RemoteError::new(message.clone()));
        }

        state.created += 1;
        let created = state.created;
        let id = state
            .next_ids
            .pop_front()
            .unwrap_or_else(|| format!("stream-{}", created));
        let stream = RemoteStream {
            id: id.clone(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            is_public: draft.is_public,
            updated_at: None,
        };
        state.streams.insert(id.clone(), stream);
        Ok(id)
    }

    async fn get_stream(
        &self,
        stream_id: &str,
        _account: &Account,
    ) -> Result<RemoteStream, RemoteError> {
        self.record(RemoteCall::GetStream {
            stream_id: stream_id.to_string(),
        });

        let state = self.lock();
        if let Some(message) = &state.fail_get {
            return Err(RemoteError::new(message.clone()));
        }
        state
            .streams
            .get(stream_id)
            .cloned()
            .ok_or_else(|| RemoteError::new(format!("Stream '{}' not found", stream_id)))
    }

    async fn delete_stream(
        &self,
        stream_id: &str,
        _account: &Account,
    ) -> Result<(), RemoteError> {
        self.record(RemoteCall::DeleteStream {
            stream_id: stream_id.to_string(),
        });

        let mut state = self.lock();
        if let Some(message) = &state.fail_delete {
            return Err(RemoteError::new(message.clone()));
        }
        state.streams.remove(stream_id);
        Ok(())
    }

    async fn grant_permission(
        &self,
        stream_id: &str,
        user_id: &str,
        role: &str,
        _account: &Account,
    ) -> Result<(), RemoteError> {
        self.record(RemoteCall::GrantPermission {
            stream_id: stream_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
        });

        if self.lock().failing_grants.contains(user_id) {
            return Err(RemoteError::new(format!(
                "Cannot grant permission to '{}'",
                user_id
            )));
        }
        Ok(())
    }

    async fn search_streams(
        &self,
        query: &str,
        _account: &Account,
    ) -> Result<Vec<RemoteStream>, RemoteError> {
        self.record(RemoteCall::SearchStreams {
            query: query.to_string(),
        });
        self.wait_for_search_gate(query).await;

        let state = self.lock();
        if let Some(message) = &state.fail_search {
            return Err(RemoteError::new(message.clone()));
        }
        Ok(state.stream_results.get(query).cloned().unwrap_or_default())
    }

    async fn search_users(
        &self,
        query: &str,
        _account: &Account,
    ) -> Result<Vec<UserRef>, RemoteError> {
        self.record(RemoteCall::SearchUsers {
            query: query.to_string(),
        });
        self.wait_for_search_gate(query).await;

        let state = self.lock();
        if let Some(message) = &state.fail_search {
            return Err(RemoteError::new(message.clone()));
        }
        Ok(state.user_results.get(query).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct MockHostState {
    selection: Vec<String>,
    view_name: String,
    view_objects: Vec<String>,
    categories: Vec<String>,
    filters: Option<Vec<FilterKind>>,
}

/// Fake CAD host with settable selection and active view.
#[derive(Default)]
pub struct MockHost {
    state: Mutex<MockHostState>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockHostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_selection(self, ids: &[&str]) -> Self {
        self.set_selection(ids);
        self
    }

    pub fn with_view(self, name: &str, ids: &[&str]) -> Self {
        self.set_active_view(name, ids);
        self
    }

    pub fn with_categories(self, names: &[&str]) -> Self {
        self.lock().categories = owned(names);
        self
    }

    pub fn with_filters(self, kinds: &[FilterKind]) -> Self {
        self.lock().filters = Some(kinds.to_vec());
        self
    }

    pub fn set_selection(&self, ids: &[&str]) {
        self.lock().selection = owned(ids);
    }

    pub fn set_active_view(&self, name: &str, ids: &[&str]) {
        let mut state = self.lock();
        state.view_name = name.to_string();
        state.view_objects = owned(ids);
    }
}

impl HostSelectionProvider for MockHost {
    fn current_selection_ids(&self) -> Vec<String> {
        self.lock().selection.clone()
    }

    fn active_view_name(&self) -> String {
        self.lock().view_name.clone()
    }

    fn objects_in_active_view(&self) -> Vec<String> {
        self.lock().view_objects.clone()
    }

    fn category_names(&self) -> Vec<String> {
        self.lock().categories.clone()
    }

    fn available_filters(&self) -> Vec<FilterKind> {
        self.lock()
            .filters
            .clone()
            .unwrap_or_else(|| {
                vec![FilterKind::Selection, FilterKind::View, FilterKind::Category]
            })
    }
}

/// Fake account store. The default account is the first one flagged
/// `is_default`, else the first one.
#[derive(Default)]
pub struct MockAccounts {
    accounts: Vec<Account>,
}

impl MockAccounts {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn single(account: Account) -> Self {
        Self::new(vec![account])
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl AccountProvider for MockAccounts {
    fn default_account(&self) -> Option<Account> {
        self.accounts
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.accounts.first())
            .cloned()
    }

    fn list_accounts(&self) -> Vec<Account> {
        self.accounts.clone()
    }
}

/// Account fixture on a fixed test server.
pub fn test_account(id: &str) -> Account {
    Account {
        id: id.to_string(),
        server_url: "https://collab.example.com".to_string(),
        user_name: format!("user-{}", id),
        is_default: false,
    }
}
