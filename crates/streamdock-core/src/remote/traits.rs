//! Remote collaboration service capability.

use std::future::Future;

use super::errors::RemoteError;
use super::types::{Account, RemoteStream, UserRef};
use crate::wizard::Draft;

/// Capability boundary for the remote collaboration service.
///
/// Every call is bound to the account it runs as. Implementations own
/// transport, retries, and timeouts; callers only see `RemoteError`.
pub trait RemoteStreamClient: Send + Sync {
    /// Create a stream from the draft, returning the server-assigned id.
    fn create_stream(
        &self,
        draft: &Draft,
        account: &Account,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;

    fn get_stream(
        &self,
        stream_id: &str,
        account: &Account,
    ) -> impl Future<Output = Result<RemoteStream, RemoteError>> + Send;

    fn delete_stream(
        &self,
        stream_id: &str,
        account: &Account,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Grant `role` on the stream to a user.
    fn grant_permission(
        &self,
        stream_id: &str,
        user_id: &str,
        role: &str,
        account: &Account,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn search_streams(
        &self,
        query: &str,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<RemoteStream>, RemoteError>> + Send;

    fn search_users(
        &self,
        query: &str,
        account: &Account,
    ) -> impl Future<Output = Result<Vec<UserRef>, RemoteError>> + Send;
}
