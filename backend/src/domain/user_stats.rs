//! Best-effort maintenance of the denormalised profile counters.

use tracing::warn;

use crate::domain::ports::UserRepository;
use crate::domain::{StatKind, Username};

/// Adjust one counter on `username`'s profile.
///
/// The counter write is independent of the mutation that triggered it, so a
/// failure here is logged and swallowed rather than failing the request.
pub(crate) async fn adjust_user_stat<U>(users: &U, username: &Username, kind: StatKind, delta: i32)
where
    U: UserRepository + ?Sized,
{
    if let Err(error) = users.adjust_stat(username, kind, delta).await {
        warn!(
            user = %username,
            stat = kind.as_str(),
            delta,
            %error,
            "failed to adjust profile counter"
        );
    }
}
