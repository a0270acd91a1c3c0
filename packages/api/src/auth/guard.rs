use std::future::Future;

use store::{User, UserStore};

use super::Authenticator;
use crate::error::AppError;

/// Outcome of running a handler behind [`login_required`].
#[derive(Debug, PartialEq)]
pub enum Access<T> {
    Granted(T),
    LoginRequired,
}

/// Run `handler` with the user owning `token`, or report that a login is needed.
///
/// The handler is not called at all when the token is missing, unknown or expired.
pub async fn login_required<S, F, Fut, T>(
    auth: &Authenticator<S>,
    token: Option<&str>,
    handler: F,
) -> Result<Access<T>, AppError>
where
    S: UserStore,
    F: FnOnce(User) -> Fut,
    Fut: Future<Output = T>,
{
    let Some(token) = token else {
        return Ok(Access::LoginRequired);
    };
    match auth.check_token(token).await? {
        Some(user) => Ok(Access::Granted(handler(user).await)),
        None => Ok(Access::LoginRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Registration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use store::MemoryStore;

    async fn logged_in() -> (Authenticator<MemoryStore>, String) {
        let auth = Authenticator::new(MemoryStore::new());
        auth.register(Registration {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "pw123".to_string(),
        })
        .await
        .unwrap();
        let token = auth.login("alice", "pw123").await.unwrap();
        (auth, token.value)
    }

    #[tokio::test]
    async fn test_valid_token_runs_handler() {
        let (auth, token) = logged_in().await;

        let access = login_required(&auth, Some(&token), |user| async move { user.username })
            .await
            .unwrap();
        assert_eq!(access, Access::Granted("alice".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_token_skips_handler() {
        let (auth, token) = logged_in().await;
        let calls = AtomicUsize::new(0);
        let counter = &calls;

        for presented in [None, Some(""), Some("0123456789abcdef")] {
            let access = login_required(&auth, presented, move |_| async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .await
            .unwrap();
            assert_eq!(access, Access::LoginRequired);
        }

        auth.logout(&token).await.unwrap();
        let access = login_required(&auth, Some(&token), move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();
        assert_eq!(access, Access::LoginRequired);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
