//! The call-a-friend hint service.

use crate::HintError;

/// Produces a hint for the question a player is stuck on.
///
/// Implementations typically call out to a language model. A room calls
/// this from a spawned task, so a slow service never delays a tick.
///
/// # Example
///
/// ```rust
/// use trivia_game::{HintError, HintService};
///
/// struct AlwaysFirst;
///
/// impl HintService for AlwaysFirst {
///     async fn call_friend(
///         &self,
///         _question: &str,
///         options: &[String],
///     ) -> Result<String, HintError> {
///         Ok(format!("I'd go with {}", options[0]))
///     }
/// }
/// ```
pub trait HintService: Send + Sync + 'static {
    /// Asks the friend about `question`.
    ///
    /// # Errors
    /// Returns [`HintError`] if no answer could be produced. The room
    /// shows a placeholder instead.
    fn call_friend(
        &self,
        question: &str,
        options: &[String],
    ) -> impl std::future::Future<Output = Result<String, HintError>> + Send;
}

/// A friend who never picks up. Useful when no hint backend is
/// configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHints;

impl HintService for NoHints {
    async fn call_friend(
        &self,
        _question: &str,
        _options: &[String],
    ) -> Result<String, HintError> {
        Err(HintError::Unavailable("no hint service configured".into()))
    }
}
