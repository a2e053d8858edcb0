use crate::{EngineError, ResultEngine, User};

use super::Engine;

impl Engine {
    /// Resolve the user a bearer token belongs to.
    ///
    /// A token whose user no longer exists is rejected exactly like a bad
    /// token, so callers cannot tell the two apart.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<User> {
        let user_id = self.credentials.verify_token(token)?;
        self.user(user_id).await.map_err(|err| match err {
            EngineError::KeyNotFound(_) => EngineError::Unauthorized("invalid token".to_string()),
            other => other,
        })
    }
}
