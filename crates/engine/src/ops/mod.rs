use sea_orm::DatabaseConnection;

use crate::{Credentials, EngineError, ResultEngine};

mod access;
mod expenses;
mod stats;
mod users;

pub use expenses::{
    ExpenseCmd, ExpenseListFilter, ExpensePage, MAX_EXPENSE_AMOUNT, UpdateExpenseCmd,
};
pub use users::{AuthSession, RegisterCmd};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point for every operation.
///
/// Holds the database handle and the credential verifier; both are safe to
/// share across concurrent requests.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    credentials: Credentials,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    credentials: Option<Credentials>,
    token_secret: Option<Vec<u8>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Secret used to sign bearer tokens.
    pub fn token_secret(mut self, secret: impl AsRef<[u8]>) -> EngineBuilder {
        self.token_secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Use a prepared credential verifier instead of `token_secret`.
    pub fn credentials(mut self, credentials: Credentials) -> EngineBuilder {
        self.credentials = Some(credentials);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let credentials = match (self.credentials, self.token_secret) {
            (Some(credentials), _) => credentials,
            (None, Some(secret)) => Credentials::new(&secret)?,
            (None, None) => {
                return Err(EngineError::Token("missing token secret".to_string()));
            }
        };

        Ok(Engine {
            database: self.database,
            credentials,
        })
    }
}
