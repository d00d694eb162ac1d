#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    User(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the error came from a UNIQUE constraint on insert/update.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Unknown(err) => err
                .downcast_ref::<sqlx::Error>()
                .and_then(|err| err.as_database_error())
                .is_some_and(|err| err.is_unique_violation()),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Self::Unknown(value.into())
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(anyhow::anyhow!("password hash: {value}"))
    }
}

impl From<time::error::ComponentRange> for Error {
    fn from(value: time::error::ComponentRange) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Server(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::Server(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! user {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::User(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::Error::User(format!($fmt, $($arg)*)))
    };
}

#[macro_export]
macro_rules! unauthorized {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Unauthorized(format!($msg)))
    };
}

#[macro_export]
macro_rules! forbidden {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::Forbidden(format!($msg)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($msg:literal $(,)?) => {
        return Err($crate::Error::NotFound(format!($msg)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject() -> Result<()> {
        crate::user!("User already exists");
    }

    fn missing(id: &str) -> Result<()> {
        if id.is_empty() {
            crate::not_found!("Goal not found");
        }

        Ok(())
    }

    #[test]
    fn test_macros_build_expected_variants() {
        assert!(matches!(reject(), Err(Error::User(msg)) if msg == "User already exists"));
        assert!(matches!(missing(""), Err(Error::NotFound(_))));
        assert!(missing("01J").is_ok());
    }

    #[test]
    fn test_plain_errors_are_not_unique_violations() {
        assert!(!Error::Server("boom".to_owned()).is_unique_violation());
        assert!(!Error::Unknown(anyhow::anyhow!("boom")).is_unique_violation());
    }
}
