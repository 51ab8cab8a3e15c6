use crate::resp::{RespError, RespValue};

/// Application-level command failures. These are sent back to the client as
/// `-ERR ...` replies and never terminate the connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgCount(String),

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR invalid command format")]
    InvalidFormat,
}

impl CommandError {
    pub fn to_resp(&self) -> RespValue {
        RespValue::error(self.to_string())
    }
}

impl From<CommandError> for RespValue {
    fn from(err: CommandError) -> Self {
        err.to_resp()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("protocol error: {0}")]
    Protocol(#[from] RespError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type KvResult<T> = Result<T, KvError>;
