pub mod key;
pub mod server_cmd;
pub mod string;

use crate::error::CommandError;
use crate::resp::RespValue;
use crate::store::SharedStore;

/// Execute one decoded request against the store and build its reply.
///
/// A request must be a non-empty array of non-null bulk strings; anything
/// else gets `ERR invalid command format`. Exactly one reply is produced.
pub async fn execute(request: RespValue, store: &SharedStore) -> RespValue {
    let items = match request {
        RespValue::Array(Some(items))
            if !items.is_empty() && items.iter().all(|item| item.as_bulk().is_some()) =>
        {
            items
        }
        _ => return CommandError::InvalidFormat.into(),
    };

    let cmd_name = match items[0].to_string_lossy() {
        Some(name) => name.to_uppercase(),
        None => return CommandError::InvalidFormat.into(),
    };

    dispatch(&cmd_name, &items[1..], store).await
}

/// Dispatch a command by its upper-cased name.
pub async fn dispatch(cmd_name: &str, args: &[RespValue], store: &SharedStore) -> RespValue {
    match cmd_name {
        // Connection
        "PING" => server_cmd::cmd_ping(args),
        "ECHO" => server_cmd::cmd_echo(args),
        "HELP" => server_cmd::cmd_help(),

        // Strings
        "GET" => string::cmd_get(args, store).await,
        "SET" => string::cmd_set(args, store).await,

        // Keys
        "DEL" => key::cmd_del(args, store).await,

        _ => CommandError::UnknownCommand(cmd_name.to_string()).into(),
    }
}

/// Extract string bytes from a RespValue argument.
pub fn arg_to_bytes(arg: &RespValue) -> Option<&[u8]> {
    arg.as_bulk()
}

/// Return a wrong number of arguments error.
pub fn wrong_arg_count(cmd: &str) -> RespValue {
    CommandError::WrongArgCount(cmd.to_string()).into()
}
