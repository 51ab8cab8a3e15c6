use crate::resp::RespValue;

const HELP_TEXT: &str = "PING: Returns PONG\n\
ECHO <message>: Returns the provided message\n\
GET <key>: Returns the value associated with the key\n\
SET <key> <value>: Sets the value for the given key\n\
DEL <key> [key ...]: Removes the given keys and returns how many existed";

pub fn cmd_ping(_args: &[RespValue]) -> RespValue {
    RespValue::SimpleString("PONG".to_string())
}

/// Reply with the arguments joined by single spaces.
pub fn cmd_echo(args: &[RespValue]) -> RespValue {
    let words: Vec<&[u8]> = args.iter().filter_map(RespValue::as_bulk).collect();
    RespValue::bulk_string(words.join(&b' '))
}

pub fn cmd_help() -> RespValue {
    RespValue::bulk_string(HELP_TEXT)
}
