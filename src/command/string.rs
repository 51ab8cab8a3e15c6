use crate::command::{arg_to_bytes, wrong_arg_count};
use crate::error::CommandError;
use crate::resp::RespValue;
use crate::store::SharedStore;

pub async fn cmd_get(args: &[RespValue], store: &SharedStore) -> RespValue {
    if args.len() != 1 {
        return wrong_arg_count("get");
    }
    let Some(key) = arg_to_bytes(&args[0]) else {
        return CommandError::InvalidFormat.into();
    };

    let store = store.read().await;
    match store.get(key) {
        Some(value) => RespValue::bulk_string(value.clone()),
        None => RespValue::null_bulk_string(),
    }
}

pub async fn cmd_set(args: &[RespValue], store: &SharedStore) -> RespValue {
    if args.len() != 2 {
        return CommandError::SyntaxError.into();
    }
    let (Some(key), Some(value)) = (arg_to_bytes(&args[0]), arg_to_bytes(&args[1])) else {
        return CommandError::InvalidFormat.into();
    };

    let mut store = store.write().await;
    store.insert(key, value.to_vec());
    RespValue::ok()
}
