use crate::command::{arg_to_bytes, wrong_arg_count};
use crate::resp::RespValue;
use crate::store::SharedStore;

/// Remove every named key and reply with how many existed.
pub async fn cmd_del(args: &[RespValue], store: &SharedStore) -> RespValue {
    if args.is_empty() {
        return wrong_arg_count("del");
    }

    let mut store = store.write().await;
    let removed = args
        .iter()
        .filter_map(arg_to_bytes)
        .filter(|key| store.delete(key).is_some())
        .count();
    RespValue::integer(removed as i64)
}
