use crate::History;
use std::time::{SystemTime, UNIX_EPOCH};

/// Random version-4 UUID in its hyphenated form.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// First id from `mint` not already used in `history`.
pub fn fresh_id(history: &History, mut mint: impl FnMut() -> String) -> String {
    loop {
        let id = mint();
        if history.get(&id).is_none() {
            return id;
        }
    }
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
