use crate::error::Result;
use crate::history::{HistoryEntry, HistoryLog};
use crate::metrics::{parse_session_record, Score};
use crate::session::SessionRecord;
use crate::store::KeyValueStore;
use log::{info, warn};

pub const HISTORY_KEY: &str = "typing_history";

pub fn session_key(lesson_id: &str) -> String {
    format!("typing_session_{lesson_id}")
}

/// Hand a finished attempt over to the results side.
pub fn save_session(store: &dyn KeyValueStore, lesson_id: &str, record: &SessionRecord) -> Result<()> {
    store.set(&session_key(lesson_id), &serde_json::to_string(record)?)
}

/// History log from the store; unreadable data yields an empty log.
pub fn load_history(store: &dyn KeyValueStore) -> Result<HistoryLog> {
    let Some(raw) = store.get(HISTORY_KEY)? else {
        return Ok(HistoryLog::new());
    };
    Ok(serde_json::from_str::<Vec<HistoryEntry>>(&raw)
        .map(HistoryLog::from_entries)
        .unwrap_or_else(|e| {
            warn!("discarding unreadable history: {e}");
            HistoryLog::new()
        }))
}

pub fn save_history(store: &dyn KeyValueStore, log: &HistoryLog) -> Result<()> {
    store.set(HISTORY_KEY, &serde_json::to_string(log)?)
}

/// Score the stored attempt for `lesson_id` and append it to the history.
///
/// Absent, malformed or unfinished session data scores zero and leaves the
/// history untouched. Storage failures are still returned.
pub fn finalize(store: &dyn KeyValueStore, lesson_id: &str, completed_at_ms: i64) -> Result<Score> {
    let score = store
        .get(&session_key(lesson_id))?
        .as_deref()
        .and_then(parse_session_record)
        .and_then(|record| Score::from_state(&record.state));

    let Some(score) = score else {
        return Ok(Score::default());
    };

    let mut history = load_history(store)?;
    history.push(HistoryEntry::new(lesson_id, score, completed_at_ms));
    save_history(store, &history)?;

    info!(
        "recorded {lesson_id}: {} wpm, {}% accuracy",
        score.rounded_wpm(),
        score.accuracy
    );
    Ok(score)
}
