//! Widget deep links
//!
//! `<scheme>://widget/checkin?habitId=<uuid>` checks a habit in for today and
//! `<scheme>://widget/open?habitId=<uuid>` asks the UI to focus it. Anything
//! else, including ids of habits that don't exist, is ignored.

use chrono::{Local, NaiveDate};
use url::Url;

use crate::domain::{CheckInOutcome, HabitId};
use crate::storage::{SharedStorage, StorageError};
use crate::store::HabitStore;

const WIDGET_HOST: &str = "widget";
const HABIT_ID_PARAM: &str = "habitId";

/// A recognized deep link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLink {
    CheckIn(HabitId),
    Open(HabitId),
}

impl DeepLink {
    /// Parse `raw` if it is a widget link with the given scheme
    pub fn parse(raw: &str, scheme: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        if !url.scheme().eq_ignore_ascii_case(scheme) || url.host_str() != Some(WIDGET_HOST) {
            return None;
        }

        let habit_id = url
            .query_pairs()
            .find(|(key, _)| key == HABIT_ID_PARAM)
            .and_then(|(_, value)| HabitId::from_string(&value).ok())?;

        match url.path() {
            "/checkin" => Some(DeepLink::CheckIn(habit_id)),
            "/open" => Some(DeepLink::Open(habit_id)),
            _ => None,
        }
    }

    pub fn habit_id(&self) -> HabitId {
        match self {
            DeepLink::CheckIn(id) | DeepLink::Open(id) => *id,
        }
    }
}

/// What handling a deep link did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepLinkAction {
    CheckedIn(HabitId, CheckInOutcome),
    Focused(HabitId),
}

/// Handle a raw URL against the app store, checking in on the local today
pub fn handle_url<S: SharedStorage>(
    store: &mut HabitStore<S>,
    raw: &str,
) -> Result<Option<DeepLinkAction>, StorageError> {
    handle_url_on(store, raw, Local::now().date_naive())
}

/// Handle a raw URL, checking in on `today`
pub fn handle_url_on<S: SharedStorage>(
    store: &mut HabitStore<S>,
    raw: &str,
    today: NaiveDate,
) -> Result<Option<DeepLinkAction>, StorageError> {
    let Some(link) = DeepLink::parse(raw, &store.config().url_scheme) else {
        tracing::debug!("Ignoring unrecognized URL: {}", raw);
        return Ok(None);
    };

    match link {
        DeepLink::CheckIn(habit_id) => Ok(store
            .log_habit(&habit_id, today)?
            .map(|outcome| DeepLinkAction::CheckedIn(habit_id, outcome))),
        DeepLink::Open(habit_id) => Ok(store
            .request_focus(&habit_id)
            .then_some(DeepLinkAction::Focused(habit_id))),
    }
}
