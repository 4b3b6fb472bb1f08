//! Pure transition function for the report wizard
//!
//! Given the caller's stored session (if any), per-user context, and one
//! inbound event, produce the effects to run. No I/O happens here: the
//! same inputs always yield the same effects, and unknown combinations
//! yield none at all.

use super::{Effect, Event, PostbackAction, PostbackData, Session, WizardContext};
use crate::db::{NewProfile, NewRecord};
use crate::menu;
use chrono::NaiveDate;

/// Rich-menu trigger that starts registration
pub const REGISTER_TRIGGER: &str = "青年會資訊註冊";

/// Rich-menu trigger that starts the report wizard
pub const REPORT_TRIGGER: &str = "實績回報";

/// Stored in place of the item list when nothing was selected
pub const NO_ITEMS: &str = "無";

const FALLBACK_LOCATION: &str = "未知地點";
const FALLBACK_FIELD: &str = "未知";

pub const REPLY_DATE_MISSING: &str = "❌ 日期抓取失敗";
pub const REPLY_SESSION_EXPIRED: &str = "⚠️ 頁面逾時，請重新輸入「實績回報」。";
pub const REPLY_MALFORMED_PAYLOAD: &str = "⚠️ 資料格式錯誤，請重新操作。";
pub const REPLY_ALREADY_REGISTERED: &str = "您已經註冊過了，無需重複註冊。\n請直接點擊「實績回報」。";
pub const REPLY_REGISTER_PROMPT: &str =
    "【歡迎新朋友】\n請直接輸入：\n部會 經名 姓名\n\n(例如：青年部 經親 王小明)";
pub const REPLY_REGISTER_FORMAT: &str = "⚠️ 格式不對。\n請輸入三個詞，中間空格：\n部會 經名 姓名";
pub const REPLY_NOT_REGISTERED: &str =
    "⚠️ 您尚未註冊。\n請先點選左側「青年會資訊註冊」完成資料登錄。";
pub const REPLY_REPORT_DONE: &str = "🎉 實績回報完成！資料已儲存。";

/// Result of a transition
#[derive(Debug, Default, PartialEq)]
pub struct TransitionResult {
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn effect(effect: Effect) -> Self {
        Self {
            effects: vec![effect],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Pure transition function.
///
/// Store effects always precede the reply effect, so a user who sees a
/// confirmation knows the write it refers to was already issued.
pub fn transition(
    session: Option<&Session>,
    context: &WizardContext,
    event: Event,
) -> TransitionResult {
    match (session, event) {
        // ============================================================
        // Trigger phrases (checked before any session branch)
        // ============================================================

        (_, Event::Text { text }) if text == REGISTER_TRIGGER => {
            start_registration(context.registered)
        }

        (_, Event::Text { text }) if text == REPORT_TRIGGER => start_report(context.registered),

        // ============================================================
        // Stateless wizard steps (1-3 live in postback payloads)
        // ============================================================

        (
            _,
            Event::Postback {
                action: Some(PostbackAction::SelectLocation),
                data,
                ..
            },
        ) => select_location(&data, context.today),

        (
            _,
            Event::Postback {
                action: Some(PostbackAction::SetDate),
                data,
                date_param,
            },
        ) => set_date(&data, date_param.as_deref()),

        (
            _,
            Event::Postback {
                action: Some(PostbackAction::SelectCategory),
                data,
                ..
            },
        ) => select_category(&data),

        // ============================================================
        // Step 4: multi-select against the stored session
        // ============================================================

        (
            Some(Session::SelectingItems {
                location,
                date,
                category,
                items,
            }),
            Event::Postback {
                action: Some(PostbackAction::ToggleItem),
                data,
                ..
            },
        ) => toggle_item(location, date, category, items, &data),

        (
            Some(Session::SelectingItems {
                location,
                date,
                category,
                items,
            }),
            Event::Postback {
                action: Some(PostbackAction::ConfirmItems),
                ..
            },
        ) => confirm_items(location, date, category, items),

        (
            None,
            Event::Postback {
                action: Some(PostbackAction::ToggleItem | PostbackAction::ConfirmItems),
                ..
            },
        ) => TransitionResult::effect(Effect::reply_text(REPLY_SESSION_EXPIRED)),

        // ============================================================
        // Step 5: registration and description text input
        // ============================================================

        (Some(Session::Registering), Event::Text { text }) => register(&text),

        (
            Some(Session::AwaitingDescription {
                location,
                date,
                category,
                items,
            }),
            Event::Text { text },
        ) => finish_report(location, date, category, items, &text),

        // Everything else (toggles and confirms outside step 4, free
        // text outside a text-collecting step, unrecognized actions)
        // is ignored.
        _ => TransitionResult::none(),
    }
}

// Trigger handlers

fn start_registration(registered: bool) -> TransitionResult {
    if registered {
        TransitionResult::effect(Effect::reply_text(REPLY_ALREADY_REGISTERED))
    } else {
        TransitionResult::effect(Effect::put_session(Session::Registering))
            .with_effect(Effect::reply_text(REPLY_REGISTER_PROMPT))
    }
}

fn start_report(registered: bool) -> TransitionResult {
    if registered {
        TransitionResult::effect(Effect::reply(menu::location_menu()))
    } else {
        TransitionResult::effect(Effect::reply_text(REPLY_NOT_REGISTERED))
    }
}

// Postback handlers

fn select_location(data: &PostbackData, today: NaiveDate) -> TransitionResult {
    match data.get_non_empty("val") {
        Some(location) => TransitionResult::effect(Effect::reply(menu::date_menu(location, today))),
        None => malformed_payload(),
    }
}

fn set_date(data: &PostbackData, date_param: Option<&str>) -> TransitionResult {
    // Prefer the inline value (today shortcut); otherwise take the
    // picker's params.date and strip its dashes down to YYYYMMDD.
    let date = data
        .get_non_empty("val")
        .map(ToString::to_string)
        .or_else(|| {
            date_param
                .map(|d| d.replace('-', ""))
                .filter(|d| !d.is_empty())
        });

    match date {
        Some(date) => {
            let location = data.get_non_empty("loc").unwrap_or(FALLBACK_LOCATION);
            TransitionResult::effect(Effect::reply(menu::category_menu(location, &date)))
        }
        None => TransitionResult::effect(Effect::reply_text(REPLY_DATE_MISSING)),
    }
}

fn select_category(data: &PostbackData) -> TransitionResult {
    match data.get_non_empty("val") {
        Some(category) => {
            let location = data.get_non_empty("loc").unwrap_or(FALLBACK_FIELD);
            let date = data.get_non_empty("date").unwrap_or(FALLBACK_FIELD);
            // Entering step 4 replaces whatever session came before.
            TransitionResult::effect(Effect::put_session(Session::selecting_items(
                location, date, category,
            )))
            .with_effect(Effect::reply(menu::item_menu(category, &[])))
        }
        None => malformed_payload(),
    }
}

fn toggle_item(
    location: &str,
    date: &str,
    category: &str,
    items: &[String],
    data: &PostbackData,
) -> TransitionResult {
    match data.get_non_empty("val") {
        Some(item) => {
            let mut updated = items.to_vec();
            match updated.iter().position(|i| i == item) {
                Some(idx) => {
                    updated.remove(idx);
                }
                None => updated.push(item.to_string()),
            }

            let session = Session::SelectingItems {
                location: location.to_string(),
                date: date.to_string(),
                category: category.to_string(),
                items: updated.clone(),
            };
            TransitionResult::effect(Effect::update_session(session))
                .with_effect(Effect::reply(menu::item_menu(category, &updated)))
        }
        None => malformed_payload(),
    }
}

fn confirm_items(
    location: &str,
    date: &str,
    category: &str,
    items: &[String],
) -> TransitionResult {
    let joined = if items.is_empty() {
        NO_ITEMS.to_string()
    } else {
        items.join(",")
    };

    let session = Session::AwaitingDescription {
        location: location.to_string(),
        date: date.to_string(),
        category: category.to_string(),
        items: joined.clone(),
    };
    TransitionResult::effect(Effect::update_session(session))
        .with_effect(Effect::reply_text(items_recorded_reply(&joined)))
}

// Text handlers

fn register(text: &str) -> TransitionResult {
    let parts: Vec<&str> = text.split_whitespace().collect();
    match parts.as_slice() {
        [ministry, sutra_name, name] => {
            let profile = NewProfile {
                ministry: (*ministry).to_string(),
                sutra_name: (*sutra_name).to_string(),
                name: (*name).to_string(),
            };
            let reply = welcome_reply(name);
            TransitionResult::effect(Effect::CreateProfile { profile })
                .with_effect(Effect::DeleteSession)
                .with_effect(Effect::reply_text(reply))
        }
        _ => TransitionResult::effect(Effect::reply_text(REPLY_REGISTER_FORMAT)),
    }
}

fn finish_report(
    location: &str,
    date: &str,
    category: &str,
    items: &str,
    description: &str,
) -> TransitionResult {
    let record = NewRecord {
        location: location.to_string(),
        date: date.to_string(),
        category: category.to_string(),
        items: items.to_string(),
        description: description.to_string(),
    };
    TransitionResult::effect(Effect::AppendRecord { record })
        .with_effect(Effect::DeleteSession)
        .with_effect(Effect::reply_text(REPLY_REPORT_DONE))
}

// Reply builders

fn malformed_payload() -> TransitionResult {
    TransitionResult::effect(Effect::reply_text(REPLY_MALFORMED_PAYLOAD))
}

fn items_recorded_reply(items: &str) -> String {
    format!(
        "已記錄項目：{}\n\n最後一步，請輸入實踐說明 (若無請輸入「無」)：",
        items
    )
}

fn welcome_reply(name: &str) -> String {
    format!(
        "歡迎 {}！註冊成功。🎉\n\n現在您可以點擊選單右側的「實績回報」開始使用。",
        name
    )
}
