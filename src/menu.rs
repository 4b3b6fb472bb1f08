//! Flex menu builders for the five-step report wizard
//!
//! Each builder returns a ready-to-send [`OutboundMessage`] whose postback
//! `data` strings round-trip through `wizard::PostbackData`. Values are
//! embedded verbatim (no URL encoding): the catalog strings contain no `&`,
//! `=` or `%`, and the parser passes everything else through untouched.

use crate::line::{FlexAction, FlexBox, FlexComponent, FlexContainer, OutboundMessage};
use chrono::NaiveDate;

/// Step 1 choices
pub const LOCATIONS: &[&str] = &[
    "台灣本部",
    "中壢佈教所",
    "台中佈教所",
    "高雄佈教所",
    "雲林集會所",
    "花蓮集會所",
    "線上參加(直播)",
    "線上參加(VTR)",
    "其他",
];

/// Step 3: group events (including VTR participation)
pub const EVENT_CATEGORY: &str = "青年會行事/活動(含VTR)";

/// Step 3: personal practice items
pub const PERSONAL_CATEGORY: &str = "個人實踐項目 (可複選)";

/// Step 4 choices under [`EVENT_CATEGORY`]
pub const EVENT_ITEMS: &[&str] = &[
    "回歸聖地親苑",
    "6/9靈尊教導院祈念未來",
    "7/2靈尊真導院祈念未來",
    "8/6真如靈祖祈念未來",
    "7/19真如開祖祈念未來",
    "夏期鍊成第一天(8-9月)",
    "夏期鍊成第二天(9-10月)",
    "演講大會(9-10月)",
    "蛇瀧研修說明會(11-12月)",
    "青年經親說明會(12-1月)",
    "幹部委員說明會(12-1月)",
    "蛇瀧研修實績確認者說明會",
    "親子一體運動會",
    "其他",
];

/// Step 4 choices under [`PERSONAL_CATEGORY`]
pub const PERSONAL_ITEMS: &[&str] = &[
    "度眾",
    "歡喜",
    "奉侍",
    "舉辦青年家庭集會",
    "參加集會",
    "接心",
    "參加法會",
    "參加青年會合",
    "參加會座(初座/菩提會/本會座)",
    "參加幹部委員研修",
    "參加青年經親研修",
    "參加幹部會合",
    "參加部門會合",
    "參加信仰心向上會合",
    "拜讀一如之道究道篇(全)",
    "拜讀真如苑歷史",
    "參加總部會",
    "參加總部會會後會",
    "回歸聖地親苑",
    "其他",
];

const GREEN: &str = "#1DB446";
const GREY: &str = "#aaaaaa";

/// Step 1: location picker
pub fn location_menu() -> OutboundMessage {
    let buttons = LOCATIONS
        .iter()
        .map(|loc| option_button(loc, format!("action=select_loc&val={}", loc)))
        .collect();

    OutboundMessage::flex(
        "請選擇地點",
        FlexContainer::bubble(
            header("步驟 1/5：請選擇參加地點"),
            FlexBox::vertical_spaced("sm", buttons),
        ),
    )
}

/// Step 2: today shortcut plus a native date picker.
///
/// `today` is the caller's calendar date (the runtime computes it in
/// UTC+8). The shortcut carries the date inline as `YYYYMMDD`; the picker
/// leaves `val` off and LINE echoes the chosen date in `params.date`.
pub fn date_menu(location: &str, today: NaiveDate) -> OutboundMessage {
    let base = format!("action=set_date&loc={}", location);
    let compact = today.format("%Y%m%d").to_string();
    let display = today.format("%m/%d").to_string();

    let body = FlexBox::vertical_spaced(
        "md",
        vec![
            FlexComponent::Button {
                style: "primary",
                color: Some(GREEN),
                height: None,
                action: FlexAction::postback(
                    format!("今天 ({})", display),
                    format!("{}&val={}", base, compact),
                ),
            },
            FlexComponent::Button {
                style: "secondary",
                color: None,
                height: None,
                action: FlexAction::date_picker("選擇其他日期", base),
            },
        ],
    );

    OutboundMessage::flex(
        "請選擇日期",
        FlexContainer::bubble(header("步驟 2/5：請選擇實踐日期"), body),
    )
}

/// Step 3: category picker
pub fn category_menu(location: &str, date: &str) -> OutboundMessage {
    let base = format!("action=select_cat&loc={}&date={}", location, date);
    let buttons = [EVENT_CATEGORY, PERSONAL_CATEGORY]
        .iter()
        .map(|cat| FlexComponent::Button {
            style: "primary",
            color: None,
            height: None,
            action: FlexAction::postback(*cat, format!("{}&val={}", base, cat)),
        })
        .collect();

    OutboundMessage::flex(
        "請選擇項目",
        FlexContainer::bubble(
            header("步驟 3/5：請選擇登錄項目"),
            FlexBox::vertical_spaced("md", buttons),
        ),
    )
}

/// Step 4: multi-select item list with confirm.
///
/// Selected items render green with a checkmark prefix; the confirm
/// button label carries the running count. Categories other than
/// [`EVENT_CATEGORY`] fall back to the personal item list.
pub fn item_menu(category: &str, selected: &[String]) -> OutboundMessage {
    let options = if category == EVENT_CATEGORY {
        EVENT_ITEMS
    } else {
        PERSONAL_ITEMS
    };

    let mut contents: Vec<FlexComponent> = options
        .iter()
        .map(|item| {
            let is_selected = selected.iter().any(|s| s == item);
            let label = if is_selected {
                format!("✅ {}", item)
            } else {
                (*item).to_string()
            };
            FlexComponent::Button {
                style: if is_selected { "primary" } else { "secondary" },
                color: Some(if is_selected { GREEN } else { GREY }),
                height: Some("sm"),
                action: FlexAction::postback(label, format!("action=toggle_item&val={}", item)),
            }
        })
        .collect();

    contents.push(FlexComponent::Separator { margin: "md" });
    contents.push(FlexComponent::Button {
        style: "link",
        color: None,
        height: Some("sm"),
        action: FlexAction::postback(format!("確認送出 ({}項)", selected.len()), "action=confirm_items"),
    });

    let header = FlexBox::vertical(vec![
        header_text("步驟 4/5：實踐項目 (可複選)"),
        FlexComponent::Text {
            text: category.to_string(),
            weight: None,
            size: Some("xs"),
            color: Some(GREY),
            wrap: Some(true),
        },
    ]);

    OutboundMessage::flex(
        "請選擇細項",
        FlexContainer::bubble(header, FlexBox::vertical_spaced("sm", contents)),
    )
}

fn header(title: &str) -> FlexBox {
    FlexBox::vertical(vec![header_text(title)])
}

fn header_text(text: &str) -> FlexComponent {
    FlexComponent::Text {
        text: text.to_string(),
        weight: Some("bold"),
        size: None,
        color: Some(GREEN),
        wrap: None,
    }
}

fn option_button(label: &str, data: String) -> FlexComponent {
    FlexComponent::Button {
        style: "secondary",
        color: None,
        height: Some("sm"),
        action: FlexAction::postback(label, data),
    }
}
