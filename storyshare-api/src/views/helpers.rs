//! Small formatting helpers shared by the page templates.

use maud::{Markup, html};
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};
use storyshare_common::model::{
    Id,
    story::{StoryMarker, StoryStatus},
    user::UserMarker,
};
use time::{UtcDateTime, format_description};
use tracing::warn;

pub const LONG_DATE: &str = "[month repr:long] [day padding:none], [year]";
pub const LONG_DATE_TIME: &str = "[month repr:long] [day padding:none], [year] \
     [hour repr:12 padding:none]:[minute] [period case:lower]";

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<.*?>").expect("tag pattern is a valid regex"));

/// Formats `date` with a `time` format description. A broken description
/// is logged and the default rendering used instead.
pub fn format_date(date: UtcDateTime, description: &str) -> String {
    let formatted = format_description::parse_borrowed::<2>(description)
        .map_err(|err| err.to_string())
        .and_then(|items| date.format(items.as_slice()).map_err(|err| err.to_string()));

    formatted.unwrap_or_else(|err| {
        warn!(description, error = %err, "Could not format date");
        date.to_string()
    })
}

/// Shortens `text` to at most `length` characters plus `...`, preferring
/// to cut at the last space.
pub fn truncate(text: &str, length: usize) -> Cow<'_, str> {
    let Some((cut_at, _)) = text.char_indices().nth(length) else {
        return Cow::Borrowed(text);
    };

    let hard_cut = &text[..cut_at];
    let cut = match hard_cut.rfind(' ') {
        Some(0) | None => hard_cut,
        Some(space) => &hard_cut[..space],
    };

    Cow::Owned(format!("{cut}..."))
}

pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG.replace_all(text, "")
}

/// The edit link on a story card, shown to the owner only.
pub fn edit_icon(
    story_owner: Id<UserMarker>,
    requester: Id<UserMarker>,
    story_id: Id<StoryMarker>,
    floating: bool,
) -> Markup {
    if story_owner != requester {
        return html! {};
    }

    let href = format!("/stories/edit/{story_id}");
    html! {
        @if floating {
            a.btn-floating.halfway-fab.blue href=(href) {
                i.fas.fa-edit.fa-small {}
            }
        } @else {
            a href=(href) {
                i.fas.fa-edit {}
            }
        }
    }
}

pub fn status_label(status: StoryStatus) -> &'static str {
    match status {
        StoryStatus::Public => "Public",
        StoryStatus::Private => "Private",
    }
}

pub fn status_select(selected: StoryStatus) -> Markup {
    html! {
        select #status name="status" {
            @for status in StoryStatus::ALL {
                option value=(status.as_str()) selected[status == selected] {
                    (status_label(status))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::views::helpers::{
        LONG_DATE, LONG_DATE_TIME, edit_icon, format_date, status_select, strip_tags, truncate,
    };
    use storyshare_common::model::{Id, story::StoryStatus};
    use time::macros::utc_datetime;

    #[test]
    fn dates() {
        let date = utc_datetime!(2025-03-07 15:04);

        assert_eq!(format_date(date, LONG_DATE), "March 7, 2025");
        assert_eq!(format_date(date, LONG_DATE_TIME), "March 7, 2025 3:04 pm");
        assert_eq!(format_date(date, "[not a component]"), date.to_string());
    }

    #[test]
    fn truncate_cuts_at_last_space() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("the quick brown fox", 12), "the quick...");
        assert_eq!(truncate("unbreakableword", 5), "unbre...");
        assert_eq!(truncate(" leading", 4), " lea...");
        assert_eq!(truncate("ünïcödé wörds", 9), "ünïcödé...");
    }

    #[test]
    fn strip_tags_spans_lines() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("a <span\nclass=\"x\">b</span> c"), "a b c");
        assert_eq!(strip_tags("1 < 2"), "1 < 2");
    }

    #[test]
    fn edit_icon_only_for_owner() {
        let owner = Id::from(1_u64);
        let story = Id::from(99_u64);

        let floating = edit_icon(owner, owner, story, true).into_string();
        assert!(floating.contains("href=\"/stories/edit/99\""));
        assert!(floating.contains("btn-floating"));

        let inline = edit_icon(owner, owner, story, false).into_string();
        assert!(inline.contains("href=\"/stories/edit/99\""));
        assert!(!inline.contains("btn-floating"));

        assert!(edit_icon(owner, Id::from(2_u64), story, true).into_string().is_empty());
    }

    #[test]
    fn select_marks_current_status() {
        let markup = status_select(StoryStatus::Private).into_string();

        assert!(markup.contains(r#"<option value="private" selected>Private</option>"#));
        assert!(markup.contains(r#"<option value="public">Public</option>"#));
    }
}
