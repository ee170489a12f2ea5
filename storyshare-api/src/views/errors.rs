use crate::views::layout;
use maud::{Markup, html};

pub fn not_found() -> Markup {
    layout(
        "Not Found",
        &html! {
            h1 { "Oops!" }
            p { "Couldn't find that page." }
            a href="/dashboard" { "Go to your dashboard" }
        },
    )
}

/// Shown for every failure that is not a missing page.
pub fn server_error() -> Markup {
    layout(
        "Something Went Wrong",
        &html! {
            h1 { "Uh oh" }
            p { "Something went wrong." }
            a href="/dashboard" { "Go to your dashboard" }
        },
    )
}
