//! Server-rendered pages.

pub mod errors;
pub mod helpers;
pub mod stories;

use helpers::{LONG_DATE, format_date, status_label};
use maud::{DOCTYPE, Markup, html};
use storyshare_common::model::{story::PartialStory, user::User};

const STYLESHEETS: [&str; 2] = [
    "https://cdnjs.cloudflare.com/ajax/libs/materialize/1.0.0/css/materialize.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css",
];

fn layout(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @for stylesheet in STYLESHEETS {
                    link rel="stylesheet" href=(stylesheet);
                }
                title { (title) " | StoryShare" }
            }
            body {
                nav {
                    div.nav-wrapper.container {
                        a.brand-logo href="/dashboard" { "StoryShare" }
                        ul.right {
                            li { a href="/stories" { "Public Stories" } }
                            li { a href="/dashboard" { "Dashboard" } }
                            li { a href="/stories/add" { "Add Story" } }
                        }
                    }
                }
                main.container {
                    (content)
                }
            }
        }
    }
}

pub fn landing() -> Markup {
    layout(
        "Welcome",
        &html! {
            div.card {
                div.card-content.center-align {
                    h3 { i.fas.fa-book-reader {} " StoryShare" }
                    p { "Create public and private stories from your life." }
                    p.grey-text { "Sign in through your account provider to continue." }
                }
            }
        },
    )
}

/// The requester's own stories, private ones included.
pub fn dashboard(user: &User, stories: &[PartialStory]) -> Markup {
    layout(
        "Dashboard",
        &html! {
            h6 { "Dashboard" }
            h3 { "Welcome, " (user.display_name.get()) }
            p { "Here are your stories" }
            @if stories.is_empty() {
                p { "You have not created any stories." }
            } @else {
                table.striped {
                    thead {
                        tr {
                            th { "Title" }
                            th { "Date" }
                            th { "Status" }
                            th {}
                        }
                    }
                    tbody {
                        @for story in stories {
                            tr {
                                td {
                                    a href=(format!("/stories/{}", story.id)) {
                                        (story.fields.title.get())
                                    }
                                }
                                td { (format_date(story.created_at, LONG_DATE)) }
                                td {
                                    span.dash-status { (status_label(story.fields.status)) }
                                }
                                td {
                                    a.btn.float-left href=(format!("/stories/edit/{}", story.id)) {
                                        i.fas.fa-edit {}
                                    }
                                    (stories::delete_form(story))
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
