use crate::views::{
    helpers::{
        LONG_DATE, LONG_DATE_TIME, edit_icon, format_date, status_select, strip_tags, truncate,
    },
    layout,
};
use maud::{Markup, html};
use storyshare_common::model::{
    Id,
    story::{PartialStory, Story, StoryStatus},
    user::UserMarker,
};

const EXCERPT_LEN: usize = 150;

fn story_form(action: &str, story: Option<&PartialStory>) -> Markup {
    let (title, body, status) = story.map_or(("", "", StoryStatus::default()), |story| {
        (
            story.fields.title.get(),
            story.fields.body.get(),
            story.fields.status,
        )
    });

    html! {
        form action=(action) method="POST" {
            div.input-field {
                input #title type="text" name="title" value=(title) required;
                label for="title" { "Title" }
            }
            div.input-field {
                (status_select(status))
                label for="status" { "Status" }
            }
            div.input-field {
                h5 { "Tell Us Your Story:" }
                textarea #body name="body" required { (body) }
            }
            input.btn type="submit" value="Save";
            a.btn.orange href="/dashboard" { "Cancel" }
        }
    }
}

pub fn add() -> Markup {
    layout(
        "Add Story",
        &html! {
            h3 { "Add Story" }
            (story_form("/stories", None))
        },
    )
}

pub fn edit(story: &PartialStory) -> Markup {
    layout(
        "Edit Story",
        &html! {
            h3 { "Edit Story" }
            (story_form(&format!("/stories/{}?_method=PUT", story.id), Some(story)))
        },
    )
}

pub fn delete_form(story: &PartialStory) -> Markup {
    html! {
        form action=(format!("/stories/{}?_method=DELETE", story.id)) method="POST" {
            button.btn.red type="submit" {
                i.fas.fa-trash {}
            }
        }
    }
}

fn search_form(query: Option<&str>) -> Markup {
    html! {
        form action="/stories/search" method="GET" {
            div.input-field {
                input #query type="search" name="query" value=[query] placeholder="Search by title";
            }
        }
    }
}

pub fn search() -> Markup {
    layout(
        "Search Stories",
        &html! {
            h3 { "Search Stories" }
            (search_form(None))
        },
    )
}

/// Story cards. Bodies are shown as a tag-free excerpt.
pub fn index(
    heading: &str,
    query: Option<&str>,
    stories: &[Story],
    requester: Id<UserMarker>,
) -> Markup {
    layout(
        heading,
        &html! {
            h3 { (heading) }
            (search_form(query))
            div.row {
                @if stories.is_empty() {
                    p { "No stories to display" }
                }
                @for story in stories {
                    div.col.s12.m4 {
                        div.card {
                            div.card-image {
                                (edit_icon(story.author.id, requester, story.id, true))
                            }
                            div.card-content.center-align {
                                h5 { (story.fields.title.get()) }
                                p.story-text {
                                    (truncate(&strip_tags(story.fields.body.get()), EXCERPT_LEN))
                                }
                                br;
                                div.chip {
                                    a href=(format!("/stories/user/{}", story.author.id)) {
                                        (story.author.display_name.get())
                                    }
                                }
                            }
                            div.card-action.center-align {
                                a.btn.grey href=(format!("/stories/{}", story.id)) { "Read More" }
                            }
                        }
                    }
                }
            }
        },
    )
}

/// The full story. The body is escaped, never rendered as markup.
pub fn show(story: &Story, requester: Id<UserMarker>) -> Markup {
    layout(
        story.fields.title.get(),
        &html! {
            div.row {
                div.col.s12.m8 {
                    h3 {
                        (story.fields.title.get())
                        small { (edit_icon(story.author.id, requester, story.id, false)) }
                    }
                    div.card.story {
                        div.card-content {
                            span.card-title { (format_date(story.created_at, LONG_DATE_TIME)) }
                            p style="white-space: pre-wrap" { (story.fields.body.get()) }
                        }
                    }
                }
                div.col.s12.m4 {
                    div.card.center-align {
                        div.card-content {
                            span.card-title { (story.author.display_name.get()) }
                            p.grey-text {
                                "Member since " (format_date(story.author.created_at, LONG_DATE))
                            }
                        }
                        div.card-action {
                            a href=(format!("/stories/user/{}", story.author.id)) {
                                "More From " (story.author.display_name.get())
                            }
                        }
                    }
                }
            }
        },
    )
}
