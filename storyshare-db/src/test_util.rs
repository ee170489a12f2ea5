use crate::store::Store;
use storyshare_common::model::{
    story::{StoryBody, StoryFields, StoryStatus, StoryTitle},
    user::{CreateUser, DisplayName, User},
};

pub fn fields(title: &str, status: StoryStatus) -> StoryFields {
    StoryFields {
        title: StoryTitle::new(title.to_owned()).unwrap(),
        body: StoryBody::new(format!("The story of {title}.")).unwrap(),
        status,
    }
}

pub async fn user(store: &dyn Store, name: &str) -> User {
    store
        .create_user(&CreateUser {
            display_name: DisplayName::new(name.to_owned()).unwrap(),
        })
        .await
        .unwrap()
}
