use crate::store::{DbError, Result, Store};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::{
    cmp::Reverse,
    collections::{BTreeMap, HashMap},
};
use storyshare_common::model::{
    Id, StoryshareSnowflakeGenerator,
    auth::{Session, SessionTokenHash},
    story::{PartialStory, Story, StoryFields, StoryMarker, StoryStatus},
    user::{CreateUser, User, UserMarker},
};
use time::UtcDateTime;

/// Keeps everything in process memory. Behaves like [`crate::client::DbClient`],
/// including the foreign key from stories to users.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    snowflake_generator: StoryshareSnowflakeGenerator,
    users: HashMap<Id<UserMarker>, User>,
    sessions: HashMap<SessionTokenHash, Session>,
    stories: BTreeMap<Id<StoryMarker>, PartialStory>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    fn join(&self, story: &PartialStory) -> Result<Story> {
        let author = self
            .users
            .get(&story.author_id)
            .ok_or(DbError::MissingUser(story.author_id))?;

        Ok(story.clone().with_author(author.clone()))
    }

    fn newest_first<'a>(
        &'a self,
        filter: impl Fn(&PartialStory) -> bool,
    ) -> impl Iterator<Item = &'a PartialStory> {
        let mut stories: Vec<_> = self.stories.values().filter(|&story| filter(story)).collect();
        stories.sort_by_key(|story| Reverse((story.created_at, story.id)));
        stories.into_iter()
    }

    fn joined_newest_first(&self, filter: impl Fn(&PartialStory) -> bool) -> Result<Vec<Story>> {
        self.newest_first(filter)
            .map(|story| self.join(story))
            .collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        Ok(self.inner.lock().users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: &CreateUser) -> Result<User> {
        let mut inner = self.inner.lock();
        let user = User {
            id: inner.snowflake_generator.generate()?.into(),
            display_name: user.display_name.clone(),
            created_at: UtcDateTime::now(),
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn fetch_session(&self, token_hash: &SessionTokenHash) -> Result<Option<Session>> {
        Ok(self.inner.lock().sessions.get(token_hash).cloned())
    }

    async fn create_session(&self, session: &Session) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.users.contains_key(&session.user) {
            return Err(DbError::MissingUser(session.user));
        }
        inner
            .sessions
            .insert(session.token_hash.clone(), session.clone());

        Ok(())
    }

    async fn create_story(
        &self,
        fields: &StoryFields,
        author_id: Id<UserMarker>,
    ) -> Result<PartialStory> {
        let mut inner = self.inner.lock();
        if !inner.users.contains_key(&author_id) {
            return Err(DbError::MissingUser(author_id));
        }

        let story = PartialStory {
            id: inner.snowflake_generator.generate()?.into(),
            author_id,
            fields: fields.clone(),
            created_at: UtcDateTime::now(),
        };
        inner.stories.insert(story.id, story.clone());

        Ok(story)
    }

    async fn fetch_story(&self, story_id: Id<StoryMarker>) -> Result<Option<Story>> {
        let inner = self.inner.lock();
        inner
            .stories
            .get(&story_id)
            .map(|story| inner.join(story))
            .transpose()
    }

    async fn fetch_partial_story(
        &self,
        story_id: Id<StoryMarker>,
    ) -> Result<Option<PartialStory>> {
        Ok(self.inner.lock().stories.get(&story_id).cloned())
    }

    async fn update_story(
        &self,
        story_id: Id<StoryMarker>,
        fields: &StoryFields,
    ) -> Result<Option<PartialStory>> {
        let mut inner = self.inner.lock();
        let updated = inner.stories.get_mut(&story_id).map(|story| {
            story.fields = fields.clone();
            story.clone()
        });

        Ok(updated)
    }

    async fn delete_story(&self, story_id: Id<StoryMarker>) -> Result<bool> {
        Ok(self.inner.lock().stories.remove(&story_id).is_some())
    }

    async fn fetch_public_stories(&self) -> Result<Vec<Story>> {
        self.inner
            .lock()
            .joined_newest_first(|story| story.fields.status == StoryStatus::Public)
    }

    async fn fetch_user_public_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<Story>> {
        self.inner.lock().joined_newest_first(|story| {
            story.author_id == user_id && story.fields.status == StoryStatus::Public
        })
    }

    async fn fetch_user_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<PartialStory>> {
        let inner = self.inner.lock();
        let stories = inner
            .newest_first(|story| story.author_id == user_id)
            .cloned()
            .collect();

        Ok(stories)
    }

    async fn search_public_stories(&self, query: &str) -> Result<Vec<Story>> {
        let query = query.to_lowercase();
        self.inner.lock().joined_newest_first(|story| {
            story.fields.status == StoryStatus::Public
                && story.fields.title.get().to_lowercase().contains(&query)
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        memory::MemoryStore,
        store::{DbError, Store},
        test_util::{fields, user},
    };
    use storyshare_common::model::{Id, story::StoryStatus};

    #[tokio::test]
    async fn listings_are_newest_first_and_public_only() {
        let store = MemoryStore::new();
        let alice = user(&store, "Alice").await;

        let first = store
            .create_story(&fields("First", StoryStatus::Public), alice.id)
            .await
            .unwrap();
        store
            .create_story(&fields("Hidden", StoryStatus::Private), alice.id)
            .await
            .unwrap();
        let third = store
            .create_story(&fields("Third", StoryStatus::Public), alice.id)
            .await
            .unwrap();

        let public: Vec<_> = store
            .fetch_public_stories()
            .await
            .unwrap()
            .into_iter()
            .map(|story| story.id)
            .collect();
        assert_eq!(public, [third.id, first.id]);

        let own = store.fetch_user_stories(alice.id).await.unwrap();
        assert_eq!(own.len(), 3);
        assert_eq!(own[0].id, third.id);
    }

    #[tokio::test]
    async fn user_public_stories_exclude_private_and_other_users() {
        let store = MemoryStore::new();
        let alice = user(&store, "Alice").await;
        let bob = user(&store, "Bob").await;

        store
            .create_story(&fields("Alice public", StoryStatus::Public), alice.id)
            .await
            .unwrap();
        store
            .create_story(&fields("Alice private", StoryStatus::Private), alice.id)
            .await
            .unwrap();
        store
            .create_story(&fields("Bob public", StoryStatus::Public), bob.id)
            .await
            .unwrap();

        let stories = store.fetch_user_public_stories(alice.id).await.unwrap();
        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].fields.title.get(), "Alice public");
        assert_eq!(stories[0].author, alice);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = MemoryStore::new();
        let alice = user(&store, "Alice").await;
        store
            .create_story(&fields("Winter Tale", StoryStatus::Public), alice.id)
            .await
            .unwrap();
        store
            .create_story(&fields("Winter Secret", StoryStatus::Private), alice.id)
            .await
            .unwrap();

        for query in ["winter", "Tale", "WINTER TALE", "nter t"] {
            let found = store.search_public_stories(query).await.unwrap();
            assert_eq!(found.len(), 1, "query {query:?}");
            assert_eq!(found[0].fields.title.get(), "Winter Tale");
        }
        assert!(store.search_public_stories("Summer").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_delete_missing_story() {
        let store = MemoryStore::new();
        let alice = user(&store, "Alice").await;
        let story = store
            .create_story(&fields("Draft", StoryStatus::Private), alice.id)
            .await
            .unwrap();

        let updated = store
            .update_story(story.id, &fields("Final", StoryStatus::Public))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.fields.title.get(), "Final");
        assert_eq!(updated.created_at, story.created_at);

        assert!(store.delete_story(story.id).await.unwrap());
        assert!(!store.delete_story(story.id).await.unwrap());
        assert!(
            store
                .update_story(story.id, &fields("Again", StoryStatus::Public))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn stories_need_an_existing_author() {
        let store = MemoryStore::new();

        let result = store
            .create_story(&fields("Orphan", StoryStatus::Public), Id::from(99_u64))
            .await;
        assert!(matches!(result, Err(DbError::MissingUser(_))));
    }
}
