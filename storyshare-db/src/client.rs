use crate::{
    record::{FullStoryRecord, PartialStoryRecord, SessionRecord, UserRecord, to_primitive},
    store::{Result, Store},
};
use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::{PgPool, postgres::PgPoolOptions, query, query_as};
use storyshare_common::{
    model::{
        Id, StoryshareSnowflake, StoryshareSnowflakeGenerator,
        auth::{Session, SessionTokenHash},
        story::{PartialStory, Story, StoryFields, StoryMarker},
        user::{CreateUser, User, UserMarker},
    },
    snowflake::{ProcessId, WorkerId},
};
use tracing::info;

const PARTIAL_STORY_COLUMNS: &str = "
    stories.story_snowflake,
    stories.title,
    stories.body,
    stories.status,
    stories.user_snowflake,
    stories.created_at";

const FULL_STORY_SELECT: &str = "
    SELECT
        stories.story_snowflake,
        stories.title,
        stories.body,
        stories.status,
        stories.user_snowflake,
        stories.created_at,
        users.display_name,
        users.created_at AS user_created_at
    FROM
        stories.stories
        JOIN users.users ON users.user_snowflake = stories.user_snowflake";

const NEWEST_FIRST: &str = "ORDER BY stories.created_at DESC, stories.story_snowflake DESC";

pub struct DbClient {
    pool: PgPool,
    snowflake_generator: Mutex<StoryshareSnowflakeGenerator>,
}

fn snowflake_param<Marker>(id: Id<Marker>) -> i64 {
    id.snowflake().get().cast_signed()
}

impl DbClient {
    #[must_use]
    pub fn new(pool: PgPool, worker_id: WorkerId, process_id: ProcessId) -> Self {
        let snowflake_generator =
            Mutex::new(StoryshareSnowflakeGenerator::new(worker_id, process_id));

        Self {
            pool,
            snowflake_generator,
        }
    }

    /// Opens the pool and brings the schema up to date.
    pub async fn connect(
        database_url: &str,
        worker_id: WorkerId,
        process_id: ProcessId,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new().connect(database_url).await?;
        info!("Connected to database");

        sqlx::migrate!().run(&pool).await?;
        info!("Database migrations are up to date");

        Ok(Self::new(pool, worker_id, process_id))
    }

    fn generate_snowflake(&self) -> Result<StoryshareSnowflake> {
        Ok(self.snowflake_generator.lock().generate()?)
    }

    async fn fetch_full_stories(&self, sql: &str, user_id: Option<i64>) -> Result<Vec<Story>> {
        let mut statement = query_as::<_, FullStoryRecord>(sql);
        if let Some(user_id) = user_id {
            statement = statement.bind(user_id);
        }

        let records = statement.fetch_all(&self.pool).await?;
        let stories = records
            .into_iter()
            .map(Story::try_from)
            .collect::<Result<_, _>>()?;
        Ok(stories)
    }
}

#[async_trait]
impl Store for DbClient {
    async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT
                users.user_snowflake,
                users.display_name,
                users.created_at
            FROM
                users.users
            WHERE
                users.user_snowflake = $1
            ",
        )
        .bind(snowflake_param(user_id))
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    async fn create_user(&self, user: &CreateUser) -> Result<User> {
        let user_snowflake = self.generate_snowflake()?;

        let record = query_as::<_, UserRecord>(
            "
            INSERT INTO users.users (user_snowflake, display_name)
            VALUES ($1, $2)
            RETURNING user_snowflake, display_name, created_at
            ",
        )
        .bind(user_snowflake.get().cast_signed())
        .bind(user.display_name.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(record.try_into()?)
    }

    async fn fetch_session(&self, token_hash: &SessionTokenHash) -> Result<Option<Session>> {
        let record = query_as::<_, SessionRecord>(
            "
            SELECT
                sessions.user_snowflake,
                sessions.token_hash,
                sessions.created_at,
                sessions.expires_after_seconds
            FROM
                auth.sessions
            WHERE
                sessions.token_hash = $1
            ",
        )
        .bind(&token_hash.0[..])
        .fetch_optional(&self.pool)
        .await?;

        let session = record.map(Session::try_from).transpose()?;
        Ok(session)
    }

    async fn create_session(&self, session: &Session) -> Result<()> {
        query(
            "
            INSERT INTO auth.sessions (token_hash, user_snowflake, created_at, expires_after_seconds)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&session.token_hash.0[..])
        .bind(snowflake_param(session.user))
        .bind(to_primitive(session.created_at))
        .bind(
            session
                .expires_after
                .map(|expires_after| expires_after.whole_seconds()),
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_story(
        &self,
        fields: &StoryFields,
        author_id: Id<UserMarker>,
    ) -> Result<PartialStory> {
        let story_snowflake = self.generate_snowflake()?;

        let record = query_as::<_, PartialStoryRecord>(&format!(
            "
            INSERT INTO stories.stories (story_snowflake, title, body, status, user_snowflake)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PARTIAL_STORY_COLUMNS}
            "
        ))
        .bind(story_snowflake.get().cast_signed())
        .bind(fields.title.get())
        .bind(fields.body.get())
        .bind(fields.status.as_str())
        .bind(snowflake_param(author_id))
        .fetch_one(&self.pool)
        .await?;

        Ok(record.try_into()?)
    }

    async fn fetch_story(&self, story_id: Id<StoryMarker>) -> Result<Option<Story>> {
        let record = query_as::<_, FullStoryRecord>(&format!(
            "{FULL_STORY_SELECT} WHERE stories.story_snowflake = $1"
        ))
        .bind(snowflake_param(story_id))
        .fetch_optional(&self.pool)
        .await?;

        let story = record.map(Story::try_from).transpose()?;
        Ok(story)
    }

    async fn fetch_partial_story(
        &self,
        story_id: Id<StoryMarker>,
    ) -> Result<Option<PartialStory>> {
        let record = query_as::<_, PartialStoryRecord>(&format!(
            "
            SELECT {PARTIAL_STORY_COLUMNS}
            FROM stories.stories
            WHERE stories.story_snowflake = $1
            "
        ))
        .bind(snowflake_param(story_id))
        .fetch_optional(&self.pool)
        .await?;

        let story = record.map(PartialStory::try_from).transpose()?;
        Ok(story)
    }

    async fn update_story(
        &self,
        story_id: Id<StoryMarker>,
        fields: &StoryFields,
    ) -> Result<Option<PartialStory>> {
        let record = query_as::<_, PartialStoryRecord>(&format!(
            "
            UPDATE stories.stories
            SET title = $2, body = $3, status = $4
            WHERE stories.story_snowflake = $1
            RETURNING {PARTIAL_STORY_COLUMNS}
            "
        ))
        .bind(snowflake_param(story_id))
        .bind(fields.title.get())
        .bind(fields.body.get())
        .bind(fields.status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let story = record.map(PartialStory::try_from).transpose()?;
        Ok(story)
    }

    async fn delete_story(&self, story_id: Id<StoryMarker>) -> Result<bool> {
        let result = query("DELETE FROM stories.stories WHERE stories.story_snowflake = $1")
            .bind(snowflake_param(story_id))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_public_stories(&self) -> Result<Vec<Story>> {
        self.fetch_full_stories(
            &format!("{FULL_STORY_SELECT} WHERE stories.status = 'public' {NEWEST_FIRST}"),
            None,
        )
        .await
    }

    async fn fetch_user_public_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<Story>> {
        self.fetch_full_stories(
            &format!(
                "{FULL_STORY_SELECT}
                WHERE stories.user_snowflake = $1 AND stories.status = 'public'
                {NEWEST_FIRST}"
            ),
            Some(snowflake_param(user_id)),
        )
        .await
    }

    async fn fetch_user_stories(&self, user_id: Id<UserMarker>) -> Result<Vec<PartialStory>> {
        let records = query_as::<_, PartialStoryRecord>(&format!(
            "
            SELECT {PARTIAL_STORY_COLUMNS}
            FROM stories.stories
            WHERE stories.user_snowflake = $1
            {NEWEST_FIRST}
            "
        ))
        .bind(snowflake_param(user_id))
        .fetch_all(&self.pool)
        .await?;

        let stories = records
            .into_iter()
            .map(PartialStory::try_from)
            .collect::<Result<_, _>>()?;
        Ok(stories)
    }

    async fn search_public_stories(&self, query_text: &str) -> Result<Vec<Story>> {
        let records = query_as::<_, FullStoryRecord>(&format!(
            "{FULL_STORY_SELECT}
            WHERE stories.status = 'public'
                AND strpos(lower(stories.title), lower($1)) > 0
            {NEWEST_FIRST}"
        ))
        .bind(query_text)
        .fetch_all(&self.pool)
        .await?;

        let stories = records
            .into_iter()
            .map(Story::try_from)
            .collect::<Result<_, _>>()?;
        Ok(stories)
    }
}
