//! PostgreSQL repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DbBackend, DbConn, DbErr, EntityTrait, QueryOrder, Statement, Value,
};

use blog_core::domain::{NewPost, Post, PostId};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};

pub(crate) const UPDATE_POST: &str = "UPDATE posts SET author = $1, title = $2, content = $3, \
     cover = $4, updated_at = NOW() WHERE id = $5 RETURNING *";

pub(crate) const DELETE_POST: &str = "DELETE FROM posts WHERE id = $1 RETURNING *";

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Give back the connection, e.g. to close the pool.
    pub fn into_inner(self) -> DbConn {
        self.db
    }
}

/// Log a failed statement with its context, then classify the driver error.
fn query_failed(operation: &'static str, id: Option<PostId>) -> impl FnOnce(DbErr) -> RepoError {
    move |err| {
        tracing::error!(operation, post_id = ?id, error = %err, "Post query failed");
        classify(err)
    }
}

fn classify(err: DbErr) -> RepoError {
    if let Some(sql_err) = err.sql_err() {
        return RepoError::Constraint(sql_err.to_string());
    }
    match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        _ => RepoError::Query(err.to_string()),
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        tracing::debug!("Listing posts");

        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_failed("list", None))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Finding post by id");

        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_failed("find_by_id", Some(id)))?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        tracing::debug!(title = %post.title, "Creating post");

        let active_model: post::ActiveModel = post.into();
        let model = active_model
            .insert(&self.db)
            .await
            .map_err(query_failed("create", None))?;

        Ok(model.into())
    }

    async fn update(&self, id: PostId, post: NewPost) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Updating post");

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            UPDATE_POST,
            [
                Value::from(post.author),
                Value::from(post.title),
                Value::from(post.content),
                Value::from(post.cover),
                Value::from(id),
            ],
        );
        let result = PostEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(query_failed("update", Some(id)))?;

        Ok(result.map(Into::into))
    }

    async fn delete(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Deleting post");

        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, DELETE_POST, [Value::from(id)]);
        let result = PostEntity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .map_err(query_failed("delete", Some(id)))?;

        if let Some(row) = &result {
            tracing::info!(post_id = row.id, title = %row.title, "Post deleted");
        }

        Ok(result.map(Into::into))
    }
}
