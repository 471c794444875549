//! Database repository implementation

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::error::DbError;
use crate::models::*;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                owner_id INTEGER NOT NULL REFERENCES users(id),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_items_owner ON items(owner_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database migrations completed");
        Ok(())
    }

    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Uniqueness of username and email is checked with a single combined
    /// lookup before insertion.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        let existing = sqlx::query(
            r#"
            SELECT id FROM users WHERE username = ? OR email = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Err(DbError::Duplicate(
                "Username or email already exists".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    // ==================== Item Operations ====================

    /// Insert a new item owned by `owner_id`
    pub async fn insert_item(&self, item: NewItem) -> Result<Item, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO items (title, description, completed, owner_id, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.owner_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Item {
            id,
            title: item.title,
            description: item.description,
            completed: false,
            owner_id: item.owner_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// List all items owned by `owner_id`, newest first
    pub async fn list_items(&self, owner_id: i64) -> Result<Vec<Item>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, completed, owner_id, created_at, updated_at
            FROM items
            WHERE owner_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Item::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update an item matching both `id` and `owner_id`
    ///
    /// The combined predicate runs as a single UPDATE statement so there is
    /// no window between the ownership check and the write. A missing row
    /// and a row owned by someone else are indistinguishable to the caller.
    pub async fn update_item(
        &self,
        owner_id: i64,
        id: i64,
        update: UpdateItem,
    ) -> Result<Option<Item>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE items
            SET title = COALESCE(?, title),
                description = COALESCE(?, description),
                completed = COALESCE(?, completed),
                updated_at = ?
            WHERE id = ? AND owner_id = ?
            RETURNING id, title, description, completed, owner_id, created_at, updated_at
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.completed)
        .bind(now.to_rfc3339())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Item::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Delete an item matching both `id` and `owner_id`
    pub async fn delete_item(&self, owner_id: i64, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    async fn create_user(db: &Database, username: &str, email: &str) -> User {
        db.insert_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;
        create_user(&db, "alice", "alice@example.com").await;

        // Same email with a different username is still a duplicate
        let result = db
            .insert_user(NewUser {
                username: "alice2".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));

        // Same username with a different email too
        let result = db
            .insert_user(NewUser {
                username: "alice".to_string(),
                email: "other@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_get_user_by_email() {
        let db = test_db().await;
        let user = create_user(&db, "alice", "alice@example.com").await;

        let found = db.get_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let missing = db.get_user_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_items_is_owner_scoped_and_newest_first() {
        let db = test_db().await;
        let alice = create_user(&db, "alice", "alice@example.com").await;
        let bob = create_user(&db, "bob", "bob@example.com").await;

        for title in ["first", "second", "third"] {
            db.insert_item(NewItem {
                title: title.to_string(),
                description: String::new(),
                owner_id: alice.id,
            })
            .await
            .unwrap();
        }
        db.insert_item(NewItem {
            title: "bobs item".to_string(),
            description: String::new(),
            owner_id: bob.id,
        })
        .await
        .unwrap();

        let items = db.list_items(alice.id).await.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.owner_id == alice.id));
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);

        let bobs = db.list_items(bob.id).await.unwrap();
        assert_eq!(bobs.len(), 1);
    }

    #[tokio::test]
    async fn test_item_defaults() {
        let db = test_db().await;
        let alice = create_user(&db, "alice", "alice@example.com").await;

        let item = db
            .insert_item(NewItem {
                title: "buy milk".to_string(),
                description: String::new(),
                owner_id: alice.id,
            })
            .await
            .unwrap();

        assert_eq!(item.description, "");
        assert!(!item.completed);
    }

    #[tokio::test]
    async fn test_update_item_partial_fields() {
        let db = test_db().await;
        let alice = create_user(&db, "alice", "alice@example.com").await;
        let item = db
            .insert_item(NewItem {
                title: "buy milk".to_string(),
                description: "2 liters".to_string(),
                owner_id: alice.id,
            })
            .await
            .unwrap();

        let updated = db
            .update_item(
                alice.id,
                item.id,
                UpdateItem {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "buy milk");
        assert_eq!(updated.description, "2 liters");
    }

    #[tokio::test]
    async fn test_cross_owner_update_and_delete_look_like_not_found() {
        let db = test_db().await;
        let alice = create_user(&db, "alice", "alice@example.com").await;
        let bob = create_user(&db, "bob", "bob@example.com").await;
        let item = db
            .insert_item(NewItem {
                title: "buy milk".to_string(),
                description: String::new(),
                owner_id: alice.id,
            })
            .await
            .unwrap();

        // Bob touching Alice's item resolves exactly like a missing id
        let updated = db
            .update_item(
                bob.id,
                item.id,
                UpdateItem {
                    title: Some("stolen".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_none());

        let missing = db
            .update_item(bob.id, 9999, UpdateItem::default())
            .await
            .unwrap();
        assert!(missing.is_none());

        assert!(!db.delete_item(bob.id, item.id).await.unwrap());

        // Alice's item is untouched and still hers to delete
        let items = db.list_items(alice.id).await.unwrap();
        assert_eq!(items[0].title, "buy milk");
        assert!(db.delete_item(alice.id, item.id).await.unwrap());
    }
}
