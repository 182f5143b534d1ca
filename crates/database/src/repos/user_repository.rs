//! User repository for the member directory and membership records.

use crate::entities::user::{MemberPaymentStatus, MembershipTier, NewUser, User, UserFilter, UserUpdate};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

const USER_COLUMNS: &str = "id, name, email, membership_tier, payment_status, bio, birthday, \
     cohort, program_track, interests, profile_photo_url, is_verified_alumni, created_at, updated_at";

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Emails are stored lower-cased, so callers pass a normalised address.
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Insert a user. A taken email surfaces as [`DatabaseError::Duplicate`].
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, name, email, membership_tier, payment_status, bio, birthday, \
             cohort, program_track, interests, profile_photo_url, is_verified_alumni, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new_user.name)
        .bind(&new_user.email)
        .bind(new_user.membership_tier)
        .bind(new_user.payment_status)
        .bind(&new_user.bio)
        .bind(new_user.birthday)
        .bind(&new_user.cohort)
        .bind(&new_user.program_track)
        .bind(Json(&new_user.interests))
        .bind(new_user.is_verified_alumni)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(user_id = %id, tier = %new_user.membership_tier, "user created");

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", &id))
    }

    pub async fn list(&self, filter: &UserFilter) -> DatabaseResult<Vec<User>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE 1 = 1"));

        if let Some(cohort) = &filter.cohort {
            builder.push(" AND cohort = ").push_bind(cohort.clone());
        }
        if let Some(track) = &filter.program_track {
            builder.push(" AND program_track = ").push_bind(track.clone());
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (lower(name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR lower(email) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR lower(coalesce(bio, '')) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        builder
            .push(" ORDER BY name ASC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.skip);

        let users = builder
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    /// Apply the provided profile fields. Unknown ids yield [`DatabaseError::NotFound`].
    pub async fn update(&self, id: &str, update: &UserUpdate) -> DatabaseResult<User> {
        if update.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| DatabaseError::not_found("user", id));
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(name) = &update.name {
            builder.push(", name = ").push_bind(name.clone());
        }
        if let Some(bio) = &update.bio {
            builder.push(", bio = ").push_bind(bio.clone());
        }
        if let Some(birthday) = update.birthday {
            builder.push(", birthday = ").push_bind(birthday);
        }
        if let Some(cohort) = &update.cohort {
            builder.push(", cohort = ").push_bind(cohort.clone());
        }
        if let Some(track) = &update.program_track {
            builder.push(", program_track = ").push_bind(track.clone());
        }
        if let Some(interests) = &update.interests {
            builder.push(", interests = ").push_bind(Json(interests.clone()));
        }
        if let Some(url) = &update.profile_photo_url {
            builder.push(", profile_photo_url = ").push_bind(url.clone());
        }
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user", id));
        }

        info!(user_id = %id, "user profile updated");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))
    }

    /// Move a member onto a tier, marking the membership active.
    pub async fn activate_membership(
        &self,
        id: &str,
        tier: MembershipTier,
    ) -> DatabaseResult<User> {
        let result = sqlx::query(
            "UPDATE users SET membership_tier = ?, payment_status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(tier)
        .bind(MemberPaymentStatus::Active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("user", id));
        }

        info!(user_id = %id, tier = %tier, "membership activated");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("user", id))
    }

    pub async fn count(&self) -> DatabaseResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::create_test_database;
    use chrono::NaiveDate;

    fn alumnus(name: &str, cohort: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: format!("{}@alumni.test", name.to_lowercase()),
            cohort: Some(cohort.to_string()),
            program_track: Some("Software Engineering".to_string()),
            interests: vec!["mentoring".to_string()],
            is_verified_alumni: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trips_json_interests() {
        let (pool, _dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        let created = repo.create(&alumnus("Ada", "2019")).await.unwrap();
        assert_eq!(created.interests, vec!["mentoring".to_string()]);
        assert_eq!(created.membership_tier, MembershipTier::Free);

        let found = repo.find_by_email("ada@alumni.test").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let (pool, _dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        repo.create(&alumnus("Ada", "2019")).await.unwrap();
        let err = repo.create(&alumnus("Ada", "2020")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn list_applies_filters() {
        let (pool, _dir) = create_test_database().await;
        let repo = UserRepository::new(pool);

        repo.create(&alumnus("Ada", "2019")).await.unwrap();
        repo.create(&alumnus("Bo", "2020")).await.unwrap();
        repo.create(&alumnus("Cy", "2020")).await.unwrap();

        let filter = UserFilter {
            cohort: Some("2020".into()),
            limit: 50,
            ..Default::default()
        };
        assert_eq!(repo.list(&filter).await.unwrap().len(), 2);

        let filter = UserFilter {
            search: Some("ADA".into()),
            limit: 50,
            ..Default::default()
        };
        let found = repo.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Ada");
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let (pool, _dir) = create_test_database().await;
        let repo = UserRepository::new(pool);
        let user = repo.create(&alumnus("Ada", "2019")).await.unwrap();

        let update = UserUpdate {
            bio: Some("Platform engineer".into()),
            birthday: NaiveDate::from_ymd_opt(1990, 4, 2),
            ..Default::default()
        };
        let updated = repo.update(&user.id, &update).await.unwrap();
        assert_eq!(updated.bio.as_deref(), Some("Platform engineer"));
        assert_eq!(updated.birthday, NaiveDate::from_ymd_opt(1990, 4, 2));
        assert_eq!(updated.cohort.as_deref(), Some("2019"));

        let err = repo.update("missing", &update).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn activate_membership_sets_tier_and_status() {
        let (pool, _dir) = create_test_database().await;
        let repo = UserRepository::new(pool);
        let user = repo.create(&alumnus("Ada", "2019")).await.unwrap();

        let user = repo
            .activate_membership(&user.id, MembershipTier::Lifetime)
            .await
            .unwrap();
        assert_eq!(user.membership_tier, MembershipTier::Lifetime);
        assert_eq!(user.payment_status, MemberPaymentStatus::Active);
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
