//! User service for directory, profile and member record operations.

use alumni_database::{
    DatabaseError, MemberPaymentStatus, MembershipTier, NewUser, User, UserRepository, UserUpdate,
};
use sqlx::SqlitePool;
use tracing::info;

use crate::types::{CreateUserRequest, UpdateUserRequest, UserError, UserListQuery, UserResult};
use crate::utils::{validate_new_user, validate_update};

#[derive(Clone)]
pub struct UserService {
    repository: UserRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: UserRepository::new(pool),
        }
    }

    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::UserNotFound { id: id.to_string() })
    }

    pub async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self
            .repository
            .find_by_email(&email.trim().to_lowercase())
            .await?)
    }

    pub async fn list_users(&self, query: UserListQuery) -> UserResult<Vec<User>> {
        Ok(self.repository.list(&query.into_filter()).await?)
    }

    /// Create a directory profile. New members start on the free tier, pending payment.
    pub async fn create_user(&self, request: CreateUserRequest) -> UserResult<User> {
        self.insert(request, MemberPaymentStatus::Pending).await
    }

    /// Create a member record whose membership is already in good standing.
    pub async fn create_active_member(
        &self,
        name: &str,
        email: &str,
        tier: MembershipTier,
    ) -> UserResult<User> {
        let request = CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            membership_tier: Some(tier),
            ..Default::default()
        };
        self.insert(request, MemberPaymentStatus::Active).await
    }

    async fn insert(
        &self,
        request: CreateUserRequest,
        payment_status: MemberPaymentStatus,
    ) -> UserResult<User> {
        let (name, email) = validate_new_user(&request)?;

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let user = self
            .repository
            .create(&NewUser {
                name,
                email,
                membership_tier: request.membership_tier.unwrap_or_default(),
                payment_status,
                bio: request.bio,
                birthday: request.birthday,
                cohort: request.cohort,
                program_track: request.program_track,
                interests: request
                    .interests
                    .into_iter()
                    .map(|interest| interest.trim().to_string())
                    .collect(),
                is_verified_alumni: request.is_verified_alumni,
            })
            .await?;

        info!(user_id = %user.id, tier = %user.membership_tier, "member registered");
        Ok(user)
    }

    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> UserResult<User> {
        validate_update(&request)?;
        self.repository
            .update(id, &request.into())
            .await
            .map_err(|err| missing_user(err, id))
    }

    pub async fn set_profile_photo(&self, id: &str, photo_url: &str) -> UserResult<User> {
        let update = UserUpdate {
            profile_photo_url: Some(photo_url.to_string()),
            ..Default::default()
        };
        let user = self
            .repository
            .update(id, &update)
            .await
            .map_err(|err| missing_user(err, id))?;
        info!(user_id = %id, "profile photo updated");
        Ok(user)
    }

    pub async fn activate_membership(&self, id: &str, tier: MembershipTier) -> UserResult<User> {
        self.repository
            .activate_membership(id, tier)
            .await
            .map_err(|err| missing_user(err, id))
    }
}

fn missing_user(error: DatabaseError, id: &str) -> UserError {
    match error {
        DatabaseError::NotFound(_) => UserError::UserNotFound { id: id.to_string() },
        other => other.into(),
    }
}
