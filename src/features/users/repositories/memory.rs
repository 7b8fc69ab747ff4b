//! In-memory user, role and profile store for service and handler tests.
//! Seeded with the ADMIN, MANAGER and USER roles (ids 1, 2, 3).

use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;

use super::{RoleRepository, UserProfileRepository, UserRepository};
use crate::core::error::{AppError, Result};
use crate::features::users::models::{ProfileFields, Role, User, UserFields, UserProfile};
use crate::shared::pagination::{page_slice, PageRequest};

struct State {
    next_id: i64,
    users: Vec<User>,
    roles: Vec<Role>,
    user_roles: HashMap<i64, Vec<i64>>,
    profiles: HashMap<i64, UserProfile>,
}

pub struct MemoryUserStore {
    state: Mutex<State>,
    fail_profile_writes: AtomicBool,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        let roles = ["ADMIN", "MANAGER", "USER"]
            .iter()
            .zip(1..)
            .map(|(name, id)| Role {
                id,
                name: name.to_string(),
            })
            .collect();

        Self {
            state: Mutex::new(State {
                next_id: 0,
                users: Vec::new(),
                roles,
                user_roles: HashMap::new(),
                profiles: HashMap::new(),
            }),
            fail_profile_writes: AtomicBool::new(false),
        }
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later profile upsert fail with a database error
    pub fn fail_profile_writes(&self) {
        self.fail_profile_writes.store(true, AtomicOrdering::SeqCst);
    }

    /// Insert a user with default flags and the given role ids
    pub fn seed_user(&self, email: &str, role_ids: &[i64]) -> User {
        let mut state = self.state.lock().unwrap();
        let user = new_user(&mut state, &default_fields(email));
        state.user_roles.insert(user.id, role_ids.to_vec());
        user
    }

    pub fn profile(&self, user_id: i64) -> Option<UserProfile> {
        self.state.lock().unwrap().profiles.get(&user_id).cloned()
    }
}

fn default_fields(email: &str) -> UserFields {
    UserFields {
        email: email.to_string(),
        active: true,
        account_non_locked: true,
        failed_login_attempts: 0,
        email_verified: false,
        must_change_password: false,
    }
}

fn new_user(state: &mut State, fields: &UserFields) -> User {
    state.next_id += 1;
    let now = Utc::now();
    let user = User {
        id: state.next_id,
        email: fields.email.clone(),
        active: fields.active,
        account_non_locked: fields.account_non_locked,
        failed_login_attempts: fields.failed_login_attempts,
        email_verified: fields.email_verified,
        must_change_password: fields.must_change_password,
        created_at: now,
        updated_at: now,
    };
    state.users.push(user.clone());
    user
}

fn sorted_roles(state: &State, ids: &[i64]) -> Vec<Role> {
    let mut roles: Vec<Role> = state
        .roles
        .iter()
        .filter(|r| ids.contains(&r.id))
        .cloned()
        .collect();
    roles.sort_by(|a, b| a.name.cmp(&b.name));
    roles
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn count(&self) -> Result<i64> {
        Ok(self.state.lock().unwrap().users.len() as i64)
    }

    async fn find_page(&self, request: &PageRequest) -> Result<Vec<User>> {
        let users = self.state.lock().unwrap().users.clone();
        Ok(page_slice(users, request, |a, b| {
            let by_field = match request.sort.name {
                "email" => a.email.cmp(&b.email),
                "active" => a.active.cmp(&b.active),
                _ => Ordering::Equal,
            };
            by_field.then(a.id.cmp(&b.id))
        }))
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let mut users = self.state.lock().unwrap().users.clone();
        users.sort_by(|a, b| a.email.cmp(&b.email).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn exists_by_email(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != exclude_id))
    }

    async fn find_roles(&self, user_id: i64) -> Result<Vec<Role>> {
        let state = self.state.lock().unwrap();
        let ids = state.user_roles.get(&user_id).cloned().unwrap_or_default();
        Ok(sorted_roles(&state, &ids))
    }

    async fn insert(&self, fields: &UserFields, role_ids: &[i64]) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&fields.email))
        {
            return Err(AppError::duplicate("user", "email", &fields.email));
        }
        let user = new_user(&mut state, fields);
        state.user_roles.insert(user.id, role_ids.to_vec());
        Ok(user)
    }

    async fn update(&self, id: i64, fields: &UserFields, role_ids: &[i64]) -> Result<Option<User>> {
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .iter()
            .any(|u| u.id != id && u.email.eq_ignore_ascii_case(&fields.email))
        {
            return Err(AppError::duplicate("user", "email", &fields.email));
        }
        let Some(user) = state.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.email = fields.email.clone();
        user.active = fields.active;
        user.account_non_locked = fields.account_non_locked;
        user.failed_login_attempts = fields.failed_login_attempts;
        user.email_verified = fields.email_verified;
        user.must_change_password = fields.must_change_password;
        user.updated_at = Utc::now();
        let user = user.clone();

        state.user_roles.insert(id, role_ids.to_vec());
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        state.user_roles.remove(&id);
        state.profiles.remove(&id);
        Ok(state.users.len() < before)
    }
}

#[async_trait]
impl RoleRepository for MemoryUserStore {
    async fn find_all(&self) -> Result<Vec<Role>> {
        let state = self.state.lock().unwrap();
        let ids: Vec<i64> = state.roles.iter().map(|r| r.id).collect();
        Ok(sorted_roles(&state, &ids))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Role>> {
        Ok(sorted_roles(&self.state.lock().unwrap(), ids))
    }
}

#[async_trait]
impl UserProfileRepository for MemoryUserStore {
    async fn find_by_user_id(&self, user_id: i64) -> Result<Option<UserProfile>> {
        Ok(self.profile(user_id))
    }

    async fn upsert(&self, user_id: i64, fields: &ProfileFields) -> Result<UserProfile> {
        if self.fail_profile_writes.load(AtomicOrdering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.state.lock().unwrap();
        if !state.users.iter().any(|u| u.id == user_id) {
            return Err(AppError::Conflict(
                "user profile references a missing user".to_string(),
            ));
        }

        let now = Utc::now();
        let created_at = state
            .profiles
            .get(&user_id)
            .map(|p| p.created_at)
            .unwrap_or(now);
        let profile = UserProfile {
            user_id,
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            phone_number: fields.phone_number.clone(),
            profile_image: fields.profile_image.clone(),
            bio: fields.bio.clone(),
            locale: fields.locale.clone(),
            created_at,
            updated_at: now,
        };
        state.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }
}
