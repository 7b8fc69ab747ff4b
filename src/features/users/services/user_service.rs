use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{
    CreateUserDto, RoleDto, UpdateUserDto, UserDetailDto, UserEditDto, UserFormDto,
};
use crate::features::users::models::{Role, User};
use crate::features::users::repositories::{
    RoleRepository, UserProfileRepository, UserRepository, USER_SORT,
};
use crate::shared::pagination::{ListQuery, Page, PageRequest};

/// Service for user administration and the role catalogue
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    profiles: Arc<dyn UserProfileRepository>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        profiles: Arc<dyn UserProfileRepository>,
    ) -> Self {
        Self {
            users,
            roles,
            profiles,
        }
    }

    pub async fn list_page(&self, query: &ListQuery) -> Result<Page<User>> {
        let request = PageRequest::from_query(query, &USER_SORT);
        let total = self.users.count().await?;
        let request = request.clamp_to(total);
        let items = self.users.find_page(&request).await?;
        Ok(Page::new(items, request.meta(total)))
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        self.users.find_all().await
    }

    pub async fn list_roles(&self) -> Result<Vec<RoleDto>> {
        let roles = self.roles.find_all().await?;
        Ok(roles.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }

    pub async fn get_detail(&self, id: i64) -> Result<UserDetailDto> {
        let user = self.find_by_id(id).await?;
        let roles = self.users.find_roles(id).await?;
        let profile = self.profiles.find_by_user_id(id).await?;
        Ok(UserDetailDto::new(user, roles, profile))
    }

    /// Empty form with the role catalogue
    pub async fn new_form(&self) -> Result<UserFormDto> {
        Ok(UserFormDto {
            user: None,
            roles: self.list_roles().await?,
        })
    }

    pub async fn get_for_edit(&self, id: i64) -> Result<UserFormDto> {
        let user = self.find_by_id(id).await?;
        let granted = self.users.find_roles(id).await?;
        Ok(UserFormDto {
            user: Some(UserEditDto::new(user, &granted)),
            roles: self.list_roles().await?,
        })
    }

    /// Case-insensitive email existence check
    pub async fn exist_user_by_email(&self, email: &str) -> Result<bool> {
        self.users.exists_by_email(email, None).await
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<User> {
        let fields = dto.fields();
        if self.exist_user_by_email(&fields.email).await? {
            tracing::warn!("Rejected duplicate user email");
            return Err(AppError::duplicate("user", "email", &fields.email));
        }

        let roles = self.resolve_roles(&dto.role_ids).await?;
        let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();

        let user = self.users.insert(&fields, &role_ids).await?;
        tracing::info!("Created user {} with {} role(s)", user.id, role_ids.len());
        Ok(user)
    }

    /// Update a user and replace its role set
    pub async fn update(&self, id: i64, dto: UpdateUserDto) -> Result<User> {
        self.find_by_id(id).await?;

        let fields = dto.fields();
        if self.users.exists_by_email(&fields.email, Some(id)).await? {
            tracing::warn!("Rejected duplicate user email on update of {}", id);
            return Err(AppError::duplicate("user", "email", &fields.email));
        }

        let roles = self.resolve_roles(&dto.role_ids).await?;
        let role_ids: Vec<i64> = roles.iter().map(|r| r.id).collect();

        let user = self
            .users
            .update(id, &fields, &role_ids)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))?;
        tracing::info!("Updated user {}", id);
        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("user", "id", id));
        }
        tracing::info!("Deleted user {}", id);
        Ok(())
    }

    /// Every requested id must name an existing role
    async fn resolve_roles(&self, ids: &[i64]) -> Result<Vec<Role>> {
        let mut wanted = ids.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        let roles = self.roles.find_by_ids(&wanted).await?;
        if roles.len() != wanted.len() {
            tracing::warn!("Rejected unknown role ids in {:?}", wanted);
            return Err(AppError::not_found("role", "ids", format!("{:?}", wanted)));
        }
        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::repositories::memory::MemoryUserStore;

    fn service() -> (UserService, Arc<MemoryUserStore>) {
        let store = Arc::new(MemoryUserStore::new());
        (
            UserService::new(store.clone(), store.clone(), store.clone()),
            store,
        )
    }

    fn create_dto(email: &str, role_ids: Vec<i64>) -> CreateUserDto {
        CreateUserDto {
            email: email.to_string(),
            active: true,
            account_non_locked: true,
            failed_login_attempts: 0,
            email_verified: false,
            must_change_password: false,
            role_ids,
        }
    }

    fn update_dto(email: &str, role_ids: Vec<i64>) -> UpdateUserDto {
        UpdateUserDto {
            email: email.to_string(),
            active: false,
            account_non_locked: true,
            failed_login_attempts: 2,
            email_verified: true,
            must_change_password: false,
            role_ids,
        }
    }

    #[tokio::test]
    async fn test_create_and_detail() {
        let (service, _) = service();
        let user = service
            .create(create_dto("ana@example.com", vec![3, 1, 3]))
            .await
            .unwrap();

        let detail = service.get_detail(user.id).await.unwrap();
        let names: Vec<&str> = detail.roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ADMIN", "USER"]);
        assert!(detail.profile.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_ignores_case() {
        let (service, _) = service();
        service
            .create(create_dto("ana@example.com", vec![3]))
            .await
            .unwrap();

        let result = service.create(create_dto("ANA@example.com", vec![3])).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert!(service.exist_user_by_email("Ana@Example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_roles() {
        let (service, _) = service();
        let user = service
            .create(create_dto("ana@example.com", vec![1, 2]))
            .await
            .unwrap();

        let updated = service
            .update(user.id, update_dto("ana@example.com", vec![3]))
            .await
            .unwrap();
        assert!(!updated.active);
        assert_eq!(updated.failed_login_attempts, 2);

        let form = service.get_for_edit(user.id).await.unwrap();
        assert_eq!(form.user.unwrap().role_ids, vec![3]);
        assert_eq!(form.roles.len(), 3);
    }

    #[tokio::test]
    async fn test_update_with_unknown_role_is_not_found() {
        let (service, _) = service();
        let user = service
            .create(create_dto("ana@example.com", vec![3]))
            .await
            .unwrap();

        let result = service
            .update(user.id, update_dto("ana@example.com", vec![3, 99]))
            .await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "role not found (ids=[3, 99])"),
            other => panic!("expected not found, got {:?}", other.map(|u| u.id)),
        }

        let form = service.get_for_edit(user.id).await.unwrap();
        assert_eq!(form.user.unwrap().role_ids, vec![3]);
    }

    #[tokio::test]
    async fn test_update_rejects_email_of_other_user() {
        let (service, _) = service();
        service
            .create(create_dto("ana@example.com", vec![3]))
            .await
            .unwrap();
        let other = service
            .create(create_dto("luis@example.com", vec![3]))
            .await
            .unwrap();

        let result = service
            .update(other.id, update_dto("ana@example.com", vec![3]))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_missing_user_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.get_detail(5).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update(5, update_dto("a@example.com", vec![1])).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(5).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_page_defaults_to_email() {
        let (service, _) = service();
        for email in ["carla@example.com", "ana@example.com", "bea@example.com"] {
            service.create(create_dto(email, vec![3])).await.unwrap();
        }

        let page = service.list_page(&ListQuery::default()).await.unwrap();
        let emails: Vec<&str> = page.items.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["ana@example.com", "bea@example.com", "carla@example.com"]
        );
        assert_eq!(page.meta.sort_field, "email");
    }
}
