use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::domain::{DomainError, DomainResult, NewUser, Role, User, UserRepository};
use crate::infrastructure::database::entities::{member, presence, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn entity_role_to_domain(role: user::UserRole) -> Role {
    match role {
        user::UserRole::Member => Role::Member,
        user::UserRole::Berger => Role::Berger,
        user::UserRole::Admin => Role::Admin,
        user::UserRole::SuperAdmin => Role::SuperAdmin,
    }
}

fn domain_role_to_entity(role: Role) -> user::UserRole {
    match role {
        Role::Member => user::UserRole::Member,
        Role::Berger => user::UserRole::Berger,
        Role::Admin => user::UserRole::Admin,
        Role::SuperAdmin => user::UserRole::SuperAdmin,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        nom: model.nom,
        prenom: model.prenom,
        branche: model.branche,
        role: entity_role_to_domain(model.role),
        service_assigne: model.service_assigne,
        created_at: model.created_at,
    }
}

pub(super) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, dto: NewUser) -> DomainResult<User> {
        let new_user = user::ActiveModel {
            username: Set(dto.username),
            password_hash: Set(dto.password_hash),
            nom: Set(dto.nom),
            prenom: Set(dto.prenom),
            branche: Set(dto.branche),
            role: Set(domain_role_to_entity(dto.role)),
            service_assigne: Set(dto.service_assigne),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = new_user.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
                DomainError::Conflict("Ce nom d'utilisateur est déjà utilisé".to_string())
            } else {
                db_err(e)
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(user_model_to_domain))
    }

    async fn list(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn list_by_role(&self, role: Role) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .filter(user::Column::Role.eq(domain_role_to_entity(role)))
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn update_role(
        &self,
        id: i32,
        role: Role,
        service_assigne: Option<String>,
    ) -> DomainResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Utilisateur", "id", id))?;

        let mut active: user::ActiveModel = model.into();
        active.role = Set(domain_role_to_entity(role));
        active.service_assigne = Set(service_assigne);
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Utilisateur", "id", id))?;

        let mut active: user::ActiveModel = model.into();
        active.password_hash = Set(password_hash.to_string());
        active.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let exists = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            txn.rollback().await.map_err(db_err)?;
            return Ok(false);
        }

        let member_ids: Vec<i32> = member::Entity::find()
            .select_only()
            .column(member::Column::Id)
            .filter(member::Column::UserId.eq(id))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;

        if !member_ids.is_empty() {
            presence::Entity::delete_many()
                .filter(presence::Column::MembreId.is_in(member_ids))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        member::Entity::delete_many()
            .filter(member::Column::UserId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        user::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(true)
    }
}
