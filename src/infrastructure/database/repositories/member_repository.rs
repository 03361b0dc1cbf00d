use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set, TransactionTrait,
};

use super::user_repository::{db_err, entity_role_to_domain};
use crate::domain::{
    DomainError, DomainResult, Member, MemberChanges, MemberOwner, MemberRepository, NewMember,
};
use crate::infrastructure::database::entities::{member, presence, user};

pub struct SeaOrmMemberRepository {
    db: DatabaseConnection,
}

impl SeaOrmMemberRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn newest_first(query: Select<member::Entity>) -> Select<member::Entity> {
        query
            .order_by_desc(member::Column::CreatedAt)
            .order_by_desc(member::Column::Id)
    }

    async fn load(&self, id: i32) -> DomainResult<Member> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Membre", "id", id))
    }
}

fn member_model_to_domain(model: member::Model, owner: Option<user::Model>) -> Member {
    Member {
        id: model.id,
        user_id: model.user_id,
        nom: model.nom,
        prenom: model.prenom,
        numero: model.numero,
        quartier: model.quartier,
        service: model.service,
        created_at: model.created_at,
        owner: owner.map(|u| MemberOwner {
            username: u.username,
            branche: u.branche,
            role: entity_role_to_domain(u.role),
        }),
    }
}

#[async_trait]
impl MemberRepository for SeaOrmMemberRepository {
    async fn create(&self, dto: NewMember) -> DomainResult<Member> {
        let model = member::ActiveModel {
            user_id: Set(Some(dto.user_id)),
            nom: Set(dto.nom),
            prenom: Set(dto.prenom),
            numero: Set(dto.numero),
            quartier: Set(dto.quartier),
            service: Set(dto.service),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        self.load(model.id).await
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Member>> {
        let row = member::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(row.map(|(m, u)| member_model_to_domain(m, u)))
    }

    async fn list(&self) -> DomainResult<Vec<Member>> {
        let rows = Self::newest_first(member::Entity::find())
            .find_also_related(user::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(m, u)| member_model_to_domain(m, u))
            .collect())
    }

    async fn list_by_user(&self, user_id: i32) -> DomainResult<Vec<Member>> {
        let rows = Self::newest_first(
            member::Entity::find().filter(member::Column::UserId.eq(user_id)),
        )
        .find_also_related(user::Entity)
        .all(&self.db)
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(m, u)| member_model_to_domain(m, u))
            .collect())
    }

    async fn exists_for_user(&self, user_id: i32, nom: &str, prenom: &str) -> DomainResult<bool> {
        let count = member::Entity::find()
            .filter(member::Column::UserId.eq(user_id))
            .filter(member::Column::Nom.eq(nom))
            .filter(member::Column::Prenom.eq(prenom))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn update(&self, id: i32, changes: MemberChanges) -> DomainResult<Member> {
        let model = member::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Membre", "id", id))?;

        let mut active: member::ActiveModel = model.into();
        if let Some(nom) = changes.nom {
            active.nom = Set(nom);
        }
        if let Some(prenom) = changes.prenom {
            active.prenom = Set(prenom);
        }
        if let Some(numero) = changes.numero {
            active.numero = Set(numero);
        }
        if let Some(quartier) = changes.quartier {
            active.quartier = Set(quartier);
        }
        if let Some(service) = changes.service {
            active.service = Set(service);
        }
        if active.is_changed() {
            active.update(&self.db).await.map_err(db_err)?;
        }

        self.load(id).await
    }

    async fn delete_cascade(&self, id: i32) -> DomainResult<bool> {
        let txn = self.db.begin().await.map_err(db_err)?;

        presence::Entity::delete_many()
            .filter(presence::Column::MembreId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let result = member::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
