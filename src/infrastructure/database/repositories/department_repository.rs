use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::user_repository::db_err;
use crate::domain::{Department, DepartmentRepository, DomainResult};
use crate::infrastructure::database::entities::department;

pub struct SeaOrmDepartmentRepository {
    db: DatabaseConnection,
}

impl SeaOrmDepartmentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn department_model_to_domain(model: department::Model) -> Department {
    Department {
        id: model.id,
        nom: model.nom,
        nom_court: model.nom_court,
        description: model.description,
        responsable_id: model.responsable_id,
        created_at: model.created_at,
    }
}

#[async_trait]
impl DepartmentRepository for SeaOrmDepartmentRepository {
    async fn list(&self) -> DomainResult<Vec<Department>> {
        let models = department::Entity::find()
            .order_by_asc(department::Column::Nom)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(department_model_to_domain).collect())
    }

    async fn insert_if_absent(&self, nom: &str, nom_court: &str) -> DomainResult<bool> {
        let existing = department::Entity::find()
            .filter(
                Condition::any()
                    .add(department::Column::Nom.eq(nom))
                    .add(department::Column::NomCourt.eq(nom_court)),
            )
            .count(&self.db)
            .await
            .map_err(db_err)?;
        if existing > 0 {
            return Ok(false);
        }

        department::ActiveModel {
            nom: Set(nom.to_string()),
            nom_court: Set(Some(nom_court.to_string())),
            description: Set(None),
            responsable_id: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(true)
    }
}
