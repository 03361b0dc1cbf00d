use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::user_repository::db_err;
use crate::domain::{DomainError, DomainResult, Presence, PresenceRepository, PresenceUpsert};
use crate::infrastructure::database::entities::presence;

pub struct SeaOrmPresenceRepository {
    db: DatabaseConnection,
}

impl SeaOrmPresenceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn presence_model_to_domain(model: presence::Model) -> Presence {
    Presence {
        id: model.id,
        membre_id: model.membre_id,
        berger_id: model.berger_id,
        date: model.date,
        present: model.present,
        commentaire: model.commentaire,
        created_at: model.created_at,
    }
}

fn to_domain(models: Vec<presence::Model>) -> Vec<Presence> {
    models.into_iter().map(presence_model_to_domain).collect()
}

#[async_trait]
impl PresenceRepository for SeaOrmPresenceRepository {
    async fn upsert(&self, dto: PresenceUpsert) -> DomainResult<Presence> {
        let active = presence::ActiveModel {
            membre_id: Set(dto.membre_id),
            berger_id: Set(dto.berger_id),
            date: Set(dto.date),
            present: Set(dto.present),
            commentaire: Set(dto.commentaire),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        presence::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([presence::Column::MembreId, presence::Column::Date])
                    .update_columns([
                        presence::Column::BergerId,
                        presence::Column::Present,
                        presence::Column::Commentaire,
                        presence::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_err)?;

        presence::Entity::find()
            .filter(presence::Column::MembreId.eq(dto.membre_id))
            .filter(presence::Column::Date.eq(dto.date))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(presence_model_to_domain)
            .ok_or_else(|| DomainError::Internal("presence missing after upsert".into()))
    }

    async fn list_on_date(&self, date: NaiveDate) -> DomainResult<Vec<Presence>> {
        let models = presence::Entity::find()
            .filter(presence::Column::Date.eq(date))
            .order_by_asc(presence::Column::MembreId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(to_domain(models))
    }

    async fn list_between(&self, start: NaiveDate, end: NaiveDate) -> DomainResult<Vec<Presence>> {
        let models = presence::Entity::find()
            .filter(presence::Column::Date.between(start, end))
            .order_by_asc(presence::Column::Date)
            .order_by_asc(presence::Column::MembreId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(to_domain(models))
    }

    async fn list_for_members_between(
        &self,
        membre_ids: &[i32],
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Presence>> {
        if membre_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = presence::Entity::find()
            .filter(presence::Column::MembreId.is_in(membre_ids.iter().copied()))
            .filter(presence::Column::Date.between(start, end))
            .order_by_asc(presence::Column::Date)
            .order_by_asc(presence::Column::MembreId)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(to_domain(models))
    }

    async fn list_for_member(
        &self,
        membre_id: i32,
        limit: Option<u64>,
    ) -> DomainResult<Vec<Presence>> {
        let mut query = presence::Entity::find()
            .filter(presence::Column::MembreId.eq(membre_id))
            .order_by_desc(presence::Column::Date);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.db).await.map_err(db_err)?;
        Ok(to_domain(models))
    }

    async fn list_all(&self) -> DomainResult<Vec<Presence>> {
        let models = presence::Entity::find()
            .order_by_asc(presence::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(to_domain(models))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MemberRepository, NewMember, NewUser, Role, UserRepository};
    use crate::infrastructure::database::repositories::{
        SeaOrmMemberRepository, SeaOrmUserRepository,
    };
    use crate::test_support::memory_db;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    async fn setup() -> (SeaOrmPresenceRepository, i32, Vec<i32>) {
        let db = memory_db().await;
        let berger = SeaOrmUserRepository::new(db.clone())
            .create(NewUser {
                username: "berger SO".into(),
                password_hash: "hash".into(),
                nom: None,
                prenom: None,
                branche: None,
                role: Role::Berger,
                service_assigne: Some("Service d'ordre".into()),
            })
            .await
            .unwrap();
        let members = SeaOrmMemberRepository::new(db.clone());
        let mut ids = Vec::new();
        for nom in ["Yao", "Konan", "Bamba"] {
            let m = members
                .create(NewMember {
                    user_id: berger.id,
                    nom: nom.into(),
                    prenom: "Test".into(),
                    numero: "0102030405".into(),
                    quartier: "Plateau".into(),
                    service: "Service d'ordre".into(),
                })
                .await
                .unwrap();
            ids.push(m.id);
        }
        (SeaOrmPresenceRepository::new(db), berger.id, ids)
    }

    fn mark(membre_id: i32, berger_id: i32, date: NaiveDate, present: bool) -> PresenceUpsert {
        PresenceUpsert {
            membre_id,
            berger_id,
            date,
            present,
            commentaire: None,
        }
    }

    #[tokio::test]
    async fn upsert_replaces_the_day_record() {
        let (repo, berger, ids) = setup().await;
        let first = repo.upsert(mark(ids[0], berger, d(5), true)).await.unwrap();
        let second = repo
            .upsert(PresenceUpsert {
                commentaire: Some("Malade".into()),
                ..mark(ids[0], berger, d(5), false)
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(!second.present);
        assert_eq!(second.commentaire.as_deref(), Some("Malade"));
        assert_eq!(repo.list_on_date(d(5)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn range_queries() {
        let (repo, berger, ids) = setup().await;
        for (day, id) in [(5, ids[0]), (6, ids[1]), (7, ids[2]), (12, ids[0])] {
            repo.upsert(mark(id, berger, d(day), true)).await.unwrap();
        }

        let week = repo.list_between(d(5), d(7)).await.unwrap();
        assert_eq!(week.len(), 3);
        assert!(week.windows(2).all(|w| w[0].date <= w[1].date));

        let subset = repo
            .list_for_members_between(&[ids[0]], d(1), d(31))
            .await
            .unwrap();
        assert_eq!(subset.len(), 2);
        assert!(repo
            .list_for_members_between(&[], d(1), d(31))
            .await
            .unwrap()
            .is_empty());

        let history = repo.list_for_member(ids[0], Some(1)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].date, d(12));
        assert_eq!(repo.list_all().await.unwrap().len(), 4);
    }
}
