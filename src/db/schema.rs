use crate::entities::{follows, likes, message, user};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Schema};

/// Creates every table that does not exist yet, parents before children so
/// the foreign keys resolve.
pub async fn create_schema<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
    create_table(db, user::Entity).await?;
    create_table(db, message::Entity).await?;
    create_table(db, follows::Entity).await?;
    create_table(db, likes::Entity).await?;
    Ok(())
}

async fn create_table<C, E>(db: &C, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
