use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Collection scans: index on (collection, created_at)
        manager
            .create_index(
                Index::create()
                    .name("idx_document_collection_created")
                    .table(Document::Table)
                    .col(Document::Collection)
                    .col(Document::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Containment filters (`body @> ...`)
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_document_body_gin ON document USING GIN (body jsonb_path_ops)",
        )
        .await?;

        // One user document per email
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uniq_document_user_email ON document ((body ->> 'email')) WHERE collection = 'users'",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP INDEX IF EXISTS uniq_document_user_email").await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_document_body_gin").await?;
        manager
            .drop_index(Index::drop().name("idx_document_collection_created").table(Document::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Document { Table, Collection, CreatedAt }
