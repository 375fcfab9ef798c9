use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Employee { Table, Id, FirstName, LastName, Email }

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Employee::Table)
                .if_not_exists()
                .col(ColumnDef::new(Employee::Id).big_integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Employee::FirstName).string_len(128).not_null())
                .col(ColumnDef::new(Employee::LastName).string_len(128).not_null())
                .col(ColumnDef::new(Employee::Email).string_len(320).not_null())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_employee_email").table(Employee::Table).col(Employee::Email).unique().to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employee::Table).to_owned()).await?;
        Ok(())
    }
}
