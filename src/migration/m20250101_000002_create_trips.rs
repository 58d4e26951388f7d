use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Trips::Number)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Trips::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Trips::Origin).string().not_null())
                    .col(ColumnDef::new(Trips::Destination).string().not_null())
                    .col(ColumnDef::new(Trips::TravelDate).date().not_null())
                    .col(ColumnDef::new(Trips::DepartureTime).string_len(5).not_null())
                    .col(ColumnDef::new(Trips::ArrivalTime).string_len(5).not_null())
                    .col(ColumnDef::new(Trips::TotalSeats).integer().not_null())
                    .col(ColumnDef::new(Trips::Fare).big_integer().not_null())
                    .col(ColumnDef::new(Trips::TripType).string_len(16).not_null())
                    .col(ColumnDef::new(Trips::Amenities).json().not_null())
                    .col(ColumnDef::new(Trips::Rating).double().not_null())
                    .col(ColumnDef::new(Trips::IsActive).boolean().not_null())
                    .col(
                        ColumnDef::new(Trips::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trips_travel_date")
                    .table(Trips::Table)
                    .col(Trips::TravelDate)
                    .col(Trips::DepartureTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Trips {
    Table,
    Id,
    Number,
    Name,
    Origin,
    Destination,
    TravelDate,
    DepartureTime,
    ArrivalTime,
    TotalSeats,
    Fare,
    TripType,
    Amenities,
    Rating,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
