use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_accounts::Accounts;
use super::m20250101_000002_create_trips::Trips;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::TripId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::TripName).string().not_null())
                    .col(ColumnDef::new(Bookings::TripNumber).string().not_null())
                    .col(ColumnDef::new(Bookings::TripType).string_len(16).not_null())
                    .col(ColumnDef::new(Bookings::TripOrigin).string().not_null())
                    .col(ColumnDef::new(Bookings::TripDestination).string().not_null())
                    .col(ColumnDef::new(Bookings::Seats).json().not_null())
                    .col(ColumnDef::new(Bookings::TotalAmount).big_integer().not_null())
                    .col(ColumnDef::new(Bookings::TravelDate).date().not_null())
                    .col(ColumnDef::new(Bookings::PaymentMethod).string_len(16).not_null())
                    .col(ColumnDef::new(Bookings::PaymentStatus).string_len(16).not_null())
                    .col(ColumnDef::new(Bookings::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Accounts::Table, Accounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_trip")
                            .from(Bookings::Table, Bookings::TripId)
                            .to(Trips::Table, Trips::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_trip_travel_date")
                    .table(Bookings::Table)
                    .col(Bookings::TripId)
                    .col(Bookings::TravelDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeatReservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeatReservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SeatReservations::TripId).uuid().not_null())
                    .col(ColumnDef::new(SeatReservations::BookingId).uuid().not_null())
                    .col(ColumnDef::new(SeatReservations::SeatNumber).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seat_reservations_trip")
                            .from(SeatReservations::Table, SeatReservations::TripId)
                            .to(Trips::Table, Trips::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seat_reservations_booking")
                            .from(SeatReservations::Table, SeatReservations::BookingId)
                            .to(Bookings::Table, Bookings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_seat_reservations_trip_seat")
                    .table(SeatReservations::Table)
                    .col(SeatReservations::TripId)
                    .col(SeatReservations::SeatNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SeatReservations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bookings {
    Table,
    Id,
    UserId,
    TripId,
    TripName,
    TripNumber,
    TripType,
    TripOrigin,
    TripDestination,
    Seats,
    TotalAmount,
    TravelDate,
    PaymentMethod,
    PaymentStatus,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum SeatReservations {
    Table,
    Id,
    TripId,
    BookingId,
    SeatNumber,
}
