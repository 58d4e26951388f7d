use sea_orm::entity::prelude::*;

use super::enums::{BookingStatus, PaymentMethod, PaymentStatus, TripType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub trip_name: String,
    pub trip_number: String,
    pub trip_type: TripType,
    pub trip_origin: String,
    pub trip_destination: String,
    /// JSON array of seat numbers. Kept after cancellation.
    pub seats: Json,
    pub total_amount: i64,
    pub travel_date: Date,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: BookingStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::UserId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id"
    )]
    Trips,
    #[sea_orm(has_many = "super::seat_reservations::Entity")]
    SeatReservations,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::seat_reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeatReservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
