use sea_orm::entity::prelude::*;

use super::enums::TripType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub number: String,
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub travel_date: Date,
    /// `HH:MM`, zero padded so lexical order is chronological.
    pub departure_time: String,
    pub arrival_time: String,
    pub total_seats: i32,
    pub fare: i64,
    pub trip_type: TripType,
    /// JSON array of strings.
    pub amenities: Json,
    pub rating: f64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::seat_reservations::Entity")]
    SeatReservations,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::seat_reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeatReservations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
