//! Junction table for the station <-> rental method many-to-many relation.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "station_rental_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub station_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub rental_method_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stations::Entity",
        from = "Column::StationId",
        to = "super::stations::Column::StationId",
        on_delete = "Cascade"
    )]
    Station,
    #[sea_orm(
        belongs_to = "super::rental_methods::Entity",
        from = "Column::RentalMethodId",
        to = "super::rental_methods::Column::Id",
        on_delete = "Cascade"
    )]
    RentalMethod,
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::rental_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RentalMethod.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
