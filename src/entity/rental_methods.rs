use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rental_methods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub method: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::station_rental_methods::Entity")]
    StationRentalMethods,
}

impl Related<super::station_rental_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationRentalMethods.def()
    }
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        super::station_rental_methods::Relation::Station.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::station_rental_methods::Relation::RentalMethod.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
