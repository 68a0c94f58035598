use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    /// Stable id assigned by the operator's station feed
    #[sea_orm(primary_key, auto_increment = false)]
    pub station_id: i32,
    pub short_name: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: Option<i32>,
    pub capacity: i32,
    pub electric_bike_surcharge_waiver: bool,
    pub eightd_has_key_dispenser: bool,
    pub has_kiosk: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::regions::Entity",
        from = "Column::RegionId",
        to = "super::regions::Column::RegionId"
    )]
    Region,
    #[sea_orm(has_many = "super::station_rental_methods::Entity")]
    StationRentalMethods,
}

impl Related<super::regions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Region.def()
    }
}

impl Related<super::station_rental_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationRentalMethods.def()
    }
}

impl Related<super::rental_methods::Entity> for Entity {
    fn to() -> RelationDef {
        super::station_rental_methods::Relation::RentalMethod.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::station_rental_methods::Relation::Station.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
