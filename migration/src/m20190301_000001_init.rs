use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== REGIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Regions::RegionId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Regions::Name).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        // ========== RENTAL METHODS ==========
        manager
            .create_table(
                Table::create()
                    .table(RentalMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RentalMethods::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RentalMethods::Method)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== STATIONS ==========
        // region_id is a weak reference: the feed may name regions we never saw.
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::StationId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stations::ShortName).string_len(16).not_null())
                    .col(ColumnDef::new(Stations::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Stations::Latitude).double().not_null())
                    .col(ColumnDef::new(Stations::Longitude).double().not_null())
                    .col(ColumnDef::new(Stations::RegionId).integer())
                    .col(ColumnDef::new(Stations::Capacity).integer().not_null())
                    .col(
                        ColumnDef::new(Stations::ElectricBikeSurchargeWaiver)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stations::EightdHasKeyDispenser)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stations::HasKiosk)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stations_region_id")
                    .table(Stations::Table)
                    .col(Stations::RegionId)
                    .to_owned(),
            )
            .await?;

        // ========== STATION <-> RENTAL METHOD ==========
        manager
            .create_table(
                Table::create()
                    .table(StationRentalMethods::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StationRentalMethods::StationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationRentalMethods::RentalMethodId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(StationRentalMethods::StationId)
                            .col(StationRentalMethods::RentalMethodId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_rental_methods_station")
                            .from(StationRentalMethods::Table, StationRentalMethods::StationId)
                            .to(Stations::Table, Stations::StationId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_rental_methods_method")
                            .from(
                                StationRentalMethods::Table,
                                StationRentalMethods::RentalMethodId,
                            )
                            .to(RentalMethods::Table, RentalMethods::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== TRIPS ==========
        // Station ids are stored raw: trip history references stations that
        // no longer appear in the live feed.
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trips::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trips::Duration).integer().not_null())
                    .col(
                        ColumnDef::new(Trips::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Trips::StopTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Trips::StartDate).date().not_null())
                    .col(ColumnDef::new(Trips::StopDate).date().not_null())
                    .col(ColumnDef::new(Trips::StartStationId).integer().not_null())
                    .col(ColumnDef::new(Trips::StopStationId).integer().not_null())
                    .col(ColumnDef::new(Trips::BikeId).integer().not_null())
                    .col(ColumnDef::new(Trips::IsSubscriber).boolean().not_null())
                    .col(ColumnDef::new(Trips::BirthYear).integer())
                    .col(
                        ColumnDef::new(Trips::Gender)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_trips_start_date", Trips::StartDate),
            ("idx_trips_stop_date", Trips::StopDate),
            ("idx_trips_start_time", Trips::StartTime),
            ("idx_trips_start_station_id", Trips::StartStationId),
            ("idx_trips_stop_station_id", Trips::StopStationId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Trips::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trips::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StationRentalMethods::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Stations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RentalMethods::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Regions::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Regions {
    Table,
    RegionId,
    Name,
}

#[derive(DeriveIden)]
enum RentalMethods {
    Table,
    Id,
    Method,
}

#[derive(DeriveIden)]
enum Stations {
    Table,
    StationId,
    ShortName,
    Name,
    Latitude,
    Longitude,
    RegionId,
    Capacity,
    ElectricBikeSurchargeWaiver,
    EightdHasKeyDispenser,
    HasKiosk,
}

#[derive(DeriveIden)]
enum StationRentalMethods {
    Table,
    StationId,
    RentalMethodId,
}

#[derive(DeriveIden)]
enum Trips {
    Table,
    Id,
    Duration,
    StartTime,
    StopTime,
    StartDate,
    StopDate,
    StartStationId,
    StopStationId,
    BikeId,
    IsSubscriber,
    BirthYear,
    Gender,
}
