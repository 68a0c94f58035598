pub mod regions;
pub mod rental_methods;
pub mod station_rental_methods;
pub mod stations;
pub mod trips;
