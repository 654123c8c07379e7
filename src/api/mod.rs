pub mod health;
pub mod parcels;
pub mod payments;
pub mod riders;
pub mod swagger;
pub mod uploads;
pub mod users;
