pub mod imgbb_service;
pub mod parcel_service;
pub mod payment_service;
pub mod rider_service;
pub mod stripe_service;
pub mod token_service;
pub mod user_service;

pub use imgbb_service::*;
pub use parcel_service::*;
pub use payment_service::*;
pub use rider_service::*;
pub use stripe_service::*;
pub use token_service::*;
pub use user_service::*;
