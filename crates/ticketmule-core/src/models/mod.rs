//! Data models returned by the TicketMule server.
//!
//! - `User`: identity returned by a successful login
//! - `TimeType`: one entry of the time-type lookup table

pub mod time_type;
pub mod user;

pub use time_type::TimeType;
pub use user::User;
