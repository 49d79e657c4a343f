pub mod booking;
pub mod interval;
pub mod registration;
pub mod role;
pub mod session;
pub mod validation;
