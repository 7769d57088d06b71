pub mod account;
pub mod bookings;
pub mod catalog;
pub mod coupon;
