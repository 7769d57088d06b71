pub mod booking_service;
pub mod coupon_service;
pub mod notification_service;
pub mod pricing_service;
pub mod selection_service;
