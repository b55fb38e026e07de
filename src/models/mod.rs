pub mod bookings;
pub mod trip;
pub mod user;
