pub mod booking;
pub mod event;

pub use booking::{Booking, NewBooking};
pub use event::{Event, EventChanges, NewEvent};
