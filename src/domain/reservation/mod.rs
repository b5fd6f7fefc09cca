mod model;
mod repository;

pub use model::{Reservation, ReservationDetails, ReservationStatus};
pub use repository::ReservationRepository;
