mod model;
mod repository;

pub use model::{
    AvailabilitySummary, FloorAvailability, NewSlot, Slot, SlotFilter, SlotType, ZoneAvailability,
};
pub use repository::SlotRepository;
