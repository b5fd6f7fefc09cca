mod model;
mod repository;

pub use model::{Account, NewAccount, RegisterAccount};
pub use repository::AccountRepository;
