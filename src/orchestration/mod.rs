pub mod desk;

pub use desk::{DeskError, HedgeDesk};
