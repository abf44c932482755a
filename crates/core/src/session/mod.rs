pub mod controller;
pub mod roster;
pub mod summary;
