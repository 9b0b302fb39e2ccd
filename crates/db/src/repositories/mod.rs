//! Repository implementations for data access.

pub mod day_end;


pub use day_end::DayEndRepository;
