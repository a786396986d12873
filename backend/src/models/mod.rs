pub mod absence;
pub mod common;
pub mod employee;
pub mod schedule;
pub mod user;
pub mod work_card;
