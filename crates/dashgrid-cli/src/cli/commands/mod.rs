pub mod check;
pub mod dashboard;
