//! Core library for dashgrid: configuration, layout, navigation and data
//! fetching. Nothing here touches the terminal.

pub mod config;
pub mod fetch;
pub mod layout;
pub mod navigation;
pub mod todo;
