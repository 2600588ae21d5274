//! The browser-side behaviour of the form and the dashboard, kept as plain
//! state so the page handlers can drive it and tests can poke at it.

pub mod dashboard;
pub mod registration_form;
