pub use crate::display::Display;

mod display;
