pub use chip8::Chip8;
pub use error::LoadError;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
