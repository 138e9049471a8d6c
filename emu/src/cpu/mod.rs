//! The processor: decoder, shifter, decode cache and the core itself.

pub mod alu_instruction;
pub mod armv3;
pub mod barrel_shifter;
pub mod condition;
pub mod cpsr;
pub mod decode_cache;
pub mod instruction;
