//! A window of pre-decoded instructions.
//!
//! Walking the mask table for every tick is wasted work in a loop, so the
//! core decodes a whole window of words up front and indexes into it by PC.
//! A fetch outside the window rebases the window at the requested PC and
//! refills it. The cache is never invalidated by memory writes; a host that
//! writes into the executing window must refill it by hand.

use crate::cpu::instruction::{Instruction, InstructionType};
use crate::memory::Memory;

/// Number of pre-decoded instructions per fill.
pub const CACHE_ENTRIES: usize = 1024;

pub struct DecodeCache {
    window_start: u32,
    entries: Vec<(Instruction, InstructionType)>,
}

impl DecodeCache {
    pub fn new(start: u32, memory: &Memory) -> Self {
        let mut cache = Self {
            window_start: start,
            entries: Vec::with_capacity(CACHE_ENTRIES),
        };
        cache.refill(start, memory);
        cache
    }

    pub fn window_start(&self) -> u32 {
        self.window_start
    }

    /// Decodes `CACHE_ENTRIES` words starting at `start`. Reuses the entry
    /// buffer, so after construction no allocation happens here.
    pub fn refill(&mut self, start: u32, memory: &Memory) {
        self.window_start = start;
        self.entries.clear();
        for slot in 0..CACHE_ENTRIES as u32 {
            let instruction = Instruction::from(memory.read_word(start.wrapping_add(slot * 4)));
            self.entries
                .push((instruction, InstructionType::decode(instruction)));
        }
    }

    /// The pre-decoded instruction at `pc`, rebasing the window first when
    /// `pc` falls outside it. `pc` must be word-aligned.
    pub fn fetch(&mut self, pc: u32, memory: &Memory) -> (Instruction, InstructionType) {
        let window_end = u64::from(self.window_start) + (CACHE_ENTRIES as u64) * 4;
        if u64::from(pc) < u64::from(self.window_start) || u64::from(pc) >= window_end {
            self.refill(pc, memory);
        }

        self.entries[((pc - self.window_start) / 4) as usize]
    }
}
