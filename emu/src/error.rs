//! Loader-level failures. Everything here aborts the load before any code
//! runs; CPU-level stops are reported through
//! [`Fault`](crate::cpu::armv3::Fault) instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("image of {len} bytes is too small for an ELF header")]
    TruncatedHeader { len: usize },

    #[error("missing ELF magic number")]
    BadMagic,

    #[error("only little-endian ELF32 ARM relocatable objects are supported")]
    UnsupportedImage,

    #[error("no `main` symbol in the object")]
    MissingEntrySymbol,

    #[error("relocation section `{name}` has no matching target section")]
    MissingTargetSection { name: String },

    #[error("relocation refers to symbol {index} out of range")]
    BadSymbolIndex { index: usize },

    #[error("symbol refers to section {index} out of range")]
    BadSectionIndex { index: usize },

    #[error("relocation target {from:#x} lies outside the image")]
    RelocationOutOfRange { from: u32 },

    #[error("unsupported relocation at {from:#x}: word {word:#010x}")]
    UnsupportedRelocation { from: u32, word: u32 },
}
