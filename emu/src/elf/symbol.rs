use crate::elf::{read_uint, string_at};

/// View over one symbol-table record.
pub struct SymbolTableEntry<'a> {
    bits_32: bool,
    little_endian: bool,
    data: &'a [u8],
}

impl<'a> SymbolTableEntry<'a> {
    pub(crate) fn entry_size(bits_32: bool) -> usize {
        if bits_32 {
            16
        } else {
            24
        }
    }

    pub(crate) fn new(bits_32: bool, little_endian: bool, data: &'a [u8]) -> Self {
        Self {
            bits_32,
            little_endian,
            data,
        }
    }

    fn read(&self, offset: usize, width: usize) -> u64 {
        read_uint(self.data, offset, width, self.little_endian).unwrap_or(0)
    }

    pub fn name_offset(&self) -> usize {
        self.read(0, 4) as usize
    }

    pub fn name<'t>(&self, string_table: &'t [u8]) -> &'t str {
        string_at(string_table, self.name_offset())
    }

    /// The symbol's offset within its section for a relocatable object.
    pub fn value(&self) -> u64 {
        if self.bits_32 {
            self.read(4, 4)
        } else {
            self.read(8, 8)
        }
    }

    pub fn size(&self) -> u64 {
        if self.bits_32 {
            self.read(8, 4)
        } else {
            self.read(16, 8)
        }
    }

    /// Binding and type, packed as the format packs them.
    pub fn info(&self) -> u8 {
        self.read(if self.bits_32 { 12 } else { 4 }, 1) as u8
    }

    pub fn section_header_table_index(&self) -> usize {
        self.read(if self.bits_32 { 14 } else { 6 }, 2) as usize
    }
}
