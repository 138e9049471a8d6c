use crate::elf::read_uint;
use crate::elf::section_header::{SectionHeader, SectionType};
use crate::error::LoadError;

/// Word-size class from `e_ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Bits32,
    Bits64,
    Unknown,
}

/// Byte-order class from `e_ident`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEncoding {
    LittleEndian,
    BigEndian,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    None,
    Relocatable,
    Executable,
    SharedObject,
    Core,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    Sparc,
    X86,
    Mips,
    PowerPc,
    S390,
    Arm,
    SuperH,
    Ia64,
    X86_64,
    AArch64,
    RiscV,
    Unknown,
}

/// View over the ELF file header at the start of the image.
///
/// Field offsets switch on the 32/64-bit class the way the format defines
/// them; only the 32-bit little-endian ARM path is load-bearing for this
/// machine, the rest parses far enough to be rejected politely.
pub struct FileHeader<'a> {
    data: &'a [u8],
}

impl<'a> FileHeader<'a> {
    /// The header spans the first 64 bytes in either width class; anything
    /// shorter cannot be examined at all.
    pub fn new(data: &'a [u8]) -> Result<Self, LoadError> {
        if data.len() < 64 {
            return Err(LoadError::TruncatedHeader { len: data.len() });
        }
        Ok(Self { data })
    }

    fn read(&self, offset: usize, width: usize) -> u64 {
        read_uint(self.data, offset, width, self.little_endian()).unwrap_or(0)
    }

    pub fn is_elf_file(&self) -> bool {
        self.data.starts_with(&[0x7F, b'E', b'L', b'F'])
    }

    pub fn bit_class(&self) -> Class {
        match read_uint(self.data, 0x04, 1, true) {
            Some(1) => Class::Bits32,
            Some(2) => Class::Bits64,
            _ => Class::Unknown,
        }
    }

    pub fn bits_32(&self) -> bool {
        self.bit_class() == Class::Bits32
    }

    pub fn data_encoding(&self) -> DataEncoding {
        match read_uint(self.data, 0x05, 1, true) {
            Some(1) => DataEncoding::LittleEndian,
            Some(2) => DataEncoding::BigEndian,
            _ => DataEncoding::Unknown,
        }
    }

    pub fn little_endian(&self) -> bool {
        self.data_encoding() == DataEncoding::LittleEndian
    }

    pub fn object_type(&self) -> ObjectType {
        match self.read(0x10, 2) {
            0x00 => ObjectType::None,
            0x01 => ObjectType::Relocatable,
            0x02 => ObjectType::Executable,
            0x03 => ObjectType::SharedObject,
            0x04 => ObjectType::Core,
            _ => ObjectType::Unknown,
        }
    }

    pub fn machine(&self) -> Machine {
        match self.read(0x12, 2) {
            0x02 => Machine::Sparc,
            0x03 => Machine::X86,
            0x08 => Machine::Mips,
            0x14 => Machine::PowerPc,
            0x16 => Machine::S390,
            0x28 => Machine::Arm,
            0x2A => Machine::SuperH,
            0x32 => Machine::Ia64,
            0x3E => Machine::X86_64,
            0xB7 => Machine::AArch64,
            0xF3 => Machine::RiscV,
            _ => Machine::Unknown,
        }
    }

    pub fn entry(&self) -> u64 {
        let width = if self.bits_32() { 4 } else { 8 };
        self.read(0x18, width)
    }

    pub fn program_header_offset(&self) -> u64 {
        if self.bits_32() {
            self.read(0x1C, 4)
        } else {
            self.read(0x20, 8)
        }
    }

    pub fn section_header_offset(&self) -> u64 {
        if self.bits_32() {
            self.read(0x20, 4)
        } else {
            self.read(0x28, 8)
        }
    }

    pub fn program_header_size(&self) -> u64 {
        self.read(if self.bits_32() { 0x2A } else { 0x36 }, 2)
    }

    pub fn program_header_num_entries(&self) -> usize {
        self.read(if self.bits_32() { 0x2C } else { 0x38 }, 2) as usize
    }

    pub fn section_header_size(&self) -> u64 {
        self.read(if self.bits_32() { 0x2E } else { 0x3A }, 2)
    }

    pub fn section_header_num_entries(&self) -> usize {
        self.read(if self.bits_32() { 0x30 } else { 0x3C }, 2) as usize
    }

    pub fn section_header_string_table_index(&self) -> usize {
        self.read(if self.bits_32() { 0x32 } else { 0x3E }, 2) as usize
    }

    /// The `index`-th section header, `None` when the index or the header
    /// table offset points outside the image.
    pub fn section_header(&self, index: usize) -> Option<SectionHeader<'a>> {
        if index >= self.section_header_num_entries() {
            return None;
        }
        let offset = (self.section_header_offset() as usize)
            .checked_add((self.section_header_size() as usize).checked_mul(index)?)?;
        let data = self.data.get(offset..)?;

        Some(SectionHeader::new(
            self.bits_32(),
            self.little_endian(),
            self.data,
            data,
        ))
    }

    /// All section headers that fit inside the image.
    pub fn section_headers(&self) -> impl Iterator<Item = SectionHeader<'a>> + '_ {
        (0..self.section_header_num_entries()).filter_map(move |idx| self.section_header(idx))
    }

    /// The section-name string table, located through `e_shstrndx`.
    pub fn sh_string_table(&self) -> &'a [u8] {
        self.section_header(self.section_header_string_table_index())
            .map(|header| header.section_data())
            .unwrap_or(&[])
    }

    /// The symbol-name string table, the section named `.strtab`.
    pub fn string_table(&self) -> &'a [u8] {
        let sh_table = self.sh_string_table();
        self.section_headers()
            .find(|header| header.name(sh_table) == ".strtab")
            .map(|header| header.section_data())
            .unwrap_or(&[])
    }

    /// The first symbol-table section, if any.
    pub fn symbol_table(&self) -> Option<SectionHeader<'a>> {
        self.section_headers()
            .find(|header| header.section_type() == SectionType::SymbolTable)
    }
}
