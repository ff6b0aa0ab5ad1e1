use std::path::Path;

use goblin::container::Ctx;
use goblin::elf::header::{
    EI_CLASS, EI_DATA, ELFCLASS32, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, ELFMAG, SELFMAG,
    SIZEOF_IDENT,
};
use goblin::elf::section_header::{SHN_UNDEF, SHN_XINDEX};
use goblin::elf::sym::{STT_FUNC, STT_OBJECT};
use goblin::elf::{Elf, Header, SectionHeader, Sym};
use indexmap::IndexMap;
use scroll::ctx::SizeWith;

use crate::error::Malformed;
use crate::format::{Address, AddressFormat};
use crate::mapping::FileMapping;
use crate::view::{ImageView, StringTable};

/// Symbols of an ELF image, keyed by name.
///
/// Entries are kept in symbol table order. When a name appears more than
/// once, the value of the last entry is kept.
pub type SymbolMap = IndexMap<String, Address>;

/// Defined function or object symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolRecord<'a> {
    /// Name of the symbol, borrowed from `.strtab`.
    pub name: &'a str,

    /// Runtime address of the symbol (load bias + symbol value).
    pub address: u64,
}

/// Extracts the defined function/object symbols of the ELF file at the given
/// path.
///
/// Each symbol is mapped to `load_bias + st_value`, rendered with `format`.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn extract_symbols(
    path: impl AsRef<Path>,
    load_bias: u64,
    format: AddressFormat,
) -> crate::Result<SymbolMap> {
    let mapping = FileMapping::open(path.as_ref())?;
    extract_symbols_from_bytes(mapping.bytes(), load_bias, format)
}

/// Same as [extract_symbols], over an in-memory ELF image.
pub fn extract_symbols_from_bytes(
    bytes: &[u8],
    load_bias: u64,
    format: AddressFormat,
) -> crate::Result<SymbolMap> {
    let symtab = SymbolTable::parse(ImageView::new(bytes))?;

    let mut symbols = SymbolMap::new();

    for record in symtab.records(load_bias) {
        let record = record?;
        symbols.insert(record.name.to_owned(), format.render(record.address));
    }

    tracing::debug!(count = symbols.len(), "extracted symbols");

    Ok(symbols)
}

/// Symbol table (`.symtab`) of an ELF image, along with its string table
/// (`.strtab`).
pub struct SymbolTable<'a> {
    view: ImageView<'a>,
    ctx: Ctx,
    offset: u64,
    entry_size: u64,
    count: u64,
    strtab: StringTable<'a>,
}

impl<'a> SymbolTable<'a> {
    /// Locates the symbol table of the given ELF image.
    ///
    /// Returns [Error::NoSymbols](crate::Error::NoSymbols) if the image is
    /// well-formed but has no `.symtab` or `.strtab` section.
    pub fn parse(view: ImageView<'a>) -> crate::Result<Self> {
        let (header, ctx) = parse_header(&view)?;
        let shdrs = SectionHeaders::parse(&view, &header, ctx)?;
        let shstrtab = shdrs.name_table()?;

        let mut symtab_hdr = None;
        let mut strtab_hdr = None;

        for index in 0..shdrs.count {
            let shdr = shdrs.get(index)?;

            // unreadable names can't match
            let slot = match shstrtab.get_bytes(shdr.sh_name) {
                Ok(b".symtab") => &mut symtab_hdr,
                Ok(b".strtab") => &mut strtab_hdr,
                _ => continue,
            };

            tracing::trace!(index, offset = shdr.sh_offset, size = shdr.sh_size, "found section");

            *slot = Some(shdr);
        }

        let (Some(symtab_hdr), Some(strtab_hdr)) = (symtab_hdr, strtab_hdr) else {
            return Err(crate::Error::NoSymbols);
        };

        let entry_size = symtab_hdr.sh_entsize;

        if entry_size == 0 || entry_size < Sym::size_with(&ctx) as u64 {
            return Err(Malformed::EntrySize {
                what: ".symtab",
                size: entry_size,
            }
            .into());
        }

        view.checked_range(".symtab", symtab_hdr.sh_offset, symtab_hdr.sh_size)?;

        let strtab = StringTable::new(
            &view,
            ".strtab",
            strtab_hdr.sh_offset,
            strtab_hdr.sh_size,
        )?;

        let count = symtab_hdr.sh_size / entry_size;

        tracing::debug!(
            container = ?ctx.container,
            endianness = ?ctx.le,
            count,
            "located .symtab"
        );

        Ok(Self {
            view,
            ctx,
            offset: symtab_hdr.sh_offset,
            entry_size,
            count,
            strtab,
        })
    }

    /// Returns the number of entries of the symbol table.
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Returns `true` if the symbol table has no entry.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the raw entries of the symbol table, in table order.
    pub fn entries(&self) -> impl Iterator<Item = Result<Sym, Malformed>> + '_ {
        // the whole table was validated against the image in `parse`
        (0..self.count).map(move |index| {
            self.view
                .read("symbol", self.offset + index * self.entry_size, self.ctx)
        })
    }

    /// Returns the defined function/object symbols, in table order.
    ///
    /// Symbol addresses are computed as `load_bias + st_value`.
    pub fn records(
        &self,
        load_bias: u64,
    ) -> impl Iterator<Item = crate::Result<SymbolRecord<'a>>> + '_ {
        self.entries().filter_map(move |sym| {
            sym.map_err(crate::Error::from)
                .and_then(|sym| self.record(&sym, load_bias))
                .transpose()
        })
    }

    fn record(&self, sym: &Sym, load_bias: u64) -> crate::Result<Option<SymbolRecord<'a>>> {
        if sym.st_shndx == SHN_UNDEF as usize || !matches!(sym.st_type(), STT_FUNC | STT_OBJECT) {
            return Ok(None);
        }

        let name = self.strtab.get_bytes(sym.st_name)?;

        let Ok(name) = std::str::from_utf8(name) else {
            tracing::warn!(offset = sym.st_name, "skipping symbol with non UTF-8 name");
            return Ok(None);
        };

        let address =
            load_bias
                .checked_add(sym.st_value)
                .ok_or(Malformed::AddressOverflow {
                    bias: load_bias,
                    value: sym.st_value,
                })?;

        Ok(Some(SymbolRecord { name, address }))
    }
}

/// Validates the ELF identification bytes, then parses the file header.
fn parse_header(view: &ImageView<'_>) -> Result<(Header, Ctx), Malformed> {
    let ident = view
        .slice("e_ident", 0, SIZEOF_IDENT as u64)
        .map_err(|_| Malformed::Truncated(view.len()))?;

    if &ident[..SELFMAG] != ELFMAG {
        return Err(Malformed::BadMagic);
    }

    match ident[EI_CLASS] {
        ELFCLASS32 | ELFCLASS64 => (),
        class => return Err(Malformed::UnsupportedClass(class)),
    }

    match ident[EI_DATA] {
        ELFDATA2LSB | ELFDATA2MSB => (),
        data => return Err(Malformed::UnsupportedEncoding(data)),
    }

    let header = Elf::parse_header(view.bytes()).map_err(|_| Malformed::Truncated(view.len()))?;
    let ctx = Ctx::new(header.container()?, header.endianness()?);

    Ok((header, ctx))
}

/// Validated section header table.
struct SectionHeaders<'a> {
    view: ImageView<'a>,
    ctx: Ctx,
    offset: u64,
    entry_size: u64,
    count: u64,
    name_index: u64,
}

impl<'a> SectionHeaders<'a> {
    fn parse(view: &ImageView<'a>, header: &Header, ctx: Ctx) -> Result<Self, Malformed> {
        if header.e_shoff == 0 {
            return Err(Malformed::NoSectionHeaders);
        }

        if u32::from(header.e_shstrndx) == SHN_UNDEF {
            return Err(Malformed::NoSectionNameTable);
        }

        let entry_size = SectionHeader::size_with(&ctx) as u64;

        if u64::from(header.e_shentsize) != entry_size {
            return Err(Malformed::EntrySize {
                what: "section header",
                size: header.e_shentsize.into(),
            });
        }

        // extended numbering is stored in the first section header
        let first: SectionHeader = view.read("section header", header.e_shoff, ctx)?;

        let count = match header.e_shnum {
            0 => first.sh_size,
            n => n.into(),
        };

        let name_index = match u32::from(header.e_shstrndx) {
            SHN_XINDEX => first.sh_link.into(),
            n => n.into(),
        };

        let table_size = count
            .checked_mul(entry_size)
            .ok_or(Malformed::OutOfBounds {
                what: "section header table",
                offset: header.e_shoff,
                len: u64::MAX,
            })?;

        view.checked_range("section header table", header.e_shoff, table_size)?;

        if name_index >= count {
            return Err(Malformed::NoSectionNameTable);
        }

        tracing::debug!(
            offset = format_args!("{:#x}", header.e_shoff),
            count,
            name_index,
            "located section headers"
        );

        Ok(Self {
            view: *view,
            ctx,
            offset: header.e_shoff,
            entry_size,
            count,
            name_index,
        })
    }

    fn get(&self, index: u64) -> Result<SectionHeader, Malformed> {
        self.view.read(
            "section header",
            self.offset + index * self.entry_size,
            self.ctx,
        )
    }

    fn name_table(&self) -> Result<StringTable<'a>, Malformed> {
        let shdr = self.get(self.name_index)?;
        StringTable::new(&self.view, ".shstrtab", shdr.sh_offset, shdr.sh_size)
    }
}
