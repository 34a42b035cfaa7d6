//! Binary encoding of a DAWG.
//!
//! ```text
//! u32     version (= 1)
//! u32     num_nodes
//! string  lexicon name
//! string  lexicon date
//! u32     num_words
//! string  DAWG type tag
//! u32     num_reverse_wordlets
//! u32     num_forward_wordlets
//! num_nodes x { u32 child_idx, u8 letter, bool is_terminal, bool is_last_child }
//! ```
//!
//! Integers are little-endian. Strings are UTF-8 preceded by their byte length as a 7-bit
//! variable-length integer. Booleans are one byte; any nonzero value reads as true.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, info, trace};

use super::error::{DawgError, HeaderDefect, Result};
use super::node::{DawgHeader, DawgNode, CURRENT_VERSION, MIN_NUM_NODES};

/// Upper bound on records preallocated from an untrusted header.
const MAX_PREALLOCATED_NODES: usize = 1 << 20;

/// Outcome of writing a DAWG file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveStats {
    /// Final location of the file.
    pub path: PathBuf,
    /// File size.
    pub bytes: u64,
    /// Node records written.
    pub nodes: u32,
}

/// Collects node records in id order and writes them out once all declared nodes are there.
#[derive(Clone, Debug)]
pub struct DawgWriter {
    header: DawgHeader,
    nodes: Vec<DawgNode>,
}

impl DawgWriter {
    /// Creates a writer for `header.num_nodes` records.
    pub fn new(header: DawgHeader) -> Self {
        let capacity = (header.num_nodes as usize).min(MAX_PREALLOCATED_NODES);
        DawgWriter {
            header,
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Appends the next node record.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::NodeOverflow`] if all declared nodes were already added.
    pub fn add_node(&mut self, node: DawgNode) -> Result<()> {
        if self.num_added_nodes() >= self.header.num_nodes {
            return Err(DawgError::NodeOverflow {
                declared: self.header.num_nodes,
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Number of records added so far.
    pub fn num_added_nodes(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// The header the nodes are checked against.
    pub fn header(&self) -> &DawgHeader {
        &self.header
    }

    /// Writes header and records to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`DawgError::IncompleteWrite`] if fewer records were added than declared.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.check_complete()?;
        write_dawg(writer, &self.header, &self.nodes)
    }

    /// Writes the DAWG to `path`.
    ///
    /// The data goes to a temporary file next to `path`, which is renamed over `path` only
    /// once everything has been written, so readers never see a partial file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SaveStats> {
        self.check_complete()?;
        save_atomically(path.as_ref(), &self.header, &self.nodes)
    }

    fn check_complete(&self) -> Result<()> {
        if self.num_added_nodes() != self.header.num_nodes {
            return Err(DawgError::IncompleteWrite {
                declared: self.header.num_nodes,
                added: self.num_added_nodes(),
            });
        }
        Ok(())
    }
}

/// Writes `header` followed by `nodes`.
pub(crate) fn write_dawg<W: Write>(writer: &mut W, header: &DawgHeader, nodes: &[DawgNode]) -> Result<()> {
    debug_assert_eq!(nodes.len(), header.num_nodes as usize);
    write_header(writer, header)?;
    for node in nodes {
        write_node(writer, node)?;
    }
    Ok(())
}

/// Reads a header and exactly `num_nodes` records.
///
/// Only the header is validated here; count validation is done by
/// [`Dawg::from_parts`](super::lexicon::Dawg::from_parts).
pub(crate) fn read_dawg<R: Read>(reader: &mut R) -> Result<(DawgHeader, Vec<DawgNode>)> {
    let header = read_header(reader)?;
    let mut nodes = Vec::with_capacity((header.num_nodes as usize).min(MAX_PREALLOCATED_NODES));
    for _ in 0..header.num_nodes {
        nodes.push(read_node(reader)?);
    }
    trace!("Read {} node records", nodes.len());
    Ok((header, nodes))
}

pub(crate) fn save_atomically(path: &Path, header: &DawgHeader, nodes: &[DawgNode]) -> Result<SaveStats> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(DawgError::file_io(dir))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write_dawg(&mut writer, header, nodes).map_err(|err| err.at_path(path))?;
        writer.flush().map_err(DawgError::file_io(path))?;
    }
    temp.as_file().sync_all().map_err(DawgError::file_io(path))?;
    let bytes = temp.as_file().metadata().map_err(DawgError::file_io(path))?.len();
    temp.persist(path)
        .map_err(|err| DawgError::file_io(path)(err.error))?;

    info!(
        "Saved DAWG '{}' to {} ({} nodes, {} bytes)",
        header.lexicon_name,
        path.display(),
        header.num_nodes,
        bytes
    );
    Ok(SaveStats {
        path: path.to_path_buf(),
        bytes,
        nodes: header.num_nodes,
    })
}

pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(DawgError::file_io(path))?;
    debug!("Opened {}", path.display());
    Ok(BufReader::new(file))
}

/// Writes a header.
pub fn write_header<W: Write>(writer: &mut W, header: &DawgHeader) -> Result<()> {
    writer.write_u32::<LittleEndian>(header.version)?;
    writer.write_u32::<LittleEndian>(header.num_nodes)?;
    write_string(writer, &header.lexicon_name)?;
    write_string(writer, &header.lexicon_date)?;
    writer.write_u32::<LittleEndian>(header.num_words)?;
    write_string(writer, header.dawg_type.as_str())?;
    writer.write_u32::<LittleEndian>(header.num_reverse_wordlets)?;
    writer.write_u32::<LittleEndian>(header.num_forward_wordlets)?;
    Ok(())
}

/// Reads and validates a header.
///
/// # Errors
///
/// Returns [`DawgError::MalformedHeader`] if the version is not 1, the node count is below
/// [`MIN_NUM_NODES`], a string is not UTF-8, or the DAWG type tag is unknown.
pub fn read_header<R: Read>(reader: &mut R) -> Result<DawgHeader> {
    let version = reader.read_u32::<LittleEndian>()?;
    if version != CURRENT_VERSION {
        return Err(HeaderDefect::UnsupportedVersion(version).into());
    }
    let num_nodes = reader.read_u32::<LittleEndian>()?;
    if num_nodes < MIN_NUM_NODES {
        return Err(HeaderDefect::TooFewNodes {
            declared: num_nodes,
            minimum: MIN_NUM_NODES,
        }
        .into());
    }
    let lexicon_name = read_string(reader)?;
    let lexicon_date = read_string(reader)?;
    let num_words = reader.read_u32::<LittleEndian>()?;
    let dawg_type = read_string(reader)?.parse()?;
    let num_reverse_wordlets = reader.read_u32::<LittleEndian>()?;
    let num_forward_wordlets = reader.read_u32::<LittleEndian>()?;

    trace!("Header: version={version}, nodes={num_nodes}, name={lexicon_name:?}, type={dawg_type}");
    Ok(DawgHeader {
        version,
        num_nodes,
        lexicon_name,
        lexicon_date,
        num_words,
        dawg_type,
        num_reverse_wordlets,
        num_forward_wordlets,
    })
}

fn write_node<W: Write>(writer: &mut W, node: &DawgNode) -> Result<()> {
    writer.write_u32::<LittleEndian>(node.child_idx)?;
    writer.write_u8(node.letter)?;
    writer.write_u8(u8::from(node.is_terminal))?;
    writer.write_u8(u8::from(node.is_last_child))?;
    Ok(())
}

fn read_node<R: Read>(reader: &mut R) -> Result<DawgNode> {
    Ok(DawgNode {
        child_idx: reader.read_u32::<LittleEndian>()?,
        letter: reader.read_u8()?,
        is_terminal: reader.read_u8()? != 0,
        is_last_child: reader.read_u8()? != 0,
    })
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    let mut len = u32::try_from(s.len()).map_err(|_| HeaderDefect::InvalidString)?;
    while len >= 0x80 {
        writer.write_u8((len as u8 & 0x7F) | 0x80)?;
        len >>= 7;
    }
    writer.write_u8(len as u8)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let mut len: u32 = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_u8()?;
        if shift == 28 && byte > 0x0F {
            return Err(HeaderDefect::InvalidString.into());
        }
        len |= u32::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    let mut bytes = Vec::new();
    reader.by_ref().take(u64::from(len)).read_to_end(&mut bytes)?;
    if bytes.len() != len as usize {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    String::from_utf8(bytes).map_err(|_| HeaderDefect::InvalidString.into())
}
