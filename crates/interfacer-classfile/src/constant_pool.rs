use crate::error::{ConstantProblem, Error, Result};
use crate::reader::Reader;

#[derive(Debug, Clone)]
enum Constant {
    /// Index 0 and the second slot of `long`/`double` entries.
    Unusable,
    Utf8(String),
    Class { name_index: u16 },
    /// Any entry whose payload is irrelevant for API extraction.
    Other(&'static str),
}

impl Constant {
    fn kind(&self) -> &'static str {
        match self {
            Constant::Unusable => "unusable",
            Constant::Utf8(_) => "Utf8",
            Constant::Class { .. } => "Class",
            Constant::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<Constant>,
}

impl ConstantPool {
    pub(crate) fn parse(reader: &mut Reader<'_>) -> Result<Self> {
        let count = reader.read_u2()? as usize;
        let mut entries = Vec::with_capacity(count.max(1));
        entries.push(Constant::Unusable);

        while entries.len() < count {
            let tag = reader.read_u1()?;
            let (entry, wide) = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    (Constant::Utf8(decode_modified_utf8(bytes)?), false)
                }
                3 => {
                    reader.read_u4()?;
                    (Constant::Other("Integer"), false)
                }
                4 => {
                    reader.read_u4()?;
                    (Constant::Other("Float"), false)
                }
                5 => {
                    reader.read_bytes(8)?;
                    (Constant::Other("Long"), true)
                }
                6 => {
                    reader.read_bytes(8)?;
                    (Constant::Other("Double"), true)
                }
                7 => (
                    Constant::Class {
                        name_index: reader.read_u2()?,
                    },
                    false,
                ),
                8 => {
                    reader.read_u2()?;
                    (Constant::Other("String"), false)
                }
                9 | 10 | 11 | 12 | 17 | 18 => {
                    reader.read_u4()?;
                    (Constant::Other("Ref"), false)
                }
                15 => {
                    reader.read_u1()?;
                    reader.read_u2()?;
                    (Constant::Other("MethodHandle"), false)
                }
                16 | 19 | 20 => {
                    reader.read_u2()?;
                    (Constant::Other("Named"), false)
                }
                other => return Err(Error::UnknownConstantTag(other)),
            };

            entries.push(entry);
            if wide {
                entries.push(Constant::Unusable);
            }
        }

        Ok(Self { entries })
    }

    fn get(&self, index: u16) -> Result<&Constant> {
        match self.entries.get(index as usize) {
            Some(Constant::Unusable) | None => Err(Error::Constant {
                index,
                problem: ConstantProblem::Unusable,
            }),
            Some(entry) => Ok(entry),
        }
    }

    pub(crate) fn get_utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            Constant::Utf8(value) => Ok(value),
            other => Err(Error::Constant {
                index,
                problem: ConstantProblem::WrongKind {
                    expected: "Utf8",
                    found: other.kind(),
                },
            }),
        }
    }

    pub(crate) fn get_class_name(&self, index: u16) -> Result<String> {
        match self.get(index)? {
            Constant::Class { name_index } => Ok(self.get_utf8(*name_index)?.to_string()),
            other => Err(Error::Constant {
                index,
                problem: ConstantProblem::WrongKind {
                    expected: "Class",
                    found: other.kind(),
                },
            }),
        }
    }
}

/// Decode the JVM's "modified UTF-8" (JVMS 4.4.7).
///
/// Supplementary characters are stored as surrogate pairs of 3-byte sequences, so the bytes are
/// decoded to UTF-16 code units first.
fn decode_modified_utf8(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let b0 = bytes[idx] as u16;
        if b0 & 0x80 == 0 {
            if b0 == 0 {
                return Err(Error::ModifiedUtf8);
            }
            units.push(b0);
            idx += 1;
        } else if b0 & 0xE0 == 0xC0 {
            let b1 = continuation(bytes, idx + 1)?;
            units.push(((b0 & 0x1F) << 6) | b1);
            idx += 2;
        } else if b0 & 0xF0 == 0xE0 {
            let b1 = continuation(bytes, idx + 1)?;
            let b2 = continuation(bytes, idx + 2)?;
            units.push(((b0 & 0x0F) << 12) | (b1 << 6) | b2);
            idx += 3;
        } else {
            return Err(Error::ModifiedUtf8);
        }
    }
    String::from_utf16(&units).map_err(|_| Error::ModifiedUtf8)
}

fn continuation(bytes: &[u8], idx: usize) -> Result<u16> {
    match bytes.get(idx) {
        Some(b) if b & 0xC0 == 0x80 => Ok((b & 0x3F) as u16),
        _ => Err(Error::ModifiedUtf8),
    }
}
