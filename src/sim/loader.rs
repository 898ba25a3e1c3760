//! Binary image loader. The on-disk format is big-endian regardless of
//! host: a 4-byte instruction count, a 4-byte start address, then that
//! many 4-byte instruction words. `u32::from_be_bytes` already does the
//! host-endianness conversion the original's runtime little-endian probe
//! and byte-swap loop existed to perform, so no explicit probe is needed
//! here. Grounded in `Project2/interpreter.c`'s `main` (header read +
//! `Convert` byte-swap loop).

use std::fs;
use std::path::Path;

use crate::common::error::Fatal;

pub struct LoadedImage {
    pub instructions: Vec<u32>,
    pub start: u32,
}

pub fn load_binary(path: &Path) -> Result<LoadedImage, Fatal> {
    let bytes = fs::read(path).map_err(|err| {
        Fatal::InputError(format!(
            "error: could not open file {}: {err}",
            path.display()
        ))
    })?;

    if bytes.len() < 8 {
        return Err(Fatal::InputError(format!(
            "error: could not read count from file {}",
            path.display()
        )));
    }

    let icount = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
    let start = u32::from_be_bytes(bytes[4..8].try_into().unwrap());

    let needed = 8 + icount * 4;
    if bytes.len() < needed {
        return Err(Fatal::InputError(format!(
            "error: could not read (all) instructions from file {}",
            path.display()
        )));
    }

    let instructions = bytes[8..needed]
        .chunks_exact(4)
        .map(|word| u32::from_be_bytes(word.try_into().unwrap()))
        .collect();

    Ok(LoadedImage { instructions, start })
}
