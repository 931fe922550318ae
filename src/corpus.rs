//! Opening the training corpus and the transformed output.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{PhrasalError, Result};

const IO_BUFFER_BYTES: usize = 1 << 16;

/// Opens a corpus file for one streaming pass.
///
/// The corpus is opened once per pass; both passes must see identical bytes.
pub fn open_corpus<P: AsRef<Path>>(path: P) -> Result<BufReader<File>> {
    let path = path.as_ref();
    let metadata = path
        .metadata()
        .map_err(|err| PhrasalError::io(err, Some(path.to_path_buf())))?;
    if !metadata.is_file() {
        return Err(PhrasalError::InvalidConfig(format!(
            "training input {path:?} is not a regular file"
        )));
    }
    let file = File::open(path).map_err(|err| PhrasalError::io(err, Some(path.to_path_buf())))?;
    Ok(BufReader::with_capacity(IO_BUFFER_BYTES, file))
}

/// Creates (or truncates) the output file behind a buffered writer.
pub fn create_output<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let path = path.as_ref();
    let file =
        File::create(path).map_err(|err| PhrasalError::io(err, Some(path.to_path_buf())))?;
    Ok(BufWriter::with_capacity(IO_BUFFER_BYTES, file))
}
