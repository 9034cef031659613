use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path next to the input, e.g. movie.srt -> movie.resync.srt
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension);

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Fail when `output` exists and overwriting was not requested.
    ///
    /// Also refuses to overwrite one of the inputs.
    pub fn check_output<P: AsRef<Path>>(output: P, inputs: &[&Path], force_overwrite: bool) -> Result<()> {
        let output = output.as_ref();

        if inputs.iter().any(|input| same_file(input, output)) {
            return Err(anyhow!("Output file {:?} is also an input file", output));
        }

        if output.exists() && !force_overwrite {
            return Err(anyhow!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                output
            ));
        }

        if let Some(parent) = output.parent() {
            Self::ensure_dir(parent)?;
        }

        Ok(())
    }
}

// Compare canonical paths when both exist, raw paths otherwise
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
