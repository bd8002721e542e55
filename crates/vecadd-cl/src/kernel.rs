//! Kernelquelle laden, Programm bauen, Build-Log bei Fehlern einsammeln.

use crate::{device::Session, ClError};
use log::{debug, error};
use opencl3::{kernel::Kernel, program::Program};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Eingebetteter Kernel: `vector_add(a, b, out, size)`
pub const EMBEDDED_SOURCE: &str = include_str!("../kernels/vec_add.cl");
pub const EMBEDDED_NAME: &str = "vector_add";

/// Standardpfad des externen Kernels, relativ zum Arbeitsverzeichnis
pub const DEFAULT_KERNEL_FILE: &str = "./vector_ops_ocl.cl";
pub const FILE_KERNEL_NAME: &str = "vector_add_ocl";

/// zwei Eingaben, eine Ausgabe, die Länge
const KERNEL_ARITY: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelSource {
    Embedded,
    File(PathBuf),
}

impl KernelSource {
    pub fn load(&self) -> Result<String, ClError> {
        match self {
            KernelSource::Embedded => Ok(EMBEDDED_SOURCE.to_owned()),
            KernelSource::File(path) => read_source(path),
        }
    }
}

fn read_source(path: &Path) -> Result<String, ClError> {
    debug!("reading kernel source from {}", path.display());
    fs::read_to_string(path).map_err(|source| ClError::KernelFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Reihenfolge der Kernel-Argumente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgLayout {
    /// `(a, b, out, size)`
    SizeLast,
    /// `(size, a, b, out)`
    SizeFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSpec {
    pub source: KernelSource,
    pub name: String,
    pub layout: ArgLayout,
}

impl KernelSpec {
    pub fn embedded() -> Self {
        Self {
            source: KernelSource::Embedded,
            name: EMBEDDED_NAME.to_owned(),
            layout: ArgLayout::SizeLast,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            source: KernelSource::File(path.into()),
            name: FILE_KERNEL_NAME.to_owned(),
            layout: ArgLayout::SizeFirst,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Gebautes Programm samt Kernel-Objekt
pub struct CompiledKernel {
    kernel: Kernel,
    // hält das Programm so lange wie den Kernel am Leben
    _program: Program,
    name: String,
    layout: ArgLayout,
}

impl CompiledKernel {
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> ArgLayout {
        self.layout
    }
}

/// Quelle laden, für das Sitzungsgerät bauen und den Kernel anlegen.
pub fn build(session: &Session, spec: &KernelSpec) -> Result<CompiledKernel, ClError> {
    let src = spec.source.load()?;
    build_source(session, &src, &spec.name, spec.layout)
}

pub fn build_source(
    session: &Session,
    src: &str,
    name: &str,
    layout: ArgLayout,
) -> Result<CompiledKernel, ClError> {
    let device_id = session.device().device.id();

    let mut program = Program::create_from_source(session.context(), src)?;
    if let Err(e) = program.build(&[device_id], "") {
        let log = program.get_build_log(device_id).unwrap_or_default();
        let log = non_empty_log(log, e.0);
        error!("kernel `{name}` failed to build");
        return Err(ClError::Build { kernel: name.to_owned(), code: e.0, log });
    }
    debug!("program for `{name}` built on `{}`", session.device().name);

    let kernel = Kernel::create(&program, name)?;
    let arity = kernel.num_args()?;
    if arity != KERNEL_ARITY {
        return Err(ClError::KernelArity { kernel: name.to_owned(), found: arity });
    }
    Ok(CompiledKernel { kernel, _program: program, name: name.to_owned(), layout })
}

/// Manche Treiber liefern bei Fehlern ein leeres Log
fn non_empty_log(log: String, code: i32) -> String {
    if log.trim().is_empty() {
        format!("(driver returned no build log, error code {code})")
    } else {
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_kernel_matches_its_name() {
        let spec = KernelSpec::embedded();
        assert_eq!(spec.layout, ArgLayout::SizeLast);
        let src = spec.source.load().unwrap();
        assert!(src.contains("__kernel void vector_add("));
    }

    #[test]
    fn file_source_is_read_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "__kernel void k() {{}}").unwrap();

        let spec = KernelSpec::from_file(file.path()).with_name("k");
        assert_eq!(spec.name, "k");
        assert_eq!(spec.layout, ArgLayout::SizeFirst);
        assert_eq!(spec.source.load().unwrap(), "__kernel void k() {}");
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.cl");
        let err = KernelSource::File(path.clone()).load().unwrap_err();
        match err {
            ClError::KernelFile { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_build_log_is_replaced() {
        assert_eq!(
            non_empty_log(" \n".into(), -11),
            "(driver returned no build log, error code -11)"
        );
        assert_eq!(non_empty_log("line 1: error".into(), -11), "line 1: error");
    }
}
