//! Konsolenausgabe von Vektoren und Kernelzeit.

use opencl3::types::cl_int;
use std::{io::Write, time::Duration};

/// Ab dieser Länge wird im `Truncated`-Modus gekürzt
pub const TRUNCATE_ABOVE: usize = 15;
/// Elemente am Anfang und Ende einer gekürzten Ausgabe
pub const EDGE: usize = 5;

pub const SEPARATOR: &str = "----------------------------";
pub const RESULT_HEADER: &str = "Result of vector addition:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PrintMode {
    #[default]
    Full,
    /// first and last 5 elements when longer than 15
    Truncated,
    Off,
}

fn join(values: &[cl_int]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}

/// Vektor als eine Zeile, `None` bei `PrintMode::Off`.
pub fn format_vector(values: &[cl_int], mode: PrintMode) -> Option<String> {
    match mode {
        PrintMode::Off => None,
        PrintMode::Truncated if values.len() > TRUNCATE_ABOVE => {
            let head = join(&values[..EDGE]);
            let tail = join(&values[values.len() - EDGE..]);
            Some(format!("{head} ..... {tail}"))
        }
        PrintMode::Full | PrintMode::Truncated => Some(join(values)),
    }
}

pub fn write_vector(w: &mut impl Write, values: &[cl_int], mode: PrintMode) -> std::io::Result<()> {
    match format_vector(values, mode) {
        Some(line) => writeln!(w, "{line}"),
        None => Ok(()),
    }
}

/// Vektor gefolgt von der Trennlinie
pub fn write_section(w: &mut impl Write, values: &[cl_int], mode: PrintMode) -> std::io::Result<()> {
    if mode == PrintMode::Off {
        return Ok(());
    }
    write_vector(w, values, mode)?;
    writeln!(w, "{SEPARATOR}")
}

pub fn write_kernel_time(w: &mut impl Write, elapsed: Duration) -> std::io::Result<()> {
    writeln!(w, "Kernel Execution Time: {:.6} ms", elapsed.as_secs_f64() * 1e3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> std::io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn full_is_space_separated() {
        assert_eq!(format_vector(&[6, 6, -1], PrintMode::Full).unwrap(), "6 6 -1");
        assert_eq!(format_vector(&[], PrintMode::Full).unwrap(), "");
    }

    #[test]
    fn truncation_kicks_in_above_fifteen() {
        let short: Vec<cl_int> = (1..=15).collect();
        assert_eq!(
            format_vector(&short, PrintMode::Truncated).unwrap(),
            format_vector(&short, PrintMode::Full).unwrap()
        );

        let long: Vec<cl_int> = (1..=16).collect();
        assert_eq!(
            format_vector(&long, PrintMode::Truncated).unwrap(),
            "1 2 3 4 5 ..... 12 13 14 15 16"
        );
    }

    #[test]
    fn off_prints_nothing() {
        assert_eq!(format_vector(&[1], PrintMode::Off), None);
        assert_eq!(render(|w| write_section(w, &[1, 2], PrintMode::Off)), "");
    }

    #[test]
    fn section_ends_with_separator() {
        let text = render(|w| write_section(w, &[1, 2], PrintMode::Full));
        assert_eq!(text, format!("1 2\n{SEPARATOR}\n"));
    }

    #[test]
    fn kernel_time_in_milliseconds() {
        let text = render(|w| write_kernel_time(w, Duration::from_micros(1500)));
        assert_eq!(text, "Kernel Execution Time: 1.500000 ms\n");
    }
}
