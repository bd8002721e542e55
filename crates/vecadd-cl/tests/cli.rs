// Exit-Codes und Usage, ohne Gerät prüfbar

use std::process::{Command, Output};

fn vecadd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vecadd"))
        .args(args)
        .env_remove("VECADD_DEVICE")
        .output()
        .expect("failed to spawn vecadd")
}

fn vecadd_timed(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vecadd-timed"))
        .args(args)
        .env_remove("VECADD_KERNEL_FILE")
        .output()
        .expect("failed to spawn vecadd-timed")
}

#[test]
fn missing_size_prints_usage_and_exits_1() {
    let out = vecadd(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage:"), "stderr was: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn invalid_size_exits_1() {
    for bad in ["abc", "-3", "1.5"] {
        let out = vecadd(&[bad]);
        assert_eq!(out.status.code(), Some(1), "argument {bad:?}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Usage:"));
    }
    assert_eq!(vecadd_timed(&["lots"]).status.code(), Some(1));
}

#[test]
fn help_exits_0() {
    let out = vecadd(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("<VECTOR_SIZE>"));

    let out = vecadd_timed(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&out.stdout).contains("--kernel-file"));
}

#[test]
fn unreadable_kernel_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.cl");
    let out = vecadd_timed(&["5", "--kernel-file", missing.to_str().unwrap()]);
    // Quelle wird vor der Geräteauswahl gelesen
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("couldn't read kernel source"), "stderr was: {stderr}");
    assert!(out.stdout.is_empty());
}

#[test]
fn size_beyond_kernel_int_prints_usage_and_exits_1() {
    for too_big in ["2147483648", "5000000000000000000"] {
        let out = vecadd(&[too_big]);
        assert_eq!(out.status.code(), Some(1), "argument {too_big}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Usage:"));
        assert!(out.stdout.is_empty());

        let out = vecadd_timed(&[too_big]);
        assert_eq!(out.status.code(), Some(1), "argument {too_big}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("Usage:"));
    }
}
