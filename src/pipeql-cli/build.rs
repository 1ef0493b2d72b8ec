//! Build info shown by `pipeql --version`

use std::process::Command;

fn main() {
    let rustc = std::env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let vars = [
        ("GIT_HASH", stdout_of("git", &["rev-parse", "--short", "HEAD"])),
        ("BUILD_DATE", stdout_of("date", &["+%Y-%m-%d"])),
        (
            "RUSTC_VERSION",
            // "rustc 1.80.0 (051478957 2024-07-21)"
            stdout_of(&rustc, &["--version"])
                .and_then(|line| line.split_whitespace().nth(1).map(str::to_string)),
        ),
    ];
    for (name, value) in vars {
        if let Some(value) = value {
            println!("cargo:rustc-env={}={}", name, value);
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}

/// Trimmed stdout of a successful command
fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim().to_string())
}
