use std::process::Command;

use chrono::SecondsFormat;

fn main() {
    // Release pipelines can pin both values; local builds derive them.
    for var in ["UPGRADER_BUILD_TIME", "UPGRADER_GIT_COMMIT"] {
        println!("cargo:rerun-if-env-changed={var}");
    }
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=build.rs");

    let build_time = std::env::var("UPGRADER_BUILD_TIME")
        .unwrap_or_else(|_| chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let commit = std::env::var("UPGRADER_GIT_COMMIT")
        .ok()
        .or_else(git_commit)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=UPGRADER_BUILD_TIME={build_time}");
    println!("cargo:rustc-env=UPGRADER_GIT_COMMIT={commit}");
}

fn git_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!rev.is_empty()).then_some(rev)
}
