/// Build script for tourgame
/// Embeds the version, git hash and build time shown by `tourgame version`

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    if let Ok(version) = std::env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=TOURGAME_VERSION={version}");
    }

    // Skipped outside a git checkout so the binary reports "unknown".
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=GIT_HASH={}", hash.trim());
            }
        }
    }

    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", unix_timestamp());
}

/// Seconds since the Unix epoch.
fn unix_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
