/// Build script for codestep
/// Embeds version and revision so `codestep version` can report them

fn main() {
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");

    if let Ok(version) = std::env::var("CARGO_PKG_VERSION") {
        println!("cargo:rustc-env=CODESTEP_VERSION={version}");
    }

    // Missing git (e.g. building from a crates.io tarball) just leaves the hash unset
    if let Ok(output) = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            if let Ok(hash) = String::from_utf8(output.stdout) {
                println!("cargo:rustc-env=CODESTEP_GIT_HASH={}", hash.trim());
            }
        }
    }
}
