use std::process::Command;

fn git(args: &[&str]) -> Option<std::process::Output> {
    Command::new("git").args(args).output().ok()
}

/// Short commit hash, suffixed `-dirty` with uncommitted changes, else `unknown`.
fn revision() -> String {
    let Some(out) = git(&["rev-parse", "--short", "HEAD"]).filter(|o| o.status.success()) else {
        return "unknown".to_string();
    };
    let hash = String::from_utf8_lossy(&out.stdout).trim().to_string();
    let dirty = git(&["diff", "--quiet"]).is_some_and(|o| !o.status.success());
    if dirty { format!("{}-dirty", hash) } else { hash }
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", revision());
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
