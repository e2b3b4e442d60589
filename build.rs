use std::process::Command;

/// Runs git and returns trimmed stdout, or an empty string outside a checkout.
fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default()
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");

    // Set only when HEAD is exactly a release tag.
    let tag = git(&["describe", "--tags", "--exact-match"]);

    println!("cargo:rustc-env=RELEASE_VERSION={}", tag);

    let latest = git(&["describe", "--tags", "--abbrev=0"]);

    println!("cargo:rustc-env=LATEST_TAG={}", latest);

    let ahead = if latest.is_empty() {
        String::new()
    } else {
        git(&["rev-list", "--count", &format!("{latest}..HEAD")])
    };

    println!("cargo:rustc-env=COMMITS_AHEAD={}", ahead);
}
