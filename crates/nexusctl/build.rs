// Build script for nexusctl - embeds version at compile time

fn main() {
    // Release pipelines may set NEXUSCTL_VERSION, otherwise use Cargo.toml
    let version =
        std::env::var("NEXUSCTL_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=NEXUSCTL_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=NEXUSCTL_VERSION");
}
