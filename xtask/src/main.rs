#![deny(unused_must_use)]

use std::{env, fs, path::PathBuf};

use xshell::cmd;

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let args = args.iter().map(|s| &**s).collect::<Vec<_>>();

    match &args[..] {
        ["ci"] => test_ci(),
        ["features"] => check_features(),
        ["update"] => update(),
        _ => {
            println!("USAGE cargo xtask [ci|features|update]");
            Ok(())
        }
    }
}

fn update() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(root_dir())?;
    cmd!("cargo update").run()?;
    Ok(())
}

fn test_ci() -> Result<(), anyhow::Error> {
    let _e = xshell::pushenv("CI", "true");
    test_device()?;
    check_features()?;
    Ok(())
}

fn test_device() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(device_dir())?;

    cmd!("cargo test --all").run()?;
    Ok(())
}

/// Build the driver without `std` once bare and once per optional logging feature.
fn check_features() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(device_dir())?;

    cmd!("cargo check --lib --no-default-features").run()?;
    for feature in logging_features()? {
        println!("Checking device with feature {}", feature);
        cmd!("cargo check --lib --no-default-features --features {feature}").run()?;
    }
    Ok(())
}

/// Features of the device crate that pick a logging backend.
fn logging_features() -> Result<Vec<String>, anyhow::Error> {
    let mut manifest = device_dir();
    manifest.push("Cargo.toml");

    let manifest: toml::Value = fs::read_to_string(&manifest)?.parse()?;
    let features = manifest
        .get("features")
        .and_then(|f| f.as_table())
        .ok_or_else(|| anyhow::anyhow!("device crate has no [features] table"))?;

    Ok(features
        .keys()
        .filter(|name| *name == "log" || *name == "defmt")
        .cloned()
        .collect())
}

fn device_dir() -> PathBuf {
    let mut device = root_dir();
    device.push("device");
    device
}

fn root_dir() -> PathBuf {
    let mut xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    xtask_dir.pop();
    xtask_dir
}
