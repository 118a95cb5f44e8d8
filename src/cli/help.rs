//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    if config.models.is_empty() {
        print_first_time_help();
    } else {
        print_configured_help(config);
    }
}

/// Print detailed setup guide for first-time users.
pub fn print_first_time_help() {
    println!("No models configured. Get started with Insectifica:");
    println!();
    println!("1. Initialize configuration:");
    println!("   insectifica config init");
    println!();
    println!("2. Register an ONNX image classifier trained on the insect label set:");
    println!("   insectifica models add mobilenetv2 --path ./mobilenetv2_insect_best.onnx --default");
    println!();
    println!("   Models expecting a different input convention can say so, e.g.:");
    println!(
        "   insectifica models add efficientnet --path ./efficientnet.onnx --size 190 --normalization mobile-net"
    );
    println!();
    println!("3. Point at the species reference data (JSON):");
    println!("   add `reference = \"/path/to/pest.json\"` under [defaults] in the config file,");
    println!("   or pass --reference on each run.");
    println!();
    println!("4. Classify photographs:");
    println!("   insectifica leaf.jpg");
    println!();
    println!("Run 'insectifica -h' for all options.");
}

/// Print brief usage reminder for configured users.
pub fn print_configured_help(config: &Config) {
    println!("Usage: insectifica [IMAGES]... [OPTIONS]");
    println!();
    match config.defaults.model.as_deref() {
        Some(model) => println!("Example: insectifica photos/ -m {model} -k 5"),
        None => println!("Example: insectifica photos/ -m <model> -k 5"),
    }
    println!();
    println!(
        "Run 'insectifica -h' for all options or 'insectifica models list' to see configured models."
    );
}
