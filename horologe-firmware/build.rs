//! Build script for horologe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates clock.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");
    if !config_path.exists() {
        fail("clock.toml not found", &["The firmware embeds clock.toml from the crate directory."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read clock.toml", &[&e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid TOML syntax in clock.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    validate_network(&config, &mut errors);
    validate_time(&config, &mut errors);
    validate_link(&config, &mut errors);
    validate_ui(&config, &mut errors);
    validate_palette(&config, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid configuration in clock.toml", &lines);
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.to_string()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

fn table<'a>(config: &'a toml::Value, name: &str) -> Option<&'a toml::value::Table> {
    config.get(name).and_then(|v| v.as_table())
}

fn check_string(t: &toml::value::Table, section: &str, key: &str, max: usize, errors: &mut Vec<String>) {
    match t.get(key) {
        Some(toml::Value::String(s)) if s.is_empty() => {
            errors.push(format!("[{}] {} must not be empty", section, key))
        }
        Some(toml::Value::String(s)) if s.len() > max => {
            errors.push(format!("[{}] {} longer than {} bytes", section, key, max))
        }
        Some(toml::Value::String(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be a string", section, key)),
    }
}

fn check_range(
    t: &toml::value::Table,
    section: &str,
    key: &str,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) {
    match t.get(key) {
        Some(toml::Value::Integer(v)) if !range.contains(v) => errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        )),
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn validate_network(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(net) = table(config, "network") else {
        errors.push("Missing [network] section".into());
        return;
    };
    if net.get("ssid").is_none() {
        errors.push("[network] missing 'ssid'".into());
    }
    check_string(net, "network", "ssid", 32, errors);
    check_string(net, "network", "password", 64, errors);
}

fn validate_time(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(time) = table(config, "time") else {
        return;
    };
    check_string(time, "time", "server", 64, errors);
    check_string(time, "time", "timezone", 8, errors);
    check_range(time, "time", "gmt_offset_hours", -12..=14, errors);
    check_range(time, "time", "dst_offset_s", 0..=7_200, errors);
    check_range(time, "time", "sync_interval_s", 1..=86_400, errors);
    check_range(time, "time", "sync_retry_ms", 1..=600_000, errors);
}

fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(link) = table(config, "link") else {
        return;
    };
    check_range(link, "link", "poll_interval_ms", 1..=u32::MAX as i64, errors);
    check_range(link, "link", "connect_timeout_ms", 1..=u32::MAX as i64, errors);
    check_range(link, "link", "max_reconnect_attempts", 1..=255, errors);
    check_range(link, "link", "failure_cooldown_ms", 0..=u32::MAX as i64, errors);
}

fn validate_ui(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(ui) = table(config, "ui") else {
        return;
    };
    check_string(ui, "ui", "title", 24, errors);
    for key in ["brightness", "brightness_min", "brightness_max"] {
        check_range(ui, "ui", key, 0..=255, errors);
    }
    check_range(ui, "ui", "brightness_step", 1..=255, errors);
    check_range(ui, "ui", "animation_frames", 1..=u16::MAX as i64, errors);

    let get = |key: &str| ui.get(key).and_then(|v| v.as_integer());
    if let (Some(min), Some(max)) = (get("brightness_min"), get("brightness_max")) {
        if min > max {
            errors.push("[ui] brightness_min above brightness_max".into());
        }
    }
}

fn validate_palette(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(palette) = table(config, "palette") else {
        return;
    };
    for (key, _) in palette {
        if !["connected", "connecting", "failed", "offline"].contains(&key.as_str()) {
            errors.push(format!("[palette] unknown colour '{}'", key));
        }
        check_range(palette, "palette", key, 0..=0xFFFF, errors);
    }
}
