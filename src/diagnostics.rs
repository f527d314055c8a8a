//! System diagnostics and dependency checking.
//!
//! Verifies that the external tools and credentials a dubbing run needs
//! are present before any work starts.

use std::process::Command;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

/// Check if a command exists and is executable.
fn check_command(command: &str) -> CheckResult {
    // ffmpeg/ffprobe use a single-dash version flag
    match Command::new(command).arg("-version").output() {
        Ok(output) if output.status.success() => CheckResult::Ok,
        Ok(_) => CheckResult::Warning(format!("'{}' found but -version failed", command)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CheckResult::NotFound,
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", command, e)),
    }
}

/// Check whether an API key environment variable is set and non-empty.
fn check_env_key(var: &str) -> CheckResult {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => CheckResult::Ok,
        _ => CheckResult::NotFound,
    }
}

/// Run all dependency checks and print results.
///
/// Returns `false` if any required dependency is missing.
pub fn check_dependencies() -> bool {
    println!("Checking dependencies...\n");
    let mut all_ok = true;

    for tool in ["ffmpeg", "ffprobe"] {
        print!("{}: ", tool);
        match check_command(tool) {
            CheckResult::Ok => println!("✓ OK"),
            CheckResult::NotFound => {
                println!("✗ NOT FOUND");
                println!("  Install FFmpeg:");
                println!("    sudo apt install ffmpeg  (Debian/Ubuntu)");
                println!("    sudo pacman -S ffmpeg    (Arch)");
                all_ok = false;
            }
            CheckResult::Warning(msg) => {
                println!("⚠ WARNING: {}", msg);
                all_ok = false;
            }
        }
    }

    println!();
    for (var, service) in [
        ("DEEPGRAM_API_KEY", "transcription (Deepgram)"),
        ("ELEVENLABS_API_KEY", "speech synthesis (ElevenLabs)"),
    ] {
        print!("{}: ", var);
        match check_env_key(var) {
            CheckResult::Ok => println!("✓ set"),
            _ => {
                println!("✗ not set — needed for {}", service);
                all_ok = false;
            }
        }
    }

    println!();
    if all_ok {
        println!("All dependencies OK");
    } else {
        println!("Some dependencies are missing; dubbing runs will fail.");
    }

    all_ok
}
