//! chhaya-retarget-node
//!
//! Replays a recorded skeleton-tracking session through the retargeting
//! engine and forwards the resulting commands to a logging actuation
//! sink. Degenerate frames (tracking glitches producing zero-length
//! limb segments) are logged and skipped; processing always continues
//! with the next frame.
//!
//! # Usage
//!
//! ```bash
//! # With default config
//! cargo run --bin chhaya-retarget-node
//!
//! # With custom config file
//! cargo run --bin chhaya-retarget-node -- --config chhaya-retarget.toml
//!
//! # Replay a specific session
//! cargo run --bin chhaya-retarget-node -- --file session.cflg
//! ```

use std::fs;
use std::io::Write;

use serde::Deserialize;

use chhaya_retarget::{
    ArmActuator, ArmSide, FrameLogPlayer, GripperActuator, JointAngles, JointLimits,
    LoggingActuator, PoseMode, PoseModeConfig, RetargetConfig, RetargetingEngine,
};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct Config {
    #[serde(default)]
    playback: PlaybackConfig,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    limits: JointLimits,
    #[serde(default)]
    pose_mode: PoseModeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PlaybackConfig {
    /// Frame log to replay
    file: String,
    /// Pace playback by the recorded timestamps
    realtime: bool,
    /// Playback speed multiplier when pacing
    speed: f32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            file: "session.cflg".to_string(),
            realtime: false,
            speed: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EngineConfig {
    /// Output mode: "joint" (primary) or "pose" (secondary)
    mode: String,
    /// Which arm mimics the tracked limb
    mimic_side: ArmSide,
    /// Bend angle above which the gripper closes (radians)
    gripper_close_threshold: f32,
    /// Frame-alignment offset for the shoulder-rotation angle (radians)
    shoulder_offset: f32,
    /// Fixed wrist rotation (w0), radians
    wrist_w0: f32,
    /// Fixed wrist flexion (w1), radians
    wrist_w1: f32,
    /// Fixed wrist twist (w2), radians
    wrist_w2: f32,
    /// Constant pose for the non-mimicked arm
    fixed_pose: JointAngles,
    /// Neutral reset pose for the mimicked arm
    neutral_pose: JointAngles,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = RetargetConfig::default();
        Self {
            mode: "joint".to_string(),
            mimic_side: defaults.mimic_side,
            gripper_close_threshold: defaults.gripper_close_threshold,
            shoulder_offset: defaults.shoulder_offset,
            wrist_w0: defaults.wrist_w0,
            wrist_w1: defaults.wrist_w1,
            wrist_w2: defaults.wrist_w2,
            fixed_pose: defaults.fixed_pose,
            neutral_pose: defaults.neutral_pose,
        }
    }
}

fn build_retarget_config(config: &Config) -> RetargetConfig {
    RetargetConfig {
        mimic_side: config.engine.mimic_side,
        limits: config.limits,
        shoulder_offset: config.engine.shoulder_offset,
        wrist_w0: config.engine.wrist_w0,
        wrist_w1: config.engine.wrist_w1,
        wrist_w2: config.engine.wrist_w2,
        gripper_close_threshold: config.engine.gripper_close_threshold,
        fixed_pose: config.engine.fixed_pose,
        neutral_pose: config.engine.neutral_pose,
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

struct Args {
    config_path: Option<String>,
    file_override: Option<String>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        config_path: None,
        file_override: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    result.config_path = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--file" | "-f" => {
                if i + 1 < args.len() {
                    result.file_override = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("chhaya-retarget-node - skeleton-to-arm retargeting replay");
    println!();
    println!("USAGE:");
    println!("    chhaya-retarget-node [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (default: chhaya-retarget.toml)");
    println!("    -f, --file <FILE>       Frame log to replay (overrides config)");
    println!("    -h, --help              Print help information");
    println!();
    println!("CONFIGURATION:");
    println!("    All settings are configured via the TOML config file:");
    println!("    - [playback] file, realtime, speed: frame log replay");
    println!("    - [engine] mode (joint|pose), mimic_side, gripper_close_threshold");
    println!("    - [limits] s0/s1/e1: per-joint safe ranges");
    println!("    - [pose_mode] scale, x_offset, z_offset");
}

fn load_config(args: &Args) -> Config {
    match &args.config_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(contents) => match basic_toml::from_str(&contents) {
                Ok(cfg) => {
                    log::info!("Loaded config from {}", path);
                    cfg
                }
                Err(e) => {
                    eprintln!("Failed to parse config {}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Failed to read config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => {
            let default_path = "chhaya-retarget.toml";
            if let Ok(contents) = fs::read_to_string(default_path) {
                if let Ok(cfg) = basic_toml::from_str(&contents) {
                    log::info!("Loaded config from {}", default_path);
                    return cfg;
                }
            }
            Config::default()
        }
    }
}

// ============================================================================
// Replay Loop
// ============================================================================

fn run_joint_mode(
    mut player: FrameLogPlayer,
    playback: &PlaybackConfig,
    engine: &RetargetingEngine,
    sink: &mut LoggingActuator,
) -> (u64, u64) {
    let mut processed = 0u64;
    let mut skipped = 0u64;

    loop {
        let record = if playback.realtime {
            player.next_paced(playback.speed)
        } else {
            player.next()
        };
        let record = match record {
            Ok(Some(r)) => r,
            Ok(None) => break,
            Err(e) => {
                log::error!("frame log read failed: {}", e);
                break;
            }
        };

        match engine.compute_joint_command(&record.frame) {
            Ok((arm, gripper)) => {
                if let Err(e) = sink.command_joints(&arm.named_angles()) {
                    log::error!("arm command failed: {}", e);
                }
                if let Err(e) = sink.command_gripper(gripper) {
                    log::error!("gripper command failed: {}", e);
                }
                processed += 1;
            }
            Err(e) => {
                log::warn!(
                    "skipping frame at {}us: {}",
                    record.timestamp_us,
                    e
                );
                skipped += 1;
            }
        }
    }

    (processed, skipped)
}

fn run_pose_mode(
    mut player: FrameLogPlayer,
    playback: &PlaybackConfig,
    pose_mode: &PoseMode,
    sink: &mut LoggingActuator,
) -> (u64, u64) {
    let mut processed = 0u64;
    let mut skipped = 0u64;

    loop {
        let record = if playback.realtime {
            player.next_paced(playback.speed)
        } else {
            player.next()
        };
        let record = match record {
            Ok(Some(r)) => r,
            Ok(None) => break,
            Err(e) => {
                log::error!("frame log read failed: {}", e);
                break;
            }
        };

        match pose_mode.compute_pose_command(&record.frame) {
            Ok((pose, gripper)) => {
                if let Err(e) = sink.command_pose(&pose) {
                    log::error!("pose command failed: {}", e);
                }
                if let Err(e) = sink.command_gripper(gripper) {
                    log::error!("gripper command failed: {}", e);
                }
                processed += 1;
            }
            Err(e) => {
                log::warn!(
                    "skipping frame at {}us: {}",
                    record.timestamp_us,
                    e
                );
                skipped += 1;
            }
        }
    }

    (processed, skipped)
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = parse_args();
    let mut config = load_config(&args);
    if let Some(file) = args.file_override {
        config.playback.file = file;
    }

    log::info!("chhaya-retarget starting");
    log::info!("  Input: frame log {}", config.playback.file);
    if config.playback.realtime {
        log::info!("  Pacing: realtime x{}", config.playback.speed);
    }
    log::info!("  Mode: {}", config.engine.mode);
    log::info!("  Mimic side: {}", config.engine.mimic_side);

    let player = match FrameLogPlayer::open(&config.playback.file) {
        Ok(p) => p,
        Err(e) => {
            log::error!("cannot open frame log {}: {}", config.playback.file, e);
            std::process::exit(1);
        }
    };

    let mut sink = LoggingActuator::new();
    let (processed, skipped) = match config.engine.mode.as_str() {
        "joint" => {
            let engine = RetargetingEngine::new(build_retarget_config(&config));
            // Park the mimicked arm at neutral before replay begins.
            if let Err(e) = sink.move_to_neutral(&engine.neutral_named_angles()) {
                log::error!("neutral reset failed: {}", e);
            }
            run_joint_mode(player, &config.playback, &engine, &mut sink)
        }
        "pose" => {
            let pose_mode = PoseMode::new(config.pose_mode);
            run_pose_mode(player, &config.playback, &pose_mode, &mut sink)
        }
        other => {
            log::error!("unknown mode '{}' (expected 'joint' or 'pose')", other);
            std::process::exit(1);
        }
    };

    log::info!(
        "replay finished: {} frames commanded, {} skipped, {} gripper transitions",
        processed,
        skipped,
        sink.gripper_transitions()
    );
}
