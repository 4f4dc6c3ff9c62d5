//! Hello Triangle bring-up
//!
//! Opens a window, initializes the Vulkan device pipeline, runs the event
//! loop until the window closes and tears everything down in reverse order.
//! Any failure is printed to stderr and the process exits non-zero.

use std::process::ExitCode;

use gpu_bootstrap::foundation::logging;
use gpu_bootstrap::prelude::*;
use thiserror::Error;

const CONFIG_PATH: &str = "bootstrap.toml";

/// Application-level errors
#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    #[error("Vulkan initialization error: {0}")]
    Init(#[from] InitError),
}

fn run(config: &BootstrapConfig) -> Result<(), AppError> {
    let mut window = GlfwWindow::new(&config.window)?;
    let platform_extensions = window.required_instance_extensions()?;

    let runtime = AshRuntime::load()?;
    let context = VulkanContext::initialize(&runtime, config, &platform_extensions)?;
    log::info!(
        "Vulkan ready on '{}' (graphics family {})",
        context.physical_device().name(),
        context.device().graphics_family()
    );

    run_event_loop(&mut window);

    // Device pipeline first, then the window and GLFW
    drop(context);
    drop(window);
    Ok(())
}

fn main() -> ExitCode {
    let config = match BootstrapConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        eprintln!("{}", AppError::from(e));
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => {
            log::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
