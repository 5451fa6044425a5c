//! Full configuration validation.
//!
//! Collects every problem into a single error so a user fixes a broken
//! config in one pass.

use crate::schema::ChorusConfig;
use chorus_common::ConfigError;
use url::Url;

/// Upper bound on panels; each one is a live browser surface.
pub const MAX_PANELS: usize = 12;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &ChorusConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    // Panels
    if config.panels.is_empty() {
        errors.push("panels must not be empty".to_string());
    }
    if config.panels.len() > MAX_PANELS {
        errors.push(format!(
            "panels has {} entries, at most {MAX_PANELS} are allowed",
            config.panels.len()
        ));
    }
    for (index, panel) in config.panels.iter().enumerate() {
        if panel.title.trim().is_empty() {
            errors.push(format!("panels[{index}].title must not be empty"));
        }
        if !is_web_url(&panel.url) {
            errors.push(format!(
                "panels[{index}].url = {:?} must be an http(s) URL",
                panel.url
            ));
        }
        if panel.input_selector.trim().is_empty() {
            errors.push(format!("panels[{index}].input_selector must not be empty"));
        }
        if matches!(&panel.submit_selector, Some(s) if s.trim().is_empty()) {
            errors.push(format!(
                "panels[{index}].submit_selector must not be empty when set"
            ));
        }
        validate_range(
            &mut errors,
            &format!("panels[{index}].width_percent"),
            panel.width_percent,
            10,
            100,
        );
    }

    // Window constraints
    validate_range(&mut errors, "window.width", config.window.width, 400, 7680);
    validate_range(&mut errors, "window.height", config.window.height, 300, 4320);
    validate_range(&mut errors, "window.windows", config.window.windows, 1, 8);

    // Layout constraints
    validate_range(&mut errors, "layout.padding", config.layout.padding, 0, 40);
    validate_range(&mut errors, "layout.panel_gap", config.layout.panel_gap, 0, 40);
    validate_range(&mut errors, "layout.header_height", config.layout.header_height, 16, 96);
    validate_range(&mut errors, "layout.border_width", config.layout.border_width, 0, 4);
    validate_range(
        &mut errors,
        "layout.composer_height",
        config.layout.composer_height,
        32,
        240,
    );
    if config.layout.width_options.is_empty() {
        errors.push("layout.width_options must not be empty".to_string());
    }
    for option in &config.layout.width_options {
        validate_range(&mut errors, "layout.width_options[]", *option, 10, 100);
    }

    // Broadcast
    validate_range(
        &mut errors,
        "broadcast.submit_delay_ms",
        config.broadcast.submit_delay_ms,
        0,
        5000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// An absolute `http`/`https` URL with a host.
fn is_web_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
