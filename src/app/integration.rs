//! Post-conversion instructions for bundling the package into an Xcode app.

/// Ordered steps for adding `package_name` to the `app_target` Xcode target.
pub fn integration_steps(package_name: &str, size_mb: u64, app_target: &str) -> Vec<String> {
    vec![
        format!("1. Drag and drop {} into Xcode", package_name),
        format!("2. Tick 'Add to target' for {}", app_target),
        format!("3. The model will be bundled in your app (~{}MB)", size_mb),
        "4. Usage is 100% local, no connection required".to_string(),
    ]
}

pub fn print_integration_instructions(package_name: &str, size_mb: u64, app_target: &str) {
    println!("\n📱 XCODE INTEGRATION INSTRUCTIONS:");
    for step in integration_steps(package_name, size_mb, app_target) {
        println!("{}", step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_steps() {
        let steps = integration_steps("Gemma2_PARALLAX_Mobile.mlpackage", 250, "PARALLAX");

        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], "1. Drag and drop Gemma2_PARALLAX_Mobile.mlpackage into Xcode");
        assert_eq!(steps[1], "2. Tick 'Add to target' for PARALLAX");
        assert!(steps[2].contains("~250MB"));
        assert!(steps[3].starts_with("4. "));
    }
}
