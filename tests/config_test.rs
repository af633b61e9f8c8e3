use anyhow::Result;
use modbus_plant_sim::config::{Config, ServerConfig, SimulationConfig};
use tempfile::tempdir;

#[test]
fn test_config_load_and_save() -> Result<()> {
    // Create a temporary directory
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");

    // Create a custom config
    let config = Config {
        server: ServerConfig {
            port: 502,
            address: "192.168.1.1".to_string(),
            ..ServerConfig::default()
        },
        simulation: SimulationConfig {
            nominal: 500,
            ..SimulationConfig::default()
        },
        ..Config::default()
    };

    // Save config to file
    config.save_to_file(&config_path)?;

    // Load config from file
    let loaded_config = Config::from_file(&config_path)?;

    // Verify loaded config matches original
    assert_eq!(loaded_config.server.port, 502);
    assert_eq!(loaded_config.server.address, "192.168.1.1");
    assert_eq!(loaded_config.simulation.nominal, 500);

    // Test loading default config for non-existent file
    let non_existent_path = temp_dir.path().join("non_existent.yaml");
    let default_config = Config::from_file(&non_existent_path)?;

    // Verify default config was created
    assert!(non_existent_path.exists());
    assert_eq!(default_config.server.port, 5020);
    assert_eq!(default_config.server.address, "127.0.0.1");
    assert_eq!(default_config.client.scan_interval_secs, 1.0);

    Ok(())
}

#[test]
fn test_reference_table_layout_defaults() -> Result<()> {
    let config = Config::default();

    let tables = config.server.tables;
    assert_eq!(tables.discrete_inputs.base, 0);
    assert_eq!(tables.discrete_inputs.length, 100);
    assert_eq!(tables.coils.base, 0);
    assert_eq!(tables.coils.length, 100);
    assert_eq!(tables.input_registers.base, 0);
    assert_eq!(tables.input_registers.length, 100);
    assert_eq!(tables.holding_registers.base, 1000);
    assert_eq!(tables.holding_registers.length, 100);

    // the simulation targets live inside the holding register / coil tables
    assert!(config.simulation.enabled);
    assert_eq!(config.simulation.nominal, 400);
    assert_eq!(config.simulation.register_address, 1000);
    assert_eq!(config.simulation.coil_address, 1000);

    Ok(())
}

#[test]
fn test_partial_file_falls_back_to_section_defaults() -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("partial.yaml");
    std::fs::write(&config_path, "server:\n  address: 0.0.0.0\n  port: 1502\n")?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 1502);
    // untouched sections keep their defaults
    assert_eq!(config.simulation.period_secs, 1);
    assert_eq!(config.client.port, 5020);

    Ok(())
}

#[test]
fn test_apply_args() -> Result<()> {
    let mut config = Config::default();
    assert_eq!(config.server.port, 5020);
    assert_eq!(config.server.address, "127.0.0.1");

    // Apply command-line arguments
    config.apply_args(Some("192.168.0.1".to_string()), Some(9000), Some(false));

    // Verify values were overridden
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.address, "192.168.0.1");
    assert!(!config.simulation.enabled);

    // None leaves values alone
    config.apply_args(None, None, None);
    assert_eq!(config.server.port, 9000);

    Ok(())
}
